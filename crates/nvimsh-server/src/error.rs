use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use miette::Diagnostic;
use nvimsh_config::ConfigError;
use nvimsh_registry::RegistryError;
use serde::Serialize;
use thiserror::Error;

/// Errors that stop the process.
#[derive(Error, Diagnostic, Debug)]
pub enum ServerError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error("Error while {action}: {source}")]
    #[diagnostic(
        code(nvimsh::io),
        help("Check that the listen address is free and you have permission to bind it")
    )]
    IoError {
        action: String,
        source: std::io::Error,
    },
}

pub type ServerResult<T> = std::result::Result<T, ServerError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> ServerResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> ServerResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            ServerError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

/// Errors returned from HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
