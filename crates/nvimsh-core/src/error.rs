//! Error types for nvimsh-core.

use miette::Diagnostic;
use nvimsh_registry::RegistryError;
use thiserror::Error;

/// Reasons a refresh cycle can be abandoned.
///
/// Query operations never fail, so this only surfaces from the refresher.
#[derive(Error, Diagnostic, Debug)]
pub enum CoreError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error("Refresh task failed: {0}")]
    #[diagnostic(
        code(nvimsh::refresh_task),
        help("This is an internal error, please report it")
    )]
    TaskFailed(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
