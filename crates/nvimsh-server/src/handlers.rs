//! HTTP handlers for plugin search.
//!
//! Every route answers `GET` only and renders through [`crate::render`].
//! The output format comes from `?format=`, falling back to JSON when the
//! client accepts `application/json` and to a colored table otherwise.

use actix_web::{
    error::QueryPayloadError,
    http::header::ACCEPT,
    web, HttpRequest, HttpResponse,
};
use nvimsh_core::Catalog;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::AppError,
    render::{self, OutputFormat, Rendered, JSON_CONTENT_TYPE},
};

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub format: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

impl RenderQuery {
    fn output_format(&self, req: &HttpRequest) -> Result<OutputFormat, AppError> {
        if let Some(format) = &self.format {
            return format.parse::<OutputFormat>().map_err(|e| {
                AppError::Validation(format!(
                    "Invalid format parameter: {e}. Valid values are: table, plain, text, json"
                ))
            });
        }

        let wants_json = req
            .headers()
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|accept| accept.contains(JSON_CONTENT_TYPE));

        Ok(if wants_json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }
}

fn respond(rendered: Rendered) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(rendered.content_type)
        .body(rendered.body)
}

/// GET /
pub async fn help(
    query: web::Query<RenderQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let format = query.output_format(&req)?;
    Ok(respond(render::render_help(format)?))
}

/// GET /s
pub async fn all(
    catalog: web::Data<Catalog>,
    query: web::Query<RenderQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let format = query.output_format(&req)?;
    let results = catalog.list_all();
    Ok(respond(render::render_results(&results, format, query.debug)?))
}

/// GET /s/{search}
pub async fn search(
    catalog: web::Data<Catalog>,
    path: web::Path<String>,
    query: web::Query<RenderQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let format = query.output_format(&req)?;
    let search = path.into_inner().to_lowercase();
    debug!(search, %format, "search request");

    let results = catalog.search(&search);
    Ok(respond(render::render_results(&results, format, query.debug)?))
}

/// GET /t
pub async fn tags(
    catalog: web::Data<Catalog>,
    query: web::Query<RenderQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let format = query.output_format(&req)?;
    Ok(respond(render::render_tags(&catalog.list_tags(), format)?))
}

/// GET /t/{search}
pub async fn search_tags(
    catalog: web::Data<Catalog>,
    path: web::Path<String>,
    query: web::Query<RenderQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let format = query.output_format(&req)?;
    let tag = path.into_inner().to_lowercase();
    debug!(tag, %format, "tag request");

    let results = catalog.filter_by_tag(&tag);
    Ok(respond(render::render_results(&results, format, query.debug)?))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    stats: nvimsh_core::CatalogStats,
}

/// GET /health
///
/// `pending` until the first refresh has published a catalog.
pub async fn health(catalog: web::Data<Catalog>) -> HttpResponse {
    let stats = catalog.stats();
    let status = if stats.refreshed_at.is_some() {
        "ok"
    } else {
        "pending"
    };

    HttpResponse::Ok().json(HealthResponse {
        status,
        stats,
    })
}

fn query_error(err: QueryPayloadError, _: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid query string: {err}")).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/", web::get().to(help))
        .route("/s", web::get().to(all))
        .route("/s/{search}", web::get().to(search))
        .route("/t", web::get().to(tags))
        .route("/t/{search}", web::get().to(search_tags))
        .route("/health", web::get().to(health));
}
