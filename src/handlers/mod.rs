use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::response::page;

pub mod artists;
pub mod shows;
pub mod venues;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
struct IndexPayload {
    service: &'static str,
    sections: [&'static str; 3],
}

/// Body of a venue or artist search, from the form or the query string.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search_term: String,
}

pub async fn index() -> Response {
    page(IndexPayload {
        service: "gigbook",
        sections: ["/venues", "/artists", "/shows"],
    })
}

pub async fn health_check() -> Response {
    page(HealthPayload {
        status: "ok",
        service: "gigbook-server",
    })
}

pub async fn not_found() -> AppError {
    AppError::from_status(StatusCode::NOT_FOUND)
}

/// Ids that are not even well-formed cannot exist, so they are a 404 too.
pub(crate) fn parse_id(resource: &'static str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::NotFound(format!("{} with id '{}' was not found", resource, raw)))
}
