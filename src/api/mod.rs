pub mod admin;
pub mod leaves;
pub mod settings;
pub mod users;

use crate::error::{RepoError, StoreError};
use actix_web::HttpResponse;
use serde_json::json;
use tracing::error;

/// Map a repository error onto its HTTP response: 404 for missing records,
/// 409 for conflicts, 400 for bad input, 502 for backend trouble.
pub fn error_response(err: &RepoError) -> HttpResponse {
    match err {
        RepoError::NotFound { .. } => {
            HttpResponse::NotFound().json(json!({ "message": err.to_string() }))
        }
        RepoError::Conflict(_) => {
            HttpResponse::Conflict().json(json!({ "message": err.to_string() }))
        }
        RepoError::Validation(_) => {
            HttpResponse::BadRequest().json(json!({ "message": err.to_string() }))
        }
        RepoError::Store(StoreError::ConcurrentModification { .. }) => {
            error!(error = %err, "Rewrite raced a concurrent writer");
            HttpResponse::Conflict().json(json!({ "message": err.to_string() }))
        }
        RepoError::Store(StoreError::Config(_)) => {
            error!(error = %err, "Store misconfigured");
            HttpResponse::InternalServerError().json(json!({ "message": "Internal Server Error" }))
        }
        RepoError::Store(_) => {
            error!(error = %err, "Store call failed");
            HttpResponse::BadGateway().json(json!({ "message": "Spreadsheet backend unavailable" }))
        }
    }
}
