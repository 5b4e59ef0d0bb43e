//! Administrative setup and migration endpoints.

use crate::api::error_response;
use crate::setup::{MigrationReport, SheetSetup};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/admin/status",
    responses((status = 200, description = "Whether every required sheet exists")),
    tag = "Admin"
)]
pub async fn setup_status(setup: web::Data<Arc<SheetSetup>>) -> impl Responder {
    let initialized = setup.check_initialized().await;
    HttpResponse::Ok().json(json!({ "initialized": initialized }))
}

#[utoipa::path(
    post,
    path = "/api/admin/setup",
    responses(
        (status = 200, description = "All sheets provisioned"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Admin"
)]
pub async fn run_setup(setup: web::Data<Arc<SheetSetup>>) -> impl Responder {
    match setup.initialize().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Setup complete" })),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/migrate",
    responses(
        (status = 200, description = "Migration report", body = MigrationReport),
        (status = 409, description = "Sheet changed while migrating"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Admin"
)]
pub async fn run_migration(setup: web::Data<Arc<SheetSetup>>) -> impl Responder {
    match setup.migrate().await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}
