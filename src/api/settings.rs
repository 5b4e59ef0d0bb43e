//! Policy settings and holiday endpoints (admin UI).

use crate::api::error_response;
use crate::model::holiday::Holiday;
use crate::model::setting::PolicySettings;
use crate::repo::settings::SettingsRepo;
use actix_web::{HttpResponse, Responder, web};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct YearQuery {
    /// Calendar year; defaults to the current year
    pub year: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct SettingsUpdate {
    /// Key → value pairs to merge into the given year
    pub updates: BTreeMap<String, String>,
    pub year: Option<i32>,
}

fn year_or_current(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| chrono::Utc::now().year())
}

#[utoipa::path(
    get,
    path = "/api/settings",
    params(YearQuery),
    responses((status = 200, description = "Policy settings", body = PolicySettings)),
    tag = "Settings"
)]
pub async fn get_settings(
    settings: web::Data<Arc<SettingsRepo>>,
    query: web::Query<YearQuery>,
) -> impl Responder {
    match settings.policy_settings(year_or_current(query.year)).await {
        Ok(policy) => HttpResponse::Ok().json(policy),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = SettingsUpdate,
    responses((status = 200, description = "Settings updated", body = PolicySettings)),
    tag = "Settings"
)]
pub async fn update_settings(
    settings: web::Data<Arc<SettingsRepo>>,
    payload: web::Json<SettingsUpdate>,
) -> impl Responder {
    let payload = payload.into_inner();
    let year = year_or_current(payload.year);
    let updates: Vec<(String, String)> = payload.updates.into_iter().collect();

    if let Err(e) = settings.update_settings(&updates, year).await {
        return error_response(&e);
    }
    match settings.policy_settings(year).await {
        Ok(policy) => HttpResponse::Ok().json(policy),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/holidays",
    params(YearQuery),
    responses((status = 200, description = "Holidays for the year", body = [Holiday])),
    tag = "Settings"
)]
pub async fn list_holidays(
    settings: web::Data<Arc<SettingsRepo>>,
    query: web::Query<YearQuery>,
) -> impl Responder {
    match settings.holidays(year_or_current(query.year)).await {
        Ok(holidays) => HttpResponse::Ok().json(holidays),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/holidays",
    request_body = Holiday,
    responses(
        (status = 201, description = "Holiday added", body = Holiday),
        (status = 400, description = "Malformed date")
    ),
    tag = "Settings"
)]
pub async fn add_holiday(
    settings: web::Data<Arc<SettingsRepo>>,
    payload: web::Json<Holiday>,
) -> impl Responder {
    match settings.add_holiday(&payload.date, &payload.name).await {
        Ok(holiday) => HttpResponse::Created().json(holiday),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/holidays/{date}",
    params(("date" = String, Path, description = "Holiday date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Holiday removed"),
        (status = 404, description = "Unknown holiday date")
    ),
    tag = "Settings"
)]
pub async fn delete_holiday(
    settings: web::Data<Arc<SettingsRepo>>,
    path: web::Path<String>,
) -> impl Responder {
    match settings.delete_holiday(&path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Holiday deleted" })),
        Err(e) => error_response(&e),
    }
}
