//! Leave-request endpoints.

use crate::api::error_response;
use crate::model::leave::{
    LeaveCreateInput, LeaveDecisionInput, LeaveRequest, LeaveStatistics, LeaveStatus,
};
use crate::repo::leaves::LeaveRepo;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LeaveFilter {
    /// Filter by employee id
    pub emp_id: Option<String>,
    /// Overlap-query range start (YYYY-MM-DD); requires endDate
    pub start_date: Option<String>,
    /// Overlap-query range end (YYYY-MM-DD); requires startDate
    pub end_date: Option<String>,
    /// Filter by status
    pub status: Option<LeaveStatus>,
}

#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave requests", body = [LeaveRequest]),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Leaves"
)]
pub async fn list_leaves(
    leaves: web::Data<Arc<LeaveRepo>>,
    query: web::Query<LeaveFilter>,
) -> impl Responder {
    let result = match (&query.emp_id, &query.start_date, &query.end_date) {
        (Some(emp_id), _, _) => leaves.list_by_emp_id(emp_id).await,
        (None, Some(start), Some(end)) => leaves.list_by_date_range(start, end).await,
        (None, _, _) if query.status == Some(LeaveStatus::Pending) => leaves.list_pending().await,
        _ => leaves.list_all().await,
    };

    match result {
        Ok(mut list) => {
            if let Some(status) = query.status {
                list.retain(|l| l.status == status);
            }
            HttpResponse::Ok().json(list)
        }
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(("id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request", body = LeaveRequest),
        (status = 404, description = "Unknown leave id")
    ),
    tag = "Leaves"
)]
pub async fn get_leave(
    leaves: web::Data<Arc<LeaveRepo>>,
    path: web::Path<String>,
) -> impl Responder {
    match leaves.get_by_id(&path.into_inner()).await {
        Ok(leave) => HttpResponse::Ok().json(leave),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = LeaveCreateInput,
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid dates")
    ),
    tag = "Leaves"
)]
pub async fn create_leave(
    leaves: web::Data<Arc<LeaveRepo>>,
    payload: web::Json<LeaveCreateInput>,
) -> impl Responder {
    match leaves.create(payload.into_inner()).await {
        Ok(leave) => HttpResponse::Created().json(leave),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/leaves/{id}/status",
    params(("id" = String, Path, description = "Leave request id")),
    request_body = LeaveDecisionInput,
    responses(
        (status = 200, description = "Status updated", body = LeaveRequest),
        (status = 400, description = "Invalid status or missing note"),
        (status = 404, description = "Unknown leave id")
    ),
    tag = "Leaves"
)]
pub async fn decide_leave(
    leaves: web::Data<Arc<LeaveRepo>>,
    path: web::Path<String>,
    payload: web::Json<LeaveDecisionInput>,
) -> impl Responder {
    let payload = payload.into_inner();
    match leaves
        .update_status(&path.into_inner(), payload.status, payload.approver_note)
        .await
    {
        Ok(leave) => HttpResponse::Ok().json(leave),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/leaves/statistics",
    responses((status = 200, description = "Counts by status", body = LeaveStatistics)),
    tag = "Leaves"
)]
pub async fn leave_statistics(leaves: web::Data<Arc<LeaveRepo>>) -> impl Responder {
    match leaves.statistics().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_response(&e),
    }
}
