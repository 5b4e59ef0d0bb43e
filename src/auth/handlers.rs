//! Login and registration handlers. Sessions are kept client-side; these
//! endpoints only verify credentials and return the user payload.

use crate::api::error_response;
use crate::auth::password::{hash_password, verify_password};
use crate::model::user::{Role, User};
use crate::repo::users::UserRepo;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginReq {
    #[schema(example = "EMP001")]
    pub emp_id: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    #[schema(example = "EMP001")]
    pub emp_id: String,
    pub password: String,
    pub confirm_password: String,
}

/// User payload returned after a successful login or registration; never
/// includes the password hash.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub emp_id: String,
    pub name: String,
    pub role: Role,
    pub leave_quota: u32,
    pub sick_leave_quota: u32,
    pub personal_leave_quota: u32,
    pub maternity_leave_quota: u32,
    pub sterilization_leave_quota: u32,
    pub unpaid_leave_quota: u32,
    pub compassionate_leave_quota: u32,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            emp_id: user.emp_id,
            name: user.name,
            role: user.role,
            leave_quota: user.leave_quota,
            sick_leave_quota: user.sick_leave_quota,
            personal_leave_quota: user.personal_leave_quota,
            maternity_leave_quota: user.maternity_leave_quota,
            sterilization_leave_quota: user.sterilization_leave_quota,
            unpaid_leave_quota: user.unpaid_leave_quota,
            compassionate_leave_quota: user.compassionate_leave_quota,
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = AuthUser),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Wrong password or not registered"),
        (status = 404, description = "Unknown employee id")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(users, payload), fields(emp_id = %payload.emp_id))]
pub async fn login(
    users: web::Data<Arc<UserRepo>>,
    payload: web::Json<LoginReq>,
) -> impl Responder {
    if payload.emp_id.trim().is_empty() || payload.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "message": "empId and password are required"
        }));
    }

    let user = match users.find_by_emp_id(payload.emp_id.trim()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "message": "Employee ID not found"
            }));
        }
        Err(e) => return error_response(&e),
    };

    if !user.is_registered {
        return HttpResponse::Unauthorized().json(json!({
            "message": "Please register before logging in"
        }));
    }

    if !verify_password(&payload.password, &user.password) {
        info!("Login rejected: wrong password");
        return HttpResponse::Unauthorized().json(json!({
            "message": "Incorrect password"
        }));
    }

    info!("Login successful");
    HttpResponse::Ok().json(AuthUser::from(user))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 200, description = "Registration successful", body = AuthUser),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Unknown employee id"),
        (status = 409, description = "Already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    users: web::Data<Arc<UserRepo>>,
    payload: web::Json<RegisterReq>,
) -> impl Responder {
    if payload.emp_id.trim().is_empty() || payload.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "message": "empId and password are required"
        }));
    }
    if payload.password != payload.confirm_password {
        return HttpResponse::BadRequest().json(json!({
            "message": "Passwords do not match"
        }));
    }
    if payload.password.len() < 4 {
        return HttpResponse::BadRequest().json(json!({
            "message": "Password must be at least 4 characters"
        }));
    }

    let hash = hash_password(&payload.password);
    match users.register(payload.emp_id.trim(), hash).await {
        Ok(user) => HttpResponse::Ok().json(AuthUser::from(user)),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Logged out")),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    // Sessions live client-side; nothing to invalidate server-side.
    HttpResponse::Ok().json(json!({ "message": "Logged out" }))
}
