//! Employee management endpoints (admin UI).

use crate::api::error_response;
use crate::auth::password::hash_password;
use crate::model::user::{QuotaCategory, User, UserCreateInput, UserUpdateInput};
use crate::repo::users::UserRepo;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct QuotaUpdate {
    pub category: QuotaCategory,
    #[schema(example = 12)]
    pub amount: u32,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub new_password: String,
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Users"
)]
pub async fn list_users(users: web::Data<Arc<UserRepo>>) -> impl Responder {
    match users.list_all().await {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/users/{emp_id}",
    params(("emp_id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "Unknown employee id")
    ),
    tag = "Users"
)]
pub async fn get_user(
    users: web::Data<Arc<UserRepo>>,
    path: web::Path<String>,
) -> impl Responder {
    match users.get_by_emp_id(&path.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserCreateInput,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Employee id already exists")
    ),
    tag = "Users"
)]
pub async fn create_user(
    users: web::Data<Arc<UserRepo>>,
    payload: web::Json<UserCreateInput>,
) -> impl Responder {
    match users.create(payload.into_inner()).await {
        Ok(user) => HttpResponse::Created().json(user),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{emp_id}",
    params(("emp_id" = String, Path, description = "Employee id")),
    request_body = UserUpdateInput,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "Unknown employee id")
    ),
    tag = "Users"
)]
pub async fn update_user(
    users: web::Data<Arc<UserRepo>>,
    path: web::Path<String>,
    payload: web::Json<UserUpdateInput>,
) -> impl Responder {
    let mut updates = payload.into_inner();
    // The sheet only ever holds argon2 hashes; a raw password arriving here
    // must be hashed or login would reject it forever.
    if let Some(password) = updates.password.take() {
        updates.password = Some(hash_password(&password));
    }
    match users.update(&path.into_inner(), updates).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{emp_id}/quota",
    params(("emp_id" = String, Path, description = "Employee id")),
    request_body = QuotaUpdate,
    responses(
        (status = 200, description = "Quota updated", body = User),
        (status = 404, description = "Unknown employee id")
    ),
    tag = "Users"
)]
pub async fn update_quota(
    users: web::Data<Arc<UserRepo>>,
    path: web::Path<String>,
    payload: web::Json<QuotaUpdate>,
) -> impl Responder {
    match users
        .update_quota(&path.into_inner(), payload.category, payload.amount)
        .await
    {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{emp_id}/password",
    params(("emp_id" = String, Path, description = "Employee id")),
    request_body = PasswordReset,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Password too short"),
        (status = 404, description = "Unknown employee id")
    ),
    tag = "Users"
)]
pub async fn reset_password(
    users: web::Data<Arc<UserRepo>>,
    path: web::Path<String>,
    payload: web::Json<PasswordReset>,
) -> impl Responder {
    if payload.new_password.len() < 4 {
        return HttpResponse::BadRequest().json(json!({
            "message": "Password must be at least 4 characters"
        }));
    }

    let hash = hash_password(&payload.new_password);
    match users.reset_password(&path.into_inner(), hash).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Password reset" })),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{emp_id}",
    params(("emp_id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Admin account cannot be deleted"),
        (status = 404, description = "Unknown employee id")
    ),
    tag = "Users"
)]
pub async fn delete_user(
    users: web::Data<Arc<UserRepo>>,
    path: web::Path<String>,
) -> impl Responder {
    match users.delete(&path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "User deleted" })),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::constants::USERS_SHEET;
    use crate::model::user::Role;
    use crate::sheets::client::SheetStore;
    use crate::sheets::codec;
    use crate::sheets::memory::MemoryTransport;
    use actix_web::{App, test};

    async fn seeded_repo() -> Arc<UserRepo> {
        let transport = Arc::new(MemoryTransport::default());
        transport.create_sheet_blocking(USERS_SHEET);
        transport.append_blocking(USERS_SHEET, vec![codec::header_row::<User>()]);
        let repo = Arc::new(UserRepo::new(Arc::new(SheetStore::new(transport))));
        repo.create(UserCreateInput {
            emp_id: "EMP001".to_string(),
            name: "Test".to_string(),
            role: Role::Employee,
            leave_quota: None,
            sick_leave_quota: None,
            personal_leave_quota: None,
            maternity_leave_quota: None,
            sterilization_leave_quota: None,
            unpaid_leave_quota: None,
            compassionate_leave_quota: None,
        })
        .await
        .unwrap();
        repo
    }

    #[actix_web::test]
    async fn updating_a_password_stores_a_verifiable_hash() {
        let users = seeded_repo().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(users.clone()))
                .route("/users/{emp_id}", web::put().to(update_user)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/users/EMP001")
            .set_json(json!({ "password": "secret" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        // The raw password must never reach the sheet, and the stored hash
        // must actually verify, or the user could never log in again.
        let stored = users.get_by_emp_id("EMP001").await.unwrap();
        assert_ne!(stored.password, "secret");
        assert!(stored.password.starts_with("$argon2"));
        assert!(verify_password("secret", &stored.password));
    }

    #[actix_web::test]
    async fn updating_without_a_password_keeps_the_stored_hash() {
        let users = seeded_repo().await;
        users
            .register("EMP001", hash_password("secret"))
            .await
            .unwrap();
        let before = users.get_by_emp_id("EMP001").await.unwrap().password;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(users.clone()))
                .route("/users/{emp_id}", web::put().to(update_user)),
        )
        .await;
        let req = test::TestRequest::put()
            .uri("/users/EMP001")
            .set_json(json!({ "name": "Renamed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let stored = users.get_by_emp_id("EMP001").await.unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.password, before);
    }
}
