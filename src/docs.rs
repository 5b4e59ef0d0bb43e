use crate::api::settings::SettingsUpdate;
use crate::api::users::{PasswordReset, QuotaUpdate};
use crate::auth::handlers::{AuthUser, LoginReq, RegisterReq};
use crate::model::holiday::Holiday;
use crate::model::leave::{
    LeaveCreateInput, LeaveDecisionInput, LeaveRequest, LeaveStatistics, LeaveStatus, LeaveType,
};
use crate::model::setting::PolicySettings;
use crate::model::user::{QuotaCategory, Role, User, UserCreateInput, UserUpdateInput};
use crate::setup::MigrationReport;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave Management System

This API powers a **leave management** system backed by a shared spreadsheet
instead of a conventional database.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, and delete employees with per-category leave quotas
- **Leave Requests**
  - Submit requests with automatic business-day counting, approve or reject them
- **Policy Settings & Holidays**
  - Per-year leave policies and company holiday calendar
- **Administration**
  - Idempotent sheet provisioning and versioned schema migration

### 📦 Response Format
- JSON-based RESTful responses
- Dates are `YYYY-MM-DD`; timestamps are RFC 3339

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::register,
        crate::auth::handlers::logout,

        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::update_quota,
        crate::api::users::reset_password,
        crate::api::users::delete_user,

        crate::api::leaves::list_leaves,
        crate::api::leaves::get_leave,
        crate::api::leaves::create_leave,
        crate::api::leaves::decide_leave,
        crate::api::leaves::leave_statistics,

        crate::api::settings::get_settings,
        crate::api::settings::update_settings,
        crate::api::settings::list_holidays,
        crate::api::settings::add_holiday,
        crate::api::settings::delete_holiday,

        crate::api::admin::setup_status,
        crate::api::admin::run_setup,
        crate::api::admin::run_migration
    ),
    components(
        schemas(
            LoginReq,
            RegisterReq,
            AuthUser,
            User,
            UserCreateInput,
            UserUpdateInput,
            QuotaUpdate,
            PasswordReset,
            QuotaCategory,
            Role,
            LeaveRequest,
            LeaveCreateInput,
            LeaveDecisionInput,
            LeaveStatistics,
            LeaveType,
            LeaveStatus,
            PolicySettings,
            SettingsUpdate,
            Holiday,
            MigrationReport
        )
    ),
    tags(
        (name = "Auth", description = "Login and registration APIs"),
        (name = "Users", description = "Employee management APIs"),
        (name = "Leaves", description = "Leave request APIs"),
        (name = "Settings", description = "Policy settings and holiday APIs"),
        (name = "Admin", description = "Sheet setup and migration APIs"),
    )
)]
pub struct ApiDoc;
