use crate::constants::default_quota;
use crate::sheets::codec::{self, RowCodec};
use crate::sheets::transport::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

/// The seven leave-quota counters carried on every user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuotaCategory {
    Annual,
    Sick,
    Personal,
    Maternity,
    Sterilization,
    Unpaid,
    Compassionate,
}

impl QuotaCategory {
    pub fn default_quota(self) -> u32 {
        match self {
            QuotaCategory::Annual => default_quota::ANNUAL,
            QuotaCategory::Sick => default_quota::SICK,
            QuotaCategory::Personal => default_quota::PERSONAL,
            QuotaCategory::Maternity => default_quota::MATERNITY,
            QuotaCategory::Sterilization => default_quota::STERILIZATION,
            QuotaCategory::Unpaid => default_quota::UNPAID,
            QuotaCategory::Compassionate => default_quota::COMPASSIONATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "EMP001")]
    pub emp_id: String,
    #[schema(example = "Somchai J.")]
    pub name: String,
    /// Argon2 hash; empty until the user registers. Never serialized into
    /// API responses.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    #[schema(example = 10)]
    pub leave_quota: u32,
    #[schema(example = 30)]
    pub sick_leave_quota: u32,
    #[schema(example = 6)]
    pub personal_leave_quota: u32,
    #[schema(example = 120)]
    pub maternity_leave_quota: u32,
    #[schema(example = 999)]
    pub sterilization_leave_quota: u32,
    #[schema(example = 999)]
    pub unpaid_leave_quota: u32,
    #[schema(example = 3)]
    pub compassionate_leave_quota: u32,
    pub is_registered: bool,
    #[schema(example = "2025-01-01T00:00:00Z")]
    pub created_at: String,
}

impl User {
    pub fn quota(&self, category: QuotaCategory) -> u32 {
        match category {
            QuotaCategory::Annual => self.leave_quota,
            QuotaCategory::Sick => self.sick_leave_quota,
            QuotaCategory::Personal => self.personal_leave_quota,
            QuotaCategory::Maternity => self.maternity_leave_quota,
            QuotaCategory::Sterilization => self.sterilization_leave_quota,
            QuotaCategory::Unpaid => self.unpaid_leave_quota,
            QuotaCategory::Compassionate => self.compassionate_leave_quota,
        }
    }

    pub fn set_quota(&mut self, category: QuotaCategory, amount: u32) {
        match category {
            QuotaCategory::Annual => self.leave_quota = amount,
            QuotaCategory::Sick => self.sick_leave_quota = amount,
            QuotaCategory::Personal => self.personal_leave_quota = amount,
            QuotaCategory::Maternity => self.maternity_leave_quota = amount,
            QuotaCategory::Sterilization => self.sterilization_leave_quota = amount,
            QuotaCategory::Unpaid => self.unpaid_leave_quota = amount,
            QuotaCategory::Compassionate => self.compassionate_leave_quota = amount,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateInput {
    #[schema(example = "EMP001")]
    pub emp_id: String,
    #[schema(example = "Somchai J.")]
    pub name: String,
    pub role: Role,
    pub leave_quota: Option<u32>,
    pub sick_leave_quota: Option<u32>,
    pub personal_leave_quota: Option<u32>,
    pub maternity_leave_quota: Option<u32>,
    pub sterilization_leave_quota: Option<u32>,
    pub unpaid_leave_quota: Option<u32>,
    pub compassionate_leave_quota: Option<u32>,
}

/// Partial update; `None` keeps the stored value. empId is immutable and
/// deliberately absent.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateInput {
    pub name: Option<String>,
    pub password: Option<String>,
    pub leave_quota: Option<u32>,
    pub sick_leave_quota: Option<u32>,
    pub personal_leave_quota: Option<u32>,
    pub maternity_leave_quota: Option<u32>,
    pub sterilization_leave_quota: Option<u32>,
    pub unpaid_leave_quota: Option<u32>,
    pub compassionate_leave_quota: Option<u32>,
    pub is_registered: Option<bool>,
}

impl RowCodec for User {
    const HEADER: &'static [&'static str] = &[
        "empId",
        "name",
        "password",
        "role",
        "leaveQuota",
        "sickLeaveQuota",
        "personalLeaveQuota",
        "maternityLeaveQuota",
        "sterilizationLeaveQuota",
        "unpaidLeaveQuota",
        "compassionateLeaveQuota",
        "isRegistered",
        "createdAt",
    ];

    fn to_row(&self) -> Row {
        vec![
            json!(self.emp_id),
            json!(self.name),
            json!(self.password),
            json!(self.role.to_string()),
            json!(self.leave_quota),
            json!(self.sick_leave_quota),
            json!(self.personal_leave_quota),
            json!(self.maternity_leave_quota),
            json!(self.sterilization_leave_quota),
            json!(self.unpaid_leave_quota),
            json!(self.compassionate_leave_quota),
            json!(self.is_registered.to_string()),
            json!(self.created_at),
        ]
    }

    fn from_row(row: &[Value]) -> Self {
        Self {
            emp_id: codec::cell_str(row, 0),
            name: codec::cell_str(row, 1),
            password: codec::cell_str(row, 2),
            role: codec::cell_str(row, 3).parse().unwrap_or(Role::Employee),
            leave_quota: codec::cell_u32(row, 4, 0),
            sick_leave_quota: codec::cell_u32(row, 5, 0),
            personal_leave_quota: codec::cell_u32(row, 6, 0),
            maternity_leave_quota: codec::cell_u32(row, 7, default_quota::MATERNITY),
            sterilization_leave_quota: codec::cell_u32(row, 8, default_quota::STERILIZATION),
            unpaid_leave_quota: codec::cell_u32(row, 9, default_quota::UNPAID),
            compassionate_leave_quota: codec::cell_u32(row, 10, default_quota::COMPASSIONATE),
            is_registered: codec::cell_bool(row, 11),
            created_at: codec::cell_timestamp(row, 12),
        }
    }
}

/// Historical Users-sheet layouts, oldest first. Earlier deployments wrote
/// fewer quota columns; migration decodes whichever layout a row is in and
/// upgrades it to the current shape with named defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRowLayout {
    /// empId..personalLeaveQuota, isRegistered, createdAt (9 columns).
    V1,
    /// V1 plus maternity/sterilization/unpaid quotas (12 columns).
    V2,
    /// Current: V2 plus compassionateLeaveQuota (13 columns).
    V3,
}

impl UserRowLayout {
    pub const CURRENT_WIDTH: usize = 13;

    /// Classify a data row by its width. Anything at or beyond the current
    /// width is treated as current.
    pub fn detect(row: &[Value]) -> Self {
        match row.len() {
            0..=9 => UserRowLayout::V1,
            10..=12 => UserRowLayout::V2,
            _ => UserRowLayout::V3,
        }
    }

    /// Decode `row` under this layout, filling columns the layout predates
    /// with their named defaults.
    pub fn decode(self, row: &[Value]) -> User {
        match self {
            UserRowLayout::V3 => User::from_row(row),
            UserRowLayout::V2 => User {
                emp_id: codec::cell_str(row, 0),
                name: codec::cell_str(row, 1),
                password: codec::cell_str(row, 2),
                role: codec::cell_str(row, 3).parse().unwrap_or(Role::Employee),
                leave_quota: codec::cell_u32(row, 4, 0),
                sick_leave_quota: codec::cell_u32(row, 5, 0),
                personal_leave_quota: codec::cell_u32(row, 6, 0),
                maternity_leave_quota: codec::cell_u32(row, 7, default_quota::MATERNITY),
                sterilization_leave_quota: codec::cell_u32(row, 8, default_quota::STERILIZATION),
                unpaid_leave_quota: codec::cell_u32(row, 9, default_quota::UNPAID),
                compassionate_leave_quota: default_quota::COMPASSIONATE,
                is_registered: codec::cell_bool(row, 10),
                created_at: codec::cell_timestamp(row, 11),
            },
            UserRowLayout::V1 => User {
                emp_id: codec::cell_str(row, 0),
                name: codec::cell_str(row, 1),
                password: codec::cell_str(row, 2),
                role: codec::cell_str(row, 3).parse().unwrap_or(Role::Employee),
                leave_quota: codec::cell_u32(row, 4, 0),
                sick_leave_quota: codec::cell_u32(row, 5, 0),
                personal_leave_quota: codec::cell_u32(row, 6, 0),
                maternity_leave_quota: default_quota::MATERNITY,
                sterilization_leave_quota: default_quota::STERILIZATION,
                unpaid_leave_quota: default_quota::UNPAID,
                compassionate_leave_quota: default_quota::COMPASSIONATE,
                is_registered: codec::cell_bool(row, 7),
                created_at: codec::cell_timestamp(row, 8),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> User {
        User {
            emp_id: "EMP001".to_string(),
            name: "Somchai J.".to_string(),
            password: String::new(),
            role: Role::Employee,
            leave_quota: 10,
            sick_leave_quota: 0,
            personal_leave_quota: 999,
            maternity_leave_quota: 120,
            sterilization_leave_quota: 999,
            unpaid_leave_quota: 999,
            compassionate_leave_quota: 3,
            is_registered: false,
            created_at: "2025-01-15T08:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn round_trips_including_boundary_quotas() {
        let user = sample();
        assert_eq!(User::from_row(&user.to_row()), user);
    }

    #[test]
    fn booleans_encode_as_literal_strings() {
        let row = sample().to_row();
        assert_eq!(row[11], json!("false"));
    }

    #[test]
    fn blank_newer_quota_cells_take_named_defaults() {
        let row = vec![
            json!("EMP002"),
            json!("A"),
            json!(""),
            json!("employee"),
            json!(5),
            json!(5),
            json!(5),
            json!(""),
            json!(""),
            json!(""),
            json!(""),
            json!("true"),
            json!("2025-01-01T00:00:00Z"),
        ];
        let user = User::from_row(&row);
        assert_eq!(user.maternity_leave_quota, default_quota::MATERNITY);
        assert_eq!(user.sterilization_leave_quota, default_quota::STERILIZATION);
        assert_eq!(user.unpaid_leave_quota, default_quota::UNPAID);
        assert_eq!(user.compassionate_leave_quota, default_quota::COMPASSIONATE);
        assert!(user.is_registered);
    }

    #[test]
    fn layout_detection_by_row_width() {
        let v1 = vec![json!("E"); 9];
        let v2 = vec![json!("E"); 12];
        let v3 = vec![json!("E"); 13];
        assert_eq!(UserRowLayout::detect(&v1), UserRowLayout::V1);
        assert_eq!(UserRowLayout::detect(&v2), UserRowLayout::V2);
        assert_eq!(UserRowLayout::detect(&v3), UserRowLayout::V3);
    }

    #[test]
    fn v1_rows_upgrade_with_defaults() {
        let row = vec![
            json!("EMP003"),
            json!("B"),
            json!("hash"),
            json!("admin"),
            json!(8),
            json!(20),
            json!(4),
            json!("true"),
            json!("2024-06-01T00:00:00Z"),
        ];
        let user = UserRowLayout::V1.decode(&row);
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.leave_quota, 8);
        assert_eq!(user.maternity_leave_quota, default_quota::MATERNITY);
        assert_eq!(user.compassionate_leave_quota, default_quota::COMPASSIONATE);
        assert!(user.is_registered);
        assert_eq!(user.created_at, "2024-06-01T00:00:00Z");
    }

    #[test]
    fn quota_accessors_cover_every_category() {
        let mut user = sample();
        for category in [
            QuotaCategory::Annual,
            QuotaCategory::Sick,
            QuotaCategory::Personal,
            QuotaCategory::Maternity,
            QuotaCategory::Sterilization,
            QuotaCategory::Unpaid,
            QuotaCategory::Compassionate,
        ] {
            user.set_quota(category, 42);
            assert_eq!(user.quota(category), 42);
        }
    }
}
