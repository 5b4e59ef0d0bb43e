use crate::sheets::codec::{self, RowCodec};
use crate::sheets::transport::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Maternity,
    Sterilization,
    Unpaid,
    Compassionate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[schema(example = "3f6c1f2e-8f4b-4a3e-9d2c-1a2b3c4d5e6f")]
    pub id: String,
    #[schema(example = "EMP001")]
    pub emp_id: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[schema(example = "2025-04-11")]
    pub start_date: String,
    #[schema(example = "2025-04-15")]
    pub end_date: String,
    /// Business days in the range, computed once at creation and never
    /// recomputed on status changes.
    #[schema(example = 1)]
    pub total_days: u32,
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver_note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCreateInput {
    #[schema(example = "EMP001")]
    pub emp_id: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[schema(example = "2025-04-11", format = "date")]
    pub start_date: String,
    #[schema(example = "2025-04-15", format = "date")]
    pub end_date: String,
    #[schema(example = "Family visit")]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDecisionInput {
    pub status: LeaveStatus,
    pub approver_note: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatistics {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub approved_requests: usize,
    pub rejected_requests: usize,
    /// approved / total as a percentage, rounded to the nearest integer;
    /// 0 when there are no requests.
    pub approval_rate: u32,
}

impl RowCodec for LeaveRequest {
    const HEADER: &'static [&'static str] = &[
        "id",
        "empId",
        "type",
        "startDate",
        "endDate",
        "totalDays",
        "reason",
        "status",
        "approverNote",
        "createdAt",
        "updatedAt",
    ];

    fn to_row(&self) -> Row {
        vec![
            json!(self.id),
            json!(self.emp_id),
            json!(self.leave_type.to_string()),
            json!(self.start_date),
            json!(self.end_date),
            json!(self.total_days),
            json!(self.reason),
            json!(self.status.to_string()),
            json!(self.approver_note.clone().unwrap_or_default()),
            json!(self.created_at),
            json!(self.updated_at),
        ]
    }

    fn from_row(row: &[Value]) -> Self {
        let note = codec::cell_str(row, 8);
        Self {
            id: codec::cell_str(row, 0),
            emp_id: codec::cell_str(row, 1),
            leave_type: codec::cell_str(row, 2).parse().unwrap_or(LeaveType::Annual),
            start_date: codec::cell_str(row, 3),
            end_date: codec::cell_str(row, 4),
            total_days: codec::cell_u32(row, 5, 0),
            reason: codec::cell_str(row, 6),
            status: codec::cell_str(row, 7).parse().unwrap_or(LeaveStatus::Pending),
            approver_note: if note.is_empty() { None } else { Some(note) },
            created_at: codec::cell_timestamp(row, 9),
            updated_at: codec::cell_timestamp(row, 10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> LeaveRequest {
        LeaveRequest {
            id: "11111111-2222-3333-4444-555555555555".to_string(),
            emp_id: "EMP001".to_string(),
            leave_type: LeaveType::Sick,
            start_date: "2025-04-11".to_string(),
            end_date: "2025-04-15".to_string(),
            total_days: 1,
            reason: "fever".to_string(),
            status: LeaveStatus::Pending,
            approver_note: None,
            created_at: "2025-04-10T09:00:00+00:00".to_string(),
            updated_at: "2025-04-10T09:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn round_trips_with_empty_optional_note() {
        let leave = sample();
        assert_eq!(LeaveRequest::from_row(&leave.to_row()), leave);
    }

    #[test]
    fn round_trips_with_note() {
        let leave = LeaveRequest {
            status: LeaveStatus::Rejected,
            approver_note: Some("quota exhausted".to_string()),
            ..sample()
        };
        assert_eq!(LeaveRequest::from_row(&leave.to_row()), leave);
    }

    #[test]
    fn unknown_status_defaults_to_pending() {
        let mut row = sample().to_row();
        row[7] = json!("weird");
        assert_eq!(LeaveRequest::from_row(&row).status, LeaveStatus::Pending);
    }

    #[test]
    fn status_and_type_render_lowercase() {
        let row = sample().to_row();
        assert_eq!(row[2], json!("sick"));
        assert_eq!(row[7], json!("pending"));
    }
}
