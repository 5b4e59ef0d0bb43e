//! Leave-request repository over the Leaves sheet.

use crate::constants::LEAVES_SHEET;
use crate::error::RepoError;
use crate::model::leave::{
    LeaveCreateInput, LeaveRequest, LeaveStatistics, LeaveStatus,
};
use crate::repo::settings::SettingsRepo;
use crate::sheets::client::SheetStore;
use crate::sheets::codec::{self, RowCodec};
use crate::sheets::range;
use crate::utils::{self, business_days::business_days};
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct LeaveRepo {
    store: Arc<SheetStore>,
    settings: Arc<SettingsRepo>,
}

impl LeaveRepo {
    pub fn new(store: Arc<SheetStore>, settings: Arc<SettingsRepo>) -> Self {
        Self { store, settings }
    }

    pub async fn list_all(&self) -> Result<Vec<LeaveRequest>, RepoError> {
        let rows = self.store.read_range(LEAVES_SHEET, None).await?;
        Ok(codec::decode_rows(&rows))
    }

    pub async fn list_by_emp_id(&self, emp_id: &str) -> Result<Vec<LeaveRequest>, RepoError> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|l| l.emp_id == emp_id)
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<LeaveRequest, RepoError> {
        self.list_all()
            .await?
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| RepoError::not_found("Leave request", id))
    }

    /// Create a pending request. `total_days` is the business-day count of
    /// the range against that year's holiday calendar, computed here once
    /// and never recomputed on status changes.
    pub async fn create(&self, input: LeaveCreateInput) -> Result<LeaveRequest, RepoError> {
        let start = parse_date(&input.start_date)?;
        let end = parse_date(&input.end_date)?;
        if end < start {
            return Err(RepoError::Validation(
                "endDate cannot be before startDate".to_string(),
            ));
        }

        let holidays = self.settings.holiday_dates(start.year()).await?;
        let total_days = business_days(start, end, &holidays);

        let now = utils::now_rfc3339();
        let leave = LeaveRequest {
            id: Uuid::new_v4().to_string(),
            emp_id: input.emp_id,
            leave_type: input.leave_type,
            start_date: input.start_date,
            end_date: input.end_date,
            total_days,
            reason: input.reason,
            status: LeaveStatus::Pending,
            approver_note: None,
            created_at: now.clone(),
            updated_at: now,
        };

        self.store.append_rows(LEAVES_SHEET, &[leave.to_row()]).await?;
        info!(id = %leave.id, emp_id = %leave.emp_id, total_days, "Created leave request");
        Ok(leave)
    }

    /// Approve or reject a request, overwriting its row in place. A
    /// rejection requires a note. The source state is deliberately not
    /// checked here; guarding against re-deciding an already decided
    /// request is the caller's responsibility.
    pub async fn update_status(
        &self,
        id: &str,
        status: LeaveStatus,
        approver_note: Option<String>,
    ) -> Result<LeaveRequest, RepoError> {
        if status == LeaveStatus::Pending {
            return Err(RepoError::Validation(
                "status must be 'approved' or 'rejected'".to_string(),
            ));
        }
        if status == LeaveStatus::Rejected
            && approver_note.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            return Err(RepoError::Validation(
                "rejecting a leave request requires an approver note".to_string(),
            ));
        }

        let leaves = self.list_all().await?;
        let index = leaves
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| RepoError::not_found("Leave request", id))?;

        let mut leave = leaves[index].clone();
        leave.status = status;
        leave.approver_note = approver_note;
        leave.updated_at = utils::now_rfc3339();

        let row_range = range::row_range(
            range::data_row_number(index),
            LeaveRequest::HEADER.len(),
        );
        self.store
            .write_range(LEAVES_SHEET, &row_range, &[leave.to_row()])
            .await?;
        info!(id, status = %leave.status, "Updated leave status");
        Ok(leave)
    }

    /// Requests overlapping `[start, end]`: either endpoint inside the
    /// range, or the leave spanning it entirely.
    pub async fn list_by_date_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<LeaveRequest>, RepoError> {
        let range_start = parse_date(start)?;
        let range_end = parse_date(end)?;

        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|leave| {
                let (Ok(leave_start), Ok(leave_end)) = (
                    NaiveDate::parse_from_str(&leave.start_date, "%Y-%m-%d"),
                    NaiveDate::parse_from_str(&leave.end_date, "%Y-%m-%d"),
                ) else {
                    return false;
                };
                (leave_start >= range_start && leave_start <= range_end)
                    || (leave_end >= range_start && leave_end <= range_end)
                    || (leave_start <= range_start && leave_end >= range_end)
            })
            .collect())
    }

    pub async fn list_pending(&self) -> Result<Vec<LeaveRequest>, RepoError> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|l| l.status == LeaveStatus::Pending)
            .collect())
    }

    /// Approved requests overlapping the given month.
    pub async fn approved_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<LeaveRequest>, RepoError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| RepoError::Validation(format!("invalid month {year}-{month}")))?;
        let last = last_day_of_month(year, month);

        Ok(self
            .list_by_date_range(&first.to_string(), &last.to_string())
            .await?
            .into_iter()
            .filter(|l| l.status == LeaveStatus::Approved)
            .collect())
    }

    pub async fn statistics(&self) -> Result<LeaveStatistics, RepoError> {
        let leaves = self.list_all().await?;

        let total_requests = leaves.len();
        let pending_requests = leaves.iter().filter(|l| l.status == LeaveStatus::Pending).count();
        let approved_requests = leaves.iter().filter(|l| l.status == LeaveStatus::Approved).count();
        let rejected_requests = leaves.iter().filter(|l| l.status == LeaveStatus::Rejected).count();

        let approval_rate = if total_requests > 0 {
            ((approved_requests as f64 / total_requests as f64) * 100.0).round() as u32
        } else {
            0
        };

        Ok(LeaveStatistics {
            total_requests,
            pending_requests,
            approved_requests,
            rejected_requests,
            approval_rate,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, RepoError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RepoError::Validation(format!("date must be YYYY-MM-DD, got '{value}'")))
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.expect("valid first of month") - chrono::Duration::days(1)
}
