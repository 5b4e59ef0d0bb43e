//! Schema setup and migration for the backing spreadsheet.
//!
//! Setup is idempotent: each required sheet is created with its header and
//! seed rows only when absent, and left untouched otherwise. Migration is a
//! separate, explicitly invoked operation that upgrades the Users sheet from
//! historical layouts and back-fills missing policy keys.

use crate::auth::password::hash_password;
use crate::constants::{
    ADMIN_EMP_ID, ADMIN_NAME, ADMIN_SEED_PASSWORD, DEFAULT_HOLIDAYS_2025, HOLIDAYS_SHEET,
    LEAVES_SHEET, POLICY_DEFAULTS, REQUIRED_SHEETS, SETTINGS_SHEET, USERS_SHEET,
};
use crate::error::RepoError;
use crate::model::holiday::Holiday;
use crate::model::leave::LeaveRequest;
use crate::model::setting::Setting;
use crate::model::user::{Role, User, UserRowLayout};
use crate::sheets::client::SheetStore;
use crate::sheets::codec::{self, RowCodec};
use crate::sheets::range;
use crate::utils;
use chrono::Datelike;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Whether the Users sheet was rewritten to the current layout.
    pub users_rewritten: bool,
    /// Data rows carried through the rewrite.
    pub users_migrated: usize,
    /// Policy keys appended for the current year.
    pub settings_backfilled: usize,
}

pub struct SheetSetup {
    store: Arc<SheetStore>,
}

impl SheetSetup {
    pub fn new(store: Arc<SheetStore>) -> Self {
        Self { store }
    }

    pub async fn check_initialized(&self) -> bool {
        for sheet in REQUIRED_SHEETS {
            if !self.store.sheet_exists(sheet).await {
                return false;
            }
        }
        true
    }

    /// Provision every required sheet. Safe to call on every startup.
    pub async fn initialize(&self) -> Result<(), RepoError> {
        self.create_users_if_absent().await?;
        self.create_leaves_if_absent().await?;
        self.create_settings_if_absent().await?;
        self.create_holidays_if_absent().await?;
        info!("Sheet setup complete");
        Ok(())
    }

    async fn create_users_if_absent(&self) -> Result<(), RepoError> {
        if self.store.sheet_exists(USERS_SHEET).await {
            return Ok(());
        }
        info!("Creating {USERS_SHEET} sheet");
        self.store.create_sheet(USERS_SHEET).await?;

        let header = codec::header_row::<User>();
        let header_range = range::row_range(1, UserRowLayout::CURRENT_WIDTH);
        self.store
            .write_range(USERS_SHEET, &header_range, &[header])
            .await?;

        let admin = User {
            emp_id: ADMIN_EMP_ID.to_string(),
            name: ADMIN_NAME.to_string(),
            password: hash_password(ADMIN_SEED_PASSWORD),
            role: Role::Admin,
            leave_quota: 0,
            sick_leave_quota: 0,
            personal_leave_quota: 0,
            maternity_leave_quota: 0,
            sterilization_leave_quota: 0,
            unpaid_leave_quota: 0,
            compassionate_leave_quota: 0,
            is_registered: true,
            created_at: utils::now_rfc3339(),
        };
        self.store.append_rows(USERS_SHEET, &[admin.to_row()]).await?;
        Ok(())
    }

    async fn create_leaves_if_absent(&self) -> Result<(), RepoError> {
        if self.store.sheet_exists(LEAVES_SHEET).await {
            return Ok(());
        }
        info!("Creating {LEAVES_SHEET} sheet");
        self.store.create_sheet(LEAVES_SHEET).await?;

        let header = codec::header_row::<LeaveRequest>();
        let header_range = range::row_range(1, LeaveRequest::HEADER.len());
        self.store
            .write_range(LEAVES_SHEET, &header_range, &[header])
            .await?;
        Ok(())
    }

    async fn create_settings_if_absent(&self) -> Result<(), RepoError> {
        if self.store.sheet_exists(SETTINGS_SHEET).await {
            return Ok(());
        }
        info!("Creating {SETTINGS_SHEET} sheet");
        self.store.create_sheet(SETTINGS_SHEET).await?;

        let header = codec::header_row::<Setting>();
        let header_range = range::row_range(1, Setting::HEADER.len());
        self.store
            .write_range(SETTINGS_SHEET, &header_range, &[header])
            .await?;

        let year = chrono::Utc::now().year();
        let seed: Vec<_> = POLICY_DEFAULTS
            .iter()
            .map(|(key, value)| {
                Setting {
                    key: key.to_string(),
                    value: value.to_string(),
                    year,
                }
                .to_row()
            })
            .collect();
        self.store.append_rows(SETTINGS_SHEET, &seed).await?;
        Ok(())
    }

    async fn create_holidays_if_absent(&self) -> Result<(), RepoError> {
        if self.store.sheet_exists(HOLIDAYS_SHEET).await {
            return Ok(());
        }
        info!("Creating {HOLIDAYS_SHEET} sheet");
        self.store.create_sheet(HOLIDAYS_SHEET).await?;

        let header = codec::header_row::<Holiday>();
        let header_range = range::row_range(1, Holiday::HEADER.len());
        self.store
            .write_range(HOLIDAYS_SHEET, &header_range, &[header])
            .await?;

        let seed: Vec<_> = DEFAULT_HOLIDAYS_2025
            .iter()
            .map(|(date, name)| {
                Holiday {
                    date: date.to_string(),
                    name: name.to_string(),
                }
                .to_row()
            })
            .collect();
        self.store.append_rows(HOLIDAYS_SHEET, &seed).await?;
        Ok(())
    }

    /// Upgrade the Users sheet to the current layout and back-fill missing
    /// policy keys. Re-running on a current schema performs no writes.
    pub async fn migrate(&self) -> Result<MigrationReport, RepoError> {
        let mut report = MigrationReport::default();

        let raw = self.store.read_range(USERS_SHEET, None).await?;
        if !raw.is_empty() && !header_is_current(&raw[0]) {
            let users: Vec<User> = raw
                .iter()
                .skip(1)
                .filter(|row| codec::is_data_row(row))
                .map(|row| UserRowLayout::detect(row).decode(row))
                .collect();

            let mut rows = vec![codec::header_row::<User>()];
            rows.extend(users.iter().map(|u| u.to_row()));

            let write_range = range::block_range(rows.len(), UserRowLayout::CURRENT_WIDTH);
            self.store
                .replace_sheet(USERS_SHEET, raw.len(), &rows, &write_range)
                .await?;

            report.users_rewritten = true;
            report.users_migrated = users.len();
            info!(migrated = users.len(), "Rewrote Users sheet to current layout");
        }

        report.settings_backfilled = self.backfill_settings().await?;
        Ok(report)
    }

    /// Append any policy key missing for the current year. Existing values
    /// are never touched.
    async fn backfill_settings(&self) -> Result<usize, RepoError> {
        let raw = self.store.read_range(SETTINGS_SHEET, None).await?;
        let settings: Vec<Setting> = codec::decode_rows(&raw);
        let year = chrono::Utc::now().year();

        let missing: Vec<_> = POLICY_DEFAULTS
            .iter()
            .filter(|(key, _)| !settings.iter().any(|s| s.key == *key && s.year == year))
            .map(|(key, value)| {
                Setting {
                    key: key.to_string(),
                    value: value.to_string(),
                    year,
                }
                .to_row()
            })
            .collect();

        if !missing.is_empty() {
            self.store.append_rows(SETTINGS_SHEET, &missing).await?;
            info!(backfilled = missing.len(), year, "Back-filled policy settings");
        }
        Ok(missing.len())
    }
}

fn header_is_current(header: &[Value]) -> bool {
    header.len() == User::HEADER.len()
        && User::HEADER
            .iter()
            .enumerate()
            .all(|(i, name)| codec::cell_str(header, i) == *name)
}
