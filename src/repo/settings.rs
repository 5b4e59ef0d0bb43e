//! Settings and holiday repository over the Settings and Holidays sheets.

use crate::constants::{HOLIDAYS_SHEET, POLICY_DEFAULTS, SETTINGS_SHEET};
use crate::error::RepoError;
use crate::model::holiday::Holiday;
use crate::model::setting::{PolicySettings, Setting};
use crate::sheets::client::SheetStore;
use crate::sheets::codec::{self, RowCodec};
use crate::sheets::range;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

pub struct SettingsRepo {
    store: Arc<SheetStore>,
}

impl SettingsRepo {
    pub fn new(store: Arc<SheetStore>) -> Self {
        Self { store }
    }

    pub async fn all_settings(&self) -> Result<Vec<Setting>, RepoError> {
        let rows = self.store.read_range(SETTINGS_SHEET, None).await?;
        Ok(codec::decode_rows(&rows))
    }

    pub async fn settings(&self, year: i32) -> Result<Vec<Setting>, RepoError> {
        Ok(self
            .all_settings()
            .await?
            .into_iter()
            .filter(|s| s.year == year)
            .collect())
    }

    /// Resolve the typed policy view for one year. Keys absent from the
    /// sheet take their defaults.
    pub async fn policy_settings(&self, year: i32) -> Result<PolicySettings, RepoError> {
        let settings = self.settings(year).await?;

        let int = |key: &str, default: u32| -> u32 {
            settings
                .iter()
                .find(|s| s.key == key)
                .and_then(|s| s.value.trim().parse().ok())
                .unwrap_or(default)
        };
        let flag = |key: &str, default: bool| -> bool {
            settings
                .iter()
                .find(|s| s.key == key)
                .map(|s| s.value.trim() == "true")
                .unwrap_or(default)
        };

        Ok(PolicySettings {
            annual_leave_max: int("annualLeaveMax", 10),
            sick_leave_max: int("sickLeaveMax", 30),
            personal_leave_max: int("personalLeaveMax", 6),
            maternity_leave_max: int("maternityLeaveMax", 120),
            sterilization_leave_max: int("sterilizationLeaveMax", 999),
            unpaid_leave_max: int("unpaidLeaveMax", 999),
            compassionate_leave_max: int("compassionateLeaveMax", 3),
            min_advance_notice_days: int("minAdvanceNoticeDays", 3),
            carry_over_enabled: flag("carryOverEnabled", false),
            carry_over_max_days: int("carryOverMaxDays", 5),
        })
    }

    /// Merge `updates` into the rows for `year`, appending keys that year
    /// does not have yet, then rewrite the whole sheet. The backend offers
    /// no targeted upsert, so this mirrors the user-delete pattern.
    pub async fn update_settings(
        &self,
        updates: &[(String, String)],
        year: i32,
    ) -> Result<(), RepoError> {
        let raw = self.store.read_range(SETTINGS_SHEET, None).await?;
        let mut settings: Vec<Setting> = codec::decode_rows(&raw);

        for (key, value) in updates {
            match settings
                .iter_mut()
                .find(|s| s.key == *key && s.year == year)
            {
                Some(existing) => existing.value = value.clone(),
                None => settings.push(Setting {
                    key: key.clone(),
                    value: value.clone(),
                    year,
                }),
            }
        }

        let mut rows = vec![codec::header_row::<Setting>()];
        rows.extend(settings.iter().map(|s| s.to_row()));
        let write_range = range::block_range(rows.len(), Setting::HEADER.len());
        self.store
            .replace_sheet(SETTINGS_SHEET, raw.len(), &rows, &write_range)
            .await?;
        info!(year, updated = updates.len(), "Rewrote settings sheet");
        Ok(())
    }

    pub async fn all_holidays(&self) -> Result<Vec<Holiday>, RepoError> {
        let rows = self.store.read_range(HOLIDAYS_SHEET, None).await?;
        Ok(codec::decode_rows(&rows))
    }

    pub async fn holidays(&self, year: i32) -> Result<Vec<Holiday>, RepoError> {
        Ok(self
            .all_holidays()
            .await?
            .into_iter()
            .filter(|h| h.year() == Some(year))
            .collect())
    }

    /// Holiday dates for one year, parsed for calendar math. Unparseable
    /// dates are skipped rather than failing the whole lookup.
    pub async fn holiday_dates(&self, year: i32) -> Result<HashSet<NaiveDate>, RepoError> {
        Ok(self
            .holidays(year)
            .await?
            .iter()
            .filter_map(|h| NaiveDate::parse_from_str(&h.date, "%Y-%m-%d").ok())
            .collect())
    }

    pub async fn add_holiday(&self, date: &str, name: &str) -> Result<Holiday, RepoError> {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(RepoError::Validation(format!(
                "holiday date must be YYYY-MM-DD, got '{date}'"
            )));
        }

        let holiday = Holiday {
            date: date.to_string(),
            name: name.to_string(),
        };
        self.store
            .append_rows(HOLIDAYS_SHEET, &[holiday.to_row()])
            .await?;
        Ok(holiday)
    }

    pub async fn delete_holiday(&self, date: &str) -> Result<(), RepoError> {
        let raw = self.store.read_range(HOLIDAYS_SHEET, None).await?;
        let holidays: Vec<Holiday> = codec::decode_rows(&raw);
        if !holidays.iter().any(|h| h.date == date) {
            return Err(RepoError::not_found("Holiday", date));
        }

        let mut rows = vec![codec::header_row::<Holiday>()];
        rows.extend(
            holidays
                .iter()
                .filter(|h| h.date != date)
                .map(|h| h.to_row()),
        );
        let write_range = range::block_range(rows.len(), Holiday::HEADER.len());
        self.store
            .replace_sheet(HOLIDAYS_SHEET, raw.len(), &rows, &write_range)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::memory::MemoryTransport;
    use serde_json::json;

    fn seeded() -> (Arc<MemoryTransport>, SettingsRepo) {
        let transport = Arc::new(MemoryTransport::default());
        transport.create_sheet_blocking(SETTINGS_SHEET);
        transport.append_blocking(SETTINGS_SHEET, vec![codec::header_row::<Setting>()]);
        transport.create_sheet_blocking(HOLIDAYS_SHEET);
        transport.append_blocking(HOLIDAYS_SHEET, vec![codec::header_row::<Holiday>()]);
        let repo = SettingsRepo::new(Arc::new(SheetStore::new(transport.clone())));
        (transport, repo)
    }

    #[actix_web::test]
    async fn policy_settings_fall_back_to_defaults() {
        let (_, repo) = seeded();
        let policy = repo.policy_settings(2025).await.unwrap();
        assert_eq!(policy.annual_leave_max, 10);
        assert_eq!(policy.sterilization_leave_max, 999);
        assert_eq!(policy.min_advance_notice_days, 3);
        assert!(!policy.carry_over_enabled);
    }

    #[actix_web::test]
    async fn stored_values_override_defaults_per_year() {
        let (transport, repo) = seeded();
        transport.append_blocking(
            SETTINGS_SHEET,
            vec![
                vec![json!("annualLeaveMax"), json!("15"), json!(2025)],
                vec![json!("carryOverEnabled"), json!("true"), json!(2025)],
                vec![json!("annualLeaveMax"), json!("12"), json!(2024)],
            ],
        );

        let policy = repo.policy_settings(2025).await.unwrap();
        assert_eq!(policy.annual_leave_max, 15);
        assert!(policy.carry_over_enabled);

        let policy_2024 = repo.policy_settings(2024).await.unwrap();
        assert_eq!(policy_2024.annual_leave_max, 12);
        assert!(!policy_2024.carry_over_enabled);
    }

    #[actix_web::test]
    async fn update_settings_merges_and_appends() {
        let (transport, repo) = seeded();
        transport.append_blocking(
            SETTINGS_SHEET,
            vec![vec![json!("annualLeaveMax"), json!("10"), json!(2025)]],
        );

        repo.update_settings(
            &[
                ("annualLeaveMax".to_string(), "14".to_string()),
                ("carryOverMaxDays".to_string(), "7".to_string()),
            ],
            2025,
        )
        .await
        .unwrap();

        let settings = repo.settings(2025).await.unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(
            settings.iter().find(|s| s.key == "annualLeaveMax").unwrap().value,
            "14"
        );
        assert_eq!(
            settings.iter().find(|s| s.key == "carryOverMaxDays").unwrap().value,
            "7"
        );
    }

    #[actix_web::test]
    async fn holidays_filter_by_year() {
        let (transport, repo) = seeded();
        transport.append_blocking(
            HOLIDAYS_SHEET,
            vec![
                vec![json!("2025-01-01"), json!("New Year")],
                vec![json!("2024-12-31"), json!("Old Year")],
            ],
        );

        let dates = repo.holiday_dates(2025).await.unwrap();
        assert_eq!(dates.len(), 1);
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[actix_web::test]
    async fn add_holiday_rejects_malformed_dates() {
        let (_, repo) = seeded();
        let err = repo.add_holiday("01/01/2025", "bad").await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[actix_web::test]
    async fn delete_holiday_rewrites_without_the_date() {
        let (transport, repo) = seeded();
        transport.append_blocking(
            HOLIDAYS_SHEET,
            vec![
                vec![json!("2025-01-01"), json!("New Year")],
                vec![json!("2025-04-13"), json!("Songkran")],
            ],
        );

        repo.delete_holiday("2025-01-01").await.unwrap();

        let remaining = repo.all_holidays().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].date, "2025-04-13");

        let err = repo.delete_holiday("2025-01-01").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound { .. }));
    }
}
