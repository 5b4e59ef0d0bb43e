use crate::sheets::codec::{self, RowCodec};
use crate::sheets::transport::Row;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// One policy entry, keyed by (key, year). The value is a string the caller
/// interprets as int or bool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Setting {
    #[schema(example = "annualLeaveMax")]
    pub key: String,
    #[schema(example = "10")]
    pub value: String,
    #[schema(example = 2025)]
    pub year: i32,
}

/// Typed view of the policy keys for one calendar year, with defaults for
/// anything absent from the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicySettings {
    pub annual_leave_max: u32,
    pub sick_leave_max: u32,
    pub personal_leave_max: u32,
    pub maternity_leave_max: u32,
    pub sterilization_leave_max: u32,
    pub unpaid_leave_max: u32,
    pub compassionate_leave_max: u32,
    pub min_advance_notice_days: u32,
    pub carry_over_enabled: bool,
    pub carry_over_max_days: u32,
}

impl RowCodec for Setting {
    const HEADER: &'static [&'static str] = &["key", "value", "year"];

    fn to_row(&self) -> Row {
        vec![json!(self.key), json!(self.value), json!(self.year)]
    }

    fn from_row(row: &[Value]) -> Self {
        Self {
            key: codec::cell_str(row, 0),
            value: codec::cell_str(row, 1),
            year: codec::cell_u32(row, 2, chrono::Utc::now().year() as u32) as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips() {
        let setting = Setting {
            key: "carryOverEnabled".to_string(),
            value: "false".to_string(),
            year: 2025,
        };
        assert_eq!(Setting::from_row(&setting.to_row()), setting);
    }

    #[test]
    fn stringified_year_is_coerced() {
        let row = vec![json!("annualLeaveMax"), json!("10"), json!("2024")];
        assert_eq!(Setting::from_row(&row).year, 2024);
    }
}
