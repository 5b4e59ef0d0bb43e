use crate::sheets::codec::{self, RowCodec};
use crate::sheets::transport::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// A configured non-working date. The date string (YYYY-MM-DD) acts as the
/// key within the Holidays sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Holiday {
    #[schema(example = "2025-04-13")]
    pub date: String,
    #[schema(example = "วันสงกรานต์")]
    pub name: String,
}

impl Holiday {
    pub fn year(&self) -> Option<i32> {
        self.date.get(0..4)?.parse().ok()
    }
}

impl RowCodec for Holiday {
    const HEADER: &'static [&'static str] = &["date", "name"];

    fn to_row(&self) -> Row {
        vec![json!(self.date), json!(self.name)]
    }

    fn from_row(row: &[Value]) -> Self {
        Self {
            date: codec::cell_str(row, 0),
            name: codec::cell_str(row, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let holiday = Holiday {
            date: "2025-12-31".to_string(),
            name: "วันสิ้นปี".to_string(),
        };
        assert_eq!(Holiday::from_row(&holiday.to_row()), holiday);
    }

    #[test]
    fn year_comes_from_the_date_prefix() {
        let holiday = Holiday {
            date: "2025-01-01".to_string(),
            name: "x".to_string(),
        };
        assert_eq!(holiday.year(), Some(2025));
        assert_eq!(Holiday { date: "bad".to_string(), name: String::new() }.year(), None);
    }
}
