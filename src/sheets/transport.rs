//! Transport seam between the store client and the remote sheets backend.

use crate::error::StoreError;
use serde_json::Value;

/// One spreadsheet row as returned by the backend: an ordered list of scalar
/// cells. Cells are JSON scalars (string, number or bool).
pub type Row = Vec<Value>;

/// A rectangle of cells destined for one range, used by batch writes.
#[derive(Debug, Clone)]
pub struct RangeUpdate {
    pub sheet: String,
    /// A1 range within the sheet, e.g. "A2:M2".
    pub range: String,
    pub rows: Vec<Row>,
}

/// Raw operations against the remote tabular backend. One call here is one
/// network round trip; retry and error policy live in the store client.
#[async_trait::async_trait]
pub trait SheetsTransport: Send + Sync {
    /// Fetch values for `range`; `None` means the whole sheet. An empty
    /// range yields an empty vec, not an error.
    async fn get_values(&self, sheet: &str, range: Option<&str>) -> Result<Vec<Row>, StoreError>;

    /// Overwrite exactly the cells of `range` with `rows`.
    async fn update_values(
        &self,
        sheet: &str,
        range: &str,
        rows: &[Row],
    ) -> Result<(), StoreError>;

    /// Append `rows` after the last occupied row of the sheet.
    async fn append_values(&self, sheet: &str, rows: &[Row]) -> Result<(), StoreError>;

    /// Blank the cells of `range` (whole sheet when `None`) without removing
    /// row/column structure.
    async fn clear_values(&self, sheet: &str, range: Option<&str>) -> Result<(), StoreError>;

    /// Issue several range overwrites as a single backend call.
    async fn batch_update_values(&self, updates: &[RangeUpdate]) -> Result<(), StoreError>;

    /// Provision a new, empty sheet with the given title.
    async fn add_sheet(&self, title: &str) -> Result<(), StoreError>;

    /// Titles of all sheets in the document.
    async fn sheet_titles(&self) -> Result<Vec<String>, StoreError>;
}
