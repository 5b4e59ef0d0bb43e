//! In-memory transport emulating the remote backend for tests, with failure
//! injection and call counters.

use crate::error::StoreError;
use crate::sheets::transport::{RangeUpdate, Row, SheetsTransport};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryTransport {
    sheets: Mutex<BTreeMap<String, Vec<Row>>>,
    /// Remaining calls that should fail before the backend "recovers".
    failures: AtomicU32,
    calls: AtomicUsize,
    mutations: AtomicUsize,
}

fn parse_cell_ref(cell: &str) -> (usize, usize) {
    let split = cell.find(|c: char| c.is_ascii_digit()).unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);
    let col = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize);
    let row: usize = digits.parse().unwrap_or(1);
    (row - 1, col.saturating_sub(1))
}

/// "A2:M2" -> ((1, 0), (1, 12)); a single ref covers one cell.
fn parse_range(range: &str) -> ((usize, usize), (usize, usize)) {
    match range.split_once(':') {
        Some((start, end)) => (parse_cell_ref(start), parse_cell_ref(end)),
        None => {
            let cell = parse_cell_ref(range);
            (cell, cell)
        }
    }
}

impl MemoryTransport {
    pub fn fail_next(&self, calls: u32) {
        self.failures.store(calls, Ordering::SeqCst);
    }

    /// Transport calls observed, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Successful mutating calls (update/append/clear/batch/add-sheet).
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn reset_counters(&self) {
        self.calls.store(0, Ordering::SeqCst);
        self.mutations.store(0, Ordering::SeqCst);
    }

    /// Test setup helpers that bypass the transport seam.
    pub fn create_sheet_blocking(&self, name: &str) {
        self.sheets
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
    }

    pub fn append_blocking(&self, name: &str, rows: Vec<Row>) {
        self.sheets
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .extend(rows);
    }

    pub fn rows_blocking(&self, name: &str) -> Vec<Row> {
        self.sheets
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn observe(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != u32::MAX {
                self.failures.fetch_sub(1, Ordering::SeqCst);
            }
            return Err(StoreError::Api {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn write_rect(sheet: &mut Vec<Row>, range: &str, rows: &[Row]) {
        let ((row_start, col_start), _) = parse_range(range);
        for (i, new_row) in rows.iter().enumerate() {
            let target_row = row_start + i;
            while sheet.len() <= target_row {
                sheet.push(Vec::new());
            }
            let row = &mut sheet[target_row];
            for (j, cell) in new_row.iter().enumerate() {
                let target_col = col_start + j;
                while row.len() <= target_col {
                    row.push(Value::String(String::new()));
                }
                row[target_col] = cell.clone();
            }
        }
    }
}

#[async_trait::async_trait]
impl SheetsTransport for MemoryTransport {
    async fn get_values(&self, sheet: &str, range: Option<&str>) -> Result<Vec<Row>, StoreError> {
        self.observe()?;
        let sheets = self.sheets.lock().unwrap();
        let rows = sheets.get(sheet).cloned().unwrap_or_default();
        let rows = match range {
            None => rows,
            Some(r) => {
                let ((row_start, _), (row_end, _)) = parse_range(r);
                rows.into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i >= row_start && *i <= row_end)
                    .map(|(_, row)| row)
                    .collect()
            }
        };
        // The backend never returns fully blank trailing rows.
        let last_occupied = rows
            .iter()
            .rposition(|row| row.iter().any(|c| !cell_is_blank(c)))
            .map(|i| i + 1)
            .unwrap_or(0);
        Ok(rows.into_iter().take(last_occupied).collect())
    }

    async fn update_values(
        &self,
        sheet: &str,
        range: &str,
        rows: &[Row],
    ) -> Result<(), StoreError> {
        self.observe()?;
        let mut sheets = self.sheets.lock().unwrap();
        let target = sheets.entry(sheet.to_string()).or_default();
        Self::write_rect(target, range, rows);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn append_values(&self, sheet: &str, rows: &[Row]) -> Result<(), StoreError> {
        self.observe()?;
        let mut sheets = self.sheets.lock().unwrap();
        sheets
            .entry(sheet.to_string())
            .or_default()
            .extend(rows.iter().cloned());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear_values(&self, sheet: &str, range: Option<&str>) -> Result<(), StoreError> {
        self.observe()?;
        let mut sheets = self.sheets.lock().unwrap();
        let target = sheets.entry(sheet.to_string()).or_default();
        match range {
            None => target.clear(),
            Some(r) => {
                let ((row_start, col_start), (row_end, col_end)) = parse_range(r);
                for row in target
                    .iter_mut()
                    .enumerate()
                    .filter(|(i, _)| *i >= row_start && *i <= row_end)
                    .map(|(_, row)| row)
                {
                    for col in col_start..row.len().min(col_end + 1) {
                        row[col] = Value::String(String::new());
                    }
                }
            }
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn batch_update_values(&self, updates: &[RangeUpdate]) -> Result<(), StoreError> {
        self.observe()?;
        let mut sheets = self.sheets.lock().unwrap();
        for update in updates {
            let target = sheets.entry(update.sheet.clone()).or_default();
            Self::write_rect(target, &update.range, &update.rows);
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_sheet(&self, title: &str) -> Result<(), StoreError> {
        self.observe()?;
        let mut sheets = self.sheets.lock().unwrap();
        if sheets.contains_key(title) {
            return Err(StoreError::Api {
                status: reqwest::StatusCode::BAD_REQUEST,
                message: format!("sheet {title} already exists"),
            });
        }
        sheets.insert(title.to_string(), Vec::new());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, StoreError> {
        self.observe()?;
        Ok(self.sheets.lock().unwrap().keys().cloned().collect())
    }
}

fn cell_is_blank(cell: &Value) -> bool {
    match cell {
        Value::String(s) => s.trim().is_empty(),
        Value::Null => true,
        _ => false,
    }
}
