//! Store client: the single point of contact with the tabular backend.
//!
//! Every read and mutation goes through a retry-with-exponential-backoff
//! wrapper. There is no jitter and no circuit breaker; business errors are
//! never retried.

use crate::error::StoreError;
use crate::sheets::transport::{RangeUpdate, Row, SheetsTransport};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// High-level sheet operations over a [`SheetsTransport`].
pub struct SheetStore {
    transport: Arc<dyn SheetsTransport>,
    retry: RetryPolicy,
}

impl SheetStore {
    pub fn new(transport: Arc<dyn SheetsTransport>) -> Self {
        Self::with_retry(transport, RetryPolicy::default())
    }

    pub fn with_retry(transport: Arc<dyn SheetsTransport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Raw rows of `range` (whole sheet when `None`). An empty range is an
    /// empty vec, never an error.
    pub async fn read_range(
        &self,
        sheet: &str,
        range: Option<&str>,
    ) -> Result<Vec<Row>, StoreError> {
        self.with_backoff("read", || self.transport.get_values(sheet, range))
            .await
    }

    /// Overwrite the rectangle `range`; the caller supplies bounds matching
    /// the shape of `rows`.
    pub async fn write_range(
        &self,
        sheet: &str,
        range: &str,
        rows: &[Row],
    ) -> Result<(), StoreError> {
        self.with_backoff("write", || self.transport.update_values(sheet, range, rows))
            .await
    }

    pub async fn append_rows(&self, sheet: &str, rows: &[Row]) -> Result<(), StoreError> {
        self.with_backoff("append", || self.transport.append_values(sheet, rows))
            .await
    }

    pub async fn clear_range(&self, sheet: &str, range: Option<&str>) -> Result<(), StoreError> {
        self.with_backoff("clear", || self.transport.clear_values(sheet, range))
            .await
    }

    pub async fn create_sheet(&self, name: &str) -> Result<(), StoreError> {
        self.with_backoff("create-sheet", || self.transport.add_sheet(name))
            .await
    }

    /// Existence probe. Any backend failure reads as "does not exist":
    /// setup is idempotent and safe to retry wholesale, so a transient error
    /// here must not abort it.
    pub async fn sheet_exists(&self, name: &str) -> bool {
        match self
            .with_backoff("list-sheets", || self.transport.sheet_titles())
            .await
        {
            Ok(titles) => titles.iter().any(|t| t == name),
            Err(e) => {
                warn!(sheet = name, error = %e, "Existence probe failed, treating as absent");
                false
            }
        }
    }

    /// Multi-range overwrite issued as one backend call.
    pub async fn batch_write(&self, updates: &[RangeUpdate]) -> Result<(), StoreError> {
        self.with_backoff("batch-write", || self.transport.batch_update_values(updates))
            .await
    }

    /// Clear-and-rewrite of a whole sheet, the stand-in for delete/upsert-
    /// by-key the backend lacks. Re-reads the row count immediately before
    /// clearing so a concurrent writer is at least detected, never silently
    /// overwritten. `expected_rows` is the occupied row count (header
    /// included) the caller based its new contents on.
    pub async fn replace_sheet(
        &self,
        sheet: &str,
        expected_rows: usize,
        rows: &[Row],
        range: &str,
    ) -> Result<(), StoreError> {
        let current = self.read_range(sheet, None).await?;
        if current.len() != expected_rows {
            return Err(StoreError::ConcurrentModification {
                sheet: sheet.to_string(),
                expected: expected_rows,
                found: current.len(),
            });
        }

        self.clear_range(sheet, None).await?;
        self.write_range(sheet, range, rows).await
    }

    async fn with_backoff<T, F, Fut>(&self, op: &str, call: F) -> Result<T, StoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut last_err = None;

        for attempt in 0..self.retry.max_attempts {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    debug!(op, attempt, error = %e, "Store call failed");
                    if attempt + 1 < self.retry.max_attempts {
                        let delay = self.retry.base_delay * 2u32.pow(attempt);
                        tokio::time::sleep(delay).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.expect("at least one attempt was made"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::memory::MemoryTransport;
    use serde_json::json;
    use std::time::Instant;

    fn store(transport: Arc<MemoryTransport>) -> SheetStore {
        SheetStore::new(transport)
    }

    #[actix_web::test]
    async fn empty_range_reads_as_empty_vec() {
        let transport = Arc::new(MemoryTransport::default());
        transport.create_sheet_blocking("Users");

        let rows = store(transport).read_range("Users", None).await.unwrap();
        assert!(rows.is_empty());
    }

    #[actix_web::test]
    async fn retries_exactly_max_attempts_with_doubling_backoff() {
        let transport = Arc::new(MemoryTransport::default());
        transport.create_sheet_blocking("Users");
        transport.fail_next(u32::MAX);

        let started = Instant::now();
        let result = store(transport.clone()).read_range("Users", None).await;

        assert!(result.is_err());
        assert_eq!(transport.call_count(), 3);
        // 100ms + 200ms of backoff precede the final attempt.
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[actix_web::test]
    async fn recovers_when_a_later_attempt_succeeds() {
        let transport = Arc::new(MemoryTransport::default());
        transport.create_sheet_blocking("Users");
        transport
            .append_blocking("Users", vec![vec![json!("EMP001")]]);
        transport.fail_next(2);

        let rows = store(transport.clone()).read_range("Users", None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(transport.call_count(), 3);
    }

    #[actix_web::test]
    async fn sheet_exists_swallows_backend_errors() {
        let transport = Arc::new(MemoryTransport::default());
        transport.fail_next(u32::MAX);

        assert!(!store(transport).sheet_exists("Users").await);
    }

    #[actix_web::test]
    async fn batch_write_hits_several_ranges_in_one_call() {
        let transport = Arc::new(MemoryTransport::default());
        transport.create_sheet_blocking("Users");
        transport.append_blocking(
            "Users",
            vec![vec![json!("a"), json!("b")], vec![json!("c"), json!("d")]],
        );

        store(transport.clone())
            .batch_write(&[
                RangeUpdate {
                    sheet: "Users".to_string(),
                    range: "A1:B1".to_string(),
                    rows: vec![vec![json!("x"), json!("y")]],
                },
                RangeUpdate {
                    sheet: "Users".to_string(),
                    range: "A2:B2".to_string(),
                    rows: vec![vec![json!("z"), json!("w")]],
                },
            ])
            .await
            .unwrap();

        let rows = transport.rows_blocking("Users");
        assert_eq!(rows[0], vec![json!("x"), json!("y")]);
        assert_eq!(rows[1], vec![json!("z"), json!("w")]);
        assert_eq!(transport.mutation_count(), 1);
    }

    #[actix_web::test]
    async fn replace_sheet_detects_concurrent_growth() {
        let transport = Arc::new(MemoryTransport::default());
        transport.create_sheet_blocking("Users");
        transport.append_blocking("Users", vec![vec![json!("header")], vec![json!("EMP001")]]);

        // Caller read 1 row, but the sheet holds 2 by the time it rewrites.
        let err = store(transport)
            .replace_sheet("Users", 1, &[vec![json!("header")]], "A1:A1")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConcurrentModification { .. }));
    }
}
