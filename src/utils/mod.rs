pub mod business_days;

/// Current time as the RFC 3339 string stored in timestamp cells.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
