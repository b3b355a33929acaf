use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Name reported in every JSON envelope.
pub fn service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string())
}

/// Opaque record identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Creation timestamp, truncated to milliseconds like the stored ISO-8601 values.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Posts returned per list page.
pub const PAGE_SIZE: usize = 15;
