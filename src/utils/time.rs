use chrono::{DateTime, Utc};

/// Current wall-clock time in milliseconds, the stamp used for node id
/// synthesis when the host does not supply its own.
pub fn time_millis() -> i64 {
    let time: DateTime<chrono::Utc> = Utc::now();
    time.timestamp_millis()
}
