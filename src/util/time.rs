use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current time in milliseconds since the UNIX epoch
pub fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

