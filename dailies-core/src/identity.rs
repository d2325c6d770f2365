//! Identity types for dailies entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Status event identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, so ids created later compare greater,
/// which is what the latest-row tie-break relies on.
pub type EventId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EventId (timestamp-sortable).
pub fn new_event_id() -> EventId {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ids_are_creation_ordered() {
        let a = new_event_id();
        let b = new_event_id();
        assert!(a <= b, "UUIDv7 ids must not decrease across calls");
    }

    #[test]
    fn test_event_id_is_v7() {
        let id = new_event_id();
        assert_eq!(id.get_version_num(), 7);
    }
}
