//! Per-device counter and bookmark.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::DeviceEvent;

/// Seconds from 0001-01-01T00:00:00Z to the Unix epoch.
const ZERO_TIMESTAMP_SECS: i64 = -62_135_596_800;

/// Bookmark of a device that has never been polled: 0001-01-01T00:00:00Z,
/// the zero time older snapshots were written with.
pub fn zero_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ZERO_TIMESTAMP_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Dedup state for one device.
///
/// `counter` and `bookmark` never decrease. An event is counted only when its
/// timestamp is strictly after the bookmark as it stood before the batch
/// containing it was absorbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub device_id: u64,
    #[serde(default, alias = "my_counter")]
    pub counter: u64,
    #[serde(default = "zero_timestamp", alias = "last_timestamp")]
    pub bookmark: DateTime<Utc>,
}

/// What a single [`LedgerEntry::absorb`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Absorbed {
    /// Events that advanced the counter.
    pub counted: usize,
    /// Events with a parsable timestamp.
    pub parsed: usize,
    /// Events skipped because their timestamp did not parse.
    pub rejected: usize,
}

impl LedgerEntry {
    /// A fresh entry: counter 0, bookmark at the zero timestamp.
    pub fn new(device_id: u64) -> Self {
        Self {
            device_id,
            counter: 0,
            bookmark: zero_timestamp(),
        }
    }

    /// Fold a batch of events into the entry.
    ///
    /// Batch order does not matter. Events at or before the pre-batch
    /// bookmark are ignored; the bookmark then moves to the newest parsed
    /// timestamp. Two events sharing a timestamp in the same batch both count.
    pub fn absorb(&mut self, events: &[DeviceEvent]) -> Absorbed {
        let previous = self.bookmark;
        let mut max_seen = self.bookmark;
        let mut outcome = Absorbed::default();

        for event in events {
            let Some(timestamp) = parse_timestamp(&event.created_at) else {
                tracing::debug!(
                    "Skipping event {} for device {}: unparsable timestamp {:?}",
                    event.id,
                    self.device_id,
                    event.created_at
                );
                outcome.rejected += 1;
                continue;
            };
            outcome.parsed += 1;

            if timestamp > previous {
                self.counter += 1;
                outcome.counted += 1;
            }
            if timestamp > max_seen {
                max_seen = timestamp;
            }
        }

        self.bookmark = max_seen;
        outcome
    }
}

/// Parse an RFC 3339 event timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
