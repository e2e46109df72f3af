//! Per-device event deduplication ledger.
//!
//! The history endpoint returns the latest events for a device with no
//! cursor, so consecutive polls overlap. The ledger keeps one bookmark per
//! device (the newest timestamp already counted) and a monotonic counter, and
//! persists both together with the bearer credential as a single snapshot.
//!
//! All access goes through one mutex covering the whole snapshot, so absorbs,
//! saves and credential reads/writes are serialized against each other.

pub mod entry;
pub mod snapshot;

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::types::DeviceEvent;
use crate::auth::Credential;
use crate::error::LedgerError;
use crate::traits::{CredentialStore, CredentialsError};

pub use entry::{parse_timestamp, zero_timestamp, Absorbed, LedgerEntry};
pub use snapshot::Snapshot;

#[derive(Debug, Default)]
struct LedgerState {
    credential: Option<Credential>,
    entries: HashMap<u64, LedgerEntry>,
}

impl LedgerState {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            credential: snapshot.credential,
            entries: snapshot
                .entries
                .into_iter()
                .map(|entry| (entry.device_id, entry))
                .collect(),
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        let mut entries: Vec<LedgerEntry> = self.entries.values().cloned().collect();
        entries.sort_by_key(|entry| entry.device_id);
        Snapshot {
            credential: self.credential.clone(),
            entries,
        }
    }
}

/// Durable device-id to counter/bookmark mapping plus the stored credential.
///
/// Shared between the poller and the session broker as `Arc<Ledger>`.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// An empty ledger that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Load the ledger at `path`. A missing or unreadable file gives an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = LedgerState::from_snapshot(Snapshot::read(&path));
        tracing::debug!(
            "Loaded ledger {} with {} entries",
            path.display(),
            state.entries.len()
        );
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // Every update replaces whole values, so a poisoned guard still holds
        // consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fold a history batch into the device's entry and return its counter.
    ///
    /// The entry is created on first sight of a device and never removed.
    /// Unparsable timestamps are skipped; only a non-empty batch in which
    /// nothing parsed is reported, as [`LedgerError::ParseAllFailed`], and
    /// leaves the counter and bookmark unchanged.
    pub fn absorb_events(&self, device_id: u64, events: &[DeviceEvent]) -> Result<u64, LedgerError> {
        let mut state = self.lock();

        let mut entry = state
            .entries
            .get(&device_id)
            .cloned()
            .unwrap_or_else(|| LedgerEntry::new(device_id));
        let outcome = entry.absorb(events);
        let counter = entry.counter;
        state.entries.insert(device_id, entry);

        if outcome.counted > 0 {
            tracing::debug!(
                "Device {}: {} new events, counter {}",
                device_id,
                outcome.counted,
                counter
            );
        }

        if !events.is_empty() && outcome.parsed == 0 {
            return Err(LedgerError::ParseAllFailed {
                device_id,
                rejected: outcome.rejected,
            });
        }
        Ok(counter)
    }

    /// Current counter for a device, 0 if it has never been seen.
    pub fn count(&self, device_id: u64) -> u64 {
        self.lock()
            .entries
            .get(&device_id)
            .map(|entry| entry.counter)
            .unwrap_or(0)
    }

    pub fn entry(&self, device_id: u64) -> Option<LedgerEntry> {
        self.lock().entries.get(&device_id).cloned()
    }

    /// All entries ordered by device id.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.lock().to_snapshot().entries
    }

    pub fn credential(&self) -> Option<Credential> {
        self.lock().credential.clone()
    }

    /// Replace the credential in memory without saving.
    pub fn set_credential(&self, credential: Credential) {
        self.lock().credential = Some(credential);
    }

    /// Persist the whole snapshot, replacing the previous file.
    pub fn save(&self) -> Result<(), LedgerError> {
        let state = self.lock();
        state.to_snapshot().write(&self.path)?;
        tracing::debug!(
            "Saved ledger {} ({} entries)",
            self.path.display(),
            state.entries.len()
        );
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for Ledger {
    async fn fetch(&self) -> Result<Option<Credential>, CredentialsError> {
        Ok(self.credential())
    }

    async fn store(&self, credential: &Credential) -> Result<(), CredentialsError> {
        let mut state = self.lock();
        state.credential = Some(credential.clone());
        state
            .to_snapshot()
            .write(&self.path)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }
}
