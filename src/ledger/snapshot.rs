//! On-disk form of the ledger.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::entry::LedgerEntry;
use crate::auth::Credential;
use crate::config::restrict_permissions;
use crate::error::LedgerError;

/// Everything the ledger persists, written as one JSON document.
///
/// Older state files used `token`, `ding_counts`, `my_counter` and
/// `last_timestamp`; those names are still accepted when loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, alias = "token", skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    #[serde(default, alias = "ding_counts", deserialize_with = "null_as_empty")]
    pub entries: Vec<LedgerEntry>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<LedgerEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<LedgerEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Snapshot {
    /// Read a snapshot, treating a missing or unreadable file as empty.
    pub fn read(path: &Path) -> Snapshot {
        if !path.exists() {
            tracing::debug!("No state file at {}; starting empty", path.display());
            return Snapshot::default();
        }

        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read state {}: {}; starting empty", path.display(), e);
                return Snapshot::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Failed to parse state {}: {}; starting empty", path.display(), e);
                Snapshot::default()
            }
        }
    }

    /// Write the snapshot to a sibling temp file, then rename it over `path`.
    pub fn write(&self, path: &Path) -> Result<(), LedgerError> {
        let write_err = |source| LedgerError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let data = serde_json::to_vec_pretty(self)?;
        let tmp = temp_path(path);

        let file = File::create(&tmp).map_err(write_err)?;
        restrict_permissions(&tmp).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&data).map_err(write_err)?;
        let file = writer
            .into_inner()
            .map_err(|e| write_err(e.into_error()))?;
        file.sync_all().map_err(write_err)?;

        fs::rename(&tmp, path).map_err(write_err)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::read(&dir.path().join("ring-state.json"));
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_read_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ring-state.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Snapshot::read(&path), Snapshot::default());
    }

    #[test]
    fn test_read_legacy_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ring-state.json");
        fs::write(
            &path,
            r#"{
                "token": {"access_token": "legacy", "token_type": "Bearer", "expiry": "2024-06-01T10:00:00.5+02:00"},
                "ding_counts": [{"device_id": 3, "my_counter": 7, "last_timestamp": "2024-05-01T10:00:00Z"}]
            }"#,
        )
        .unwrap();

        let snapshot = Snapshot::read(&path);
        assert_eq!(snapshot.credential.unwrap().access_token, "legacy");
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].counter, 7);
    }

    #[test]
    fn test_read_null_entries() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"token": null, "ding_counts": null}"#).unwrap();
        assert!(snapshot.credential.is_none());
        assert!(snapshot.entries.is_empty());
    }

    #[test]
    fn test_write_replaces_file_without_leaving_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("ring-state.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "old").unwrap();

        let snapshot = Snapshot {
            credential: Some(Credential::new("tok")),
            entries: vec![LedgerEntry::new(1)],
        };
        snapshot.write(&path).unwrap();

        assert_eq!(Snapshot::read(&path), snapshot);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ring-state.json");
        Snapshot::default().write(&path).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ring-state.json");
        Snapshot::default().write(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
