//! JSON-snapshot-backed appointment store.
//!
//! The snapshot is a single JSON object mapping `"YYYY-MM-DD HH:MM"` keys to
//! task descriptions, pretty-printed UTF-8. A missing or unparsable file
//! loads as an empty store; save failures are surfaced to the caller so a
//! mutation is never reported durable when it is not.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use orbis_core::timekey;

pub struct AppointmentStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl AppointmentStore {
    /// Load the snapshot at `path`, degrading to an empty store when the file
    /// is absent or corrupt. Keys that fail timestamp validation are retained
    /// (never auto-deleted) but flagged with a data-integrity warning.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "snapshot unparsable, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot yet, starting empty");
                HashMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot unreadable, starting empty");
                HashMap::new()
            }
        };

        let invalid = entries
            .keys()
            .filter(|k| timekey::parse_key(k).is_none())
            .count();
        if invalid > 0 {
            warn!(
                path = %path.display(),
                count = invalid,
                "snapshot contains keys that are not valid time keys"
            );
        }

        Self { path, entries }
    }

    /// Persist the current contents over the snapshot file.
    pub fn save(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        std::fs::write(&self.path, json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: String, text: String) -> Option<String> {
        self.entries.insert(key, text)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw key/text pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
