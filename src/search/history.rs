use std::path::PathBuf;
use std::sync::Mutex;

/// How many past queries are retained.
pub const MAX_HISTORY: usize = 10;

/// Recent search queries, most recent first.
///
/// Persisted as a JSON-encoded array in a single file so history survives
/// restarts. Queries are distinct: recording one that is already present
/// leaves the history unchanged. Persistence failures are logged and the
/// in-memory list keeps working.
pub struct SearchHistory {
    path: PathBuf,
    entries: Mutex<Vec<String>>,
}

impl SearchHistory {
    /// Load history from `path`. A missing or unreadable file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("ignoring corrupt search history at {}: {e}", path.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Record a query. Blank and already-present queries are ignored.
    pub fn record(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e == query) {
            return;
        }

        entries.insert(0, query.to_string());
        entries.truncate(MAX_HISTORY);
        self.persist(&entries);
    }

    /// The retained queries, most recent first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Drop all history, removing the backing file.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "failed to remove search history file {}: {e}",
                    self.path.display()
                );
            }
        }
    }

    fn persist(&self, entries: &[String]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to encode search history: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!(
                "failed to write search history to {}: {e}",
                self.path.display()
            );
        }
    }
}
