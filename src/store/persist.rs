use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::model::{Category, ReminderLead, Task};

/// The single key this crate persists under
pub const DATA_KEY: &str = "data";

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not create data dir {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The persisted object: both collections in a single write, so a crash
/// between mutations can never leave them inconsistent with each other.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Snapshot {
    /// Decode a persisted snapshot. Malformed data falls back to the empty
    /// state rather than failing — first-run seeding repopulates it.
    pub fn decode(raw: &str) -> Snapshot {
        match serde_json::from_str(raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%err, "malformed persisted data, starting from an empty state");
                Snapshot::default()
            }
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The first-run dataset: the two reserved categories plus two study
    /// buckets, and a pair of starter tasks.
    pub fn default_data() -> Snapshot {
        let deadline = Utc
            .with_ymd_and_hms(2026, 9, 1, 18, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let mut learn = Task::draft("c1");
        learn.id = "t1".into();
        learn.title = "Learn to use voila".into();
        learn.description = Some("Tap a task to edit it, swipe to delete".into());
        learn.date_time = Some(deadline);
        learn.reminder = ReminderLead::Hour1;

        let mut shortcuts = Task::draft("c1");
        shortcuts.id = "t2".into();
        shortcuts.title = "Enable shortcuts".into();
        shortcuts.description = Some("Long-press a task and drag it onto a category".into());

        Snapshot {
            categories: vec![
                Category::new("c1", "ToDo"),
                Category::new("c2", "Work"),
                Category::new("c3", "School"),
                Category::new("c4", "Completed"),
            ],
            tasks: vec![learn, shortcuts],
        }
    }
}

/// Asynchronous key-value persistence boundary. The engine only ever reads
/// and writes whole values; durability is best-effort.
pub trait KvStore: Send + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// One JSON file per key under a data directory, replaced atomically
/// (write to a temp file in the same directory, then rename over).
#[derive(Debug)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn open(dir: &Path) -> Result<FileKv, PersistError> {
        fs::create_dir_all(dir).map_err(|e| PersistError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(FileKv {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key);
        let write = |path: &Path| -> std::io::Result<()> {
            let mut temp = NamedTempFile::new_in(&self.dir)?;
            temp.write_all(value.as_bytes())?;
            temp.flush()?;
            temp.persist(path).map_err(|e| e.error)?;
            Ok(())
        };
        write(&path).map_err(|e| PersistError::Write {
            path: path.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }
}

/// In-memory key-value store, shared by clone. Used by tests and as the
/// backing for ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemKv {
    /// Read a key from outside the writer thread
    pub fn read(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    /// Pre-populate a key (e.g. a seeded snapshot) before opening a store
    pub fn preload(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }
}

impl KvStore for MemKv {
    fn get(&self, key: &str) -> Option<String> {
        self.read(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Write-behind snapshot writer: a single worker thread fed full-snapshot
/// payloads. The worker always drains the queue down to the newest payload
/// before writing, so a burst of mutations converges on the last in-memory
/// state and an older write can never clobber a newer one.
#[derive(Debug)]
pub struct SnapshotWriter {
    tx: Option<mpsc::Sender<String>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl SnapshotWriter {
    pub fn spawn(mut kv: impl KvStore) -> SnapshotWriter {
        let (tx, rx) = mpsc::channel::<String>();
        let worker = thread::spawn(move || {
            while let Ok(mut payload) = rx.recv() {
                // collapse any queued-up snapshots to the newest one
                while let Ok(newer) = rx.try_recv() {
                    payload = newer;
                }
                if let Err(err) = kv.set(DATA_KEY, &payload) {
                    // in-memory state stays authoritative for the session
                    warn!(%err, "snapshot write failed");
                }
            }
        });
        SnapshotWriter {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queue the full snapshot for writing. Fire-and-forget: serialization
    /// happens here, on the interaction thread, so the payload captures the
    /// state as of this call even if the write itself lands later.
    pub fn submit(&self, snapshot: &Snapshot) {
        let payload = match snapshot.encode() {
            Ok(p) => p,
            Err(err) => {
                warn!(%err, "could not serialize snapshot");
                return;
            }
        };
        if let Some(tx) = &self.tx
            && tx.send(payload).is_err()
        {
            warn!("snapshot writer is gone, dropping write");
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        // closing the channel lets the worker finish outstanding writes
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
