//! Durable backends for the session record.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};

use super::session::SessionData;

/// Session file name; the record is namespaced as `auth`.
const SESSION_FILE: &str = "auth.json";

/// Where the session record lives between process runs.
pub trait SessionStorage: Send + Sync {
    /// Read the stored record, or `None` if nothing has been written yet.
    fn load(&self) -> Result<Option<SessionData>>;

    /// Overwrite the stored record.
    fn save(&self, data: &SessionData) -> Result<()>;
}

/// JSON file in the application data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<SessionData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read session file")?;
        let data = serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(data))
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(data)?;

        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, contents.as_bytes())?;
        std::fs::rename(&tmp, &self.path).context("Failed to replace session file")?;
        Ok(())
    }
}

/// Write `contents` to a freshly created file that is owner-only (0600 on
/// unix) from the moment it exists.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    // A leftover temp file would keep its old mode, so start from scratch
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).context("Failed to remove stale session temp file"),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .context("Failed to create session file")?;
    file.write_all(contents)
        .context("Failed to write session file")?;
    file.sync_all().context("Failed to flush session file")?;
    Ok(())
}

/// In-process storage. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Option<SessionData>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last record written, if any.
    pub fn record(&self) -> Option<SessionData> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<SessionData>> {
        Ok(self.record())
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(data.clone());
        Ok(())
    }
}
