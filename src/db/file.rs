use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

/// Store persisted to a single JSON file so cached catalog results survive restarts
///
/// Entries live in memory and every mutation rewrites the file. Writes go to a
/// sibling temp file first and are renamed into place. A mutation that cannot
/// be written is undone in memory too.
#[derive(Clone)]
pub struct FileStore {
    entries: MemoryStore,
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Opens the store at `path`, loading whatever a previous run left there
    ///
    /// A missing file starts an empty store. A file with unparseable contents
    /// is logged and discarded. A path that cannot be read at all (such as a
    /// directory) is an error.
    pub async fn open(path: impl AsRef<Path>, capacity_bytes: Option<usize>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Discarding unreadable cache file"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "Opened file cache store"
        );

        Ok(Self {
            entries: MemoryStore::from_entries(entries, capacity_bytes),
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the backing file; callers hold `write_lock`
    async fn persist(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.entries.snapshot().await)?;

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(write_error)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}

/// A full disk is reported like any other full store
fn write_error(e: io::Error) -> StoreError {
    if e.kind() == io::ErrorKind::StorageFull {
        StoreError::CapacityExceeded
    } else {
        StoreError::Io(e)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.entries.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let previous = self.entries.get(key).await?;
        self.entries.set(key, value).await?;

        if let Err(e) = self.persist().await {
            self.entries.restore(key, previous).await;
            return Err(e);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let previous = self.entries.get(key).await?;
        if previous.is_none() {
            return Ok(());
        }
        self.entries.remove(key).await?;

        if let Err(e) = self.persist().await {
            self.entries.restore(key, previous).await;
            return Err(e);
        }
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.entries.keys(prefix).await
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
