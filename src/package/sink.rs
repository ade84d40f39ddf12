use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::Context as _;

use crate::foundation::error::{SlideError, SlideResult};

/// Where a saved archive ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedArchive {
    pub location: String,
    pub bytes: u64,
}

/// Destination for finished archives.
///
/// A save either fully replaces the named archive or leaves the previous one untouched.
pub trait ArchiveSink: Send {
    fn save(&mut self, suggested_name: &str, bytes: &[u8]) -> SlideResult<SavedArchive>;
}

/// Writes archives into a directory via temp file + rename.
#[derive(Clone, Debug)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

impl ArchiveSink for FileSink {
    #[tracing::instrument(skip(self, bytes), fields(dir = %self.dir.display(), len = bytes.len()))]
    fn save(&mut self, suggested_name: &str, bytes: &[u8]) -> SlideResult<SavedArchive> {
        let name = checked_file_name(suggested_name)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;

        let final_path = self.dir.join(name);
        let tmp_path = self.dir.join(format!(
            ".{name}.{}-{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let mut guard = TempFileGuard(Some(tmp_path.clone()));

        std::fs::write(&tmp_path, bytes)
            .with_context(|| format!("write '{}'", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &final_path).with_context(|| {
            format!(
                "rename '{}' -> '{}'",
                tmp_path.display(),
                final_path.display()
            )
        })?;
        guard.0 = None;

        tracing::info!(path = %final_path.display(), "archive written");
        Ok(SavedArchive {
            location: final_path.display().to_string(),
            bytes: bytes.len() as u64,
        })
    }
}

/// Keeps saved archives in memory. Clones share storage.
#[derive(Clone, Debug, Default)]
pub struct InMemorySink {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `(name, bytes)` pairs in save order.
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ArchiveSink for InMemorySink {
    fn save(&mut self, suggested_name: &str, bytes: &[u8]) -> SlideResult<SavedArchive> {
        let name = checked_file_name(suggested_name)?;
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((name.to_owned(), bytes.to_vec()));
        Ok(SavedArchive {
            location: format!("memory:{name}"),
            bytes: bytes.len() as u64,
        })
    }
}

/// Save on the current runtime's blocking pool without making the caller wait.
///
/// Failures are logged, not returned. The handle may be dropped; awaiting it only tells you the
/// save attempt finished.
///
/// # Panics
///
/// Panics when called outside a tokio runtime. Use [`save_detached_on`] from plain threads.
pub fn save_detached<S>(
    sink: S,
    suggested_name: String,
    bytes: Vec<u8>,
) -> tokio::task::JoinHandle<Option<SavedArchive>>
where
    S: ArchiveSink + 'static,
{
    save_detached_on(&tokio::runtime::Handle::current(), sink, suggested_name, bytes)
}

/// [`save_detached`] on an explicit runtime; safe to call from threads outside any runtime.
pub fn save_detached_on<S>(
    runtime: &tokio::runtime::Handle,
    mut sink: S,
    suggested_name: String,
    bytes: Vec<u8>,
) -> tokio::task::JoinHandle<Option<SavedArchive>>
where
    S: ArchiveSink + 'static,
{
    runtime.spawn_blocking(move || match sink.save(&suggested_name, &bytes) {
        Ok(saved) => Some(saved),
        Err(err) => {
            tracing::warn!(%err, name = %suggested_name, "detached archive save failed");
            None
        }
    })
}

fn checked_file_name(name: &str) -> SlideResult<&str> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.starts_with('.');
    if !plain {
        return Err(SlideError::validation(format!(
            "archive name '{name}' must be a plain file name"
        )));
    }
    Ok(name)
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/package/sink.rs"]
mod tests;
