//! Profile persistence.
//!
//! Loading never fails from the caller's point of view: a missing or corrupt
//! profile yields a fresh default. Saving never fails either; I/O errors are
//! logged and the next save tries again.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::PlayerProfile;

const APP_DIR: &str = "nature-quiz";
const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stored profile is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable home for the single player profile.
pub trait ProfileStore {
    /// Returns the stored profile, or a default one if none is usable.
    fn load(&self) -> PlayerProfile;

    /// Persists `profile`, logging failures.
    fn save(&self, profile: &PlayerProfile);
}

/// Stores the profile as a JSON file, written atomically.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<data dir>/nature-quiz/profile.json`, or the working directory when
    /// the platform has no data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(PROFILE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored profile. `Ok(None)` means nothing has been saved yet.
    pub fn try_load(&self) -> Result<Option<PlayerProfile>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut profile: PlayerProfile = serde_json::from_str(&content)?;
        profile.normalize();
        Ok(Some(profile))
    }

    /// Writes to a sibling temp file and renames it over the profile, so a
    /// reader sees either the old or the new document.
    pub fn try_save(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(profile)?;

        // A poisoned lock only means an earlier writer panicked; the file
        // itself is still whole thanks to the rename.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).map_err(io_error(&tmp_path))?;
        file.write_all(&json).map_err(io_error(&tmp_path))?;
        file.sync_all().map_err(io_error(&tmp_path))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))?;
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> PlayerProfile {
        match self.try_load() {
            Ok(Some(profile)) => {
                tracing::debug!("loaded profile from {}", self.path.display());
                profile
            }
            Ok(None) => {
                tracing::info!("no profile at {}, starting fresh", self.path.display());
                PlayerProfile::default()
            }
            Err(err) => {
                tracing::warn!("discarding unusable profile: {err}");
                PlayerProfile::default()
            }
        }
    }

    fn save(&self, profile: &PlayerProfile) {
        match self.try_save(profile) {
            Ok(()) => tracing::debug!("saved profile to {}", self.path.display()),
            Err(err) => tracing::error!("failed to save profile: {err}"),
        }
    }
}

/// Keeps the profile in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<PlayerProfile>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: PlayerProfile) -> Self {
        Self {
            saved: Mutex::new(Some(profile)),
            saves: Mutex::new(0),
        }
    }

    pub fn saved(&self) -> Option<PlayerProfile> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> PlayerProfile {
        self.saved().unwrap_or_default()
    }

    fn save(&self, profile: &PlayerProfile) {
        *self.saved.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(profile.clone());
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
    }
}

/// Moves saves off the control task.
///
/// Snapshots go through a channel to a single writer task, so writes never
/// overlap and the newest snapshot is the one that lands on disk.
pub struct BackgroundStore<S> {
    inner: Arc<S>,
    sender: mpsc::UnboundedSender<PlayerProfile>,
    writer: JoinHandle<()>,
}

impl<S> BackgroundStore<S>
where
    S: ProfileStore + Send + Sync + 'static,
{
    /// Spawns the writer task. Must be called from within a tokio runtime.
    pub fn spawn(inner: S) -> Self {
        let inner = Arc::new(inner);
        let (sender, receiver) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_loop(Arc::clone(&inner), receiver));

        Self {
            inner,
            sender,
            writer,
        }
    }

    /// Waits for every queued snapshot to be written, then stops the writer.
    pub async fn close(self) {
        let Self { sender, writer, .. } = self;
        drop(sender);

        if let Err(err) = writer.await {
            tracing::error!("profile writer task failed: {err}");
        }
    }
}

async fn write_loop<S>(inner: Arc<S>, mut receiver: mpsc::UnboundedReceiver<PlayerProfile>)
where
    S: ProfileStore + Send + Sync + 'static,
{
    while let Some(mut profile) = receiver.recv().await {
        // Only the newest pending snapshot matters.
        while let Ok(newer) = receiver.try_recv() {
            profile = newer;
        }

        let store = Arc::clone(&inner);
        if let Err(err) = tokio::task::spawn_blocking(move || store.save(&profile)).await {
            tracing::error!("profile save panicked: {err}");
        }
    }
}

impl<S> ProfileStore for BackgroundStore<S>
where
    S: ProfileStore + Send + Sync + 'static,
{
    fn load(&self) -> PlayerProfile {
        self.inner.load()
    }

    fn save(&self, profile: &PlayerProfile) {
        if self.sender.send(profile.clone()).is_err() {
            tracing::warn!("profile writer stopped, saving on the caller's thread");
            self.inner.save(profile);
        }
    }
}
