//! Player state persistence with file locking.
//!
//! The core never owns game state; this is the store the CLI keeps it in.
//! Writers hold `state.json.lock` and go through a temp file renamed over
//! the original.

use crate::{Error, PlayerResourceState, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

impl PlayerResourceState {
    /// Load player state from a file with shared locking
    ///
    /// Returns `None` if the file doesn't exist or can't be read or parsed;
    /// problems other than absence are logged as warnings.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!("No state file at {:?}", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open state file {:?}: {}. Starting over.", path, e);
                return Ok(None);
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock state file {:?}: {}. Starting over.", path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read state file {:?}: {}. Starting over.", path, e);
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<PlayerResourceState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded player state from {:?}", path);
                Ok(Some(state))
            }
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}. Starting over.", path, e);
                Ok(None)
            }
        }
    }

    /// Load player state, or start a new game with `starting_wealth`
    pub fn load_or_new(path: &Path, starting_wealth: u32) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_else(|| Self::new_game(starting_wealth)))
    }

    /// Save player state to a file with exclusive locking
    ///
    /// Holds the state's lock file while atomically writing state by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let lock = acquire_write_lock(path)?;
        self.write_atomic(path)?;
        lock.unlock()?;
        Ok(())
    }

    /// Load state, modify it, and save it back
    ///
    /// The lock file is held from load through rename, so concurrent
    /// updates apply one after another instead of overwriting each other.
    pub fn update<F, T>(path: &Path, starting_wealth: u32, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut PlayerResourceState) -> T,
    {
        let lock = acquire_write_lock(path)?;
        let mut state = Self::load_or_new(path, starting_wealth)?;
        let output = f(&mut state);
        state.write_atomic(path)?;
        lock.unlock()?;
        Ok((state, output))
    }

    fn write_atomic(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("State path {:?} has no parent", path)))?;
        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved player state to {:?}", path);
        Ok(())
    }
}

/// `state.json` -> `state.json.lock`, next to the state file
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Open the lock file beside `path` and take it exclusively
///
/// The state file itself is replaced on every save, so it can't carry a
/// lock that outlives a write.
fn acquire_write_lock(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(path))?;
    file.lock_exclusive()?;
    Ok(file)
}
