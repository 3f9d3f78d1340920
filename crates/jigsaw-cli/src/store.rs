//! JSON files holding the player's challenge progress and best times.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use jigsaw_game::{ChallengeProgress, ImportStrategy, Leaderboard, LeaderboardExport};
use serde::{Serialize, de::DeserializeOwned};

const PROGRESS_FILE: &str = "challenge-progress.json";
const LEADERBOARD_FILE: &str = "leaderboard.json";

/// Reads `path` as JSON, falling back to `T::default()` when the file is
/// missing or unreadable.
pub fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to read {}: {err}", path.display());
            }
            return T::default();
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|err| {
        log::warn!("ignoring malformed {}: {err}", path.display());
        T::default()
    })
}

/// Writes `value` to `path` as pretty-printed JSON, creating parent
/// directories.
pub fn save_json<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// The directory holding the persistent stores.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn progress_path(&self) -> PathBuf {
        self.root.join(PROGRESS_FILE)
    }

    fn leaderboard_path(&self) -> PathBuf {
        self.root.join(LEADERBOARD_FILE)
    }

    #[must_use]
    pub fn load_progress(&self) -> ChallengeProgress {
        load_or_default::<ChallengeProgress>(&self.progress_path()).sanitized()
    }

    pub fn save_progress(&self, progress: &ChallengeProgress) -> Result<()> {
        save_json(&self.progress_path(), progress)
    }

    #[must_use]
    pub fn load_leaderboard(&self) -> Leaderboard {
        load_or_default::<Leaderboard>(&self.leaderboard_path()).sanitized()
    }

    pub fn save_leaderboard(&self, leaderboard: &Leaderboard) -> Result<()> {
        save_json(&self.leaderboard_path(), leaderboard)
    }

    /// Writes the leaderboard in the export format to `path`.
    pub fn export_leaderboard(&self, path: &Path, exported_at: String) -> Result<()> {
        save_json(path, &self.load_leaderboard().export(exported_at))
    }

    /// Reads an exported leaderboard from `path` and combines it with the
    /// stored one.
    pub fn import_leaderboard(&self, path: &Path, strategy: ImportStrategy) -> Result<Leaderboard> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let incoming: LeaderboardExport = serde_json::from_str(&text)
            .with_context(|| format!("Invalid leaderboard file {}", path.display()))?;
        let mut leaderboard = self.load_leaderboard();
        leaderboard.import(incoming.categories, strategy);
        self.save_leaderboard(&leaderboard)?;
        log::info!("imported leaderboard from {}", path.display());
        Ok(leaderboard)
    }
}
