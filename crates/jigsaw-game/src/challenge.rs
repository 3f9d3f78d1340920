//! Timed challenge levels and the player's progress through them.

use std::collections::BTreeSet;

use jigsaw_core::GridSize;
use jigsaw_generator::PieceMode;
use serde::{Deserialize, Serialize};

/// Highest challenge level.
pub const MAX_LEVEL: u8 = 3;

/// One entry of the challenge catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeLevel {
    /// Level number, starting at 1.
    pub level: u8,
    /// Grid the image is cut into.
    pub grid: GridSize,
    /// Time allowed, in seconds.
    pub time_limit: f64,
    /// Cut style.
    pub mode: PieceMode,
    /// Image the level uses.
    pub image_key: &'static str,
}

impl ChallengeLevel {
    /// Looks up a level of the catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_game::ChallengeLevel;
    /// use jigsaw_generator::PieceMode;
    ///
    /// let level = ChallengeLevel::get(3).unwrap();
    /// assert_eq!(level.mode, PieceMode::Quad);
    /// assert!(ChallengeLevel::get(4).is_none());
    /// ```
    #[must_use]
    pub fn get(level: u8) -> Option<Self> {
        let (cols, rows, time_limit) = match level {
            1 => (3, 3, 40.0),
            2 => (4, 4, 90.0),
            3 => (4, 4, 130.0),
            _ => return None,
        };
        let (mode, image_key) = match level {
            1 => (PieceMode::Rect, "challenge_level1"),
            2 => (PieceMode::Rect, "challenge_level2"),
            _ => (PieceMode::Quad, "challenge_level3"),
        };
        Some(Self {
            level,
            grid: GridSize::new(cols, rows),
            time_limit,
            mode,
            image_key,
        })
    }

    /// All levels in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=MAX_LEVEL).filter_map(Self::get)
    }

    /// The rules a session of this level runs under.
    ///
    /// The first level disables rotation entirely; later levels start with
    /// randomly rotated pieces.
    #[must_use]
    pub fn rules(&self) -> ChallengeRules {
        ChallengeRules {
            level: self.level,
            time_limit: self.time_limit,
            rotation_enabled: self.level != 1,
            rotate_initially: self.level > 1,
        }
    }
}

/// Challenge-mode policy applied to a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeRules {
    /// Level being played.
    pub level: u8,
    /// Countdown start, in seconds.
    pub time_limit: f64,
    /// Whether groups may be rotated.
    pub rotation_enabled: bool,
    /// Whether pieces start at a random rotation.
    pub rotate_initially: bool,
}

/// Which challenge levels are unlocked and completed.
///
/// Values read from disk go through [`ChallengeProgress::sanitized`], so
/// `unlocked` is always within `1..=MAX_LEVEL` and `completed` only holds
/// valid levels.
///
/// # Examples
///
/// ```
/// use jigsaw_game::ChallengeProgress;
///
/// let mut progress = ChallengeProgress::default();
/// assert!(progress.is_unlocked(1));
/// assert!(!progress.is_unlocked(2));
///
/// progress.mark_completed(1);
/// assert!(progress.is_unlocked(2));
/// assert!(progress.is_completed(1));
/// assert_eq!(progress.next_level(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    #[serde(default = "first_level")]
    unlocked: u8,
    #[serde(default)]
    completed: BTreeSet<u8>,
}

fn first_level() -> u8 {
    1
}

impl Default for ChallengeProgress {
    fn default() -> Self {
        Self {
            unlocked: 1,
            completed: BTreeSet::new(),
        }
    }
}

impl ChallengeProgress {
    /// Clamps `unlocked` into range and drops out-of-range completed levels.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.unlocked = self.unlocked.clamp(1, MAX_LEVEL);
        self.completed.retain(|level| (1..=MAX_LEVEL).contains(level));
        self
    }

    /// Highest unlocked level.
    #[must_use]
    pub fn unlocked(&self) -> u8 {
        self.unlocked
    }

    /// Completed levels in ascending order.
    pub fn completed(&self) -> impl Iterator<Item = u8> + '_ {
        self.completed.iter().copied()
    }

    /// Returns `true` if `level` may be played.
    #[must_use]
    pub fn is_unlocked(&self, level: u8) -> bool {
        (1..=self.unlocked).contains(&level)
    }

    /// Returns `true` if `level` was won before.
    #[must_use]
    pub fn is_completed(&self, level: u8) -> bool {
        self.completed.contains(&level)
    }

    /// Records a win of `level` and unlocks the next one.
    pub fn mark_completed(&mut self, level: u8) {
        if !(1..=MAX_LEVEL).contains(&level) {
            return;
        }
        self.completed.insert(level);
        let next = level.saturating_add(1).min(MAX_LEVEL);
        self.unlocked = self.unlocked.max(next);
    }

    /// Unlocks and completes every level.
    pub fn unlock_all(&mut self) {
        self.unlocked = MAX_LEVEL;
        self.completed = (1..=MAX_LEVEL).collect();
    }

    /// The level to play next, or `None` once every level is completed.
    #[must_use]
    pub fn next_level(&self) -> Option<u8> {
        (usize::from(MAX_LEVEL) > self.completed.len()).then_some(self.unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_levels() {
        let levels: Vec<_> = ChallengeLevel::all().collect();
        assert_eq!(levels.len(), usize::from(MAX_LEVEL));
        assert_eq!(levels[0].grid, GridSize::new(3, 3));
        assert_eq!(levels[0].time_limit, 40.0);
        assert_eq!(levels[1].time_limit, 90.0);
        assert_eq!(levels[2].grid, GridSize::new(4, 4));

        let first = levels[0].rules();
        assert!(!first.rotation_enabled);
        assert!(!first.rotate_initially);
        assert!(levels[2].rules().rotate_initially);
    }

    #[test]
    fn test_sanitize_clamps_bad_values() {
        let progress: ChallengeProgress =
            serde_json::from_str(r#"{"unlocked": 9, "completed": [3, 0, 1, 1, 7]}"#).unwrap();
        let progress = progress.sanitized();
        assert_eq!(progress.unlocked(), 3);
        assert_eq!(progress.completed().collect::<Vec<_>>(), [1, 3]);

        let empty: ChallengeProgress = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.sanitized(), ChallengeProgress::default());
    }

    #[test]
    fn test_completing_last_level_keeps_max() {
        let mut progress = ChallengeProgress::default();
        progress.mark_completed(3);
        assert_eq!(progress.unlocked(), 3);
        progress.mark_completed(1);
        progress.mark_completed(2);
        assert_eq!(progress.next_level(), None);
        progress.mark_completed(0);
        assert_eq!(progress.completed().count(), 3);
    }
}
