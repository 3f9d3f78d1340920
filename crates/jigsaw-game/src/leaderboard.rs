//! Best completion times per difficulty.

use std::collections::BTreeSet;

use jigsaw_core::GridSize;
use serde::{Deserialize, Serialize};

/// Entries kept per category.
pub const TOP_ENTRIES: usize = 3;

/// Leaderboard category, derived from the grid size.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// 3×3.
    #[display("EASY")]
    Easy,
    /// 4×4.
    #[display("MEDIUM")]
    Medium,
    /// 5×5.
    #[display("HARD")]
    Hard,
    /// Any other grid.
    #[display("CUSTOM")]
    Custom,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Custom];

    /// The category a puzzle of `grid` is ranked in.
    #[must_use]
    pub fn of(grid: GridSize) -> Self {
        match (grid.cols(), grid.rows()) {
            (3, 3) => Self::Easy,
            (4, 4) => Self::Medium,
            (5, 5) => Self::Hard,
            _ => Self::Custom,
        }
    }
}

/// One recorded completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Completion time in seconds.
    pub time: f64,
    /// Image identifier.
    #[serde(default)]
    pub image_key: String,
    /// Image display name.
    #[serde(default)]
    pub image_name: String,
    /// Grid rows.
    pub rows: u16,
    /// Grid columns.
    pub cols: u16,
    /// When the record was set, as an ISO-8601 timestamp.
    #[serde(default, rename = "dateISO")]
    pub date_iso: String,
}

impl LeaderboardEntry {
    fn is_valid(&self) -> bool {
        self.time.is_finite() && self.time >= 0.0 && self.rows >= 2 && self.cols >= 2
    }
}

/// How [`Leaderboard::import`] combines incoming entries with existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum ImportStrategy {
    /// Keep the best entries of both.
    #[default]
    Merge,
    /// Discard existing entries.
    Replace,
}

/// Best times for every [`Category`].
///
/// Each category holds at most [`TOP_ENTRIES`] entries, sorted by time, with
/// no two entries sharing the same time.
///
/// # Examples
///
/// ```
/// use jigsaw_core::GridSize;
/// use jigsaw_game::{Category, Leaderboard, LeaderboardEntry};
///
/// let mut board = Leaderboard::default();
/// let entry = |time| LeaderboardEntry {
///     time,
///     image_key: "cat".into(),
///     image_name: "Cat".into(),
///     rows: 3,
///     cols: 3,
///     date_iso: String::new(),
/// };
/// for time in [50.0, 20.0, 35.0, 20.0, 40.0] {
///     board.add(entry(time));
/// }
/// let times: Vec<_> = board.entries(Category::Easy).iter().map(|e| e.time).collect();
/// assert_eq!(times, [20.0, 35.0, 40.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Leaderboard {
    #[serde(default)]
    easy: Vec<LeaderboardEntry>,
    #[serde(default)]
    medium: Vec<LeaderboardEntry>,
    #[serde(default)]
    hard: Vec<LeaderboardEntry>,
    #[serde(default)]
    custom: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Entries of `category`, best first.
    #[must_use]
    pub fn entries(&self, category: Category) -> &[LeaderboardEntry] {
        match category {
            Category::Easy => &self.easy,
            Category::Medium => &self.medium,
            Category::Hard => &self.hard,
            Category::Custom => &self.custom,
        }
    }

    fn entries_mut(&mut self, category: Category) -> &mut Vec<LeaderboardEntry> {
        match category {
            Category::Easy => &mut self.easy,
            Category::Medium => &mut self.medium,
            Category::Hard => &mut self.hard,
            Category::Custom => &mut self.custom,
        }
    }

    /// Records a completion and returns its category.
    ///
    /// The entry is dropped if it does not make the top list.
    pub fn add(&mut self, entry: LeaderboardEntry) -> Category {
        let category = Category::of(GridSize::new(entry.cols, entry.rows));
        let list = self.entries_mut(category);
        list.push(entry);
        normalize(list);
        category
    }

    /// Drops invalid entries and re-establishes ordering and limits; used
    /// after loading from disk.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        for category in Category::ALL {
            let list = self.entries_mut(category);
            list.retain(LeaderboardEntry::is_valid);
            normalize(list);
        }
        self
    }

    /// Combines an imported leaderboard with this one.
    ///
    /// Invalid incoming entries (negative time, fewer than two rows or
    /// columns) are skipped.
    pub fn import(&mut self, incoming: Self, strategy: ImportStrategy) {
        let incoming = incoming.sanitized();
        if strategy.is_replace() {
            *self = incoming;
            return;
        }
        for category in Category::ALL {
            let list = self.entries_mut(category);
            list.extend_from_slice(incoming.entries(category));
            normalize(list);
        }
    }

    /// Wraps this leaderboard in the export envelope.
    #[must_use]
    pub fn export(&self, exported_at: String) -> LeaderboardExport {
        LeaderboardExport {
            version: LeaderboardExport::VERSION,
            exported_at,
            categories: self.clone(),
        }
    }
}

fn normalize(list: &mut Vec<LeaderboardEntry>) {
    list.sort_by(|a, b| a.time.total_cmp(&b.time));
    let mut seen = BTreeSet::new();
    list.retain(|entry| seen.insert(entry.time.to_bits()));
    list.truncate(TOP_ENTRIES);
}

/// The file format of an exported leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardExport {
    /// Format version.
    #[serde(default)]
    pub version: u32,
    /// When the export was made.
    #[serde(default)]
    pub exported_at: String,
    /// The exported entries.
    pub categories: Leaderboard,
}

impl LeaderboardExport {
    /// Current export format version.
    pub const VERSION: u32 = 1;
}
