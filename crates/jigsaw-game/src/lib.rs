//! Jigsaw puzzle play: pieces, groups, snapping and the session around them.
//!
//! # Overview
//!
//! - [`Board`] holds every [`Piece`] with its pose, the [`GroupRegistry`]
//!   partitioning pieces into rigidly moving groups, and the stacking order.
//!   It implements drag clamping, snapping ([`Board::try_snap`]), rigid group
//!   rotation ([`Board::rotate_group`]) and the win check.
//! - [`Session`] drives one puzzle: the drag protocol, hover and rotation,
//!   the [`SessionTimer`], win/fail transitions and save/restore through
//!   [`SaveData`].
//! - [`ChallengeLevel`] and [`ChallengeProgress`] describe the timed
//!   challenge levels; [`Leaderboard`] keeps best times.
//!
//! # Examples
//!
//! ```
//! use jigsaw_core::GridSize;
//! use jigsaw_game::{ImageRef, Session, SessionConfig};
//! use jigsaw_generator::{PieceMode, ShapeSeed};
//!
//! let grid = GridSize::new(3, 3);
//! let config = SessionConfig::new(ImageRef::default(), 300, 300, grid, PieceMode::Quad);
//! let session = Session::new(config, ShapeSeed::new(9));
//! assert_eq!(session.board().pieces().len(), 9);
//! assert!(!session.is_solved());
//!
//! let save = session.export_state();
//! let restored = Session::from_save(&save, session.config().clone())?;
//! assert_eq!(restored.board().pieces(), session.board().pieces());
//! # Ok::<(), jigsaw_game::RestoreError>(())
//! ```

mod board;
mod challenge;
mod error;
mod group;
mod leaderboard;
mod piece;
mod save;
mod session;
mod timer;

pub use self::{
    board::{Board, SnapOutcome, SnapTolerance},
    challenge::{ChallengeLevel, ChallengeProgress, ChallengeRules, MAX_LEVEL},
    error::{RestoreError, SessionError},
    group::{Group, GroupId, GroupRegistry},
    leaderboard::{
        Category, ImportStrategy, Leaderboard, LeaderboardEntry, LeaderboardExport, TOP_ENTRIES,
    },
    piece::Piece,
    save::{PieceRef, PieceSave, SAVE_VERSION, SaveData, SceneSave},
    session::{ImageRef, Session, SessionConfig, SessionEvent, SessionStatus},
    timer::{SessionTimer, TimerMode, TimerTick},
};
