use jigsaw_core::{GridPos, GridSize, InvalidRotation};
use jigsaw_generator::{PieceMode, ShapeSeed};

/// Errors returned by [`Session`](crate::Session) commands.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    /// The referenced piece does not exist in this puzzle.
    #[display("unknown piece: {pos}")]
    UnknownPiece {
        /// The rejected piece id.
        pos: GridPos,
    },
    /// A drag is already active.
    #[display("a drag is already in progress")]
    DragInProgress,
    /// No drag is active.
    #[display("no drag in progress")]
    NoActiveDrag,
    /// The session already reached a terminal state.
    #[display("the puzzle is already finished")]
    Finished,
}

/// Reasons a save is rejected by [`Session::restore_state`](crate::Session::restore_state).
///
/// A rejected save never modifies the session.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RestoreError {
    /// The save has no `scene` record.
    #[display("save data has no scene")]
    MissingScene,
    /// The save has no `pieces` list.
    #[display("save data has no pieces")]
    MissingPieces,
    /// The saved grid differs from the session's grid.
    #[display("grid mismatch: save is {saved_cols}x{saved_rows}, puzzle is {cols}x{rows}")]
    GridMismatch {
        /// Saved column count.
        saved_cols: u16,
        /// Saved row count.
        saved_rows: u16,
        /// Session column count.
        cols: u16,
        /// Session row count.
        rows: u16,
    },
    /// The saved grid is outside the supported size range.
    #[display(
        "unsupported grid size {cols}x{rows}, each side must be {}-{}",
        GridSize::MIN,
        GridSize::MAX
    )]
    GridOutOfRange {
        /// Saved column count.
        cols: u16,
        /// Saved row count.
        rows: u16,
    },
    /// The saved cut style differs from the session's.
    #[display("piece mode mismatch: save uses {saved:?}, puzzle uses {current:?}")]
    ModeMismatch {
        /// Saved piece mode.
        saved: PieceMode,
        /// Session piece mode.
        current: PieceMode,
    },
    /// The saved shape seed differs from the session's, so outlines would not match.
    #[display("shape seed mismatch: save uses {saved}, puzzle uses {current}")]
    SeedMismatch {
        /// Saved seed.
        saved: ShapeSeed,
        /// Session seed.
        current: ShapeSeed,
    },
    /// A piece id or index does not name a piece of this puzzle.
    #[display("unknown piece reference: {reference}")]
    UnknownPiece {
        /// The rejected id or index.
        reference: String,
    },
    /// A piece has a rotation outside 0-3.
    #[display("invalid rotation for piece {pos}: {source}")]
    InvalidRotation {
        /// The affected piece.
        pos: GridPos,
        /// The underlying error.
        source: InvalidRotation,
    },
    /// A piece is listed twice in `pieces`, or in more than one group.
    #[display("piece {pos} is listed more than once")]
    DuplicateMember {
        /// The affected piece.
        pos: GridPos,
    },
    /// The members of a saved group have different rotations.
    #[display("group {group} mixes rotations")]
    InconsistentGroupRotation {
        /// The saved group key.
        group: String,
    },
    /// A legacy save lists more pieces than the puzzle has.
    #[display("save lists {saved} pieces, puzzle has {expected}")]
    PieceCountMismatch {
        /// Number of saved pieces.
        saved: usize,
        /// Number of pieces in the puzzle.
        expected: usize,
    },
    /// The save is not valid JSON for the save format.
    #[display("malformed save data: {_0}")]
    #[from]
    Json(serde_json::Error),
}
