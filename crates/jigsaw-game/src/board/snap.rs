//! Magnetic joining of adjacent pieces on drag release.

use jigsaw_core::{GridPos, Vec2};

use super::Board;
use crate::GroupId;

/// Below this magnitude an expected offset component counts as zero.
const PERPENDICULAR_EPSILON: f32 = 1e-6;

/// Snap tolerances as fractions of the smaller cell dimension.
///
/// Along the seam between two pieces (the axis on which their expected
/// offset is non-zero) the `parallel` tolerance applies; across the seam
/// the tighter `perpendicular` one does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTolerance {
    /// Tolerance on axes where the expected offset is non-zero.
    pub parallel: f32,
    /// Tolerance on axes where the expected offset is zero.
    pub perpendicular: f32,
}

impl SnapTolerance {
    /// Default parallel ratio.
    pub const DEFAULT_PARALLEL: f32 = 0.18;
    /// Default perpendicular ratio.
    pub const DEFAULT_PERPENDICULAR: f32 = 0.14;

    fn accepts(&self, expected: f32, actual: f32, base: f32) -> bool {
        let ratio = if expected.abs() < PERPENDICULAR_EPSILON {
            self.perpendicular
        } else {
            self.parallel
        };
        (actual - expected).abs() <= ratio * base
    }
}

impl Default for SnapTolerance {
    fn default() -> Self {
        Self {
            parallel: Self::DEFAULT_PARALLEL,
            perpendicular: Self::DEFAULT_PERPENDICULAR,
        }
    }
}

/// Result of [`Board::try_snap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapOutcome {
    /// The dragged group after all merges.
    pub group: GroupId,
    /// Number of groups merged into it.
    pub merges: usize,
}

impl SnapOutcome {
    /// Returns `true` if at least one merge happened.
    #[must_use]
    pub fn merged(&self) -> bool {
        self.merges > 0
    }
}

impl Board {
    /// The offset `neighbor.position - piece.position` the two pieces would
    /// have if correctly joined at `piece`'s current rotation.
    #[must_use]
    pub fn expected_offset(&self, piece: GridPos, neighbor: GridPos) -> Option<Vec2> {
        let a = self.piece(piece)?;
        let b = self.piece(neighbor)?;
        Some(a.rotation().rotate(b.anchor() - a.anchor()))
    }

    /// Joins group `id` with every grid-adjacent group that lies within
    /// tolerance of its correct relative position.
    ///
    /// A neighbor is only considered if its rotation equals the piece's. On a
    /// match the neighbor's group is moved by the exact correction and merged
    /// into `id`, then the scan restarts from the first member, so chains of
    /// joins resolve in one call. Each pass either merges or ends the loop,
    /// so it runs at most once per group.
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_core::{GridPos, GridSize, Rotation, Vec2};
    /// use jigsaw_game::{Board, SnapTolerance};
    /// use jigsaw_generator::{Partition, PartitionConfig, PieceMode, Placement, ShapeSeed};
    ///
    /// let config = PartitionConfig::new(200, 200, GridSize::new(2, 2), PieceMode::Rect);
    /// let mut board = Board::new(Partition::generate(&config, ShapeSeed::new(0)));
    /// let place = |x, y, position| Placement {
    ///     grid_pos: GridPos::new(x, y),
    ///     position,
    ///     rotation: Rotation::R0,
    /// };
    /// board.place(&[
    ///     place(0, 0, Vec2::new(300.0, 300.0)),
    ///     place(1, 0, Vec2::new(401.0, 299.5)),
    /// ]);
    ///
    /// let dragged = board.group_of(GridPos::new(0, 0)).unwrap();
    /// let outcome = board.try_snap(dragged, &SnapTolerance::default());
    /// assert!(outcome.merged());
    /// assert_eq!(board.piece(GridPos::new(1, 0)).unwrap().position(), Vec2::new(400.0, 300.0));
    /// ```
    pub fn try_snap(&mut self, id: GroupId, tolerance: &SnapTolerance) -> SnapOutcome {
        let base = self.cell_width.min(self.cell_height);
        let mut group = id;
        let mut merges = 0;
        'pass: loop {
            let Some(members) = self
                .groups
                .get(group)
                .map(|g| g.members().iter().copied().collect::<Vec<_>>())
            else {
                break;
            };
            for pos in members {
                for neighbor in self.grid.neighbors(pos) {
                    let Some((other, correction)) =
                        self.snap_candidate(group, pos, neighbor, base, tolerance)
                    else {
                        continue;
                    };
                    self.translate_group(other, correction);
                    group = self.groups.merge(group, other);
                    merges += 1;
                    log::debug!("snapped {neighbor} to {pos}, correction {correction:?}");
                    continue 'pass;
                }
            }
            break;
        }
        debug_assert!(self.groups.is_consistent());
        SnapOutcome { group, merges }
    }

    fn snap_candidate(
        &self,
        group: GroupId,
        pos: GridPos,
        neighbor: GridPos,
        base: f32,
        tolerance: &SnapTolerance,
    ) -> Option<(GroupId, Vec2)> {
        let other = self.groups.lookup(neighbor)?;
        if other == group {
            return None;
        }
        let (Some(piece), Some(adjacent)) = (self.piece(pos), self.piece(neighbor)) else {
            log::warn!("snap skipped: missing piece {pos} or {neighbor}");
            return None;
        };
        if piece.rotation() != adjacent.rotation() {
            return None;
        }
        let expected = self.expected_offset(pos, neighbor)?;
        let actual = adjacent.position() - piece.position();
        let close = tolerance.accepts(expected.x, actual.x, base)
            && tolerance.accepts(expected.y, actual.y, base);
        close.then_some((other, expected - actual))
    }
}

#[cfg(test)]
mod tests {
    use jigsaw_core::Rotation;
    use jigsaw_generator::Placement;

    use super::*;
    use crate::board::tests::{pos, rect_board};

    fn place(board: &mut Board, poses: &[((u16, u16), Vec2, Rotation)]) {
        let placements: Vec<_> = poses
            .iter()
            .map(|&((x, y), position, rotation)| Placement {
                grid_pos: pos(x, y),
                position,
                rotation,
            })
            .collect();
        board.place(&placements);
    }

    #[test]
    fn test_snap_within_one_pixel_merges_exactly() {
        let mut board = rect_board(2, 2, 100);
        place(
            &mut board,
            &[
                ((0, 0), Vec2::new(300.0, 300.0), Rotation::R0),
                ((1, 0), Vec2::new(401.0, 300.0), Rotation::R0),
            ],
        );
        let a = board.group_of(pos(0, 0)).unwrap();
        let outcome = board.try_snap(a, &SnapTolerance::default());
        assert_eq!(outcome.merges, 1);
        assert_eq!(outcome.group, a);
        assert_eq!(board.group_of(pos(1, 0)), Some(a));
        let error = board.piece(pos(1, 0)).unwrap().position()
            - board.piece(pos(0, 0)).unwrap().position()
            - Vec2::new(100.0, 0.0);
        assert_eq!(error, Vec2::ZERO);
    }

    #[test]
    fn test_perpendicular_tolerance_is_tighter() {
        // base = 100: parallel 18, perpendicular 14.
        let mut board = rect_board(2, 2, 100);
        place(
            &mut board,
            &[
                ((0, 0), Vec2::new(300.0, 300.0), Rotation::R0),
                ((1, 0), Vec2::new(417.0, 315.0), Rotation::R0),
            ],
        );
        let a = board.group_of(pos(0, 0)).unwrap();
        assert!(!board.try_snap(a, &SnapTolerance::default()).merged());

        place(&mut board, &[((1, 0), Vec2::new(417.0, 313.0), Rotation::R0)]);
        assert!(board.try_snap(a, &SnapTolerance::default()).merged());
    }

    #[test]
    fn test_different_rotations_never_snap() {
        let mut board = rect_board(2, 2, 100);
        place(
            &mut board,
            &[
                ((0, 0), Vec2::new(300.0, 300.0), Rotation::R0),
                ((1, 0), Vec2::new(400.0, 300.0), Rotation::R90),
            ],
        );
        let a = board.group_of(pos(0, 0)).unwrap();
        assert!(!board.try_snap(a, &SnapTolerance::default()).merged());
    }

    #[test]
    fn test_rotated_pieces_snap_at_rotated_offset() {
        let mut board = rect_board(2, 2, 100);
        // At a quarter turn, the right-hand neighbor sits below.
        place(
            &mut board,
            &[
                ((0, 0), Vec2::new(300.0, 300.0), Rotation::R90),
                ((1, 0), Vec2::new(302.0, 395.0), Rotation::R90),
            ],
        );
        let a = board.group_of(pos(0, 0)).unwrap();
        assert_eq!(board.expected_offset(pos(0, 0), pos(1, 0)), Some(Vec2::new(0.0, 100.0)));
        assert!(board.try_snap(a, &SnapTolerance::default()).merged());
        assert_eq!(board.piece(pos(1, 0)).unwrap().position(), Vec2::new(300.0, 400.0));
    }

    #[test]
    fn test_snap_chains_through_merged_groups() {
        let mut board = rect_board(3, 2, 100);
        place(
            &mut board,
            &[
                ((0, 0), Vec2::new(300.0, 300.0), Rotation::R0),
                ((1, 0), Vec2::new(402.0, 301.0), Rotation::R0),
                ((2, 0), Vec2::new(500.0, 300.0), Rotation::R0),
            ],
        );
        let a = board.group_of(pos(0, 0)).unwrap();
        let outcome = board.try_snap(a, &SnapTolerance::default());
        assert_eq!(outcome.merges, 2);
        let group = board.group(outcome.group).unwrap();
        assert!(group.contains(pos(2, 0)));
        assert_eq!(board.piece(pos(2, 0)).unwrap().position(), Vec2::new(500.0, 300.0));
        assert!(board.groups().is_consistent());
    }
}
