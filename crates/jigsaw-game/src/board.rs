//! The pieces on the table and the groups they form.

use jigsaw_core::{GridPos, GridSize, Rotation, Vec2, Viewport};
use jigsaw_generator::{Partition, Placement, TextureKey};

use crate::{Group, GroupId, GroupRegistry, Piece};

mod rotate;
mod snap;

pub use self::snap::{SnapOutcome, SnapTolerance};

/// All pieces of one puzzle, their groups and their stacking order.
///
/// Pieces are stored in row-major grid order and addressed by [`GridPos`].
/// Every mutation of positions, rotations or group membership goes through
/// a `Board` method, which keeps the following true:
///
/// - every piece belongs to exactly one group;
/// - all members of a group share the group's rotation;
/// - solved pieces never move.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    grid: GridSize,
    cell_width: f32,
    cell_height: f32,
    pieces: Vec<Piece>,
    groups: GroupRegistry,
    stack: Vec<GridPos>,
}

impl Board {
    /// Creates a board with every piece at its anchor, unrotated and alone.
    #[must_use]
    pub fn new(partition: Partition) -> Self {
        Self::build(partition, Vec::new())
    }

    /// Like [`Board::new`], attaching the texture key of each piece.
    ///
    /// `keys` are in the same order as the partition's pieces.
    #[must_use]
    pub fn with_textures(partition: Partition, keys: Vec<TextureKey>) -> Self {
        Self::build(partition, keys)
    }

    fn build(partition: Partition, keys: Vec<TextureKey>) -> Self {
        let grid = partition.grid();
        let cell_width = partition.cell_width();
        let cell_height = partition.cell_height();
        let mut keys = keys.into_iter();
        let pieces: Vec<Piece> = partition
            .into_pieces()
            .into_iter()
            .map(|geometry| Piece::new(geometry, keys.next()))
            .collect();
        debug_assert_eq!(pieces.len(), grid.len());
        Self {
            grid,
            cell_width,
            cell_height,
            stack: pieces.iter().map(Piece::grid_pos).collect(),
            pieces,
            groups: GroupRegistry::new(grid),
        }
    }

    /// Grid dimensions.
    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Nominal cell width.
    #[must_use]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Nominal cell height.
    #[must_use]
    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// All pieces in row-major order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The piece cut from cell `pos`.
    #[must_use]
    pub fn piece(&self, pos: GridPos) -> Option<&Piece> {
        self.grid.index_of(pos).and_then(|i| self.pieces.get(i))
    }

    fn piece_mut(&mut self, pos: GridPos) -> Option<&mut Piece> {
        self.grid.index_of(pos).and_then(|i| self.pieces.get_mut(i))
    }

    /// The group registry.
    #[must_use]
    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Id of the group containing `pos`.
    #[must_use]
    pub fn group_of(&self, pos: GridPos) -> Option<GroupId> {
        self.groups.lookup(pos)
    }

    /// The group with `id`.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Pieces from bottom to top.
    #[must_use]
    pub fn stack(&self) -> &[GridPos] {
        &self.stack
    }

    /// Applies starting poses.
    ///
    /// Only meant for a board whose pieces are still alone in their groups;
    /// each piece's group takes the piece's new rotation. The placement order
    /// becomes the stacking order.
    pub fn place(&mut self, placements: &[Placement]) {
        for placement in placements {
            let Some(piece) = self.piece_mut(placement.grid_pos) else {
                log::warn!("placement for unknown piece {}", placement.grid_pos);
                continue;
            };
            piece.set_position(placement.position);
            piece.set_rotation(placement.rotation);
            if let Some(id) = self.groups.lookup(placement.grid_pos) {
                self.groups.set_rotation(id, placement.rotation);
            }
        }
        let mut stack: Vec<GridPos> = placements.iter().map(|p| p.grid_pos).collect();
        stack.retain(|pos| self.grid.contains(*pos));
        for pos in self.grid.positions() {
            if !stack.contains(&pos) {
                stack.push(pos);
            }
        }
        self.stack = stack;
        debug_assert!(self.groups_share_rotation());
    }

    /// Moves `members` into a new group.
    ///
    /// The group takes the rotation of the first member; callers must only
    /// group pieces that already share it.
    pub fn create_group<I>(&mut self, members: I) -> Option<GroupId>
    where
        I: IntoIterator<Item = GridPos>,
    {
        let members: Vec<GridPos> = members.into_iter().collect();
        let rotation = members
            .iter()
            .find_map(|pos| self.piece(*pos))
            .map_or(Rotation::R0, Piece::rotation);
        self.groups.create_group(members, rotation)
    }

    /// Merges group `b` into group `a`, returning the surviving id.
    pub fn merge_groups(&mut self, a: GroupId, b: GroupId) -> GroupId {
        self.groups.merge(a, b)
    }

    /// The topmost piece whose polygon contains `point`.
    #[must_use]
    pub fn piece_at(&self, point: Vec2) -> Option<GridPos> {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|pos| self.piece(*pos).is_some_and(|piece| piece.contains_point(point)))
    }

    /// Moves the members of group `id` to the top of the stack, keeping
    /// their relative order.
    pub fn raise_group(&mut self, id: GroupId) {
        let Some(group) = self.groups.get(id) else {
            return;
        };
        let (mut lowered, raised): (Vec<_>, Vec<_>) =
            self.stack.iter().copied().partition(|pos| !group.contains(*pos));
        lowered.extend(raised);
        self.stack = lowered;
    }

    /// Computes how far group `id` may move towards `delta` while every
    /// unsolved member's rotated bounding box stays inside `viewport`'s play
    /// area.
    ///
    /// Each axis is clamped independently to the intersection of the
    /// members' allowed ranges. Solved members are frozen and impose no limit.
    #[must_use]
    pub fn clamp_delta(&self, id: GroupId, delta: Vec2, viewport: &Viewport) -> Vec2 {
        let Some(group) = self.groups.get(id) else {
            return Vec2::ZERO;
        };
        let area = viewport.play_area();
        let mut low = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        let mut high = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut movable = false;
        for pos in group.members() {
            let Some(piece) = self.piece(*pos) else {
                log::warn!("group {id} lists unknown piece {pos}");
                continue;
            };
            if piece.is_solved() {
                continue;
            }
            movable = true;
            let bounds = piece.world_bounds();
            low.x = low.x.max(area.min.x - bounds.min.x);
            low.y = low.y.max(area.min.y - bounds.min.y);
            high.x = high.x.min(area.max.x - bounds.max.x);
            high.y = high.y.min(area.max.y - bounds.max.y);
        }
        if !movable {
            return Vec2::ZERO;
        }
        // A group larger than the area resolves towards the top/left edge.
        Vec2::new(
            delta.x.min(high.x).max(low.x),
            delta.y.min(high.y).max(low.y),
        )
    }

    /// Moves every unsolved member of group `id` by `delta`, unclamped.
    pub fn translate_group(&mut self, id: GroupId, delta: Vec2) {
        let Some(group) = self.groups.get(id) else {
            return;
        };
        let members: Vec<GridPos> = group.members().iter().copied().collect();
        for pos in members {
            if let Some(piece) = self.piece_mut(pos)
                && !piece.is_solved()
            {
                piece.translate(delta);
            }
        }
    }

    /// Clamps `delta` with [`Board::clamp_delta`] and moves group `id` by the
    /// result, which is returned.
    pub fn drag_group(&mut self, id: GroupId, delta: Vec2, viewport: &Viewport) -> Vec2 {
        let applied = self.clamp_delta(id, delta, viewport);
        self.translate_group(id, applied);
        applied
    }

    /// Returns `true` if all pieces form one group and none is rotated.
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_core::GridSize;
    /// use jigsaw_game::Board;
    /// use jigsaw_generator::{Partition, PartitionConfig, PieceMode, ShapeSeed};
    ///
    /// let config = PartitionConfig::new(100, 100, GridSize::new(2, 2), PieceMode::Rect);
    /// let mut board = Board::new(Partition::generate(&config, ShapeSeed::new(0)));
    /// assert!(!board.is_solved());
    ///
    /// let all: Vec<_> = board.grid().positions().collect();
    /// board.create_group(all);
    /// assert!(board.is_solved());
    /// ```
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let mut groups = self.groups.iter();
        let (Some(only), None) = (groups.next(), groups.next()) else {
            return false;
        };
        only.len() == self.pieces.len() && self.pieces.iter().all(|p| p.rotation() == Rotation::R0)
    }

    /// Marks every piece solved. Solved pieces never move again.
    pub(crate) fn lock_solved(&mut self) {
        for piece in &mut self.pieces {
            piece.set_solved(true);
        }
    }

    /// Unlocks every piece and splits the board back into singleton groups,
    /// each taking its piece's current rotation. Positions are kept.
    pub(crate) fn reset_layout(&mut self) {
        self.groups = GroupRegistry::new(self.grid);
        for piece in &mut self.pieces {
            piece.set_solved(false);
            if let Some(id) = self.groups.lookup(piece.grid_pos()) {
                self.groups.set_rotation(id, piece.rotation());
            }
        }
    }

    /// Sets a piece's pose directly; used when restoring a save.
    pub(crate) fn set_pose(&mut self, pos: GridPos, position: Vec2, rotation: Rotation) -> bool {
        let Some(piece) = self.piece_mut(pos) else {
            return false;
        };
        piece.set_position(position);
        piece.set_rotation(rotation);
        if let Some(id) = self.groups.lookup(pos)
            && self.groups.get(id).is_some_and(|g| g.len() == 1)
        {
            self.groups.set_rotation(id, rotation);
        }
        true
    }

    pub(crate) fn groups_share_rotation(&self) -> bool {
        self.groups.iter().all(|group| {
            group
                .members()
                .iter()
                .filter_map(|pos| self.piece(*pos))
                .all(|piece| piece.rotation() == group.rotation())
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jigsaw_core::Aabb;
    use jigsaw_generator::{PartitionConfig, PieceMode, ShapeSeed};

    use super::*;

    pub(crate) fn rect_board(cols: u16, rows: u16, cell: u32) -> Board {
        let config = PartitionConfig::new(
            u32::from(cols) * cell,
            u32::from(rows) * cell,
            GridSize::new(cols, rows),
            PieceMode::Rect,
        );
        Board::new(Partition::generate(&config, ShapeSeed::new(0)))
    }

    pub(crate) fn pos(x: u16, y: u16) -> GridPos {
        GridPos::new(x, y)
    }

    fn placement(x: u16, y: u16, position: Vec2) -> Placement {
        Placement {
            grid_pos: pos(x, y),
            position,
            rotation: Rotation::R0,
        }
    }

    #[test]
    fn test_clamp_stops_tightest_member_on_boundary() {
        let mut board = rect_board(2, 2, 100);
        board.place(&[
            placement(0, 0, Vec2::new(300.0, 300.0)),
            placement(1, 0, Vec2::new(400.0, 300.0)),
        ]);
        let a = board.group_of(pos(0, 0)).unwrap();
        let b = board.group_of(pos(1, 0)).unwrap();
        let group = board.merge_groups(a, b);
        let viewport = Viewport::default();

        let applied = board.drag_group(group, Vec2::new(5000.0, -5000.0), &viewport);
        assert_eq!(applied, Vec2::new(1272.0 - 500.0, 70.0 - 300.0));
        let right = board.piece(pos(1, 0)).unwrap().world_bounds();
        assert_eq!(right.max.x, 1272.0);
        assert_eq!(right.min.y, 70.0);

        let applied = board.drag_group(group, Vec2::new(-5000.0, 5000.0), &viewport);
        let left = board.piece(pos(0, 0)).unwrap().world_bounds();
        assert_eq!(left.min.x, 8.0);
        assert_eq!(left.max.y, 712.0);
        assert_eq!(applied.x, 8.0 - 1072.0);
    }

    #[test]
    fn test_clamp_uses_rotated_bounds() {
        let mut board = rect_board(2, 2, 100);
        board.place(&[Placement {
            grid_pos: pos(0, 0),
            position: Vec2::new(200.0, 200.0),
            rotation: Rotation::R90,
        }]);
        let id = board.group_of(pos(0, 0)).unwrap();
        // Rotated a quarter turn, the box spans x in [100, 200].
        let applied = board.clamp_delta(id, Vec2::new(-1000.0, 0.0), &Viewport::default());
        assert_eq!(applied.x, 8.0 - 100.0);
    }

    #[test]
    fn test_solved_pieces_do_not_move() {
        let mut board = rect_board(2, 2, 50);
        let id = board.create_group(board.grid().positions()).unwrap();
        board.lock_solved();
        let before = board.clone();
        assert_eq!(board.drag_group(id, Vec2::new(10.0, 10.0), &Viewport::default()), Vec2::ZERO);
        assert_eq!(board, before);
    }

    #[test]
    fn test_piece_at_prefers_top_of_stack() {
        let mut board = rect_board(2, 2, 100);
        board.place(&[
            placement(0, 0, Vec2::new(200.0, 200.0)),
            placement(1, 1, Vec2::new(250.0, 250.0)),
        ]);
        let point = Vec2::new(260.0, 260.0);
        assert_eq!(board.piece_at(point), Some(pos(1, 1)));
        let bottom = board.group_of(pos(0, 0)).unwrap();
        board.raise_group(bottom);
        assert_eq!(board.piece_at(point), Some(pos(0, 0)));
        assert_eq!(board.stack().last(), Some(&pos(0, 0)));
        assert_eq!(board.piece_at(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_create_group_takes_first_member_rotation() {
        let mut board = rect_board(2, 2, 100);
        board.place(&[
            Placement {
                grid_pos: pos(0, 1),
                position: Vec2::new(300.0, 300.0),
                rotation: Rotation::R180,
            },
            Placement {
                grid_pos: pos(1, 1),
                position: Vec2::new(200.0, 300.0),
                rotation: Rotation::R180,
            },
        ]);
        let id = board.create_group([pos(0, 1), pos(1, 1)]).unwrap();
        assert_eq!(board.group(id).unwrap().rotation(), Rotation::R180);
        assert!(board.groups_share_rotation());
        assert!(board.groups().is_consistent());
        assert_eq!(
            board.piece(pos(0, 1)).unwrap().world_bounds(),
            Aabb::from_origin_size(Vec2::new(200.0, 200.0), 100.0, 100.0)
        );
    }
}
