use jigsaw_core::{Aabb, GridPos, Rotation, Vec2, geom};
use jigsaw_generator::{PieceGeometry, TextureKey};

/// One puzzle piece.
///
/// The outline, anchor and rotated bounds are fixed when the piece is cut;
/// position, rotation and the solved flag change during play and are only
/// mutated through [`Board`](crate::Board) operations.
///
/// The piece's `position` is the world position of its local origin (the
/// corner of its unrotated bounding box). A piece rotates about that origin,
/// so a point `p` of the outline is drawn at `position + rotation.rotate(p)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    grid_pos: GridPos,
    outline: Vec<Vec2>,
    width: u32,
    height: u32,
    anchor: Vec2,
    rotated_bounds: [Aabb; 4],
    texture: Option<TextureKey>,
    position: Vec2,
    rotation: Rotation,
    solved: bool,
}

impl Piece {
    /// Creates an unsolved piece at its anchor with no rotation.
    #[must_use]
    pub fn new(geometry: PieceGeometry, texture: Option<TextureKey>) -> Self {
        let rotated_bounds = geometry.rotated_bounds();
        let PieceGeometry {
            grid_pos,
            outline,
            width,
            height,
            anchor,
        } = geometry;
        Self {
            grid_pos,
            outline,
            width,
            height,
            anchor,
            rotated_bounds,
            texture,
            position: anchor,
            rotation: Rotation::R0,
            solved: false,
        }
    }

    /// Grid cell the piece was cut from; doubles as its id.
    #[must_use]
    pub fn grid_pos(&self) -> GridPos {
        self.grid_pos
    }

    /// Polygon in piece-local space.
    #[must_use]
    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    /// Unrotated bounding width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Unrotated bounding height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Position of the local origin in the assembled image.
    #[must_use]
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Texture produced for this piece, if a cropper ran.
    #[must_use]
    pub fn texture(&self) -> Option<&TextureKey> {
        self.texture.as_ref()
    }

    /// Current world position of the local origin.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current rotation.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Returns `true` once the piece is locked in the finished puzzle.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Local bounding box for `rotation`.
    #[must_use]
    pub fn bounds_for(&self, rotation: Rotation) -> Aabb {
        self.rotated_bounds[rotation.index()]
    }

    /// World-space bounding box at the current position and rotation.
    #[must_use]
    pub fn world_bounds(&self) -> Aabb {
        self.bounds_for(self.rotation).translated(self.position)
    }

    /// Outline in world space.
    pub fn world_outline(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.outline
            .iter()
            .map(|p| self.position + self.rotation.rotate(*p))
    }

    /// Polygon hit test against a world-space point.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        if !self.world_bounds().overlaps(&Aabb::new(point, point)) {
            return false;
        }
        let inverse = Rotation::from_steps(4 - self.rotation.steps());
        let local = inverse.rotate(point - self.position);
        geom::polygon_contains(&self.outline, local)
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub(crate) fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub(crate) fn set_solved(&mut self, solved: bool) {
        self.solved = solved;
    }
}

#[cfg(test)]
mod tests {
    use jigsaw_core::GridSize;
    use jigsaw_generator::{Partition, PartitionConfig, PieceMode, ShapeSeed};

    use super::*;

    fn piece() -> Piece {
        let config = PartitionConfig::new(80, 40, GridSize::new(2, 2), PieceMode::Rect);
        let geometry = Partition::generate(&config, ShapeSeed::new(0))
            .into_pieces()
            .swap_remove(3);
        Piece::new(geometry, None)
    }

    #[test]
    fn test_new_piece_starts_at_anchor() {
        let piece = piece();
        assert_eq!(piece.grid_pos(), GridPos::new(1, 1));
        assert_eq!(piece.position(), Vec2::new(40.0, 20.0));
        assert_eq!(piece.rotation(), Rotation::R0);
        assert!(!piece.is_solved());
        assert_eq!(
            piece.world_bounds(),
            Aabb::from_origin_size(Vec2::new(40.0, 20.0), 40.0, 20.0)
        );
    }

    #[test]
    fn test_hit_test_follows_rotation() {
        let mut piece = piece();
        piece.set_position(Vec2::new(100.0, 100.0));
        assert!(piece.contains_point(Vec2::new(130.0, 110.0)));
        piece.set_rotation(Rotation::R90);
        // The 40x20 box now spans x in [80, 100] and y in [100, 140].
        assert!(!piece.contains_point(Vec2::new(130.0, 110.0)));
        assert!(piece.contains_point(Vec2::new(90.0, 130.0)));
        assert_eq!(piece.world_bounds().min, Vec2::new(80.0, 100.0));
    }
}
