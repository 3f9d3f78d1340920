use jigsaw_core::{GridPos, Rotation, Vec2};

use super::Board;
use crate::GroupId;

impl Board {
    /// Turns group `id` rigidly so that it ends up at `rotation`.
    ///
    /// Member positions rotate about their arithmetic mean by the difference
    /// between the group's current rotation and `rotation`; each member's own
    /// rotation advances by the same number of quarter turns. Returns `false`
    /// if the group does not exist or is already at `rotation`.
    pub fn rotate_group(&mut self, id: GroupId, rotation: Rotation) -> bool {
        let Some(group) = self.groups.get(id) else {
            return false;
        };
        let steps = group.rotation().delta_to(rotation);
        if steps == 0 {
            return false;
        }
        let members: Vec<GridPos> = group.members().iter().copied().collect();
        let turn = Rotation::from_steps(steps);

        let positions: Vec<Vec2> = members
            .iter()
            .filter_map(|pos| self.piece(*pos).map(|p| p.position()))
            .collect();
        if positions.is_empty() {
            return false;
        }
        let sum = positions.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
        let center = sum.scale((positions.len() as f32).recip());

        for pos in &members {
            let Some(piece) = self.piece_mut(*pos) else {
                continue;
            };
            let offset = turn.rotate(piece.position() - center);
            piece.set_position(center + offset);
            piece.set_rotation(piece.rotation().add_steps(steps));
        }
        self.groups.set_rotation(id, rotation);
        log::debug!("rotated group {id} by {turn} to {rotation}");
        debug_assert!(self.groups_share_rotation());
        true
    }
}
