//! Initial placement of freshly cut pieces.

use jigsaw_core::{Aabb, GridPos, Rotation, Vec2, Viewport};
use rand::prelude::*;

use crate::{PieceGeometry, SeedStream, ShapeSeed};

/// Parameters of [`scatter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterConfig {
    /// Free space kept around each placed piece.
    pub margin: f32,
    /// Attempts to find a non-overlapping spot before accepting an overlap.
    pub max_tries: u32,
    /// Whether pieces start at a random quarter turn.
    pub rotate_initially: bool,
}

impl ScatterConfig {
    /// Default spacing between pieces.
    pub const DEFAULT_MARGIN: f32 = 6.0;
    /// Default placement attempts per piece.
    pub const DEFAULT_MAX_TRIES: u32 = 200;
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            margin: Self::DEFAULT_MARGIN,
            max_tries: Self::DEFAULT_MAX_TRIES,
            rotate_initially: false,
        }
    }
}

/// Starting pose of one piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Piece being placed.
    pub grid_pos: GridPos,
    /// World position of the piece's local origin.
    pub position: Vec2,
    /// Starting rotation.
    pub rotation: Rotation,
}

/// Shuffles `pieces` and spreads them over the play area of `viewport`.
///
/// The result is in shuffled order, which is also the stacking order (last
/// on top). Every piece's rotated bounding box starts inside the play area
/// whenever it fits. Randomness comes from the [`SeedStream::Scatter`] stream
/// of `seed`.
#[must_use]
pub fn scatter(
    pieces: &[PieceGeometry],
    viewport: &Viewport,
    config: &ScatterConfig,
    seed: ShapeSeed,
) -> Vec<Placement> {
    let mut rng = seed.rng(SeedStream::Scatter);
    let mut order: Vec<&PieceGeometry> = pieces.iter().collect();
    order.shuffle(&mut rng);

    let area = viewport.play_area();
    let mut occupied: Vec<Aabb> = Vec::with_capacity(order.len());
    let mut overlapping = 0_usize;
    let placements = order
        .into_iter()
        .map(|piece| {
            let rotation = if config.rotate_initially {
                Rotation::from_steps(rng.random_range(0..=3))
            } else {
                Rotation::R0
            };
            let bounds = piece.rotated_bounds()[rotation.index()];
            let (w, h) = (bounds.width(), bounds.height());

            let free = (0..config.max_tries).find_map(|_| {
                let corner = random_corner(&mut rng, area, w, h);
                let rect = Aabb::from_origin_size(corner, w, h).expanded(config.margin);
                occupied
                    .iter()
                    .all(|other| !rect.overlaps(other))
                    .then_some((corner, rect))
            });
            let (corner, rect) = free.unwrap_or_else(|| {
                overlapping += 1;
                let corner = random_corner(&mut rng, area, w, h);
                (corner, Aabb::from_origin_size(corner, w, h))
            });
            occupied.push(rect);

            Placement {
                grid_pos: piece.grid_pos,
                position: corner - bounds.min,
                rotation,
            }
        })
        .collect();
    if overlapping > 0 {
        log::debug!("scatter: {overlapping} pieces placed overlapping others");
    }
    placements
}

fn random_corner<R>(rng: &mut R, area: Aabb, w: f32, h: f32) -> Vec2
where
    R: Rng + ?Sized,
{
    let x = random_between(rng, area.min.x, area.max.x - w);
    let y = random_between(rng, area.min.y, area.max.y - h);
    Vec2::new(x, y)
}

fn random_between<R>(rng: &mut R, low: f32, high: f32) -> f32
where
    R: Rng + ?Sized,
{
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}
