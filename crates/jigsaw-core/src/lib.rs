//! Core data structures for jigsaw puzzle applications.
//!
//! This crate provides the small geometric and grid types shared by the piece
//! partitioner, the assembly engine and front ends.
//!
//! # Overview
//!
//! 1. **Geometry** - Plain 2D math in pixel space
//!    - [`geom`]: [`Vec2`] points/offsets, axis-aligned [`Aabb`] boxes and polygon helpers
//!    - [`rotation`]: [`Rotation`], an exact quarter-turn rotation
//!    - [`viewport`]: the [`Viewport`] play area pieces are kept inside
//!
//! 2. **Grid** - The rows×cols lattice every puzzle is cut from
//!    - [`grid`]: [`GridPos`] cell coordinates, [`GridSize`] dimensions and
//!      grid-adjacency lookup
//!
//! # Examples
//!
//! ```
//! use jigsaw_core::{GridPos, GridSize, Rotation, Vec2};
//!
//! let grid = GridSize::new(3, 2);
//! assert_eq!(grid.len(), 6);
//! assert_eq!(grid.neighbors(GridPos::new(0, 0)).len(), 2);
//!
//! let v = Rotation::R90.rotate(Vec2::new(10.0, 0.0));
//! assert_eq!(v, Vec2::new(0.0, 10.0));
//! ```

pub mod geom;
pub mod grid;
pub mod rotation;
pub mod viewport;

pub use self::{
    geom::{Aabb, Vec2},
    grid::{GridPos, GridSize, ParseGridPosError},
    rotation::{InvalidRotation, Rotation},
    viewport::Viewport,
};
