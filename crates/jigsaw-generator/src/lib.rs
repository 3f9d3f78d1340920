//! Piece generation for jigsaw puzzles.
//!
//! # Overview
//!
//! - [`partition`]: cuts a `width × height` image into a rows×cols set of
//!   [`PieceGeometry`] values, either exact rectangles or seeded, jittered
//!   quadrilaterals that share their corners with their neighbors.
//! - [`crop`]: runs generation passes, naming every piece texture with a
//!   unique [`TextureKey`] and handing it to a [`PieceCropper`].
//! - [`scatter`](mod@scatter): shuffles the pieces and spreads them over the
//!   play area without overlap.
//! - [`frame`]: fits a source image into the puzzle frame.
//!
//! Everything random is derived from a [`ShapeSeed`]; the same seed always
//! reproduces the same outlines and the same starting layout.
//!
//! # Examples
//!
//! ```
//! use jigsaw_core::{GridSize, Viewport};
//! use jigsaw_generator::{
//!     Partition, PartitionConfig, PieceMode, ScatterConfig, ShapeSeed, scatter,
//! };
//!
//! let seed = ShapeSeed::new(2024);
//! let config = PartitionConfig::new(640, 480, GridSize::new(4, 3), PieceMode::Quad);
//! let partition = Partition::generate(&config, seed);
//! assert_eq!(partition.pieces().len(), 12);
//!
//! let layout = scatter(partition.pieces(), &Viewport::default(), &ScatterConfig::default(), seed);
//! assert_eq!(layout.len(), 12);
//! ```

pub mod crop;
pub mod frame;
pub mod partition;
pub mod scatter;
mod seed;

pub use self::{
    crop::{
        CropRequest, GeneratedPieces, NoopCropper, PieceCropper, PieceGenerator, SourceImage,
        TextureKey,
    },
    frame::{Frame, fit_puzzle_size},
    partition::{Lattice, Partition, PartitionConfig, PieceGeometry, PieceMode},
    scatter::{Placement, ScatterConfig, scatter},
    seed::{SeedStream, ShapeSeed},
};
