//! Cutting a puzzle image into piece outlines.
//!
//! Two cut styles are supported:
//!
//! - [`PieceMode::Rect`]: exact integer-pixel rectangles. Column widths and row
//!   heights are whole pixels that add up to the image size, so adjacent crops
//!   never leave a gap or overlap.
//! - [`PieceMode::Quad`]: a `(rows + 1) × (cols + 1)` lattice whose interior
//!   points are jittered, then pushed apart to keep a minimum gap. Each piece
//!   is the quadrilateral of its four surrounding lattice points; neighbors
//!   share those points, so the pieces tile the image seamlessly.

use jigsaw_core::{Aabb, GridPos, GridSize, Rotation, Vec2};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{SeedStream, ShapeSeed};

/// Default lattice jitter, as a fraction of the cell size.
pub const QUAD_JITTER_RATIO_DEFAULT: f32 = 0.28;
/// Upper bound on the lattice jitter ratio.
///
/// Below one half, the minimum-gap pass can never push a point past the
/// fixed outer boundary.
pub const QUAD_JITTER_RATIO_MAX: f32 = 0.45;
/// Default minimum distance between consecutive lattice points, as a fraction of the cell size.
pub const MIN_CELL_PORTION_DEFAULT: f32 = 0.15;
/// Upper bound on the minimum cell portion.
pub const MIN_CELL_PORTION_MAX: f32 = 0.5;

/// Shape of the pieces a puzzle is cut into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceMode {
    /// Axis-aligned rectangles.
    #[default]
    #[serde(rename = "RECT")]
    Rect,
    /// Randomized quadrilaterals.
    #[serde(rename = "QUAD")]
    Quad,
}

impl PieceMode {
    /// Short lowercase name used in texture keys and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Quad => "quad",
        }
    }
}

/// Input of [`Partition::generate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionConfig {
    /// Puzzle width in pixels.
    pub width: u32,
    /// Puzzle height in pixels.
    pub height: u32,
    /// Grid dimensions.
    pub grid: GridSize,
    /// Cut style.
    pub mode: PieceMode,
    /// Lattice jitter as a fraction of the cell size (quad mode only).
    pub quad_jitter_ratio: f32,
    /// Minimum distance between consecutive lattice points as a fraction of
    /// the cell size (quad mode only).
    pub min_cell_portion: f32,
}

impl PartitionConfig {
    /// Creates a configuration with the default jitter and minimum gap.
    #[must_use]
    pub fn new(width: u32, height: u32, grid: GridSize, mode: PieceMode) -> Self {
        Self {
            width,
            height,
            grid,
            mode,
            quad_jitter_ratio: QUAD_JITTER_RATIO_DEFAULT,
            min_cell_portion: MIN_CELL_PORTION_DEFAULT,
        }
    }

    /// Sets the lattice jitter ratio, clamped to `[0, QUAD_JITTER_RATIO_MAX]`.
    #[must_use]
    pub fn with_quad_jitter_ratio(mut self, ratio: f32) -> Self {
        self.quad_jitter_ratio = ratio;
        self
    }

    /// Sets the minimum cell portion, clamped to `[0, MIN_CELL_PORTION_MAX]`.
    #[must_use]
    pub fn with_min_cell_portion(mut self, portion: f32) -> Self {
        self.min_cell_portion = portion;
        self
    }

    /// Nominal cell width (`width / cols`).
    #[must_use]
    pub fn cell_width(&self) -> f32 {
        self.width as f32 / f32::from(self.grid.cols())
    }

    /// Nominal cell height (`height / rows`).
    #[must_use]
    pub fn cell_height(&self) -> f32 {
        self.height as f32 / f32::from(self.grid.rows())
    }

    fn jitter_ratio(&self) -> f32 {
        finite_or_zero(self.quad_jitter_ratio).clamp(0.0, QUAD_JITTER_RATIO_MAX)
    }

    fn cell_portion(&self) -> f32 {
        finite_or_zero(self.min_cell_portion).clamp(0.0, MIN_CELL_PORTION_MAX)
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// Geometry of one piece.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceGeometry {
    /// Grid cell this piece was cut from.
    pub grid_pos: GridPos,
    /// Polygon in piece-local space; the origin is the piece's bounding-box corner.
    pub outline: Vec<Vec2>,
    /// Bounding width in whole pixels.
    pub width: u32,
    /// Bounding height in whole pixels.
    pub height: u32,
    /// Bounding-box corner in full-image pixel space.
    pub anchor: Vec2,
}

impl PieceGeometry {
    /// The image-space rectangle this piece is cropped from.
    #[must_use]
    pub fn crop_rect(&self) -> Aabb {
        Aabb::from_origin_size(self.anchor, self.width as f32, self.height as f32)
    }

    /// Bounding box of the outline for every quarter turn about the local
    /// origin, indexed by [`Rotation::index`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_core::{GridSize, Rotation, Vec2};
    /// use jigsaw_generator::{Partition, PartitionConfig, PieceMode, ShapeSeed};
    ///
    /// let config = PartitionConfig::new(40, 20, GridSize::new(2, 2), PieceMode::Rect);
    /// let partition = Partition::generate(&config, ShapeSeed::new(0));
    /// let bounds = partition.pieces()[0].rotated_bounds();
    /// assert_eq!(bounds[Rotation::R90.index()].min, Vec2::new(-10.0, 0.0));
    /// assert_eq!(bounds[Rotation::R90.index()].max, Vec2::new(0.0, 20.0));
    /// ```
    #[must_use]
    pub fn rotated_bounds(&self) -> [Aabb; 4] {
        Rotation::ALL.map(|rotation| {
            Aabb::from_points(self.outline.iter().map(|p| rotation.rotate(*p))).unwrap_or_else(
                || {
                    Aabb::from_origin_size(Vec2::ZERO, self.width as f32, self.height as f32)
                        .rotated(rotation)
                },
            )
        })
    }

    /// The outline in full-image pixel space.
    pub fn image_outline(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.outline.iter().map(|p| *p + self.anchor)
    }

    fn from_image_polygon(grid_pos: GridPos, vertices: [Vec2; 4]) -> Self {
        // Whole-pixel bounds keep every crop texture aligned to the image grid.
        let Some(bounds) = Aabb::from_points(vertices) else {
            unreachable!("a quadrilateral has vertices");
        };
        let min = Vec2::new(bounds.min.x.floor(), bounds.min.y.floor());
        let max = Vec2::new(bounds.max.x.ceil(), bounds.max.y.ceil());
        Self {
            grid_pos,
            outline: vertices.iter().map(|v| *v - min).collect(),
            width: whole_pixels(max.x - min.x),
            height: whole_pixels(max.y - min.y),
            anchor: min,
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_pixels(extent: f32) -> u32 {
    (extent.round() as u32).max(1)
}

/// Grid-intersection points of a quadrilateral cut.
///
/// Point `(c, r)` is the corner shared by cells `(c - 1 ..= c, r - 1 ..= r)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    cols: usize,
    rows: usize,
    points: Vec<Vec2>,
}

impl Lattice {
    /// Builds the jittered lattice for `config`, drawing from `rng`.
    pub fn generate<R>(config: &PartitionConfig, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let cols = usize::from(config.grid.cols());
        let rows = usize::from(config.grid.rows());
        let cell_w = config.cell_width();
        let cell_h = config.cell_height();
        let jitter_x = cell_w * config.jitter_ratio();
        let jitter_y = cell_h * config.jitter_ratio();
        let min_gap_x = cell_w * config.cell_portion();
        let min_gap_y = cell_h * config.cell_portion();

        let mut points = Vec::with_capacity((cols + 1) * (rows + 1));
        for r in 0..=rows {
            for c in 0..=cols {
                let mut p = Vec2::new(c as f32 * cell_w, r as f32 * cell_h);
                let boundary = r == 0 || r == rows || c == 0 || c == cols;
                if !boundary {
                    p.x += rng.random_range(-jitter_x..=jitter_x);
                    p.y += rng.random_range(-jitter_y..=jitter_y);
                }
                points.push(p);
            }
        }
        let mut lattice = Self { cols, rows, points };

        for r in 0..=rows {
            for c in 1..cols {
                let prev = lattice.point(c - 1, r).x;
                let cur = lattice.point_mut(c, r);
                if cur.x - prev < min_gap_x {
                    cur.x = prev + min_gap_x;
                }
            }
        }
        for c in 0..=cols {
            for r in 1..rows {
                let prev = lattice.point(c, r - 1).y;
                let cur = lattice.point_mut(c, r);
                if cur.y - prev < min_gap_y {
                    cur.y = prev + min_gap_y;
                }
            }
        }
        lattice
    }

    /// Number of lattice columns (`cols + 1`).
    #[must_use]
    pub fn point_cols(&self) -> usize {
        self.cols + 1
    }

    /// Number of lattice rows (`rows + 1`).
    #[must_use]
    pub fn point_rows(&self) -> usize {
        self.rows + 1
    }

    /// The point at lattice column `c`, row `r`.
    ///
    /// # Panics
    ///
    /// Panics if `c > cols` or `r > rows`.
    #[must_use]
    pub fn point(&self, c: usize, r: usize) -> Vec2 {
        self.points[self.offset(c, r)]
    }

    fn point_mut(&mut self, c: usize, r: usize) -> &mut Vec2 {
        let offset = self.offset(c, r);
        &mut self.points[offset]
    }

    fn offset(&self, c: usize, r: usize) -> usize {
        assert!(c <= self.cols && r <= self.rows, "lattice point out of range");
        r * (self.cols + 1) + c
    }

    /// Corners of cell `pos` in clockwise order (top-left first).
    #[must_use]
    pub fn cell_corners(&self, pos: GridPos) -> [Vec2; 4] {
        let c = usize::from(pos.x);
        let r = usize::from(pos.y);
        [
            self.point(c, r),
            self.point(c + 1, r),
            self.point(c + 1, r + 1),
            self.point(c, r + 1),
        ]
    }
}

/// The result of cutting an image: one [`PieceGeometry`] per grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    grid: GridSize,
    mode: PieceMode,
    cell_width: f32,
    cell_height: f32,
    pieces: Vec<PieceGeometry>,
    lattice: Option<Lattice>,
}

impl Partition {
    /// Cuts the image described by `config`.
    ///
    /// Rectangular cuts do not consume randomness; quadrilateral cuts draw
    /// their jitter from the [`SeedStream::Shape`] stream of `seed`, so the
    /// same seed always reproduces the same outlines.
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_core::GridSize;
    /// use jigsaw_generator::{Partition, PartitionConfig, PieceMode, ShapeSeed};
    ///
    /// let config = PartitionConfig::new(100, 50, GridSize::new(3, 2), PieceMode::Rect);
    /// let partition = Partition::generate(&config, ShapeSeed::new(1));
    /// assert_eq!(partition.pieces().len(), 6);
    ///
    /// let widths: u32 = partition.pieces()[..3].iter().map(|p| p.width).sum();
    /// assert_eq!(widths, 100);
    /// ```
    #[must_use]
    pub fn generate(config: &PartitionConfig, seed: ShapeSeed) -> Self {
        let (pieces, lattice) = match config.mode {
            PieceMode::Rect => (rect_pieces(config), None),
            PieceMode::Quad => {
                let mut rng = seed.rng(SeedStream::Shape);
                let lattice = Lattice::generate(config, &mut rng);
                let pieces = config
                    .grid
                    .positions()
                    .map(|pos| PieceGeometry::from_image_polygon(pos, lattice.cell_corners(pos)))
                    .collect();
                (pieces, Some(lattice))
            }
        };
        log::debug!(
            "partitioned {}x{} image into {} {} pieces",
            config.width,
            config.height,
            pieces.len(),
            config.mode.as_str(),
        );
        Self {
            grid: config.grid,
            mode: config.mode,
            cell_width: config.cell_width(),
            cell_height: config.cell_height(),
            pieces,
            lattice,
        }
    }

    /// Grid dimensions.
    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Cut style.
    #[must_use]
    pub fn mode(&self) -> PieceMode {
        self.mode
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

    /// Pieces in row-major grid order.
    #[must_use]
    pub fn pieces(&self) -> &[PieceGeometry] {
        &self.pieces
    }

    /// Consumes the partition, returning its pieces.
    #[must_use]
    pub fn into_pieces(self) -> Vec<PieceGeometry> {
        self.pieces
    }

    /// The jittered lattice of a quadrilateral cut.
    #[must_use]
    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }
}

/// Splits `total` into `parts` whole-pixel segments that add up to `total`.
///
/// The remainder is spread one pixel at a time over the first segments.
///
/// # Examples
///
/// ```
/// use jigsaw_generator::partition::split_evenly;
///
/// assert_eq!(split_evenly(10, 3), [4, 3, 3]);
/// ```
#[must_use]
pub fn split_evenly(total: u32, parts: u16) -> Vec<u32> {
    let parts = u32::from(parts.max(1));
    let base = total / parts;
    let remainder = total % parts;
    (0..parts)
        .map(|i| base + u32::from(i < remainder))
        .collect()
}

fn rect_pieces(config: &PartitionConfig) -> Vec<PieceGeometry> {
    let col_widths = split_evenly(config.width, config.grid.cols());
    let row_heights = split_evenly(config.height, config.grid.rows());
    let cuts = |sizes: &[u32]| -> Vec<u32> {
        sizes
            .iter()
            .scan(0, |acc, size| {
                let start = *acc;
                *acc += size;
                Some(start)
            })
            .collect()
    };
    let x_cuts = cuts(&col_widths);
    let y_cuts = cuts(&row_heights);

    config
        .grid
        .positions()
        .map(|pos| {
            let w = col_widths[usize::from(pos.x)];
            let h = row_heights[usize::from(pos.y)];
            let (wf, hf) = (w as f32, h as f32);
            PieceGeometry {
                grid_pos: pos,
                outline: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(wf, 0.0),
                    Vec2::new(wf, hf),
                    Vec2::new(0.0, hf),
                ],
                width: w,
                height: h,
                anchor: Vec2::new(
                    x_cuts[usize::from(pos.x)] as f32,
                    y_cuts[usize::from(pos.y)] as f32,
                ),
            }
        })
        .collect()
}
