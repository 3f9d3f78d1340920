//! Puzzle grid coordinates and adjacency.

use std::{
    fmt::{self, Display},
    iter::FusedIterator,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

/// A cell of the puzzle grid, identified by column `x` and row `y`.
///
/// The display form `"{x}_{y}"` doubles as the stable piece id in save files.
///
/// # Examples
///
/// ```
/// use jigsaw_core::GridPos;
///
/// let pos = GridPos::new(2, 1);
/// assert_eq!(pos.to_string(), "2_1");
/// assert_eq!("2_1".parse::<GridPos>(), Ok(pos));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridPos {
    /// Column index.
    pub x: u16,
    /// Row index.
    pub y: u16,
}

impl GridPos {
    /// Creates a grid position.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

/// Error returned when parsing a [`GridPos`] id fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece id: {input:?}")]
pub struct ParseGridPosError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for GridPos {
    type Err = ParseGridPosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGridPosError {
            input: s.to_owned(),
        };
        let (x, y) = s.split_once('_').ok_or_else(err)?;
        let x = x.parse().map_err(|_| err())?;
        let y = y.parse().map_err(|_| err())?;
        Ok(Self::new(x, y))
    }
}

/// Dimensions of a puzzle grid.
///
/// Both dimensions lie in [`GridSize::MIN`]`..=`[`GridSize::MAX`]; other
/// requests are clamped when constructing, so neither a degenerate nor an
/// oversized grid can reach the partitioner.
///
/// Cells are indexed in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    cols: u16,
    rows: u16,
}

impl GridSize {
    /// Smallest allowed row or column count.
    pub const MIN: u16 = 2;
    /// Largest allowed row or column count.
    pub const MAX: u16 = 30;

    /// Creates a grid of `cols` × `rows` cells, clamping each to
    /// [`GridSize::MIN`]`..=`[`GridSize::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_core::GridSize;
    ///
    /// let grid = GridSize::new(0, 5);
    /// assert_eq!((grid.cols(), grid.rows()), (2, 5));
    /// assert_eq!(GridSize::new(64, 3).cols(), GridSize::MAX);
    /// ```
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.clamp(Self::MIN, Self::MAX),
            rows: rows.clamp(Self::MIN, Self::MAX),
        }
    }

    /// Returns `true` if `cols` × `rows` is a grid [`GridSize::new`] keeps
    /// as is.
    #[must_use]
    pub const fn is_valid(cols: u16, rows: u16) -> bool {
        cols >= Self::MIN && cols <= Self::MAX && rows >= Self::MIN && rows <= Self::MAX
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(self) -> u16 {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(self) -> u16 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub const fn len(self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Always `false`; a grid has at least four cells.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Returns `true` if `pos` lies inside the grid.
    #[must_use]
    pub const fn contains(self, pos: GridPos) -> bool {
        pos.x < self.cols && pos.y < self.rows
    }

    /// Row-major index of `pos`, or `None` if it lies outside the grid.
    #[must_use]
    pub fn index_of(self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| usize::from(pos.y) * usize::from(self.cols) + usize::from(pos.x))
    }

    /// Position of the cell with row-major `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than [`GridSize::len`].
    #[must_use]
    pub fn pos_at(self, index: usize) -> GridPos {
        assert!(index < self.len(), "cell index {index} out of range");
        let cols = usize::from(self.cols);
        #[expect(clippy::cast_possible_truncation)]
        let pos = GridPos::new((index % cols) as u16, (index / cols) as u16);
        pos
    }

    /// Iterates over all cells in row-major order.
    #[must_use]
    pub fn positions(self) -> GridPositions {
        GridPositions {
            grid: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Returns the grid-adjacent cells of `pos` (left, right, up, down order),
    /// skipping those outside the grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_core::{GridPos, GridSize};
    ///
    /// let grid = GridSize::new(3, 3);
    /// let center: Vec<_> = grid.neighbors(GridPos::new(1, 1)).into_iter().collect();
    /// assert_eq!(
    ///     center,
    ///     [GridPos::new(0, 1), GridPos::new(2, 1), GridPos::new(1, 0), GridPos::new(1, 2)]
    /// );
    /// ```
    #[must_use]
    pub fn neighbors(self, pos: GridPos) -> ArrayVec<[GridPos; 4]> {
        let mut out = ArrayVec::new();
        if pos.x > 0 {
            out.push(GridPos::new(pos.x - 1, pos.y));
        }
        if pos.x + 1 < self.cols {
            out.push(GridPos::new(pos.x + 1, pos.y));
        }
        if pos.y > 0 {
            out.push(GridPos::new(pos.x, pos.y - 1));
        }
        if pos.y + 1 < self.rows {
            out.push(GridPos::new(pos.x, pos.y + 1));
        }
        out
    }
}

/// Iterator over all cells of a grid in row-major order.
#[derive(Debug, Clone)]
pub struct GridPositions {
    grid: GridSize,
    front: usize,
    back: usize,
}

impl Iterator for GridPositions {
    type Item = GridPos;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let pos = self.grid.pos_at(self.front);
        self.front += 1;
        Some(pos)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for GridPositions {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.grid.pos_at(self.back))
    }
}

impl FusedIterator for GridPositions {}
impl ExactSizeIterator for GridPositions {}
