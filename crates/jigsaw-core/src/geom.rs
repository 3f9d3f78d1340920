//! Pixel-space geometry.

use serde::{Deserialize, Serialize};

use crate::Rotation;

/// A 2D point or offset in pixel space (y grows downwards).
///
/// # Examples
///
/// ```
/// use jigsaw_core::Vec2;
///
/// let a = Vec2::new(1.0, 2.0);
/// let b = Vec2::new(3.0, 5.0);
/// assert_eq!(b - a, Vec2::new(2.0, 3.0));
/// assert_eq!(-a, Vec2::new(-1.0, -2.0));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Neg,
    derive_more::AddAssign,
    derive_more::SubAssign,
)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Returns this vector rotated about the origin by `rotation`.
    #[must_use]
    pub fn rotated(self, rotation: Rotation) -> Self {
        rotation.rotate(self)
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns `true` if both components differ from `other` by at most `eps`.
    #[must_use]
    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (left/top).
    pub min: Vec2,
    /// Maximum corner (right/bottom).
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box from its corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates the box `[origin, origin + size]`.
    #[must_use]
    pub fn from_origin_size(origin: Vec2, width: f32, height: f32) -> Self {
        Self::new(origin, origin + Vec2::new(width, height))
    }

    /// Returns the tightest box around `points`, or `None` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_core::{Aabb, Vec2};
    ///
    /// let aabb = Aabb::from_points([Vec2::new(2.0, -1.0), Vec2::new(-3.0, 4.0)]).unwrap();
    /// assert_eq!(aabb.min, Vec2::new(-3.0, -1.0));
    /// assert_eq!(aabb.max, Vec2::new(2.0, 4.0));
    /// assert!(Aabb::from_points([]).is_none());
    /// ```
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
        }
        Some(aabb)
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Returns the box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Returns the box rotated about the origin by `rotation`.
    ///
    /// Quarter turns map boxes to boxes, so the result is exact.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let a = rotation.rotate(self.min);
        let b = rotation.rotate(self.max);
        Self::new(
            Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }

    /// Returns the box grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        let m = Vec2::new(margin, margin);
        Self::new(self.min - m, self.max + m)
    }

    /// Returns `true` if the boxes share any point, edges included.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// Signed area of a simple polygon (positive for clockwise order in y-down space).
#[must_use]
pub fn polygon_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// Returns `true` if `p` lies inside the polygon (even-odd rule).
#[must_use]
pub fn polygon_contains(points: &[Vec2], p: Vec2) -> bool {
    let n = points.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
