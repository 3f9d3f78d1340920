//! Quarter-turn rotations.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::Vec2;

/// A rotation by a multiple of 90°, clockwise on screen (y grows downwards).
///
/// Rotating with this type is exact: coordinates are swapped and negated,
/// never multiplied by a rounded sine or cosine, so four quarter turns always
/// bring a point back to where it started.
///
/// Serialized as its step count (0-3).
///
/// # Examples
///
/// ```
/// use jigsaw_core::{Rotation, Vec2};
///
/// let r = Rotation::from_steps(5);
/// assert_eq!(r, Rotation::R90);
/// assert_eq!(r.steps(), 1);
///
/// let p = Vec2::new(3.0, 1.0);
/// assert_eq!(Rotation::R90.rotate(p), Vec2::new(-1.0, 3.0));
/// assert_eq!(Rotation::R0.delta_to(Rotation::R270), 3);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Rotation {
    /// No rotation.
    #[default]
    R0 = 0,
    /// One quarter turn.
    R90 = 1,
    /// Half turn.
    R180 = 2,
    /// Three quarter turns.
    R270 = 3,
}

impl Rotation {
    /// All rotations in step order.
    pub const ALL: [Self; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    /// Creates a rotation from a step count, wrapping modulo 4.
    #[must_use]
    pub const fn from_steps(steps: u8) -> Self {
        match steps % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    /// Number of quarter turns (0-3).
    #[must_use]
    pub const fn steps(self) -> u8 {
        self as u8
    }

    /// Index usable for per-rotation tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns this rotation advanced by `steps` quarter turns.
    #[must_use]
    pub const fn add_steps(self, steps: u8) -> Self {
        Self::from_steps(self.steps() + steps % 4)
    }

    /// Returns the next quarter turn.
    #[must_use]
    pub const fn next(self) -> Self {
        self.add_steps(1)
    }

    /// Number of quarter turns needed to go from `self` to `target`
    /// (`(target - self + 4) mod 4`).
    #[must_use]
    pub const fn delta_to(self, target: Self) -> u8 {
        (target.steps() + 4 - self.steps()) % 4
    }

    /// Rotation angle in radians.
    #[must_use]
    pub fn radians(self) -> f32 {
        f32::from(self.steps()) * std::f32::consts::FRAC_PI_2
    }

    /// Rotates `v` about the origin.
    ///
    /// Equivalent to the standard rotation matrix
    /// `(x·cos θ − y·sin θ, x·sin θ + y·cos θ)` evaluated exactly.
    #[must_use]
    pub fn rotate(self, v: Vec2) -> Vec2 {
        match self {
            Self::R0 => v,
            Self::R90 => Vec2::new(-v.y, v.x),
            Self::R180 => Vec2::new(-v.x, -v.y),
            Self::R270 => Vec2::new(v.y, -v.x),
        }
    }
}

impl Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", u16::from(self.steps()) * 90)
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> u8 {
        rotation.steps()
    }
}

/// Error returned when a step count is outside 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid rotation step count: {steps}")]
pub struct InvalidRotation {
    /// The rejected value.
    pub steps: u8,
}

impl TryFrom<u8> for Rotation {
    type Error = InvalidRotation;

    fn try_from(steps: u8) -> Result<Self, Self::Error> {
        if steps < 4 {
            Ok(Self::from_steps(steps))
        } else {
            Err(InvalidRotation { steps })
        }
    }
}
