//! Puzzle sizing.

use crate::SourceImage;

/// Largest box the assembled puzzle may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Maximum puzzle width in pixels.
    pub width: u32,
    /// Maximum puzzle height in pixels.
    pub height: u32,
}

impl Frame {
    /// The default 680×460 frame.
    pub const DEFAULT: Self = Self {
        width: 680,
        height: 460,
    };
}

impl Default for Frame {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scales `source` to fit `frame` while keeping its aspect ratio.
///
/// Small images are scaled up; the result is rounded to whole pixels and is
/// never zero.
///
/// # Examples
///
/// ```
/// use jigsaw_generator::{Frame, SourceImage, fit_puzzle_size};
///
/// let source = SourceImage { width: 1000, height: 500 };
/// assert_eq!(fit_puzzle_size(source, Frame::DEFAULT), (680, 340));
/// ```
#[must_use]
pub fn fit_puzzle_size(source: SourceImage, frame: Frame) -> (u32, u32) {
    if source.width == 0 || source.height == 0 {
        return (frame.width.max(1), frame.height.max(1));
    }
    let (sw, sh) = (f64::from(source.width), f64::from(source.height));
    let scale = (f64::from(frame.width) / sw).min(f64::from(frame.height) / sh);
    (round_pixels(sw * scale), round_pixels(sh * scale))
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_pixels(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_portrait_and_upscale() {
        let tall = SourceImage {
            width: 500,
            height: 1000,
        };
        assert_eq!(fit_puzzle_size(tall, Frame::DEFAULT), (230, 460));

        let tiny = SourceImage {
            width: 68,
            height: 23,
        };
        assert_eq!(fit_puzzle_size(tiny, Frame::DEFAULT), (680, 230));
    }

    #[test]
    fn test_empty_source_uses_frame() {
        let empty = SourceImage {
            width: 0,
            height: 10,
        };
        assert_eq!(fit_puzzle_size(empty, Frame::DEFAULT), (680, 460));
    }
}
