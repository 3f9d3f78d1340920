use jigsaw_core::GridSize;
use jigsaw_game::{ChallengeLevel, ImageRef, SessionConfig};
use jigsaw_generator::{Frame, PieceMode, SourceImage, fit_puzzle_size};

/// What the player picked on the puzzle setup screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleSetup {
    pub image: ImageRef,
    pub source: SourceImage,
    pub grid: GridSize,
    pub mode: PieceMode,
    pub rotate: bool,
}

impl PuzzleSetup {
    /// A normal-mode session configuration, with the image fit into the
    /// default frame.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let (width, height) = fit_puzzle_size(self.source, Frame::DEFAULT);
        let mut config =
            SessionConfig::new(self.image.clone(), width, height, self.grid, self.mode);
        config.scatter.rotate_initially = self.rotate;
        config
    }
}

/// A challenge session configuration for `level` with a source image of the
/// given size.
#[must_use]
pub fn challenge_config(level: &ChallengeLevel, source: SourceImage) -> SessionConfig {
    let (width, height) = fit_puzzle_size(source, Frame::DEFAULT);
    let name = format!("Challenge {}", level.level);
    SessionConfig::challenge(level, name, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_fits_image_into_frame() {
        let setup = PuzzleSetup {
            image: ImageRef::default(),
            source: SourceImage {
                width: 2000,
                height: 1000,
            },
            grid: GridSize::new(4, 3),
            mode: PieceMode::Quad,
            rotate: true,
        };
        let config = setup.session_config();
        assert_eq!((config.puzzle_width, config.puzzle_height), (680, 340));
        assert!(config.scatter.rotate_initially);
        assert!(config.rotation_enabled());
    }

    #[test]
    fn test_challenge_config_follows_level() {
        let level = ChallengeLevel::get(3).unwrap();
        let config = challenge_config(&level, SourceImage { width: 460, height: 460 });
        assert_eq!(config.grid, GridSize::new(4, 4));
        assert_eq!(config.image.key, "challenge_level3");
        assert_eq!((config.puzzle_width, config.puzzle_height), (460, 460));
        assert!(config.scatter.rotate_initially);
    }
}
