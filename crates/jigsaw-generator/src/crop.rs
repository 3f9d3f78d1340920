//! Piece generation passes and the image-cropping collaborator.
//!
//! The generator only computes geometry. Producing a texture for each piece
//! (clipping the source image to the piece polygon) is delegated to a
//! [`PieceCropper`] supplied by the front end.

use std::{
    convert::Infallible,
    fmt::{self, Display},
};

use jigsaw_core::{Aabb, GridPos};

use crate::{Partition, PartitionConfig, PieceGeometry, PieceMode, ShapeSeed};

/// Unique name of one piece texture, `"{mode}-{gx}-{gy}-{pass}"`.
///
/// The pass number increases with every generation, so textures of a previous
/// puzzle never collide with the current one.
///
/// # Examples
///
/// ```
/// use jigsaw_core::GridPos;
/// use jigsaw_generator::{PieceMode, TextureKey};
///
/// let key = TextureKey::new(PieceMode::Quad, GridPos::new(2, 0), 7);
/// assert_eq!(key.as_str(), "quad-2-0-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureKey(String);

impl TextureKey {
    /// Builds the key for piece `pos` of generation `pass`.
    #[must_use]
    pub fn new(mode: PieceMode, pos: GridPos, pass: u64) -> Self {
        Self(format!("{}-{}-{}-{pass}", mode.as_str(), pos.x, pos.y))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One texture the cropper has to produce.
#[derive(Debug, Clone, Copy)]
pub struct CropRequest<'a> {
    /// Name to register the texture under.
    pub key: &'a TextureKey,
    /// Piece polygon and crop rectangle.
    pub piece: &'a PieceGeometry,
    /// Factor mapping source-image pixels to puzzle pixels.
    pub source_scale: f32,
}

impl CropRequest<'_> {
    /// Rectangle of the source image to read, in source pixels.
    #[must_use]
    pub fn source_rect(&self) -> Aabb {
        let rect = self.piece.crop_rect();
        if self.source_scale > 0.0 {
            let inv = self.source_scale.recip();
            Aabb::new(rect.min.scale(inv), rect.max.scale(inv))
        } else {
            rect
        }
    }
}

/// Produces piece textures from the puzzle image.
pub trait PieceCropper {
    /// Error reported when a texture cannot be produced.
    type Error;

    /// Clips the source image to `request.piece` and stores the result under `request.key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the texture cannot be produced; generation stops at
    /// the first failure.
    fn crop(&mut self, request: &CropRequest<'_>) -> Result<(), Self::Error>;

    /// Drops a texture produced by an earlier pass.
    fn release(&mut self, key: &TextureKey) {
        let _ = key;
    }
}

/// A cropper that produces nothing, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCropper;

impl PieceCropper for NoopCropper {
    type Error = Infallible;

    fn crop(&mut self, _request: &CropRequest<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Size of the source image in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Output of [`PieceGenerator::generate`].
#[derive(Debug, Clone)]
pub struct GeneratedPieces {
    /// Piece geometry.
    pub partition: Partition,
    /// Texture key of each piece, in the same order as [`Partition::pieces`].
    pub keys: Vec<TextureKey>,
    /// Seed the geometry was generated from.
    pub seed: ShapeSeed,
}

/// Runs partition passes and hands every piece to a [`PieceCropper`].
///
/// The generator remembers the keys of its last pass and releases them
/// before starting the next one.
///
/// # Examples
///
/// ```
/// use jigsaw_core::GridSize;
/// use jigsaw_generator::{
///     NoopCropper, PartitionConfig, PieceGenerator, PieceMode, ShapeSeed, SourceImage,
/// };
///
/// let mut generator = PieceGenerator::new();
/// let config = PartitionConfig::new(300, 200, GridSize::new(3, 2), PieceMode::Quad);
/// let source = SourceImage { width: 600, height: 400 };
/// let Ok(generated) = generator.generate(source, &config, ShapeSeed::new(1), &mut NoopCropper);
/// assert_eq!(generated.keys[0].as_str(), "quad-0-0-1");
/// ```
#[derive(Debug, Default)]
pub struct PieceGenerator {
    pass: u64,
    live_keys: Vec<TextureKey>,
}

impl PieceGenerator {
    /// Creates a generator that has not run any pass yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Keys produced by the most recent pass.
    #[must_use]
    pub fn live_keys(&self) -> &[TextureKey] {
        &self.live_keys
    }

    /// Cuts the puzzle and crops a texture for every piece.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `cropper`. Textures cropped before
    /// the failure are released again.
    pub fn generate<C>(
        &mut self,
        source: SourceImage,
        config: &PartitionConfig,
        seed: ShapeSeed,
        cropper: &mut C,
    ) -> Result<GeneratedPieces, C::Error>
    where
        C: PieceCropper,
    {
        self.release_all(cropper);
        self.pass += 1;

        let partition = Partition::generate(config, seed);
        let source_scale = source_scale(source, config);
        let mut keys = Vec::with_capacity(partition.pieces().len());
        for piece in partition.pieces() {
            let key = TextureKey::new(config.mode, piece.grid_pos, self.pass);
            let request = CropRequest {
                key: &key,
                piece,
                source_scale,
            };
            if let Err(err) = cropper.crop(&request) {
                log::warn!("cropping {key} failed, releasing {} textures", keys.len());
                for key in &keys {
                    cropper.release(key);
                }
                return Err(err);
            }
            keys.push(key);
        }
        self.live_keys.clone_from(&keys);
        Ok(GeneratedPieces {
            partition,
            keys,
            seed,
        })
    }

    /// Releases every texture of the most recent pass.
    pub fn release_all<C>(&mut self, cropper: &mut C)
    where
        C: PieceCropper,
    {
        for key in self.live_keys.drain(..) {
            cropper.release(&key);
        }
    }
}

fn source_scale(source: SourceImage, config: &PartitionConfig) -> f32 {
    if source.width == 0 || source.height == 0 {
        return 1.0;
    }
    (config.width as f32 / source.width as f32).min(config.height as f32 / source.height as f32)
}

#[cfg(test)]
mod tests {
    use jigsaw_core::GridSize;

    use super::*;

    #[derive(Default)]
    struct RecordingCropper {
        cropped: Vec<String>,
        released: Vec<String>,
        fail_at: Option<usize>,
    }

    impl PieceCropper for RecordingCropper {
        type Error = String;

        fn crop(&mut self, request: &CropRequest<'_>) -> Result<(), Self::Error> {
            if self.fail_at == Some(self.cropped.len()) {
                return Err(format!("failed at {}", request.key));
            }
            self.cropped.push(request.key.to_string());
            Ok(())
        }

        fn release(&mut self, key: &TextureKey) {
            self.released.push(key.to_string());
        }
    }

    fn config() -> PartitionConfig {
        PartitionConfig::new(200, 100, GridSize::new(2, 2), PieceMode::Rect)
    }

    const SOURCE: SourceImage = SourceImage {
        width: 400,
        height: 400,
    };

    #[test]
    fn test_each_pass_uses_fresh_keys_and_releases_old_ones() {
        let mut generator = PieceGenerator::new();
        let mut cropper = RecordingCropper::default();
        let first = generator
            .generate(SOURCE, &config(), ShapeSeed::new(1), &mut cropper)
            .unwrap();
        assert_eq!(first.keys[3].as_str(), "rect-1-1-1");
        assert!(cropper.released.is_empty());

        let second = generator
            .generate(SOURCE, &config(), ShapeSeed::new(1), &mut cropper)
            .unwrap();
        assert_eq!(second.keys[0].as_str(), "rect-0-0-2");
        assert_eq!(cropper.released.len(), 4);
        assert_eq!(cropper.released[0], "rect-0-0-1");
        assert_eq!(generator.live_keys(), second.keys.as_slice());
    }

    #[test]
    fn test_failed_pass_releases_partial_textures() {
        let mut generator = PieceGenerator::new();
        let mut cropper = RecordingCropper {
            fail_at: Some(2),
            ..RecordingCropper::default()
        };
        let result = generator.generate(SOURCE, &config(), ShapeSeed::new(1), &mut cropper);
        assert!(result.is_err());
        assert_eq!(cropper.released, ["rect-0-0-1", "rect-1-0-1"]);
        assert!(generator.live_keys().is_empty());
    }

    #[test]
    fn test_source_rect_undoes_scale() {
        let partition = Partition::generate(&config(), ShapeSeed::new(0));
        let key = TextureKey::new(PieceMode::Rect, GridPos::new(1, 0), 1);
        let request = CropRequest {
            key: &key,
            piece: &partition.pieces()[1],
            source_scale: 0.25,
        };
        let rect = request.source_rect();
        assert_eq!(rect.min.x, 400.0);
        assert_eq!(rect.max.y, 200.0);
    }
}
