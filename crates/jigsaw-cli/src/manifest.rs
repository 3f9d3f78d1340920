use std::{collections::BTreeMap, convert::Infallible};

use jigsaw_core::{GridPos, Vec2};
use jigsaw_generator::{CropRequest, PieceCropper, TextureKey};
use serde::Serialize;

/// One texture a renderer has to cut from the source image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropEntry {
    pub key: String,
    pub grid_pos: GridPos,
    /// `[x, y, width, height]` in source-image pixels.
    pub source_rect: [f32; 4],
    /// Clip polygon in piece-local puzzle pixels.
    pub outline: Vec<Vec2>,
}

/// A [`PieceCropper`] that records crop jobs instead of producing textures,
/// so they can be handed to an external renderer.
#[derive(Debug, Default)]
pub struct CropManifest {
    entries: BTreeMap<TextureKey, CropEntry>,
}

impl CropManifest {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by texture key.
    pub fn entries(&self) -> impl Iterator<Item = &CropEntry> + '_ {
        self.entries.values()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries().collect::<Vec<_>>())
    }
}

impl PieceCropper for CropManifest {
    type Error = Infallible;

    fn crop(&mut self, request: &CropRequest<'_>) -> Result<(), Self::Error> {
        let rect = request.source_rect();
        let entry = CropEntry {
            key: request.key.to_string(),
            grid_pos: request.piece.grid_pos,
            source_rect: [rect.min.x, rect.min.y, rect.width(), rect.height()],
            outline: request.piece.outline.clone(),
        };
        self.entries.insert(request.key.clone(), entry);
        Ok(())
    }

    fn release(&mut self, key: &TextureKey) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use jigsaw_core::GridSize;
    use jigsaw_generator::{PartitionConfig, PieceGenerator, PieceMode, ShapeSeed, SourceImage};

    use super::*;

    #[test]
    fn test_manifest_tracks_latest_pass() {
        let mut generator = PieceGenerator::new();
        let mut manifest = CropManifest::default();
        let config = PartitionConfig::new(200, 100, GridSize::new(2, 2), PieceMode::Rect);
        let source = SourceImage {
            width: 400,
            height: 200,
        };
        let Ok(_) = generator.generate(source, &config, ShapeSeed::new(1), &mut manifest);
        let Ok(_) = generator.generate(source, &config, ShapeSeed::new(2), &mut manifest);

        assert_eq!(manifest.len(), 4);
        assert!(manifest.entries().all(|e| e.key.ends_with("-2")));
        let first = manifest.entries().next().unwrap();
        assert_eq!(first.source_rect, [0.0, 0.0, 200.0, 100.0]);
    }
}
