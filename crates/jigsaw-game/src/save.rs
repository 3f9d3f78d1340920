//! The persisted layout of a puzzle in progress.

use std::collections::BTreeMap;

use jigsaw_generator::{PieceMode, ShapeSeed};
use serde::{Deserialize, Serialize};

use crate::RestoreError;

/// Version written by [`Session::export_state`](crate::Session::export_state).
///
/// Older saves have no stable piece ids and reference pieces by their
/// row-major index instead.
pub const SAVE_VERSION: u32 = 2;

/// A saved puzzle.
///
/// Every record is optional on input so that incomplete data can be
/// reported as a [`RestoreError`] rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    /// Format version.
    #[serde(default)]
    pub version: u32,
    /// Puzzle settings.
    #[serde(default)]
    pub scene: Option<SceneSave>,
    /// Pose of every piece.
    #[serde(default)]
    pub pieces: Option<Vec<PieceSave>>,
    /// Group membership, keyed by the decimal group id.
    #[serde(default)]
    pub groups: Option<BTreeMap<String, Vec<PieceRef>>>,
}

/// Puzzle settings of a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSave {
    /// Grid rows.
    pub rows: u16,
    /// Grid columns.
    pub cols: u16,
    /// Image identifier.
    #[serde(default)]
    pub image_key: String,
    /// Image display name.
    #[serde(default)]
    pub image_name: String,
    /// Cut style.
    #[serde(default)]
    pub piece_mode: PieceMode,
    /// Seconds spent on the puzzle.
    #[serde(default)]
    pub timer: f64,
    /// Seed the piece shapes were generated from.
    #[serde(default)]
    pub shape_seed: Option<ShapeSeed>,
}

/// Saved pose of one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSave {
    /// Stable id `"{gx}_{gy}"`; absent in legacy saves.
    #[serde(default)]
    pub id: Option<String>,
    /// Grid column.
    #[serde(default)]
    pub gx: u16,
    /// Grid row.
    #[serde(default)]
    pub gy: u16,
    /// World x of the piece origin.
    pub x: f32,
    /// World y of the piece origin.
    pub y: f32,
    /// Quarter turns, 0-3.
    #[serde(default)]
    pub rot: u8,
    /// Id of the group the piece belonged to.
    #[serde(default)]
    pub group_id: Option<u32>,
}

impl PieceSave {
    /// The piece id, derived from the grid coordinates when absent.
    #[must_use]
    pub fn reference(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.gx, self.gy))
    }
}

/// A group member: a piece id, or a row-major index in legacy saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(untagged)]
pub enum PieceRef {
    /// Stable piece id.
    Id(String),
    /// Row-major piece index.
    Index(usize),
}

impl SaveData {
    /// Returns `true` for saves written before stable piece ids existed.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.version < SAVE_VERSION
    }

    /// Parses a save from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::Json`] if `json` does not match the save format.
    ///
    /// # Examples
    ///
    /// ```
    /// use jigsaw_game::SaveData;
    ///
    /// let save = SaveData::from_json(r#"{"version": 1, "pieces": [{"x": 1, "y": 2}]}"#)?;
    /// assert!(save.is_legacy());
    /// assert!(save.scene.is_none());
    /// # Ok::<(), jigsaw_game::RestoreError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the save as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_v2_save() {
        let json = r#"{
            "version": 2,
            "scene": {
                "rows": 2, "cols": 3, "imageKey": "cat", "imageName": "Cat",
                "pieceMode": "QUAD", "timer": 12.5, "shapeSeed": -7
            },
            "pieces": [{"id": "1_0", "gx": 1, "gy": 0, "x": 10.5, "y": 20, "rot": 3, "groupId": 4}],
            "groups": {"4": ["1_0"]}
        }"#;
        let save = SaveData::from_json(json).unwrap();
        assert!(!save.is_legacy());
        let scene = save.scene.as_ref().unwrap();
        assert_eq!(scene.piece_mode, PieceMode::Quad);
        assert_eq!(scene.shape_seed, Some(ShapeSeed::new(u32::MAX - 6)));
        let piece = &save.pieces.as_ref().unwrap()[0];
        assert_eq!(piece.rot, 3);
        assert_eq!(piece.group_id, Some(4));
        assert_eq!(save.groups.unwrap()["4"], [PieceRef::Id("1_0".into())]);
    }

    #[test]
    fn test_legacy_groups_hold_indices() {
        let json = r#"{"scene": {"rows": 2, "cols": 2}, "pieces": [], "groups": {"1": [0, 3]}}"#;
        let save = SaveData::from_json(json).unwrap();
        assert_eq!(save.version, 0);
        assert_eq!(
            save.groups.unwrap()["1"],
            [PieceRef::Index(0), PieceRef::Index(3)]
        );
    }

    #[test]
    fn test_reference_falls_back_to_coordinates() {
        let piece = PieceSave {
            id: None,
            gx: 2,
            gy: 1,
            x: 0.0,
            y: 0.0,
            rot: 0,
            group_id: None,
        };
        assert_eq!(piece.reference(), "2_1");
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            SaveData::from_json("{\"pieces\": 3}"),
            Err(RestoreError::Json(_))
        ));
    }
}
