//! JSON snapshots of a tilemap
//!
//! Only the non-default pieces inside the bounding qube are stored, so a
//! mostly-empty 100³ grid serializes to a few lines.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::tile::Tile;
use super::tilemap::{TilePiece, Tilemap};
use crate::core::error::Error;
use crate::core::types::{Result, UVec3};
use crate::math::Qube;

/// Serialized form of a [`Tilemap`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilemapState {
    pub tile_pieces: Vec<TilePiece>,
    pub volume: UVec3,
    pub default_tile: Tile,
    pub bounding_qube: Option<Qube>,
}

impl TilemapState {
    /// Capture the current contents of a tilemap
    pub fn capture(tilemap: &Tilemap) -> Self {
        let tile_pieces = match tilemap.bounding_qube() {
            Some(bounding) => tilemap.tiles(bounding).collect(),
            None => Vec::new(),
        };
        Self {
            tile_pieces,
            volume: tilemap.volume(),
            default_tile: tilemap.default_tile(),
            bounding_qube: tilemap.bounding_qube(),
        }
    }

    /// Rebuild a tilemap, validating the stored volume
    pub fn restore(&self) -> Result<Tilemap> {
        if self.volume.min_element() == 0 {
            return Err(Error::InvalidSnapshot(format!(
                "volume {:?} has an empty axis",
                self.volume
            )));
        }
        Ok(Tilemap::from_parts(
            self.volume,
            self.default_tile,
            self.bounding_qube,
            &self.tile_pieces,
        ))
    }
}

impl Tilemap {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&TilemapState::capture(self))?)
    }

    /// Deserialize from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state: TilemapState = serde_json::from_str(json)?;
        state.restore()
    }

    /// Save to file (sync)
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&TilemapState::capture(self))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        log::debug!("Saved tilemap snapshot to {}", path.display());
        Ok(())
    }

    /// Load from file (sync)
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let tilemap = Self::from_json(&json)?;
        log::debug!(
            "Loaded {:?} tilemap from {}",
            tilemap.volume(),
            path.display()
        );
        Ok(tilemap)
    }
}
