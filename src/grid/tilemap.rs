//! Dense tile grid with a growth-only bounding qube

use serde::{Deserialize, Serialize};

use super::tile::Tile;
use crate::core::types::{IVec3, Position, UVec3};
use crate::decompose::TileLookup;
use crate::math::Qube;

/// Default grid volume (cells per axis)
pub const DEFAULT_VOLUME: UVec3 = UVec3::new(100, 100, 100);

/// A single cell value at a position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePiece {
    pub tile: Tile,
    pub pos: Position,
}

impl TilePiece {
    pub fn new(tile: Tile, pos: Position) -> Self {
        Self { tile, pos }
    }
}

/// Dense 3D grid of tiles.
///
/// Cells live in a flat buffer indexed `z * w * h + y * w + x`. Lookups clamp
/// the flat index into the buffer, so every position maps to some cell and
/// the grid never fails a read or a write.
///
/// The bounding qube covers every position whose value was ever changed. It
/// only grows: erasing cells back to the default tile does not shrink it.
#[derive(Clone, Debug)]
pub struct Tilemap {
    volume: UVec3,
    map: Vec<Tile>,
    default_tile: Tile,
    bounding: Option<Qube>,
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

impl Tilemap {
    /// Create an all-default grid. Zero-sized axes are widened to one cell.
    pub fn new(volume: UVec3) -> Self {
        Self::with_default_tile(volume, Tile::default())
    }

    /// Create a grid filled with `default_tile`
    pub fn with_default_tile(volume: UVec3, default_tile: Tile) -> Self {
        let volume = volume.max(UVec3::ONE);
        Self {
            volume,
            map: vec![default_tile; Self::len_for(volume)],
            default_tile,
            bounding: None,
        }
    }

    fn len_for(volume: UVec3) -> usize {
        volume.x as usize * volume.y as usize * volume.z as usize
    }

    /// Grid dimensions in cells
    pub fn volume(&self) -> UVec3 {
        self.volume
    }

    /// The tile every untouched cell holds
    pub fn default_tile(&self) -> Tile {
        self.default_tile
    }

    /// Smallest qube containing every changed cell, `None` before the first change
    pub fn bounding_qube(&self) -> Option<Qube> {
        self.bounding
    }

    /// Qube covering the whole backing buffer
    pub fn full_qube(&self) -> Qube {
        Qube::new(IVec3::ZERO, self.volume.as_ivec3() - IVec3::ONE)
    }

    fn index(&self, pos: Position) -> usize {
        let w = self.volume.x as i64;
        let h = self.volume.y as i64;
        let i = pos.z as i64 * w * h + pos.y as i64 * w + pos.x as i64;
        i.clamp(0, self.map.len() as i64 - 1) as usize
    }

    /// Tile at `pos`
    pub fn tile_at(&self, pos: Position) -> Tile {
        self.map[self.index(pos)]
    }

    /// Write a single cell and return its previous tile.
    ///
    /// Writing the value a cell already holds is a no-op and leaves the
    /// bounding qube untouched.
    pub fn dot(&mut self, tile: Tile, pos: Position) -> Tile {
        let i = self.index(pos);
        let last = self.map[i];
        if last == tile {
            return last;
        }
        match &mut self.bounding {
            Some(bounding) => bounding.expand(pos),
            None => self.bounding = Some(Qube::cell(pos)),
        }
        self.map[i] = tile;
        last
    }

    /// Write `tile` into every cell of `qube`, returning the previous pieces
    pub fn fill(&mut self, tile: Tile, qube: Qube) -> Vec<TilePiece> {
        qube.cells()
            .map(|pos| TilePiece::new(self.dot(tile, pos), pos))
            .collect()
    }

    /// Designate `qube` for digging
    pub fn dig(&mut self, qube: Qube) -> Vec<TilePiece> {
        self.fill(Tile::Floor, qube)
    }

    /// Designate `qube` as ramps
    pub fn ramp(&mut self, qube: Qube) -> Vec<TilePiece> {
        self.fill(Tile::Ramp, qube)
    }

    /// Designate `qube` as channels
    pub fn channel(&mut self, qube: Qube) -> Vec<TilePiece> {
        self.fill(Tile::Channel, qube)
    }

    /// Reset `qube` to the default tile
    pub fn remove(&mut self, qube: Qube) -> Vec<TilePiece> {
        let default_tile = self.default_tile;
        self.fill(default_tile, qube)
    }

    /// Stamp a staircase spanning every z-layer of `qube`.
    ///
    /// The bottom layer gets up-stairs and the top layer down-stairs. Cells that
    /// already connect the other way become up/down stairs, as does every layer
    /// in between. A single-layer qube is left alone.
    pub fn stairs(&mut self, qube: Qube) -> Vec<TilePiece> {
        if qube.extent.z == 0 {
            return Vec::new();
        }
        let (min, max) = (qube.min(), qube.max());
        let mut pieces = Vec::with_capacity(qube.cell_count());

        let mut stamp_layer = |map: &mut Self, z: i32, pick: &dyn Fn(Tile) -> Tile| {
            for x in min.x..=max.x {
                for y in min.y..=max.y {
                    let pos = IVec3::new(x, y, z);
                    let tile = pick(map.tile_at(pos));
                    pieces.push(TilePiece::new(map.dot(tile, pos), pos));
                }
            }
        };

        stamp_layer(self, min.z, &|t: Tile| {
            if t.leads_down() { Tile::UpDownStair } else { Tile::UpStair }
        });
        for z in min.z + 1..max.z {
            stamp_layer(self, z, &|_: Tile| Tile::UpDownStair);
        }
        stamp_layer(self, max.z, &|t: Tile| {
            if t.leads_up() { Tile::UpDownStair } else { Tile::DownStair }
        });

        pieces
    }

    /// Reset individual cells to the default tile
    pub fn remove_dots(&mut self, dots: &[Position]) -> Vec<TilePiece> {
        let default_tile = self.default_tile;
        dots.iter()
            .map(|&pos| TilePiece::new(self.dot(default_tile, pos), pos))
            .collect()
    }

    /// Current pieces at the given positions
    pub fn tiles_at(&self, dots: &[Position]) -> Vec<TilePiece> {
        dots.iter()
            .map(|&pos| TilePiece::new(self.tile_at(pos), pos))
            .collect()
    }

    /// Write a batch of pieces, returning what they replaced.
    ///
    /// Feeding the result back in restores the previous state.
    pub fn put_tiles(&mut self, pieces: &[TilePiece]) -> Vec<TilePiece> {
        pieces.iter()
            .map(|p| TilePiece::new(self.dot(p.tile, p.pos), p.pos))
            .collect()
    }

    /// Non-default pieces inside `qube`, clamped to the grid, in buffer order
    pub fn tiles(&self, qube: Qube) -> impl Iterator<Item = TilePiece> + '_ {
        let clamped = qube.clamp(&self.full_qube());
        clamped
            .into_iter()
            .flat_map(|q| {
                let (min, max) = (q.min(), q.max());
                (min.z..=max.z).flat_map(move |z| {
                    (min.y..=max.y).flat_map(move |y| {
                        (min.x..=max.x).map(move |x| IVec3::new(x, y, z))
                    })
                })
            })
            .map(|pos| TilePiece::new(self.tile_at(pos), pos))
            .filter(|p| p.tile != self.default_tile)
    }

    /// Resize the grid. Cells keep their positions; cells falling outside the
    /// new volume are dropped and newly exposed cells take the default tile.
    pub fn resize(&mut self, volume: UVec3) {
        let volume = volume.max(UVec3::ONE);
        if volume == self.volume {
            return;
        }
        let mut resized = Self::with_default_tile(volume, self.default_tile);
        let keep = Qube::new(IVec3::ZERO, self.volume.min(volume).as_ivec3() - IVec3::ONE);
        for piece in self.tiles(keep) {
            let i = resized.index(piece.pos);
            resized.map[i] = piece.tile;
        }
        self.volume = volume;
        self.map = resized.map;
    }

    /// Build a grid from raw parts, writing pieces without touching the bounding qube
    pub(crate) fn from_parts(
        volume: UVec3,
        default_tile: Tile,
        bounding: Option<Qube>,
        pieces: &[TilePiece],
    ) -> Self {
        let mut tilemap = Self::with_default_tile(volume, default_tile);
        for piece in pieces {
            let i = tilemap.index(piece.pos);
            tilemap.map[i] = piece.tile;
        }
        tilemap.bounding = bounding;
        tilemap
    }
}

impl TileLookup<Tile> for Tilemap {
    fn tile_at(&self, pos: Position) -> Tile {
        Tilemap::tile_at(self, pos)
    }
}
