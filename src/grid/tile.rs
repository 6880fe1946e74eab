//! Tile kinds stored in the grid

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of cell values a [`Tilemap`](super::Tilemap) can hold.
///
/// `Wall` is the untouched default; every other kind marks a designated cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    #[default]
    Wall,
    Floor,
    Channel,
    Ramp,
    UpStair,
    DownStair,
    UpDownStair,
    OpenSpace,
}

impl Tile {
    /// All tile kinds in declaration order
    pub const ALL: [Tile; 8] = [
        Tile::Wall,
        Tile::Floor,
        Tile::Channel,
        Tile::Ramp,
        Tile::UpStair,
        Tile::DownStair,
        Tile::UpDownStair,
        Tile::OpenSpace,
    ];

    /// Lowercase name used in snapshots and command output
    pub fn name(self) -> &'static str {
        match self {
            Tile::Wall => "wall",
            Tile::Floor => "floor",
            Tile::Channel => "channel",
            Tile::Ramp => "ramp",
            Tile::UpStair => "upstair",
            Tile::DownStair => "downstair",
            Tile::UpDownStair => "updownstair",
            Tile::OpenSpace => "openspace",
        }
    }

    /// Whether the tile lets an agent climb to the layer above
    pub fn leads_up(self) -> bool {
        matches!(self, Tile::UpStair | Tile::UpDownStair)
    }

    /// Whether the tile lets an agent descend to the layer below
    pub fn leads_down(self) -> bool {
        matches!(self, Tile::DownStair | Tile::UpDownStair)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
