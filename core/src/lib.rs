#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Castaway world model and renderer.
//!
//! This crate holds the plain value types every other crate agrees on: grid
//! coordinates, the player's continuous position, item and sprite keys, and
//! the immutable terrain table in [`terrain`]. Nothing here owns world state;
//! the tile grid lives in `castaway-world` and drawing lives in the adapters.

pub mod terrain;

use serde::{Deserialize, Serialize};

pub use terrain::{classify, TerrainKind, TerrainProfile};

/// Title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "Castaway";

/// Location of a single tile expressed as zero-based grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    x: u32,
    y: u32,
}

impl TilePosition {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the position shifted by the provided signed offset.
    ///
    /// Returns `None` when either axis would leave the non-negative range.
    /// Upper bounds are the grid's concern, not the coordinate's.
    #[must_use]
    pub fn checked_offset(self, dx: i64, dy: i64) -> Option<Self> {
        let x = i64::from(self.x).checked_add(dx)?;
        let y = i64::from(self.y).checked_add(dy)?;
        Some(Self {
            x: u32::try_from(x).ok()?,
            y: u32::try_from(y).ok()?,
        })
    }

    /// Chebyshev (king-move) distance between two positions.
    #[must_use]
    pub fn chebyshev_distance(self, other: TilePosition) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Continuous player position measured in fractional tile units.
///
/// Integer values sit on tile centres, so the tile a player occupies is the
/// nearest whole coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerPosition {
    /// Horizontal position in tile units.
    pub x: f32,
    /// Vertical position in tile units.
    pub y: f32,
}

impl PlayerPosition {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Places the player exactly on the centre of the provided tile.
    #[must_use]
    pub fn at_tile(tile: TilePosition) -> Self {
        Self {
            x: tile.x() as f32,
            y: tile.y() as f32,
        }
    }

    /// Returns the position moved by the provided delta.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Discrete tile the player currently occupies, used as the camera tile.
    ///
    /// Returns `None` for positions that round to a negative coordinate or
    /// are not finite.
    #[must_use]
    pub fn occupied_tile(self) -> Option<TilePosition> {
        let x = round_to_tile(self.x)?;
        let y = round_to_tile(self.y)?;
        Some(TilePosition::new(x, y))
    }
}

fn round_to_tile(value: f32) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    if rounded < 0.0 || rounded > u32::MAX as f32 {
        return None;
    }
    Some(rounded as u32)
}

/// Items that can lie on the ground as dropped markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Edible resource scattered across land tiles.
    Food,
    /// Tool dropped next to the player at the start.
    Axe,
    /// Map leading to the treasure cluster.
    TreasureMap,
}

impl ItemKind {
    /// Sprite drawn for the item when it lies on the ground.
    #[must_use]
    pub const fn sprite(self) -> SpriteKey {
        match self {
            Self::Food => SpriteKey::Food,
            Self::Axe => SpriteKey::Axe,
            Self::TreasureMap => SpriteKey::TreasureMap,
        }
    }
}

/// Opaque handle naming a preloaded sprite.
///
/// The renderer only passes these around; resolving them to textures is the
/// asset pipeline's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpriteKey {
    /// Base sprite for water tiles.
    WaterTile,
    /// Base sprite for land tiles.
    LandTile,
    /// Base sprite for forest tiles.
    ForestTile,
    /// Base sprite for rock tiles.
    RockTile,
    /// Base sprite for treasure tiles.
    TreasureTile,
    /// Transition drawn where land borders lower-priority terrain.
    LandEdge,
    /// Transition drawn where forest borders lower-priority terrain.
    ForestEdge,
    /// Transition drawn where rock borders lower-priority terrain.
    RockEdge,
    /// Transition drawn where treasure borders lower-priority terrain.
    TreasureEdge,
    /// Dropped food item.
    Food,
    /// Dropped axe item.
    Axe,
    /// Dropped treasure map item.
    TreasureMap,
    /// The player character.
    Player,
}

impl SpriteKey {
    /// Every sprite key in canonical order.
    pub const ALL: [SpriteKey; 13] = [
        SpriteKey::WaterTile,
        SpriteKey::LandTile,
        SpriteKey::ForestTile,
        SpriteKey::RockTile,
        SpriteKey::TreasureTile,
        SpriteKey::LandEdge,
        SpriteKey::ForestEdge,
        SpriteKey::RockEdge,
        SpriteKey::TreasureEdge,
        SpriteKey::Food,
        SpriteKey::Axe,
        SpriteKey::TreasureMap,
        SpriteKey::Player,
    ];

    /// Stable name used by sprite manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WaterTile => "WaterTile",
            Self::LandTile => "LandTile",
            Self::ForestTile => "ForestTile",
            Self::RockTile => "RockTile",
            Self::TreasureTile => "TreasureTile",
            Self::LandEdge => "LandEdge",
            Self::ForestEdge => "ForestEdge",
            Self::RockEdge => "RockEdge",
            Self::TreasureEdge => "TreasureEdge",
            Self::Food => "Food",
            Self::Axe => "Axe",
            Self::TreasureMap => "TreasureMap",
            Self::Player => "Player",
        }
    }

    /// Looks up a sprite key by its manifest name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_offset_rejects_negative_coordinates() {
        let origin = TilePosition::new(0, 3);
        assert_eq!(origin.checked_offset(-1, 0), None);
        assert_eq!(origin.checked_offset(2, -3), Some(TilePosition::new(2, 0)));
    }

    #[test]
    fn chebyshev_distance_uses_largest_axis() {
        let a = TilePosition::new(4, 4);
        assert_eq!(a.chebyshev_distance(TilePosition::new(6, 3)), 2);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn occupied_tile_rounds_to_nearest_centre() {
        assert_eq!(
            PlayerPosition::new(3.4, 7.6).occupied_tile(),
            Some(TilePosition::new(3, 8))
        );
        assert_eq!(
            PlayerPosition::new(-0.4, 0.0).occupied_tile(),
            Some(TilePosition::new(0, 0))
        );
        assert_eq!(PlayerPosition::new(-0.6, 0.0).occupied_tile(), None);
        assert_eq!(PlayerPosition::new(f32::NAN, 0.0).occupied_tile(), None);
    }

    #[test]
    fn sprite_names_round_trip_through_lookup() {
        for key in SpriteKey::ALL {
            assert_eq!(SpriteKey::from_name(key.name()), Some(key));
        }
        assert_eq!(SpriteKey::from_name("Palm"), None);
    }

    #[test]
    fn tile_position_deserializes_from_toml() {
        #[derive(serde::Deserialize)]
        struct Holder {
            tile: TilePosition,
        }

        let holder: Holder = toml::from_str("tile = { x = 5, y = 9 }").expect("valid toml");
        assert_eq!(holder.tile, TilePosition::new(5, 9));
    }
}
