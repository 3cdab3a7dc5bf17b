//! Terrain classification and the immutable per-kind metadata table.
//!
//! Every tile refers to one [`TerrainKind`]; the rendering and gameplay facts
//! about that kind live once in [`TerrainProfile`] and are looked up rather
//! than copied onto each tile.

use serde::{Deserialize, Serialize};

use crate::SpriteKey;

/// Noise values below this threshold become water.
pub const WATER_THRESHOLD: f64 = -0.25;
/// Noise values below this threshold (and above water) become land.
pub const LAND_THRESHOLD: f64 = 0.3;
/// Noise values below this threshold (and above land) become forest.
pub const FOREST_THRESHOLD: f64 = 0.55;

/// Closed set of terrain categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open water; impassable.
    Water,
    /// Walkable ground where items and features are placed.
    Land,
    /// Trees; drawn taller than the tile.
    Forest,
    /// Boulders and cliffs.
    Rock,
    /// Buried treasure marker placed after generation.
    Treasure,
}

impl TerrainKind {
    /// Every terrain kind in table order.
    pub const ALL: [TerrainKind; 5] = [
        TerrainKind::Water,
        TerrainKind::Land,
        TerrainKind::Forest,
        TerrainKind::Rock,
        TerrainKind::Treasure,
    ];

    /// Static metadata shared by every tile of this kind.
    #[must_use]
    pub fn profile(self) -> &'static TerrainProfile {
        &PROFILES[self as usize]
    }

    /// Whether the player may stand on this kind.
    #[must_use]
    pub fn walkable(self) -> bool {
        self.profile().walkable
    }

    /// Health a fresh tile of this kind starts with.
    #[must_use]
    pub fn durability(self) -> u32 {
        self.profile().durability
    }
}

/// Immutable rendering and gameplay metadata for one terrain kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainProfile {
    /// Whether the player may stand on the tile.
    pub walkable: bool,
    /// Starting health of a tile of this kind.
    pub durability: u32,
    /// Base sprite drawn for the tile.
    pub sprite: SpriteKey,
    /// Upward shift applied when drawing the base sprite, in tile units.
    pub draw_offset: f32,
    /// Priority used when blending boundaries; higher kinds bleed onto lower ones.
    pub transition_priority: u8,
    /// Sprite drawn onto a lower-priority neighbour, if the kind blends at all.
    pub transition_sprite: Option<SpriteKey>,
    /// Colour used for this kind on the treasure map, as RGB bytes.
    pub map_color: [u8; 3],
}

static PROFILES: [TerrainProfile; 5] = [
    // Water
    TerrainProfile {
        walkable: false,
        durability: 1,
        sprite: SpriteKey::WaterTile,
        draw_offset: 0.0,
        transition_priority: 0,
        transition_sprite: None,
        map_color: [0xE9, 0xD7, 0xA9],
    },
    // Land
    TerrainProfile {
        walkable: true,
        durability: 1,
        sprite: SpriteKey::LandTile,
        draw_offset: 0.0,
        transition_priority: 1,
        transition_sprite: Some(SpriteKey::LandEdge),
        map_color: [0xE5, 0xA7, 0x73],
    },
    // Forest: 15px canopy lift on a 64px tile.
    TerrainProfile {
        walkable: false,
        durability: 5,
        sprite: SpriteKey::ForestTile,
        draw_offset: 15.0 / 64.0,
        transition_priority: 3,
        transition_sprite: Some(SpriteKey::ForestEdge),
        map_color: [0xDB, 0x76, 0x44],
    },
    // Rock
    TerrainProfile {
        walkable: false,
        durability: 10,
        sprite: SpriteKey::RockTile,
        draw_offset: 0.0,
        transition_priority: 4,
        transition_sprite: Some(SpriteKey::RockEdge),
        map_color: [0xC8, 0x5F, 0x3A],
    },
    // Treasure
    TerrainProfile {
        walkable: true,
        durability: 3,
        sprite: SpriteKey::TreasureTile,
        draw_offset: 0.0,
        transition_priority: 2,
        transition_sprite: Some(SpriteKey::TreasureEdge),
        map_color: [0x00, 0x00, 0x00],
    },
];

/// Maps a noise sample to a terrain kind using fixed thresholds.
///
/// Treasure is never produced here; it is placed after generation. Values
/// that are not finite classify as water.
#[must_use]
pub fn classify(noise: f64) -> TerrainKind {
    match noise {
        n if !n.is_finite() || n < WATER_THRESHOLD => TerrainKind::Water,
        n if n < LAND_THRESHOLD => TerrainKind::Land,
        n if n < FOREST_THRESHOLD => TerrainKind::Forest,
        _ => TerrainKind::Rock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_respects_threshold_bands() {
        assert_eq!(classify(-0.9), TerrainKind::Water);
        assert_eq!(classify(WATER_THRESHOLD), TerrainKind::Land);
        assert_eq!(classify(0.0), TerrainKind::Land);
        assert_eq!(classify(LAND_THRESHOLD), TerrainKind::Forest);
        assert_eq!(classify(FOREST_THRESHOLD), TerrainKind::Rock);
        assert_eq!(classify(1.0), TerrainKind::Rock);
    }

    #[test]
    fn classify_never_yields_treasure() {
        for step in -200..=200 {
            let value = f64::from(step) / 100.0;
            assert_ne!(classify(value), TerrainKind::Treasure);
        }
    }

    #[test]
    fn non_finite_noise_classifies_as_water() {
        assert_eq!(classify(f64::NAN), TerrainKind::Water);
        assert_eq!(classify(f64::NEG_INFINITY), TerrainKind::Water);
        assert_eq!(classify(f64::INFINITY), TerrainKind::Water);
    }

    #[test]
    fn profile_table_is_indexed_by_kind() {
        assert_eq!(TerrainKind::Water.profile().sprite, SpriteKey::WaterTile);
        assert_eq!(TerrainKind::Land.profile().sprite, SpriteKey::LandTile);
        assert_eq!(TerrainKind::Forest.profile().sprite, SpriteKey::ForestTile);
        assert_eq!(TerrainKind::Rock.profile().sprite, SpriteKey::RockTile);
        assert_eq!(
            TerrainKind::Treasure.profile().sprite,
            SpriteKey::TreasureTile
        );
    }

    #[test]
    fn only_forest_is_drawn_raised() {
        for kind in TerrainKind::ALL {
            let raised = kind.profile().draw_offset > 0.0;
            assert_eq!(raised, kind == TerrainKind::Forest, "{kind:?}");
        }
    }

    #[test]
    fn transition_priorities_are_distinct() {
        let mut priorities: Vec<u8> = TerrainKind::ALL
            .iter()
            .map(|kind| kind.profile().transition_priority)
            .collect();
        priorities.sort_unstable();
        priorities.dedup();
        assert_eq!(priorities.len(), TerrainKind::ALL.len());
    }

    #[test]
    fn every_kind_has_positive_durability() {
        for kind in TerrainKind::ALL {
            assert!(kind.durability() > 0, "{kind:?}");
        }
    }
}
