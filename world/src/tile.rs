//! Individual tiles and items lying on them.

use castaway_core::{ItemKind, TerrainKind, TilePosition};

/// One cell of the world grid.
///
/// Neighbours are derived from the position on demand; tiles never hold
/// references to each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    position: TilePosition,
    kind: TerrainKind,
    current_health: u32,
}

impl Tile {
    /// Creates a tile at full health for its kind.
    #[must_use]
    pub fn new(position: TilePosition, kind: TerrainKind) -> Self {
        Self {
            position,
            kind,
            current_health: kind.durability(),
        }
    }

    /// Grid coordinates of the tile.
    #[must_use]
    pub const fn position(&self) -> TilePosition {
        self.position
    }

    /// Terrain kind of the tile.
    #[must_use]
    pub const fn kind(&self) -> TerrainKind {
        self.kind
    }

    /// Remaining health; never exceeds the kind's durability.
    #[must_use]
    pub const fn current_health(&self) -> u32 {
        self.current_health
    }

    /// Fraction of health lost, in `0.0..=1.0`. Zero for an untouched tile.
    #[must_use]
    pub fn depletion(&self) -> f32 {
        let base = self.kind.durability();
        if base == 0 || self.current_health >= base {
            return 0.0;
        }
        1.0 - self.current_health as f32 / base as f32
    }

    /// Whether the tile has no health left.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current_health == 0
    }

    /// Removes `amount` health, clamping at zero, and returns what remains.
    pub fn damage(&mut self, amount: u32) -> u32 {
        self.current_health = self.current_health.saturating_sub(amount);
        self.current_health
    }

    pub(crate) fn replace_kind(&mut self, kind: TerrainKind) {
        self.kind = kind;
        self.current_health = kind.durability();
    }
}

/// Item lying on the ground at a grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DroppedItem {
    position: TilePosition,
    item: ItemKind,
}

impl DroppedItem {
    /// Creates a new dropped item descriptor.
    #[must_use]
    pub const fn new(position: TilePosition, item: ItemKind) -> Self {
        Self { position, item }
    }

    /// Tile the item lies on.
    #[must_use]
    pub const fn position(&self) -> TilePosition {
        self.position
    }

    /// Kind of item.
    #[must_use]
    pub const fn item(&self) -> ItemKind {
        self.item
    }
}
