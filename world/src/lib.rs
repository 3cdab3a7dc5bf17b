#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile grid for the Castaway world.
//!
//! [`TileGrid`] owns a square matrix of [`Tile`] values and the list of
//! [`DroppedItem`] markers. Lookups are bounds-checked and report
//! [`GridError::OutOfRange`]; callers that legitimately probe past the edge
//! (the viewport) use [`TileGrid::get`] and treat `None` as background.

mod search;
mod tile;

use castaway_core::{ItemKind, TerrainKind, TilePosition};
use rand::Rng;
use thiserror::Error;

pub use search::DEFAULT_SEARCH_ATTEMPTS;
pub use tile::{DroppedItem, Tile};

/// Errors reported by grid operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Grids must contain at least one tile.
    #[error("grid size must be positive (received {size})")]
    InvalidSize {
        /// Requested edge length.
        size: u32,
    },
    /// A coordinate outside `[0, size)` was used for a lookup.
    #[error("tile ({x}, {y}) lies outside the {size}x{size} grid")]
    OutOfRange {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Edge length of the grid.
        size: u32,
    },
    /// A bounded random search ran out of attempts.
    #[error("no {kind:?} tile found after {attempts} attempts")]
    NoMatchFound {
        /// Terrain kind that was searched for.
        kind: TerrainKind,
        /// Number of candidates sampled before giving up.
        attempts: u32,
    },
}

/// Square matrix of tiles plus the items dropped on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    size: u32,
    tiles: Vec<Tile>,
    dropped_items: Vec<DroppedItem>,
}

impl TileGrid {
    /// Builds a `size`×`size` grid, asking `kind_at` for every coordinate.
    ///
    /// Tiles are visited row by row.
    pub fn from_fn<F>(size: u32, mut kind_at: F) -> Result<Self, GridError>
    where
        F: FnMut(TilePosition) -> TerrainKind,
    {
        if size == 0 {
            return Err(GridError::InvalidSize { size });
        }

        let capacity = usize::try_from(u64::from(size) * u64::from(size))
            .map_err(|_| GridError::InvalidSize { size })?;
        let mut tiles = Vec::with_capacity(capacity);
        for y in 0..size {
            for x in 0..size {
                let position = TilePosition::new(x, y);
                tiles.push(Tile::new(position, kind_at(position)));
            }
        }

        Ok(Self {
            size,
            tiles,
            dropped_items: Vec::new(),
        })
    }

    /// Builds a grid where every tile has the same kind.
    pub fn filled(size: u32, kind: TerrainKind) -> Result<Self, GridError> {
        Self::from_fn(size, |_| kind)
    }

    /// Edge length of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: TilePosition) -> bool {
        position.x() < self.size && position.y() < self.size
    }

    /// Whether the position lies inside the grid and off its outer ring.
    #[must_use]
    pub const fn is_interior(&self, position: TilePosition) -> bool {
        let last = self.size.saturating_sub(1);
        position.x() >= 1 && position.y() >= 1 && position.x() < last && position.y() < last
    }

    /// Bounds-checked lookup.
    pub fn tile_at(&self, x: u32, y: u32) -> Result<&Tile, GridError> {
        let index = self.index(x, y)?;
        Ok(&self.tiles[index])
    }

    /// Bounds-checked mutable lookup.
    pub fn tile_at_mut(&mut self, x: u32, y: u32) -> Result<&mut Tile, GridError> {
        let index = self.index(x, y)?;
        Ok(&mut self.tiles[index])
    }

    /// Lookup that treats positions outside the grid as absent.
    #[must_use]
    pub fn get(&self, position: TilePosition) -> Option<&Tile> {
        self.index(position.x(), position.y())
            .ok()
            .map(|index| &self.tiles[index])
    }

    /// Iterates every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Replaces the kind of a tile, resetting its health to the new kind's durability.
    pub fn set_kind(&mut self, position: TilePosition, kind: TerrainKind) -> Result<(), GridError> {
        self.tile_at_mut(position.x(), position.y())?.replace_kind(kind);
        Ok(())
    }

    /// Tiles within a square `radius` around `(x, y)`, clipped to the grid.
    ///
    /// The centre tile is included. Tiles are returned row by row.
    pub fn neighborhood(&self, x: u32, y: u32, radius: u32) -> Result<Vec<&Tile>, GridError> {
        let _ = self.index(x, y)?;

        let min_x = x.saturating_sub(radius);
        let min_y = y.saturating_sub(radius);
        let max_x = x.saturating_add(radius).min(self.size - 1);
        let max_y = y.saturating_add(radius).min(self.size - 1);

        let mut found = Vec::new();
        for row in min_y..=max_y {
            for column in min_x..=max_x {
                found.push(self.tile_at(column, row)?);
            }
        }
        Ok(found)
    }

    /// Samples uniformly random tiles until one of `kind` turns up.
    ///
    /// Gives up with [`GridError::NoMatchFound`] after exactly `attempts`
    /// samples.
    pub fn choose_random_tile<R>(
        &self,
        kind: TerrainKind,
        rng: &mut R,
        attempts: u32,
    ) -> Result<&Tile, GridError>
    where
        R: Rng + ?Sized,
    {
        self.choose_random_tile_where(kind, rng, attempts, |_| true)
    }

    /// Like [`choose_random_tile`](Self::choose_random_tile), but a candidate
    /// must also satisfy `accept`.
    pub fn choose_random_tile_where<R, P>(
        &self,
        kind: TerrainKind,
        rng: &mut R,
        attempts: u32,
        accept: P,
    ) -> Result<&Tile, GridError>
    where
        R: Rng + ?Sized,
        P: FnMut(&Tile) -> bool,
    {
        search::rejection_sample(self, kind, rng, attempts, accept)
    }

    /// Items currently lying on the ground, in drop order.
    #[must_use]
    pub fn dropped_items(&self) -> &[DroppedItem] {
        &self.dropped_items
    }

    /// Items lying on the provided tile, in drop order.
    pub fn items_at(&self, position: TilePosition) -> impl Iterator<Item = &DroppedItem> {
        self.dropped_items
            .iter()
            .filter(move |item| item.position() == position)
    }

    /// Places an item on the ground.
    pub fn drop_item(&mut self, position: TilePosition, item: ItemKind) -> Result<(), GridError> {
        let _ = self.index(position.x(), position.y())?;
        self.dropped_items.push(DroppedItem::new(position, item));
        Ok(())
    }

    /// Removes and returns the most recently dropped item on the tile.
    pub fn take_item_at(&mut self, position: TilePosition) -> Option<DroppedItem> {
        let index = self
            .dropped_items
            .iter()
            .rposition(|item| item.position() == position)?;
        Some(self.dropped_items.remove(index))
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, GridError> {
        if x >= self.size || y >= self.size {
            return Err(GridError::OutOfRange {
                x,
                y,
                size: self.size,
            });
        }
        let size = self.size as usize;
        Ok(y as usize * size + x as usize)
    }
}
