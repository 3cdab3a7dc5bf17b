#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural terrain generation for the Castaway world.
//!
//! [`MapGenerator`] turns a continuous [`NoiseField`] into a square
//! [`TileGrid`], stamps the treasure cluster onto an interior land tile and
//! scatters food markers. Searches are bounded; when one runs dry the caller
//! is expected to throw the grid away and generate a new one.

mod noise_field;

use castaway_core::{classify, ItemKind, TerrainKind, TilePosition};
use castaway_world::{GridError, Tile, TileGrid, DEFAULT_SEARCH_ATTEMPTS};
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub use noise_field::{NoiseField, SimplexField};

/// Offsets of the four diagonal tiles that surround a treasure anchor.
const TREASURE_DIAGONALS: [(i64, i64); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];

/// Errors raised while generating or decorating a grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A grid operation failed, including exhausted searches.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A feature anchor sits too close to the edge for its neighbour pattern.
    #[error("feature anchored at {anchor:?} would leave the grid")]
    DegeneratePlacement {
        /// Rejected anchor tile.
        anchor: TilePosition,
    },
}

impl GenerationError {
    /// Whether the failure is cured by regenerating the whole grid.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Grid(GridError::NoMatchFound { .. }) | Self::DegeneratePlacement { .. }
        )
    }
}

/// Tuning knobs for a single generation pass.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Edge length of the square grid.
    pub size: u32,
    /// Scale applied to tile coordinates before sampling noise; smaller is smoother.
    pub noise_frequency: f64,
    /// Attempt budget for every random tile search.
    pub search_attempts: u32,
    /// One food marker is scattered per this many tiles of edge length.
    pub food_divisor: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: 128,
            noise_frequency: 0.08,
            search_attempts: DEFAULT_SEARCH_ATTEMPTS,
            food_divisor: 15,
        }
    }
}

impl GenerationConfig {
    /// Number of food markers scattered on a grid of the configured size.
    #[must_use]
    pub fn food_count(&self) -> u32 {
        self.size.checked_div(self.food_divisor).unwrap_or(0)
    }
}

/// Builds tile grids from noise and decorates them with features.
#[derive(Clone, Copy, Debug)]
pub struct MapGenerator {
    search_attempts: u32,
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_ATTEMPTS)
    }
}

impl MapGenerator {
    /// Creates a generator whose searches give up after `search_attempts` samples.
    #[must_use]
    pub const fn new(search_attempts: u32) -> Self {
        Self { search_attempts }
    }

    /// Attempt budget applied to every random search.
    #[must_use]
    pub const fn search_attempts(&self) -> u32 {
        self.search_attempts
    }

    /// Samples the noise field at every coordinate and classifies the result.
    pub fn generate<N>(&self, size: u32, noise: &N) -> Result<TileGrid, GenerationError>
    where
        N: NoiseField + ?Sized,
    {
        let grid = TileGrid::from_fn(size, |position| {
            classify(noise.sample(f64::from(position.x()), f64::from(position.y())))
        })?;
        debug!(size, "generated terrain grid");
        Ok(grid)
    }

    /// Bounded random search for a tile of `kind`.
    pub fn choose_random_tile<'grid, R>(
        &self,
        grid: &'grid TileGrid,
        kind: TerrainKind,
        rng: &mut R,
    ) -> Result<&'grid Tile, GenerationError>
    where
        R: Rng + ?Sized,
    {
        Ok(grid.choose_random_tile(kind, rng, self.search_attempts)?)
    }

    /// Marks an interior land tile and its four diagonal neighbours as treasure.
    ///
    /// Anchors on the outer ring are rejected during sampling, so all five
    /// tiles always land inside the grid. Returns the anchor.
    pub fn place_treasure<R>(
        &self,
        grid: &mut TileGrid,
        rng: &mut R,
    ) -> Result<TilePosition, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let anchor = {
            let snapshot: &TileGrid = grid;
            snapshot
                .choose_random_tile_where(TerrainKind::Land, rng, self.search_attempts, |tile| {
                    snapshot.is_interior(tile.position())
                })?
                .position()
        };

        for position in treasure_cluster(grid, anchor)? {
            grid.set_kind(position, TerrainKind::Treasure)?;
        }
        debug!(x = anchor.x(), y = anchor.y(), "placed treasure cluster");
        Ok(anchor)
    }

    /// Drops `count` food markers on independently sampled land tiles.
    ///
    /// Several markers may share a tile. Returns the chosen positions in drop order.
    pub fn scatter_food<R>(
        &self,
        grid: &mut TileGrid,
        rng: &mut R,
        count: u32,
    ) -> Result<Vec<TilePosition>, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let mut positions = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let position = self
                .choose_random_tile(grid, TerrainKind::Land, rng)?
                .position();
            positions.push(position);
        }

        for position in &positions {
            grid.drop_item(*position, ItemKind::Food)?;
        }
        debug!(count, "scattered food");
        Ok(positions)
    }
}

/// The five tiles covered by a treasure cluster anchored at `anchor`.
///
/// Fails with [`GenerationError::DegeneratePlacement`] when any diagonal
/// neighbour would fall outside the grid.
pub fn treasure_cluster(
    grid: &TileGrid,
    anchor: TilePosition,
) -> Result<[TilePosition; 5], GenerationError> {
    let degenerate = GenerationError::DegeneratePlacement { anchor };
    if !grid.contains(anchor) {
        return Err(degenerate);
    }

    let mut cluster = [anchor; 5];
    for (slot, (dx, dy)) in cluster[1..].iter_mut().zip(TREASURE_DIAGONALS) {
        let neighbour = anchor
            .checked_offset(dx, dy)
            .filter(|position| grid.contains(*position))
            .ok_or_else(|| degenerate.clone())?;
        *slot = neighbour;
    }
    Ok(cluster)
}
