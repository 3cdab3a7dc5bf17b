#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that assembles a playable Castaway world.
//!
//! A world is ready once the terrain is generated, the player has a land
//! tile to start on, the treasure cluster is stamped, food is scattered and
//! the starting kit lies next to the player. Any bounded search that runs dry
//! throws the whole attempt away; the loop retries with a fresh seed until
//! [`BootstrapConfig::max_regenerations`] is spent.

use castaway_core::{ItemKind, PlayerPosition, TerrainKind, TilePosition};
use castaway_system_generation::{GenerationConfig, GenerationError, MapGenerator, SimplexField};
use castaway_world::TileGrid;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Items dropped next to the player before the first frame.
pub const STARTING_KIT: [ItemKind; 3] = [ItemKind::Axe, ItemKind::TreasureMap, ItemKind::Food];

/// Errors raised while assembling a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// Every regeneration attempt ran into a recoverable failure.
    #[error("world generation failed after {regenerations} attempts: {last}")]
    Exhausted {
        /// Number of grids generated before giving up.
        regenerations: u32,
        /// Failure reported by the final attempt.
        last: GenerationError,
    },
    /// The configuration cannot produce a world at all.
    #[error("invalid bootstrap configuration: {reason}")]
    InvalidConfig {
        /// Human readable explanation.
        reason: String,
    },
}

/// Settings for assembling a world, typically read from TOML.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Seed for the whole world; equal seeds produce equal worlds.
    pub seed: u64,
    /// Number of grids that may be generated before giving up.
    pub max_regenerations: u32,
    /// Radius of the square around the start tile that receives the starting kit.
    pub starting_item_radius: u32,
    /// Terrain generation knobs.
    pub generation: GenerationConfig,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_regenerations: 8,
            starting_item_radius: 2,
            generation: GenerationConfig::default(),
        }
    }
}

impl BootstrapConfig {
    fn validate(&self) -> Result<(), BootstrapError> {
        let reason = if self.max_regenerations == 0 {
            "max_regenerations must be at least 1"
        } else if self.generation.size < 3 {
            "size must be at least 3 to fit the treasure cluster"
        } else if !self.generation.noise_frequency.is_finite() {
            "noise_frequency must be finite"
        } else {
            return Ok(());
        };
        Err(BootstrapError::InvalidConfig {
            reason: reason.to_owned(),
        })
    }
}

/// A fully prepared world ready to be handed to the renderer.
#[derive(Clone, Debug)]
pub struct GeneratedWorld {
    grid: TileGrid,
    start: TilePosition,
    treasure_anchor: TilePosition,
    attempts: u32,
}

impl GeneratedWorld {
    /// Tile grid with terrain, treasure and dropped items.
    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Consumes the world and yields its grid.
    #[must_use]
    pub fn into_grid(self) -> TileGrid {
        self.grid
    }

    /// Tile the player starts on.
    #[must_use]
    pub const fn start(&self) -> TilePosition {
        self.start
    }

    /// Continuous player position on the start tile.
    #[must_use]
    pub fn player_start(&self) -> PlayerPosition {
        PlayerPosition::at_tile(self.start)
    }

    /// Centre tile of the treasure cluster.
    #[must_use]
    pub const fn treasure_anchor(&self) -> TilePosition {
        self.treasure_anchor
    }

    /// Number of grids generated, including the successful one.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Generates worlds until one succeeds or the regeneration budget runs out.
pub fn bootstrap(config: &BootstrapConfig) -> Result<GeneratedWorld, BootstrapError> {
    config.validate()?;

    let generator = MapGenerator::new(config.generation.search_attempts);
    let mut seeds = ChaCha8Rng::seed_from_u64(config.seed);
    let mut last = None;

    for attempt in 1..=config.max_regenerations {
        let attempt_seed = seeds.next_u64();
        match assemble(&generator, config, attempt_seed) {
            Ok((grid, start, treasure_anchor)) => {
                info!(
                    attempt,
                    seed = config.seed,
                    start_x = start.x(),
                    start_y = start.y(),
                    "world ready"
                );
                return Ok(GeneratedWorld {
                    grid,
                    start,
                    treasure_anchor,
                    attempts: attempt,
                });
            }
            Err(error) if error.is_recoverable() => {
                warn!(attempt, %error, "regenerating world");
                last = Some(error);
            }
            Err(error) => {
                return Err(BootstrapError::InvalidConfig {
                    reason: error.to_string(),
                })
            }
        }
    }

    match last {
        Some(last) => Err(BootstrapError::Exhausted {
            regenerations: config.max_regenerations,
            last,
        }),
        None => Err(BootstrapError::InvalidConfig {
            reason: "no generation attempt ran".to_owned(),
        }),
    }
}

fn assemble(
    generator: &MapGenerator,
    config: &BootstrapConfig,
    attempt_seed: u64,
) -> Result<(TileGrid, TilePosition, TilePosition), GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(attempt_seed);
    let field = SimplexField::new(rng.gen(), config.generation.noise_frequency);
    let mut grid = generator.generate(config.generation.size, &field)?;

    let start = generator
        .choose_random_tile(&grid, TerrainKind::Land, &mut rng)?
        .position();
    let treasure_anchor = generator.place_treasure(&mut grid, &mut rng)?;
    let _ = generator.scatter_food(&mut grid, &mut rng, config.generation.food_count())?;
    let _ = place_starting_kit(&mut grid, start, config.starting_item_radius)?;

    Ok((grid, start, treasure_anchor))
}

/// Drops [`STARTING_KIT`] on walkable tiles near `start`, one item per tile.
///
/// Candidates are visited row by row and the start tile itself is skipped.
/// When fewer tiles qualify than there are items, the surplus is left out.
pub fn place_starting_kit(
    grid: &mut TileGrid,
    start: TilePosition,
    radius: u32,
) -> Result<Vec<TilePosition>, GenerationError> {
    let spots: Vec<TilePosition> = grid
        .neighborhood(start.x(), start.y(), radius)?
        .into_iter()
        .filter(|tile| tile.position() != start && tile.kind().walkable())
        .map(|tile| tile.position())
        .take(STARTING_KIT.len())
        .collect();

    if spots.len() < STARTING_KIT.len() {
        warn!(
            placed = spots.len(),
            wanted = STARTING_KIT.len(),
            "not enough walkable tiles for the starting kit"
        );
    }

    for (spot, item) in spots.iter().zip(STARTING_KIT) {
        grid.drop_item(*spot, item)?;
    }
    Ok(spots)
}
