//! Bounded rejection sampling over the grid.

use castaway_core::TerrainKind;
use rand::Rng;
use tracing::debug;

use crate::{GridError, Tile, TileGrid};

/// Attempt budget used when callers have no stronger opinion.
pub const DEFAULT_SEARCH_ATTEMPTS: u32 = 1_000;

pub(crate) fn rejection_sample<'grid, R, P>(
    grid: &'grid TileGrid,
    kind: TerrainKind,
    rng: &mut R,
    attempts: u32,
    mut accept: P,
) -> Result<&'grid Tile, GridError>
where
    R: Rng + ?Sized,
    P: FnMut(&Tile) -> bool,
{
    let size = grid.size();
    for _ in 0..attempts {
        let x = rng.gen_range(0..size);
        let y = rng.gen_range(0..size);
        let tile = grid.tile_at(x, y)?;
        if tile.kind() == kind && accept(tile) {
            return Ok(tile);
        }
    }

    debug!(?kind, attempts, size, "random tile search exhausted");
    Err(GridError::NoMatchFound { kind, attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use castaway_core::TilePosition;
    use rand::{rngs::mock::StepRng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn single_tile_grid_without_match_fails_after_budget() {
        let grid = TileGrid::filled(1, TerrainKind::Water).expect("valid grid");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = rejection_sample(&grid, TerrainKind::Land, &mut rng, 25, |_| true);
        assert_eq!(
            outcome,
            Err(GridError::NoMatchFound {
                kind: TerrainKind::Land,
                attempts: 25,
            })
        );
    }

    #[test]
    fn predicate_is_consulted_once_per_matching_candidate() {
        let grid = TileGrid::filled(3, TerrainKind::Land).expect("valid grid");
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut consulted = 0;
        let outcome = rejection_sample(&grid, TerrainKind::Land, &mut rng, 40, |_| {
            consulted += 1;
            false
        });
        assert!(outcome.is_err());
        assert_eq!(consulted, 40);
    }

    #[test]
    fn zero_budget_fails_immediately() {
        let grid = TileGrid::filled(2, TerrainKind::Land).expect("valid grid");
        let mut rng = StepRng::new(0, 1);
        assert_eq!(
            rejection_sample(&grid, TerrainKind::Land, &mut rng, 0, |_| true),
            Err(GridError::NoMatchFound {
                kind: TerrainKind::Land,
                attempts: 0,
            })
        );
    }

    #[test]
    fn predicate_can_restrict_to_interior() {
        let grid = TileGrid::filled(5, TerrainKind::Land).expect("valid grid");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let tile = rejection_sample(&grid, TerrainKind::Land, &mut rng, 500, |tile| {
                grid.is_interior(tile.position())
            })
            .expect("interior exists");
            assert!(grid.is_interior(tile.position()));
            assert_ne!(tile.position(), TilePosition::new(0, 0));
        }
    }
}
