use castaway_core::{ItemKind, TerrainKind, TilePosition};
use castaway_system_generation::{
    treasure_cluster, GenerationConfig, GenerationError, MapGenerator, NoiseField, SimplexField,
};
use castaway_world::{GridError, TileGrid};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Rolling bands of water, land, forest and rock so every kind is present.
fn banded(x: f64, y: f64) -> f64 {
    ((x + y) * 0.35).sin()
}

proptest! {
    #[test]
    fn generated_grid_is_square_and_fully_classified(size in 1u32..40, seed in any::<u32>()) {
        let field = SimplexField::new(seed, 0.08);
        let grid = MapGenerator::default()
            .generate(size, &field)
            .expect("positive size");

        prop_assert_eq!(grid.size(), size);
        prop_assert_eq!(grid.tiles().count() as u64, u64::from(size) * u64::from(size));
        for tile in grid.tiles() {
            prop_assert!(grid.contains(tile.position()));
            prop_assert_ne!(tile.kind(), TerrainKind::Treasure);
            prop_assert_eq!(tile.current_health(), tile.kind().durability());
        }
    }
}

#[test]
fn zero_size_is_rejected() {
    let outcome = MapGenerator::default().generate(0, &banded);
    assert_eq!(
        outcome,
        Err(GenerationError::Grid(GridError::InvalidSize { size: 0 }))
    );
}

#[test]
fn closure_noise_drives_classification() {
    let grid = MapGenerator::default()
        .generate(4, &|x: f64, _y: f64| if x < 2.0 { -1.0 } else { 0.0 })
        .expect("positive size");
    for tile in grid.tiles() {
        let expected = if tile.position().x() < 2 {
            TerrainKind::Water
        } else {
            TerrainKind::Land
        };
        assert_eq!(tile.kind(), expected);
    }
}

#[test]
fn noise_is_sampled_at_tile_coordinates() {
    let field = SimplexField::new(3, 0.08);
    let grid = MapGenerator::default()
        .generate(12, &field)
        .expect("positive size");
    for tile in grid.tiles() {
        let sample = field.sample(
            f64::from(tile.position().x()),
            f64::from(tile.position().y()),
        );
        assert_eq!(tile.kind(), castaway_core::classify(sample));
    }
}

#[test]
fn land_search_on_large_grid_always_succeeds() {
    let generator = MapGenerator::default();
    let grid = generator.generate(128, &banded).expect("positive size");
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..500 {
        let tile = generator
            .choose_random_tile(&grid, TerrainKind::Land, &mut rng)
            .expect("land covers a wide band");
        assert_eq!(tile.kind(), TerrainKind::Land);
    }
}

#[test]
fn search_on_single_rock_tile_reports_no_match() {
    let generator = MapGenerator::new(64);
    let grid = generator.generate(1, &|_: f64, _: f64| 1.0).expect("positive size");
    assert_eq!(grid.tile_at(0, 0).expect("in range").kind(), TerrainKind::Rock);

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let error = generator
        .choose_random_tile(&grid, TerrainKind::Land, &mut rng)
        .expect_err("no land exists");
    assert_eq!(
        error,
        GenerationError::Grid(GridError::NoMatchFound {
            kind: TerrainKind::Land,
            attempts: 64,
        })
    );
    assert!(error.is_recoverable());
}

#[test]
fn treasure_cluster_is_anchor_plus_diagonals() {
    let generator = MapGenerator::default();
    for seed in 0..20 {
        let mut grid = generator.generate(48, &banded).expect("positive size");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let anchor = generator
            .place_treasure(&mut grid, &mut rng)
            .expect("interior land exists");

        assert!(grid.is_interior(anchor));
        let cluster = treasure_cluster(&grid, anchor).expect("interior anchor");
        for position in cluster {
            let tile = grid.tile_at(position.x(), position.y()).expect("in range");
            assert_eq!(tile.kind(), TerrainKind::Treasure);
        }
        for (dx, dy) in [(1, 1), (-1, -1), (1, -1), (-1, 1)] {
            let diagonal = anchor.checked_offset(dx, dy).expect("interior anchor");
            assert!(cluster.contains(&diagonal));
        }
    }
}

#[test]
fn treasure_only_replaces_cluster_tiles() {
    let generator = MapGenerator::default();
    let before = generator.generate(32, &banded).expect("positive size");
    let mut after = before.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let anchor = generator
        .place_treasure(&mut after, &mut rng)
        .expect("interior land exists");
    let cluster = treasure_cluster(&after, anchor).expect("interior anchor");

    let changed: Vec<TilePosition> = before
        .tiles()
        .zip(after.tiles())
        .filter(|(old, new)| old.kind() != new.kind())
        .map(|(old, _)| old.position())
        .collect();
    assert!(changed.iter().all(|position| cluster.contains(position)));
    assert!(changed.contains(&anchor));
}

#[test]
fn food_lands_on_land_tiles() {
    let generator = MapGenerator::default();
    let config = GenerationConfig::default();
    let mut grid = generator.generate(config.size, &banded).expect("positive size");
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let positions = generator
        .scatter_food(&mut grid, &mut rng, config.food_count())
        .expect("land exists");

    assert_eq!(positions.len(), 8);
    assert_eq!(grid.dropped_items().len(), 8);
    for item in grid.dropped_items() {
        assert_eq!(item.item(), ItemKind::Food);
        let tile = grid
            .tile_at(item.position().x(), item.position().y())
            .expect("in range");
        assert_eq!(tile.kind(), TerrainKind::Land);
    }
}

#[test]
fn scatter_with_zero_count_is_a_no_op() {
    let generator = MapGenerator::default();
    let mut grid = TileGrid::filled(3, TerrainKind::Water).expect("valid grid");
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let positions = generator
        .scatter_food(&mut grid, &mut rng, 0)
        .expect("nothing to place");
    assert!(positions.is_empty());
}

#[test]
fn generation_config_reads_partial_toml() {
    let config: GenerationConfig = toml::from_str(
        r#"
            size = 64
            noise_frequency = 0.05
        "#,
    )
    .expect("valid toml");

    assert_eq!(config.size, 64);
    assert_eq!(config.noise_frequency, 0.05);
    assert_eq!(config.search_attempts, GenerationConfig::default().search_attempts);
    assert_eq!(config.food_count(), 4);
}
