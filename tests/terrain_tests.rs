//! Terrain Tests - Full Generation Pass Scenarios
//!
//! End-to-end checks through the public API: band batching, world shapes,
//! decoration scatter, and the cloud lifecycle against a generated world.

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexland::{
    CloudField, MaterialBand, ScatterConfig, Terrain, WorldConfig, WorldShape, mesh::hex_column,
};

// ============================================================================
// Generation Pass Tests
// ============================================================================

#[test]
fn test_default_world_generates_all_five_bands() {
    let terrain = Terrain::generate(&WorldConfig::default(), 42).unwrap();

    assert_eq!(terrain.bands.len(), 5);
    let order: Vec<MaterialBand> = terrain.bands.iter().map(|b| b.band).collect();
    assert_eq!(order, MaterialBand::ALL.to_vec());
}

#[test]
fn test_rectangle_holds_more_tiles_than_circle() {
    let circle = WorldConfig::default();
    let rectangle = WorldConfig {
        shape: WorldShape::Rectangle,
        ..circle
    };

    let circle_tiles = Terrain::generate(&circle, 1).unwrap().tile_count;
    let rect_tiles = Terrain::generate(&rectangle, 1).unwrap().tile_count;

    // Same half-extent, but the circle trims the corners.
    assert!(rect_tiles > circle_tiles);
}

#[test]
fn test_different_seeds_give_different_band_mixes() {
    let config = WorldConfig::default();
    let a = Terrain::generate(&config, 100).unwrap();
    let b = Terrain::generate(&config, 200).unwrap();

    assert_eq!(a.tile_count, b.tile_count);
    let counts = |t: &Terrain| t.bands.iter().map(|b| b.tiles).collect::<Vec<_>>();
    assert_ne!(counts(&a), counts(&b));
}

#[test]
fn test_growing_the_radius_grows_the_world() {
    let small = WorldConfig {
        circle_radius: 10.0,
        ..WorldConfig::default()
    };
    let large = WorldConfig {
        circle_radius: 30.0,
        ..WorldConfig::default()
    };

    let small_tiles = Terrain::generate(&small, 9).unwrap().tile_count;
    let large_tiles = Terrain::generate(&large, 9).unwrap().tile_count;
    assert!(large_tiles > small_tiles * 4);
}

// ============================================================================
// Scatter Tests
// ============================================================================

#[test]
fn test_certain_scatter_decorates_every_grass_tile() {
    let config = WorldConfig::default();
    let bare = ScatterConfig {
        grass_tree: 0.0,
        dirt_tree: 0.0,
        stone_rock: 0.0,
        sand_rock: 0.0,
    };
    let forested = ScatterConfig {
        grass_tree: 1.0,
        ..bare
    };

    let without = Terrain::generate_with_scatter(&config, 7, bare).unwrap();
    let with = Terrain::generate_with_scatter(&config, 7, forested).unwrap();

    for (a, b) in without.bands.iter().zip(&with.bands) {
        assert_eq!(a.tiles, b.tiles, "scatter must not move tiles across bands");
        if a.band == MaterialBand::Grass && a.tiles > 0 {
            assert!(b.mesh.vertices.len() > a.mesh.vertices.len());
        } else {
            assert_eq!(b.mesh.vertices.len(), a.mesh.vertices.len());
        }
    }
}

#[test]
fn test_bare_tiles_are_plain_columns() {
    let config = WorldConfig::default();
    let bare = ScatterConfig {
        grass_tree: 0.0,
        dirt_tree: 0.0,
        stone_rock: 0.0,
        sand_rock: 0.0,
    };
    let terrain = Terrain::generate_with_scatter(&config, 3, bare).unwrap();

    let column = hex_column(Vec2::ZERO, 1.0, [1.0; 4]);
    for batch in &terrain.bands {
        assert_eq!(
            batch.mesh.triangle_count(),
            batch.tiles as usize * column.triangle_count()
        );
    }
}

// ============================================================================
// Classification Boundary Tests
// ============================================================================

#[test]
fn test_band_thresholds_are_strict() {
    let max = 8.0;
    // Exactly at a threshold falls to the band below it.
    assert_eq!(MaterialBand::classify(0.8 * max, max), MaterialBand::Dirt);
    assert_eq!(MaterialBand::classify(0.7 * max, max), MaterialBand::Grass);
    assert_eq!(MaterialBand::classify(0.5 * max, max), MaterialBand::Sand);
    assert_eq!(MaterialBand::classify(0.3 * max, max), MaterialBand::Lowland);
    assert_eq!(MaterialBand::classify(max, max), MaterialBand::Stone);
}

// ============================================================================
// Cloud Lifecycle Tests
// ============================================================================

#[test]
fn test_cloud_population_is_stable_over_a_long_run() {
    let config = WorldConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut field = CloudField::spawn(&config, &mut rng);
    let initial = field.len();
    assert!(initial >= 2);

    // Roughly ten minutes of frames at 60 fps.
    for _ in 0..36_000 {
        field.tick(1.0 / 60.0, &mut rng);
    }

    assert_eq!(field.len(), initial);
    assert!(!field.combined_mesh().is_empty());
}

#[test]
fn test_clouds_stay_inside_the_recycling_bound() {
    let config = WorldConfig::default();
    let bound = hexland::clouds::BOUND_FRACTION * config.circle_radius;
    let mut rng = ChaCha8Rng::seed_from_u64(34);
    let mut field = CloudField::spawn(&config, &mut rng);

    for _ in 0..5_000 {
        field.tick(0.1, &mut rng);
        for cloud in field.iter() {
            assert!(cloud.position.x.abs() <= bound + 1.0);
        }
    }
}
