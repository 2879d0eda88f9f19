//! Terrain Generation Pass
//!
//! The synchronous pipeline tying the pieces together: walk the grid,
//! sample noise, lift the sample to a column height, and batch the column
//! into its material band. One call produces one complete world; a config
//! change means calling it again and replacing everything.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::batch::{BandBatch, ScatterConfig, TerrainBuildContext};
use crate::config::{ConfigError, WorldConfig};
use crate::grid;
use crate::noise::TerrainNoise;

/// Stream constant separating the scatter RNG from the noise seed.
const SCATTER_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Lifts a noise sample in `[-1, 1]` to a column height in
/// `[0, max_height]`.
///
/// The 1.5 exponent biases the distribution toward low elevations, which
/// keeps stone peaks sparse.
pub fn height_from_noise(noise: f32, max_height: f32) -> f32 {
    ((noise + 1.0) * 0.5).powf(1.5) * max_height
}

/// Output of one generation pass: one merged mesh per material band.
pub struct Terrain {
    pub bands: Vec<BandBatch>,
    pub tile_count: u32,
    pub seed: u64,
}

impl Terrain {
    /// Runs a full generation pass with default scatter probabilities.
    pub fn generate(config: &WorldConfig, seed: u64) -> Result<Terrain, ConfigError> {
        Self::generate_with_scatter(config, seed, ScatterConfig::default())
    }

    /// Runs a full generation pass.
    ///
    /// Blocking and not cancellable; the only failure is an invalid config,
    /// rejected before any work happens.
    pub fn generate_with_scatter(
        config: &WorldConfig,
        seed: u64,
        scatter: ScatterConfig,
    ) -> Result<Terrain, ConfigError> {
        config.validate()?;

        let noise = TerrainNoise::new(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ SCATTER_STREAM);
        let mut ctx = TerrainBuildContext::new(config.max_height, scatter);

        let mut tile_count = 0u32;
        for ((i, j), position) in grid::tiles(config) {
            let height = height_from_noise(noise.sample(i, j), config.max_height);
            ctx.add_tile(position, height, &mut rng);
            tile_count += 1;
        }

        let bands = ctx.finish();
        let vertex_count: usize = bands.iter().map(|b| b.mesh.vertices.len()).sum();
        log::info!(
            "generated terrain: {} tiles, {} vertices, seed {:#x}",
            tile_count,
            vertex_count,
            seed
        );
        for batch in &bands {
            log::debug!("  band {}: {} tiles", batch.band.name(), batch.tiles);
        }

        Ok(Terrain {
            bands,
            tile_count,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldShape;

    #[test]
    fn height_mapping_hits_the_extremes() {
        assert_eq!(height_from_noise(1.0, 8.0), 8.0);
        assert_eq!(height_from_noise(-1.0, 8.0), 0.0);
    }

    #[test]
    fn height_mapping_biases_low() {
        // Midpoint noise maps below half height because of the exponent.
        assert!(height_from_noise(0.0, 8.0) < 4.0);
    }

    #[test]
    fn generation_rejects_invalid_config() {
        let config = WorldConfig {
            circle_radius: f32::INFINITY,
            ..WorldConfig::default()
        };
        assert!(Terrain::generate(&config, 1).is_err());
    }

    #[test]
    fn band_tiles_sum_to_total() {
        let config = WorldConfig::default();
        let terrain = Terrain::generate(&config, 42).unwrap();
        let banded: u32 = terrain.bands.iter().map(|b| b.tiles).sum();
        assert_eq!(banded, terrain.tile_count);
        assert!(terrain.tile_count > 0);
    }

    #[test]
    fn same_seed_reproduces_the_world() {
        let config = WorldConfig::default();
        let a = Terrain::generate(&config, 7).unwrap();
        let b = Terrain::generate(&config, 7).unwrap();
        for (ba, bb) in a.bands.iter().zip(&b.bands) {
            assert_eq!(ba.tiles, bb.tiles);
            assert_eq!(ba.mesh.vertices.len(), bb.mesh.vertices.len());
        }
    }

    #[test]
    fn zero_max_height_world_is_all_lowland() {
        let config = WorldConfig {
            max_height: 0.0,
            shape: WorldShape::Rectangle,
            ..WorldConfig::default()
        };
        let terrain = Terrain::generate(&config, 3).unwrap();
        for batch in &terrain.bands {
            if batch.band == crate::MaterialBand::Lowland {
                assert_eq!(batch.tiles, terrain.tile_count);
            } else {
                assert_eq!(batch.tiles, 0);
            }
        }
    }
}
