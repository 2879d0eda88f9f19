//! Geometry Batching
//!
//! Accumulates tile columns and scatter decorations into one mesh per
//! material band. The context is owned by the generation pass and dropped
//! with it, so no accumulator state survives between regenerations.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classify::MaterialBand;
use crate::decorations;
use crate::mesh::{Mesh, hex_column};

/// Per-band decoration probabilities, rolled once per tile.
///
/// The defaults are tuned by eye; they are plain fields so presets can
/// override them without touching generation code.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// Chance of a tree on a grass tile.
    pub grass_tree: f64,
    /// Chance of a tree on a dirt tile.
    pub dirt_tree: f64,
    /// Chance of a rock on a stone tile.
    pub stone_rock: f64,
    /// Chance of a rock on a sand tile.
    pub sand_rock: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            grass_tree: 0.20,
            dirt_tree: 0.05,
            stone_rock: 0.03,
            sand_rock: 0.03,
        }
    }
}

/// One finalized band: its merged mesh and how many tiles landed in it.
pub struct BandBatch {
    pub band: MaterialBand,
    pub mesh: Mesh,
    pub tiles: u32,
}

/// Accumulator state for one generation pass.
pub struct TerrainBuildContext {
    bands: [Mesh; 5],
    tile_counts: [u32; 5],
    max_height: f32,
    scatter: ScatterConfig,
}

impl TerrainBuildContext {
    pub fn new(max_height: f32, scatter: ScatterConfig) -> Self {
        Self {
            bands: std::array::from_fn(|_| Mesh::new()),
            tile_counts: [0; 5],
            max_height,
            scatter,
        }
    }

    /// Adds one tile column: classify, merge into the band's accumulator,
    /// then roll the band's decoration.
    ///
    /// Total for any finite inputs; a zero height merges a valid flat cap.
    /// Returns the band the tile landed in.
    pub fn add_tile(
        &mut self,
        position: Vec2,
        height: f32,
        rng: &mut impl Rng,
    ) -> MaterialBand {
        let band = MaterialBand::classify(height, self.max_height);
        let idx = band.index();

        let column = hex_column(position, height, band.color());
        self.bands[idx].merge(&column);
        self.tile_counts[idx] += 1;

        let chance = match band {
            MaterialBand::Grass => self.scatter.grass_tree,
            MaterialBand::Dirt => self.scatter.dirt_tree,
            MaterialBand::Stone => self.scatter.stone_rock,
            MaterialBand::Sand => self.scatter.sand_rock,
            MaterialBand::Lowland => 0.0,
        };
        if rng.gen_range(0.0..1.0) < chance {
            let anchor = Vec3::new(position.x, height, position.y);
            let decoration = match band {
                MaterialBand::Grass | MaterialBand::Dirt => decorations::tree(anchor, rng),
                _ => decorations::rock(anchor, rng),
            };
            self.bands[idx].merge(&decoration);
        }

        band
    }

    /// Finalizes the pass, yielding one batch per band in stable band
    /// order. Empty bands are included so the host can keep fixed buffer
    /// slots.
    pub fn finish(self) -> Vec<BandBatch> {
        self.bands
            .into_iter()
            .zip(MaterialBand::ALL)
            .zip(self.tile_counts)
            .map(|((mesh, band), tiles)| BandBatch { band, mesh, tiles })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn no_scatter() -> ScatterConfig {
        ScatterConfig {
            grass_tree: 0.0,
            dirt_tree: 0.0,
            stone_rock: 0.0,
            sand_rock: 0.0,
        }
    }

    #[test]
    fn tiles_land_in_their_classified_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ctx = TerrainBuildContext::new(8.0, no_scatter());
        assert_eq!(
            ctx.add_tile(Vec2::ZERO, 7.0, &mut rng),
            MaterialBand::Stone
        );
        assert_eq!(
            ctx.add_tile(Vec2::new(1.7, 0.0), 4.0, &mut rng),
            MaterialBand::Sand
        );

        let batches = ctx.finish();
        assert_eq!(batches[MaterialBand::Stone.index()].tiles, 1);
        assert_eq!(batches[MaterialBand::Sand.index()].tiles, 1);
        assert_eq!(batches[MaterialBand::Grass.index()].tiles, 0);
        assert!(batches[MaterialBand::Grass.index()].mesh.is_empty());
    }

    #[test]
    fn merge_order_does_not_change_occupied_volume() {
        let tiles = [
            (Vec2::new(0.0, 0.0), 7.0),
            (Vec2::new(3.4, 0.0), 6.8),
            (Vec2::new(-3.4, 1.5), 7.5),
        ];

        let mut forward = TerrainBuildContext::new(8.0, no_scatter());
        let mut reverse = TerrainBuildContext::new(8.0, no_scatter());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for (pos, h) in tiles {
            forward.add_tile(pos, h, &mut rng);
        }
        for (pos, h) in tiles.iter().rev() {
            reverse.add_tile(*pos, *h, &mut rng);
        }

        let fwd = forward.finish();
        let rev = reverse.finish();
        let idx = MaterialBand::Stone.index();
        assert_eq!(fwd[idx].tiles, rev[idx].tiles);
        assert_eq!(
            fwd[idx].mesh.bounding_box().unwrap(),
            rev[idx].mesh.bounding_box().unwrap()
        );
    }

    #[test]
    fn certain_scatter_adds_decoration_geometry() {
        let scatter = ScatterConfig {
            grass_tree: 1.0,
            ..no_scatter()
        };
        let mut bare = TerrainBuildContext::new(8.0, no_scatter());
        let mut decorated = TerrainBuildContext::new(8.0, scatter);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        bare.add_tile(Vec2::ZERO, 4.5, &mut rng); // grass band
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        decorated.add_tile(Vec2::ZERO, 4.5, &mut rng);

        let idx = MaterialBand::Grass.index();
        let bare_tris = bare.finish()[idx].mesh.triangle_count();
        let decorated_tris = decorated.finish()[idx].mesh.triangle_count();
        assert!(decorated_tris > bare_tris);
    }

    #[test]
    fn lowland_never_rolls_decoration() {
        let scatter = ScatterConfig {
            grass_tree: 1.0,
            dirt_tree: 1.0,
            stone_rock: 1.0,
            sand_rock: 1.0,
        };
        let mut ctx = TerrainBuildContext::new(8.0, scatter);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        ctx.add_tile(Vec2::ZERO, 0.5, &mut rng);

        let batches = ctx.finish();
        let lowland = &batches[MaterialBand::Lowland.index()].mesh;
        // A bare column has exactly 6 cap + 12 side triangles.
        assert_eq!(lowland.triangle_count(), 18);
    }
}
