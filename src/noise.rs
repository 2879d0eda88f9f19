//! Terrain Noise
//!
//! Seeded 2D value noise with fractal octaves. Deterministic for a fixed
//! seed; regeneration passes draw a fresh seed so two passes need not match.

/// Simple hash function for noise generation
fn hash_2d(x: f32, y: f32) -> f32 {
    let n = (x * 127.1 + y * 311.7).sin() * 43758.5453;
    n.fract()
}

/// Smoothstep interpolation
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise, smoothly interpolated between lattice hashes
fn noise_2d(x: f32, y: f32) -> f32 {
    let ix = x.floor();
    let iy = y.floor();
    let fx = x - ix;
    let fy = y - iy;

    let v00 = hash_2d(ix, iy);
    let v10 = hash_2d(ix + 1.0, iy);
    let v01 = hash_2d(ix, iy + 1.0);
    let v11 = hash_2d(ix + 1.0, iy + 1.0);

    let sx = smoothstep(fx);
    let sy = smoothstep(fy);

    let v0 = v00 + sx * (v10 - v00);
    let v1 = v01 + sx * (v11 - v01);

    v0 + sy * (v1 - v0)
}

/// Coherent noise sampler for tile heights.
///
/// The seed is folded into a large lattice offset so every seed selects a
/// different region of the same noise field. Pure: `sample` has no side
/// effects and no interior mutability.
#[derive(Clone, Copy, Debug)]
pub struct TerrainNoise {
    offset_x: f32,
    offset_y: f32,
    /// Lattice cells per tile; lower = smoother terrain.
    pub frequency: f32,
    /// fBm octave count.
    pub octaves: u32,
}

impl TerrainNoise {
    pub fn new(seed: u64) -> Self {
        // Split the seed into two decorrelated lattice offsets.
        let hi = ((seed >> 32) & 0xffff) as f32;
        let lo = (seed & 0xffff) as f32;
        Self {
            offset_x: hi * 1.6180,
            offset_y: lo * 2.4142,
            frequency: 0.16,
            octaves: 4,
        }
    }

    /// Samples the height factor for a tile coordinate.
    ///
    /// Returns a value in `[-1, 1]`, deterministic for fixed `(i, j)` and
    /// seed.
    pub fn sample(&self, i: i32, j: i32) -> f32 {
        let x = i as f32 * self.frequency + self.offset_x;
        let y = j as f32 * self.frequency + self.offset_y;

        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..self.octaves.max(1) {
            value += amplitude * noise_2d(x * frequency, y * frequency);
            max_value += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        // Normalized fBm lands in [0, 1]; remap to the [-1, 1] contract.
        ((value / max_value) * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_deterministic_for_fixed_seed() {
        let noise = TerrainNoise::new(42);
        for i in -10..10 {
            for j in -10..10 {
                assert_eq!(noise.sample(i, j), noise.sample(i, j));
            }
        }
    }

    #[test]
    fn sample_stays_in_range() {
        let noise = TerrainNoise::new(7);
        for i in -50..50 {
            for j in -50..50 {
                let n = noise.sample(i, j);
                assert!((-1.0..=1.0).contains(&n), "out of range: {n}");
            }
        }
    }

    #[test]
    fn different_seeds_give_different_fields() {
        let a = TerrainNoise::new(1);
        let b = TerrainNoise::new(2);
        let diverged = (-10..10)
            .flat_map(|i| (-10..10).map(move |j| (i, j)))
            .any(|(i, j)| a.sample(i, j) != b.sample(i, j));
        assert!(diverged);
    }

    #[test]
    fn neighbouring_tiles_are_coherent() {
        // Value noise at this frequency should not jump across the full
        // range between adjacent tiles.
        let noise = TerrainNoise::new(42);
        for i in -20..20 {
            for j in -20..20 {
                let delta = (noise.sample(i, j) - noise.sample(i + 1, j)).abs();
                assert!(delta < 1.0, "discontinuity at ({i}, {j}): {delta}");
            }
        }
    }
}
