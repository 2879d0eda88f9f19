//! Cloud Scatter & Motion
//!
//! Drifting decoration clouds above the terrain. A cloud that crosses the
//! world's horizontal bound is recycled: removed and immediately replaced
//! by a fresh spawn at the opposite edge, so the live count never changes.

use glam::Vec3;
use rand::Rng;

use crate::config::WorldConfig;
use crate::mesh::{Mesh, ellipsoid};

/// Fraction of `circle_radius` at which a drifting cloud is recycled.
pub const BOUND_FRACTION: f32 = 0.8;

/// Shared drift velocity, world units per second.
pub const DRIFT_VELOCITY: Vec3 = Vec3::new(1.5, 0.0, 0.0);

const PUFF_COLOR: [f32; 4] = [0.95, 0.96, 0.98, 1.0];

/// Cloud count for a world radius: `max(2, min(rand * R/2.2, R/2))`.
///
/// The formula is inherited tuning; it scales the sky population with the
/// world while clamping both ends.
pub fn cloud_count(circle_radius: f32, rng: &mut impl Rng) -> usize {
    let raw = rng.gen_range(0.0..1.0f32) * circle_radius / 2.2;
    raw.min(circle_radius / 2.0).max(2.0) as usize
}

/// One drifting cloud: local-space puff geometry plus a world position.
pub struct Cloud {
    pub position: Vec3,
    mesh: Mesh,
}

impl Cloud {
    /// Builds a cloud from 3-8 randomly sized and placed puffs around the
    /// local origin.
    fn build(position: Vec3, rng: &mut impl Rng) -> Cloud {
        let mut mesh = Mesh::new();
        let puffs = rng.gen_range(3..=8);
        for _ in 0..puffs {
            let offset = Vec3::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-0.3..0.3),
                rng.gen_range(-1.0..1.0),
            );
            let r = rng.gen_range(0.8..1.6);
            let puff = ellipsoid(offset, Vec3::new(r, r * 0.55, r * 0.8), PUFF_COLOR, 6);
            mesh.merge(&puff);
        }
        Cloud { position, mesh }
    }
}

/// The live cloud collection for one generation pass.
pub struct CloudField {
    clouds: Vec<Cloud>,
    circle_radius: f32,
    ceiling: f32,
    pub velocity: Vec3,
}

impl CloudField {
    /// Scatters the initial cloud population for a config. The count is
    /// fixed for the lifetime of the field.
    pub fn spawn(config: &WorldConfig, rng: &mut impl Rng) -> CloudField {
        let circle_radius = config.circle_radius;
        let ceiling = config.max_height;
        let count = cloud_count(circle_radius, rng);

        let bound = BOUND_FRACTION * circle_radius;
        let clouds = (0..count)
            .map(|_| {
                let x = rng.gen_range(-bound..bound.max(f32::MIN_POSITIVE));
                Self::spawn_at(x, circle_radius, ceiling, rng)
            })
            .collect();

        CloudField {
            clouds,
            circle_radius,
            ceiling,
            velocity: DRIFT_VELOCITY,
        }
    }

    fn spawn_at(x: f32, circle_radius: f32, ceiling: f32, rng: &mut impl Rng) -> Cloud {
        let lateral = circle_radius * 0.5;
        let position = Vec3::new(
            x,
            ceiling + rng.gen_range(3.0..8.0),
            rng.gen_range(-lateral..lateral.max(f32::MIN_POSITIVE)),
        );
        Cloud::build(position, rng)
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    /// Advances every cloud by the shared velocity and recycles the ones
    /// past the bound, one-in-one-out.
    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng) {
        let bound = BOUND_FRACTION * self.circle_radius;
        let step = self.velocity * dt;
        for cloud in &mut self.clouds {
            cloud.position += step;
            if cloud.position.x > bound {
                *cloud = Self::spawn_at(-bound, self.circle_radius, self.ceiling, rng);
            }
        }
    }

    /// Merges all clouds, translated to their current positions, into one
    /// upload-ready mesh.
    pub fn combined_mesh(&self) -> Mesh {
        let mut combined = Mesh::new();
        for cloud in &self.clouds {
            combined.merge_translated(&cloud.mesh, cloud.position);
        }
        combined
    }
}
