//! Decoration Geometry
//!
//! Procedural trees and rocks scattered on qualifying tiles. Each shape is
//! anchored at its tile's cap and merged straight into the tile's band
//! mesh, so decorations never exist as separate scene entities.

use glam::Vec3;
use rand::Rng;

use crate::mesh::{Mesh, Vertex, ellipsoid};

const TRUNK_COLOR: [f32; 4] = [0.40, 0.25, 0.15, 1.0];
const FOLIAGE_COLOR: [f32; 4] = [0.20, 0.50, 0.20, 1.0];
const ROCK_COLOR: [f32; 4] = [0.48, 0.46, 0.44, 1.0];

/// Generates a tree anchored at `anchor` (a tile cap): trunk cylinder plus
/// a foliage cone, randomly sized from the injected source.
pub fn tree(anchor: Vec3, rng: &mut impl Rng) -> Mesh {
    let height = rng.gen_range(1.6..3.2);
    let trunk_radius = rng.gen_range(0.10..0.18);
    let foliage_radius = rng.gen_range(0.55..0.95);

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let segments = 6u32;

    // Trunk
    let trunk_height = height * 0.4;
    let trunk_base = vertices.len() as u32;
    for level in 0..2 {
        let y = anchor.y + level as f32 * trunk_height;
        for i in 0..segments {
            let angle = (i as f32) * 2.0 * std::f32::consts::PI / (segments as f32);
            let nx = angle.cos();
            let nz = angle.sin();
            vertices.push(Vertex {
                position: [
                    anchor.x + nx * trunk_radius,
                    y,
                    anchor.z + nz * trunk_radius,
                ],
                normal: [nx, 0.0, nz],
                color: TRUNK_COLOR,
            });
        }
    }
    for i in 0..segments {
        let next = (i + 1) % segments;
        let (i0, i1) = (trunk_base + i, trunk_base + next);
        let (i2, i3) = (i0 + segments, i1 + segments);
        indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
    }

    // Foliage cone
    let foliage_base_y = anchor.y + trunk_height;
    let cone_base = vertices.len() as u32;
    for i in 0..segments {
        let angle = (i as f32) * 2.0 * std::f32::consts::PI / (segments as f32);
        let nx = angle.cos();
        let nz = angle.sin();
        let normal = Vec3::new(nx, 0.5, nz).normalize();
        vertices.push(Vertex {
            position: [
                anchor.x + nx * foliage_radius,
                foliage_base_y,
                anchor.z + nz * foliage_radius,
            ],
            normal: normal.to_array(),
            color: FOLIAGE_COLOR,
        });
    }
    let apex = vertices.len() as u32;
    vertices.push(Vertex {
        position: [anchor.x, anchor.y + height, anchor.z],
        normal: [0.0, 1.0, 0.0],
        color: FOLIAGE_COLOR,
    });
    let skirt_center = vertices.len() as u32;
    vertices.push(Vertex {
        position: [anchor.x, foliage_base_y, anchor.z],
        normal: [0.0, -1.0, 0.0],
        color: FOLIAGE_COLOR,
    });
    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[cone_base + i, apex, cone_base + next]);
        indices.extend_from_slice(&[cone_base + i, cone_base + next, skirt_center]);
    }

    Mesh { vertices, indices }
}

/// Generates a rock: a squashed low-segment ellipsoid sunk slightly into
/// the tile cap.
pub fn rock(anchor: Vec3, rng: &mut impl Rng) -> Mesh {
    let radius = rng.gen_range(0.30..0.60);
    let shade = rng.gen_range(-0.06..0.06);
    let color = [
        ROCK_COLOR[0] + shade,
        ROCK_COLOR[1] + shade,
        ROCK_COLOR[2] + shade,
        1.0,
    ];
    let center = anchor + Vec3::new(0.0, radius * 0.3, 0.0);
    ellipsoid(
        center,
        Vec3::new(radius, radius * 0.65, radius * rng.gen_range(0.8..1.2)),
        color,
        5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn tree_sits_on_its_anchor() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let anchor = Vec3::new(2.0, 5.0, -3.0);
        let mesh = tree(anchor, &mut rng);
        let (min, max) = mesh.bounding_box().unwrap();
        assert!((min.y - anchor.y).abs() < 1e-5);
        assert!(max.y > anchor.y + 1.0);
    }

    #[test]
    fn rock_is_wider_than_tall() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mesh = rock(Vec3::ZERO, &mut rng);
        let (min, max) = mesh.bounding_box().unwrap();
        assert!(max.x - min.x > max.y - min.y);
    }

    #[test]
    fn decoration_shapes_are_reproducible_for_a_seed() {
        let anchor = Vec3::new(1.0, 2.0, 3.0);
        let a = tree(anchor, &mut ChaCha8Rng::seed_from_u64(9));
        let b = tree(anchor, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a.vertices.len(), b.vertices.len());
        assert_eq!(a.bounding_box().unwrap(), b.bounding_box().unwrap());
    }
}
