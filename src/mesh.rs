//! Mesh Types and Column Geometry
//!
//! GPU vertex layout, the CPU-side mesh accumulator used for batching, and
//! the primitive shapes terrain tiles and decorations are built from.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use static_assertions::const_assert_eq;

/// Circumradius of every tile column (center to hex vertex).
pub const TILE_RADIUS: f32 = 1.0;

/// Vertex for terrain, decorations, and clouds
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

// Must match the vertex buffer layout declared in the viewer and in
// shaders/terrain.wgsl (3 + 3 + 4 floats).
const_assert_eq!(std::mem::size_of::<Vertex>(), 40);

/// A mesh accumulator with vertices and indices.
///
/// Merging is the batching primitive: many small shapes are folded into one
/// draw-ready buffer pair. Merge order affects buffer layout but not the
/// occupied volume, so tiles may be appended in any order.
#[derive(Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn merge(&mut self, other: &Mesh) {
        let base_idx = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base_idx));
    }

    /// Merges `other` shifted by `offset`. Used to place local-space cloud
    /// geometry at its current world position.
    pub fn merge_translated(&mut self, other: &Mesh, offset: Vec3) {
        let base_idx = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().map(|v| Vertex {
            position: [
                v.position[0] + offset.x,
                v.position[1] + offset.y,
                v.position[2] + offset.z,
            ],
            ..*v
        }));
        self.indices.extend(other.indices.iter().map(|i| i + base_idx));
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut verts = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = verts.next()?;
        let (min, max) = verts.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some((min, max))
    }
}

/// Builds a hexagonal prism column at a planar position.
///
/// The base ring sits at elevation 0 and the cap at `height`; planar `x`
/// maps to world x and planar `y` to world z. A zero height is valid and
/// yields a flat, zero-extent cap. The bottom face is never visible and is
/// not emitted.
pub fn hex_column(position: Vec2, height: f32, color: [f32; 4]) -> Mesh {
    let mut vertices = Vec::with_capacity(31);
    let mut indices = Vec::with_capacity(54);

    let center = Vec3::new(position.x, height, position.y);

    // Pointy-top corners, matching the row packing of the grid walk.
    let corner = |k: u32| -> Vec2 {
        let angle = (k as f32) * std::f32::consts::FRAC_PI_3 + std::f32::consts::FRAC_PI_6;
        Vec2::new(
            position.x + TILE_RADIUS * angle.cos(),
            position.y + TILE_RADIUS * angle.sin(),
        )
    };

    // Cap fan
    vertices.push(Vertex {
        position: center.to_array(),
        normal: [0.0, 1.0, 0.0],
        color,
    });
    for k in 0..6 {
        let c = corner(k);
        vertices.push(Vertex {
            position: [c.x, height, c.y],
            normal: [0.0, 1.0, 0.0],
            color,
        });
    }
    for k in 0..6u32 {
        let next = (k + 1) % 6;
        indices.extend_from_slice(&[0, 1 + k, 1 + next]);
    }

    // Side walls, one flat-shaded quad per edge
    for k in 0..6u32 {
        let next = (k + 1) % 6;
        let a = corner(k);
        let b = corner(next);
        let mid = (a + b) * 0.5 - position;
        let normal = Vec3::new(mid.x, 0.0, mid.y).normalize_or_zero().to_array();

        let base = vertices.len() as u32;
        vertices.push(Vertex {
            position: [a.x, 0.0, a.y],
            normal,
            color,
        });
        vertices.push(Vertex {
            position: [b.x, 0.0, b.y],
            normal,
            color,
        });
        vertices.push(Vertex {
            position: [b.x, height, b.y],
            normal,
            color,
        });
        vertices.push(Vertex {
            position: [a.x, height, a.y],
            normal,
            color,
        });
        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    Mesh { vertices, indices }
}

/// Generates an axis-aligned ellipsoid (lat/lon sphere scaled per axis).
///
/// Normals use the unit-sphere direction, which is close enough for the
/// soft shapes (rocks, cloud puffs) this is used for.
pub fn ellipsoid(center: Vec3, radii: Vec3, color: [f32; 4], segments: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for lat in 0..=segments {
        let theta = (lat as f32) * std::f32::consts::PI / (segments as f32);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for lon in 0..=segments {
            let phi = (lon as f32) * 2.0 * std::f32::consts::PI / (segments as f32);

            let dir = Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin());
            let pos = center + dir * radii;
            vertices.push(Vertex {
                position: pos.to_array(),
                normal: dir.to_array(),
                color,
            });
        }
    }

    for lat in 0..segments {
        for lon in 0..segments {
            let first = lat * (segments + 1) + lon;
            let second = first + segments + 1;

            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    Mesh { vertices, indices }
}
