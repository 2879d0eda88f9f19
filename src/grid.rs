//! Grid Walker
//!
//! Enumerates candidate tile coordinates for the chosen world shape and
//! converts them to planar hex-packed positions. The walk is finite and
//! restartable: re-running it for the same config yields the same sequence.

use glam::Vec2;

use crate::config::{WorldConfig, WorldShape};

/// Logical grid indices of one tile.
pub type TileCoord = (i32, i32);

/// Horizontal spacing between adjacent columns in a row.
pub const COLUMN_SPACING: f32 = 1.7;
/// Spacing between rows.
pub const ROW_SPACING: f32 = 1.5;

/// Converts tile indices to a planar position.
///
/// Odd rows are offset by half a column, forming the hex packing. The map
/// is injective within a row parity class by construction.
pub fn tile_to_position(i: i32, j: i32) -> Vec2 {
    let parity_offset = j.rem_euclid(2) as f32 * 0.5;
    Vec2::new(
        (i as f32 + parity_offset) * COLUMN_SPACING,
        j as f32 * ROW_SPACING,
    )
}

/// Walks every candidate tile for the config, row-major `i` outer / `j`
/// inner.
///
/// Circle worlds scan `[-R, R]²` and keep positions within `R/2` of the
/// origin; rectangle worlds scan `[-R/2, R/2]²` unfiltered.
pub fn tiles(config: &WorldConfig) -> impl Iterator<Item = (TileCoord, Vec2)> {
    let shape = config.shape;
    let r = config.circle_radius.round() as i32;
    let span = match shape {
        WorldShape::Circle => r,
        WorldShape::Rectangle => r / 2,
    };
    let distance_limit = config.circle_radius * 0.5;

    (-span..=span)
        .flat_map(move |i| (-span..=span).map(move |j| ((i, j), tile_to_position(i, j))))
        .filter(move |(_, position)| match shape {
            WorldShape::Circle => position.length() <= distance_limit,
            WorldShape::Rectangle => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(radius: f32) -> WorldConfig {
        WorldConfig {
            circle_radius: radius,
            shape: WorldShape::Circle,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn circle_walk_keeps_origin_and_drops_far_corner() {
        let config = circle(20.0);
        let coords: Vec<TileCoord> = tiles(&config).map(|(c, _)| c).collect();
        assert!(coords.contains(&(0, 0)));
        assert!(!coords.contains(&(20, 20)));
    }

    #[test]
    fn circle_walk_positions_stay_in_bounds() {
        let config = circle(20.0);
        for (_, position) in tiles(&config) {
            assert!(position.length() <= 10.0 + f32::EPSILON);
        }
    }

    #[test]
    fn rectangle_walk_covers_full_square() {
        let config = WorldConfig {
            circle_radius: 20.0,
            shape: WorldShape::Rectangle,
            ..WorldConfig::default()
        };
        // i, j in [-10, 10] with no distance filter.
        assert_eq!(tiles(&config).count(), 21 * 21);
    }

    #[test]
    fn walk_is_restartable() {
        let config = circle(12.0);
        let first: Vec<_> = tiles(&config).collect();
        let second: Vec<_> = tiles(&config).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn positions_are_unique_per_tile() {
        let config = circle(10.0);
        let positions: Vec<Vec2> = tiles(&config).map(|(_, p)| p).collect();
        for (a, pa) in positions.iter().enumerate() {
            for pb in positions.iter().skip(a + 1) {
                assert!(pa.distance(*pb) > 0.1, "colliding positions: {pa} {pb}");
            }
        }
    }

    #[test]
    fn odd_rows_are_offset_by_half_a_column() {
        let even = tile_to_position(3, 0);
        let odd = tile_to_position(3, 1);
        assert!((odd.x - even.x - 0.5 * COLUMN_SPACING).abs() < 1e-6);
        assert!((odd.y - ROW_SPACING).abs() < 1e-6);
    }

    #[test]
    fn negative_rows_share_the_parity_offset() {
        // rem_euclid keeps the offset non-negative for negative rows, so
        // rows -1 and 1 line up in x.
        assert_eq!(tile_to_position(2, -1).x, tile_to_position(2, 1).x);
    }
}
