//! Height Classification
//!
//! Maps a sampled column height to one of five material bands via fixed
//! fractional thresholds of the configured maximum height.

/// Material bucket a tile's geometry is batched into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialBand {
    Stone,
    Dirt,
    Grass,
    Sand,
    Lowland,
}

/// Threshold fractions of `max_height`, tried in descending order.
/// Comparison is strictly greater, so a height exactly at a threshold
/// falls into the band below it.
pub const BAND_THRESHOLDS: [(MaterialBand, f32); 4] = [
    (MaterialBand::Stone, 0.8),
    (MaterialBand::Dirt, 0.7),
    (MaterialBand::Grass, 0.5),
    (MaterialBand::Sand, 0.3),
];

impl MaterialBand {
    pub const ALL: [MaterialBand; 5] = [
        MaterialBand::Stone,
        MaterialBand::Dirt,
        MaterialBand::Grass,
        MaterialBand::Sand,
        MaterialBand::Lowland,
    ];

    /// Selects exactly one band for a height.
    ///
    /// `max_height <= 0` collapses every threshold to the same value; the
    /// policy is that such degenerate worlds are all lowland rather than
    /// whatever comparison order would happen to pick.
    pub fn classify(height: f32, max_height: f32) -> MaterialBand {
        if max_height <= 0.0 {
            return MaterialBand::Lowland;
        }
        for (band, fraction) in BAND_THRESHOLDS {
            if height > max_height * fraction {
                return band;
            }
        }
        MaterialBand::Lowland
    }

    /// Stable index into per-band accumulator arrays.
    pub fn index(self) -> usize {
        match self {
            MaterialBand::Stone => 0,
            MaterialBand::Dirt => 1,
            MaterialBand::Grass => 2,
            MaterialBand::Sand => 3,
            MaterialBand::Lowland => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MaterialBand::Stone => "stone",
            MaterialBand::Dirt => "dirt",
            MaterialBand::Grass => "grass",
            MaterialBand::Sand => "sand",
            MaterialBand::Lowland => "lowland",
        }
    }

    /// Base surface color baked into the band's vertices.
    pub fn color(self) -> [f32; 4] {
        match self {
            MaterialBand::Stone => [0.55, 0.54, 0.52, 1.0],
            MaterialBand::Dirt => [0.45, 0.29, 0.18, 1.0],
            MaterialBand::Grass => [0.33, 0.52, 0.22, 1.0],
            MaterialBand::Sand => [0.78, 0.70, 0.46, 1.0],
            MaterialBand::Lowland => [0.36, 0.22, 0.14, 1.0],
        }
    }
}
