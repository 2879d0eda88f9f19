//! Hexland Library
//!
//! Procedural hexagonal-tile terrain: seeded noise heights, material-band
//! classification, per-band mesh batching with decoration scatter, and
//! drifting clouds recycled at the world bound. The viewer binary hosts
//! the output in a wgpu scene.
//!
//! # Pipeline
//!
//! - [`grid`] - enumerates tile coordinates and hex-packed positions
//! - [`noise`] - seeded value noise feeding column heights
//! - [`classify`] - height -> material band thresholds
//! - [`batch`] - per-band geometry accumulation and scatter
//! - [`terrain`] - the synchronous generation pass tying it together
//! - [`clouds`] - independent sky decoration with one-in-one-out recycling
//! - [`lighting`] - day/night presets consumed by the viewer
//!
//! # Example
//!
//! ```
//! use hexland::{Terrain, WorldConfig};
//!
//! let config = WorldConfig::default();
//! let terrain = Terrain::generate(&config, 42).expect("valid config");
//! assert_eq!(terrain.bands.len(), 5);
//! ```

pub mod batch;
pub mod classify;
pub mod clouds;
pub mod config;
pub mod decorations;
pub mod grid;
pub mod lighting;
pub mod mesh;
pub mod noise;
pub mod terrain;

pub use batch::{BandBatch, ScatterConfig, TerrainBuildContext};
pub use classify::MaterialBand;
pub use clouds::CloudField;
pub use config::{ConfigError, WorldConfig, WorldShape};
pub use grid::{TileCoord, tile_to_position, tiles};
pub use lighting::{Lighting, LightingParams};
pub use mesh::{Mesh, Vertex};
pub use noise::TerrainNoise;
pub use terrain::{Terrain, height_from_noise};
