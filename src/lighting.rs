//! Day/Night Lighting
//!
//! Two lighting presets toggled from the viewer, plus a user intensity
//! scale normalized against each preset's defaults (1.0 = the preset as
//! authored).

use glam::Vec3;

/// Resolved lighting inputs for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingParams {
    pub sun_direction: Vec3,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    pub ambient: f32,
    pub sky_horizon: Vec3,
    pub sky_zenith: Vec3,
    pub fog_density: f32,
}

impl LightingParams {
    /// Midday preset: warm sun from the upper-right, blue sky.
    pub fn day() -> Self {
        Self {
            sun_direction: Vec3::new(0.4, 0.8, 0.3).normalize(),
            sun_color: Vec3::new(1.0, 0.97, 0.90),
            sun_intensity: 1.0,
            ambient: 0.35,
            sky_horizon: Vec3::new(0.65, 0.78, 0.95),
            sky_zenith: Vec3::new(0.28, 0.48, 0.88),
            fog_density: 0.006,
        }
    }

    /// Night preset: dim cool moonlight, near-black sky.
    pub fn night() -> Self {
        Self {
            sun_direction: Vec3::new(-0.3, 0.6, 0.2).normalize(),
            sun_color: Vec3::new(0.55, 0.62, 0.90),
            sun_intensity: 0.15,
            ambient: 0.08,
            sky_horizon: Vec3::new(0.05, 0.06, 0.12),
            sky_zenith: Vec3::new(0.01, 0.01, 0.04),
            fog_density: 0.010,
        }
    }
}

/// Lighting control state held by the viewer.
#[derive(Clone, Copy, Debug)]
pub struct Lighting {
    pub night: bool,
    /// Scale on the active preset's sun and ambient intensity.
    pub intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            night: false,
            intensity: 1.0,
        }
    }
}

impl Lighting {
    pub fn toggle(&mut self) {
        self.night = !self.night;
    }

    pub fn scale_intensity(&mut self, factor: f32) {
        self.intensity = (self.intensity * factor).clamp(0.1, 4.0);
    }

    /// Resolves the active preset with the intensity scale applied.
    pub fn params(&self) -> LightingParams {
        let mut params = if self.night {
            LightingParams::night()
        } else {
            LightingParams::day()
        };
        params.sun_intensity *= self.intensity;
        params.ambient *= self.intensity;
        params
    }
}
