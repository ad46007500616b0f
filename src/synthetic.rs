//! Synthetic wildfire detection generator for stress testing and benchmarking.
//!
//! Generates detection sets made of dense hotspots scattered over a region,
//! which is the shape real satellite detections take during a fire season.
//!
//! Feature-gated behind `synthetic`, so it stays out of production builds.
//!
//! # Example
//!
//! ```rust
//! use firemap::synthetic::FireScenario;
//!
//! let scenario = FireScenario::regional();
//! let detections = scenario.generate();
//! assert_eq!(detections.len(), scenario.detection_count());
//! ```

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{DetectionPoint, LatLng};

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Convert meters to degrees of latitude.
fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

/// Convert meters to degrees of longitude at a given latitude.
fn meters_to_deg_lng(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg_lng = METERS_PER_DEG_LAT * latitude.to_radians().cos();
    if meters_per_deg_lng.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg_lng
}

/// Scenario configuration for generating synthetic detections.
#[derive(Debug, Clone)]
pub struct FireScenario {
    /// Center of the region hotspots are scattered over.
    pub center: LatLng,
    /// Half-width of the region in degrees.
    pub region_half_width_deg: f64,
    /// Number of fires.
    pub hotspot_count: usize,
    /// Detections reported per fire.
    pub detections_per_hotspot: usize,
    /// Standard deviation of detections around a fire center, in meters.
    pub spread_sigma_meters: f64,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

impl FireScenario {
    /// Total number of detections [`generate`](Self::generate) returns.
    pub fn detection_count(&self) -> usize {
        self.hotspot_count * self.detections_per_hotspot
    }

    /// Generate detections. Ids are sequential from 0.
    pub fn generate(&self) -> Vec<DetectionPoint> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut detections = Vec::with_capacity(self.detection_count());

        for _ in 0..self.hotspot_count {
            let lat = (self.center.latitude
                + rng.gen_range(-self.region_half_width_deg..=self.region_half_width_deg))
            .clamp(-85.0, 85.0);
            let lng = (self.center.longitude
                + rng.gen_range(-self.region_half_width_deg..=self.region_half_width_deg))
            .clamp(-180.0, 180.0);
            // Larger fires burn hotter across all their detections.
            let intensity: f64 = rng.gen_range(1.0..50.0);

            for _ in 0..self.detections_per_hotspot {
                // Box-Muller transform for Gaussian spread
                let u1: f64 = rng.gen_range(0.0001..1.0);
                let u2: f64 = rng.gen();
                let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
                let z1 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();

                let d_lat = meters_to_deg_lat(z0 * self.spread_sigma_meters);
                let d_lng = meters_to_deg_lng(z1 * self.spread_sigma_meters, lat);
                let frp = intensity * rng.gen_range(0.2..4.0);

                detections.push(DetectionPoint::new(
                    detections.len() as u64,
                    (lng + d_lng).clamp(-180.0, 180.0),
                    (lat + d_lat).clamp(-90.0, 90.0),
                    frp,
                ));
            }
        }

        detections
    }

    /// A few dozen fires over California.
    pub fn regional() -> Self {
        Self {
            center: LatLng::new(37.0, -120.0),
            region_half_width_deg: 3.0,
            hotspot_count: 40,
            detections_per_hotspot: 25,
            spread_sigma_meters: 1_500.0,
            seed: 42,
        }
    }

    /// A fire season across the continental United States.
    pub fn continental() -> Self {
        Self {
            center: LatLng::new(39.0, -98.0),
            region_half_width_deg: 20.0,
            hotspot_count: 500,
            detections_per_hotspot: 100,
            spread_sigma_meters: 3_000.0,
            seed: 7,
        }
    }

    /// Regional scenario scaled to roughly `count` detections.
    pub fn with_detection_count(count: usize) -> Self {
        let detections_per_hotspot = 25;
        Self {
            hotspot_count: count.div_ceil(detections_per_hotspot).max(1),
            detections_per_hotspot,
            ..Self::regional()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
