//! Simulation configuration
//!
//! Every tunable constant of the engine lives in [`SimConfig`], which is built
//! once and handed to the engine at construction. Defaults reproduce the
//! reference scenario; a TOML file can override any subset of fields.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::types::{LaneSide, Position, Rect, RoadId};

/// How vehicles observe each other within a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VehicleOrdering {
    /// Every vehicle plans against the pre-tick state, then all plans are applied
    #[default]
    Snapshot,
    /// Vehicles are updated one after another in spawn order, each seeing
    /// the already-moved vehicles before it
    Sequential,
}

/// Per-road demand parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadConfig {
    /// Probability in [0, 1] of a spawn attempt succeeding on one tick
    pub traffic_intensity: f32,
    /// Waiting vehicles on this (red) road needed to request green early
    pub queue_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub road_width: f32,

    /// Vehicle extent along its travel axis, in pixels
    pub vehicle_length: f32,
    /// Vehicle extent across its travel axis, in pixels
    pub vehicle_breadth: f32,
    pub vehicle_velocity_mps: f32,
    pub pixels_per_meter: f32,

    /// Virtual seconds per real second
    pub speed_factor: f32,
    /// Frames per real second for headless runs
    pub fps: f32,

    pub min_green_secs: f32,
    pub max_green_secs: f32,
    pub both_red_secs: f32,

    pub min_following_gap_m: f32,
    pub spawn_gap_m: f32,
    /// Band behind the stop line, in pixels, where a red light holds a vehicle
    pub stop_line_tolerance_px: f32,

    pub vertical: RoadConfig,
    pub horizontal: RoadConfig,

    pub ordering: VehicleOrdering,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            road_width: 160.0,
            vehicle_length: 80.0,
            vehicle_breadth: 60.0,
            vehicle_velocity_mps: 11.11,
            pixels_per_meter: 10.0,
            speed_factor: 3.0,
            fps: 20.0,
            min_green_secs: 5.0,
            max_green_secs: 10.0,
            both_red_secs: 1.0,
            min_following_gap_m: 1.0,
            spawn_gap_m: 0.5,
            stop_line_tolerance_px: 3.0,
            vertical: RoadConfig {
                traffic_intensity: 0.05,
                queue_threshold: 4,
            },
            horizontal: RoadConfig {
                traffic_intensity: 0.05,
                queue_threshold: 7,
            },
            ordering: VehicleOrdering::Snapshot,
        }
    }
}

impl SimConfig {
    /// Load a configuration from a TOML file; missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for road in RoadId::ALL {
            let intensity = self.road(road).traffic_intensity;
            if !(0.0..=1.0).contains(&intensity) {
                bail!("{road:?} traffic intensity must be in [0, 1], got {intensity}");
            }
        }

        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("road_width", self.road_width),
            ("vehicle_length", self.vehicle_length),
            ("vehicle_breadth", self.vehicle_breadth),
            ("vehicle_velocity_mps", self.vehicle_velocity_mps),
            ("pixels_per_meter", self.pixels_per_meter),
            ("speed_factor", self.speed_factor),
            ("fps", self.fps),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                bail!("{name} must be positive, got {value}");
            }
        }

        let non_negative = [
            ("min_green_secs", self.min_green_secs),
            ("max_green_secs", self.max_green_secs),
            ("both_red_secs", self.both_red_secs),
            ("min_following_gap_m", self.min_following_gap_m),
            ("spawn_gap_m", self.spawn_gap_m),
            ("stop_line_tolerance_px", self.stop_line_tolerance_px),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                bail!("{name} must not be negative, got {value}");
            }
        }

        if self.max_green_secs < self.min_green_secs {
            bail!(
                "max_green_secs ({}) must not be shorter than min_green_secs ({})",
                self.max_green_secs,
                self.min_green_secs
            );
        }

        Ok(())
    }

    /// Number of fixed frames covering `duration` real seconds at `fps`
    pub fn frame_count(&self, duration: f32) -> u64 {
        (duration * self.fps).ceil().max(0.0) as u64
    }

    pub fn road(&self, road: RoadId) -> &RoadConfig {
        match road {
            RoadId::Vertical => &self.vertical,
            RoadId::Horizontal => &self.horizontal,
        }
    }

    pub fn min_following_gap_px(&self) -> f32 {
        self.min_following_gap_m * self.pixels_per_meter
    }

    pub fn spawn_gap_px(&self) -> f32 {
        self.spawn_gap_m * self.pixels_per_meter
    }

    /// Vehicle `(width, height)` on a road; length lies along the travel axis
    pub fn vehicle_size(&self, road: RoadId) -> (f32, f32) {
        match road {
            RoadId::Vertical => (self.vehicle_breadth, self.vehicle_length),
            RoadId::Horizontal => (self.vehicle_length, self.vehicle_breadth),
        }
    }

    /// Travel-axis coordinate where a red light stops the front of a vehicle
    pub fn stop_line(&self, road: RoadId) -> f32 {
        match road {
            RoadId::Vertical => self.screen_height / 2.0 + self.road_width / 2.0,
            RoadId::Horizontal => self.screen_width / 2.0 + self.road_width / 2.0,
        }
    }

    /// Top-left corner of a freshly spawned vehicle in a lane
    pub fn lane_entry(&self, road: RoadId, side: LaneSide) -> Position {
        let quarter = self.road_width / 4.0;
        let half_breadth = self.vehicle_breadth / 2.0;
        match (road, side) {
            (RoadId::Vertical, LaneSide::Left) => Position::new(
                self.screen_width / 2.0 - quarter - half_breadth,
                self.screen_height,
            ),
            (RoadId::Vertical, LaneSide::Right) => Position::new(
                self.screen_width / 2.0 + quarter - half_breadth,
                self.screen_height,
            ),
            (RoadId::Horizontal, LaneSide::Left) => Position::new(
                self.screen_width,
                self.screen_height / 2.0 + quarter - half_breadth,
            ),
            (RoadId::Horizontal, LaneSide::Right) => Position::new(
                self.screen_width,
                self.screen_height / 2.0 - quarter - half_breadth,
            ),
        }
    }

    /// Area a spawn in this lane must find free, spawn gap included
    pub fn spawn_rect(&self, road: RoadId, side: LaneSide) -> Rect {
        let (width, height) = self.vehicle_size(road);
        Rect::at(self.lane_entry(road, side), width, height).inflate(self.spawn_gap_px())
    }

    /// Drawable extent of a road band across the whole screen
    pub fn road_rect(&self, road: RoadId) -> Rect {
        match road {
            RoadId::Vertical => Rect::new(
                (self.screen_width - self.road_width) / 2.0,
                0.0,
                self.road_width,
                self.screen_height,
            ),
            RoadId::Horizontal => Rect::new(
                0.0,
                (self.screen_height - self.road_width) / 2.0,
                self.screen_width,
                self.road_width,
            ),
        }
    }

    /// The square where the two roads overlap
    pub fn intersection_rect(&self) -> Rect {
        Rect::new(
            (self.screen_width - self.road_width) / 2.0,
            (self.screen_height - self.road_width) / 2.0,
            self.road_width,
            self.road_width,
        )
    }
}
