//! Run-loop settings and preferences
//!
//! Read from environment variables at startup; never persisted.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum particles drawn per frame for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Whether to render the scrolling starfield
    pub fn starfield_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset '{other}'")),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Show FPS counter in the HUD
    pub show_fps: bool,
    /// Frames per second the run loop aims for
    pub target_fps: u32,
    /// Session seed (random when unset)
    pub seed: Option<u64>,
    /// Optional JSON tuning override
    pub tuning_path: Option<PathBuf>,
    /// Run this many frames without a terminal and print the final snapshot
    pub headless_frames: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            show_fps: true,
            target_fps: TARGET_FPS,
            seed: None,
            tuning_path: None,
            headless_frames: None,
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(quality) = lookup("SHOOTER_QUALITY") {
            match quality.parse() {
                Ok(parsed) => settings.quality = parsed,
                Err(e) => log::warn!("{e}, using {}", settings.quality.as_str()),
            }
        }

        if let Some(fps) = lookup("SHOOTER_FPS") {
            match fps.parse::<u32>() {
                Ok(parsed) if (10..=240).contains(&parsed) => settings.target_fps = parsed,
                _ => log::warn!("SHOOTER_FPS must be 10-240, got '{fps}', using default"),
            }
        }

        if let Some(seed) = lookup("SHOOTER_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => settings.seed = Some(parsed),
                Err(_) => log::warn!("Invalid SHOOTER_SEED '{seed}', using a random seed"),
            }
        }

        if let Some(path) = lookup("SHOOTER_TUNING") {
            settings.tuning_path = Some(PathBuf::from(path));
        }

        if let Some(frames) = lookup("SHOOTER_HEADLESS_FRAMES") {
            match frames.parse::<u32>() {
                Ok(parsed) if parsed > 0 => settings.headless_frames = Some(parsed),
                _ => log::warn!("Invalid SHOOTER_HEADLESS_FRAMES '{frames}', ignoring"),
            }
        }

        if let Some(show) = lookup("SHOOTER_SHOW_FPS") {
            match show.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => settings.show_fps = true,
                "0" | "false" | "no" | "off" => settings.show_fps = false,
                _ => log::warn!("Invalid SHOOTER_SHOW_FPS '{show}', ignoring"),
            }
        }

        settings
    }

    /// Nominal seconds per frame
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps as f32
    }
}
