use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color::ColorScheme;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub wheel: WheelConfig,
    /// Named reference frequencies; empty means the built-in table.
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sink whose monitor is captured (None = default sink)
    pub device: Option<String>,
    /// Full source name, used verbatim; takes precedence over `device`
    pub source: Option<String>,
    pub sample_rate: u32,
    /// Transform window size, power of two
    pub fft_size: usize,
    /// Samples per capture read
    pub block_size: usize,
    /// Temporal smoothing factor (0.0-1.0)
    pub smoothing: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub color_scheme: ColorScheme,
    /// Display ceiling in Hz; bins and markers above it are skipped
    pub max_frequency: f32,
    pub show_grid: bool,
    pub show_labels: bool,
    pub show_markers: bool,
    /// Target frame rate
    pub fps: u32,
}

/// A named reference frequency drawn on the wheel rim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub name: String,
    pub frequency: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            source: None,
            sample_rate: 44100,
            fft_size: 16384,
            block_size: 2048,
            smoothing: 0.8,
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::default(),
            max_frequency: crate::visualizer::radial::MAX_FREQUENCY_HZ,
            show_grid: true,
            show_labels: true,
            show_markers: true,
            fps: 60,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fft_size must be a power of two, got {0}")]
    FftSizeNotPowerOfTwo(usize),
    #[error("smoothing must be within 0.0..1.0, got {0}")]
    SmoothingOutOfRange(f32),
    #[error("max_frequency must be positive, got {0}")]
    BadMaxFrequency(f32),
    #[error("fps must be nonzero")]
    ZeroFps,
    #[error("marker {name:?} has a non-positive frequency {frequency}")]
    BadMarker { name: String, frequency: f32 },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/polarviz/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("polarviz").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists.
    /// Returns None if the file doesn't exist, warns on parse errors.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            match Self::load(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config at {}: {}\nUsing defaults.",
                        path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        }
    }

    /// Initialize a default config file at the XDG path, returns the path.
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template.
    pub fn generate_config_template() -> String {
        r#"# polarviz Configuration
# This file is auto-generated. Edit as needed.

[audio]
# Sink whose monitor is captured (omit for the default sink)
# device = "alsa_output.pci-0000_00_1f.3.analog-stereo"
# Full source name, used verbatim (takes precedence over device)
# source = "alsa_input.usb-mic.mono-fallback"
# Sample rate in Hz
sample_rate = 44100
# Transform window size, must be a power of two.
# Larger sizes give finer frequency resolution.
fft_size = 16384
# Samples per capture read
block_size = 2048
# Temporal smoothing factor (0.0-1.0, higher = smoother)
smoothing = 0.8

[wheel]
# Color scheme: "ion", "spectrum", "fire", "aurora", "monochrome"
color_scheme = "ion"
# Display ceiling in Hz; bins and markers above it are skipped
max_frequency = 330000.0
# Background grid (concentric circles and spokes)
show_grid = true
# Frequency-axis labels around the rim
show_labels = true
# Named reference-frequency markers
show_markers = true
# Target frame rate
fps = 60

# Named reference frequencies (omit to use the built-in table):
# [[markers]]
# name = "A4"
# frequency = 440.0
#
# [[markers]]
# name = "Mains hum"
# frequency = 50.0
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority).
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(ref device) = args.device {
            self.audio.device = Some(device.clone());
        }
        if let Some(ref source) = args.source {
            self.audio.source = Some(source.clone());
        }
        if let Some(rate) = args.sample_rate {
            self.audio.sample_rate = rate;
        }
        if let Some(size) = args.fft_size {
            self.audio.fft_size = size;
        }
        if let Some(smoothing) = args.smoothing {
            self.audio.smoothing = smoothing;
        }

        if let Some(scheme) = args.colors {
            self.wheel.color_scheme = scheme;
        }
        if let Some(max) = args.max_frequency {
            self.wheel.max_frequency = max;
        }
        if let Some(fps) = args.fps {
            self.wheel.fps = fps;
        }
        if args.no_grid {
            self.wheel.show_grid = false;
        }
        if args.no_labels {
            self.wheel.show_labels = false;
        }
        if args.no_markers {
            self.wheel.show_markers = false;
        }
    }

    /// Validate the merged configuration before anything touches audio.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.audio.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSizeNotPowerOfTwo(self.audio.fft_size));
        }
        if !(0.0..1.0).contains(&self.audio.smoothing) {
            return Err(ConfigError::SmoothingOutOfRange(self.audio.smoothing));
        }
        if self.wheel.max_frequency <= 0.0 {
            return Err(ConfigError::BadMaxFrequency(self.wheel.max_frequency));
        }
        if self.wheel.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        for marker in &self.markers {
            if marker.frequency <= 0.0 {
                return Err(ConfigError::BadMarker {
                    name: marker.name.clone(),
                    frequency: marker.frequency,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_back_to_defaults() {
        let config: Config = toml::from_str(&Config::generate_config_template()).unwrap();
        assert_eq!(config.audio.fft_size, 16384);
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.wheel.max_frequency, 330_000.0);
        assert!(config.markers.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn fft_size_must_be_power_of_two() {
        let mut config = Config::default();
        config.audio.fft_size = 10000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FftSizeNotPowerOfTwo(10000))
        ));
    }

    #[test]
    fn marker_table_overrides_parse() {
        let config: Config = toml::from_str(
            r#"
            [[markers]]
            name = "A4"
            frequency = 440.0
            "#,
        )
        .unwrap();
        assert_eq!(
            config.markers,
            vec![Marker {
                name: "A4".into(),
                frequency: 440.0
            }]
        );
    }

    #[test]
    fn bad_marker_is_rejected() {
        let mut config = Config::default();
        config.markers.push(Marker {
            name: "broken".into(),
            frequency: -5.0,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadMarker { .. })
        ));
    }
}
