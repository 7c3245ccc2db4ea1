use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{PrepError, PrepResult};

const RATIO_TOLERANCE: f64 = 1e-6;

/// Ratios and seed for the train/val/test split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train_ratio: f64,
    pub val_ratio: f64,
    pub test_ratio: f64,
    /// Seed for the shuffle, keeps the split stable between runs
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_ratio: 0.70,
            val_ratio: 0.15,
            test_ratio: 0.15,
            seed: 42,
        }
    }
}

/// Settings for the fixed augmentation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Every image is resized to this size before any transform
    pub image_width: u32,
    pub image_height: u32,
    /// Standard deviation of the additive Gaussian noise, in 0..255 units
    pub noise_std: f64,
    /// Seed for the per-image noise seeds
    pub seed: u64,
    pub jpeg_quality: u8,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            image_width: 224,
            image_height: 224,
            noise_std: 15.0,
            seed: 42,
            jpeg_quality: 95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    pub level: String,
    /// Directory for log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Configuration shared by every subcommand.
///
/// Loaded from JSON; missing fields take their default values so a config
/// file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Extensions (lowercase, without dot) treated as images
    pub image_extensions: Vec<String>,
    pub split: SplitConfig,
    pub augment: AugmentConfig,
    pub logging: LoggingConfig,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            image_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            split: SplitConfig::default(),
            augment: AugmentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PrepConfig {
    /// Default config file location in the platform config directory
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "anicla-dataset-prep")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried and any problem there falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> PrepResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(PrepError::PathNotFound(path.to_path_buf()));
            }
            let config = Self::from_file(path)?;
            info!("Loaded configuration from: {:?}", path);
            return Ok(config);
        }

        let Some(config_path) = Self::default_config_path() else {
            warn!("Could not determine config directory. Using defaults.");
            return Ok(Self::default());
        };
        Ok(Self::load_or_default(&config_path))
    }

    /// Read `path`, falling back to defaults when it is absent or broken
    pub(crate) fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<PrepConfig>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from: {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read config file: {}. Using defaults.", e);
                }
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> PrepResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> PrepResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Configuration saved to: {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> PrepResult<()> {
        let split = &self.split;
        for (name, ratio) in [
            ("train_ratio", split.train_ratio),
            ("val_ratio", split.val_ratio),
            ("test_ratio", split.test_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(PrepError::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, ratio
                )));
            }
        }

        let sum = split.train_ratio + split.val_ratio + split.test_ratio;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(PrepError::Config(format!(
                "split ratios must sum to 1.0, got {:.6}",
                sum
            )));
        }

        let augment = &self.augment;
        if augment.image_width == 0 || augment.image_height == 0 {
            return Err(PrepError::Config(
                "image size must be non-zero".to_string(),
            ));
        }
        if !(1..=100).contains(&augment.jpeg_quality) {
            return Err(PrepError::Config(format!(
                "jpeg_quality must be in 1..=100, got {}",
                augment.jpeg_quality
            )));
        }
        if !(augment.noise_std >= 0.0) {
            return Err(PrepError::Config(format!(
                "noise_std must be non-negative, got {}",
                augment.noise_std
            )));
        }

        if self.image_extensions.is_empty() {
            return Err(PrepError::Config(
                "at least one image extension is required".to_string(),
            ));
        }

        Ok(())
    }
}
