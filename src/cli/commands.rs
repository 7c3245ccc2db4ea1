use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::PrepConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a class-per-directory dataset into train/val/test
    Split(SplitArgs),

    /// Write nine augmented variants of every image
    Augment(AugmentArgs),

    /// Count images per class and chart the distribution
    Count(CountArgs),

    /// Chart the class distribution of an already split dataset
    Check(CheckArgs),

    /// Show or initialise the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Dataset root with one directory per class
    pub input: PathBuf,

    /// Destination for the train/val/test tree
    pub output: PathBuf,

    #[arg(long)]
    pub train_ratio: Option<f64>,

    #[arg(long)]
    pub val_ratio: Option<f64>,

    #[arg(long)]
    pub test_ratio: Option<f64>,

    /// Shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Open the charts in a window after writing them
    #[arg(long)]
    pub show: bool,
}

impl SplitArgs {
    pub fn apply_to(&self, config: &mut PrepConfig) {
        if let Some(r) = self.train_ratio {
            config.split.train_ratio = r;
        }
        if let Some(r) = self.val_ratio {
            config.split.val_ratio = r;
        }
        if let Some(r) = self.test_ratio {
            config.split.test_ratio = r;
        }
        if let Some(seed) = self.seed {
            config.split.seed = seed;
        }
    }
}

#[derive(Args, Debug)]
pub struct AugmentArgs {
    /// Training images, one directory per class
    pub input: PathBuf,

    /// Destination for the augmented images
    pub output: PathBuf,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Standard deviation of the Gaussian noise variant
    #[arg(long)]
    pub noise_std: Option<f64>,

    /// Seed for the noise variant
    #[arg(long)]
    pub seed: Option<u64>,

    /// JPEG quality, 1-100
    #[arg(long)]
    pub quality: Option<u8>,

    /// Where augment_stats.txt and histogram.svg go (defaults to the output directory)
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    #[arg(long)]
    pub show: bool,
}

impl AugmentArgs {
    pub fn apply_to(&self, config: &mut PrepConfig) {
        let augment = &mut config.augment;
        if let Some(w) = self.width {
            augment.image_width = w;
        }
        if let Some(h) = self.height {
            augment.image_height = h;
        }
        if let Some(std) = self.noise_std {
            augment.noise_std = std;
        }
        if let Some(seed) = self.seed {
            augment.seed = seed;
        }
        if let Some(q) = self.quality {
            augment.jpeg_quality = q;
        }
    }
}

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Dataset root with one directory per class
    pub input: PathBuf,

    /// Where the chart files are written
    #[arg(long, default_value = ".")]
    pub output: PathBuf,

    #[arg(long)]
    pub show: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Root containing train/, val/ and test/
    pub input: PathBuf,

    /// Where the chart file is written
    #[arg(long, default_value = ".")]
    pub output: PathBuf,

    #[arg(long)]
    pub show: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON
    Show,

    /// Write the default configuration
    Init {
        /// Target file (defaults to the platform config location)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}
