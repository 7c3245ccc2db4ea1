mod app_config;

pub use app_config::{AugmentConfig, LoggingConfig, PrepConfig, SplitConfig};
