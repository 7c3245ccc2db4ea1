use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::error::PrepResult;

/// Build the default filter: our crate at `level`, noisy viewer crates at warn.
fn default_filter(level: &str) -> EnvFilter {
    let mut filter = EnvFilter::new(level);
    for directive in ["winit=warn", "log=warn", "egui=warn", "eframe=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Run `f` under a temporary subscriber writing to `make_writer`.
///
/// Used for work that happens before [`setup_logging`] can run, such as
/// loading the configuration that decides where logs go.
pub fn with_bootstrap_logging<T, W>(level: &str, make_writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .event_format(BracketedFormatter)
        .with_writer(make_writer)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// Install the global subscriber.
///
/// Always logs to stdout. When `log_dir` is given, a timestamped log file is
/// created there as well and its path is returned.
pub fn setup_logging(level: &str, log_dir: Option<&Path>) -> PrepResult<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stdout);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;

            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let log_path = dir.join(format!("dataset_prep_{}.log", timestamp));

            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)?;

            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepConfig;
    use crate::logging::capture::CapturedLog;

    #[test]
    fn test_bootstrap_logging_keeps_config_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let log = CapturedLog::default();
        let writer = log.clone();
        let config = with_bootstrap_logging("info", move || writer.clone(), || {
            PrepConfig::load_or_default(&path)
        });

        assert_eq!(config, PrepConfig::default());
        let output = log.contents();
        assert!(output.contains("[WARN ]"), "{}", output);
        assert!(output.contains("Failed to parse config file"), "{}", output);
    }

    #[test]
    fn test_bootstrap_logging_respects_level() {
        let log = CapturedLog::default();
        let writer = log.clone();
        with_bootstrap_logging("warn", move || writer.clone(), || {
            info!("hidden");
            tracing::warn!("shown");
        });

        let output = log.contents();
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(!output.contains("hidden"));
        }
        assert!(output.contains("shown"));
    }
}
