pub mod commands;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::thread;
use tracing::{info, info_span};

use crate::charts::{write_svg_into, Chart};
use crate::config::PrepConfig;
use crate::core::analysis::{count_per_class, count_per_split};
use crate::core::augment::{
    augment_dataset_with_progress, format_thousands, write_stats_report, AugmentProgressMessage,
};
use crate::core::dataset::DatasetSplit;
use crate::core::operations::ensure_dir;
use crate::core::split::{split_charts, split_dataset, write_split_manifest};
use crate::ui;

use commands::{AugmentArgs, CheckArgs, Commands, ConfigCommand, CountArgs, SplitArgs};

#[derive(Parser, Debug)]
#[command(
    name = "anicla-dataset-prep",
    version,
    about = "Prepare an image classification dataset: split, augment, count and check."
)]
pub struct Cli {
    /// Configuration file (must exist when given)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command-line overrides to the loaded configuration
    pub fn apply_overrides(&self, config: &mut PrepConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.logging.log_dir = Some(dir.clone());
        }
        match &self.command {
            Commands::Split(args) => args.apply_to(config),
            Commands::Augment(args) => args.apply_to(config),
            _ => {}
        }
    }

    pub fn run(self, config: PrepConfig) -> Result<()> {
        if !matches!(self.command, Commands::Config(_)) {
            config.validate().context("invalid configuration")?;
        }

        let span = match &self.command {
            Commands::Split(_) => info_span!("split"),
            Commands::Augment(_) => info_span!("augment"),
            Commands::Count(_) => info_span!("count"),
            Commands::Check(_) => info_span!("check"),
            Commands::Config(_) => info_span!("config"),
        };
        let _entered = span.entered();

        match self.command {
            Commands::Split(args) => run_split(&args, &config),
            Commands::Augment(args) => run_augment(&args, &config),
            Commands::Count(args) => run_count(&args, &config),
            Commands::Check(args) => run_check(&args, &config),
            Commands::Config(cmd) => run_config(cmd, &config),
        }
    }
}

fn write_charts(charts: &[Chart], dir: &Path) -> Result<()> {
    ensure_dir(dir)?;
    for chart in charts {
        let path = write_svg_into(chart, dir)
            .with_context(|| format!("failed to write chart {}", chart.file_stem))?;
        println!("Chart saved: {}", path.display());
    }
    Ok(())
}

fn finish_charts(charts: Vec<Chart>, dir: &Path, show: bool) -> Result<()> {
    write_charts(&charts, dir)?;
    if show {
        ui::show_charts(charts).context("chart viewer failed")?;
    }
    Ok(())
}

fn run_split(args: &SplitArgs, config: &PrepConfig) -> Result<()> {
    let summary = split_dataset(&args.input, &args.output, &config.split, &config.image_extensions)
        .with_context(|| format!("failed to split {}", args.input.display()))?;

    write_split_manifest(&summary, &args.output.join("split_summary.json"))?;

    for split in DatasetSplit::all() {
        let label = match split {
            DatasetSplit::Train => "Training",
            DatasetSplit::Val => "Validation",
            DatasetSplit::Test => "Test",
        };
        println!("{} set: {} images", label, summary.totals.get(split));
    }

    finish_charts(split_charts(&summary), &args.output, args.show)
}

fn progress_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{msg:>16} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
        .progress_chars("#>-"))
}

fn run_augment(args: &AugmentArgs, config: &PrepConfig) -> Result<()> {
    let (tx, rx) = channel::<AugmentProgressMessage>();

    let input = args.input.clone();
    let output = args.output.clone();
    let augment_config = config.augment.clone();
    let extensions = config.image_extensions.clone();
    let worker = thread::spawn(move || {
        augment_dataset_with_progress(&input, &output, &augment_config, &extensions, Some(tx))
    });

    let style = progress_style()?;
    let bars = MultiProgress::new();
    let mut current: Option<ProgressBar> = None;

    for message in rx {
        match message {
            AugmentProgressMessage::ClassStarted { class_name, total } => {
                if let Some(bar) = current.take() {
                    bar.finish();
                }
                let bar = bars.add(ProgressBar::new(total as u64));
                bar.set_style(style.clone());
                bar.set_message(class_name);
                current = Some(bar);
            }
            AugmentProgressMessage::Progress { current: done, .. } => {
                if let Some(bar) = &current {
                    bar.set_position(done as u64);
                }
            }
            AugmentProgressMessage::Complete(_) => {
                if let Some(bar) = current.take() {
                    bar.finish();
                }
            }
        }
    }

    let stats = match worker.join() {
        Ok(result) => result.with_context(|| format!("failed to augment {}", args.input.display()))?,
        Err(_) => bail!("augmentation worker panicked"),
    };

    let report_dir = args.report_dir.clone().unwrap_or_else(|| args.output.clone());
    ensure_dir(&report_dir)?;
    write_stats_report(&stats, &report_dir.join("augment_stats.txt"))?;

    println!("Augmentation complete");
    for (kind, count) in stats.iter() {
        println!("{}: {}", kind.key(), count);
    }
    println!("Total: {} images", format_thousands(stats.total()));
    if stats.skipped > 0 {
        println!("Skipped (unreadable): {}", stats.skipped);
    }

    finish_charts(vec![stats.histogram()], &report_dir, args.show)
}

fn run_count(args: &CountArgs, config: &PrepConfig) -> Result<()> {
    let distribution = count_per_class(&args.input, &config.image_extensions)
        .with_context(|| format!("failed to count {}", args.input.display()))?;

    for (class_name, count) in &distribution.classes {
        println!("{}: {}", class_name, count);
    }

    finish_charts(
        vec![distribution.piechart(), distribution.histogram()],
        &args.output,
        args.show,
    )
}

fn run_check(args: &CheckArgs, config: &PrepConfig) -> Result<()> {
    let distribution = count_per_split(&args.input, &config.image_extensions)
        .with_context(|| format!("failed to check {}", args.input.display()))?;

    for split in DatasetSplit::all() {
        if distribution.missing.contains(&split) {
            println!("{}: not found", split.display_name());
        } else {
            println!(
                "{}: {} images",
                split.display_name(),
                distribution.split_total(split)
            );
        }
    }

    finish_charts(vec![distribution.stacked_bar()], &args.output, args.show)
}

fn run_config(cmd: ConfigCommand, config: &PrepConfig) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommand::Init { path } => {
            let target = match path {
                Some(path) => path,
                None => PrepConfig::default_config_path()
                    .context("could not determine the platform config directory")?,
            };
            PrepConfig::default()
                .save(&target)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!("Default configuration written");
            println!("Configuration written to {}", target.display());
        }
    }
    Ok(())
}
