use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

use super::augmenter::AugmentKind;
use crate::charts::{Chart, ChartColor};
use crate::error::PrepResult;

/// Running count of written images per variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentStats {
    counts: [usize; AugmentKind::COUNT],
    /// Inputs that could not be decoded
    pub skipped: usize,
}

impl AugmentStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: AugmentKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn count(&self, kind: AugmentKind) -> usize {
        self.counts[kind.index()]
    }

    /// Counts in variant order
    pub fn iter(&self) -> impl Iterator<Item = (AugmentKind, usize)> + '_ {
        AugmentKind::ALL.iter().map(|kind| (*kind, self.count(*kind)))
    }

    /// Total images written, all variants included
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Text of `augment_stats.txt`
    pub fn report_text(&self) -> String {
        let mut text = String::from("AUGMENTATION SUMMARY\n");
        for (kind, count) in self.iter() {
            let _ = writeln!(text, "{}: {}", kind.key(), count);
        }
        let _ = writeln!(text, "\nTotal: {} images", format_thousands(self.total()));
        text
    }

    /// Bar chart of the per-variant counts
    pub fn histogram(&self) -> Chart {
        let (labels, values) = self
            .iter()
            .map(|(kind, count)| (kind.key().to_string(), count as f64))
            .unzip();
        Chart::bar(
            "Histogram - Data Augmentation Summary",
            "Augmentation Type",
            "Number of Images",
            labels,
            values,
            ChartColor::SKY_BLUE,
        )
        .named("histogram")
    }
}

pub fn write_stats_report(stats: &AugmentStats, path: &Path) -> PrepResult<()> {
    fs::write(path, stats.report_text())?;
    info!("Augmentation stats written to: {:?}", path);
    Ok(())
}

/// Format with `,` between groups of three digits
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
