use std::path::Path;
use tracing::{info, warn};

use crate::charts::{Chart, ChartColor, Series};
use crate::core::dataset::{count_images, list_class_dirs, DatasetSplit};
use crate::error::PrepResult;

/// Image count per class of a flat class tree, in sorted class order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDistribution {
    pub classes: Vec<(String, usize)>,
}

impl ClassDistribution {
    pub fn total(&self) -> usize {
        self.classes.iter().map(|(_, n)| n).sum()
    }

    pub fn count(&self, class_name: &str) -> Option<usize> {
        self.classes
            .iter()
            .find(|(name, _)| name == class_name)
            .map(|(_, n)| *n)
    }

    /// Share of `class_name` in percent, `None` for unknown classes or an empty tree
    pub fn percentage(&self, class_name: &str) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        self.count(class_name)
            .map(|n| n as f64 * 100.0 / total as f64)
    }

    fn labels_and_values(&self) -> (Vec<String>, Vec<f64>) {
        self.classes
            .iter()
            .map(|(name, n)| (name.clone(), *n as f64))
            .unzip()
    }

    pub fn piechart(&self) -> Chart {
        let (labels, values) = self.labels_and_values();
        Chart::pie("Image distribution per class", labels, values)
            .with_start_angle(90.0)
            .named("class_piechart")
    }

    pub fn histogram(&self) -> Chart {
        let (labels, values) = self.labels_and_values();
        Chart::bar(
            "Number of images per class",
            "Class",
            "Number of images",
            labels,
            values,
            ChartColor::SKY_BLUE,
        )
        .named("class_histogram")
    }
}

/// Per-split class counts of a `train/val/test` tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitDistribution {
    /// Sorted union of the classes found in any split
    pub classes: Vec<String>,
    train: Vec<usize>,
    val: Vec<usize>,
    test: Vec<usize>,
    /// Splits whose directory was missing
    pub missing: Vec<DatasetSplit>,
}

impl SplitDistribution {
    /// Counts aligned with `classes`; absent classes report 0
    pub fn counts(&self, split: DatasetSplit) -> &[usize] {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Val => &self.val,
            DatasetSplit::Test => &self.test,
        }
    }

    pub fn split_total(&self, split: DatasetSplit) -> usize {
        self.counts(split).iter().sum()
    }

    /// Train at the bottom, then Val, then Test
    pub fn stacked_bar(&self) -> Chart {
        let values = |split: DatasetSplit| -> Vec<f64> {
            self.counts(split).iter().map(|n| *n as f64).collect()
        };
        Chart::stacked_bar(
            "Images per class in Train / Val / Test",
            "Class",
            "Number of images",
            self.classes.clone(),
            vec![
                Series::new("Train", ChartColor::STEEL_BLUE, values(DatasetSplit::Train)),
                Series::new("Val", ChartColor::ORANGE, values(DatasetSplit::Val)),
                Series::new("Test", ChartColor::GREEN, values(DatasetSplit::Test)),
            ],
        )
        .named("split_stacked_bar")
    }
}

/// Count the images directly inside each class directory of `root`
pub fn count_per_class(root: &Path, extensions: &[String]) -> PrepResult<ClassDistribution> {
    let classes = list_class_dirs(root)?
        .into_iter()
        .map(|(name, path)| {
            let n = count_images(&path, extensions)?;
            Ok((name, n))
        })
        .collect::<PrepResult<Vec<_>>>()?;

    let distribution = ClassDistribution { classes };
    info!(
        "Counted {} images in {} classes under {:?}",
        distribution.total(),
        distribution.classes.len(),
        root
    );
    Ok(distribution)
}

/// Count images per class for each of `root/{train,val,test}`.
///
/// A missing split is logged and left out; its counts are all 0.
pub fn count_per_split(root: &Path, extensions: &[String]) -> PrepResult<SplitDistribution> {
    let mut per_split: Vec<(DatasetSplit, ClassDistribution)> = Vec::new();
    let mut missing = Vec::new();

    for split in DatasetSplit::all() {
        let split_dir = root.join(split.as_str());
        if !split_dir.is_dir() {
            warn!("{} directory not found, skipping: {:?}", split.display_name(), split_dir);
            missing.push(split);
            continue;
        }
        per_split.push((split, count_per_class(&split_dir, extensions)?));
    }

    let mut classes: Vec<String> = per_split
        .iter()
        .flat_map(|(_, dist)| dist.classes.iter().map(|(name, _)| name.clone()))
        .collect();
    classes.sort();
    classes.dedup();

    let aligned = |split: DatasetSplit| -> Vec<usize> {
        let dist = per_split.iter().find(|(s, _)| *s == split).map(|(_, d)| d);
        classes
            .iter()
            .map(|name| dist.and_then(|d| d.count(name)).unwrap_or(0))
            .collect()
    };

    Ok(SplitDistribution {
        train: aligned(DatasetSplit::Train),
        val: aligned(DatasetSplit::Val),
        test: aligned(DatasetSplit::Test),
        classes,
        missing,
    })
}
