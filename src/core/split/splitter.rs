//! Seeded train/val/test split of a class-per-directory image dataset.
//!
//! Every class is shuffled with one RNG shared across the whole run and cut
//! into three consecutive runs by ratio. The test partition takes whatever
//! the floored train and val sizes leave over.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, info_span};

use crate::charts::{Chart, ChartColor, Series};
use crate::config::SplitConfig;
use crate::core::dataset::{count_images_recursive, list_class_dirs, list_images, DatasetSplit};
use crate::core::operations::{copy_files_into, ensure_dir};
use crate::error::PrepResult;

/// The three partitions of one class
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPartition<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
    pub test: Vec<T>,
}

impl<T> SplitPartition<T> {
    pub fn get(&self, split: DatasetSplit) -> &[T] {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Val => &self.val,
            DatasetSplit::Test => &self.test,
        }
    }
}

/// Per-class result of a split run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSplitCounts {
    pub class_name: String,
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

/// Images found under each output subset after the copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitTotals {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

impl SplitTotals {
    pub fn get(&self, split: DatasetSplit) -> usize {
        match split {
            DatasetSplit::Train => self.train,
            DatasetSplit::Val => self.val,
            DatasetSplit::Test => self.test,
        }
    }

    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub config: SplitConfig,
    pub per_class: Vec<ClassSplitCounts>,
    pub totals: SplitTotals,
}

/// Shuffle `items` and cut them into train/val/test by the configured ratios.
///
/// `train = floor(n * train_ratio)`, `val = floor(n * val_ratio)`, test gets
/// the remainder.
pub fn partition<T, R: Rng + ?Sized>(
    mut items: Vec<T>,
    config: &SplitConfig,
    rng: &mut R,
) -> SplitPartition<T> {
    items.shuffle(rng);

    let total = items.len();
    let train_end = ((total as f64 * config.train_ratio) as usize).min(total);
    let val_end = (train_end + (total as f64 * config.val_ratio) as usize).min(total);

    let test = items.split_off(val_end);
    let val = items.split_off(train_end);

    SplitPartition {
        train: items,
        val,
        test,
    }
}

/// Split every class under `input_root` into `output_root/{train,val,test}/<class>`.
///
/// Files are copied, never moved. Totals are recounted from the output tree
/// so images left there by earlier runs are included.
pub fn split_dataset(
    input_root: &Path,
    output_root: &Path,
    config: &SplitConfig,
    extensions: &[String],
) -> PrepResult<SplitSummary> {
    let _span = info_span!("split").entered();
    info!(
        "Splitting {:?} into {:?} (train {:.2}, val {:.2}, test {:.2}, seed {})",
        input_root,
        output_root,
        config.train_ratio,
        config.val_ratio,
        config.test_ratio,
        config.seed
    );

    let classes = list_class_dirs(input_root)?;

    for split in DatasetSplit::all() {
        ensure_dir(&output_root.join(split.as_str()))?;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut per_class = Vec::with_capacity(classes.len());

    for (class_name, class_path) in &classes {
        for split in DatasetSplit::all() {
            ensure_dir(&output_root.join(split.as_str()).join(class_name))?;
        }

        let images = list_images(class_path, extensions)?;
        let parts = partition(images, config, &mut rng);

        for split in DatasetSplit::all() {
            let dest_dir = output_root.join(split.as_str()).join(class_name);
            copy_files_into(parts.get(split), &dest_dir)?;
        }

        info!(
            "{}: {} train, {} val, {} test",
            class_name,
            parts.train.len(),
            parts.val.len(),
            parts.test.len()
        );

        per_class.push(ClassSplitCounts {
            class_name: class_name.clone(),
            train: parts.train.len(),
            val: parts.val.len(),
            test: parts.test.len(),
        });
    }

    let subset_total =
        |split: DatasetSplit| count_images_recursive(&output_root.join(split.as_str()), extensions);
    let totals = SplitTotals {
        train: subset_total(DatasetSplit::Train),
        val: subset_total(DatasetSplit::Val),
        test: subset_total(DatasetSplit::Test),
    };

    info!(
        "Split complete: {} train, {} val, {} test images",
        totals.train, totals.val, totals.test
    );

    Ok(SplitSummary {
        config: config.clone(),
        per_class,
        totals,
    })
}

pub fn write_split_manifest(summary: &SplitSummary, path: &Path) -> PrepResult<()> {
    fs::write(path, serde_json::to_string_pretty(summary)?)?;
    info!("Split manifest written to: {:?}", path);
    Ok(())
}

/// Per-class grouped bar chart and the overall split pie chart
pub fn split_charts(summary: &SplitSummary) -> Vec<Chart> {
    let classes: Vec<String> = summary
        .per_class
        .iter()
        .map(|c| c.class_name.clone())
        .collect();
    let train: Vec<f64> = summary.per_class.iter().map(|c| c.train as f64).collect();
    let val: Vec<f64> = summary.per_class.iter().map(|c| c.val as f64).collect();
    let test: Vec<f64> = summary.per_class.iter().map(|c| c.test as f64).collect();

    let histogram = Chart::grouped_bar(
        "Images per class in Train / Val / Test",
        "Class",
        "Number of images",
        classes,
        vec![
            Series::new("Train", ChartColor::SKY_BLUE, train),
            Series::new("Val", ChartColor::LIGHT_GREEN, val),
            Series::new("Test", ChartColor::SALMON, test),
        ],
    )
    .named("dataset_histogram");

    let labels = DatasetSplit::all()
        .iter()
        .map(|s| s.display_name().to_string())
        .collect();
    let values = DatasetSplit::all()
        .iter()
        .map(|s| summary.totals.get(*s) as f64)
        .collect();
    let pie = Chart::pie("Overall Train / Validation / Test share", labels, values)
        .with_colors(vec![
            ChartColor::SKY_BLUE,
            ChartColor::LIGHT_GREEN,
            ChartColor::SALMON,
        ])
        .named("dataset_piechart");

    vec![histogram, pie]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
    }

    fn make_class(root: &Path, name: &str, count: usize) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            fs::write(dir.join(format!("{}_{:03}.jpg", name, i)), b"img").unwrap();
        }
        fs::write(dir.join("notes.txt"), b"not an image").unwrap();
    }

    fn file_names(dir: &Path) -> Vec<String> {
        list_images(dir, &exts())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_partition_sizes_floor_and_remainder() {
        let config = SplitConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let parts = partition((0..10).collect::<Vec<u32>>(), &config, &mut rng);
        assert_eq!(parts.train.len(), 7);
        assert_eq!(parts.val.len(), 1);
        assert_eq!(parts.test.len(), 2);

        let parts = partition((0..100).collect::<Vec<u32>>(), &config, &mut rng);
        assert_eq!(
            (parts.train.len(), parts.val.len(), parts.test.len()),
            (70, 15, 15)
        );

        let parts = partition(vec![1u32], &config, &mut rng);
        assert_eq!(
            (parts.train.len(), parts.val.len(), parts.test.len()),
            (0, 0, 1)
        );
    }

    #[test]
    fn test_partition_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let parts: SplitPartition<u32> = partition(Vec::new(), &SplitConfig::default(), &mut rng);
        assert!(parts.train.is_empty() && parts.val.is_empty() && parts.test.is_empty());
    }

    #[test]
    fn test_partition_preserves_items() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let parts = partition((0..57).collect::<Vec<u32>>(), &SplitConfig::default(), &mut rng);

        let mut all: Vec<u32> = parts
            .train
            .iter()
            .chain(parts.val.iter())
            .chain(parts.test.iter())
            .copied()
            .collect();
        all.sort();
        assert_eq!(all, (0..57).collect::<Vec<u32>>());
    }

    #[test]
    fn test_partition_is_deterministic_for_seed() {
        let config = SplitConfig::default();
        let run = |seed: u64| {
            partition(
                (0..50).collect::<Vec<u32>>(),
                &config,
                &mut ChaCha8Rng::seed_from_u64(seed),
            )
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42).train, run(7).train);
    }

    #[test]
    fn test_split_dataset_copies_into_mirrored_tree() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        make_class(input.path(), "cat", 10);
        make_class(input.path(), "dog", 20);
        fs::write(input.path().join("stray.jpg"), b"ignored").unwrap();

        let summary =
            split_dataset(input.path(), output.path(), &SplitConfig::default(), &exts()).unwrap();

        assert_eq!(summary.per_class.len(), 2);
        assert_eq!(
            summary.per_class[0],
            ClassSplitCounts {
                class_name: "cat".to_string(),
                train: 7,
                val: 1,
                test: 2
            }
        );
        let dog = &summary.per_class[1];
        assert_eq!((dog.train, dog.val, dog.test), (14, 3, 3));
        assert_eq!(
            summary.totals,
            SplitTotals {
                train: 21,
                val: 4,
                test: 5
            }
        );
        assert_eq!(summary.totals.total(), 30);

        for split in DatasetSplit::all() {
            for class in ["cat", "dog"] {
                assert!(output.path().join(split.as_str()).join(class).is_dir());
            }
        }
        assert_eq!(file_names(&output.path().join("val").join("cat")).len(), 1);
        // Sources untouched
        assert_eq!(file_names(&input.path().join("cat")).len(), 10);
    }

    #[test]
    fn test_split_dataset_is_reproducible() {
        let input = tempfile::tempdir().unwrap();
        make_class(input.path(), "bird", 30);
        let out_a = tempfile::tempdir().unwrap();
        let out_b = tempfile::tempdir().unwrap();
        let config = SplitConfig::default();

        split_dataset(input.path(), out_a.path(), &config, &exts()).unwrap();
        split_dataset(input.path(), out_b.path(), &config, &exts()).unwrap();

        for split in DatasetSplit::all() {
            let a = file_names(&out_a.path().join(split.as_str()).join("bird"));
            let b = file_names(&out_b.path().join(split.as_str()).join("bird"));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_split_dataset_missing_input() {
        let output = tempfile::tempdir().unwrap();
        let missing = output.path().join("no_such_dataset");
        assert!(split_dataset(&missing, output.path(), &SplitConfig::default(), &exts()).is_err());
    }

    #[test]
    fn test_split_manifest_written() {
        let dir = tempfile::tempdir().unwrap();
        let summary = SplitSummary {
            config: SplitConfig::default(),
            per_class: vec![],
            totals: SplitTotals::default(),
        };
        let path = dir.path().join("split_summary.json");
        write_split_manifest(&summary, &path).unwrap();

        let loaded: SplitSummary =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, summary);
    }

    #[test]
    fn test_split_charts_shapes() {
        let summary = SplitSummary {
            config: SplitConfig::default(),
            per_class: vec![
                ClassSplitCounts {
                    class_name: "a".to_string(),
                    train: 7,
                    val: 1,
                    test: 2,
                },
                ClassSplitCounts {
                    class_name: "b".to_string(),
                    train: 14,
                    val: 3,
                    test: 3,
                },
            ],
            totals: SplitTotals {
                train: 21,
                val: 4,
                test: 5,
            },
        };

        let charts = split_charts(&summary);
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].file_stem, "dataset_histogram");
        assert_eq!(charts[1].file_stem, "dataset_piechart");
        assert_eq!(charts[1].start_angle, 0.0);
        assert_eq!(charts[0].series.len(), 3);
        assert_eq!(charts[0].series[1].values, vec![1.0, 3.0]);
        assert_eq!(charts[1].categories, vec!["Train", "Validation", "Test"]);
        assert_eq!(charts[1].series[0].values, vec![21.0, 4.0, 5.0]);
    }
}
