mod augmenter;
mod stats;
pub mod transforms;

pub use augmenter::{
    augment_dataset, augment_dataset_with_progress, augment_image, save_jpeg, AugmentKind,
    AugmentProgressMessage,
};
pub use stats::{format_thousands, write_stats_report, AugmentStats};
