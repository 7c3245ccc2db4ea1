//! Nine fixed variants per training image.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::Sender;
use tracing::{debug, info, info_span, warn};

use super::stats::AugmentStats;
use super::transforms::{
    add_gaussian_noise, adjust_brightness, center_zoom, flip_horizontal, flip_vertical, resize_to,
    rotate, BRIGHTNESS_HIGH, BRIGHTNESS_LOW, ROTATION_DEGREES, ZOOM_FACTOR,
};
use crate::config::AugmentConfig;
use crate::core::dataset::{list_class_dirs, list_images};
use crate::core::operations::ensure_dir;
use crate::error::{PrepError, PrepResult};

/// Progress message types for background augmentation
#[derive(Debug, Clone)]
pub enum AugmentProgressMessage {
    ClassStarted {
        class_name: String,
        total: usize,
    },
    Progress {
        class_name: String,
        current: usize,
        total: usize,
    },
    Complete(AugmentStats),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AugmentKind {
    Original,
    FlipHorizontal,
    FlipVertical,
    RotatePos15,
    RotateNeg15,
    Brightness07,
    Brightness13,
    Zoom,
    Noise,
}

impl AugmentKind {
    pub const COUNT: usize = 9;

    pub const ALL: [AugmentKind; Self::COUNT] = [
        AugmentKind::Original,
        AugmentKind::FlipHorizontal,
        AugmentKind::FlipVertical,
        AugmentKind::RotatePos15,
        AugmentKind::RotateNeg15,
        AugmentKind::Brightness07,
        AugmentKind::Brightness13,
        AugmentKind::Zoom,
        AugmentKind::Noise,
    ];

    /// Key used in the stats report and as the file name suffix
    pub fn key(&self) -> &'static str {
        match self {
            AugmentKind::Original => "original",
            AugmentKind::FlipHorizontal => "flipH",
            AugmentKind::FlipVertical => "flipV",
            AugmentKind::RotatePos15 => "rotate15",
            AugmentKind::RotateNeg15 => "rotate-15",
            AugmentKind::Brightness07 => "bright07",
            AugmentKind::Brightness13 => "bright13",
            AugmentKind::Zoom => "zoom",
            AugmentKind::Noise => "noise",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AugmentKind::Original => 0,
            AugmentKind::FlipHorizontal => 1,
            AugmentKind::FlipVertical => 2,
            AugmentKind::RotatePos15 => 3,
            AugmentKind::RotateNeg15 => 4,
            AugmentKind::Brightness07 => 5,
            AugmentKind::Brightness13 => 6,
            AugmentKind::Zoom => 7,
            AugmentKind::Noise => 8,
        }
    }

    /// Output file name for an input with the given stem
    pub fn file_name(&self, stem: &str) -> String {
        match self {
            AugmentKind::Original => format!("{}.jpg", stem),
            kind => format!("{}_{}.jpg", stem, kind.key()),
        }
    }

    pub fn apply(&self, img: &RgbImage, noise_std: f64, noise_seed: u64) -> RgbImage {
        match self {
            AugmentKind::Original => img.clone(),
            AugmentKind::FlipHorizontal => flip_horizontal(img),
            AugmentKind::FlipVertical => flip_vertical(img),
            AugmentKind::RotatePos15 => rotate(img, ROTATION_DEGREES),
            AugmentKind::RotateNeg15 => rotate(img, -ROTATION_DEGREES),
            AugmentKind::Brightness07 => adjust_brightness(img, BRIGHTNESS_LOW),
            AugmentKind::Brightness13 => adjust_brightness(img, BRIGHTNESS_HIGH),
            AugmentKind::Zoom => center_zoom(img, ZOOM_FACTOR),
            AugmentKind::Noise => add_gaussian_noise(img, noise_std, noise_seed),
        }
    }
}

/// All nine variants of an already resized image, in `AugmentKind::ALL` order
pub fn augment_image(img: &RgbImage, noise_std: f64, noise_seed: u64) -> Vec<(AugmentKind, RgbImage)> {
    AugmentKind::ALL
        .iter()
        .map(|kind| (*kind, kind.apply(img, noise_std, noise_seed)))
        .collect()
}

pub fn save_jpeg(img: &RgbImage, path: &Path, quality: u8) -> PrepResult<()> {
    let save_err = |msg: String| PrepError::ImageSave(path.to_path_buf(), msg);

    let file = File::create(path).map_err(|e| save_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| save_err(e.to_string()))?;
    writer.flush().map_err(|e| save_err(e.to_string()))?;
    Ok(())
}

/// Augment every class under `input_root` into `output_root/<class>` with optional progress reporting
pub fn augment_dataset_with_progress(
    input_root: &Path,
    output_root: &Path,
    config: &AugmentConfig,
    extensions: &[String],
    progress_tx: Option<Sender<AugmentProgressMessage>>,
) -> PrepResult<AugmentStats> {
    let _span = info_span!("augment").entered();
    info!(
        "Augmenting {:?} into {:?} ({}x{}, noise sd {}, seed {})",
        input_root, output_root, config.image_width, config.image_height, config.noise_std, config.seed
    );

    let classes = list_class_dirs(input_root)?;
    ensure_dir(output_root)?;

    let mut stats = AugmentStats::new();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    for (class_name, class_path) in &classes {
        let out_dir = output_root.join(class_name);
        ensure_dir(&out_dir)?;

        let images = list_images(class_path, extensions)?;
        let total = images.len();
        if let Some(ref tx) = progress_tx {
            let _ = tx.send(AugmentProgressMessage::ClassStarted {
                class_name: class_name.clone(),
                total,
            });
        }

        for (idx, image_path) in images.iter().enumerate() {
            let decoded = image::open(image_path)
                .map_err(|e| PrepError::ImageLoad(image_path.clone(), e.to_string()));
            match decoded {
                Ok(decoded) => {
                    let stem = image_path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_default();
                    let resized = resize_to(&decoded, config.image_width, config.image_height);
                    let noise_seed: u64 = rng.gen();

                    for (kind, variant) in augment_image(&resized, config.noise_std, noise_seed) {
                        save_jpeg(&variant, &out_dir.join(kind.file_name(&stem)), config.jpeg_quality)?;
                        stats.record(kind);
                    }
                    debug!("Augmented {:?}", image_path);
                }
                Err(e) => {
                    warn!("Skipping: {}", e);
                    stats.skipped += 1;
                }
            }

            if let Some(ref tx) = progress_tx {
                let _ = tx.send(AugmentProgressMessage::Progress {
                    class_name: class_name.clone(),
                    current: idx + 1,
                    total,
                });
            }
        }

        info!("{}: {} images processed", class_name, total);
    }

    info!(
        "Augmentation complete: {} images written, {} skipped",
        stats.total(),
        stats.skipped
    );

    if let Some(tx) = progress_tx {
        let _ = tx.send(AugmentProgressMessage::Complete(stats.clone()));
    }

    Ok(stats)
}

/// Augment a dataset (synchronous version)
pub fn augment_dataset(
    input_root: &Path,
    output_root: &Path,
    config: &AugmentConfig,
    extensions: &[String],
) -> PrepResult<AugmentStats> {
    augment_dataset_with_progress(input_root, output_root, config, extensions, None)
}
