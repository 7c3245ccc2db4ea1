use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::noise::gaussian_noise;

/// Rotation angle of the two rotated variants, in degrees
pub const ROTATION_DEGREES: f32 = 15.0;
pub const BRIGHTNESS_LOW: f32 = 0.7;
pub const BRIGHTNESS_HIGH: f32 = 1.3;
/// Centre crop keeps 1/ZOOM_FACTOR of each dimension
pub const ZOOM_FACTOR: f64 = 1.2;

/// Convert to RGB and resize to exactly `width` x `height` (bilinear)
pub fn resize_to(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(&img.to_rgb8(), width, height, FilterType::Triangle)
}

pub fn flip_horizontal(img: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(img)
}

pub fn flip_vertical(img: &RgbImage) -> RgbImage {
    imageops::flip_vertical(img)
}

/// Rotate about the centre, positive `degrees` counter-clockwise.
///
/// The canvas keeps its size; uncovered corners are black.
pub fn rotate(img: &RgbImage, degrees: f32) -> RgbImage {
    // rotate_about_center turns clockwise for positive theta
    rotate_about_center(
        img,
        -degrees.to_radians(),
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
    )
}

/// Scale every channel by `factor`, truncated and clamped to the u8 range
/// (the same rounding as a PIL brightness enhance)
pub fn adjust_brightness(img: &RgbImage, factor: f32) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = (*channel as f32 * factor).clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Side length kept by the zoom crop: `floor(dim / factor)`, at least 1
pub fn zoom_crop_size(dim: u32, factor: f64) -> u32 {
    ((dim as f64 / factor).floor() as u32).clamp(1, dim.max(1))
}

/// Crop the centre `1/factor` of the image and scale it back to full size
pub fn center_zoom(img: &RgbImage, factor: f64) -> RgbImage {
    let (width, height) = img.dimensions();
    let crop_w = zoom_crop_size(width, factor);
    let crop_h = zoom_crop_size(height, factor);
    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;

    let cropped = imageops::crop_imm(img, x, y, crop_w, crop_h).to_image();
    imageops::resize(&cropped, width, height, FilterType::Triangle)
}

/// Add per-channel Gaussian noise with mean 0, clamped to the u8 range.
///
/// The same `seed` always produces the same noise.
pub fn add_gaussian_noise(img: &RgbImage, std_dev: f64, seed: u64) -> RgbImage {
    gaussian_noise(img, 0.0, std_dev, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 10) as u8, (y * 10) as u8, ((x + y) * 5) as u8])
        })
    }

    #[test]
    fn test_resize_to_fixed_size() {
        let img = DynamicImage::ImageRgb8(gradient(40, 30));
        let resized = resize_to(&img, 224, 224);
        assert_eq!(resized.dimensions(), (224, 224));
    }

    #[test]
    fn test_flips_mirror_pixels() {
        let img = gradient(4, 3);

        let h = flip_horizontal(&img);
        assert_eq!(h.get_pixel(0, 1), img.get_pixel(3, 1));
        assert_eq!(h.get_pixel(3, 2), img.get_pixel(0, 2));

        let v = flip_vertical(&img);
        assert_eq!(v.get_pixel(1, 0), img.get_pixel(1, 2));
        assert_eq!(v.get_pixel(2, 2), img.get_pixel(2, 0));
    }

    #[test]
    fn test_rotate_keeps_size_and_center() {
        let img = RgbImage::from_pixel(21, 21, Rgb([120, 60, 30]));
        for degrees in [ROTATION_DEGREES, -ROTATION_DEGREES] {
            let rotated = rotate(&img, degrees);
            assert_eq!(rotated.dimensions(), (21, 21));
            let center = rotated.get_pixel(10, 10);
            for (got, want) in center.0.iter().zip([120u8, 60, 30]) {
                assert!(got.abs_diff(want) <= 1, "center channel {} vs {}", got, want);
            }
            // Corners leave the rotated canvas and are filled black
            assert_eq!(*rotated.get_pixel(0, 0), Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn test_brightness_truncates_and_clamps() {
        let img = RgbImage::from_pixel(2, 2, Rgb([101, 200, 13]));

        // 70.7 -> 70, 9.1 -> 9
        let darker = adjust_brightness(&img, BRIGHTNESS_LOW);
        assert_eq!(*darker.get_pixel(0, 0), Rgb([70, 140, 9]));

        // 131.3 -> 131, 260 -> 255, 16.9 -> 16
        let brighter = adjust_brightness(&img, BRIGHTNESS_HIGH);
        assert_eq!(*brighter.get_pixel(1, 1), Rgb([131, 255, 16]));
    }

    #[test]
    fn test_zoom_crop_size_floors_exactly() {
        assert_eq!(zoom_crop_size(224, ZOOM_FACTOR), 186);
        assert_eq!(zoom_crop_size(240, ZOOM_FACTOR), 200);
        assert_eq!(zoom_crop_size(120, ZOOM_FACTOR), 100);
        assert_eq!(zoom_crop_size(36, ZOOM_FACTOR), 30);
        assert_eq!(zoom_crop_size(1, ZOOM_FACTOR), 1);
    }

    /// Mean row of the bright pixels
    fn bright_mean_y(img: &RgbImage) -> f32 {
        let rows: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 128)
            .map(|(_, y, _)| y)
            .collect();
        assert!(!rows.is_empty());
        rows.iter().sum::<u32>() as f32 / rows.len() as f32
    }

    #[test]
    fn test_rotate_positive_is_counter_clockwise() {
        // Horizontal bar right of the centre
        let img = RgbImage::from_fn(41, 41, |x, y| {
            if (19..=21).contains(&y) && (28..=36).contains(&x) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });

        let ccw = rotate(&img, ROTATION_DEGREES);
        assert!(bright_mean_y(&ccw) < 19.0, "moved down: {}", bright_mean_y(&ccw));

        let cw = rotate(&img, -ROTATION_DEGREES);
        assert!(bright_mean_y(&cw) > 21.0, "moved up: {}", bright_mean_y(&cw));
    }

    #[test]
    fn test_center_zoom_keeps_size() {
        let img = RgbImage::from_pixel(24, 12, Rgb([5, 6, 7]));
        let zoomed = center_zoom(&img, ZOOM_FACTOR);
        assert_eq!(zoomed.dimensions(), (24, 12));
        assert!(zoomed.pixels().all(|p| *p == Rgb([5, 6, 7])));
    }

    #[test]
    fn test_center_zoom_drops_the_border() {
        // Bright 1px frame around a dark image disappears after the crop
        let img = RgbImage::from_fn(60, 60, |x, y| {
            if x == 0 || y == 0 || x == 59 || y == 59 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let zoomed = center_zoom(&img, ZOOM_FACTOR);
        assert_eq!(*zoomed.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*zoomed.get_pixel(59, 30), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_noise_is_deterministic_per_seed() {
        let img = RgbImage::from_pixel(16, 16, Rgb([128, 128, 128]));

        let a = add_gaussian_noise(&img, 15.0, 7);
        let b = add_gaussian_noise(&img, 15.0, 7);
        let c = add_gaussian_noise(&img, 15.0, 8);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, img);
    }

    #[test]
    fn test_zero_noise_is_identity() {
        let img = gradient(8, 8);
        assert_eq!(add_gaussian_noise(&img, 0.0, 1), img);
    }
}
