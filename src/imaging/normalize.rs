use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
use ndarray::Array3;

use crate::errors::PipelineError;
use crate::imaging::decode::load_image;

pub const TARGET_SIZE: u32 = 512;
pub const CONTRAST_FACTOR: f32 = 1.8;
pub const BRIGHTNESS_FACTOR: f32 = 1.6;
pub const PADDING_RATIO: f64 = 1.2;

/// EfficientNet input normalization, per RGB channel.
const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Full preprocessing from uploaded bytes to a `512x512x3` model tensor.
pub fn normalize_image(bytes: &[u8]) -> Result<Array3<f32>, PipelineError> {
    let image = load_image(bytes)?;
    normalize_dynamic(&image)
}

pub fn normalize_dynamic(image: &DynamicImage) -> Result<Array3<f32>, PipelineError> {
    let flattened = flatten_alpha(image);
    let stretched = stretch_contrast(&flattened);
    let gray = to_enhanced_grayscale(&stretched, CONTRAST_FACTOR);
    let resized = resize_to_target(&gray, TARGET_SIZE)?;
    let squared = pad_to_square(&resized, TARGET_SIZE);
    let brightened = adjust_brightness(&squared, BRIGHTNESS_FACTOR);
    to_model_tensor(&brightened, TARGET_SIZE)
}

/// Composites the image onto an opaque white background.
pub fn flatten_alpha(image: &DynamicImage) -> RgbaImage {
    let rgba = image.to_rgba8();
    RgbaImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let a = a as u32;
        let over_white = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgba([over_white(r), over_white(g), over_white(b), 255])
    })
}

/// Linear stretch of the observed `[min, max]` sample range onto `[0, 255]`.
///
/// The lookup table has `max - min + 1` entries indexed by `sample - min`.
/// A flat image has no range to stretch and is returned unchanged.
pub fn stretch_contrast(image: &RgbaImage) -> RgbaImage {
    let samples = image.as_raw();
    let (min, max) = samples
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)));

    if samples.is_empty() || max == min {
        return image.clone();
    }

    let span = (max - min) as u32;
    let lut = (0..=span)
        .map(|i| (i * 255 / span) as u8)
        .collect::<Vec<_>>();

    let stretched = samples
        .iter()
        .map(|&s| lut[(s - min) as usize])
        .collect::<Vec<_>>();

    RgbaImage::from_raw(image.width(), image.height(), stretched)
        .unwrap_or_else(|| image.clone())
}

/// Luminance conversion followed by a fixed contrast enhancement around the
/// mean gray level.
///
/// The weights read the buffer in BGR order, matching the preprocessing the
/// vision model was trained with.
pub fn to_enhanced_grayscale(image: &RgbaImage, factor: f32) -> GrayImage {
    let gray = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([c0, c1, c2, _]) = *image.get_pixel(x, y);
        let luma = (c2 as u32 * 4899 + c1 as u32 * 9617 + c0 as u32 * 1868 + 8192) >> 14;
        Luma([luma.min(255) as u8])
    });

    let pixel_count = (gray.width() as u64 * gray.height() as u64).max(1);
    let total: u64 = gray.as_raw().iter().map(|&v| v as u64).sum();
    let mean = (total as f64 / pixel_count as f64 + 0.5).floor() as f32;

    map_gray(&gray, |v| mean + factor * (v - mean))
}

/// Small images are forced to `target x target`; large ones are shrunk so
/// the long side equals `target`, keeping the aspect ratio.
pub fn resize_to_target(image: &GrayImage, target: u32) -> Result<GrayImage, PipelineError> {
    let (width, height) = image.dimensions();
    let longest = width.max(height);

    if width == 0 || height == 0 {
        return Err(PipelineError::Decode(format!(
            "cannot resize a zero sized image ({width}x{height})"
        )));
    }

    if longest < target {
        return Ok(imageops::resize(image, target, target, FilterType::Lanczos3));
    }

    if longest > target {
        let ratio = target as f64 / longest as f64;
        let new_width = ((width as f64 * ratio) as u32).max(1);
        let new_height = ((height as f64 * ratio) as u32).max(1);
        return Ok(imageops::resize(
            image,
            new_width,
            new_height,
            FilterType::Lanczos3,
        ));
    }

    Ok(image.clone())
}

/// Centers the image on a white square canvas of side
/// `max(target, floor(1.2 * longest side))`.
pub fn pad_to_square(image: &GrayImage, target: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    let side = ((PADDING_RATIO * longest as f64) as u32).max(target);

    let mut canvas = GrayImage::from_pixel(side, side, Luma([255]));
    let x = (side - width) / 2;
    let y = (side - height) / 2;
    imageops::replace(&mut canvas, image, x as i64, y as i64);
    canvas
}

pub fn adjust_brightness(image: &GrayImage, factor: f32) -> GrayImage {
    map_gray(image, |v| v * factor)
}

/// Lossless round trip to three channels, Gaussian resize to the model input
/// size and EfficientNet normalization. Output layout is `(height, width, channel)`.
pub fn to_model_tensor(image: &GrayImage, size: u32) -> Result<Array3<f32>, PipelineError> {
    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image.clone()).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    let rgb = image::load_from_memory_with_format(&png, ImageFormat::Png)?.to_rgb8();
    let resized = imageops::resize(&rgb, size, size, FilterType::Gaussian);

    let side = size as usize;
    Ok(Array3::from_shape_fn((side, side, 3), |(y, x, c)| {
        let value = resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
        (value - CHANNEL_MEAN[c]) / CHANNEL_STD[c]
    }))
}

fn map_gray<F>(image: &GrayImage, f: F) -> GrayImage
where
    F: Fn(f32) -> f32,
{
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let value = f(image.get_pixel(x, y)[0] as f32);
        Luma([value.clamp(0.0, 255.0) as u8])
    })
}
