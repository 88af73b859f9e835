use image::DynamicImage;

use crate::errors::PipelineError;

/// Decodes an uploaded image, falling back to the HEIF decoder when the
/// default decoders do not recognise the container.
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::Decode("empty image upload".to_string()));
    }

    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(e) => {
            log::debug!("default image decoders failed ({e}), trying HEIF");
            decode_heif(bytes).map_err(|heif_error| {
                PipelineError::Decode(format!("{e}; HEIF fallback: {heif_error}"))
            })?
        }
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::Decode(format!(
            "image has zero size ({}x{})",
            image.width(),
            image.height()
        )));
    }

    Ok(image)
}

#[cfg(feature = "heif")]
fn decode_heif(bytes: &[u8]) -> Result<DynamicImage, String> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let context = HeifContext::read_from_bytes(bytes).map_err(|e| e.to_string())?;
    let handle = context.primary_image_handle().map_err(|e| e.to_string())?;
    let decoded = LibHeif::new()
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
        .map_err(|e| e.to_string())?;

    let planes = decoded.planes();
    let interleaved = planes
        .interleaved
        .ok_or_else(|| "HEIF image has no interleaved plane".to_string())?;

    let width = interleaved.width;
    let height = interleaved.height;
    let row_bytes = width as usize * 4;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in interleaved.data.chunks(interleaved.stride).take(height as usize) {
        pixels.extend_from_slice(&row[..row_bytes]);
    }

    image::RgbaImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| "HEIF plane size does not match its dimensions".to_string())
}

#[cfg(not(feature = "heif"))]
fn decode_heif(_bytes: &[u8]) -> Result<DynamicImage, String> {
    Err("HEIF support is not enabled in this build".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 3, Rgb([10, 20, 30])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let decoded = load_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = load_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn empty_upload_is_a_decode_error() {
        assert!(matches!(load_image(&[]), Err(PipelineError::Decode(_))));
    }
}
