use image::ImageEncoder as _;

use crate::foundation::core::{Bitmap, Color};
use crate::foundation::error::{QrError, QrResult};
use crate::foundation::math::premul_over_in_place;

/// Fixed JPEG quality (0.9 on a unit scale).
pub const JPEG_QUALITY: u8 = 90;

/// Lossless PNG with straight alpha.
pub fn encode_png(bitmap: &Bitmap) -> QrResult<Vec<u8>> {
    let rgba = bitmap.to_straight_rgba8();
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            &rgba,
            bitmap.width,
            bitmap.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| QrError::export(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Paint `bitmap` over an opaque white canvas of the same size.
pub fn flatten_on_white(bitmap: &Bitmap) -> QrResult<Bitmap> {
    let mut out = Bitmap::filled(bitmap.width, bitmap.height, Color::WHITE.premul());
    premul_over_in_place(&mut out.data, &bitmap.data)?;
    Ok(out)
}

/// JPEG at [`JPEG_QUALITY`], flattened on white first since the format has no alpha.
pub fn encode_jpeg(bitmap: &Bitmap) -> QrResult<Vec<u8>> {
    let flat = flatten_on_white(bitmap)?;
    let rgb: Vec<u8> = flat
        .data
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .write_image(&rgb, flat.width, flat.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| QrError::export(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/raster.rs"]
mod tests;
