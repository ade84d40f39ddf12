use std::io::Cursor;

use crate::foundation::{
    core::unpremultiply_rgba8_in_place,
    error::{SlideError, SlideResult},
};

/// Encode premultiplied RGBA8 as a straight-alpha PNG with the encoder's default compression.
pub fn encode_png_premul(rgba8_premul: &[u8], width: u32, height: u32) -> SlideResult<Vec<u8>> {
    let mut straight = rgba8_premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| SlideError::encode("rgba buffer does not match canvas size"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| SlideError::encode(format!("png encode: {e}")))?;

    if buf.is_empty() {
        return Err(SlideError::encode("png encoder produced no data"));
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/png.rs"]
mod tests;
