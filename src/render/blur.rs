use crate::foundation::{
    core::Canvas,
    error::{SlideError, SlideResult},
};

/// Separable Gaussian blur over premultiplied RGBA8 with clamp-to-edge sampling.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> SlideResult<Vec<u8>> {
    let expected_len = Canvas { width, height }.rgba8_len()?;
    if src.len() != expected_len {
        return Err(SlideError::layout(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur only the horizontal band holding non-transparent pixels (padded by `radius`).
///
/// Equivalent to [`blur_rgba8_premul`] on a layer that is transparent outside that band, which is
/// the case for a text shadow layer.
pub fn blur_occupied_rows_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> SlideResult<()> {
    let expected_len = Canvas { width, height }.rgba8_len()?;
    if buf.len() != expected_len {
        return Err(SlideError::layout(
            "blur_occupied_rows_in_place expects buf matching width*height*4",
        ));
    }
    let row_bytes = width as usize * 4;
    if radius == 0 || row_bytes == 0 {
        return Ok(());
    }

    let occupied = |row: &[u8]| row.chunks_exact(4).any(|px| px[3] != 0);
    let Some(first) = buf.chunks_exact(row_bytes).position(occupied) else {
        return Ok(());
    };
    let last = buf
        .chunks_exact(row_bytes)
        .rposition(occupied)
        .unwrap_or(first);

    let y0 = first.saturating_sub(radius as usize);
    let y1 = (last + 1 + radius as usize).min(height as usize);
    let band = &mut buf[y0 * row_bytes..y1 * row_bytes];

    let blurred = blur_rgba8_premul(band, width, (y1 - y0) as u32, radius, sigma)?;
    band.copy_from_slice(&blurred);
    Ok(())
}

/// Canvas-style `shadowBlur` to (radius, sigma): sigma is half the blur length.
pub fn shadow_blur_params(blur_px: f32) -> (u32, f32) {
    let sigma = (blur_px / 2.0).max(0.0);
    if sigma <= 0.0 {
        return (0, 0.0);
    }
    ((sigma * 3.0).ceil() as u32, sigma)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> SlideResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SlideError::layout("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Put the rounding remainder on the center tap so weights sum to exactly 1.0 in Q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
