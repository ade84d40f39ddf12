use super::*;

const SHADOW_BLACK: [u8; 4] = [0, 0, 0, 204];

fn shadow_layer(w: u32, h: u32, block: (std::ops::Range<u32>, std::ops::Range<u32>)) -> Vec<u8> {
    let mut buf = vec![0u8; (w * h * 4) as usize];
    for y in block.1.clone() {
        for x in block.0.clone() {
            let i = ((y * w + x) * 4) as usize;
            buf[i..i + 4].copy_from_slice(&SHADOW_BLACK);
        }
    }
    buf
}

fn alpha_at(buf: &[u8], w: u32, x: u32, y: u32) -> u8 {
    buf[((y * w + x) * 4 + 3) as usize]
}

#[test]
fn zero_blur_leaves_shadow_layer_untouched() {
    let (w, h) = (12u32, 12u32);
    let src = shadow_layer(w, h, (4..8, 4..8));
    let (radius, sigma) = shadow_blur_params(0.0);
    let mut buf = src.clone();
    blur_occupied_rows_in_place(&mut buf, w, h, radius, sigma).unwrap();
    assert_eq!(buf, src);
}

#[test]
fn shadow_blur_softens_edges_and_stays_black() {
    let (w, h) = (40u32, 40u32);
    let mut buf = shadow_layer(w, h, (10..30, 10..30));
    let (radius, sigma) = shadow_blur_params(4.0);
    blur_occupied_rows_in_place(&mut buf, w, h, radius, sigma).unwrap();

    // Interior keeps the shadow opacity, the edge is halved, and the halo fades out.
    assert_eq!(alpha_at(&buf, w, 20, 20), 204);
    let edge = alpha_at(&buf, w, 10, 20);
    assert!((90..=130).contains(&edge), "edge alpha {edge}");
    assert!(alpha_at(&buf, w, 7, 20) > 0);
    assert_eq!(alpha_at(&buf, w, 2, 20), 0);

    assert!(buf.chunks_exact(4).all(|px| px[..3] == [0, 0, 0]));
}

#[test]
fn shadow_blur_preserves_total_coverage() {
    let (w, h) = (30u32, 30u32);
    let src = shadow_layer(w, h, (13..17, 13..17));
    let (radius, sigma) = shadow_blur_params(4.0);
    let out = blur_rgba8_premul(&src, w, h, radius, sigma).unwrap();

    let total = |b: &[u8]| b.chunks_exact(4).map(|px| u32::from(px[3])).sum::<u32>();
    let (before, after) = (total(&src), total(&out));
    assert!(after.abs_diff(before) <= before / 25, "{before} -> {after}");
}

#[test]
fn band_blur_matches_full_blur() {
    let (w, h) = (16u32, 40u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    for y in 18..21u32 {
        for x in 3..12u32 {
            let i = ((y * w + x) * 4) as usize;
            src[i..i + 4].copy_from_slice(&[0, 0, 0, 204]);
        }
    }

    let (radius, sigma) = shadow_blur_params(4.0);
    let full = blur_rgba8_premul(&src, w, h, radius, sigma).unwrap();
    let mut band = src.clone();
    blur_occupied_rows_in_place(&mut band, w, h, radius, sigma).unwrap();
    assert_eq!(band, full);
}

#[test]
fn band_blur_of_empty_layer_is_noop() {
    let mut buf = vec![0u8; 8 * 8 * 4];
    blur_occupied_rows_in_place(&mut buf, 8, 8, 6, 2.0).unwrap();
    assert!(buf.iter().all(|&b| b == 0));
    assert!(blur_occupied_rows_in_place(&mut buf, 9, 8, 6, 2.0).is_err());
}

#[test]
fn canvas_shadow_blur_mapping() {
    assert_eq!(shadow_blur_params(4.0), (6, 2.0));
    assert_eq!(shadow_blur_params(0.0), (0, 0.0));
}

#[test]
fn invalid_sigma_is_rejected() {
    let src = vec![0u8; 4 * 4 * 4];
    assert!(blur_rgba8_premul(&src, 4, 4, 2, 0.0).is_err());
    assert!(blur_rgba8_premul(&src, 4, 4, 2, f32::NAN).is_err());
}
