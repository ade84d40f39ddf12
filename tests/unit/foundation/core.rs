use super::*;

#[test]
fn story_canvas_is_portrait_1080x1920() {
    assert_eq!(Canvas::STORY.width, 1080);
    assert_eq!(Canvas::STORY.height, 1920);
    assert_eq!(Canvas::STORY.center_x(), 540.0);
    assert_eq!(Canvas::STORY.rgba8_len().unwrap(), 1080 * 1920 * 4);
    assert_eq!(Canvas::STORY.dims_u16().unwrap(), (1080, 1920));
}

#[test]
fn rgba8_len_overflow_is_an_error() {
    let c = Canvas {
        width: u32::MAX,
        height: u32::MAX,
    };
    assert!(c.rgba8_len().is_err());
    let small = Canvas {
        width: 3,
        height: 2,
    };
    assert_eq!(small.rgba8_len().unwrap(), 24);
}

#[test]
fn oversized_canvas_rejected_for_raster() {
    let c = Canvas {
        width: 70_000,
        height: 10,
    };
    assert!(c.dims_u16().is_err());
}

#[test]
fn black_alpha_rounds() {
    assert_eq!(Rgba8::black_alpha(0.8).a, 204);
    assert_eq!(Rgba8::black_alpha(0.4).a, 102);
    assert_eq!(Rgba8::black_alpha(2.0).a, 255);
    assert_eq!(Rgba8::black_alpha(-1.0).a, 0);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128, 10, 20, 30, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[0..3].iter().zip([200u8, 100, 50]) {
        assert!((i32::from(*got) - i32::from(want)).abs() <= 2);
    }
}
