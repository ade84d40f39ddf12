use super::*;
use crate::render::cancel::RenderGeneration;

fn story() -> Vec<SlideContent> {
    vec![
        SlideContent::new(SlideKind::Hook, "One"),
        SlideContent::new(SlideKind::Problem, "Two"),
        SlideContent::new(SlideKind::Solution, "Three"),
        SlideContent::new(SlideKind::Cta, "Four"),
    ]
}

#[test]
fn output_is_positional() {
    // Deliberately out of canonical order: outputs follow the input positions.
    let mut slides = story();
    slides.swap(0, 3);
    let out = render_all(
        &FontFace::default(),
        &DecodedBackground::solid(10, 10, 10),
        &slides,
        &CustomizationProfile::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(out.len(), slides.len());
    for (i, (r, s)) in out.iter().zip(&slides).enumerate() {
        assert_eq!(r.index, i);
        assert_eq!(r.source_type, s.kind);
        assert_eq!(&r.png[..4], b"\x89PNG");
    }
}

#[test]
fn parallel_matches_sequential() {
    let font = FontFace::default();
    let bg = DecodedBackground::solid(30, 60, 90);
    let profile = CustomizationProfile::default();
    let slides = story();

    let seq = render_all(&font, &bg, &slides, &profile, &BatchOptions::default()).unwrap();
    let par = render_all(
        &font,
        &bg,
        &slides,
        &profile,
        &BatchOptions {
            parallel: true,
            threads: Some(2),
            ..BatchOptions::default()
        },
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn empty_batch_renders_nothing() {
    let out = render_all(
        &FontFace::default(),
        &DecodedBackground::solid(0, 0, 0),
        &[],
        &CustomizationProfile::default(),
        &BatchOptions::default(),
    )
    .unwrap();
    assert!(out.is_empty());
}

#[test]
fn zero_threads_is_rejected() {
    let err = render_all(
        &FontFace::default(),
        &DecodedBackground::solid(0, 0, 0),
        &story(),
        &CustomizationProfile::default(),
        &BatchOptions {
            parallel: true,
            threads: Some(0),
            ..BatchOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::Validation(_)));
}

#[test]
fn non_finite_profile_fails_before_rendering() {
    let profile = CustomizationProfile {
        font_size: f32::NAN,
        ..CustomizationProfile::default()
    };
    let err = render_all(
        &FontFace::default(),
        &DecodedBackground::solid(0, 0, 0),
        &story(),
        &profile,
        &BatchOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::Layout(_)));
}

#[test]
fn superseded_ticket_stops_the_batch() {
    let generation = RenderGeneration::new();
    let ticket = generation.begin();
    generation.begin();

    let err = render_all_snapshot(
        &FontFace::default(),
        &DecodedBackground::solid(0, 0, 0),
        &story(),
        CustomizationProfile::default().snapshot().unwrap(),
        &BatchOptions::default(),
        Some(&ticket),
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::Superseded { .. }));
}

#[tokio::test]
async fn async_batch_decodes_and_renders() {
    let mut png = Vec::new();
    image::RgbaImage::from_pixel(4, 8, image::Rgba([200, 20, 20, 255]))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let generation = RenderGeneration::new();
    let ticket = generation.begin();
    let out = render_all_async(
        &FontFace::default(),
        &BackgroundSource::from_bytes(png),
        &story(),
        &CustomizationProfile::default(),
        &BatchOptions::default(),
        &ticket,
    )
    .await
    .unwrap();
    assert_eq!(out.len(), 4);
    assert_eq!(out[3].source_type, SlideKind::Cta);
}

#[tokio::test]
async fn async_batch_fails_on_bad_background() {
    let generation = RenderGeneration::new();
    let err = render_all_async(
        &FontFace::default(),
        &BackgroundSource::from_bytes(b"not an image".to_vec()),
        &story(),
        &CustomizationProfile::default(),
        &BatchOptions::default(),
        &generation.begin(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SlideError::ImageLoad(_)));
}
