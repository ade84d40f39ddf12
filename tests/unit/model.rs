use super::profile::*;
use super::slide::*;
use crate::foundation::core::Rgba8;
use serde_json::json;

#[test]
fn slide_content_uses_type_key() {
    let s: SlideContent =
        serde_json::from_value(json!({"type": "cta", "text": "Download now"})).unwrap();
    assert_eq!(s, SlideContent::new(SlideKind::Cta, "Download now"));
    assert_eq!(
        serde_json::to_value(&s).unwrap(),
        json!({"type": "cta", "text": "Download now"})
    );
    assert!(serde_json::from_value::<SlideContent>(json!({"type": "outro", "text": ""})).is_err());
}

#[test]
fn story_requires_exactly_four() {
    let three = vec![SlideContent::new(SlideKind::Hook, "a"); 3];
    assert!(Story::new(three).is_err());

    let parsed: Result<Story, _> = serde_json::from_value(json!([
        {"type": "hook", "text": "a"},
        {"type": "problem", "text": "b"}
    ]));
    assert!(parsed.is_err());
}

#[test]
fn story_order_check() {
    let story = Story::fallback("Acme", "Stop wasting time");
    assert!(story.is_canonical_order());

    let mut swapped: Vec<SlideContent> = story.clone().into();
    swapped.swap(0, 3);
    assert!(!Story::new(swapped).unwrap().is_canonical_order());
}

#[test]
fn fallback_story_matches_customizer_copy() {
    let story = Story::fallback("Acme", "Stop wasting time");
    let texts: Vec<&str> = story.slides().iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Stop wasting time",
            "Tired of complicated solutions?",
            "Acme makes it simple and fast",
            "Download Acme today",
        ]
    );
}

#[test]
fn base_filenames_follow_kind() {
    let names: Vec<&str> = SlideKind::CANONICAL
        .iter()
        .map(|k| k.base_filename())
        .collect();
    assert_eq!(
        names,
        vec!["hook-slide", "problem-slide", "solution-slide", "cta-slide"]
    );
}

#[test]
fn profile_defaults_match_wizard() {
    let p: CustomizationProfile = serde_json::from_value(json!({})).unwrap();
    assert_eq!(p, CustomizationProfile::default());
    let snap = p.snapshot().unwrap();
    assert_eq!(snap.text_color, Rgba8::WHITE);
    assert_eq!(snap.font_size_px, 48);
    assert_eq!(snap.text_position, TextPosition::Center);
    assert!((snap.overlay_opacity - 0.4).abs() < 1e-6);
    assert_eq!(snap.line_height(), 68.0);
}

#[test]
fn profile_parses_camel_case() {
    let p: CustomizationProfile = serde_json::from_value(json!({
        "textColor": "#000000",
        "fontSize": 60,
        "textPosition": "bottom",
        "overlayOpacity": 0.2
    }))
    .unwrap();
    assert_eq!(p.text_position, TextPosition::Bottom);
    assert_eq!(p.snapshot().unwrap().font_size_px, 60);
    assert!(serde_json::from_value::<CustomizationProfile>(json!({"font_size": 60})).is_err());
}

#[test]
fn snapshot_clamps_out_of_range() {
    let p = CustomizationProfile {
        font_size: 200.0,
        overlay_opacity: 1.5,
        ..CustomizationProfile::default()
    };
    let snap = p.snapshot().unwrap();
    assert_eq!(snap.font_size_px, 72);
    assert_eq!(snap.overlay_opacity, 0.8);

    let p = CustomizationProfile {
        font_size: 3.0,
        overlay_opacity: -0.5,
        ..CustomizationProfile::default()
    };
    let snap = p.snapshot().unwrap();
    assert_eq!(snap.font_size_px, 24);
    assert_eq!(snap.overlay_opacity, 0.0);
}

#[test]
fn snapshot_rejects_non_finite() {
    let p = CustomizationProfile {
        font_size: f32::NAN,
        ..CustomizationProfile::default()
    };
    assert!(matches!(
        p.snapshot(),
        Err(crate::SlideError::Layout(_))
    ));

    let p = CustomizationProfile {
        overlay_opacity: f32::INFINITY,
        ..CustomizationProfile::default()
    };
    assert!(p.snapshot().is_err());
}
