use super::*;
use crate::model::profile::CustomizationProfile;

fn profile() -> ProfileSnapshot {
    CustomizationProfile::default().snapshot().unwrap()
}

#[test]
fn key_changes_with_every_input() {
    let font = FontFace::default();
    let bg = DecodedBackground::solid(1, 2, 3);
    let content = SlideContent::new(SlideKind::Hook, "hello");
    let base = PreviewKey::compute(&content, profile(), &bg, &font);
    assert_eq!(base, PreviewKey::compute(&content, profile(), &bg, &font));

    let other_text = SlideContent::new(SlideKind::Hook, "hello!");
    assert_ne!(base, PreviewKey::compute(&other_text, profile(), &bg, &font));

    let other_kind = SlideContent::new(SlideKind::Cta, "hello");
    assert_ne!(base, PreviewKey::compute(&other_kind, profile(), &bg, &font));

    let mut p = profile();
    p.font_size_px += 1;
    assert_ne!(base, PreviewKey::compute(&content, p, &bg, &font));

    let mut p = profile();
    p.text_position = TextPosition::Bottom;
    assert_ne!(base, PreviewKey::compute(&content, p, &bg, &font));

    let other_bg = DecodedBackground::solid(1, 2, 4);
    assert_ne!(base, PreviewKey::compute(&content, profile(), &other_bg, &font));
}

#[test]
fn repeated_preview_is_served_from_cache() {
    let mut cache = PreviewCache::new(FontFace::default(), 4).unwrap();
    let bg = DecodedBackground::solid(0, 0, 0);
    let content = SlideContent::new(SlideKind::Problem, "Cached");

    let a = cache.render(&bg, &content, profile()).unwrap();
    let b = cache.render(&bg, &content, profile()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.stats(), (1, 1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn oldest_entry_is_evicted_at_capacity() {
    let mut cache = PreviewCache::new(FontFace::default(), 1).unwrap();
    let bg = DecodedBackground::solid(0, 0, 0);
    let first = SlideContent::new(SlideKind::Hook, "A");
    let second = SlideContent::new(SlideKind::Hook, "B");

    cache.render(&bg, &first, profile()).unwrap();
    cache.render(&bg, &second, profile()).unwrap();
    assert_eq!(cache.len(), 1);

    cache.render(&bg, &first, profile()).unwrap();
    assert_eq!(cache.stats(), (0, 3));

    cache.clear();
    assert!(cache.is_empty());
}
