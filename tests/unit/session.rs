use super::*;
use crate::{model::profile::TextPosition, package::zip::read_entries};
use serde_json::json;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let mut out = Vec::new();
    image::RgbaImage::from_pixel(w, h, image::Rgba([0, 120, 200, 255]))
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn request() -> StoryRequest {
    StoryRequest {
        background: BackgroundSource::from_bytes(png_bytes(2, 2)),
        profile: CustomizationProfile::default(),
        slides: Story::fallback("Acme", "Stop scrolling"),
        naming: NamingScheme::Positional,
        archive_name: None,
        parallel: false,
    }
}

#[test]
fn request_json_defaults() {
    let req = StoryRequest::from_json_str(
        &json!({
            "background": {"path": "bg.png"},
            "slides": [
                {"type": "hook", "text": "a"},
                {"type": "problem", "text": "b"},
                {"type": "solution", "text": "c"},
                {"type": "cta", "text": "d"}
            ]
        })
        .to_string(),
    )
    .unwrap();
    assert_eq!(req.profile, CustomizationProfile::default());
    assert_eq!(req.naming, NamingScheme::Positional);
    assert_eq!(req.archive_name(), "viral-tiktok-slides.zip");
    assert!(!req.parallel);
}

#[test]
fn request_json_accepts_wizard_profile_keys() {
    let req = StoryRequest::from_json_str(
        &json!({
            "background": {"data_url": "data:image/png;base64,AAAA"},
            "profile": {
                "textColor": "#EC4899",
                "fontSize": 60,
                "textPosition": "bottom",
                "overlayOpacity": 0.2
            },
            "slides": [
                {"type": "hook", "text": "a"},
                {"type": "problem", "text": "b"},
                {"type": "solution", "text": "c"},
                {"type": "cta", "text": "d"}
            ],
            "naming": "by_type",
            "archive_name": "mine.zip"
        })
        .to_string(),
    )
    .unwrap();
    assert_eq!(req.profile.font_size, 60.0);
    assert_eq!(req.profile.text_position, TextPosition::Bottom);
    assert_eq!(req.naming, NamingScheme::ByType);
    assert_eq!(req.archive_name(), "mine.zip");
}

#[test]
fn request_json_rejects_unknown_fields_and_short_stories() {
    let unknown = json!({
        "background": {"path": "bg.png"},
        "slides": [],
        "bogus": 1
    });
    assert!(StoryRequest::from_json_str(&unknown.to_string()).is_err());

    let short = json!({
        "background": {"path": "bg.png"},
        "slides": [{"type": "hook", "text": "a"}]
    });
    let err = StoryRequest::from_json_str(&short.to_string()).unwrap_err();
    assert!(matches!(err, SlideError::Validation(_)));
}

#[test]
fn request_file_resolves_background_next_to_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut req = request();
    req.background = BackgroundSource::Path("./img/bg.png".into());
    let path = dir.path().join("story.json");
    std::fs::write(&path, serde_json::to_string(&req).unwrap()).unwrap();

    let loaded = StoryRequest::from_path(&path).unwrap();
    assert_eq!(
        loaded.background,
        BackgroundSource::Path(dir.path().join("img/bg.png"))
    );
}

#[tokio::test]
async fn session_renders_named_archive() {
    let out = Session::default().render(&request()).await.unwrap();
    assert_eq!(out.archive_name, "viral-tiktok-slides.zip");
    assert_eq!(out.rendered.len(), 4);

    let entries = read_entries(&out.zip).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "hook-slide.png",
            "problem-slide.png",
            "solution-slide.png",
            "cta-slide.png"
        ]
    );
    for (entry, slide) in entries.iter().zip(&out.rendered) {
        assert_eq!(entry.data, slide.png);
    }
}

#[tokio::test]
async fn preview_uses_cache_and_checks_index() {
    let session = Session::default();
    let mut cache = PreviewCache::new(FontFace::default(), 4).unwrap();
    let req = request();

    let a = session.preview(&req, 1, &mut cache).await.unwrap();
    let b = session.preview(&req, 1, &mut cache).await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let err = session.preview(&req, 4, &mut cache).await.unwrap_err();
    assert!(matches!(err, SlideError::Validation(_)));
}
