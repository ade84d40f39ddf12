use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    let c: TextColor = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c.rgba(), Rgba8::opaque(255, 0, 0));

    let c: TextColor = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c.rgba(), Rgba8::new(0, 0, 255, 128));

    let c: TextColor = serde_json::from_value(json!("#fff")).unwrap();
    assert_eq!(c.rgba(), Rgba8::WHITE);

    let c: TextColor = serde_json::from_value(json!("A855F7")).unwrap();
    assert_eq!(c.rgba(), Rgba8::opaque(0xa8, 0x55, 0xf7));
}

#[test]
fn parses_presets_case_insensitively() {
    assert_eq!(TextColor::parse("Yellow").unwrap().to_hex(), "#fbbf24");
    assert_eq!(TextColor::parse("red").unwrap().to_hex(), "#ef4444");
    assert_eq!(PRESETS.len(), 8);
}

#[test]
fn parses_normalized_array() {
    let c: TextColor = serde_json::from_value(json!([1.0, 0.0, 0.0, 0.5])).unwrap();
    assert_eq!(c.rgba(), Rgba8::new(255, 0, 0, 128));
    assert!(serde_json::from_value::<TextColor>(json!([1.0])).is_err());
}

#[test]
fn rejects_garbage() {
    assert!(TextColor::parse("#12").is_err());
    assert!(TextColor::parse("#gggggg").is_err());
    assert!(TextColor::parse("chartreuse").is_err());
    assert!(TextColor::parse("#ééé").is_err());
}

#[test]
fn serializes_as_hex() {
    let v = serde_json::to_value(TextColor::default()).unwrap();
    assert_eq!(v, json!("#ffffff"));
    let v = serde_json::to_value(TextColor(Rgba8::new(1, 2, 3, 4))).unwrap();
    assert_eq!(v, json!("#01020304"));
}
