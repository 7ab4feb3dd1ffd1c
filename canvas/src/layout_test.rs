#![allow(clippy::float_cmp)]

use serde_json::json;
use time::macros::datetime;

use super::*;
use crate::doc::{ProductId, ProductSource};

fn sample_scene() -> Scene {
    let mut scene = Scene::new();
    let product = scene.add_product_element(ProductSource {
        product_id: ProductId::Number(7),
        name: Some("Стіл".into()),
        image_url: Some("static/images/products/image/7/stil.jpg".into()),
    });
    scene.move_element(&product, 50.0, -20.0);
    scene.rotate_element(&product, 30.0);
    let text = scene.add_text_element();
    scene.set_text(&text, "Привіт").unwrap();
    scene.set_background("#f5f5dc").unwrap();
    scene.set_zoom(1.2);
    scene
}

// --- capture / restore ---

#[test]
fn from_scene_copies_everything_and_stamps_time() {
    let scene = sample_scene();
    let at = datetime!(2024-05-01 12:30:00 UTC);
    let doc = LayoutDocument::from_scene(&scene, at);

    assert_eq!(doc.elements, scene.elements());
    assert_eq!(doc.background, "#f5f5dc");
    assert_eq!(doc.zoom, 1.2);
    assert_eq!(doc.updated_at, Some(at));
}

#[test]
fn capture_then_restore_reproduces_scene_content() {
    let scene = sample_scene();
    let restored = LayoutDocument::capture(&scene).into_scene();

    assert_eq!(restored.elements(), scene.elements());
    assert_eq!(restored.background(), scene.background());
    assert_eq!(restored.zoom(), scene.zoom());
    assert!(restored.selected().is_none());
}

#[test]
fn json_round_trip_keeps_unicode_text() {
    let scene = sample_scene();
    let raw = serde_json::to_string(&LayoutDocument::capture(&scene)).unwrap();
    let decoded: LayoutDocument = serde_json::from_str(&raw).unwrap();
    let restored = Scene::from(decoded);

    let text = restored.elements().iter().find_map(Element::as_text).unwrap();
    assert_eq!(text.content, "Привіт");
}

#[test]
fn fractional_geometry_survives_json_text_exactly() {
    let mut elements = Vec::new();
    let mut pinned = Element::text("text-pinned".into());
    pinned.x = 7902.3626373626375;
    pinned.y = 0.1 + 0.2;
    elements.push(pinned);
    for n in 1..=500 {
        let mut element = Element::text(format!("text-{n}"));
        element.x = 7800.0 + f64::from(n) / 91.0;
        element.y = f64::from(n) / 7.0;
        element.width = 200.0 + f64::from(n) / 13.0;
        element.height = 50.0 / 3.0;
        element.rotation = f64::from(n) / 3.0;
        elements.push(element);
    }
    let scene = Scene::from_parts(elements, "#ffffff".into(), 1.0);

    let raw = serde_json::to_string(&LayoutDocument::capture(&scene)).unwrap();
    let restored = Scene::from(serde_json::from_str::<LayoutDocument>(&raw).unwrap());

    assert_eq!(restored.elements(), scene.elements());
    assert_eq!(restored.element("text-pinned").unwrap().x, 7902.3626373626375);
}

#[test]
fn moved_product_keeps_position_through_json() {
    let scene = sample_scene();
    let value = serde_json::to_value(LayoutDocument::capture(&scene)).unwrap();
    let product = &value["elements"][0];
    assert_eq!(product["type"], "product");
    assert_eq!(product["x"], 150.0);
    assert_eq!(product["y"], 80.0);
    assert_eq!(product["rotation"], 30.0);
}

#[test]
fn serializes_camel_case_with_rfc3339_timestamp() {
    let doc = LayoutDocument::from_scene(&Scene::new(), datetime!(2024-05-01 12:30:00 UTC));
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value, json!({
        "elements": [],
        "background": "#ffffff",
        "zoom": 1.0,
        "updatedAt": "2024-05-01T12:30:00Z",
    }));
}

#[test]
fn missing_fields_use_defaults() {
    let doc: LayoutDocument = serde_json::from_value(json!({})).unwrap();
    assert_eq!(doc, LayoutDocument::default());
    let scene = doc.into_scene();
    assert!(scene.is_empty());
    assert_eq!(scene.background(), "#ffffff");
    assert_eq!(scene.zoom(), 1.0);
}

#[test]
fn out_of_range_zoom_is_clamped_on_restore() {
    let doc: LayoutDocument = serde_json::from_value(json!({ "zoom": 3.5 })).unwrap();
    assert_eq!(doc.into_scene().zoom(), 2.0);
}

// --- decode_stored ---

#[test]
fn decode_absent_or_null_is_none() {
    assert!(LayoutDocument::decode_stored(None).unwrap().is_none());
    assert!(LayoutDocument::decode_stored(Some(&Value::Null)).unwrap().is_none());
    assert!(LayoutDocument::decode_stored(Some(&json!("  "))).unwrap().is_none());
}

#[test]
fn decode_object() {
    let stored = json!({
        "elements": [
            { "id": "text-1", "type": "text", "x": 150, "y": 150, "width": 200, "height": 50, "content": "Hi" }
        ],
        "background": "#f5f5dc",
        "zoom": 0.8,
    });
    let doc = LayoutDocument::decode_stored(Some(&stored)).unwrap().unwrap();
    assert_eq!(doc.elements.len(), 1);
    assert_eq!(doc.background, "#f5f5dc");
    assert_eq!(doc.zoom, 0.8);
    assert!(doc.updated_at.is_none());
}

#[test]
fn decode_json_string() {
    let stored = json!(r##"{"elements":[],"background":"#000000","zoom":1.5,"updatedAt":"2024-01-02T03:04:05Z"}"##);
    let doc = LayoutDocument::decode_stored(Some(&stored)).unwrap().unwrap();
    assert_eq!(doc.background, "#000000");
    assert_eq!(doc.zoom, 1.5);
    assert_eq!(doc.updated_at, Some(datetime!(2024-01-02 03:04:05 UTC)));
}

#[test]
fn decode_malformed_is_error() {
    let stored = json!({ "elements": "nope" });
    assert!(matches!(LayoutDocument::decode_stored(Some(&stored)), Err(LayoutError::Decode(_))));

    let stored = json!("{not json");
    assert!(matches!(LayoutDocument::decode_stored(Some(&stored)), Err(LayoutError::Decode(_))));
}

#[test]
fn decode_wrong_json_type_is_error() {
    assert!(matches!(
        LayoutDocument::decode_stored(Some(&json!([1, 2]))),
        Err(LayoutError::UnexpectedType("array"))
    ));
    assert!(matches!(
        LayoutDocument::decode_stored(Some(&json!(42))),
        Err(LayoutError::UnexpectedType("number"))
    ));
}
