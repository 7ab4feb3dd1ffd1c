#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{ProductId, ProductSource};

const ASSETS: &str = "https://www.farforrent.com.ua/";

fn scene_with_product_and_text() -> (Scene, ElementId, ElementId) {
    let mut scene = Scene::new();
    let product = scene.add_product_element(ProductSource {
        product_id: ProductId::Number(59),
        name: Some("Крісло".into()),
        image_url: Some("static/images/products/image/59/kreslo-2.jpg".into()),
    });
    let text = scene.add_text_element();
    (scene, product, text)
}

// =============================================================
// resolve_image_url
// =============================================================

#[test]
fn relative_path_drops_static_prefix() {
    assert_eq!(
        resolve_image_url(ASSETS, "static/images/products/image/59/kreslo-2.jpg"),
        "https://www.farforrent.com.ua/images/products/image/59/kreslo-2.jpg"
    );
}

#[test]
fn leading_slash_and_base_without_slash() {
    assert_eq!(resolve_image_url("https://cdn.example", "/static/a.jpg"), "https://cdn.example/a.jpg");
    assert_eq!(resolve_image_url("https://cdn.example/", "images/a.jpg"), "https://cdn.example/images/a.jpg");
}

#[test]
fn absolute_urls_pass_through() {
    assert_eq!(resolve_image_url(ASSETS, "https://img.example/a.png"), "https://img.example/a.png");
    assert_eq!(resolve_image_url(ASSETS, "//img.example/a.png"), "//img.example/a.png");
    assert_eq!(resolve_image_url(ASSETS, "data:image/png;base64,AAAA"), "data:image/png;base64,AAAA");
}

// =============================================================
// display_list
// =============================================================

#[test]
fn empty_scene_has_canvas_properties_only() {
    let list = display_list(&Scene::new(), &UiState::default(), ASSETS);
    assert_eq!((list.width, list.height), (1200.0, 800.0));
    assert_eq!(list.background, "#ffffff");
    assert_eq!(list.zoom, 1.0);
    assert!(list.items.is_empty());
    assert!(list.selection.is_none());
}

#[test]
fn items_follow_paint_order_with_resolved_content() {
    let (scene, product, text) = scene_with_product_and_text();
    let list = display_list(&scene, &UiState::default(), ASSETS);

    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].id, product);
    assert_eq!(list.items[1].id, text);

    assert_eq!(
        list.items[0].content,
        DisplayContent::Image {
            src: Some("https://www.farforrent.com.ua/images/products/image/59/kreslo-2.jpg".into()),
            alt: Some("Крісло".into()),
        }
    );
    let DisplayContent::Text { content, font_size, .. } = &list.items[1].content else {
        panic!("expected text content");
    };
    assert_eq!(content, "Текст тут");
    assert_eq!(*font_size, 24.0);
}

#[test]
fn product_without_image_has_no_src() {
    let mut scene = Scene::new();
    scene.add_product_element(ProductSource { product_id: ProductId::Number(1), name: None, image_url: Some(" ".into()) });
    let list = display_list(&scene, &UiState::default(), ASSETS);
    assert_eq!(list.items[0].content, DisplayContent::Image { src: None, alt: None });
}

#[test]
fn selection_frame_marks_selected_item() {
    let (scene, _, text) = scene_with_product_and_text();
    let list = display_list(&scene, &UiState::default(), ASSETS);

    assert!(!list.items[0].selected);
    assert!(list.items[1].selected);

    let frame = list.selection.unwrap();
    assert_eq!(frame.id, text);
    // Text defaults: 200x50 at (150, 150).
    assert_eq!(frame.corners[0], Point::new(150.0, 150.0));
    assert_eq!(frame.corners[2], Point::new(350.0, 200.0));
    assert_eq!(frame.resize_handles.len(), 8);
    assert_eq!(frame.rotate_handle, Point::new(250.0, 126.0));
}

#[test]
fn editing_hides_selection_frame() {
    let (scene, _, text) = scene_with_product_and_text();
    let ui = UiState { editing_id: Some(text.clone()) };
    let list = display_list(&scene, &ui, ASSETS);
    assert!(list.selection.is_none());
    assert!(list.items[1].editing);
    assert!(list.items[1].selected);
}

// =============================================================
// HandleRegistry
// =============================================================

#[test]
fn registry_insert_get_remove() {
    let mut registry = HandleRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.insert("a", 1).is_none());
    assert_eq!(registry.insert("a", 2), Some(1));
    assert_eq!(registry.get("a"), Some(&2));
    *registry.get_mut("a").unwrap() += 1;
    assert_eq!(registry.remove("a"), Some(3));
    assert!(registry.get("a").is_none());
}

#[test]
fn sync_creates_missing_and_returns_stale() {
    let (mut scene, product, text) = scene_with_product_and_text();
    let mut registry: HandleRegistry<String> = HandleRegistry::new();
    registry.insert("gone", "node-gone".to_owned());

    let removed = registry.sync(&scene, |element| format!("node-{}", element.id));
    assert_eq!(removed, vec![("gone".to_owned(), "node-gone".to_owned())]);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(&product), Some(&format!("node-{product}")));

    scene.delete_element(&text);
    let mut created = 0;
    let removed = registry.sync(&scene, |_| {
        created += 1;
        String::new()
    });
    assert_eq!(created, 0);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].0, text);
    assert_eq!(registry.len(), 1);
}
