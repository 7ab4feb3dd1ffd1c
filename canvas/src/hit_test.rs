use super::*;
use crate::doc::{ProductId, ProductSource};

const EPSILON: f64 = 1e-9;

fn rect(id: &str, x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Element {
    let source = ProductSource { product_id: ProductId::Number(1), name: None, image_url: None };
    Element { x, y, width, height, rotation, ..Element::product(id.into(), source) }
}

fn scene_of(elements: Vec<Element>) -> Scene {
    Scene::from_parts(elements, "#ffffff".into(), 1.0)
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchor_directions_are_unit_steps() {
    for anchor in ResizeAnchor::ALL {
        let (sx, sy) = anchor.direction();
        assert!([-1.0, 0.0, 1.0].contains(&sx));
        assert!([-1.0, 0.0, 1.0].contains(&sy));
        assert!(sx != 0.0 || sy != 0.0);
    }
}

#[test]
fn anchor_cursors_pair_opposites() {
    assert_eq!(ResizeAnchor::N.cursor(), ResizeAnchor::S.cursor());
    assert_eq!(ResizeAnchor::Ne.cursor(), ResizeAnchor::Sw.cursor());
    assert_eq!(ResizeAnchor::Nw.cursor(), ResizeAnchor::Se.cursor());
    assert_eq!(ResizeAnchor::E.cursor(), "ew-resize");
}

// =============================================================
// Local frame
// =============================================================

#[test]
fn to_local_unrotated_is_center_offset() {
    let element = rect("a", 100.0, 100.0, 200.0, 100.0, 0.0);
    let local = to_local(&element, Point::new(210.0, 140.0));
    assert!(point_approx_eq(local, Point::new(10.0, -10.0)));
}

#[test]
fn to_local_and_to_canvas_are_inverse() {
    let element = rect("a", 40.0, -10.0, 120.0, 60.0, 33.0);
    let p = Point::new(77.0, 12.5);
    assert!(point_approx_eq(to_canvas(&element, to_local(&element, p)), p));
}

#[test]
fn to_canvas_applies_clockwise_rotation() {
    // Rotating 90 degrees clockwise carries the local +x axis onto canvas +y.
    let element = rect("a", 0.0, 0.0, 100.0, 100.0, 90.0);
    let p = to_canvas(&element, Point::new(10.0, 0.0));
    assert!(point_approx_eq(p, Point::new(50.0, 60.0)));
}

// =============================================================
// Body hits
// =============================================================

#[test]
fn hit_inside_body() {
    let scene = scene_of(vec![rect("a", 100.0, 100.0, 200.0, 200.0, 0.0)]);
    let hit = hit_test(Point::new(150.0, 150.0), &scene, 1.0).unwrap();
    assert_eq!(hit, Hit { element_id: "a".into(), part: HitPart::Body });
}

#[test]
fn miss_outside_every_element() {
    let scene = scene_of(vec![rect("a", 100.0, 100.0, 200.0, 200.0, 0.0)]);
    assert!(hit_test(Point::new(50.0, 50.0), &scene, 1.0).is_none());
    assert!(hit_test(Point::new(301.0, 150.0), &scene, 1.0).is_none());
}

#[test]
fn topmost_element_wins() {
    let scene = scene_of(vec![rect("below", 0.0, 0.0, 100.0, 100.0, 0.0), rect("above", 50.0, 50.0, 100.0, 100.0, 0.0)]);
    let hit = hit_test(Point::new(75.0, 75.0), &scene, 1.0).unwrap();
    assert_eq!(hit.element_id, "above");
    let hit = hit_test(Point::new(25.0, 25.0), &scene, 1.0).unwrap();
    assert_eq!(hit.element_id, "below");
}

#[test]
fn rotated_body_uses_rotated_bounds() {
    // 200x50 bar centered at (100, 25), stood upright.
    let scene = scene_of(vec![rect("bar", 0.0, 0.0, 200.0, 50.0, 90.0)]);
    assert!(hit_test(Point::new(100.0, 110.0), &scene, 1.0).is_some());
    assert!(hit_test(Point::new(180.0, 25.0), &scene, 1.0).is_none());
}

#[test]
fn zero_size_element_only_hits_its_point() {
    let element = rect("dot", 10.0, 10.0, 0.0, 0.0, 0.0);
    assert!(contains_point(&element, Point::new(10.0, 10.0)));
    assert!(!contains_point(&element, Point::new(10.5, 10.0)));
}

// =============================================================
// Handles
// =============================================================

#[test]
fn handles_only_on_selected_element() {
    let mut scene = scene_of(vec![rect("a", 100.0, 100.0, 200.0, 200.0, 0.0)]);
    let near_corner = Point::new(96.0, 96.0);
    assert!(hit_test(near_corner, &scene, 1.0).is_none());

    scene.select(Some("a"));
    let hit = hit_test(near_corner, &scene, 1.0).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Nw));
}

#[test]
fn every_resize_handle_is_reachable() {
    let mut scene = scene_of(vec![rect("a", 100.0, 100.0, 200.0, 200.0, 0.0)]);
    scene.select(Some("a"));
    let element = scene.element("a").unwrap().clone();
    for anchor in ResizeAnchor::ALL {
        let p = to_canvas(&element, resize_handle_local(&element, anchor));
        let hit = hit_test(p, &scene, 1.0).unwrap();
        assert_eq!(hit.part, HitPart::ResizeHandle(anchor), "{anchor:?}");
    }
}

#[test]
fn rotate_handle_sits_above_top_edge() {
    let mut scene = scene_of(vec![rect("a", 100.0, 100.0, 200.0, 200.0, 0.0)]);
    scene.select(Some("a"));
    let hit = hit_test(Point::new(200.0, 76.0), &scene, 1.0).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn handle_size_is_constant_on_screen() {
    let mut scene = scene_of(vec![rect("a", 100.0, 100.0, 200.0, 200.0, 0.0)]);
    scene.select(Some("a"));
    // At 2x zoom the rotate handle moves to 12 canvas px above the edge with a 4 px radius.
    assert!(hit_test(Point::new(200.0, 76.0), &scene, 2.0).is_none());
    let hit = hit_test(Point::new(200.0, 88.0), &scene, 2.0).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn rotate_handle_follows_rotation() {
    let mut scene = scene_of(vec![rect("a", 100.0, 100.0, 200.0, 200.0, 90.0)]);
    scene.select(Some("a"));
    // Above-center handle swings to the right of center when rotated clockwise.
    let hit = hit_test(Point::new(324.0, 200.0), &scene, 1.0).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn selected_handles_beat_bodies_above() {
    let mut scene = scene_of(vec![rect("a", 0.0, 0.0, 100.0, 100.0, 0.0), rect("b", 90.0, 90.0, 100.0, 100.0, 0.0)]);
    scene.select(Some("a"));
    let hit = hit_test(Point::new(100.0, 100.0), &scene, 1.0).unwrap();
    assert_eq!(hit, Hit { element_id: "a".into(), part: HitPart::ResizeHandle(ResizeAnchor::Se) });
}
