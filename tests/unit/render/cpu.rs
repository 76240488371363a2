use std::path::Path;

use super::*;
use crate::map::cities::{CityNode, CityTable};
use crate::map::edges::EdgePair;
use crate::map::states::rect_state;

fn scene() -> Arc<MapScene> {
    let cities = CityTable::from_nodes(vec![
        CityNode::at(1, 34.0, -118.0),
        CityNode::at(2, 40.7, -74.0),
        CityNode::at(3, 39.7, -105.0),
    ])
    .unwrap();
    let states = vec![
        rect_state("CA", -124.0, 32.0, -114.0, 42.0).unwrap(),
        rect_state("NY", -80.0, 40.0, -72.0, 45.0).unwrap(),
    ];
    Arc::new(MapScene::new(states, cities, &[EdgePair::new(1, 2)]).unwrap())
}

fn renderer() -> SceneRenderer {
    SceneRenderer::with_font(
        scene(),
        StyleConfig::default(),
        Canvas::new(480, 240).unwrap(),
        None,
    )
    .unwrap()
}

fn frame(text: &str) -> FrameState {
    FrameState::parse(text, Path::new("f.txt")).unwrap()
}

fn pixel_at(r: &SceneRenderer, f: &FrameRGBA, lng: f64, lat: f64) -> [u8; 4] {
    let p = r.viewport().project(geo::coord! { x: lng, y: lat });
    f.pixel(p.x.floor() as u32, p.y.floor() as u32).unwrap()
}

fn near(a: [u8; 4], b: Rgba8) -> bool {
    let d = |x: u8, y: u8| (i16::from(x) - i16::from(y)).abs() <= 2;
    d(a[0], b.r) && d(a[1], b.g) && d(a[2], b.b) && d(a[3], b.a)
}

#[test]
fn node_classes_are_painted_in_their_colours() {
    let mut r = renderer();
    let out = r.render(FrameIndex(0), &frame("1 1 0\n2 0 1"), "Frame 0 File: f.txt").unwrap();
    assert_eq!((out.width, out.height), (480, 240));
    assert_eq!(out.data.len(), 480 * 240 * 4);

    let style = StyleConfig::default();
    assert!(near(pixel_at(&r, &out, -118.0, 34.0), style.visited_color));
    assert!(near(pixel_at(&r, &out, -74.0, 40.7), style.ap_color));
}

#[test]
fn articulation_style_wins_for_doubly_flagged_node() {
    let mut r = renderer();
    let out = r.render(FrameIndex(0), &frame("1 1 1\n"), "c").unwrap();
    assert!(near(pixel_at(&r, &out, -118.0, 34.0), StyleConfig::default().ap_color));
}

#[test]
fn state_fill_and_background_show_through() {
    let mut r = renderer();
    let out = r.render(FrameIndex(0), &frame(""), "c").unwrap();
    let style = StyleConfig::default();
    assert!(near(
        pixel_at(&r, &out, -121.0, 39.0),
        style.fill_colormap.color_at(0, 2)
    ));
    assert!(near(out.pixel(0, 0).unwrap(), style.background_color));
}

#[test]
fn normal_marker_darkens_its_neighbourhood() {
    let mut r = renderer();
    let out = r.render(FrameIndex(0), &frame(""), "c").unwrap();
    let p = r.viewport().project(geo::coord! { x: -105.0, y: 39.7 });
    let (cx, cy) = (p.x.floor() as u32, p.y.floor() as u32);
    let mut darkest = 255 * 3;
    for y in cy - 1..=cy + 1 {
        for x in cx - 1..=cx + 1 {
            let px = out.pixel(x, y).unwrap();
            darkest = darkest.min(u32::from(px[0]) + u32::from(px[1]) + u32::from(px[2]));
        }
    }
    assert!(darkest < 255 * 3 - 100, "darkest neighbourhood sum {darkest}");
}

#[test]
fn surface_reuse_leaves_no_residue() {
    let mut reused = renderer();
    let _ = reused.render(FrameIndex(0), &frame("1 1 0\n2 0 1"), "a").unwrap();
    let second = reused.render(FrameIndex(1), &frame("3 1 0\n"), "b").unwrap();

    let mut fresh = renderer();
    let expected = fresh.render(FrameIndex(1), &frame("3 1 0\n"), "b").unwrap();
    assert_eq!(second, expected);
}

#[test]
fn rendering_is_deterministic() {
    let mut a = renderer();
    let mut b = renderer();
    let f = frame("2 1 0\n");
    assert_eq!(
        a.render(FrameIndex(3), &f, "x").unwrap(),
        b.render(FrameIndex(3), &f, "x").unwrap()
    );
}

#[test]
fn unknown_node_fails_before_drawing() {
    let mut r = renderer();
    let err = r.render(FrameIndex(0), &frame("42 1 0\n"), "c").unwrap_err();
    assert!(err.is_reference());
}

#[test]
fn invalid_style_is_rejected_at_construction() {
    let style = StyleConfig {
        edge_alpha: 2.0,
        ..StyleConfig::default()
    };
    assert!(SceneRenderer::with_font(scene(), style, Canvas::default(), None).is_err());
}
