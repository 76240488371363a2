use std::path::Path;

use super::*;
use crate::foundation::core::Canvas;
use crate::map::cities::{CityNode, CityTable};
use crate::map::edges::EdgePair;
use crate::map::states::rect_state;

fn scene() -> MapScene {
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
    MapScene::new(states, cities, &[EdgePair::new(1, 2)]).unwrap()
}

fn viewport(scene: &MapScene, style: &StyleConfig) -> Viewport {
    Viewport::fit(scene.bounds().unwrap(), Canvas::default(), caption_band(style)).unwrap()
}

fn frame(text: &str) -> FrameState {
    FrameState::parse(text, Path::new("f.txt")).unwrap()
}

#[test]
fn layers_come_out_back_to_front() {
    let scene = scene();
    let style = StyleConfig::default();
    let plan = compile_scene(&scene, &frame(""), &style, viewport(&scene, &style), Some("Frame 0"))
        .unwrap();
    let order: Vec<Layer> = plan.layers.iter().map(|l| l.layer).collect();
    assert_eq!(order, Layer::ORDER.to_vec());
    assert_eq!(plan.layer(Layer::Fill).len(), 2);
    assert_eq!(plan.layer(Layer::Boundaries).len(), 2);
    assert_eq!(plan.layer(Layer::Labels).len(), 2);
    assert_eq!(plan.layer(Layer::Edges).len(), 1);
    assert_eq!(plan.layer(Layer::Caption).len(), 1);
    assert_eq!(plan.background, style.background_color);
}

#[test]
fn worked_example_partitions_nodes_by_class() {
    let scene = scene();
    let style = StyleConfig::default();
    let plan = compile_scene(
        &scene,
        &frame("1 1 0\n2 0 1"),
        &style,
        viewport(&scene, &style),
        None,
    )
    .unwrap();
    assert_eq!(plan.nodes_in(Layer::NormalNodes), vec![NodeId(3)]);
    assert_eq!(plan.nodes_in(Layer::VisitedNodes), vec![NodeId(1)]);
    assert_eq!(plan.nodes_in(Layer::ArticulationNodes), vec![NodeId(2)]);
    assert!(plan.layer(Layer::Caption).is_empty());

    let Some(DrawOp::Marker { style: m, .. }) = plan.layer(Layer::ArticulationNodes).first() else {
        panic!("missing articulation marker");
    };
    assert_eq!(m.color, style.ap_color);
}

#[test]
fn articulation_flag_wins_over_visited() {
    let scene = scene();
    let style = StyleConfig::default();
    let plan = compile_scene(&scene, &frame("2 1 1\n"), &style, viewport(&scene, &style), None)
        .unwrap();
    assert!(plan.nodes_in(Layer::VisitedNodes).is_empty());
    assert_eq!(plan.nodes_in(Layer::ArticulationNodes), vec![NodeId(2)]);
    assert!(!plan.nodes_in(Layer::NormalNodes).contains(&NodeId(2)));
}

#[test]
fn edge_endpoints_are_projected_city_positions() {
    let scene = scene();
    let style = StyleConfig::default();
    let vp = viewport(&scene, &style);
    let plan = compile_scene(&scene, &frame(""), &style, vp, None).unwrap();
    let DrawOp::Segment { from, to, color, .. } = &plan.layer(Layer::Edges)[0] else {
        panic!("expected a segment");
    };
    assert_eq!(*from, vp.project(geo::coord! { x: -118.0, y: 34.0 }));
    assert_eq!(*to, vp.project(geo::coord! { x: -74.0, y: 40.7 }));
    assert_eq!(*color, style.edge_paint());
}

#[test]
fn unknown_frame_node_is_a_reference_error() {
    let scene = scene();
    let style = StyleConfig::default();
    let err = compile_scene(&scene, &frame("9 1 0\n"), &style, viewport(&scene, &style), None)
        .unwrap_err();
    assert!(err.is_reference());
}

#[test]
fn static_paths_are_shared_between_frames() {
    let scene = scene();
    let style = StyleConfig::default();
    let statics = StaticMap::build(&scene, viewport(&scene, &style));
    let a = compile_frame(&statics, &scene, &frame("1 1 0\n"), &style, None).unwrap();
    let b = compile_frame(&statics, &scene, &frame("2 0 1\n"), &style, None).unwrap();
    let (DrawOp::FillPath { path: pa, .. }, DrawOp::FillPath { path: pb, .. }) =
        (&a.layer(Layer::Fill)[0], &b.layer(Layer::Fill)[0])
    else {
        panic!("expected fills");
    };
    assert!(Arc::ptr_eq(pa, pb));
}

#[test]
fn labels_can_be_hidden() {
    let scene = scene();
    let style = StyleConfig {
        show_labels: false,
        ..StyleConfig::default()
    };
    let plan = compile_scene(&scene, &frame(""), &style, viewport(&scene, &style), None).unwrap();
    assert!(plan.layer(Layer::Labels).is_empty());
}

#[test]
fn marker_paths_stay_within_their_size() {
    use kurbo::Shape as _;
    let c = Point::new(50.0, 50.0);
    for shape in [
        MarkerShape::Circle,
        MarkerShape::Cross,
        MarkerShape::Plus,
        MarkerShape::Star,
        MarkerShape::Square,
        MarkerShape::Triangle,
        MarkerShape::Diamond,
    ] {
        let bb = marker_path(shape, c, 10.0).bounding_box();
        assert!(bb.x0 >= 44.9 && bb.x1 <= 55.1, "{shape:?}: {bb:?}");
        assert!(bb.y0 >= 44.9 && bb.y1 <= 55.1, "{shape:?}: {bb:?}");
    }
    assert_eq!(marker_stroke_width(4.0), 1.0);
    assert_eq!(marker_stroke_width(10.0), 2.0);
}
