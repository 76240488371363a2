use std::sync::Arc;

use crate::foundation::core::{BezPath, Point, Rgba8};
use crate::foundation::error::CityweaveResult;
use crate::frames::state::{FrameState, NodeClass};
use crate::map::MapScene;
use crate::map::cities::NodeId;
use crate::render::style::{MarkerShape, MarkerStyle, StyleConfig};
use crate::render::viewport::Viewport;

/// Draw layers, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Fill,
    Boundaries,
    Labels,
    NormalNodes,
    Edges,
    VisitedNodes,
    ArticulationNodes,
    Caption,
}

impl Layer {
    pub const ORDER: [Layer; 8] = [
        Layer::Fill,
        Layer::Boundaries,
        Layer::Labels,
        Layer::NormalNodes,
        Layer::Edges,
        Layer::VisitedNodes,
        Layer::ArticulationNodes,
        Layer::Caption,
    ];

    /// Marker layer a node of `class` is drawn in.
    pub fn for_class(class: NodeClass) -> Self {
        match class {
            NodeClass::Normal => Layer::NormalNodes,
            NodeClass::Visited => Layer::VisitedNodes,
            NodeClass::Articulation => Layer::ArticulationNodes,
        }
    }
}

/// One primitive in pixel space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillPath {
        path: Arc<BezPath>,
        color: Rgba8,
    },
    StrokePath {
        path: Arc<BezPath>,
        color: Rgba8,
        width: f64,
    },
    Marker {
        node: NodeId,
        center: Point,
        style: MarkerStyle,
    },
    Segment {
        from: Point,
        to: Point,
        color: Rgba8,
        width: f64,
    },
    /// Single line of text centred on `anchor`.
    Text {
        text: String,
        anchor: Point,
        size: f64,
        color: Rgba8,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerOps {
    pub layer: Layer,
    pub ops: Vec<DrawOp>,
}

/// Ordered draw list for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePlan {
    pub background: Rgba8,
    pub layers: Vec<LayerOps>,
}

impl ScenePlan {
    pub fn layer(&self, layer: Layer) -> &[DrawOp] {
        self.layers
            .iter()
            .find(|l| l.layer == layer)
            .map_or(&[], |l| l.ops.as_slice())
    }

    /// Nodes with a marker in `layer`, in draw order.
    pub fn nodes_in(&self, layer: Layer) -> Vec<NodeId> {
        self.layer(layer)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Marker { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    pub fn op_count(&self) -> usize {
        self.layers.iter().map(|l| l.ops.len()).sum()
    }
}

/// Projected geometry that never changes between frames.
#[derive(Clone, Debug)]
pub struct StaticMap {
    viewport: Viewport,
    state_paths: Vec<Arc<BezPath>>,
    label_anchors: Vec<(String, Point)>,
    city_points: Vec<(NodeId, Point)>,
    segments: Vec<(Point, Point)>,
}

impl StaticMap {
    pub fn build(scene: &MapScene, viewport: Viewport) -> Self {
        let state_paths = scene
            .states
            .iter()
            .map(|s| Arc::new(multipolygon_path(&s.geometry, &viewport)))
            .collect();
        let label_anchors = scene
            .states
            .iter()
            .map(|s| (s.label.clone(), viewport.project(s.centroid.0)))
            .collect();
        let city_points = scene
            .cities
            .iter()
            .map(|c| (c.id, viewport.project(c.coord())))
            .collect();
        let segments = scene
            .edges
            .segments()
            .iter()
            .map(|l| (viewport.project(l.start), viewport.project(l.end)))
            .collect();
        Self {
            viewport,
            state_paths,
            label_anchors,
            city_points,
            segments,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

/// Height of the caption band above the map.
pub fn caption_band(style: &StyleConfig) -> f64 {
    style.caption_size * 2.0
}

/// Compile one frame against prebuilt static geometry.
///
/// Every node listed in `frame` must exist in the scene's city table.
pub fn compile_frame(
    statics: &StaticMap,
    scene: &MapScene,
    frame: &FrameState,
    style: &StyleConfig,
    caption: Option<&str>,
) -> CityweaveResult<ScenePlan> {
    frame.validate_against(&scene.cities)?;

    let mut layers: Vec<LayerOps> = Layer::ORDER
        .iter()
        .map(|&layer| LayerOps {
            layer,
            ops: Vec::new(),
        })
        .collect();
    // `layers` follows `Layer::ORDER`, so a layer's discriminant is its slot.
    let slot = |layer: Layer| layer as usize;

    let n_states = statics.state_paths.len();
    let fill = slot(Layer::Fill);
    for (i, path) in statics.state_paths.iter().enumerate() {
        layers[fill].ops.push(DrawOp::FillPath {
            path: Arc::clone(path),
            color: style.fill_colormap.color_at(i, n_states),
        });
    }
    if style.boundary_linewidth > 0.0 {
        let b = slot(Layer::Boundaries);
        for path in &statics.state_paths {
            layers[b].ops.push(DrawOp::StrokePath {
                path: Arc::clone(path),
                color: style.boundary_color,
                width: style.boundary_linewidth,
            });
        }
    }
    if style.show_labels && style.label_size > 0.0 {
        let l = slot(Layer::Labels);
        for (label, anchor) in &statics.label_anchors {
            layers[l].ops.push(DrawOp::Text {
                text: label.clone(),
                anchor: *anchor,
                size: style.label_size,
                color: style.label_color,
            });
        }
    }

    // Cities absent from the frame are normal; listed ones go by class.
    let normal = slot(Layer::NormalNodes);
    let marker = style.normal();
    for &(id, center) in &statics.city_points {
        if frame.status(id).class() == NodeClass::Normal && marker.size > 0.0 {
            layers[normal].ops.push(DrawOp::Marker {
                node: id,
                center,
                style: marker,
            });
        }
    }

    let e = slot(Layer::Edges);
    if style.edge_linewidth > 0.0 {
        let color = style.edge_paint();
        for &(from, to) in &statics.segments {
            layers[e].ops.push(DrawOp::Segment {
                from,
                to,
                color,
                width: style.edge_linewidth,
            });
        }
    }

    for (id, status) in frame.iter() {
        let class = status.class();
        let marker = match class {
            NodeClass::Normal => continue,
            NodeClass::Visited => style.visited(),
            NodeClass::Articulation => style.articulation(),
        };
        let city = scene.cities.lookup(id)?;
        let idx = slot(Layer::for_class(class));
        layers[idx].ops.push(DrawOp::Marker {
            node: id,
            center: statics.viewport.project(city.coord()),
            style: marker,
        });
    }

    if let Some(text) = caption
        && style.caption_size > 0.0
    {
        let plot = statics.viewport.plot_area();
        let c = slot(Layer::Caption);
        layers[c].ops.push(DrawOp::Text {
            text: text.to_string(),
            anchor: Point::new(plot.center().x, plot.y0 / 2.0),
            size: style.caption_size,
            color: style.caption_color,
        });
    }

    Ok(ScenePlan {
        background: style.background_color,
        layers,
    })
}

/// One-shot compile: projects the static geometry, then compiles the frame.
pub fn compile_scene(
    scene: &MapScene,
    frame: &FrameState,
    style: &StyleConfig,
    viewport: Viewport,
    caption: Option<&str>,
) -> CityweaveResult<ScenePlan> {
    let statics = StaticMap::build(scene, viewport);
    compile_frame(&statics, scene, frame, style, caption)
}

fn multipolygon_path(mp: &geo::MultiPolygon<f64>, vp: &Viewport) -> BezPath {
    let mut path = BezPath::new();
    let mut ring = |ls: &geo::LineString<f64>| {
        let mut pts = ls.coords().map(|c| vp.project(*c));
        if let Some(first) = pts.next() {
            path.move_to(first);
            for p in pts {
                path.line_to(p);
            }
            path.close_path();
        }
    };
    for poly in &mp.0 {
        ring(poly.exterior());
        for hole in poly.interiors() {
            ring(hole);
        }
    }
    path
}

/// Outline of a marker of diameter `size` centred on `c`.
pub fn marker_path(shape: MarkerShape, c: Point, size: f64) -> BezPath {
    let r = size / 2.0;
    let mut p = BezPath::new();
    let poly = |p: &mut BezPath, pts: &[(f64, f64)]| {
        for (i, &(x, y)) in pts.iter().enumerate() {
            let pt = Point::new(c.x + x, c.y + y);
            if i == 0 {
                p.move_to(pt);
            } else {
                p.line_to(pt);
            }
        }
        p.close_path();
    };
    match shape {
        MarkerShape::Circle => {
            use kurbo::Shape as _;
            return kurbo::Circle::new(c, r).to_path(0.1);
        }
        MarkerShape::Square => poly(&mut p, &[(-r, -r), (r, -r), (r, r), (-r, r)]),
        MarkerShape::Diamond => poly(&mut p, &[(0.0, -r), (r, 0.0), (0.0, r), (-r, 0.0)]),
        MarkerShape::Triangle => {
            let h = r * 3f64.sqrt() / 2.0;
            poly(&mut p, &[(0.0, -r), (h, r / 2.0), (-h, r / 2.0)]);
        }
        MarkerShape::Star => {
            let inner = r * 0.4;
            let pts: Vec<(f64, f64)> = (0..10)
                .map(|i| {
                    let a = std::f64::consts::PI * (i as f64) / 5.0 - std::f64::consts::FRAC_PI_2;
                    let rr = if i % 2 == 0 { r } else { inner };
                    (rr * a.cos(), rr * a.sin())
                })
                .collect();
            poly(&mut p, &pts);
        }
        MarkerShape::Cross => {
            let d = r * std::f64::consts::FRAC_1_SQRT_2;
            p.move_to(Point::new(c.x - d, c.y - d));
            p.line_to(Point::new(c.x + d, c.y + d));
            p.move_to(Point::new(c.x - d, c.y + d));
            p.line_to(Point::new(c.x + d, c.y - d));
        }
        MarkerShape::Plus => {
            p.move_to(Point::new(c.x - r, c.y));
            p.line_to(Point::new(c.x + r, c.y));
            p.move_to(Point::new(c.x, c.y - r));
            p.line_to(Point::new(c.x, c.y + r));
        }
    }
    p
}

/// Stroke width for line-only markers.
pub fn marker_stroke_width(size: f64) -> f64 {
    (size / 5.0).max(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
