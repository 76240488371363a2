use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Canvas, FrameIndex, Point, Rgba8};
use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::frames::state::FrameState;
use crate::map::MapScene;
use crate::render::plan::{
    DrawOp, ScenePlan, StaticMap, caption_band, compile_frame, marker_path, marker_stroke_width,
};
use crate::render::style::StyleConfig;
use crate::render::text::{FontFace, TextLayoutEngine, resolve_font};
use crate::render::viewport::Viewport;
use crate::render::{FrameRGBA, FrameRenderer};

struct TextPainter {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
}

/// CPU scene renderer over one reused raster context and surface.
///
/// Static geometry is projected once at construction; every frame resets the context, clears the
/// surface to the background and redraws the whole plan.
pub struct SceneRenderer {
    scene: Arc<MapScene>,
    style: StyleConfig,
    canvas: Canvas,
    statics: StaticMap,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: Option<TextPainter>,
}

impl SceneRenderer {
    /// Build a renderer, resolving the label font from `style.font_path` or the system.
    pub fn new(scene: Arc<MapScene>, style: StyleConfig, canvas: Canvas) -> CityweaveResult<Self> {
        let face = resolve_font(style.font_path.as_deref())?;
        Self::with_font(scene, style, canvas, face)
    }

    /// Build a renderer with an explicit font; `None` skips all text.
    pub fn with_font(
        scene: Arc<MapScene>,
        style: StyleConfig,
        canvas: Canvas,
        face: Option<FontFace>,
    ) -> CityweaveResult<Self> {
        style.validate()?;
        let bounds = scene
            .bounds()
            .ok_or_else(|| CityweaveError::render("map has no states or cities to frame"))?;
        let viewport = Viewport::fit(bounds, canvas, caption_band(&style))?;
        let statics = StaticMap::build(&scene, viewport);

        let (w, h) = surface_dims(canvas)?;
        let text = match face {
            Some(face) => Some(TextPainter {
                engine: TextLayoutEngine::new(&face)?,
                font: vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                    face.index,
                ),
            }),
            None => None,
        };

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            states = scene.states.len(),
            cities = scene.cities.len(),
            edges = scene.edges.len(),
            text = text.is_some(),
            "scene renderer ready"
        );

        Ok(Self {
            scene,
            style,
            canvas,
            statics,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            text,
        })
    }

    pub fn scene(&self) -> &MapScene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        self.statics.viewport()
    }

    /// Compile the draw list for one frame without rasterizing it.
    pub fn compile(&self, frame: &FrameState, caption: Option<&str>) -> CityweaveResult<ScenePlan> {
        compile_frame(&self.statics, &self.scene, frame, &self.style, caption)
    }

    /// Rasterize a compiled plan onto the shared surface and read it back.
    pub fn rasterize(&mut self, plan: &ScenePlan) -> CityweaveResult<FrameRGBA> {
        self.ctx.reset();
        clear_pixmap(&mut self.pixmap, plan.background.to_premul_array());

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(cpu_color(plan.background));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));

        for layer in &plan.layers {
            for op in &layer.ops {
                self.draw_op(op)?;
            }
        }

        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_op(&mut self, op: &DrawOp) -> CityweaveResult<()> {
        let ctx = &mut self.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match op {
            DrawOp::FillPath { path, color } => {
                ctx.set_fill_rule(vello_cpu::peniko::Fill::EvenOdd);
                ctx.set_paint(cpu_color(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
                ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
            }
            DrawOp::StrokePath { path, color, width } => {
                ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(*width).with_join(vello_cpu::kurbo::Join::Round),
                );
                ctx.set_paint(cpu_color(*color));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            DrawOp::Segment {
                from,
                to,
                color,
                width,
            } => {
                let mut line = BezPath::new();
                line.move_to(*from);
                line.line_to(*to);
                ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(*width).with_caps(vello_cpu::kurbo::Cap::Round),
                );
                ctx.set_paint(cpu_color(*color));
                ctx.stroke_path(&bezpath_to_cpu(&line));
            }
            DrawOp::Marker { center, style, .. } => {
                let path = bezpath_to_cpu(&marker_path(style.shape, *center, style.size));
                ctx.set_paint(cpu_color(style.color));
                if style.shape.is_stroked() {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(marker_stroke_width(
                        style.size,
                    )));
                    ctx.stroke_path(&path);
                } else {
                    ctx.fill_path(&path);
                }
            }
            DrawOp::Text {
                text,
                anchor,
                size,
                color,
            } => {
                let Some(painter) = self.text.as_mut() else {
                    return Ok(());
                };
                draw_text(ctx, painter, text, *anchor, *size, *color)?;
            }
        }
        Ok(())
    }
}

impl FrameRenderer for SceneRenderer {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn render(
        &mut self,
        idx: FrameIndex,
        frame: &FrameState,
        caption: &str,
    ) -> CityweaveResult<FrameRGBA> {
        let plan = self.compile(frame, Some(caption))?;
        tracing::debug!(frame = idx.0, ops = plan.op_count(), "rendering frame");
        self.rasterize(&plan)
    }
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    painter: &mut TextPainter,
    text: &str,
    anchor: Point,
    size: f64,
    color: Rgba8,
) -> CityweaveResult<()> {
    let layout = painter.engine.layout_line(text, size as f32, color)?;
    let w = f64::from(layout.width());
    let h = f64::from(layout.height());
    ctx.set_transform(affine_to_cpu(Affine::translate((
        anchor.x - w / 2.0,
        anchor.y - h / 2.0,
    ))));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            ctx.set_paint(cpu_color(run.style().brush));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&painter.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    Ok(())
}

fn surface_dims(canvas: Canvas) -> CityweaveResult<(u16, u16)> {
    let w = u16::try_from(canvas.width)
        .map_err(|_| CityweaveError::render("canvas width exceeds the raster limit"))?;
    let h = u16::try_from(canvas.height)
        .map_err(|_| CityweaveError::render("canvas height exceeds the raster limit"))?;
    Ok((w, h))
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
