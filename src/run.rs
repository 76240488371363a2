//! End-to-end entry points used by the CLI.

use std::path::Path;
use std::sync::Arc;

use crate::animation::driver::{AnimationDriver, AnimationStats};
use crate::config::RunConfig;
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::png_seq::write_png;
use crate::encode::sink_for_path;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::frames::FrameFile;
use crate::frames::state::FrameState;
use crate::map::MapScene;
use crate::render::FrameRenderer;
use crate::render::cpu::SceneRenderer;

fn build_renderer(cfg: &RunConfig) -> CityweaveResult<(Arc<MapScene>, SceneRenderer)> {
    cfg.validate()?;
    let scene = Arc::new(cfg.load_scene()?);
    let renderer = SceneRenderer::new(Arc::clone(&scene), cfg.style.clone(), cfg.canvas()?)?;
    Ok((scene, renderer))
}

/// Play every frame in `cfg.frames_dir` into `out` (format chosen by extension).
#[tracing::instrument(skip(cfg))]
pub fn render_animation(cfg: &RunConfig, out: &Path) -> CityweaveResult<AnimationStats> {
    let driver = AnimationDriver::from_dir(&cfg.frames_dir, cfg.driver_opts()?)?;
    if driver.frames().is_empty() {
        return Err(CityweaveError::nothing_to_animate(format!(
            "no *.txt frame records in '{}'",
            cfg.frames_dir.display()
        )));
    }
    let (scene, mut renderer) = build_renderer(cfg)?;
    let mut sink = sink_for_path(out, cfg.style.background_color);
    driver.run(&scene.cities, &mut renderer, sink.as_mut())
}

/// Render a single frame record to a PNG, captioned as frame `index`.
#[tracing::instrument(skip(cfg))]
pub fn render_frame_png(
    cfg: &RunConfig,
    frame_path: &Path,
    index: u64,
    out: &Path,
) -> CityweaveResult<()> {
    let file = FrameFile {
        index: FrameIndex(index),
        path: frame_path.to_path_buf(),
    };
    let state = file.load()?;
    let (_, mut renderer) = build_renderer(cfg)?;
    let frame = renderer.render(file.index, &state, &file.caption())?;
    ensure_parent_dir(out)?;
    write_png(out, &frame)
}

/// Render the map with every city in its normal style and no caption.
#[tracing::instrument(skip(cfg))]
pub fn render_map_png(cfg: &RunConfig, out: &Path) -> CityweaveResult<()> {
    let (_, mut renderer) = build_renderer(cfg)?;
    let plan = renderer.compile(&FrameState::new(), None)?;
    let frame = renderer.rasterize(&plan)?;
    ensure_parent_dir(out)?;
    write_png(out, &frame)
}
