//! cityweave renders graph traversals over US cities as map animations.
//!
//! The flow is:
//!
//! - Load the state outlines, city registry and edge list into a [`MapScene`]
//! - Build a [`SceneRenderer`] for a canvas and [`StyleConfig`]
//! - Let an [`AnimationDriver`] play the frame records through it into a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub mod config;
/// Frame sinks.
pub mod encode;
pub(crate) mod frames;
pub(crate) mod io;
pub(crate) mod map;
pub(crate) mod render;
pub mod run;

pub use crate::foundation::color::parse_color;
pub use crate::foundation::core::{Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rect, Rgba8};
pub use crate::foundation::error::{CityweaveError, CityweaveResult};

pub use crate::animation::driver::{AnimationDriver, AnimationStats, DriverOpts, RunDigest};
pub use crate::config::RunConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, is_ffmpeg_on_path};
pub use crate::encode::gif::GifSink;
pub use crate::encode::png_seq::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::{OutputKind, sink_for_path};
pub use crate::frames::state::{FrameState, FrameStatus, NodeClass};
pub use crate::frames::{FrameFile, load_all, number_frames};
pub use crate::io::cities::{CityCsvSchema, load_cities};
pub use crate::io::frames::discover_frames;
pub use crate::io::read_edge_list;
pub use crate::io::states::{DEFAULT_LABEL_FIELD, load_states};
pub use crate::map::MapScene;
pub use crate::map::cities::{CityNode, CityTable, NodeId};
pub use crate::map::edges::{EdgeGeometry, EdgePair, parse_edge_list};
pub use crate::map::states::{StateGeometry, rect_state};
pub use crate::render::cpu::SceneRenderer;
pub use crate::render::plan::{DrawOp, Layer, ScenePlan, StaticMap, compile_frame, compile_scene};
pub use crate::render::style::{Colormap, MarkerShape, MarkerStyle, StyleConfig};
pub use crate::render::text::{FontFace, resolve_font};
pub use crate::render::viewport::Viewport;
pub use crate::render::{FrameRGBA, FrameRenderer};
