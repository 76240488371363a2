//! JSON run description: input locations, canvas, playback and style.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::animation::driver::DriverOpts;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::io::cities::{CityCsvSchema, load_cities};
use crate::io::read_edge_list;
use crate::io::states::{DEFAULT_LABEL_FIELD, load_states};
use crate::map::MapScene;
use crate::render::style::StyleConfig;

pub const DEFAULT_DATA_ROOT: &str = "../GeoData";
pub const DEFAULT_FRAMES_DIR: &str = "../data/demo_data";
pub const STATES_FILE: &str = "usa-states-census-2014.shp";
pub const CITIES_FILE: &str = "filtered_uscities_data.csv";
pub const EDGES_FILE: &str = "usdemo_graph.txt";

/// Everything needed to produce one animation.
///
/// Every field may be omitted from JSON; relative paths are resolved against the working
/// directory, not the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub states_path: PathBuf,
    pub cities_path: PathBuf,
    pub edges_path: PathBuf,
    pub frames_dir: PathBuf,
    /// `.mp4`, `.gif`, or a directory for PNG frames.
    pub out: Option<PathBuf>,
    /// Figure size in inches, converted with `dpi`. Ignored when `canvas` is set.
    pub figsize: [f64; 2],
    pub dpi: f64,
    pub canvas: Option<Canvas>,
    pub interval_ms: u32,
    pub export_fps: u32,
    pub preload: bool,
    /// Shapefile attribute holding the state label.
    pub label_field: String,
    pub cities_schema: CityCsvSchema,
    pub style: StyleConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let root = Path::new(DEFAULT_DATA_ROOT);
        Self {
            states_path: root.join(STATES_FILE),
            cities_path: root.join(CITIES_FILE),
            edges_path: root.join(EDGES_FILE),
            frames_dir: PathBuf::from(DEFAULT_FRAMES_DIR),
            out: None,
            figsize: [12.0, 5.0],
            dpi: 100.0,
            canvas: None,
            interval_ms: 1000,
            export_fps: 2,
            preload: true,
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            cities_schema: CityCsvSchema::default(),
            style: StyleConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_json_str(s: &str) -> CityweaveResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| CityweaveError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> CityweaveResult<Self> {
        if !path.is_file() {
            return Err(CityweaveError::input(format!(
                "config file '{}' does not exist",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Point the three map inputs at their standard file names under `root`.
    pub fn with_data_root(mut self, root: &Path) -> Self {
        self.states_path = root.join(STATES_FILE);
        self.cities_path = root.join(CITIES_FILE);
        self.edges_path = root.join(EDGES_FILE);
        self
    }

    pub fn validate(&self) -> CityweaveResult<()> {
        self.canvas()?;
        if self.interval_ms == 0 {
            return Err(CityweaveError::input("interval_ms must be > 0"));
        }
        if self.export_fps == 0 {
            return Err(CityweaveError::input("export_fps must be > 0"));
        }
        if self.label_field.trim().is_empty() {
            return Err(CityweaveError::input("label_field must not be empty"));
        }
        self.style.validate()
    }

    /// Output canvas: explicit `canvas`, else `figsize * dpi`.
    pub fn canvas(&self) -> CityweaveResult<Canvas> {
        match self.canvas {
            Some(c) => Canvas::new(c.width, c.height),
            None => Canvas::from_figsize(self.figsize[0], self.figsize[1], self.dpi),
        }
    }

    pub fn driver_opts(&self) -> CityweaveResult<DriverOpts> {
        Ok(DriverOpts {
            frame_interval_ms: self.interval_ms,
            export_fps: Fps::new(self.export_fps, 1)?,
            preload: self.preload,
        })
    }

    /// Load states, cities and edges and resolve them into a scene.
    #[tracing::instrument(skip(self))]
    pub fn load_scene(&self) -> CityweaveResult<MapScene> {
        let states = load_states(&self.states_path, &self.label_field)?;
        let cities = load_cities(&self.cities_path, &self.cities_schema)?;
        let pairs = read_edge_list(&self.edges_path)?;
        let scene = MapScene::new(states, cities, &pairs)?;
        tracing::info!(
            states = scene.states.len(),
            cities = scene.cities.len(),
            edges = scene.edges.len(),
            "map scene ready"
        );
        Ok(scene)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/run_config.rs"]
mod tests;
