use std::fmt;
use std::path::Path;

use xxhash_rust::xxh3::Xxh3;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{CityweaveError, CityweaveResult};
use crate::frames::state::FrameState;
use crate::frames::{FrameFile, load_all};
use crate::io::frames::discover_frames;
use crate::map::cities::CityTable;
use crate::render::{FrameRGBA, FrameRenderer};

const XXH3_SEED: u64 = 0x63_69_74_79_77_65_61_76;

/// Playback and export settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverOpts {
    /// Display time of each frame (GIF delay).
    pub frame_interval_ms: u32,
    /// Frame rate written into video containers.
    pub export_fps: Fps,
    /// Parse and validate every frame before drawing the first one.
    pub preload: bool,
}

impl Default for DriverOpts {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000,
            export_fps: Fps { num: 2, den: 1 },
            preload: true,
        }
    }
}

/// 128-bit xxh3 digest over every pushed frame, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunDigest {
    pub hi: u64,
    pub lo: u64,
}

impl fmt::Display for RunDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Summary of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationStats {
    pub frames: u64,
    pub digest: RunDigest,
}

struct FrameHasher {
    inner: Xxh3,
}

impl FrameHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_frame(&mut self, frame: &FrameRGBA) {
        self.inner.update(&frame.width.to_le_bytes());
        self.inner.update(&frame.height.to_le_bytes());
        self.inner.update(&frame.data);
    }

    fn finish(self) -> RunDigest {
        let v = self.inner.digest128();
        RunDigest {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Plays frame files `0..N` through a renderer into a sink.
pub struct AnimationDriver {
    files: Vec<FrameFile>,
    opts: DriverOpts,
}

impl AnimationDriver {
    /// `files` must already be in playback order.
    pub fn new(files: Vec<FrameFile>, opts: DriverOpts) -> Self {
        Self { files, opts }
    }

    /// Discover the `*.txt` frame records in `dir`.
    pub fn from_dir(dir: &Path, opts: DriverOpts) -> CityweaveResult<Self> {
        Ok(Self::new(discover_frames(dir)?, opts))
    }

    pub fn frames(&self) -> &[FrameFile] {
        &self.files
    }

    pub fn opts(&self) -> &DriverOpts {
        &self.opts
    }

    /// Render every frame in ascending order and stream it into `sink`.
    ///
    /// Nothing reaches the sink when there are no frames or, in preload mode, when any frame fails
    /// to parse or names a node missing from `cities`. A failure after `begin`, including in `end`,
    /// aborts the sink.
    #[tracing::instrument(skip_all, fields(frames = self.files.len(), preload = self.opts.preload))]
    pub fn run(
        &self,
        cities: &CityTable,
        renderer: &mut dyn FrameRenderer,
        sink: &mut dyn FrameSink,
    ) -> CityweaveResult<AnimationStats> {
        if self.files.is_empty() {
            return Err(CityweaveError::nothing_to_animate("no frame files to play"));
        }
        if self.opts.frame_interval_ms == 0 {
            return Err(CityweaveError::input("frame interval must be > 0 ms"));
        }

        let preloaded = if self.opts.preload {
            let states = load_all(&self.files)?;
            for (file, state) in self.files.iter().zip(&states) {
                validate(file, state, cities)?;
            }
            tracing::debug!(frames = states.len(), "frames preloaded and validated");
            Some(states)
        } else {
            None
        };

        let canvas = renderer.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.opts.export_fps,
            frame_interval_ms: self.opts.frame_interval_ms,
        })?;

        let played = self
            .play(cities, preloaded.as_deref(), renderer, sink)
            .and_then(|digest| sink.end().map(|()| digest));
        match played {
            Ok(digest) => {
                let stats = AnimationStats {
                    frames: self.files.len() as u64,
                    digest,
                };
                tracing::info!(frames = stats.frames, digest = %stats.digest, "animation complete");
                Ok(stats)
            }
            Err(e) => {
                sink.abort();
                Err(e)
            }
        }
    }

    fn play(
        &self,
        cities: &CityTable,
        preloaded: Option<&[FrameState]>,
        renderer: &mut dyn FrameRenderer,
        sink: &mut dyn FrameSink,
    ) -> CityweaveResult<RunDigest> {
        let mut hasher = FrameHasher::new();
        for (i, file) in self.files.iter().enumerate() {
            let loaded;
            let state = match preloaded.and_then(|p| p.get(i)) {
                Some(s) => s,
                None => {
                    loaded = file.load()?;
                    validate(file, &loaded, cities)?;
                    &loaded
                }
            };
            let frame = renderer.render(file.index, state, &file.caption())?;
            hasher.write_frame(&frame);
            sink.push_frame(file.index, &frame)?;
        }
        Ok(hasher.finish())
    }
}

fn validate(file: &FrameFile, state: &FrameState, cities: &CityTable) -> CityweaveResult<()> {
    state.validate_against(cities).map_err(|e| match e {
        CityweaveError::Reference(msg) => {
            CityweaveError::reference(format!("{}: {msg}", file.path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
