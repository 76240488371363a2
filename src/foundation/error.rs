use std::path::{Path, PathBuf};

/// Convenience result type used across cityweave.
pub type CityweaveResult<T> = Result<T, CityweaveError>;

/// Top-level error taxonomy.
///
/// Every variant is fatal for a run: the inputs are a fixed, already-computed dataset, so there
/// is nothing to retry and no meaningful degraded output.
#[derive(thiserror::Error, Debug)]
pub enum CityweaveError {
    /// Missing or invalid source files, wrong extensions, bad configuration values.
    #[error("input error: {0}")]
    Input(String),

    /// An edge or frame entry references a node id the city table does not contain.
    #[error("reference error: {0}")]
    Reference(String),

    /// Malformed line in an edge list or frame file.
    #[error("parse error: {}:{line}: {msg}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// 1-based physical line number.
        line: usize,
        /// What was wrong with the line.
        msg: String,
    },

    /// The frame record set is empty.
    #[error("nothing to animate: {0}")]
    NothingToAnimate(String),

    /// Failures while compiling or rasterizing a scene.
    #[error("render error: {0}")]
    Render(String),

    /// Failures while writing an output destination.
    #[error("export error: {}: {msg}", path.display())]
    Export {
        /// Output destination.
        path: PathBuf,
        /// What went wrong.
        msg: String,
    },

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CityweaveError {
    /// Build a [`CityweaveError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`CityweaveError::Reference`] value.
    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference(msg.into())
    }

    /// Build a [`CityweaveError::Parse`] value.
    pub fn parse(path: impl AsRef<Path>, line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            line,
            msg: msg.into(),
        }
    }

    /// Build a [`CityweaveError::NothingToAnimate`] value.
    pub fn nothing_to_animate(msg: impl Into<String>) -> Self {
        Self::NothingToAnimate(msg.into())
    }

    /// Build a [`CityweaveError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CityweaveError::Export`] value.
    pub fn export(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::Export {
            path: path.as_ref().to_path_buf(),
            msg: msg.into(),
        }
    }

    /// Build a [`CityweaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for referential integrity failures.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
