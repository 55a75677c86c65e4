//! Error type shared by every fallible operation in the runtime core.
//!
//! Construction-time problems (broken animation definitions, missing sprite
//! sheets, unknown registry ids) are reported through [`RuntimeError`] and are
//! fatal for the object being built. Runtime requests that merely name
//! something unknown, such as an animation state, are silent no-ops instead.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("default animation state '{state}' is not defined")]
    MissingDefaultState { state: String },

    #[error("animation has no frames")]
    EmptyAnimation,

    #[error("failed to read {}: {source}", path.display())]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse frame metadata {}: {source}", path.display())]
    FrameMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("frame {index} in {} lies outside the sprite sheet", path.display())]
    FrameOutOfBounds { path: PathBuf, index: usize },

    #[error("unknown character '{id}'")]
    UnknownCharacter { id: String },

    #[error("unknown screen '{id}'")]
    UnknownScreen { id: String },

    #[error("settings store {}: {reason}", path.display())]
    Settings { path: PathBuf, reason: String },
}
