use std::io;

use thiserror::Error;

use crate::assets::AssetKey;

/// Why an image could not be produced by an [`ImageSource`](crate::assets::ImageSource).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The source has no image for this key.
    #[error("asset not found: {0}")]
    NotFound(AssetKey),
    /// The source produced something that is not a usable image.
    #[error("invalid asset {key}: {reason}")]
    Invalid { key: AssetKey, reason: String },
    /// The loader thread went away before reporting a result.
    #[error("loader for {0} stopped without a result")]
    Disconnected(AssetKey),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("cannot parse settings {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Top-level failure of the binary.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// The session gave up on a load and the player quit from the failure screen.
    #[error("{0}")]
    Load(#[from] LoadError),
}
