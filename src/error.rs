use std::path::PathBuf;

use thiserror::Error;

/// Errors from the fallible edges of the crate: configuration files and fonts.
///
/// The per-step hooks never return these; they clamp or skip instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {path:?}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to read font file {path:?}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {path:?} is not a usable TrueType/OpenType font")]
    FontParse { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
