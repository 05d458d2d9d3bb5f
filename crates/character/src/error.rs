use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a RON document from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid value for {field} in {path:?}")]
    Invalid { path: PathBuf, field: &'static str },
}

/// A binding in a mapping context names an input that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("unsupported key {0:?}")]
    UnsupportedKey(String),
    #[error("unsupported mouse button {0:?}")]
    UnsupportedMouseButton(String),
    #[error("unsupported gamepad button {0:?}")]
    UnsupportedGamepadButton(String),
}

pub(crate) fn read_ron<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
