//! Error type shared by every pipeline stage.

use std::path::PathBuf;

/// Result alias used across the crate
pub type Result<T, E = DepthError> = std::result::Result<T, E>;

/// Every failure is fatal to the run; the variant records which stage gave up.
#[derive(Debug, thiserror::Error)]
pub enum DepthError {
    /// Wrong command-line usage
    #[error("invalid arguments: {0}")]
    Argument(String),

    /// Camera or output settings violate their contract
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Output directories could not be resolved or created
    #[error("failed to prepare output path {path:?}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mesh file missing, unreadable, unparseable or empty
    #[error("failed to load mesh {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// Render surface could not be created or the capture failed
    #[error("render failed: {0}")]
    Render(String),

    /// An output artifact could not be written
    #[error("failed to write {path:?}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl DepthError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_names_path() {
        let err = DepthError::load("meshes/cube.obj", "no triangles");
        let msg = err.to_string();
        assert!(msg.contains("cube.obj"));
        assert!(msg.contains("no triangles"));
    }

    #[test]
    fn test_path_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DepthError::Path {
            path: PathBuf::from("/ro/depth"),
            source: io,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
