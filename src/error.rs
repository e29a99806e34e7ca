use std::path::PathBuf;

use thiserror::Error;

/// Startup-time failures are fatal and bubble up to `main`; nothing in the
/// steady-state frame loop is expected to produce these.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to load asset {path}: {reason}")]
    AssetLoad { path: PathBuf, reason: String },

    #[error("failed to compile shader program `{name}`: {reason}")]
    ShaderCompile { name: String, reason: String },

    #[error("geometry for `{program}` does not provide attribute `{attribute}`")]
    LayoutMismatch { program: String, attribute: String },

    #[error("failed to create GPU resource `{resource}`: {reason}")]
    GpuResource { resource: &'static str, reason: String },

    /// Unreachable under strict single-owner teardown; logged and ignored
    /// if it ever surfaces.
    #[error("release of GPU resource `{resource}` that was not live")]
    ResourceRelease { resource: &'static str },
}

impl ViewerError {
    pub fn asset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
