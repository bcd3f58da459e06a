//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Why a coordinate pass (or the group of three) could not be built or
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    /// The scene has no active camera. Transient; retried on the next pick.
    CameraUnavailable,
    /// A pass was asked for a zero-sized output.
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The coordinate shader failed to compose or validate.
    Shader(String),
    /// The off-screen target could not be created or read back.
    Target(String),
}

impl PassError {
    /// Whether simply trying again on the next interaction can succeed.
    ///
    /// Shader failures are not retryable as-is; the orchestrator still
    /// attempts a rebuild after the viewport is reconfigured.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::CameraUnavailable | Self::Target(_) => true,
            Self::InvalidSize { .. } | Self::Shader(_) => false,
        }
    }
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CameraUnavailable => write!(f, "no active camera"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid pass size {width}x{height}")
            }
            Self::Shader(msg) => write!(f, "coordinate shader error: {msg}"),
            Self::Target(msg) => write!(f, "render target error: {msg}"),
        }
    }
}

impl std::error::Error for PassError {}

/// Errors produced by the measure-pick crate.
#[derive(Debug)]
pub enum MeasureError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Coordinate pass construction or rendering failure.
    Pass(PassError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Pass(e) => write!(f, "pass error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for MeasureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Pass(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<RenderContextError> for MeasureError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<PassError> for MeasureError {
    fn from(e: PassError) -> Self {
        Self::Pass(e)
    }
}

impl From<std::io::Error> for MeasureError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
