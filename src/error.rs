//! Error type shared by every module of the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::display::engine::RenderEngineKind;
use crate::display::DisplayState;
use crate::scene::GeometryId;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("mesh file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported mesh format for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("malformed mesh {}: {reason}", path.display())]
    MeshParse { path: PathBuf, reason: String },

    #[error("failed to load OBJ {}: {source}", path.display())]
    ObjLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("viewport {viewport} references unknown geometry {geometry:?}")]
    UnknownGeometry { viewport: usize, geometry: GeometryId },

    #[error("display driver cannot go from {from:?} to {to:?}")]
    InvalidTransition { from: DisplayState, to: DisplayState },

    #[error("no render engine available (tried {tried:?})")]
    NoRenderEngine { tried: Vec<RenderEngineKind> },

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window surface: {0}")]
    Surface(String),

    #[error("event loop failure: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("render pipeline '{name}' could not be built: {reason}")]
    Pipeline { name: String, reason: String },

    #[error("output of {width}x{height} exceeds the device limit of {max} pixels per side")]
    OutputTooLarge { width: u32, height: u32, max: u32 },

    #[error("GPU readback failed: {0}")]
    Readback(String),

    #[error("failed to write image {}: {reason}", path.display())]
    Image { path: PathBuf, reason: String },
}

impl SceneError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SceneError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SceneError::MeshParse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
