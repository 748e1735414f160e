//! On-screen helpers drawn on top of a viewport's scene

pub mod axes_gizmo;

pub use axes_gizmo::{AxesGizmo, AxisDirection};
