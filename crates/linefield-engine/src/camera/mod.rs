//! Camera subsystem.
//!
//! Produces the view-projection matrix the render backend uploads. The
//! projection is tied to the viewport and recomputed only when the viewport
//! actually changes; everything else about the camera is fixed per run.

mod ortho;

pub use ortho::{CameraDesc, OrthoCamera};
