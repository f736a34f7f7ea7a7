//! GPU rendering subsystem.
//!
//! The frame driver talks to a [`RenderBackend`]; the backend owns its GPU
//! resources (pipelines, vertex storage, uniforms) and uploads CPU geometry
//! buffers verbatim. [`LineRenderer`] is the wgpu implementation.

mod backend;
mod ctx;
mod lines;

pub use backend::RenderBackend;
pub use ctx::{RenderCtx, RenderTarget};
pub use lines::{LineRenderer, Primitive};
