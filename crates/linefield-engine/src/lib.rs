//! Linefield engine crate.
//!
//! This crate owns the CPU geometry pipeline (line generation + line-to-quad
//! expansion) and the platform + GPU runtime pieces the viewer drives it with.

pub mod camera;
pub mod core;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
