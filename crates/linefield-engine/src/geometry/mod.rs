//! CPU-side geometry pipeline.
//!
//! Responsibilities:
//! - fixed-capacity vertex arenas allocated once and reused across frames
//! - procedural line-list generation (a grid of segment-approximated circles)
//! - line-to-quad expansion for screen-space thick lines
//!
//! Convention:
//! - a *line-list* buffer holds independent 2-vertex segments
//! - a *triangle-list* buffer holds independent 3-vertex triangles
//! - buffers are plain CPU memory; the render backend uploads them verbatim

mod buffer;
mod expander;
mod generator;
mod vertex;

pub use buffer::VertexBuffer;
pub use expander::{expand, ColorPolicy, ExpandError, ExpandParams};
pub use generator::CircleGrid;
pub use vertex::Vertex;
