use anyhow::Result;

use super::{RenderCtx, RenderTarget};

/// GPU-side contract the frame driver depends on.
///
/// The driver never touches a concrete backend type: it sets up once, then
/// per frame uploads whichever CPU buffer is active and issues one draw. A
/// backend owns all of its GPU resources.
pub trait RenderBackend {
    /// Allocates GPU-side vertex storage sized to the driver's maximum CPU
    /// buffer capacity and builds pipelines for the current surface format.
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Uploads a CPU geometry buffer verbatim, byte-for-byte.
    fn update(&mut self, ctx: &RenderCtx<'_>, data: &[u8]);

    /// Draws `vertex_count` vertices from the most recent upload using the
    /// given column-major view-projection matrix.
    fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        vertex_count: u32,
        view_proj: [[f32; 4]; 4],
    );
}
