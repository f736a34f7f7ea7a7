use std::time::Instant;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use linefield_engine::camera::{CameraDesc, OrthoCamera};
use linefield_engine::core::{App, AppControl, FrameCtx};
use linefield_engine::geometry::{
    expand, CircleGrid, ColorPolicy, ExpandParams, VertexBuffer,
};
use linefield_engine::render::{LineRenderer, Primitive, RenderBackend};

/// Total vertex budget for one frame. The quad buffer takes all of it; the
/// line buffer a third, since expansion turns every 2 line vertices into 6.
/// The GPU allocation is sized to this once and never grows.
const MAX_VERTICES: usize = 3 * 1024 * 1024;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.12,
    g: 0.12,
    b: 0.12,
    a: 1.0,
};

/// Frame driver configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub scene: CircleGrid,
    /// Perpendicular offset for quad expansion (half the rendered thickness).
    pub half_width: f32,
    pub expand_color: ColorPolicy,
    /// Start in the expanded-quad render path instead of raw lines.
    pub start_expanded: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scene: CircleGrid::default(),
            half_width: 0.0125,
            expand_color: ColorPolicy::default(),
            start_expanded: false,
        }
    }
}

/// The frame driver: owns the camera, both CPU geometry buffers, and the
/// render backend, and sequences generate -> expand -> upload -> draw each
/// frame. One producer and one consumer per buffer per frame, strictly in
/// that order.
pub struct Viewer {
    scene: CircleGrid,
    expand_params: ExpandParams,
    expand_enabled: bool,

    camera: OrthoCamera,
    line_buf: VertexBuffer,
    quad_buf: VertexBuffer,

    backend: LineRenderer,
    backend_ready: bool,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let line_capacity = MAX_VERTICES / 3;
        let demand = config.scene.vertex_demand();
        if demand > line_capacity {
            log::warn!(
                "scene demands {demand} line vertices but capacity is {line_capacity}; \
                 the grid will draw truncated"
            );
        }

        let primitive = if config.start_expanded {
            Primitive::Triangles
        } else {
            Primitive::Lines
        };

        Self {
            scene: config.scene,
            expand_params: ExpandParams {
                half_width: config.half_width,
                color: config.expand_color,
            },
            expand_enabled: config.start_expanded,
            // Real viewport arrives with the first frame.
            camera: OrthoCamera::new(CameraDesc::default(), 1.0, 1.0),
            line_buf: VertexBuffer::with_capacity(line_capacity),
            quad_buf: VertexBuffer::with_capacity(MAX_VERTICES),
            backend: LineRenderer::new(MAX_VERTICES, primitive),
            backend_ready: false,
        }
    }

    fn toggle_expansion(&mut self) {
        self.expand_enabled = !self.expand_enabled;
        log::info!(
            "expansion {}",
            if self.expand_enabled { "on" } else { "off" }
        );
    }

    fn cycle_color_policy(&mut self) {
        self.expand_params.color = match self.expand_params.color {
            ColorPolicy::Tint(_) => ColorPolicy::Preserve,
            ColorPolicy::Preserve => ColorPolicy::default(),
        };
        log::info!("expansion color policy: {:?}", self.expand_params.color);
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event: key, .. } = event {
            if key.state == ElementState::Pressed && !key.repeat {
                match key.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
                    PhysicalKey::Code(KeyCode::KeyE) => self.toggle_expansion(),
                    PhysicalKey::Code(KeyCode::KeyC) => self.cycle_color_policy(),
                    _ => {}
                }
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let size = ctx.window.physical_size();
        self.camera
            .set_viewport(size.width as f32, size.height as f32);

        if !self.backend_ready {
            let rctx = ctx.render_ctx();
            if let Err(err) = self.backend.setup(&rctx) {
                log::error!("render backend setup failed: {err:#}");
                return AppControl::Exit;
            }
            self.backend_ready = true;
        }

        // CPU stage: regenerate the scene, optionally expand it into quads.
        let cpu_start = Instant::now();
        self.scene.generate(&mut self.line_buf);
        let mut use_quads = self.expand_enabled;
        if use_quads {
            if let Err(err) = expand(&self.line_buf, &mut self.quad_buf, &self.expand_params) {
                log::error!("expansion failed, drawing raw lines this frame: {err}");
                use_quads = false;
            }
        }
        let cpu_ms = cpu_start.elapsed().as_secs_f64() * 1000.0;

        self.backend.set_primitive(if use_quads {
            Primitive::Triangles
        } else {
            Primitive::Lines
        });

        // GPU stage: upload the active buffer verbatim, one draw call.
        let active = if use_quads {
            &self.quad_buf
        } else {
            &self.line_buf
        };
        let vertex_count = active.len() as u32;
        let view_proj = self.camera.view_proj_array();

        let backend = &mut self.backend;
        let bytes = active.as_bytes();

        let draw_start = Instant::now();
        let control = ctx.render(CLEAR_COLOR, |rctx, target| {
            backend.update(rctx, bytes);
            backend.render(rctx, target, vertex_count, view_proj);
        });
        let draw_ms = draw_start.elapsed().as_secs_f64() * 1000.0;

        ctx.window.set_title(&format!(
            "linefield - {} {} - cpu {:6.3} ms - draw {:6.3} ms",
            vertex_count,
            if use_quads { "quad verts" } else { "line verts" },
            cpu_ms,
            draw_ms
        ));

        control
    }
}
