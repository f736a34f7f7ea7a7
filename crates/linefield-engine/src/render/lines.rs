use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::geometry::Vertex;
use crate::render::{RenderBackend, RenderCtx, RenderTarget};

/// Primitive interpretation of the uploaded vertex stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    /// Independent 2-vertex segments.
    Lines,
    /// Independent 3-vertex triangles (expanded quads).
    Triangles,
}

impl Primitive {
    fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Primitive::Lines => wgpu::PrimitiveTopology::LineList,
            Primitive::Triangles => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

/// Camera uniform layout (64 bytes).
///
///  offset  0  view_proj  mat4x4<f32>  group 0, binding 0
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

/// wgpu renderer for streamed line/triangle vertex buffers.
///
/// GPU storage is one vertex buffer allocated at `setup` for the maximum
/// vertex count and refilled in place each frame; no per-frame buffer
/// creation. Both a line-list and a triangle-list pipeline are built from the
/// same shader, and [`set_primitive`](Self::set_primitive) picks which one
/// draws the current upload.
pub struct LineRenderer {
    max_vertices: usize,
    primitive: Primitive,

    pipeline_format: Option<wgpu::TextureFormat>,
    line_pipeline: Option<wgpu::RenderPipeline>,
    triangle_pipeline: Option<wgpu::RenderPipeline>,

    bind_group: Option<wgpu::BindGroup>,
    camera_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,

    warned_overrun: bool,
}

impl LineRenderer {
    pub fn new(max_vertices: usize, primitive: Primitive) -> Self {
        Self {
            max_vertices,
            primitive,
            pipeline_format: None,
            line_pipeline: None,
            triangle_pipeline: None,
            bind_group: None,
            camera_ubo: None,
            vbo: None,
            warned_overrun: false,
        }
    }

    #[inline]
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Selects which pipeline draws subsequent uploads.
    #[inline]
    pub fn set_primitive(&mut self, primitive: Primitive) {
        self.primitive = primitive;
    }

    #[inline]
    fn vbo_bytes(&self) -> u64 {
        (self.max_vertices * std::mem::size_of::<Vertex>()) as u64
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.line_pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("linefield line shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("linefield camera bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<CameraUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("linefield pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let build = |topology: wgpu::PrimitiveTopology, label: &str| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        self.line_pipeline = Some(build(Primitive::Lines.topology(), "linefield line pipeline"));
        self.triangle_pipeline = Some(build(
            Primitive::Triangles.topology(),
            "linefield triangle pipeline",
        ));
        self.pipeline_format = Some(ctx.surface_format);

        let camera_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("linefield camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("linefield camera bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        }));
        self.camera_ubo = Some(camera_ubo);
    }

    fn ensure_vertex_storage(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() {
            return;
        }
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("linefield vertex buffer"),
            size: self.vbo_bytes(),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }
}

impl RenderBackend for LineRenderer {
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        anyhow::ensure!(self.max_vertices > 0, "renderer needs nonzero capacity");
        self.ensure_pipelines(ctx);
        self.ensure_vertex_storage(ctx);
        log::info!(
            "line renderer ready: {} vertex slots ({} MiB GPU storage)",
            self.max_vertices,
            self.vbo_bytes() / (1024 * 1024)
        );
        Ok(())
    }

    fn update(&mut self, ctx: &RenderCtx<'_>, data: &[u8]) {
        let Some(vbo) = self.vbo.as_ref() else { return };

        let mut bytes = data;
        let limit = self.vbo_bytes() as usize;
        if bytes.len() > limit {
            if !self.warned_overrun {
                log::warn!(
                    "upload of {} bytes exceeds GPU storage of {limit}; truncating",
                    bytes.len()
                );
                self.warned_overrun = true;
            }
            bytes = &bytes[..limit];
        }

        if !bytes.is_empty() {
            ctx.queue.write_buffer(vbo, 0, bytes);
        }
    }

    fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        vertex_count: u32,
        view_proj: [[f32; 4]; 4],
    ) {
        let (Some(bind_group), Some(camera_ubo), Some(vbo)) =
            (self.bind_group.as_ref(), self.camera_ubo.as_ref(), self.vbo.as_ref())
        else {
            return;
        };
        let pipeline = match self.primitive {
            Primitive::Lines => self.line_pipeline.as_ref(),
            Primitive::Triangles => self.triangle_pipeline.as_ref(),
        };
        let Some(pipeline) = pipeline else { return };

        ctx.queue.write_buffer(
            camera_ubo,
            0,
            bytemuck::bytes_of(&CameraUniform { view_proj }),
        );

        let count = (vertex_count as usize).min(self.max_vertices) as u32;
        if count == 0 {
            return;
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("linefield geometry pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..count, 0..1);
    }
}
