use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;
use crate::gfx::{
    AttribLocation, BufferId, BufferPair, ContextError, FrameStatus, GraphicsContext, Primitive,
    ProgramId, UniformLocation, VertexLayout,
};
use crate::math::Mat3;
use crate::paint::Color;

use super::reflect;
use super::{Gpu, GpuInit};

/// Name of the uniform block both shader stages must declare.
const UNIFORM_BLOCK: &str = "Uniforms";

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

// Uniform locations are member slots of `DrawUniform`.
const MATRIX_SLOT: u32 = 0;
const COLOR_SLOT: u32 = 1;

/// Per-draw uniform block, laid out like WGSL
/// `struct Uniforms { u_matrix: mat3x3<f32>, u_color: vec4<f32> }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    matrix: [[f32; 4]; 3],
    color: [f32; 4],
}

impl Default for DrawUniform {
    fn default() -> Self {
        Self {
            matrix: Mat3::IDENTITY.to_padded_cols(),
            color: [0.0; 4],
        }
    }
}

struct Program {
    pipeline: wgpu::RenderPipeline,
    attributes: Vec<(String, u32)>,
    uniforms: Vec<String>,
}

#[derive(Debug, Copy, Clone)]
struct PendingDraw {
    program: ProgramId,
    buffers: BufferPair,
    uniform: DrawUniform,
    count: u32,
}

/// GL-style [`GraphicsContext`] on top of wgpu.
///
/// Calls between two [`present`](GraphicsContext::present)s are recorded; present
/// acquires the swapchain image, uploads every draw's uniforms into one
/// dynamic-offset buffer and replays the draws in a single render pass.
///
/// Supported program shape: one `Float32x2` vertex input and the `Uniforms`
/// block at `@group(0) @binding(0)`.
pub struct WgpuContext<'w> {
    window: &'w Window,
    gpu: Gpu<'w>,
    clear_color: Color,

    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    uniform_stride: u64,

    programs: Vec<Program>,
    buffers: Vec<wgpu::Buffer>,

    // Bound state, GL style.
    program: Option<ProgramId>,
    bound: Option<BufferPair>,
    uniform: DrawUniform,
    viewport: Option<(u32, u32, u32, u32)>,
    clear_pending: bool,

    draws: Vec<PendingDraw>,
    warned_layout: bool,
}

impl<'w> WgpuContext<'w> {
    pub async fn new(window: &'w Window, init: &GpuInit) -> Result<Self> {
        let gpu = Gpu::new(window, init).await?;

        let bind_group_layout =
            gpu.device()
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("brick uniforms bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<DrawUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let alignment = gpu.device().limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = (std::mem::size_of::<DrawUniform>() as u64).next_multiple_of(alignment);

        Ok(Self {
            window,
            gpu,
            clear_color: init.clear_color,
            bind_group_layout,
            bind_group: None,
            uniform_ubo: None,
            uniform_capacity: 0,
            uniform_stride,
            programs: Vec::new(),
            buffers: Vec::new(),
            program: None,
            bound: None,
            uniform: DrawUniform::default(),
            viewport: None,
            clear_pending: false,
            draws: Vec::new(),
            warned_layout: false,
        })
    }

    fn create_pipeline(
        &self,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        position_location: u32,
    ) -> wgpu::RenderPipeline {
        let device = self.gpu.device();

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("brick rect pipeline layout"),
            bind_group_layouts: &[&self.bind_group_layout],
            immediate_size: 0,
        });

        let attributes = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: position_location,
        }];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("brick rect pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: VertexLayout::POSITION_2D.effective_stride() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.gpu.surface_format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: Some(wgpu::IndexFormat::Uint16),
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
    }

    fn ensure_uniform_capacity(&mut self, required: usize) {
        if required <= self.uniform_capacity && self.uniform_ubo.is_some() {
            return;
        }

        let capacity = required.next_power_of_two().max(64);
        let device = self.gpu.device();

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("brick uniforms ubo"),
            size: capacity as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("brick uniforms bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });

        log::debug!("uniform buffer grown to {capacity} draws");
        self.uniform_ubo = Some(ubo);
        self.bind_group = Some(bind_group);
        self.uniform_capacity = capacity;
    }

    fn upload_uniforms(&self, draws: &[PendingDraw]) {
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };

        let stride = self.uniform_stride as usize;
        let mut staging = vec![0u8; draws.len() * stride];
        for (i, draw) in draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&draw.uniform);
            staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        self.gpu.queue().write_buffer(ubo, 0, &staging);
    }

    fn encode(&self, frame: &mut super::GpuFrame, draws: &[PendingDraw], clear: bool) {
        let load = if clear {
            wgpu::LoadOp::Clear(self.clear_color.to_wgpu())
        } else {
            wgpu::LoadOp::Load
        };

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("brick rect pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if draws.is_empty() {
            return;
        }

        let size = self.gpu.size();
        if let Some((x, y, w, h)) = self.viewport {
            let x = x.min(size.width);
            let y = y.min(size.height);
            let w = w.min(size.width - x);
            let h = h.min(size.height - y);
            if w == 0 || h == 0 {
                return;
            }
            rpass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
        }

        let Some(bind_group) = self.bind_group.as_ref() else { return };

        for (i, draw) in draws.iter().enumerate() {
            let Some(program) = self.programs.get(draw.program.index()) else { continue };
            let (Some(vbo), Some(ibo)) = (
                self.buffers.get(draw.buffers.vertex.index()),
                self.buffers.get(draw.buffers.index.index()),
            ) else {
                continue;
            };

            let offset = (i as u64 * self.uniform_stride) as u32;
            rpass.set_pipeline(&program.pipeline);
            rpass.set_bind_group(0, bind_group, &[offset]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..draw.count, 0, 0..1);
        }
    }
}

impl GraphicsContext for WgpuContext<'_> {
    fn compile_and_link(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, ContextError> {
        let vertex_module = reflect::compile("vertex", vertex_src)?;
        let fragment_module = reflect::compile("fragment", fragment_src)?;

        if !reflect::has_entry_point(&vertex_module, naga::ShaderStage::Vertex, VERTEX_ENTRY) {
            return Err(ContextError::Compile {
                stage: "vertex",
                message: format!("missing `{VERTEX_ENTRY}` entry point"),
            });
        }
        if !reflect::has_entry_point(&fragment_module, naga::ShaderStage::Fragment, FRAGMENT_ENTRY)
        {
            return Err(ContextError::Compile {
                stage: "fragment",
                message: format!("missing `{FRAGMENT_ENTRY}` entry point"),
            });
        }

        let attributes = reflect::vertex_inputs(&vertex_module, VERTEX_ENTRY);
        let [(_, position_location)] = attributes.as_slice() else {
            return Err(ContextError::Link(format!(
                "expected exactly one vertex input, found {}",
                attributes.len()
            )));
        };
        let position_location = *position_location;

        let uniforms = reflect::struct_members(&vertex_module, UNIFORM_BLOCK);
        if uniforms != reflect::struct_members(&fragment_module, UNIFORM_BLOCK) {
            return Err(ContextError::Link("stages disagree on the uniform block".into()));
        }

        let device = self.gpu.device();
        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("brick vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("brick fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });

        let pipeline = self.create_pipeline(&vertex, &fragment, position_location);

        let id = ProgramId::new(self.programs.len() as u32);
        self.programs.push(Program {
            pipeline,
            attributes,
            uniforms,
        });
        Ok(id)
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        self.programs
            .get(program.index())?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| AttribLocation::new(*loc))
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let declared = self
            .programs
            .get(program.index())?
            .uniforms
            .iter()
            .any(|n| n == name);
        if !declared {
            return None;
        }

        match name {
            "u_matrix" => Some(UniformLocation::new(MATRIX_SLOT)),
            "u_color" => Some(UniformLocation::new(COLOR_SLOT)),
            _ => None,
        }
    }

    fn create_buffer_pair(&mut self, vertices: &[f32], indices: &[u16]) -> BufferPair {
        let device = self.gpu.device();

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("brick mesh vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("brick mesh ibo"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let vertex = BufferId::new(self.buffers.len() as u32);
        self.buffers.push(vbo);
        let index = BufferId::new(self.buffers.len() as u32);
        self.buffers.push(ibo);

        BufferPair { vertex, index }
    }

    fn resize_to_display(&mut self) -> bool {
        let (width, height) = self.display_size().to_physical(self.scale_factor());
        let target = PhysicalSize::new(width, height);
        if target == self.gpu.size() {
            return false;
        }
        self.gpu.resize(target);
        true
    }

    fn backing_size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }

    fn display_size(&self) -> Viewport {
        let logical = self.window.inner_size().to_logical::<f32>(self.scale_factor());
        Viewport::new(logical.width, logical.height)
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.viewport = Some((x, y, width, height));
    }

    fn clear(&mut self) {
        self.clear_pending = true;
    }

    fn use_program(&mut self, program: ProgramId) {
        self.program = Some(program);
    }

    fn bind_buffer_pair(&mut self, buffers: BufferPair) {
        self.bound = Some(buffers);
    }

    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: VertexLayout) {
        // The pipeline bakes in a tightly packed Float32x2 input.
        let supported = layout.components == 2
            && !layout.normalized
            && layout.offset == 0
            && layout.effective_stride() == VertexLayout::POSITION_2D.effective_stride();
        if !supported && !self.warned_layout {
            log::warn!("unsupported vertex layout {layout:?} at {location:?}; drawing as Float32x2");
            self.warned_layout = true;
        }
    }

    fn uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]) {
        if location.index() == COLOR_SLOT as usize {
            self.uniform.color = value;
        }
    }

    fn uniform_mat3(&mut self, location: UniformLocation, value: &Mat3) {
        if location.index() == MATRIX_SLOT as usize {
            self.uniform.matrix = value.to_padded_cols();
        }
    }

    // The pipeline topology is fixed to triangle strips.
    fn draw_elements(&mut self, _primitive: Primitive, count: u32) {
        let (Some(program), Some(buffers)) = (self.program, self.bound) else {
            log::debug!("draw_elements without bound program/buffers; skipped");
            return;
        };

        self.draws.push(PendingDraw {
            program,
            buffers,
            uniform: self.uniform,
            count,
        });
    }

    fn present(&mut self) -> FrameStatus {
        let draws = std::mem::take(&mut self.draws);
        let clear = std::mem::replace(&mut self.clear_pending, false);

        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return FrameStatus::Skipped;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => return self.gpu.handle_surface_error(err),
        };

        self.ensure_uniform_capacity(draws.len());
        self.upload_uniforms(&draws);
        self.encode(&mut frame, &draws, clear);

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        FrameStatus::Presented
    }
}
