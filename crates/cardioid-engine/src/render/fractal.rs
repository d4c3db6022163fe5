use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::shader::{FractalProgram, UniformStaging, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// The shipped stage sources, compiled by the viewer at startup.
pub const VERTEX_SOURCE: &str = include_str!("shaders/fractal.vert.wgsl");
pub const FRAGMENT_SOURCE: &str = include_str!("shaders/fractal.frag.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TriVertex {
    pos: [f32; 2],
}

impl TriVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// One oversized triangle covering the canonical `[-1,1]²` rectangle with
/// no interior diagonal.
const FULLSCREEN_TRIANGLE: [TriVertex; 3] = [
    TriVertex { pos: [-1.0, -1.0] },
    TriVertex { pos: [3.0, -1.0] },
    TriVertex { pos: [-1.0, 3.0] },
];

/// Owns the fractal pipeline, the full-screen geometry, and the uniform
/// blocks reflected from the program.
///
/// Uniform writes go into a CPU staging copy by name; `render` uploads the
/// blocks wholesale and issues the single draw. The kernel contract places
/// all shader resources in bind group 0.
pub struct FractalRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffers: Vec<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    staging: UniformStaging,
}

impl FractalRenderer {
    /// Builds the pipeline for a linked program against the surface format.
    ///
    /// The pipeline is bound in every pass this renderer opens, so call
    /// sites never re-bind it themselves.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        program: &FractalProgram,
    ) -> Self {
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cardioid fractal vertex"),
            source: wgpu::ShaderSource::Wgsl(program.vertex().source().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cardioid fractal fragment"),
            source: wgpu::ShaderSource::Wgsl(program.fragment().source().into()),
        });

        let table = program.uniforms().clone();

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = table
            .blocks()
            .iter()
            .map(|block| wgpu::BindGroupLayoutEntry {
                binding: block.binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(u64::from(block.size)),
                },
                count: None,
            })
            .collect();

        let bind_group_layout = (!layout_entries.is_empty()).then(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cardioid fractal bgl"),
                entries: &layout_entries,
            })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            bind_group_layout.iter().collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cardioid fractal pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cardioid fractal pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[TriVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
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
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cardioid fullscreen triangle"),
            contents: bytemuck::cast_slice(&FULLSCREEN_TRIANGLE),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffers: Vec<wgpu::Buffer> = table
            .blocks()
            .iter()
            .map(|block| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("cardioid fractal ubo"),
                    size: u64::from(block.size),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let bind_group = bind_group_layout.as_ref().map(|bgl| {
            let entries: Vec<wgpu::BindGroupEntry> = table
                .blocks()
                .iter()
                .zip(&uniform_buffers)
                .map(|(block, buffer)| wgpu::BindGroupEntry {
                    binding: block.binding,
                    resource: buffer.as_entire_binding(),
                })
                .collect();

            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("cardioid fractal bind group"),
                layout: bgl,
                entries: &entries,
            })
        });

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffers,
            bind_group,
            staging: UniformStaging::new(table),
        }
    }

    /// Stages the 3×3 homogeneous camera matrix.
    pub fn set_camera(&mut self, matrix: [f32; 9]) {
        self.staging.set_mat3("camera", matrix);
    }

    /// Stages the iteration budget (optional uniform; absent in simpler
    /// shader variants, in which case this is a no-op).
    pub fn set_max_iterations(&mut self, budget: f32) {
        self.staging.set_f32("max_iterations", budget);
    }

    /// Uploads the staged uniforms and draws one frame into `view`.
    ///
    /// The GPU viewport rectangle and the `viewport` uniform are taken from
    /// the same value, atomically with this render. An invalid (zero-sized)
    /// viewport suspends rendering instead of dividing by it.
    pub fn render(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        viewport: Viewport,
    ) {
        if !viewport.is_valid() {
            return;
        }

        self.staging
            .set_vec2("viewport", [viewport.width as f32, viewport.height as f32]);

        for (index, buffer) in self.uniform_buffers.iter().enumerate() {
            queue.write_buffer(buffer, 0, self.staging.block_bytes(index));
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cardioid fractal pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(
            0.0,
            0.0,
            viewport.width as f32,
            viewport.height as f32,
            0.0,
            1.0,
        );
        rpass.set_pipeline(&self.pipeline);
        if let Some(bind_group) = &self.bind_group {
            rpass.set_bind_group(0, bind_group, &[]);
        }
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..FULLSCREEN_TRIANGLE.len() as u32, 0..1);
    }
}
