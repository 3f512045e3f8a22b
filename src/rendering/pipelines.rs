//! Pipelines and bind group layouts for the three passes.
//!
//! Fixed-function state (blending, culling, depth) is baked into each
//! pipeline, so the order-dependent state toggles of a frame are expressed
//! by which pipeline is bound.

use crate::error::Result;
use crate::ocean::GridVertex;

use super::shaders::{self, Program};
use super::targets::{CAUSTIC_FORMAT, DEPTH_FORMAT, NORMAL_DEPTH_FORMAT};

/// Bind group layouts, created once at setup
pub struct Layouts {
    pub normal_depth: wgpu::BindGroupLayout,
    pub caustic: wgpu::BindGroupLayout,
    pub bottom: wgpu::BindGroupLayout,
    pub water: wgpu::BindGroupLayout,
}

/// One pipeline per program
pub struct Pipelines {
    pub normal_depth: wgpu::RenderPipeline,
    pub caustic: wgpu::RenderPipeline,
    pub bottom: wgpu::RenderPipeline,
    pub water: wgpu::RenderPipeline,
}

/// Additive accumulation for the caustic target
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Alpha blending on color, destination alpha kept as-is
const WATER_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

static GRID_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Uint16x2,
}];

fn grid_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GridVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &GRID_ATTRIBUTES,
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    filterable: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex = wgpu::ShaderStages::VERTEX;
        let fragment = wgpu::ShaderStages::FRAGMENT;
        let both = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

        let normal_depth = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Normal Depth Bind Group Layout"),
            entries: &[uniform_entry(0, fragment)],
        });

        let caustic = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Caustic Bind Group Layout"),
            entries: &[texture_entry(0, vertex, false), uniform_entry(1, vertex)],
        });

        let bottom = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bottom Bind Group Layout"),
            entries: &[
                uniform_entry(0, both),
                texture_entry(1, fragment, true),
                texture_entry(2, fragment, true),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: fragment,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let water = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Water Bind Group Layout"),
            entries: &[uniform_entry(0, both), texture_entry(1, vertex, false)],
        });

        Self {
            normal_depth,
            caustic,
            bottom,
            water,
        }
    }
}

/// Everything that differs between the four pipelines
struct PipelineDesc<'a> {
    label: &'a str,
    program: Program,
    layout: &'a wgpu::BindGroupLayout,
    vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    cull_mode: Option<wgpu::Face>,
    depth_stencil: Option<wgpu::DepthStencilState>,
}

impl Pipelines {
    /// Compile all programs and create the pipelines. Any failure is fatal.
    pub async fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        surface_format: wgpu::TextureFormat,
        grid_size: usize,
        pool_size: usize,
    ) -> Result<Self> {
        let grid = [grid_vertex_layout()];

        let normal_depth = create_pipeline(
            device,
            PipelineDesc {
                label: "Normal Depth Pipeline",
                program: Program::NormalDepth,
                layout: &layouts.normal_depth,
                vertex_buffers: &[],
                format: NORMAL_DEPTH_FORMAT,
                blend: None,
                cull_mode: None,
                depth_stencil: None,
            },
            grid_size,
            pool_size,
        )
        .await?;

        let caustic = create_pipeline(
            device,
            PipelineDesc {
                label: "Caustic Pipeline",
                program: Program::Caustic,
                layout: &layouts.caustic,
                vertex_buffers: &grid,
                format: CAUSTIC_FORMAT,
                blend: Some(ADDITIVE),
                cull_mode: None,
                depth_stencil: None,
            },
            grid_size,
            pool_size,
        )
        .await?;

        // Opaque bottom: depth tested and written, back faces culled
        let bottom = create_pipeline(
            device,
            PipelineDesc {
                label: "Bottom Pipeline",
                program: Program::Bottom,
                layout: &layouts.bottom,
                vertex_buffers: &[],
                format: surface_format,
                blend: None,
                cull_mode: Some(wgpu::Face::Back),
                depth_stencil: Some(depth_state(true)),
            },
            grid_size,
            pool_size,
        )
        .await?;

        // Transparent water: depth tested but not written, both sides visible
        let water = create_pipeline(
            device,
            PipelineDesc {
                label: "Water Pipeline",
                program: Program::Water,
                layout: &layouts.water,
                vertex_buffers: &grid,
                format: surface_format,
                blend: Some(WATER_BLEND),
                cull_mode: None,
                depth_stencil: Some(depth_state(false)),
            },
            grid_size,
            pool_size,
        )
        .await?;

        Ok(Self {
            normal_depth,
            caustic,
            bottom,
            water,
        })
    }
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

async fn create_pipeline(
    device: &wgpu::Device,
    desc: PipelineDesc<'_>,
    grid_size: usize,
    pool_size: usize,
) -> Result<wgpu::RenderPipeline> {
    let module = shaders::compile(device, desc.program, grid_size, pool_size).await?;

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &[desc.layout],
        push_constant_ranges: &[],
    });

    shaders::link(
        device,
        &wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: desc.vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: desc.depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        },
    )
    .await
}
