//! Rendering system: GPU context, render targets and the three-pass frame.
//!
//! A frame is NormalDepth (wave field into an N×N float target), then
//! Caustic (refracted light accumulated on the bottom plane), then
//! Composite (textured bottom plus the transparent water surface on screen).

pub mod capture;
pub mod passes;
pub mod pipelines;
pub mod shaders;
pub mod targets;
pub mod uniforms;

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use log::{error, info, warn};
use wgpu::util::DeviceExt;

use crate::error::{OceanError, Result};
use crate::ocean::OceanSystem;
use crate::params::RenderConfig;

use passes::{BindGroups, GridBuffers};
use pipelines::{Layouts, Pipelines};
use targets::{Target, CAUSTIC_FORMAT, NORMAL_DEPTH_FORMAT};
use uniforms::{CausticUniforms, SceneUniforms};

/// Per-frame inputs derived from the camera and lighting
pub struct FrameInputs<'a> {
    pub view_proj: Mat4,
    pub eye: Vec3,
    /// Normalized direction light travels in
    pub light: Vec3,
    /// Write the composited frame to this path after rendering it
    pub export: Option<&'a Path>,
}

/// Owns every GPU handle of the renderer
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    can_export: bool,
    layouts: Layouts,
    pipelines: Pipelines,
    normal_depth: Target,
    caustic: Target,
    bottom: Target,
    depth: Target,
    grid: GridBuffers,
    normal_depth_uniforms: wgpu::Buffer,
    caustic_uniforms: wgpu::Buffer,
    scene_uniforms: wgpu::Buffer,
    /// Packed wave pool, reused every frame
    wave_staging: Vec<u8>,
    sampler: wgpu::Sampler,
    normal_depth_bind_group: wgpu::BindGroup,
    caustic_bind_group: wgpu::BindGroup,
    bottom_bind_group: wgpu::BindGroup,
    water_bind_group: wgpu::BindGroup,
}

impl RenderSystem {
    /// Create the GPU context, targets and pipelines.
    ///
    /// Shader, pipeline and target failures are returned as errors and are
    /// meant to abort startup.
    pub async fn new(
        window: Arc<winit::window::Window>,
        ocean: &OceanSystem,
        render_config: &RenderConfig,
        bottom_image: &image::RgbaImage,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(OceanError::Adapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| OceanError::IncompleteTarget {
                name: "Surface".to_string(),
                reason: "no supported formats".to_string(),
            })?;

        // COPY_SRC is needed for frame export, but not every surface offers it
        let can_export = surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC);
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if can_export {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!(
            "Surface {}x{} {:?} (export {})",
            config.width,
            config.height,
            surface_format,
            if can_export { "available" } else { "unavailable" }
        );

        let grid_size = ocean.mesh.resolution();
        let pool_size = ocean.simulator.capacity();

        let layouts = Layouts::new(&device);
        let pipelines = Pipelines::new(&device, &layouts, surface_format, grid_size, pool_size).await?;

        let normal_depth = Target::offscreen(
            &device,
            &adapter,
            "Normal Depth",
            NORMAL_DEPTH_FORMAT,
            grid_size as u32,
        )?;
        let caustic = Target::offscreen(
            &device,
            &adapter,
            "Caustic",
            CAUSTIC_FORMAT,
            render_config.caustic_texture_size,
        )?;
        let bottom = Target::bottom(&device, &queue, bottom_image)?;
        let depth = Target::depth(&device, config.width, config.height);

        let grid = GridBuffers::new(&device, &ocean.mesh);

        let normal_depth_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Normal Depth Uniform Buffer"),
            size: uniforms::normal_depth_buffer_size(pool_size),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let caustic_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Caustic Uniform Buffer"),
            contents: bytemuck::bytes_of(&CausticUniforms::new(render_config.light(), ocean.depth())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::new(
                Mat4::IDENTITY,
                Vec3::ZERO,
                render_config.light(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Linear Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let normal_depth_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Normal Depth Bind Group"),
            layout: &layouts.normal_depth,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: normal_depth_uniforms.as_entire_binding(),
            }],
        });

        let caustic_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Caustic Bind Group"),
            layout: &layouts.caustic,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&normal_depth.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: caustic_uniforms.as_entire_binding(),
                },
            ],
        });

        let bottom_bind_group =
            create_bottom_bind_group(&device, &layouts, &scene_uniforms, &bottom, &caustic, &sampler);

        let water_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Bind Group"),
            layout: &layouts.water,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal_depth.view),
                },
            ],
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            can_export,
            layouts,
            pipelines,
            normal_depth,
            caustic,
            bottom,
            depth,
            grid,
            normal_depth_uniforms,
            caustic_uniforms,
            scene_uniforms,
            wave_staging: Vec::with_capacity(uniforms::normal_depth_buffer_size(pool_size) as usize),
            sampler,
            normal_depth_bind_group,
            caustic_bind_group,
            bottom_bind_group,
            water_bind_group,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface and recreate the depth buffer for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return; // Minimized
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth.destroy();
        self.depth = Target::depth(&self.device, width, height);
    }

    /// Re-apply the current configuration after the surface was lost or outdated
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Replace the bottom texture contents with a new image.
    ///
    /// On error the current texture stays bound.
    pub fn upload_bottom_texture(&mut self, image: &image::RgbaImage) -> Result<()> {
        let bottom = Target::bottom(&self.device, &self.queue, image)?;
        self.bottom_bind_group = create_bottom_bind_group(
            &self.device,
            &self.layouts,
            &self.scene_uniforms,
            &bottom,
            &self.caustic,
            &self.sampler,
        );

        std::mem::replace(&mut self.bottom, bottom).destroy();
        info!("Uploaded {}x{} bottom texture", image.width(), image.height());
        Ok(())
    }

    /// Render one frame of the current simulation state.
    ///
    /// The simulation must already have been advanced for this frame; it is
    /// only read here.
    pub fn render(
        &mut self,
        ocean: &OceanSystem,
        inputs: &FrameInputs,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let depth = ocean.depth();

        uniforms::pack_normal_depth(depth, ocean.simulator.waves(), &mut self.wave_staging);
        self.queue
            .write_buffer(&self.normal_depth_uniforms, 0, &self.wave_staging);
        self.queue.write_buffer(
            &self.caustic_uniforms,
            0,
            bytemuck::bytes_of(&CausticUniforms::new(inputs.light, depth)),
        );
        self.queue.write_buffer(
            &self.scene_uniforms,
            0,
            bytemuck::bytes_of(&SceneUniforms::new(inputs.view_proj, inputs.eye, inputs.light)),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let bind_groups = BindGroups {
            normal_depth: &self.normal_depth_bind_group,
            caustic: &self.caustic_bind_group,
            bottom: &self.bottom_bind_group,
            water: &self.water_bind_group,
        };

        passes::encode_normal_depth(&mut encoder, &self.normal_depth, &self.pipelines, &bind_groups);
        passes::encode_caustic(&mut encoder, &self.caustic, &self.pipelines, &bind_groups, &self.grid);
        passes::encode_composite(
            &mut encoder,
            &view,
            &self.depth,
            &self.pipelines,
            &bind_groups,
            &self.grid,
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(path) = inputs.export {
            if self.can_export {
                if let Err(e) = capture::save_texture(&self.device, &self.queue, &output.texture, path) {
                    error!("Failed to export frame: {}", e);
                }
            } else {
                warn!("Surface does not support copies, cannot export frame");
            }
        }

        output.present();

        Ok(())
    }

    /// Release textures and buffers ahead of drop
    pub fn destroy(&self) {
        for target in [&self.normal_depth, &self.caustic, &self.bottom, &self.depth] {
            target.destroy();
        }
        self.grid.destroy();
        self.normal_depth_uniforms.destroy();
        self.caustic_uniforms.destroy();
        self.scene_uniforms.destroy();
        info!("Released GPU resources");
    }
}

fn create_bottom_bind_group(
    device: &wgpu::Device,
    layouts: &Layouts,
    scene_uniforms: &wgpu::Buffer,
    bottom: &Target,
    caustic: &Target,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Bottom Bind Group"),
        layout: &layouts.bottom,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&bottom.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&caustic.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
