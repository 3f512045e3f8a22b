//! Command recording for the three passes of a frame.
//!
//! Each pass is its own render pass on the shared encoder, so a pass only
//! starts once the previous pass's target has been fully written.

use wgpu::util::DeviceExt;

use crate::ocean::WaterMesh;

use super::pipelines::Pipelines;
use super::targets::Target;

/// Water grid geometry, shared by the caustic and water draws
pub struct GridBuffers {
    pub vertices: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
}

impl GridBuffers {
    /// Upload the mesh once; it never changes after setup
    pub fn new(device: &wgpu::Device, mesh: &WaterMesh) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertices,
            indices,
            index_count: mesh.index_count(),
        }
    }

    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn destroy(&self) {
        self.vertices.destroy();
        self.indices.destroy();
    }
}

/// Bind groups for one frame, in pass order
pub struct BindGroups<'a> {
    pub normal_depth: &'a wgpu::BindGroup,
    pub caustic: &'a wgpu::BindGroup,
    pub bottom: &'a wgpu::BindGroup,
    pub water: &'a wgpu::BindGroup,
}

fn color_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassColorAttachment<'_> {
    wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            store: wgpu::StoreOp::Store,
        },
    }
}

/// Pass 1: evaluate every active wave per texel into the N×N normal/depth target
pub fn encode_normal_depth(
    encoder: &mut wgpu::CommandEncoder,
    target: &Target,
    pipelines: &Pipelines,
    bind_groups: &BindGroups,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Normal Depth Pass"),
        color_attachments: &[Some(color_attachment(&target.view))],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    pass.set_pipeline(&pipelines.normal_depth);
    pass.set_bind_group(0, bind_groups.normal_depth, &[]);
    pass.draw(0..3, 0..1); // Fullscreen triangle
}

/// Pass 2: refract light through the surface and accumulate it on the bottom plane
pub fn encode_caustic(
    encoder: &mut wgpu::CommandEncoder,
    target: &Target,
    pipelines: &Pipelines,
    bind_groups: &BindGroups,
    grid: &GridBuffers,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Caustic Pass"),
        color_attachments: &[Some(color_attachment(&target.view))],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    pass.set_pipeline(&pipelines.caustic);
    pass.set_bind_group(0, bind_groups.caustic, &[]);
    grid.bind(&mut pass);
    pass.draw_indexed(0..grid.index_count, 0, 0..1);
}

/// Pass 3: opaque bottom first, then the transparent water surface over it
pub fn encode_composite(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    depth: &Target,
    pipelines: &Pipelines,
    bind_groups: &BindGroups,
    grid: &GridBuffers,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Composite Pass"),
        color_attachments: &[Some(color_attachment(view))],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &depth.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    pass.set_pipeline(&pipelines.bottom);
    pass.set_bind_group(0, bind_groups.bottom, &[]);
    pass.draw(0..6, 0..1); // Two triangles covering the bottom square

    pass.set_pipeline(&pipelines.water);
    pass.set_bind_group(0, bind_groups.water, &[]);
    grid.bind(&mut pass);
    pass.draw_indexed(0..grid.index_count, 0, 0..1);
}
