//! WGSL program templates, placeholder substitution and checked compilation.

use log::info;

use crate::error::{OceanError, Result};

/// Replaced by the grid resolution N
pub const GRID_SIZE_PLACEHOLDER: &str = "_N_";

/// Replaced by the wave pool size W
pub const POOL_SIZE_PLACEHOLDER: &str = "_W_";

/// The four vertex + fragment programs of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    NormalDepth,
    Caustic,
    Bottom,
    Water,
}

impl Program {
    pub const ALL: [Program; 4] = [
        Program::NormalDepth,
        Program::Caustic,
        Program::Bottom,
        Program::Water,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Program::NormalDepth => "Normal Depth Shader",
            Program::Caustic => "Caustic Shader",
            Program::Bottom => "Bottom Shader",
            Program::Water => "Water Shader",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Program::NormalDepth => include_str!("../shaders/normal_depth.wgsl"),
            Program::Caustic => include_str!("../shaders/caustic.wgsl"),
            Program::Bottom => include_str!("../shaders/bottom.wgsl"),
            Program::Water => include_str!("../shaders/water.wgsl"),
        }
    }

    /// Template text with both placeholders substituted
    pub fn source(self, grid_size: usize, pool_size: usize) -> String {
        self.template()
            .replace(GRID_SIZE_PLACEHOLDER, &grid_size.to_string())
            .replace(POOL_SIZE_PLACEHOLDER, &pool_size.to_string())
    }
}

/// Compile a program, turning validation errors into a fatal [`OceanError::ShaderCompile`]
/// that carries the compiler's diagnostic text.
pub async fn compile(
    device: &wgpu::Device,
    program: Program,
    grid_size: usize,
    pool_size: usize,
) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(program.label()),
        source: wgpu::ShaderSource::Wgsl(program.source(grid_size, pool_size).into()),
    });

    if let Some(error) = device.pop_error_scope().await {
        return Err(OceanError::ShaderCompile {
            name: program.label().to_string(),
            log: error.to_string(),
        });
    }

    info!("Compiled {}", program.label());
    Ok(module)
}

/// Create a render pipeline, turning validation errors into a fatal
/// [`OceanError::PipelineCreation`].
pub async fn link(
    device: &wgpu::Device,
    descriptor: &wgpu::RenderPipelineDescriptor<'_>,
) -> Result<wgpu::RenderPipeline> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(descriptor);

    match device.pop_error_scope().await {
        Some(error) => Err(OceanError::PipelineCreation {
            name: descriptor.label.unwrap_or("unnamed").to_string(),
            log: error.to_string(),
        }),
        None => Ok(pipeline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(program: Program, grid_size: usize, pool_size: usize) -> naga::Module {
        let source = program.source(grid_size, pool_size);
        let module = naga::front::wgsl::parse_str(&source)
            .unwrap_or_else(|e| panic!("{}: {}", program.label(), e.emit_to_string(&source)));

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{}: {:?}", program.label(), e));

        module
    }

    #[test]
    fn test_placeholders_are_substituted() {
        for program in Program::ALL {
            let source = program.source(200, 10);
            assert!(!source.contains(GRID_SIZE_PLACEHOLDER), "{:?}", program);
            assert!(!source.contains(POOL_SIZE_PLACEHOLDER), "{:?}", program);
        }

        let normal_depth = Program::NormalDepth.source(64, 3);
        assert!(normal_depth.contains("array<Wave, 3>"));
        assert!(normal_depth.contains("64.0"));
    }

    #[test]
    fn test_programs_validate() {
        for program in Program::ALL {
            let module = validate(program, 200, 10);

            let stages: Vec<naga::ShaderStage> =
                module.entry_points.iter().map(|e| e.stage).collect();
            assert!(stages.contains(&naga::ShaderStage::Vertex), "{:?}", program);
            assert!(stages.contains(&naga::ShaderStage::Fragment), "{:?}", program);
        }
    }

    #[test]
    fn test_programs_validate_for_other_sizes() {
        for program in Program::ALL {
            validate(program, 2, 1);
            validate(program, 512, 64);
        }
    }
}
