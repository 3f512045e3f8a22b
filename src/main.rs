//! Causticsea - an ocean of expanding wave packets over a sandy bottom.
//!
//! Light refracted through the surface is focused into caustics that
//! dance across the bottom texture. Drag to orbit, scroll to zoom,
//! M toggles ambient/interactive waves, click the water to drop a wave.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::Vec2;
use log::{error, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use causticsea::bottom::load_bottom_image;
use causticsea::camera::OrbitCamera;
use causticsea::cli::Args;
use causticsea::error::OceanError;
use causticsea::ocean::OceanSystem;
use causticsea::params::{OrbitCameraParams, RenderConfig};
use causticsea::rendering::{FrameInputs, RenderSystem};

/// Pointer travel (pixels) below which a press-release counts as a click
const CLICK_SLOP_PX: f32 = 3.0;

/// Pixels of trackpad scroll per wheel line
const PIXELS_PER_LINE: f32 = 50.0;

struct Drag {
    origin: Vec2,
    moved: bool,
}

/// Main application state
struct App {
    args: Args,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    ocean: OceanSystem,
    camera: OrbitCamera,

    // Configuration
    render_config: RenderConfig,

    // Input
    cursor: Vec2,
    drag: Option<Drag>,
    export_requested: bool,

    // Time tracking
    start_time: Instant,

    failed: bool,
}

impl App {
    fn new(args: Args) -> Result<Self, OceanError> {
        let ocean = OceanSystem::new(args.water_params(), args.spawn_mode(), args.seed, 0.0)?;
        let render_config = args.render_config();

        Ok(Self {
            args,
            window: None,
            render_system: None,
            ocean,
            camera: OrbitCamera::new(OrbitCameraParams::default()),
            render_config,
            cursor: Vec2::ZERO,
            drag: None,
            export_requested: false,
            start_time: Instant::now(),
            failed: false,
        })
    }

    fn time_s(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }

    /// Log a setup failure and leave the event loop with an error status
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: OceanError) {
        error!("{}", e);
        self.failed = true;
        event_loop.exit();
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<(), OceanError> {
        let window_attributes = Window::default_attributes()
            .with_title("Causticsea")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let size = window.inner_size();
        self.render_config.window_width = size.width.max(1);
        self.render_config.window_height = size.height.max(1);

        let bottom = load_bottom_image(
            self.args.bottom.as_deref(),
            self.render_config.procedural_bottom_size,
        )?;

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.ocean,
            &self.render_config,
            &bottom,
        ))?;

        println!("\nCausticsea is running!");
        println!("Drag to orbit, scroll to zoom, click the water in interactive mode");
        println!("M: ambient/interactive  Up/Down: depth  T: reload bottom  S: export  ESC: quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        let now = self.time_s();
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyM => self.ocean.toggle_mode(now),
            KeyCode::ArrowUp => self.ocean.nudge_depth(1.0),
            KeyCode::ArrowDown => self.ocean.nudge_depth(-1.0),
            KeyCode::KeyS => self.export_requested = true,
            KeyCode::KeyT => self.reload_bottom(),
            _ => {}
        }
    }

    fn reload_bottom(&mut self) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let uploaded = load_bottom_image(
            self.args.bottom.as_deref(),
            self.render_config.procedural_bottom_size,
        )
        .and_then(|image| render_system.upload_bottom_texture(&image));

        if let Err(e) = uploaded {
            warn!("Keeping current bottom texture: {}", e);
        }
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }

        match state {
            ElementState::Pressed => {
                self.drag = Some(Drag {
                    origin: self.cursor,
                    moved: false,
                });
            }
            ElementState::Released => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                if drag.moved {
                    return;
                }

                let now = self.time_s();
                if let Some(hit) =
                    self.camera
                        .pick_water(self.cursor, self.ocean.depth(), &self.render_config)
                {
                    self.ocean.interact(now, hit.x, hit.y);
                }
            }
        }
    }

    fn handle_cursor(&mut self, position: Vec2) {
        let delta = position - self.cursor;
        self.cursor = position;

        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if !drag.moved && position.distance(drag.origin) < CLICK_SLOP_PX {
            return;
        }

        drag.moved = true;
        self.camera.orbit(
            delta.x,
            delta.y,
            self.render_config.window_width as f32,
            self.render_config.window_height as f32,
        );
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let now = self.time_s();
        self.ocean.advance_frame(now);

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let (view_proj, eye) = self.camera.view_proj(&self.render_config);
        let export = std::mem::take(&mut self.export_requested)
            .then_some(self.render_config.export_path.as_path());

        let inputs = FrameInputs {
            view_proj,
            eye,
            light: self.render_config.light(),
            export,
        };

        match render_system.render(&self.ocean, &inputs) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.setup(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                    let (width, height) = render_system.size();
                    self.render_config.window_width = width;
                    self.render_config.window_height = height;
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat,
                        ..
                    },
                ..
            } => {
                // Held arrows keep stepping the depth; everything else fires once
                if !repeat || matches!(key, KeyCode::ArrowUp | KeyCode::ArrowDown) {
                    self.handle_key(event_loop, key);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(state, button);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                // Scrolling up moves closer
                self.camera.zoom(-lines);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(render_system) = self.render_system.take() {
            render_system.destroy();
        }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let mut app = match App::new(args) {
        Ok(app) => app,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {}", e);
        std::process::exit(1);
    }

    if app.failed {
        std::process::exit(1);
    }
}
