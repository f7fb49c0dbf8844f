use alchemy_camera::Camera;
use alchemy_common::DemoConfig;
use alchemy_input::{Action, KeyBindings, LookMode, MouseLook, PressedKeys, apply_held_movement};
use alchemy_render_wgpu::{GpuContext, TextureSet, WgpuRenderer};
use alchemy_scene::Scene;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Pixels per scroll "line" when the platform reports pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;
/// Longest frame step applied to movement, in seconds.
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Parser)]
#[command(name = "alchemy-desktop", about = "Free-fly camera demo with sorted transparent windows")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the demo textures
    #[arg(long)]
    texture_dir: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    fn demo_config(&self) -> Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };
        if let Some(dir) = &self.texture_dir {
            config.textures.dir = dir.clone();
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        Ok(config)
    }
}

/// Movement step for a frame that took `elapsed`. Capped so a stall (window
/// drag, debugger) does not teleport the camera.
fn frame_dt(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_DT)
}

/// Application state.
struct AppState {
    config: DemoConfig,
    camera: Camera,
    scene: Scene,
    keys: PressedKeys<KeyCode>,
    bindings: KeyBindings<KeyCode>,
    look: MouseLook,
    last_frame: Instant,
}

impl AppState {
    fn new(config: DemoConfig) -> Self {
        Self {
            camera: Camera::from_config(&config.camera),
            scene: Scene::demo(config.sort_metric),
            keys: PressedKeys::new(),
            bindings: KeyBindings::desktop(),
            look: MouseLook::new(LookMode::Free, config.window.width, config.window.height),
            last_frame: Instant::now(),
            config,
        }
    }

    /// Record a key transition. Returns `true` if the key asks to quit.
    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        self.keys.set(key, pressed);
        pressed && self.bindings.action_for(&key) == Some(Action::Quit)
    }

    fn look(&mut self, x_offset: f32, y_offset: f32) {
        self.camera.process_mouse_movement(x_offset, y_offset, true);
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = frame_dt(now - self.last_frame);
        self.last_frame = now;
        apply_held_movement(&mut self.camera, &self.keys, &self.bindings, dt);
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
}

impl GpuApp {
    fn new(config: DemoConfig) -> Self {
        Self {
            state: AppState::new(config),
            window: None,
            gpu: None,
            renderer: None,
        }
    }

    /// Hide and grab the cursor. Look then follows raw device motion, which
    /// keeps turning after the cursor would have hit the window edge.
    fn capture_cursor(&mut self, window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.state.look.set_mode(LookMode::Captured);
            }
            Err(e) => {
                tracing::warn!("cursor grab unavailable, tracking cursor position: {e}");
                self.state.look.set_mode(LookMode::Free);
            }
        }
    }

    fn redraw(&mut self) {
        self.state.update();

        let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) else {
            return;
        };

        let plan = self.state.scene.plan_frame(
            &self.state.camera,
            gpu.aspect(),
            &self.state.config.projection,
        );

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        renderer.render(&gpu.device, &gpu.queue, &view, &plan);
        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_config = &self.state.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(window_config.resizable);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let gpu = match pollster::block_on(GpuContext::new(
            window.clone(),
            size.width,
            size.height,
        )) {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("{e}");
                event_loop.exit();
                return;
            }
        };

        let textures = TextureSet::load(&self.state.config.textures);
        let (width, height) = gpu.size();
        let renderer = WgpuRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.format(),
            width,
            height,
            &textures,
            self.state.config.window.clear_color,
        );

        self.state.look = MouseLook::new(LookMode::Free, width, height);
        if self.state.config.window.capture_cursor {
            self.capture_cursor(&window);
        }
        self.state.last_frame = Instant::now();

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.size();
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, width, height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key, key_state == ElementState::Pressed) {
                    tracing::info!("quit requested");
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((x, y)) = self.state.look.cursor_moved(position.x, position.y) {
                    self.state.look(x, y);
                }
            }
            WindowEvent::CursorEntered { .. } => {
                self.state.look.reset();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                self.state.camera.process_mouse_scroll(y);
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered while unfocused.
                self.state.keys.clear();
                self.state.look.reset();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some((x, y)) = self.state.look.raw_motion(delta.0, delta.1) {
                self.state.look(x, y);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.demo_config()?;
    tracing::info!(
        "alchemy-desktop starting ({}x{}, textures in {})",
        config.window.width,
        config.window.height,
        config.textures.dir.display()
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
