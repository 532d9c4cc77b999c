use anyhow::Result;
use clap::Parser;
use cubeview_assets::program_sources;
use cubeview_common::ViewerConfig;
use cubeview_input::Key;
use cubeview_kernel::SpawnRng;
use cubeview_render::{SceneAssets, Viewer};
use cubeview_render_wgpu::WgpuGraphics;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Exit status for fatal startup failures.
const FATAL_EXIT: u8 = 255;

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Parser)]
#[command(name = "cubeview-desktop", about = "Fly around and spawn textured cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for cube placement
    #[arg(long)]
    seed: Option<u64>,

    /// Initial window width
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_yaml_file(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        Ok(config)
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyC => Some(Key::C),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

/// Everything that exists once the window and GPU are up.
struct Running {
    window: Arc<Window>,
    gfx: WgpuGraphics,
    viewer: Viewer,
    /// Virtual cursor fed from raw mouse motion; unaffected by confinement.
    cursor: (f64, f64),
}

struct App {
    config: ViewerConfig,
    start: Instant,
    running: Option<Running>,
    failed: bool,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            start: Instant::now(),
            running: None,
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: &str, err: impl std::fmt::Display) {
        println!("{message}");
        tracing::error!("{message}: {err}");
        self.failed = true;
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(event_loop, "Failed to create window", e),
        };

        let size = window.inner_size();
        let mut gfx = match WgpuGraphics::new(window.clone(), size.width, size.height) {
            Ok(gfx) => gfx,
            Err(e) => return self.fail(event_loop, "Failed to initialize graphics device", e),
        };

        let (cube_source, model_source) = match program_sources(&self.config) {
            Ok(sources) => sources,
            Err(e) => return self.fail(event_loop, "Failed to read shader sources", e),
        };
        let assets = match SceneAssets::load(&mut gfx, &self.config, &cube_source, &model_source) {
            Ok(assets) => assets,
            Err(e) => return self.fail(event_loop, "Failed to build shader programs", e),
        };

        if window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
            .is_err()
        {
            tracing::warn!("cursor capture unavailable on this platform");
        }
        window.set_cursor_visible(false);

        let rng = match self.config.seed {
            Some(seed) => SpawnRng::seeded(seed),
            None => SpawnRng::from_entropy(),
        };
        let viewer = Viewer::new(assets, (size.width, size.height), rng);
        tracing::info!("viewer ready at {}x{}", size.width, size.height);

        self.start = Instant::now();
        window.request_redraw();
        self.running = Some(Running {
            window,
            gfx,
            viewer,
            cursor: (0.0, 0.0),
        });
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.failed {
            return;
        }
        self.start(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                running.gfx.resize(new_size.width, new_size.height);
                running.viewer.resize(new_size.width, new_size.height);
                tracing::debug!("resized to {}x{}", new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    running
                        .viewer
                        .input_mut()
                        .key_event(key, state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                running.viewer.input_mut().scroll(dy);
            }
            WindowEvent::Focused(false) => {
                running.viewer.input_mut().release_all();
            }
            WindowEvent::RedrawRequested => {
                let now = self.start.elapsed().as_secs_f32();
                running.viewer.frame(now, &mut running.gfx);
                if running.viewer.should_close() {
                    tracing::info!(
                        "closing with {} cubes spawned",
                        running.viewer.registry().len()
                    );
                    event_loop.exit();
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
        let Some(running) = &mut self.running else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            running.cursor.0 += delta.0;
            running.cursor.1 += delta.1;
            let (x, y) = running.cursor;
            running.viewer.input_mut().cursor_moved(x as f32, y as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.viewer_config()?;
    tracing::info!("cubeview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    if app.failed {
        return Ok(ExitCode::from(FATAL_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}
