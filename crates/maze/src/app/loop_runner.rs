use std::sync::Arc;
use std::time::Instant;

use intent::{
    GateConfig, LoopHandle, LoopMetricsSnapshot, MetricsHandle, Repaint, Session, SessionStatus,
};
use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use super::controls::{control_for_shortcut, key_identifier, ControlBar};
use super::paths::{resolve_app_paths, StartupError};
use super::renderer::{FrameView, Renderer};
use super::tilt::{TiltEmulator, DEFAULT_TILT_ACCEL};
use super::walker::GridWalker;

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub tilt_accel: f32,
    pub gate: GateConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            window_title: "Spooky Maze".to_string(),
            window_width: 640,
            window_height: 480,
            tilt_accel: DEFAULT_TILT_ACCEL,
            gate: GateConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the window and drives the input session until the window closes.
///
/// A maze that fails to load leaves the window open in the not-running state.
pub fn run_app(config: HostConfig) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        assets_dir = %app_paths.assets_dir.display(),
        maze_file = %app_paths.maze_file.display(),
        "startup"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    let size = window.inner_size();
    let mut controls = ControlBar::layout(size.width, size.height);

    let mut host = HostState::new(config.tilt_accel);
    window.set_title(&window_title(&config.window_title, &host.status, None));
    match Session::start(config.gate.clone(), || GridWalker::load(&app_paths.maze_file)) {
        Ok((session, loop_handle)) => {
            host.metrics = Some(session.metrics_handle());
            host.session = Some(session);
            host.loop_handle = Some(loop_handle);
            host.status = SessionStatus::Running;
        }
        Err(err) => {
            error!(error = %err, "session_start_failed");
            host.status = SessionStatus::NotRunning {
                reason: err.to_string(),
            };
        }
    }
    info!(status = %host.status.message(), "session_status");

    event_loop.set_control_flow(ControlFlow::Poll);
    let mut last_applied_title: Option<String> = None;
    let mut needs_present = true;
    let mut last_presented_serial: Option<u64> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    controls = ControlBar::layout(new_size.width, new_size.height);
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    needs_present = true;
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    host.cursor_px = Some((position.x, position.y));
                }
                WindowEvent::CursorLeft { .. } => {
                    host.cursor_px = None;
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Some((x, y)) = host.cursor_px {
                        if let Some(control) = controls.hit_test(x, y) {
                            host.activate_control(control);
                        }
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let is_pressed = event.state == ElementState::Pressed;
                    if host.tilt.handle_key(event.physical_key, is_pressed) || !is_pressed {
                        return;
                    }
                    if event.logical_key == Key::Named(NamedKey::Escape) {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                        return;
                    }
                    host.handle_key_press(&event.logical_key);
                }
                WindowEvent::RedrawRequested => {
                    if let Some(session) = host.session.as_mut() {
                        if session.on_repaint(Instant::now()) == Repaint::Stop {
                            host.repainting = false;
                        }
                    }

                    let serial = host.session.as_ref().map(|s| s.simulation().frame_serial());
                    if needs_present || serial != last_presented_serial {
                        let view = FrameView {
                            walker: host.session.as_ref().map(|s| s.simulation()),
                            status: &host.status,
                            controls: &controls,
                        };
                        if let Err(error) = renderer.present(&view) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        needs_present = false;
                        last_presented_serial = serial;
                    }

                    let metrics = host.metrics.as_ref().map(MetricsHandle::snapshot);
                    let next_title =
                        window_title(&config.window_title, &host.status, metrics.as_ref());
                    if last_applied_title.as_deref() != Some(next_title.as_str()) {
                        window.set_title(&next_title);
                        last_applied_title = Some(next_title);
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if host.session.is_some() && host.repainting {
                    host.feed_tilt_sample();
                    window.request_redraw();
                } else {
                    window_target.set_control_flow(ControlFlow::Wait);
                    if needs_present {
                        window.request_redraw();
                    }
                }
            }
            Event::LoopExiting => {
                if let Some(handle) = &host.loop_handle {
                    handle.cancel();
                }
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

struct HostState {
    session: Option<Session<GridWalker>>,
    loop_handle: Option<LoopHandle>,
    metrics: Option<MetricsHandle>,
    status: SessionStatus,
    tilt: TiltEmulator,
    cursor_px: Option<(f64, f64)>,
    repainting: bool,
}

impl HostState {
    fn new(tilt_accel: f32) -> Self {
        Self {
            session: None,
            loop_handle: None,
            metrics: None,
            status: SessionStatus::Initializing,
            tilt: TiltEmulator::new(tilt_accel),
            cursor_px: None,
            repainting: true,
        }
    }

    fn activate_control(&mut self, control: intent::Control) {
        if let Some(session) = self.session.as_mut() {
            session.on_control(control);
        }
    }

    fn handle_key_press(&mut self, key: &Key) {
        if let Some(control) = control_for_shortcut(key) {
            self.activate_control(control);
            return;
        }
        if let (Some(session), Some(identifier)) = (self.session.as_mut(), key_identifier(key)) {
            session.on_key(&identifier);
        }
    }

    fn feed_tilt_sample(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.on_motion(self.tilt.sample());
        }
    }
}

fn window_title(base: &str, status: &SessionStatus, metrics: Option<&LoopMetricsSnapshot>) -> String {
    match metrics {
        Some(snapshot) if status.is_running() => format!(
            "{base} | {} | {:.0} fps, {:.1} tps",
            status.message(),
            snapshot.repaints_per_sec,
            snapshot.ticks_per_sec
        ),
        _ => format!("{base} | {}", status.message()),
    }
}
