use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{anyhow, Result};
use blobfield::{BoxedTimeSource, FrameState, TimeSample};
use crossbeam_channel::{bounded, Sender};
use tracing::warn;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use winit::window::{Window, WindowBuilder, WindowLevel};

use crate::gpu::GpuState;
use crate::runtime::{time_source_for_policy, FrameScheduler, RenderPolicy};
use crate::types::{RendererConfig, SurfaceAlpha, WindowMode};

/// Frame cap applied when the adapter turns out to be a CPU rasterizer and
/// the caller did not pick a rate themselves.
const SOFTWARE_FPS_CAP: f32 = 15.0;

/// Aggregates the window, its GPU resources, and the input state the scene
/// reads every frame.
pub(crate) struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    frame: FrameState,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let scale = window.scale_factor();
        let logical: LogicalSize<f64> = window.inner_size().to_logical(scale);
        let frame = FrameState::new(logical.width as f32, logical.height as f32, scale as f32);

        let gpu = GpuState::new(
            window.as_ref(),
            effective_surface_size(&frame),
            &frame,
            config.antialiasing,
            config.color_space,
            config.surface_alpha,
            config.power_preference,
        )?;

        Ok(Self { window, gpu, frame })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn adapter_profile(&self) -> crate::types::AdapterProfile {
        self.gpu.adapter_profile().clone()
    }

    /// Feeds a resize through the input state, then matches the surface
    /// backing store to the (pixel-ratio-clamped) effective resolution.
    pub(crate) fn handle_resized(&mut self, physical: PhysicalSize<u32>) {
        let scale = self.window.scale_factor();
        let logical: LogicalSize<f64> = physical.to_logical(scale);
        self.frame
            .on_resize(logical.width as f32, logical.height as f32, scale as f32);
        self.gpu.resize(effective_surface_size(&self.frame));
    }

    /// Re-derives viewport and surface state from the live window, used
    /// after scale-factor changes and after the swapchain goes stale.
    pub(crate) fn refresh_viewport(&mut self) {
        self.handle_resized(self.window.inner_size());
    }

    /// Normalizes a pointer position against the logical viewport.
    pub(crate) fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let scale = self.window.scale_factor();
        let logical: LogicalPosition<f64> = position.to_logical(scale);
        let viewport: LogicalSize<f64> = self.window.inner_size().to_logical(scale);
        self.frame.on_pointer_move(
            logical.x as f32,
            logical.y as f32,
            viewport.width as f32,
            viewport.height as f32,
        );
    }

    pub(crate) fn render_frame(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        self.gpu.render(&self.frame, sample)
    }
}

fn effective_surface_size(frame: &FrameState) -> PhysicalSize<u32> {
    let resolution = frame.resolution();
    PhysicalSize::new(
        resolution.x.round().max(1.0) as u32,
        resolution.y.round().max(1.0) as u32,
    )
}

/// Couples the frame scheduler with the policy's time source.
pub(crate) struct RenderPolicyDriver {
    scheduler: FrameScheduler,
    time_source: BoxedTimeSource,
}

impl RenderPolicyDriver {
    pub(crate) fn new(policy: &RenderPolicy) -> Self {
        Self {
            scheduler: FrameScheduler::new(policy),
            time_source: time_source_for_policy(policy),
        }
    }

    pub(crate) fn sample(&mut self) -> TimeSample {
        self.time_source.sample()
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.scheduler.mark_rendered(Instant::now());
    }

    pub(crate) fn ready_for_frame(&mut self, now: Instant) -> bool {
        self.scheduler.ready_for_frame(now)
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}

#[derive(Debug, Clone)]
enum WindowCommand {
    Shutdown,
}

/// Owns the event-loop thread of one surface.
///
/// `spawn` blocks until the window and GPU state initialised (or failed),
/// `shutdown` stops scheduling and releases the surface deterministically.
/// Dropping the runtime shuts it down as well.
pub struct WindowRuntime {
    proxy: EventLoopProxy<WindowCommand>,
    join_handle: Option<JoinHandle<Result<()>>>,
}

impl WindowRuntime {
    pub fn spawn(config: RendererConfig) -> Result<Self> {
        let (ready_tx, ready_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("blobwall-window".into())
            .spawn(move || run_window_thread(config, ready_tx))
            .map_err(|err| anyhow!("failed to spawn window thread: {err}"))?;

        let proxy = ready_rx
            .recv()
            .map_err(|err| anyhow!("window thread failed to initialise: {err}"))??;

        Ok(Self {
            proxy,
            join_handle: Some(handle),
        })
    }

    /// Blocks until the window closes on its own.
    pub fn wait(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }

    /// Halts further frame scheduling and tears the surface down.
    pub fn shutdown(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(WindowCommand::Shutdown);
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }
}

impl Drop for WindowRuntime {
    fn drop(&mut self) {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(WindowCommand::Shutdown);
            let _ = handle.join();
        }
    }
}

fn run_window_thread(
    config: RendererConfig,
    ready_tx: Sender<Result<EventLoopProxy<WindowCommand>, anyhow::Error>>,
) -> Result<()> {
    let mut builder = EventLoopBuilder::<WindowCommand>::with_user_event();
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }

    #[cfg(any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }
    let event_loop = builder
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let proxy = event_loop.create_proxy();

    let (width, height) = config.requested_size.unwrap_or(config.surface_size);
    let mut window_builder = WindowBuilder::new()
        .with_title("blobwall")
        .with_inner_size(LogicalSize::new(width, height))
        .with_transparent(matches!(config.surface_alpha, SurfaceAlpha::Transparent));
    if matches!(config.mode, WindowMode::Background) {
        window_builder = window_builder
            .with_decorations(false)
            .with_window_level(WindowLevel::AlwaysOnBottom)
            .with_maximized(true);
    }
    let window = window_builder
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state = match WindowState::new(window.clone(), &config) {
        Ok(state) => state,
        Err(err) => {
            let wrapped = anyhow!("failed to initialise window renderer: {err}");
            let message = wrapped.to_string();
            let _ = ready_tx.send(Err(anyhow!(message)));
            return Err(wrapped);
        }
    };

    let profile = state.adapter_profile();
    let mut effective_policy = config.policy.clone();
    if profile.is_software() {
        if let RenderPolicy::Animate { target_fps: None } = &effective_policy {
            effective_policy = RenderPolicy::Animate {
                target_fps: Some(SOFTWARE_FPS_CAP),
            };
            warn!(
                adapter = %profile.name,
                backend = ?profile.backend,
                cap = SOFTWARE_FPS_CAP,
                "software rasterizer detected; capping frame rate (override with --fps)"
            );
        }
    }

    let mut driver = RenderPolicyDriver::new(&effective_policy);
    if driver.ready_for_frame(Instant::now()) {
        state.window().request_redraw();
    }

    let _ = ready_tx.send(Ok(proxy.clone()));

    let mut result = Ok(());
    let run_result = event_loop.run(move |event, elwt| {
        match event {
            Event::UserEvent(WindowCommand::Shutdown) => {
                elwt.exit();
            }
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        elwt.exit();
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        state.handle_cursor_moved(position);
                    }
                    WindowEvent::Resized(new_size) => {
                        state.handle_resized(new_size);
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        state.refresh_viewport();
                    }
                    WindowEvent::RedrawRequested => match state.render_frame(driver.sample()) {
                        Ok(()) => {
                            driver.mark_rendered();
                        }
                        Err(err) => match err {
                            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                state.refresh_viewport();
                            }
                            wgpu::SurfaceError::OutOfMemory => {
                                eprintln!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            wgpu::SurfaceError::Timeout => {
                                eprintln!("surface timeout; retrying next frame");
                            }
                            other => {
                                eprintln!("surface error: {other:?}; retrying next frame");
                            }
                        },
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if driver.ready_for_frame(now) {
                    state.window().request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = driver.next_deadline() {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        }
    });

    if let Err(err) = run_result {
        result = Err(anyhow!("window event loop error: {err}"));
    }

    result
}
