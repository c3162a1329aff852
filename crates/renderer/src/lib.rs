//! Renderer crate for blobwall.
//!
//! Glues the winit window, the `wgpu` pipeline, and the scene core from
//! `blobfield` together. The overall flow is:
//!
//! ```text
//!   CLI / blobwall
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowRuntime ──▶ winit event loop ──▶ render_frame()
//!          ▲                │                    │
//!          │                │ resize / pointer   └─▶ SceneUniforms ─▶ GPU UBO
//!          │                ▼
//!          │            FrameState (blobfield)
//!          └── Export policy ──▶ CPU raster ──▶ PNG
//! ```
//!
//! `WindowState` owns all GPU resources (surface, device, pipeline,
//! uniforms) plus the input state the scene reads; `Renderer` is the thin
//! entry point that either spawns the event-loop thread or, for exports,
//! rasterizes one frame on the CPU and writes it to disk. The fragment
//! shader is generated at start-up from the scene constants, so both paths
//! shade identically.

pub mod export;
mod gpu;
pub mod runtime;
mod types;
mod window;

use anyhow::Result;

pub use runtime::{ExportFormat, RenderPolicy};
pub use types::{
    AdapterProfile, Antialiasing, ColorSpaceMode, GpuPowerPreference, RendererConfig,
    SurfaceAlpha, WindowMode,
};
pub use window::WindowRuntime;

/// Thin entry point choosing between the windowed loop and still export.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Runs until the window closes, or until the export completed.
    pub fn run(self) -> Result<()> {
        if let RenderPolicy::Export { time, path, format } = self.config.policy.clone() {
            let (width, height) = self
                .config
                .requested_size
                .unwrap_or(self.config.surface_size);
            let pointer = blobfield::PointerState::default();
            let written = export::export_still(
                &path,
                format,
                width,
                height,
                time.unwrap_or(0.0),
                pointer.as_vec2(),
            )?;
            tracing::info!("still frame captured at {}", written.display());
            return Ok(());
        }

        WindowRuntime::spawn(self.config)?.wait()
    }
}
