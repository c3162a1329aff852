//! Scene core for blobwall.
//!
//! Everything visual lives in this crate: the metaball distance field, the
//! glow compositor, and the time/resolution/pointer state that parametrizes
//! them. One set of constants drives two render paths:
//!
//! ```text
//!   scene constants ──▶ scene::shade()          (CPU reference; raster, tests)
//!               └─────▶ wgsl::fragment_source() ─▶ wgpu pipeline (renderer)
//! ```
//!
//! The crate is deliberately free of GPU, windowing, and I/O dependencies so
//! the whole shading algorithm can be exercised by unit tests without a live
//! rendering surface.

pub mod clock;
pub mod raster;
pub mod scene;
pub mod state;
pub mod wgsl;

pub use clock::{BoxedTimeSource, FixedTimeSource, SystemTimeSource, TimeSample, TimeSource};
pub use state::{FrameState, PointerState, ViewportState, MAX_PIXEL_RATIO};
