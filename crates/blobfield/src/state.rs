use glam::{vec2, Vec2};

/// Device pixel ratios above this are clamped before storage to bound the
/// per-frame fragment workload on high-density displays.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Viewport geometry as of the last resize notification, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl ViewportState {
    /// Builds a viewport, clamping the pixel ratio to [`MAX_PIXEL_RATIO`].
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: pixel_ratio.min(MAX_PIXEL_RATIO),
        }
    }

    /// Effective resolution in device pixels, as fed to the shader and used
    /// to size the surface backing store.
    pub fn resolution(&self) -> Vec2 {
        vec2(self.width * self.pixel_ratio, self.height * self.pixel_ratio)
    }
}

/// Pointer position normalized against the viewport.
///
/// Values are stored verbatim. A pointer that left the viewport before the
/// last move notification can sit outside [0, 1] and the tracked blob
/// follows it off-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub fn as_vec2(&self) -> Vec2 {
        vec2(self.x, self.y)
    }
}

impl Default for PointerState {
    /// Until the first move arrives the pointer reads as the bottom-right
    /// viewport corner.
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Input state for one rendering surface.
///
/// Owned by the event loop and mutated only between frames; the shader sees
/// plain copies of these values, so per-pixel evaluation stays free of
/// shared mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub viewport: ViewportState,
    pub pointer: PointerState,
}

impl FrameState {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            viewport: ViewportState::new(width, height, pixel_ratio),
            pointer: PointerState::default(),
        }
    }

    /// Records a viewport change. Always succeeds; the pixel ratio is
    /// clamped to [`MAX_PIXEL_RATIO`] before storage.
    pub fn on_resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.viewport = ViewportState::new(width, height, pixel_ratio);
    }

    /// Records a pointer move given in logical viewport coordinates. The
    /// stored position is the raw ratio against the viewport, deliberately
    /// unclamped.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, viewport_width: f32, viewport_height: f32) {
        self.pointer = PointerState {
            x: x / viewport_width,
            y: y / viewport_height,
        };
    }

    /// Effective device-pixel resolution of the current viewport.
    pub fn resolution(&self) -> Vec2 {
        self.viewport.resolution()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_clamped_on_resize() {
        let mut frame = FrameState::new(800.0, 600.0, 1.0);
        frame.on_resize(800.0, 600.0, 3.0);
        assert_eq!(frame.viewport.pixel_ratio, MAX_PIXEL_RATIO);
        assert_eq!(frame.resolution(), vec2(1600.0, 1200.0));

        frame.on_resize(800.0, 600.0, 1.5);
        assert_eq!(frame.viewport.pixel_ratio, 1.5);
    }

    #[test]
    fn pointer_defaults_to_bottom_right_corner() {
        let frame = FrameState::new(640.0, 480.0, 1.0);
        assert_eq!(frame.pointer, PointerState { x: 1.0, y: 1.0 });
    }

    #[test]
    fn pointer_moves_normalize_against_the_viewport() {
        let mut frame = FrameState::new(640.0, 480.0, 1.0);
        frame.on_pointer_move(0.0, 0.0, 640.0, 480.0);
        assert_eq!(frame.pointer.as_vec2(), Vec2::ZERO);

        frame.on_pointer_move(640.0, 480.0, 640.0, 480.0);
        assert_eq!(frame.pointer.as_vec2(), vec2(1.0, 1.0));

        frame.on_pointer_move(320.0, 120.0, 640.0, 480.0);
        assert_eq!(frame.pointer.as_vec2(), vec2(0.5, 0.25));
    }

    #[test]
    fn pointer_positions_outside_the_viewport_are_kept_verbatim() {
        let mut frame = FrameState::new(640.0, 480.0, 1.0);
        frame.on_pointer_move(-64.0, 960.0, 640.0, 480.0);
        assert_eq!(frame.pointer.as_vec2(), vec2(-0.1, 2.0));
    }

    #[test]
    fn resolution_scales_by_the_stored_ratio() {
        let viewport = ViewportState::new(1920.0, 1080.0, 2.0);
        assert_eq!(viewport.resolution(), vec2(3840.0, 2160.0));
    }
}
