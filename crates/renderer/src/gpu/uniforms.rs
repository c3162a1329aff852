use blobfield::{FrameState, TimeSample};
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Uniform block consumed by the generated WGSL fragment stage.
///
/// The layout must match `SceneParams` there field for field: vec2 members
/// on 8-byte boundaries, the whole block padded to a 16-byte multiple.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SceneUniforms {
    resolution: [f32; 2],
    time: f32,
    _pad0: f32,
    pointer: [f32; 2],
    _pad1: [f32; 2],
}

unsafe impl Zeroable for SceneUniforms {}
unsafe impl Pod for SceneUniforms {}

impl SceneUniforms {
    pub fn new(frame: &FrameState) -> Self {
        let mut uniforms = Self {
            resolution: [0.0; 2],
            time: 0.0,
            _pad0: 0.0,
            pointer: [0.0; 2],
            _pad1: [0.0; 2],
        };
        uniforms.set_resolution(frame.resolution());
        uniforms.set_pointer(frame.pointer.as_vec2());
        uniforms
    }

    pub fn set_resolution(&mut self, resolution: Vec2) {
        self.resolution = resolution.to_array();
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer.to_array();
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    /// Refreshes every field from the frame state and the clock sample.
    pub fn update(&mut self, frame: &FrameState, sample: TimeSample) {
        self.set_resolution(frame.resolution());
        self.set_pointer(frame.pointer.as_vec2());
        self.set_time(sample.seconds);
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_sized_and_aligned_for_the_shader() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 32);
        assert_eq!(std::mem::align_of::<SceneUniforms>(), 16);
    }

    #[test]
    fn update_tracks_frame_state_and_clock() {
        let mut frame = FrameState::new(800.0, 600.0, 2.0);
        frame.on_pointer_move(400.0, 150.0, 800.0, 600.0);

        let mut uniforms = SceneUniforms::new(&frame);
        uniforms.update(&frame, TimeSample::new(3.5, 42));

        assert_eq!(uniforms.resolution, [1600.0, 1200.0]);
        assert_eq!(uniforms.pointer, [0.5, 0.25]);
        assert_eq!(uniforms.time(), 3.5);
    }
}
