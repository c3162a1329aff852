use std::time::{Duration, Instant};

use anyhow::Result;
use blobfield::{FrameState, TimeSample};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::types::{
    AdapterProfile, Antialiasing, ColorSpaceMode, GpuPowerPreference, SurfaceAlpha,
};

use super::context::GpuContext;
use super::pipeline::{PipelineLayouts, ScenePipeline};
use super::uniforms::SceneUniforms;

/// Owns every GPU resource of one surface: device, swapchain, pipeline, and
/// the scene uniform buffer.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: ScenePipeline,
    uniforms: SceneUniforms,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    msaa_target: Option<wgpu::TextureView>,
    frames_since_last_update: u32,
    last_fps_update: Instant,
    frames_per_second: f32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        size: PhysicalSize<u32>,
        frame: &FrameState,
        antialiasing: Antialiasing,
        color_space: ColorSpaceMode,
        surface_alpha: SurfaceAlpha,
        gpu_power: GpuPowerPreference,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(
            target,
            size,
            antialiasing,
            color_space,
            surface_alpha,
            gpu_power,
        )?;
        let layouts = PipelineLayouts::new(&context.device);
        let pipeline = ScenePipeline::new(
            &context.device,
            &layouts,
            context.surface_format,
            context.sample_count,
        )?;

        let uniforms = SceneUniforms::new(frame);
        let uniform_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("scene uniforms"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("scene uniform bind group"),
                layout: &layouts.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let msaa_target = create_msaa_target(&context);

        Ok(Self {
            context,
            pipeline,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
            msaa_target,
            frames_since_last_update: 0,
            last_fps_update: Instant::now(),
            frames_per_second: 60.0,
        })
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.msaa_target = create_msaa_target(&self.context);
    }

    /// Renders and presents one frame for the given input state and clock
    /// sample.
    pub(crate) fn render(
        &mut self,
        frame_state: &FrameState,
        sample: TimeSample,
    ) -> Result<(), wgpu::SurfaceError> {
        // Acquiring the next swapchain texture can block on the compositor,
        // so grab it before touching any bookkeeping.
        let acquisition_start = Instant::now();
        let frame = self.context.surface.get_current_texture()?;
        let acquisition = acquisition_start.elapsed();
        let frame_budget = Duration::from_secs_f32(1.0 / self.frames_per_second.max(1.0));
        if acquisition > frame_budget {
            warn!(
                "acquiring frame took {}ms, over the frame budget of {}ms (at {} FPS)",
                acquisition.as_millis(),
                frame_budget.as_millis(),
                self.frames_per_second.round(),
            );
        }

        let now = Instant::now();
        self.frames_since_last_update += 1;
        let since_fps_update = now.saturating_duration_since(self.last_fps_update);
        if since_fps_update >= Duration::from_secs(1) {
            self.frames_per_second =
                self.frames_since_last_update as f32 / since_fps_update.as_secs_f32();
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
            debug!(
                fps = self.frames_per_second.round(),
                frame_index = sample.frame_index,
                time = self.uniforms.time(),
                "render stats"
            );
        }

        self.uniforms.update(frame_state, sample);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("scene encoder"),
                });

        let clear = match self.context.surface_alpha {
            SurfaceAlpha::Transparent => wgpu::Color::TRANSPARENT,
            SurfaceAlpha::Opaque => wgpu::Color::BLACK,
        };
        let (view, resolve_target) = match &self.msaa_target {
            Some(msaa_view) => (msaa_view, Some(&frame_view)),
            None => (&frame_view, None),
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_msaa_target(context: &GpuContext) -> Option<wgpu::TextureView> {
    if context.sample_count <= 1 {
        return None;
    }
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa color target"),
        size: wgpu::Extent3d {
            width: context.size.width.max(1),
            height: context.size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: context.sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: context.surface_format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}
