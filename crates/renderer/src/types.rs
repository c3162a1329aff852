use crate::runtime::RenderPolicy;

/// How the surface presents itself on the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Regular decorated window, handy while inspecting the scene.
    Windowed,
    /// Borderless, always-on-bottom, maximized surface — the decorative
    /// background arrangement.
    Background,
}

impl Default for WindowMode {
    fn default() -> Self {
        Self::Windowed
    }
}

/// Declares how the compositor should treat the swapchain alpha channel.
///
/// Shaded content is always opaque; only the surface clear carries alpha,
/// so `Transparent` is what lets the desktop show through around the blobs
/// when the compositor honors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAlpha {
    Opaque,
    Transparent,
}

impl Default for SurfaceAlpha {
    fn default() -> Self {
        Self::Transparent
    }
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Treat the scene's colors as display-referred (non-sRGB swapchain).
    #[default]
    Auto,
    /// Same as `Auto`, stated explicitly.
    Gamma,
    /// Treat shader output as linear and let an sRGB swapchain convert.
    Linear,
}

/// Adapter power preference forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuPowerPreference {
    /// Prefer the low-power adapter; a wallpaper should not spin fans.
    Low,
    /// Prefer the discrete adapter.
    High,
}

impl Default for GpuPowerPreference {
    fn default() -> Self {
        Self::Low
    }
}

/// Identity of the adapter backing the surface, kept for logging and the
/// software-rasterizer frame cap.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// True when rendering falls back to a CPU rasterizer such as llvmpipe.
    pub fn is_software(&self) -> bool {
        if matches!(self.device_type, wgpu::DeviceType::Cpu) {
            return true;
        }
        let name = self.name.to_ascii_lowercase();
        name.contains("llvmpipe") || name.contains("softpipe") || name.contains("swiftshader")
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and settings-file entries: how large
/// the surface should be, how it sits on the desktop, and how frames are
/// paced.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in logical pixels when nothing else is requested.
    pub surface_size: (u32, u32),
    /// Optional size explicitly requested by the caller.
    pub requested_size: Option<(u32, u32)>,
    /// Desktop arrangement of the surface.
    pub mode: WindowMode,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Alpha behaviour of the surface.
    pub surface_alpha: SurfaceAlpha,
    /// Desired color handling for the swapchain.
    pub color_space: ColorSpaceMode,
    /// Adapter power preference.
    pub power_preference: GpuPowerPreference,
    /// High-level render behaviour requested by the caller.
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    /// Provides a 1080p windowed, transparent, continuously animating
    /// configuration.
    fn default() -> Self {
        Self {
            surface_size: (1920, 1080),
            requested_size: None,
            mode: WindowMode::default(),
            antialiasing: Antialiasing::default(),
            surface_alpha: SurfaceAlpha::default(),
            color_space: ColorSpaceMode::default(),
            power_preference: GpuPowerPreference::default(),
            policy: RenderPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn software_adapters_are_detected_by_type_and_name() {
        let mut profile = AdapterProfile {
            name: "llvmpipe (LLVM 17.0.6, 256 bits)".to_string(),
            backend: wgpu::Backend::Vulkan,
            device_type: wgpu::DeviceType::Other,
        };
        assert!(profile.is_software());

        profile.name = "NVIDIA GeForce RTX 3060".to_string();
        assert!(!profile.is_software());

        profile.device_type = wgpu::DeviceType::Cpu;
        assert!(profile.is_software());
    }
}
