use anyhow::{anyhow, Context, Result};
use renderer::{
    Antialiasing, ColorSpaceMode, GpuPowerPreference, RenderPolicy, Renderer, RendererConfig,
    SurfaceAlpha, WindowMode,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_antialias, parse_color_space, parse_export_format, parse_power, RunArgs};
use crate::config::{default_config_path, Settings};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    let config = resolve_renderer_config(&args, &settings)?;
    tracing::info!(
        mode = ?config.mode,
        policy = ?config.policy,
        size = ?config.requested_size,
        "starting blobwall"
    );
    Renderer::new(config).run()
}

fn load_settings(args: &RunArgs) -> Result<Settings> {
    if let Some(path) = &args.config {
        return Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "loading settings file");
            Settings::load(&path)
                .with_context(|| format!("failed to load settings from {}", path.display()))
        }
        _ => Ok(Settings::default()),
    }
}

fn resolve_renderer_config(args: &RunArgs, settings: &Settings) -> Result<RendererConfig> {
    let size_text = args.size.clone().or_else(|| settings.size.clone());
    let requested_size = size_text
        .as_deref()
        .map(parse_surface_size)
        .transpose()
        .map_err(|err| anyhow!(err))?;

    let target_fps = match args.fps.or(settings.fps) {
        Some(v) if v > 0.0 => Some(v),
        _ => None,
    };

    let background = args.background || settings.background.unwrap_or(false);
    let opaque = args.opaque || settings.opaque.unwrap_or(false);

    let antialiasing = match args.antialias {
        Some(mode) => mode,
        None => match settings.antialias.as_deref() {
            Some(text) => parse_antialias(text).map_err(|err| anyhow!(err))?,
            None => Antialiasing::default(),
        },
    };
    let color_space = match args.color_space {
        Some(mode) => mode,
        None => match settings.color_space.as_deref() {
            Some(text) => parse_color_space(text).map_err(|err| anyhow!(err))?,
            None => ColorSpaceMode::default(),
        },
    };
    let power_preference = match args.power {
        Some(power) => power,
        None => match settings.power.as_deref() {
            Some(text) => parse_power(text).map_err(|err| anyhow!(err))?,
            None => GpuPowerPreference::default(),
        },
    };

    let policy = if let Some(path) = &args.still_export {
        let format = parse_export_format(path).map_err(|err| anyhow!(err))?;
        RenderPolicy::Export {
            time: args.still_time,
            path: path.clone(),
            format,
        }
    } else if args.still {
        RenderPolicy::Still {
            time: args.still_time,
        }
    } else {
        RenderPolicy::Animate { target_fps }
    };

    Ok(RendererConfig {
        surface_size: requested_size.unwrap_or((1920, 1080)),
        requested_size,
        mode: if background {
            WindowMode::Background
        } else {
            WindowMode::Windowed
        },
        antialiasing,
        surface_alpha: if opaque {
            SurfaceAlpha::Opaque
        } else {
            SurfaceAlpha::Transparent
        },
        color_space,
        power_preference,
        policy,
    })
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width in surface size".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height in surface size".to_string())?;
    if width == 0 || height == 0 {
        return Err("surface dimensions must be greater than zero".into());
    }
    Ok((width, height))
}
