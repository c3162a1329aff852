use std::path::{Path, PathBuf};

use clap::Parser;
use renderer::{Antialiasing, ColorSpaceMode, ExportFormat, GpuPowerPreference};

#[derive(Parser, Debug)]
#[command(
    name = "blobwall",
    author,
    version,
    about = "Animated metaball background",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Override the render resolution (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Optional FPS cap (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Present as a borderless, always-on-bottom background surface.
    #[arg(long)]
    pub background: bool,

    /// Disable the transparent surface clear.
    #[arg(long)]
    pub opaque: bool,

    /// Render a single still frame instead of animating continuously.
    #[arg(long)]
    pub still: bool,

    /// Timestamp (seconds) to evaluate for still/export modes.
    #[arg(long, value_name = "SECONDS")]
    pub still_time: Option<f32>,

    /// Export a still frame to the provided PNG path then exit.
    #[arg(long, value_name = "PATH")]
    pub still_export: Option<PathBuf>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Output color space handling: `auto`, `gamma`, or `linear`.
    #[arg(long, value_name = "MODE", value_parser = parse_color_space)]
    pub color_space: Option<ColorSpaceMode>,

    /// Adapter power preference: `low` or `high`.
    #[arg(long, value_name = "POWER", value_parser = parse_power)]
    pub power: Option<GpuPowerPreference>,

    /// Path to a TOML settings file (default: the platform config dir).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 1 {
                return Ok(Antialiasing::Off);
            }

            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }

            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_color_space(value: &str) -> Result<ColorSpaceMode, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("color space must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" => Ok(ColorSpaceMode::Auto),
        "gamma" | "srgb-off" => Ok(ColorSpaceMode::Gamma),
        "linear" | "srgb" => Ok(ColorSpaceMode::Linear),
        other => Err(format!(
            "unknown color space '{other}'; expected auto, gamma, or linear"
        )),
    }
}

pub fn parse_power(value: &str) -> Result<GpuPowerPreference, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("power preference must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "low" | "battery" => Ok(GpuPowerPreference::Low),
        "high" | "performance" => Ok(GpuPowerPreference::High),
        other => Err(format!(
            "unknown power preference '{other}'; expected low or high"
        )),
    }
}

pub fn parse_export_format(path: &Path) -> Result<ExportFormat, String> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Ok(ExportFormat::Png),
        None => Err("export path has no extension; expected .png".to_string()),
        Some(other) => Err(format!("unsupported export format '.{other}'; expected .png")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_antialias_variants() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias("off").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("1").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("4").unwrap(), Antialiasing::Samples(4));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("fancy").is_err());
    }

    #[test]
    fn parses_color_space_aliases() {
        assert_eq!(parse_color_space("auto").unwrap(), ColorSpaceMode::Auto);
        assert_eq!(parse_color_space("gamma").unwrap(), ColorSpaceMode::Gamma);
        assert_eq!(parse_color_space("srgb").unwrap(), ColorSpaceMode::Linear);
        assert!(parse_color_space("vivid").is_err());
    }

    #[test]
    fn parses_power_preferences() {
        assert_eq!(parse_power("low").unwrap(), GpuPowerPreference::Low);
        assert_eq!(parse_power("performance").unwrap(), GpuPowerPreference::High);
        assert!(parse_power("medium").is_err());
    }

    #[test]
    fn export_format_comes_from_the_extension() {
        assert_eq!(
            parse_export_format(Path::new("shot.png")).unwrap(),
            ExportFormat::Png
        );
        assert!(parse_export_format(Path::new("shot.jpg")).is_err());
        assert!(parse_export_format(Path::new("shot")).is_err());
    }
}
