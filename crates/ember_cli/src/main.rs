//! `ember` - render a built-in scene to PPM or PNG.
//!
//! Without `--output` the image streams to stdout as plain-text PPM; logs
//! go to stderr.

mod scene;

use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use ember_math::Vec3;
use ember_renderer::{
    render, render_to, seeded_rng, test_pattern, Camera, CameraConfig, PpmWriter, DEFAULT_SEED,
};

use crate::scene::ScenePreset;

/// Monte Carlo path tracer for sphere scenes.
#[derive(Debug, Parser)]
#[command(name = "ember", version, about)]
struct Args {
    /// Scene to render
    #[arg(short, long, value_enum, default_value_t = ScenePreset::Materials)]
    scene: ScenePreset,

    /// Output image (.ppm or .png). Streams PPM to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON camera settings replacing the scene's defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image width over height
    #[arg(long)]
    aspect_ratio: Option<f64>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounces
    #[arg(long)]
    max_depth: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    vfov: Option<f64>,

    /// Camera position, as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    look_from: Option<Vec3>,

    /// Point the camera looks at, as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    look_at: Option<Vec3>,

    /// Camera up direction, as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    vup: Option<Vec3>,

    /// Defocus cone angle in degrees (0 disables depth of field)
    #[arg(long)]
    defocus_angle: Option<f64>,

    /// Distance to the plane of perfect focus
    #[arg(long)]
    focus_dist: Option<f64>,
}

impl Args {
    /// Scene defaults, then the config file, then individual flags.
    fn camera_config(&self) -> Result<CameraConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => self.scene.camera(),
        };

        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            config.aspect_ratio = aspect_ratio;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(vfov) = self.vfov {
            config.vfov = vfov;
        }
        if let Some(look_from) = self.look_from {
            config.look_from = look_from;
        }
        if let Some(look_at) = self.look_at {
            config.look_at = look_at;
        }
        if let Some(vup) = self.vup {
            config.vup = vup;
        }
        if let Some(defocus_angle) = self.defocus_angle {
            config.defocus_angle = defocus_angle;
        }
        if let Some(focus_dist) = self.focus_dist {
            config.focus_dist = focus_dist;
        }

        validate(&config)?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<CameraConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read camera config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse camera config {}", path.display()))
}

fn validate(config: &CameraConfig) -> Result<()> {
    ensure!(config.image_width > 0, "image width must be positive");
    ensure!(config.samples_per_pixel > 0, "samples per pixel must be positive");
    ensure!(
        config.aspect_ratio.is_finite() && config.aspect_ratio > 0.0,
        "aspect ratio must be a positive number, got {}",
        config.aspect_ratio
    );
    ensure!(
        config.look_from != config.look_at,
        "look_from and look_at must differ"
    );
    Ok(())
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got '{s}'")),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.camera_config()?;
    log::info!("Scene {:?}, seed {}", args.scene, args.seed);

    if !args.scene.is_traced() {
        let image = test_pattern(config.image_width, config.image_height());
        return match &args.output {
            Some(path) => image
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display())),
            None => image
                .write_ppm(BufWriter::new(io::stdout().lock()))
                .context("Failed to write image to stdout"),
        };
    }

    let world = args.scene.build();
    let mut camera = Camera::from_config(config);
    let mut rng = seeded_rng(args.seed);

    match &args.output {
        Some(path) => {
            let image = render(&mut camera, &world, &mut rng);
            image
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let mut sink = PpmWriter::new(BufWriter::new(io::stdout().lock()));
            render_to(&mut camera, &world, &mut rng, &mut sink)
                .context("Failed to write image to stdout")?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    run(&args)?;

    log::info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,2,3").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parse_vec3(" -2, 0.5 ,1e1").unwrap(), Vec3::new(-2.0, 0.5, 10.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,3,4").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn test_flags_override_scene_defaults() {
        let args = Args::parse_from([
            "ember",
            "--scene",
            "two-spheres",
            "--width",
            "64",
            "--samples",
            "3",
            "--look-from",
            "0,1,-2",
        ]);
        let config = args.camera_config().unwrap();

        assert_eq!(config.image_width, 64);
        assert_eq!(config.samples_per_pixel, 3);
        assert_eq!(config.look_from, Vec3::new(0.0, 1.0, -2.0));
        // Untouched fields keep the scene defaults
        assert_eq!(config.aspect_ratio, 16.0 / 9.0);
        assert_eq!(config.max_depth, ScenePreset::TwoSpheres.camera().max_depth);
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("ember_cli_config_{}.json", std::process::id()));
        fs::write(&path, r#"{ "image_width": 80, "vfov": 30.0, "look_from": [1.0, 2.0, 3.0] }"#)
            .unwrap();

        let args = Args::parse_from([
            "ember",
            "--config",
            path.to_str().unwrap(),
            "--vfov",
            "45",
        ]);
        let config = args.camera_config().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.image_width, 80);
        assert_eq!(config.vfov, 45.0);
        assert_eq!(config.look_from, Vec3::new(1.0, 2.0, 3.0));
        // Missing fields fall back to the camera defaults
        assert_eq!(config.samples_per_pixel, CameraConfig::default().samples_per_pixel);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let args = Args::parse_from(["ember", "--config", "/nonexistent/ember.json"]);
        let err = args.camera_config().unwrap_err();
        assert!(err.to_string().contains("Failed to read camera config"));
    }

    #[test]
    fn test_validation_rejects_degenerate_settings() {
        let args = Args::parse_from(["ember", "--width", "0"]);
        assert!(args.camera_config().is_err());

        let args = Args::parse_from(["ember", "--samples", "0"]);
        assert!(args.camera_config().is_err());

        let args = Args::parse_from(["ember", "--aspect-ratio=-1"]);
        assert!(args.camera_config().is_err());
    }

    #[test]
    fn test_render_to_file() {
        let path = std::env::temp_dir().join(format!("ember_cli_render_{}.ppm", std::process::id()));
        let args = Args::parse_from([
            "ember",
            "--scene",
            "two-spheres",
            "--width",
            "16",
            "--samples",
            "2",
            "--max-depth",
            "3",
            "--output",
            path.to_str().unwrap(),
        ]);
        run(&args).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(text.starts_with("P3\n16 9\n255\n"));
        assert_eq!(text.lines().count(), 3 + 16 * 9);
    }

    #[test]
    fn test_test_pattern_to_file() {
        let path = std::env::temp_dir().join(format!("ember_cli_pattern_{}.png", std::process::id()));
        let args = Args::parse_from([
            "ember",
            "--scene",
            "test-pattern",
            "--width",
            "10",
            "--output",
            path.to_str().unwrap(),
        ]);
        run(&args).unwrap();
        assert!(path.exists());
        fs::remove_file(&path).unwrap();
    }
}
