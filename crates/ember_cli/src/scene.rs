//! Built-in scenes.

use std::sync::Arc;

use clap::ValueEnum;
use ember_math::{Point3, Vec3};
use ember_renderer::{CameraConfig, Color, Dielectric, HittableList, Lambertian, Material, Metal, Sphere};

/// Scenes the CLI knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenePreset {
    /// A small sphere resting on a large ground sphere
    TwoSpheres,
    /// Diffuse, glass (with an air bubble) and metal spheres side by side
    Materials,
    /// Red/green calibration ramp, no ray tracing
    TestPattern,
}

impl ScenePreset {
    /// Scene geometry. Empty for presets that do not trace rays.
    pub fn build(self) -> HittableList {
        match self {
            ScenePreset::TwoSpheres => two_spheres(),
            ScenePreset::Materials => materials(),
            ScenePreset::TestPattern => HittableList::new(),
        }
    }

    /// Camera settings the scene was framed for.
    pub fn camera(self) -> CameraConfig {
        match self {
            ScenePreset::TwoSpheres => CameraConfig {
                aspect_ratio: 16.0 / 9.0,
                image_width: 500,
                // Viewport two units wide at unit focal length
                vfov: 2.0 * (281.0f64 / 500.0).atan().to_degrees(),
                focus_dist: 1.0,
                ..CameraConfig::default()
            },
            ScenePreset::Materials => CameraConfig {
                aspect_ratio: 16.0 / 9.0,
                image_width: 400,
                samples_per_pixel: 100,
                max_depth: 50,
                vfov: 20.0,
                look_from: Point3::new(-2.0, 2.0, 1.0),
                look_at: Point3::new(0.0, 0.0, -1.0),
                vup: Vec3::Y,
                defocus_angle: 10.0,
                focus_dist: 3.4,
            },
            ScenePreset::TestPattern => CameraConfig {
                aspect_ratio: 2.0,
                image_width: 500,
                ..CameraConfig::default()
            },
        }
    }

    /// Whether rendering goes through the path tracer.
    pub fn is_traced(self) -> bool {
        !matches!(self, ScenePreset::TestPattern)
    }
}

fn two_spheres() -> HittableList {
    let grey: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));

    let mut world = HittableList::new();
    world.push(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.3, grey.clone()));
    world.push(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, grey));
    world
}

fn materials() -> HittableList {
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let left: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let bubble: Arc<dyn Material> = Arc::new(Dielectric::new(1.0 / 1.5));
    let right: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0));

    let mut world = HittableList::new();
    world.push(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground));
    world.push(Sphere::new(Point3::new(0.0, 0.0, -1.2), 0.5, center));
    world.push(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, left));
    world.push(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.4, bubble));
    world.push(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, right));

    log::debug!("Built materials scene with {} spheres", world.len());
    world
}
