//! Ember renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for scenes built from analytic spheres with
//! diffuse, metallic and dielectric materials. Rendering is single-threaded
//! and fully deterministic for a given random generator.

mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod renderer;
mod sphere;

pub mod sampling;

pub use camera::{Camera, CameraConfig};
pub use error::{OutputError, OutputResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, refract, Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{
    color_to_rgb8, linear_to_gamma, test_pattern, ImageBuffer, PixelSink, PpmWriter, MAX_CHANNEL,
};
pub use renderer::{ray_color, render, render_pixel, render_to, sky_gradient};
pub use sampling::{default_rng, seeded_rng, DEFAULT_SEED};
pub use sphere::Sphere;

/// Re-export common math types from ember_math
pub use ember_math::{Interval, Point3, Ray, Vec3, Vec3Ext};
