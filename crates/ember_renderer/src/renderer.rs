//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce budget
//! - Sky gradient background
//! - Anti-aliasing via multi-sampling
//!
//! All randomness comes from the generator passed in. Per pixel, each sample
//! first draws its camera ray and then every scatter decision along its
//! bounce chain, so equal generators give byte-identical images.

use std::convert::Infallible;
use std::time::Instant;

use crate::error::OutputResult;
use crate::output::{ImageBuffer, PixelSink};
use crate::{Camera, Color, Hittable, Ray};
use ember_math::Interval;
use rand::RngCore;

/// Valid hit range for scene queries; the lower bound avoids shadow acne.
const SCENE_INTERVAL: Interval = Interval::new(0.001, f64::INFINITY);

/// Sky color at the zenith of the background gradient.
const SKY_BLUE: Color = Color::new(0.3, 0.6, 0.9);

/// Number of progress lines logged at info level per render.
const PROGRESS_STEPS: u32 = 10;

/// Whether row `y` gets an info-level progress line.
///
/// The first row always reports, then roughly every tenth of the image.
fn reports_progress(y: u32, height: u32) -> bool {
    y % (height / PROGRESS_STEPS).max(1) == 0
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces until it is
/// absorbed, escapes to the sky, or runs out of bounces (black).
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, SCENE_INTERVAL) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Vertical white-to-blue background gradient.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::ONE + a * SKY_BLUE
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    pixel_color * camera.samples_scale()
}

/// Scan every pixel row-major, top to bottom, handing each averaged color to `emit`.
///
/// The camera must already be initialized.
fn scan<E>(
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
    mut emit: impl FnMut(u32, u32, Color) -> Result<(), E>,
) -> Result<(), E> {
    let width = camera.image_width();
    let height = camera.image_height();

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth()
    );
    let start = Instant::now();

    for y in 0..height {
        if reports_progress(y, height) {
            log::info!("Scanlines remaining: {}", height - y);
        } else {
            log::debug!("Scanlines remaining: {}", height - y);
        }
        for x in 0..width {
            let color = render_pixel(camera, world, x, y, rng);
            emit(x, y, color)?;
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(())
}

/// Render the entire scene to an image buffer.
///
/// Derived camera state is recomputed first, so settings changed through
/// `config_mut` take effect.
pub fn render(camera: &mut Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
    camera.initialize();
    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());
    let result: Result<(), Infallible> = scan(camera, world, rng, |x, y, color| {
        image.set(x, y, color);
        Ok(())
    });
    match result {
        Ok(()) => image,
        Err(never) => match never {},
    }
}

/// Render the scene straight into a sink, one pixel at a time.
pub fn render_to(
    camera: &mut Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
    sink: &mut dyn PixelSink,
) -> OutputResult<()> {
    camera.initialize();
    sink.begin(camera.image_width(), camera.image_height())?;
    scan(camera, world, rng, |_, _, color| sink.put(color))?;
    sink.finish()
}
