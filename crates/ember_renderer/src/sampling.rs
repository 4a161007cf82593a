//! Random sampling helpers.
//!
//! Every draw goes through an explicit `&mut dyn RngCore` so that a render
//! is a pure function of its generator state. The reference stream is
//! [`default_rng`]; two renders started from equal generators produce
//! identical images.

use ember_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Seed of the reference random stream.
pub const DEFAULT_SEED: u64 = 5489;

/// Lower bound on the squared length accepted by [`random_unit_vector`].
const MIN_LENGTH_SQUARED: f64 = 1e-160;

/// The deterministic generator every render starts from unless reseeded.
pub fn default_rng() -> StdRng {
    seeded_rng(DEFAULT_SEED)
}

/// A generator for an explicit seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform double in `[0, 1)`.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform double in `[min, max)`.
#[inline]
pub fn gen_range_f64(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Vector with each component uniform in `[0, 1)`.
pub fn random_vec(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
}

/// Vector with each component uniform in `[min, max)`.
pub fn random_vec_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        gen_range_f64(rng, min, max),
        gen_range_f64(rng, min, max),
        gen_range_f64(rng, min, max),
    )
}

/// Random offset in the unit square `[-0.5, 0.5) x [-0.5, 0.5)`, z = 0.
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

/// Sample a random point in the unit disk (z = 0) by rejection.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f64(rng, -1.0, 1.0),
            gen_range_f64(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed direction on the unit sphere.
///
/// Candidates are drawn from the cube `[-1, 1)^3` and kept only inside the
/// unit ball and away from the origin.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec_range(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if MIN_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random unit vector in the hemisphere around `normal`.
pub fn random_on_hemisphere(rng: &mut dyn RngCore, normal: Vec3) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) < 0.0 {
        -on_unit_sphere
    } else {
        on_unit_sphere
    }
}
