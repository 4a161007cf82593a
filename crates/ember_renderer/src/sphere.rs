//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Interval, Point3};

/// A sphere primitive bound to a shared material.
#[derive(Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // A point sphere has no surface to orient a normal on
        if self.radius == 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            self.material.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_math::Vec3;

    fn test_sphere(center: Vec3, radius: f64) -> Sphere {
        Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5))),
        )
    }

    const FORWARD: Interval = Interval::new(0.001, f64::INFINITY);

    #[test]
    fn test_sphere_hit() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, FORWARD).expect("ray aimed at sphere");
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, FORWARD).is_none());
    }

    #[test]
    fn test_sphere_both_roots() {
        // distance 5, radius 1: roots at 4 and 6
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let near = sphere.hit(&ray, FORWARD).unwrap();
        assert!((near.t - 4.0).abs() < 1e-12);
        assert!(near.front_face);

        // Excluding the near root falls back to the far one
        let far = sphere.hit(&ray, Interval::new(4.5, f64::INFINITY)).unwrap();
        assert!((far.t - 6.0).abs() < 1e-12);
        assert!(!far.front_face);
        assert!(ray.direction().dot(far.normal) < 0.0);

        // Excluding both misses
        assert!(sphere.hit(&ray, Interval::new(6.5, f64::INFINITY)).is_none());
        assert!(sphere.hit(&ray, Interval::new(0.001, 3.5)).is_none());
    }

    #[test]
    fn test_sphere_root_on_interval_bound_is_excluded() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Open interval: t = 4 exactly is rejected, t = 6 accepted
        let rec = sphere.hit(&ray, Interval::new(4.0, 10.0)).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = test_sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));

        let rec = sphere.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-12);
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_sphere_tangent_hit() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        // Zero discriminant counts as a hit
        let rec = sphere.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_unnormalized_direction() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));

        let rec = sphere.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-12);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-12);
    }

    #[test]
    fn test_hits_stay_in_interval_and_face_the_ray() {
        let sphere = test_sphere(Vec3::new(0.3, -0.2, -3.0), 1.2);
        let interval = Interval::new(0.001, 100.0);

        for i in 0..21 {
            for j in 0..21 {
                let dir = Vec3::new(-0.5 + i as f64 * 0.05, -0.5 + j as f64 * 0.05, -1.0);
                let ray = Ray::new(Vec3::ZERO, dir);
                if let Some(rec) = sphere.hit(&ray, interval) {
                    assert!(interval.surrounds(rec.t));
                    assert!(ray.direction().dot(rec.normal) <= 0.0);
                    assert!((rec.normal.length() - 1.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_negative_radius_clamped() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), -3.0);
        assert_eq!(sphere.radius(), 0.0);
    }

    #[test]
    fn test_zero_radius_sphere_is_never_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Aimed straight through the center, where the discriminant is zero
        for radius in [0.0, -1.0] {
            let sphere = test_sphere(Vec3::new(0.0, 0.0, -2.0), radius);
            assert!(sphere.hit(&ray, FORWARD).is_none());
        }
    }
}
