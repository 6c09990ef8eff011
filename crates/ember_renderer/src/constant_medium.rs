//! Homogeneous participating medium (fog, smoke).

use std::sync::Arc;

use crate::sampling::gen_f64;
use crate::{
    hittable::{HitRecord, Hittable},
    Color, Isotropic, Material, Ray, Texture,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Volume of constant density bounded by a closed surface.
///
/// A ray crossing the boundary scatters at an exponentially distributed
/// distance inside it, or passes straight through.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f64,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f64, tex: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(tex)),
        }
    }

    pub fn from_color(boundary: Arc<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::from_color(albedo)),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut rec1 = HitRecord::default();
        let mut rec2 = HitRecord::default();

        // Entry and exit points along the whole line
        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut rec1, rng) {
            return false;
        }
        if !self
            .boundary
            .hit(ray, Interval::new(rec1.t + 0.0001, f64::INFINITY), &mut rec2, rng)
        {
            return false;
        }

        let mut t_enter = rec1.t.max(ray_t.min);
        let t_exit = rec2.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f64(rng).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Arbitrary, the interior has no surface
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = self.phase_function.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fog(density: f64) -> ConstantMedium {
        let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::from_color(Color::ONE)),
        ));
        ConstantMedium::from_color(boundary, density, Color::splat(0.5))
    }

    #[test]
    fn test_ray_missing_boundary_never_hits() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::new(0.0, 5.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut rec = HitRecord::default();

        for _ in 0..100 {
            assert!(!medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        }
    }

    #[test]
    fn test_dense_medium_scatters_near_entry() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut rec = HitRecord::default();

        assert!(medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!(rec.t >= 4.0 && rec.t < 4.01);
        assert_eq!(rec.normal, Vec3::X);
        assert!(rec.front_face);
        assert!(rec.material.scatter(&ray, &rec, &mut rng).is_some());
    }

    #[test]
    fn test_thin_medium_mostly_passes() {
        let medium = fog(1e-6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut rec = HitRecord::default();

        let hits = (0..1000)
            .filter(|_| medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng))
            .count();
        assert!(hits < 10);
    }

    #[test]
    fn test_ray_starting_inside() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(4);
        let mut rec = HitRecord::default();

        assert!(medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!(rec.t > 0.0 && rec.t < 0.01);
    }

    #[test]
    fn test_interval_outside_volume() {
        let medium = fog(1e6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut rec = HitRecord::default();

        // The volume spans t in [4, 6]
        assert!(!medium.hit(&ray, Interval::new(0.001, 3.0), &mut rec, &mut rng));
        assert!(!medium.hit(&ray, Interval::new(7.0, 10.0), &mut rec, &mut rng));
    }

    #[test]
    fn test_bbox_from_boundary() {
        let medium = fog(0.5);
        assert_eq!(medium.bounding_box().x, Interval::new(-1.0, 1.0));
    }
}
