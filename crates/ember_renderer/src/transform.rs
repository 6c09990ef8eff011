//! Rigid transform wrappers around another hittable.
//!
//! The incoming ray is moved into the child's local frame, the child is
//! intersected there, and the hit is moved back into world space.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use ember_math::{degrees_to_radians, Aabb, Interval, Vec3};
use rand::RngCore;

/// Translate a hittable by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        if !self.object.hit(&offset_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotate a hittable about the Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate by `angle` degrees, counter-clockwise looking down -Y.
    pub fn new(object: Arc<dyn Hittable>, angle: f64) -> Self {
        let radians = degrees_to_radians(angle);
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();
        let bbox = object.bounding_box();

        let mut min = Vec3::splat(f64::INFINITY);
        let mut max = Vec3::splat(f64::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 1 { bbox.x.max } else { bbox.x.min };
                    let y = if j == 1 { bbox.y.max } else { bbox.y.min };
                    let z = if k == 1 { bbox.z.max } else { bbox.z.min };

                    let corner = rotate_to_world(sin_theta, cos_theta, Vec3::new(x, y, z));
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }
}

/// Object space to world space.
#[inline]
fn rotate_to_world(sin_theta: f64, cos_theta: f64, v: Vec3) -> Vec3 {
    Vec3::new(
        cos_theta * v.x + sin_theta * v.z,
        v.y,
        -sin_theta * v.x + cos_theta * v.z,
    )
}

/// World space to object space.
#[inline]
fn rotate_to_object(sin_theta: f64, cos_theta: f64, v: Vec3) -> Vec3 {
    Vec3::new(
        cos_theta * v.x - sin_theta * v.z,
        v.y,
        sin_theta * v.x + cos_theta * v.z,
    )
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let (s, c) = (self.sin_theta, self.cos_theta);
        let rotated = Ray::new(
            rotate_to_object(s, c, ray.origin()),
            rotate_to_object(s, c, ray.direction()),
            ray.time(),
        );

        if !self.object.hit(&rotated, ray_t, rec, rng) {
            return false;
        }

        rec.p = rotate_to_world(s, c, rec.p);
        rec.normal = rotate_to_world(s, c, rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
