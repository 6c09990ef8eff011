//! Parallelogram primitive and the boxes built from it.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A parallelogram spanned by edges `u` and `v` from corner `q`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n·n)`, turns cross products into planar coordinates
    w: Vec3,
    normal: Vec3,
    d: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // Box over both diagonals
        let diag1 = Aabb::from_points(q, q + u + v);
        let diag2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox: Aabb::surrounding(&diag1, &diag2),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Planar coordinates `(alpha, beta)` of `p` relative to `q`, `u`, `v`.
    fn planar_coords(&self, p: Vec3) -> (f64, f64) {
        let planar_hitpt = p - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));
        (alpha, beta)
    }

    /// Interior test in planar coordinates; edges count as inside.
    fn is_interior(alpha: f64, beta: f64) -> bool {
        let unit = Interval::new(0.0, 1.0);
        unit.contains(alpha) && unit.contains(beta)
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let (alpha, beta) = self.planar_coords(intersection);
        if !Self::is_interior(alpha, beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six faces of the box spanned by two opposite corners.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = HittableList::new();
    // front, right, back, left, top, bottom
    sides.push(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone()));
    sides.push(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone()));
    sides.push(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone()));
    sides.push(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone()));
    sides.push(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone()));
    sides.push(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material));
    sides
}

/// The 555-unit Cornell enclosure with its ceiling light.
///
/// `back` covers the floor, ceiling and back wall.
pub fn cornell_box(
    left: Arc<dyn Material>,
    back: Arc<dyn Material>,
    right: Arc<dyn Material>,
    light: Arc<dyn Material>,
) -> HittableList {
    let mut walls = HittableList::new();
    walls.push(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        left,
    ));
    walls.push(Quad::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        right,
    ));
    walls.push(Quad::new(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        light,
    ));
    walls.push(Quad::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        back.clone(),
    ));
    walls.push(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        back.clone(),
    ));
    walls.push(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        back,
    ));
    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Color::splat(0.5)))
    }

    fn assert_interval_near(i: Interval, min: f64, max: f64) {
        // Flat faces are padded before merging
        assert!((i.min - min).abs() < 1e-4 && (i.max - max).abs() < 1e-4, "{i:?}");
    }

    fn unit_quad() -> Quad {
        // Unit square in the z = 0 plane
        Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, gray())
    }

    fn shoot(quad: &Quad, x: f64, y: f64) -> Option<(f64, f64, f64)> {
        let ray = Ray::new(Vec3::new(x, y, 1.0), -Vec3::Z, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);
        quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng)
            .then_some((rec.t, rec.u, rec.v))
    }

    #[test]
    fn test_quad_center_hit() {
        let quad = unit_quad();
        let (t, u, v) = shoot(&quad, 0.25, 0.75).expect("center hit");
        assert!((t - 1.0).abs() < 1e-12);
        assert!((u - 0.25).abs() < 1e-12);
        assert!((v - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_quad_edges_inclusive() {
        let quad = unit_quad();
        assert!(shoot(&quad, 0.0, 0.5).is_some());
        assert!(shoot(&quad, 1.0, 0.5).is_some());
        assert!(shoot(&quad, 0.5, 0.0).is_some());
        assert!(shoot(&quad, 0.5, 1.0).is_some());
        assert!(shoot(&quad, 1.0, 1.0).is_some());

        assert!(shoot(&quad, -1e-9, 0.5).is_none());
        assert!(shoot(&quad, 1.0 + 1e-9, 0.5).is_none());
        assert!(shoot(&quad, 0.5, -1e-9).is_none());
        assert!(shoot(&quad, 0.5, 1.0 + 1e-9).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.5, 0.5, 0.0), Vec3::X, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!quad.hit(&ray, Interval::UNIVERSE, &mut rec, &mut rng));
    }

    #[test]
    fn test_quad_bbox_is_padded() {
        let bbox = unit_quad().bounding_box();
        assert!(bbox.z.size() >= 1e-4);
        assert_eq!(bbox.x, Interval::new(0.0, 1.0));
        assert_eq!(bbox.y, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_quad_back_face() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::Z, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_make_box() {
        let sides = make_box(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 0.0), gray());
        assert_eq!(sides.len(), 6);

        let bbox = sides.bounding_box();
        assert_interval_near(bbox.x, -1.0, 1.0);
        assert_interval_near(bbox.y, 0.0, 2.0);
        assert_interval_near(bbox.z, 0.0, 3.0);

        // A ray through the box enters at the near face
        let ray = Ray::new(Vec3::new(0.0, 1.0, 10.0), -Vec3::Z, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sides.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 7.0).abs() < 1e-12);
        assert!(rec.front_face);
    }

    #[test]
    fn test_cornell_box_encloses_room() {
        let light: Arc<dyn Material> = Arc::new(crate::DiffuseLight::from_color(Color::splat(7.0)));
        let walls = cornell_box(gray(), gray(), gray(), light);
        assert_eq!(walls.len(), 6);

        let bbox = walls.bounding_box();
        assert_interval_near(bbox.x, 0.0, 555.0);
        assert_interval_near(bbox.y, 0.0, 555.0);
        assert_interval_near(bbox.z, 0.0, 555.0);

        // Looking up from the floor center hits the light just below the ceiling
        let ray = Ray::new(Vec3::new(278.0, 1.0, 278.0), Vec3::Y, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(walls.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.p.y - 554.0).abs() < 1e-9);
        assert_eq!(rec.emitted(), Color::splat(7.0));
    }
}
