//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's top-level hittables, built once by
//! sorting along the longest axis and splitting at the median index.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Ray};
use ember_math::{Aabb, Interval};
use rand::RngCore;

/// BVH node - a branch over two children, or nothing at all.
///
/// A single primitive is stored as a branch whose children both point at
/// it, so every non-empty node has the same shape.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty node (built from an empty list).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Create a BVH over the objects of a list.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive BVH construction.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            n => {
                let axis = bbox.longest_axis();
                objects.sort_unstable_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

                let right_objects = objects.split_off(n / 2);
                let left: Arc<dyn Hittable> = Arc::new(Self::build(objects));
                let right: Arc<dyn Hittable> = Arc::new(Self::build(right_objects));
                (left, right)
            }
        };

        BvhNode::Branch { left, right, bbox }
    }
}

/// Order two hittables by the minimum of their boxes on `axis`.
fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec, rng);

                // A single-object node aliases its children; probing twice
                // would give stochastic objects (media) a second chance to hit.
                if Arc::ptr_eq(left, right) {
                    return hit_left;
                }

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
