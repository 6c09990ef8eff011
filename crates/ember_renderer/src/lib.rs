//! Ember renderer - CPU Monte Carlo path tracing.
//!
//! Scenes are trees of [`Hittable`]s (spheres, quads, volumes, transform
//! wrappers, lists and BVH nodes) carrying shared [`Material`]s and
//! [`Texture`]s. The integrator in [`ray_color`] follows one random light
//! path per sample; [`render`] spreads the image across threads in buckets.

mod bucket;
mod bvh;
mod camera;
mod constant_medium;
mod error;
mod hittable;
mod material;
mod output;
mod perlin;
mod quad;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod transform;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use constant_medium::ConstantMedium;
pub use error::{Error, Result};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use output::{color_to_rgb, linear_to_gamma};
pub use perlin::Perlin;
pub use quad::{cornell_box, make_box, Quad};
pub use renderer::{
    ray_color, render, render_pixel, render_with_cancel, Background, ImageBuffer, RenderConfig,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{RotateY, Translate};

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};

/// Linear RGB color. Components are unbounded until tone mapping.
pub type Color = Vec3;
