//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Emissive materials and a configurable background
//! - Anti-aliasing via multi-sampling
//! - Parallel bucket rendering with rayon

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, Error, HitRecord, Hittable, Ray, Result};
use ember_math::Interval;

/// Shadow-acne epsilon: scattered rays ignore hits closer than this.
const MIN_HIT_DISTANCE: f64 = 0.001;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Constant radiance in every direction.
    Solid(Color),
    /// Vertical blend from `horizon` (looking down) to `zenith` (looking up).
    Sky { horizon: Color, zenith: Color },
}

impl Background {
    /// The classic white-to-blue daylight gradient.
    pub fn sky() -> Self {
        Background::Sky {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }

    /// Radiance arriving along `ray` from outside the scene.
    pub fn color(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Sky { horizon, zenith } => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                horizon * (1.0 - a) + zenith * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
///
/// Every field has a default, so a partial JSON document is enough to
/// override just the settings it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Edge length of the square tiles handed to worker threads
    pub bucket_size: u32,
    /// Fixed seed for reproducible renders; entropy when unset
    pub seed: Option<u64>,
    /// What rays see when they miss everything
    pub background: Background,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: None,
            background: Background::default(),
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce budget exhausted
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::new(MIN_HIT_DISTANCE, f64::INFINITY), &mut rec, rng) {
        return config.background.color(ray);
    }

    let emission = rec.emitted();

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, config, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed, or a light
        None => emission,
    }
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f64
}

/// Averaged linear colors of a rendered image, row-major from the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn blit(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.index(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }
    }

    /// Mean of all pixels.
    pub fn average(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().sum::<Color>() / self.pixels.len() as f64
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene to an image buffer.
///
/// `camera` must already be initialized.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let never = AtomicBool::new(false);
    match render_buckets(camera, world, config, &never) {
        Some(image) => image,
        // Only reachable through cancellation
        None => ImageBuffer::new(camera.image_width, camera.image_height),
    }
}

/// Render, giving up between buckets once `cancel` is set.
pub fn render_with_cancel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> Result<ImageBuffer> {
    render_buckets(camera, world, config, cancel).ok_or(Error::Cancelled)
}

fn render_buckets(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> Option<ImageBuffer> {
    let (width, height) = (camera.image_width, camera.image_height);
    let buckets = generate_buckets(width, height, config.bucket_size);
    let total = buckets.len();
    let done = AtomicUsize::new(0);
    let start = Instant::now();

    log::info!(
        "Rendering {}x{} at {} spp, depth {} ({} buckets)",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        total
    );

    let results = buckets
        .par_iter()
        .map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }

            let mut rng = bucket_rng(config.seed, bucket);
            let result = render_bucket(bucket, camera, world, config, &mut rng);

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, finished, total);
            Some(result)
        })
        .collect::<Option<Vec<_>>>();

    let Some(results) = results else {
        log::warn!("Render cancelled after {}/{} buckets", done.load(Ordering::Relaxed), total);
        return None;
    };

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.blit(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Some(image)
}

/// Independent generator for one bucket.
fn bucket_rng(seed: Option<u64>, bucket: &Bucket) -> StdRng {
    match seed {
        Some(seed) => {
            // Spread consecutive bucket indices across the seed space
            let mixed = seed ^ (bucket.index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            StdRng::seed_from_u64(mixed)
        }
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseLight, Lambertian, Material, Sphere, Vec3};
    use std::sync::Arc;

    fn lambertian_scene() -> Sphere {
        let mat: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.5)));
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, mat)
    }

    #[test]
    fn test_sky_gradient() {
        let sky = Background::sky();
        let up = sky.color(&Ray::new(Vec3::ZERO, Vec3::Y, 0.0));
        let down = sky.color(&Ray::new(Vec3::ZERO, -Vec3::Y, 0.0));

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-12);
        assert!((down - Color::ONE).length() < 1e-12);
    }

    #[test]
    fn test_solid_background() {
        let bg = Background::Solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(bg.color(&Ray::new(Vec3::ZERO, Vec3::X, 0.0)), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_ray_color_depth_zero_is_black() {
        let world = lambertian_scene();
        let config = RenderConfig {
            background: Background::Solid(Color::ONE),
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        assert_eq!(ray_color(&ray, &world, 0, &config, &mut rng), Color::ZERO);
        // Missing with budget left returns the background
        assert_eq!(ray_color(&ray, &world, 1, &config, &mut rng), Color::ONE);
    }

    #[test]
    fn test_ray_color_emission() {
        let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::new(2.0, 3.0, 4.0)));
        let world = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, light);
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        assert_eq!(ray_color(&ray, &world, 5, &config, &mut rng), Color::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_ray_color_single_bounce_attenuates_background() {
        // One bounce off a 0.5 gray surface under a white sky
        let world = lambertian_scene();
        let config = RenderConfig {
            background: Background::Solid(Color::ONE),
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        // The scattered ray leaves the convex sphere and escapes
        let color = ray_color(&ray, &world, 2, &config, &mut rng);
        assert!((color - Color::splat(0.5)).length() < 1e-12);
        // With only one level of budget the bounce contributes nothing
        assert_eq!(ray_color(&ray, &world, 1, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_render_pixel() {
        let world = lambertian_scene();
        let mut camera = Camera::new().with_resolution(10, 10);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            background: Background::Solid(Color::new(0.5, 0.7, 1.0)),
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel hits the sphere and is darker than the sky
        let color = render_pixel(&camera, &world, 5, 5, &config, &mut rng);
        assert!(color.length() > 0.0);
        assert!(color.z < 1.0);
    }

    #[test]
    fn test_render_seeded_is_reproducible() {
        let world = lambertian_scene();
        let mut camera = Camera::new().with_resolution(16, 8);
        camera.initialize();
        let config = RenderConfig {
            samples_per_pixel: 2,
            max_depth: 4,
            bucket_size: 4,
            seed: Some(7),
            background: Background::sky(),
        };

        let a = render(&camera, &world, &config);
        let b = render(&camera, &world, &config);
        assert_eq!(a, b);
        assert_eq!(a.pixels.len(), 16 * 8);
    }

    #[test]
    fn test_render_with_cancel() {
        let world = lambertian_scene();
        let mut camera = Camera::new().with_resolution(8, 8);
        camera.initialize();
        let config = RenderConfig {
            samples_per_pixel: 1,
            ..RenderConfig::default()
        };

        let cancel = AtomicBool::new(true);
        let result = render_with_cancel(&camera, &world, &config, &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));

        let cancel = AtomicBool::new(false);
        let image = render_with_cancel(&camera, &world, &config, &cancel).expect("not cancelled");
        assert_eq!((image.width, image.height), (8, 8));
    }

    #[test]
    fn test_config_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"samples_per_pixel": 16, "seed": 3}"#).expect("valid json");
        assert_eq!(config.samples_per_pixel, 16);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.background, Background::Solid(Color::ZERO));

        let config: RenderConfig =
            serde_json::from_str(r#"{"background": {"solid": [0.1, 0.2, 0.3]}}"#).expect("valid json");
        assert_eq!(config.background, Background::Solid(Color::new(0.1, 0.2, 0.3)));
    }

    #[test]
    fn test_blit_places_bucket() {
        let mut image = ImageBuffer::new(4, 3);
        let bucket = Bucket::new(1, 1, 2, 2, 0);
        let pixels = vec![Color::ONE, Color::splat(2.0), Color::splat(3.0), Color::splat(4.0)];
        image.blit(&BucketResult::new(bucket, pixels));

        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.get(1, 1), Color::ONE);
        assert_eq!(image.get(2, 1), Color::splat(2.0));
        assert_eq!(image.get(1, 2), Color::splat(3.0));
        assert_eq!(image.get(2, 2), Color::splat(4.0));
        assert_eq!(image.get(3, 2), Color::ZERO);
    }
}
