//! Thin-lens camera.
//!
//! The camera only frames the scene. How many samples to take, how deep
//! paths go and what escaping rays see all live in `RenderConfig`.

use crate::sampling::{gen_f64, random_in_unit_disk};
use crate::Ray;
use ember_math::{degrees_to_radians, Vec3};
use rand::RngCore;

/// Thin-lens camera. Configure with the `with_*` builders, then call
/// [`Camera::initialize`] before asking for rays.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view, degrees
    vfov: f64,
    /// Cone angle through each pixel, degrees; zero is a pinhole
    defocus_angle: f64,
    focus_dist: f64,

    view: Viewport,
}

/// Pixel grid and lens disk in world space.
#[derive(Debug, Clone, Copy, Default)]
struct Viewport {
    origin: Vec3,
    /// Center of pixel (0, 0), top-left
    pixel00: Vec3,
    step_x: Vec3,
    step_y: Vec3,
    lens_x: Vec3,
    lens_y: Vec3,
}

impl Camera {
    /// A 100x100 pinhole at the origin looking down -Z with a 90 degree field of view.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            image_height: 100,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            view: Viewport::default(),
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set the width and derive the height from an aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64, width: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = ((width as f64 / aspect_ratio) as u32).max(1);
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Field of view, defocus cone angle (both in degrees) and focus distance.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Derive the pixel grid and lens disk from the current settings.
    pub fn initialize(&mut self) {
        let forward = (self.look_at - self.look_from).normalize();
        let right = forward.cross(self.vup).normalize();
        let up = right.cross(forward);

        let half_height = self.focus_dist * (degrees_to_radians(self.vfov) / 2.0).tan();
        let half_width = half_height * self.image_width as f64 / self.image_height as f64;

        let step_x = right * (2.0 * half_width / self.image_width as f64);
        let step_y = -up * (2.0 * half_height / self.image_height as f64);
        let top_left =
            self.look_from + self.focus_dist * forward - half_width * right + half_height * up;

        let lens_radius = self.focus_dist * degrees_to_radians(self.defocus_angle / 2.0).tan();

        self.view = Viewport {
            origin: self.look_from,
            pixel00: top_left + 0.5 * (step_x + step_y),
            step_x,
            step_y,
            lens_x: right * lens_radius,
            lens_y: up * lens_radius,
        };
    }

    /// Ray through a random point of pixel `(i, j)` at a random shutter time.
    ///
    /// `i` counts columns left to right, `j` rows top to bottom.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let view = &self.view;
        let jitter_x = gen_f64(rng) - 0.5;
        let jitter_y = gen_f64(rng) - 0.5;
        let target = view.pixel00
            + (i as f64 + jitter_x) * view.step_x
            + (j as f64 + jitter_y) * view.step_y;

        let origin = if self.defocus_angle > 0.0 {
            let p = random_in_unit_disk(rng);
            view.origin + p.x * view.lens_x + p.y * view.lens_y
        } else {
            view.origin
        };

        Ray::new(origin, target - origin, gen_f64(rng))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
