//! Textures: color lookups by surface coordinates and position.

use std::path::Path;
use std::sync::Arc;

use crate::{Color, Error, Perlin, Result};
use ember_math::{Interval, Vec3};
use rand::RngCore;

/// Shown when an image texture has no pixel data.
const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Trait for color lookups at a surface point.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates `(u, v)` and world position `p`.
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two textures.
///
/// Space is cut into cubic cells of side `scale`; the parity of the summed
/// cell indices picks `even` or `odd`.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let is_even = ((cell.x + cell.y + cell.z) as i64) % 2 == 0;

        if is_even {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Marble-like pattern from Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    /// Octaves summed by the turbulence term.
    pub const TURBULENCE_DEPTH: usize = 7;

    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Vec3) -> Color {
        let turbulence = self.noise.turbulence(p, Self::TURBULENCE_DEPTH);
        Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * turbulence).sin())
    }
}

/// Nearest-pixel lookup into a decoded raster.
///
/// Pixels are converted from sRGB to linear light once, at load time.
pub struct ImageTexture {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Decode an image file (any format the `image` crate reads).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| Error::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        log::debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            width,
            height
        );

        Ok(Self::from_rgb8(width, height, rgb.as_raw()))
    }

    /// Build from packed 8-bit sRGB triples, row 0 at the top.
    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> Self {
        let pixels = bytes
            .chunks_exact(3)
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Vec3) -> Color {
        if self.height == 0 || self.width == 0 {
            return MISSING_IMAGE_COLOR;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Image rows run top-down, v runs bottom-up
        let v = 1.0 - unit.clamp(v);

        let x = Interval::new(0.0, (self.width - 1) as f64).clamp(u * self.width as f64);
        let y = Interval::new(0.0, (self.height - 1) as f64).clamp(v * self.height as f64);
        let index = y as usize * self.width + x as usize;

        self.pixels
            .get(index)
            .copied()
            .unwrap_or(MISSING_IMAGE_COLOR)
    }
}

/// Convert an sRGB byte to linear light.
fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
