//! Tone mapping and image file output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Color, ImageBuffer, Result};
use ember_math::Interval;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f64| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

impl ImageBuffer {
    /// Convert to packed RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }

    /// Write as plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for color in &self.pixels {
            let [r, g, b] = color_to_rgb(*color);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Save to disk; `.ppm` is written as text, other extensions go
    /// through the `image` crate.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let file = File::create(path)?;
            self.write_ppm(BufWriter::new(file))?;
        } else {
            image::save_buffer(
                path,
                &self.to_rgb8(),
                self.width,
                self.height,
                image::ColorType::Rgb8,
            )?;
        }

        log::info!("Saved {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        // Clamped to 0.999 before scaling
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::splat(100.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 0.25, 0.0625)), [0, 128, 64]);
    }

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Color::new(1.0, 0.0, 0.25));
        image.set(1, 0, Color::ZERO);

        let mut out = Vec::new();
        image.write_ppm(&mut out).expect("write to vec");
        let text = String::from_utf8(out).expect("ascii output");
        assert_eq!(text, "P3\n2 1\n255\n255 0 128\n0 0 0\n");
    }

    #[test]
    fn test_save_png_and_ppm() {
        let dir = std::env::temp_dir().join(format!("ember-output-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");

        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        let png = dir.join("out.png");
        image.save(&png).expect("png written");
        let decoded = image::open(&png).expect("png readable").to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);

        let ppm = dir.join("out.ppm");
        image.save(&ppm).expect("ppm written");
        let text = std::fs::read_to_string(&ppm).expect("ppm readable");
        assert!(text.starts_with("P3\n3 2\n255\n"));
        assert_eq!(text.lines().count(), 3 + 6);

        std::fs::remove_dir_all(&dir).ok();
    }
}
