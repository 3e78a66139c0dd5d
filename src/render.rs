use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fractal::Mandelbrot;
use crate::math::Complex;
use crate::palette::{Rgb, assign_hsv, hsv_to_rgb};

pub const RENDER_ITERATION_LIMIT: u32 = 100;

/// Region of the complex plane shown on screen. `(0, 0)` maps to
/// `(real_start, imaginary_start)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub real_start: f64,
    pub real_end: f64,
    pub imaginary_start: f64,
    pub imaginary_end: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            real_start: -2.0,
            real_end: 1.0,
            imaginary_start: -1.0,
            imaginary_end: 1.0,
        }
    }
}

impl Viewport {
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            self.real_start,
            self.real_end,
            self.imaginary_start,
            self.imaginary_end,
        ];
        if bounds.iter().any(|b| !b.is_finite())
            || self.real_start == self.real_end
            || self.imaginary_start == self.imaginary_end
        {
            return Err(Error::InvalidConfiguration(format!(
                "viewport {:?} has no extent",
                self
            )));
        }
        Ok(())
    }

    pub fn point_at(&self, x: usize, y: usize, width: usize, height: usize) -> Complex {
        let re = self.real_start + (x as f64 / width as f64) * (self.real_end - self.real_start);
        let im = self.imaginary_start
            + (y as f64 / height as f64) * (self.imaginary_end - self.imaginary_start);
        Complex::new(re, im)
    }
}

/// Row-major raster of `0x00RRGGBB` pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelField {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl PixelField {
    pub fn filled(width: usize, height: usize, color: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "raster must be non-empty, got {}x{}",
                width, height
            )));
        }
        let len = width.checked_mul(height).ok_or_else(|| {
            Error::InvalidConfiguration(format!("raster {}x{} is too large", width, height))
        })?;
        Ok(PixelField {
            width,
            height,
            pixels: vec![color.to_u32(); len],
        })
    }

    /// Colors each pixel by the escape count of the point under it.
    pub fn generate(
        viewport: &Viewport,
        width: usize,
        height: usize,
        mandelbrot: &Mandelbrot,
    ) -> Result<Self> {
        viewport.validate()?;
        let mut field = PixelField::filled(width, height, Rgb::BLACK)?;
        debug!(width, height, limit = mandelbrot.limit(), "rendering pixel field");

        let limit = mandelbrot.limit();
        for y in 0..height {
            for x in 0..width {
                let result = mandelbrot.iterate(viewport.point_at(x, y, width, height));
                let hsv = assign_hsv(result.iterations, limit, result.converges);
                field.pixels[y * width + x] = hsv_to_rgb(hsv).to_u32();
            }
        }
        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(Rgb::from_u32(self.pixels[y * self.width + x]))
        } else {
            None
        }
    }

    /// Writes outside the raster are dropped.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color.to_u32();
        }
    }

    /// RGBA bytes with opaque alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &p in &self.pixels {
            let rgb = Rgb::from_u32(p);
            bytes.extend_from_slice(&[rgb.red, rgb.green, rgb.blue, 0xFF]);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_viewport_start() {
        let c = Viewport::default().point_at(0, 0, 300, 200);
        assert_eq!((c.real(), c.imaginary()), (-2.0, -1.0));
        let c = Viewport::default().point_at(150, 100, 300, 200);
        assert_eq!((c.real(), c.imaginary()), (-0.5, 0.0));
    }

    #[test]
    fn set_interior_is_black() {
        let field =
            PixelField::generate(&Viewport::default(), 30, 20, &Mandelbrot::new(RENDER_ITERATION_LIMIT))
                .unwrap();
        assert_eq!(field.pixels().len(), 600);
        // pixel (15, 10) sits on -0.5 + 0i
        assert_eq!(field.get(15, 10), Some(Rgb::BLACK));
        // top-left corner -2 - i escapes immediately
        assert_ne!(field.get(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn empty_raster_rejected() {
        let m = Mandelbrot::new(10);
        assert!(matches!(
            PixelField::generate(&Viewport::default(), 0, 10, &m),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn oversized_raster_rejected() {
        assert!(matches!(
            PixelField::filled(usize::MAX, 2, Rgb::BLACK),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn flat_viewport_rejected() {
        let viewport = Viewport { real_end: -2.0, ..Viewport::default() };
        assert!(viewport.validate().is_err());
    }

    #[test]
    fn rgba_is_opaque() {
        let mut field = PixelField::filled(2, 1, Rgb::WHITE).unwrap();
        field.set(1, 0, Rgb { red: 1, green: 2, blue: 3 });
        field.set(5, 5, Rgb::BLACK);
        assert_eq!(field.to_rgba(), vec![255, 255, 255, 255, 1, 2, 3, 255]);
    }
}
