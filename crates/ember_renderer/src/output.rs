//! Image output: gamma correction, quantization and file encoding.
//!
//! Linear colors are gamma corrected with gamma 2 (square root), clamped to
//! `[0, 0.999]` and scaled to bytes. Images are written either as plain-text
//! PPM (`P3`) or, through the `image` crate, as PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{OutputError, OutputResult};
use crate::Color;
use ember_math::Interval;

/// Largest channel value written to PPM headers.
pub const MAX_CHANNEL: u32 = 255;

/// Channel range before scaling to bytes; the upper bound keeps 1.0 at 255.
const INTENSITY: Interval = Interval::new(0.000, 0.999);

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize one linear channel to a byte.
#[inline]
fn channel_to_byte(linear: f64) -> u8 {
    (256.0 * INTENSITY.clamp(linear_to_gamma(linear))) as u8
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        channel_to_byte(color.x),
        channel_to_byte(color.y),
        channel_to_byte(color.z),
    ]
}

/// Receives a rendered image one pixel at a time, in row-major order.
pub trait PixelSink {
    /// Called once before the first pixel.
    fn begin(&mut self, width: u32, height: u32) -> OutputResult<()>;

    /// Append the next averaged linear color.
    fn put(&mut self, color: Color) -> OutputResult<()>;

    /// Called once after the last pixel.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Streams a plain-text PPM (`P3`) image to a writer.
pub struct PpmWriter<W: Write> {
    writer: W,
    expected: usize,
    written: usize,
}

impl<W: Write> PpmWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            expected: 0,
            written: 0,
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PixelSink for PpmWriter<W> {
    fn begin(&mut self, width: u32, height: u32) -> OutputResult<()> {
        self.expected = width as usize * height as usize;
        self.written = 0;
        writeln!(self.writer, "P3")?;
        writeln!(self.writer, "{} {}", width, height)?;
        writeln!(self.writer, "{}", MAX_CHANNEL)?;
        Ok(())
    }

    fn put(&mut self, color: Color) -> OutputResult<()> {
        let [r, g, b] = color_to_rgb8(color);
        writeln!(self.writer, "{} {} {}", r, g, b)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.written != self.expected {
            return Err(OutputError::SizeMismatch {
                expected: self.expected,
                actual: self.written,
            });
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// A linear-color image held in memory.
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

    /// Wrap existing row-major pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> OutputResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(OutputError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
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

    /// Gamma-corrected RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgb8(*color))
            .collect()
    }

    /// Write the image as plain-text PPM.
    pub fn write_ppm<W: Write>(&self, writer: W) -> OutputResult<()> {
        let mut sink = PpmWriter::new(writer);
        sink.begin(self.width, self.height)?;
        for color in &self.pixels {
            sink.put(*color)?;
        }
        sink.finish()
    }

    /// Save to disk, picking the encoding from the file extension.
    ///
    /// `.ppm` writes plain-text PPM, `.png` writes PNG.
    pub fn save(&self, path: impl AsRef<Path>) -> OutputResult<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "ppm" => {
                let file = File::create(path)?;
                self.write_ppm(BufWriter::new(file))
            }
            "png" => {
                let expected = self.pixels.len() * 3;
                let bytes = self.to_rgb8();
                let actual = bytes.len();
                let rgb = image::RgbImage::from_raw(self.width, self.height, bytes)
                    .ok_or(OutputError::SizeMismatch { expected, actual })?;
                rgb.save_with_format(path, image::ImageFormat::Png)?;
                Ok(())
            }
            other => Err(OutputError::UnsupportedFormat(other.to_string())),
        }?;

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl PixelSink for ImageBuffer {
    fn begin(&mut self, width: u32, height: u32) -> OutputResult<()> {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.reserve(width as usize * height as usize);
        Ok(())
    }

    fn put(&mut self, color: Color) -> OutputResult<()> {
        self.pixels.push(color);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(OutputError::SizeMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// Calibration image: red ramps left to right, green ramps top to bottom.
pub fn test_pattern(width: u32, height: u32) -> ImageBuffer {
    let x_span = width.saturating_sub(1).max(1) as f64;
    let y_span = height.saturating_sub(1).max(1) as f64;

    let mut image = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            image.set(x, y, Color::new(x as f64 / x_span, y as f64 / y_span, 0.0));
        }
    }
    image
}
