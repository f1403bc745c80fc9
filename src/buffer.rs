//! Pixel buffer access for decoded raster images.
//!
//! The engine receives an already-decoded pixel buffer from the image-loading
//! layer and reads scalar brightness values from it. The buffer is borrowed
//! for the duration of one analysis call and is never mutated.

use ndarray::Array2;

use crate::error::{EngineError, Result};

/// Sample layout of a decoded pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One grayscale sample per pixel.
    Luma,
    /// Three samples per pixel: red, green, blue.
    Rgb,
    /// Four samples per pixel: red, green, blue, alpha.
    Rgba,
}

impl PixelFormat {
    /// Number of samples stored per pixel.
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Luma => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Number of leading samples that carry color information.
    ///
    /// Alpha does not contribute to brightness.
    fn color_channels(&self) -> usize {
        match self {
            PixelFormat::Luma => 1,
            PixelFormat::Rgb | PixelFormat::Rgba => 3,
        }
    }
}

/// Immutable view over a row-major decoded image.
///
/// Brightness at a pixel is the mean of its color channels, in the range of
/// the source sample depth (0-255 for 8-bit buffers).
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap a row-major sample slice.
    ///
    /// # Arguments
    /// * `data` - Row-major samples, `width * height * channels` long
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `format` - Sample layout of `data`
    ///
    /// # Returns
    /// A buffer view, or [`EngineError::InvalidInput`] if either dimension is
    /// zero or the slice length does not match the dimensions.
    pub fn new(data: &'a [u8], width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidInput(format!(
                "buffer dimensions must be non-zero, got {width}x{height}"
            )));
        }

        let expected = width * height * format.channels();
        if data.len() != expected {
            return Err(EngineError::InvalidInput(format!(
                "buffer length {} does not match {width}x{height} {format:?} ({expected} samples)",
                data.len()
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Wrap a standard-layout grayscale plane.
    pub fn from_luma(plane: &'a Array2<u8>) -> Result<Self> {
        let (height, width) = plane.dim();
        let data = plane.as_slice().ok_or_else(|| {
            EngineError::InvalidInput("grayscale plane is not in standard row-major layout".into())
        })?;
        Self::new(data, width, height, PixelFormat::Luma)
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample layout of the underlying data.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Brightness at a coordinate as the mean of its color channels.
    ///
    /// Coordinates beyond the buffer clamp to the nearest edge pixel.
    pub fn brightness(&self, x: usize, y: usize) -> f64 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);

        let channels = self.format.channels();
        let color = self.format.color_channels();
        let offset = (y * self.width + x) * channels;

        let sum: u32 = self.data[offset..offset + color]
            .iter()
            .map(|&s| u32::from(s))
            .sum();
        f64::from(sum) / color as f64
    }
}
