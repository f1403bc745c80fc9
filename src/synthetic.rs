//! Synthetic star field generation for validation and self-test imagery.
//!
//! Provides floating point field construction, Gaussian and uniform-disk
//! star injection, and quantization down to integer sample planes that can
//! back a [`crate::buffer::PixelBuffer`].

use ndarray::Array2;
use num_traits::{Bounded, NumCast, ToPrimitive};

/// Create a uniform field at the given background level.
///
/// The array is indexed `[[y, x]]`, matching image row-major order.
pub fn blank_field(width: usize, height: usize, background: f64) -> Array2<f64> {
    Array2::from_elem((height, width), background)
}

/// Add a Gaussian point-spread star to a field.
///
/// Brightness is added on top of whatever the field already holds, so stars
/// stack over the background and over each other. Contributions are only
/// written within four sigma of the center.
///
/// # Arguments
/// * `field` - Field to write into
/// * `x_center` - Star center x, may be sub-pixel
/// * `y_center` - Star center y, may be sub-pixel
/// * `amplitude` - Peak brightness added at the center
/// * `sigma` - Gaussian width in pixels
pub fn inject_gaussian_star(
    field: &mut Array2<f64>,
    x_center: f64,
    y_center: f64,
    amplitude: f64,
    sigma: f64,
) {
    let (height, width) = field.dim();
    let reach = (4.0 * sigma).ceil() as isize;

    let x0 = x_center.round() as isize;
    let y0 = y_center.round() as isize;
    let x_min = (x0 - reach).clamp(0, width as isize) as usize;
    let x_max = (x0 + reach + 1).clamp(0, width as isize) as usize;
    let y_min = (y0 - reach).clamp(0, height as isize) as usize;
    let y_max = (y0 + reach + 1).clamp(0, height as isize) as usize;

    let sigma2 = sigma * sigma;
    for y in y_min..y_max {
        for x in x_min..x_max {
            let dx = x as f64 - x_center;
            let dy = y as f64 - y_center;
            field[[y, x]] += amplitude * (-(dx * dx + dy * dy) / (2.0 * sigma2)).exp();
        }
    }
}

/// Add a uniform disk to a field.
///
/// Every pixel whose center lies within `radius` of the disk center gains
/// `brightness`.
pub fn inject_disk(
    field: &mut Array2<f64>,
    x_center: f64,
    y_center: f64,
    radius: f64,
    brightness: f64,
) {
    let (height, width) = field.dim();
    let reach = radius.ceil() as isize;

    let x0 = x_center.round() as isize;
    let y0 = y_center.round() as isize;
    let x_min = (x0 - reach).clamp(0, width as isize) as usize;
    let x_max = (x0 + reach + 1).clamp(0, width as isize) as usize;
    let y_min = (y0 - reach).clamp(0, height as isize) as usize;
    let y_max = (y0 + reach + 1).clamp(0, height as isize) as usize;

    for y in y_min..y_max {
        for x in x_min..x_max {
            let dx = x as f64 - x_center;
            let dy = y as f64 - y_center;
            if (dx * dx + dy * dy).sqrt() <= radius {
                field[[y, x]] += brightness;
            }
        }
    }
}

/// Quantize a floating point field to an integer sample plane.
///
/// Values are rounded and clamped to the full range of the target type, so
/// an over-bright field saturates instead of wrapping.
pub fn quantize_plane<T>(field: &Array2<f64>) -> Array2<T>
where
    T: Copy + Bounded + NumCast + ToPrimitive,
{
    let lo = T::min_value().to_f64().unwrap_or(f64::MIN);
    let hi = T::max_value().to_f64().unwrap_or(f64::MAX);

    field.mapv(|value| {
        let clamped = value.round().clamp(lo, hi);
        NumCast::from(clamped).unwrap_or_else(T::min_value)
    })
}
