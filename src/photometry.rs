//! Aperture photometry over detected stars.
//!
//! # Methodology
//!
//! For each star the measurement follows standard aperture photometry:
//!
//! 1. **Aperture flux**: sum of brightness over every pixel whose center
//!    lies within `aperture_radius` of the star centroid, clipped to the
//!    buffer bounds. The pixel count serves as the aperture area.
//! 2. **Background**: mean and standard deviation of the pixels whose
//!    distance falls in `[annulus_inner, annulus_outer]`, clipped to the
//!    buffer bounds. An annulus that is fully off-buffer contributes a
//!    mean and deviation of zero.
//! 3. **Net flux**: aperture flux minus the background mean scaled by the
//!    aperture area, floored to 1 so the magnitude stays finite and a
//!    background-dominated aperture is never reported as a negative-flux
//!    detection.
//! 4. **Magnitude**: `-2.5 * log10(net_flux)`, instrumental only.
//! 5. **SNR**: `net_flux / sqrt(net_flux + background_std^2 * area)`. The
//!    flux floor keeps the denominator strictly positive.
//!
//! Stars are measured independently and in parallel; the result is sorted
//! ascending by magnitude, brightest first.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::star::{Photometry, Star};

/// Configuration for one photometry pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotometryConfig {
    /// Radius in pixels of the flux integration aperture.
    pub aperture_radius: f64,
    /// Inner radius of the background annulus in pixels.
    pub annulus_inner: f64,
    /// Outer radius of the background annulus in pixels.
    pub annulus_outer: f64,
}

impl Default for PhotometryConfig {
    fn default() -> Self {
        Self {
            aperture_radius: 4.0,
            annulus_inner: 6.0,
            annulus_outer: 10.0,
        }
    }
}

impl PhotometryConfig {
    fn validate(&self) -> Result<()> {
        if self.aperture_radius < 0.0 || self.annulus_inner < 0.0 || self.annulus_outer < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "aperture and annulus radii must be non-negative, got {:.1}/{:.1}/{:.1}",
                self.aperture_radius, self.annulus_inner, self.annulus_outer
            )));
        }
        if self.annulus_inner >= self.annulus_outer {
            return Err(EngineError::InvalidInput(format!(
                "annulus inner radius {:.1} must be smaller than outer radius {:.1}",
                self.annulus_inner, self.annulus_outer
            )));
        }
        Ok(())
    }
}

/// Measure net flux, instrumental magnitude, and SNR for each star.
///
/// Stars are consumed, augmented with [`Photometry`], and returned sorted
/// ascending by magnitude. Measurement is per-star independent and
/// read-only on the buffer, so the work runs data-parallel with a
/// deterministic output order.
///
/// # Arguments
/// * `buffer` - Decoded pixel buffer the stars were detected in
/// * `stars` - Detection results to measure
/// * `config` - Aperture and annulus geometry
///
/// # Returns
/// The measured stars, or [`EngineError::InvalidInput`] for a negative
/// radius or an annulus whose inner radius is not smaller than its outer.
pub fn measure_stars(
    buffer: &PixelBuffer,
    stars: Vec<Star>,
    config: &PhotometryConfig,
) -> Result<Vec<Star>> {
    config.validate()?;

    let mut measured: Vec<Star> = stars
        .into_par_iter()
        .map(|star| measure_one(buffer, star, config))
        .collect();

    measured.sort_by(|a, b| {
        let ma = a.photometry.map(|p| p.magnitude).unwrap_or(f64::INFINITY);
        let mb = b.photometry.map(|p| p.magnitude).unwrap_or(f64::INFINITY);
        ma.partial_cmp(&mb).unwrap_or(Ordering::Equal)
    });

    log::debug!("measured {} stars", measured.len());
    Ok(measured)
}

/// Measure a single star against its local background.
fn measure_one(buffer: &PixelBuffer, mut star: Star, config: &PhotometryConfig) -> Star {
    let (aperture_flux, aperture_area, background) = sample_regions(buffer, &star, config);

    let net_flux = (aperture_flux - background.mean * aperture_area as f64).max(1.0);
    let magnitude = -2.5 * net_flux.log10();
    let snr = net_flux / (net_flux + background.std * background.std * aperture_area as f64).sqrt();

    star.photometry = Some(Photometry {
        flux: net_flux,
        magnitude,
        snr,
    });
    star
}

struct BackgroundStats {
    mean: f64,
    std: f64,
}

/// Sample the aperture and annulus around a star center.
///
/// Walks a bounding window around the center, clipped to the buffer, and
/// splits pixels by center distance: aperture first, annulus otherwise.
fn sample_regions(
    buffer: &PixelBuffer,
    star: &Star,
    config: &PhotometryConfig,
) -> (f64, usize, BackgroundStats) {
    let width = buffer.width() as isize;
    let height = buffer.height() as isize;

    let reach = config.aperture_radius.max(config.annulus_outer).ceil() as isize;
    let x_center = star.x.round() as isize;
    let y_center = star.y.round() as isize;

    // Clamped window; fully off-buffer centers produce an empty range
    let x_min = (x_center - reach).clamp(0, width) as usize;
    let x_max = (x_center + reach + 1).clamp(0, width) as usize;
    let y_min = (y_center - reach).clamp(0, height) as usize;
    let y_max = (y_center + reach + 1).clamp(0, height) as usize;

    let mut aperture_flux = 0.0;
    let mut aperture_area = 0usize;
    let mut annulus = Vec::new();

    for y in y_min..y_max {
        for x in x_min..x_max {
            let dx = x as f64 - star.x;
            let dy = y as f64 - star.y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance <= config.aperture_radius {
                aperture_flux += buffer.brightness(x, y);
                aperture_area += 1;
            } else if distance >= config.annulus_inner && distance <= config.annulus_outer {
                annulus.push(buffer.brightness(x, y));
            }
        }
    }

    (aperture_flux, aperture_area, annulus_stats(&annulus))
}

/// Mean and population standard deviation, zero for an empty annulus.
fn annulus_stats(samples: &[f64]) -> BackgroundStats {
    if samples.is_empty() {
        return BackgroundStats {
            mean: 0.0,
            std: 0.0,
        };
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

    BackgroundStats {
        mean,
        std: variance.sqrt(),
    }
}
