//! LUMEN - Luminosity Measurement ENgine
//!
//! Stellar detection and photometry for color-magnitude analysis. The
//! pipeline takes a decoded pixel buffer and runs through sequential
//! stages:
//!
//! 1. [`detect::detect_stars`] - threshold scan and clustering into star
//!    candidates with sub-pixel centroids
//! 2. [`photometry::measure_stars`] - aperture flux, instrumental
//!    magnitude, and SNR against a local background annulus
//! 3. [`matching::classify_pairs`] - cross-filter pairing into B-V color
//!    indices (when two filter observations exist)
//! 4. [`stellar`] - effective temperature, spectral class, and relative
//!    luminosity estimation
//! 5. [`chart::build_chart_points`] - plottable records for the
//!    visualization layer
//!
//! Every call is self-contained: the buffer and configuration go in, the
//! star list comes out, and nothing is retained between calls. Image
//! decoding, chart rendering, and persistence live outside this crate.

pub mod buffer;
pub mod chart;
pub mod detect;
pub mod error;
pub mod matching;
pub mod photometry;
pub mod star;
pub mod stellar;
pub mod synthetic;

pub use buffer::{PixelBuffer, PixelFormat};
pub use chart::{build_chart_points, temperature_to_display_color, ChartPoint};
pub use detect::{detect_stars, DetectionConfig};
pub use error::{EngineError, Result};
pub use matching::{classify_pairs, pair_stars, FilterObservation};
pub use photometry::{measure_stars, PhotometryConfig};
pub use star::{Classification, Photometry, Star};
pub use stellar::{
    color_index_to_spectral_class, color_index_to_temperature, relative_luminosity, SpectralClass,
};

/// Run detection and photometry as one pass over a buffer.
///
/// The shape most callers want for a single filter observation. A field
/// with no detectable stars is reported as [`EngineError::NoData`];
/// callers composing the stages by hand get an empty list instead from
/// [`detect_stars`].
pub fn analyze(
    buffer: &PixelBuffer,
    detection: &DetectionConfig,
    photometry: &PhotometryConfig,
) -> Result<Vec<Star>> {
    let candidates = detect_stars(buffer, detection)?;
    if candidates.is_empty() {
        return Err(EngineError::NoData);
    }
    measure_stars(buffer, candidates, photometry)
}
