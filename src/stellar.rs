//! Physical quantity estimation from photometric color indices.
//!
//! Converts a B-V color index into effective temperature, a Harvard spectral
//! class bucket, and a relative luminosity proxy. The temperature conversion
//! uses the Ballesteros empirical relation, which is calibrated for
//! main-sequence-like stars; no clamping is applied, so extreme color
//! indices can yield non-physical temperatures. Callers are responsible for
//! sane input ranges.
//!
//! # Examples
//!
//! ```rust
//! use lumen::stellar::{color_index_to_spectral_class, SpectralClass};
//!
//! // The Sun has B-V of about 0.66
//! assert_eq!(color_index_to_spectral_class(0.66), SpectralClass::G);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The Harvard spectral classification buckets, hottest to coolest.
///
/// Classes are assigned from the B-V color index by ascending threshold,
/// first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectralClass {
    /// O-type stars: blue, B-V below -0.30.
    O,
    /// B-type stars: blue-white, B-V below -0.02.
    B,
    /// A-type stars: white, B-V below 0.30.
    A,
    /// F-type stars: yellow-white, B-V below 0.58.
    F,
    /// G-type stars: yellow, like the Sun, B-V below 0.81.
    G,
    /// K-type stars: orange, B-V below 1.40.
    K,
    /// M-type stars: red, B-V of 1.40 and above.
    M,
}

impl fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SpectralClass::O => 'O',
                SpectralClass::B => 'B',
                SpectralClass::A => 'A',
                SpectralClass::F => 'F',
                SpectralClass::G => 'G',
                SpectralClass::K => 'K',
                SpectralClass::M => 'M',
            }
        )
    }
}

/// Estimate effective temperature in Kelvin from a B-V color index.
///
/// Uses the Ballesteros empirical relation:
///
/// `T = 4600 * (1 / (0.92 * BV + 1.7) + 1 / (0.92 * BV + 0.62))`
///
/// Valid for main-sequence-like B-V ranges. Inputs outside that range are
/// passed through the formula unclamped and can produce non-physical
/// results.
pub fn color_index_to_temperature(color_index: f64) -> f64 {
    4600.0 * (1.0 / (0.92 * color_index + 1.7) + 1.0 / (0.92 * color_index + 0.62))
}

/// Assign a Harvard spectral class from a B-V color index.
///
/// Thresholds are checked in ascending order, first match wins.
pub fn color_index_to_spectral_class(color_index: f64) -> SpectralClass {
    if color_index < -0.30 {
        SpectralClass::O
    } else if color_index < -0.02 {
        SpectralClass::B
    } else if color_index < 0.30 {
        SpectralClass::A
    } else if color_index < 0.58 {
        SpectralClass::F
    } else if color_index < 0.81 {
        SpectralClass::G
    } else if color_index < 1.40 {
        SpectralClass::K
    } else {
        SpectralClass::M
    }
}

/// Relative luminosity proxy from a V-band magnitude.
///
/// Assumes a zero distance modulus, so this is a display-only quantity,
/// not an absolute luminosity: `L = 10^(-0.4 * V)`.
pub fn relative_luminosity(v_magnitude: f64) -> f64 {
    10f64.powf(-0.4 * v_magnitude)
}
