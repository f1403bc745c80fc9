//! Chart-ready records for color-magnitude diagrams.
//!
//! The sole surface exposed to the visualization layer: classified stars
//! map to plottable records, nothing here detects or measures.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::star::Star;

/// One plottable record for a color-magnitude diagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// B-V color index, the chart x-axis.
    pub color_index: f64,
    /// Instrumental magnitude, the chart y-axis; brighter is more negative.
    pub magnitude: f64,
    /// Display color as an sRGB triplet.
    pub display_color: [u8; 3],
}

/// Display color table over seven temperature bands, hottest to coolest.
const DISPLAY_COLORS: [[u8; 3]; 7] = [
    [155, 176, 255], // blue
    [170, 191, 255], // blue-white
    [202, 215, 255], // white
    [248, 247, 255], // yellow-white
    [255, 244, 234], // yellow
    [255, 210, 161], // orange
    [255, 204, 111], // red
];

/// Look up the display color for an effective temperature.
///
/// Discrete lookup over seven bands whose boundaries follow the Harvard
/// classification temperature ranges.
pub fn temperature_to_display_color(temperature: f64) -> [u8; 3] {
    if temperature >= 30000.0 {
        DISPLAY_COLORS[0]
    } else if temperature >= 10000.0 {
        DISPLAY_COLORS[1]
    } else if temperature >= 7500.0 {
        DISPLAY_COLORS[2]
    } else if temperature >= 6000.0 {
        DISPLAY_COLORS[3]
    } else if temperature >= 5200.0 {
        DISPLAY_COLORS[4]
    } else if temperature >= 3700.0 {
        DISPLAY_COLORS[5]
    } else {
        DISPLAY_COLORS[6]
    }
}

/// Map classified stars to chart records.
///
/// Stars without photometry or classification cannot be plotted and are
/// skipped. Zero plottable stars is reported as [`EngineError::NoData`] so
/// the caller can distinguish an empty chart from a malformed request.
pub fn build_chart_points(stars: &[Star]) -> Result<Vec<ChartPoint>> {
    let points: Vec<ChartPoint> = stars
        .iter()
        .filter_map(|star| {
            let photometry = star.photometry?;
            let classification = star.classification?;
            Some(ChartPoint {
                color_index: classification.color_index,
                magnitude: photometry.magnitude,
                display_color: temperature_to_display_color(classification.temperature),
            })
        })
        .collect();

    if points.is_empty() {
        return Err(EngineError::NoData);
    }
    Ok(points)
}
