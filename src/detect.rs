//! Star detection by threshold scan and seed-relative clustering.
//!
//! # Algorithm Overview
//!
//! 1. **Threshold scan**: walk the interior pixels (a 1-pixel border is
//!    excluded) in row-major order and collect every pixel whose brightness
//!    exceeds the configured threshold.
//! 2. **Seed-relative clustering**: process candidates in scan order. Each
//!    not-yet-assigned candidate seeds a new group and pulls in, from a
//!    single pass over the remaining unassigned candidates, every candidate
//!    closer than `min_separation` to the *seed*. Distance is measured to
//!    the seed only, never to other group members, so membership is not
//!    transitive and depends on scan order. This is intentional and load
//!    bearing: two pixels both in range of the seed merge even when they are
//!    out of range of each other, and a pixel just out of range of the seed
//!    starts its own group even when it touches a member.
//! 3. **Reduction**: each group becomes a star at the brightness-weighted
//!    centroid of its pixels, with the group mean brightness and a radius
//!    equal to the farthest member's distance from the centroid.
//! 4. **Size filter**: stars whose radius falls outside
//!    `[min_radius, max_radius]` or whose brightness does not exceed the
//!    threshold are dropped.
//!
//! # Cost
//!
//! The scan is O(W*H); clustering is O(C^2) in the number of candidates.
//! Tune `threshold` to keep the candidate count tractable on large frames.
//!
//! # Cancellation
//!
//! An optional deadline is polled cooperatively at phase boundaries. A phase
//! in flight is never interrupted; an overrun is reported before the next
//! phase starts and no partial star list is returned.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::star::Star;

/// Configuration for one detection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Brightness a pixel must exceed to become a candidate.
    pub threshold: f64,
    /// Minimum accepted star radius in pixels.
    pub min_radius: f64,
    /// Maximum accepted star radius in pixels.
    pub max_radius: f64,
    /// Candidates closer than this to a cluster seed join that cluster.
    pub min_separation: f64,
    /// Optional time budget, polled at phase boundaries.
    #[serde(default)]
    pub deadline: Option<Duration>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: 128.0,
            min_radius: 0.0,
            max_radius: 12.0,
            min_separation: 6.0,
            deadline: None,
        }
    }
}

/// A pixel above the detection threshold, transient to one pass.
#[derive(Debug, Clone, Copy)]
struct BrightPixel {
    x: usize,
    y: usize,
    brightness: f64,
}

impl BrightPixel {
    fn distance_to(&self, other: &BrightPixel) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Detect point sources in a pixel buffer.
///
/// Runs the threshold scan, seed-relative clustering, and size filter
/// described in the module documentation. The buffer is read-only and no
/// state is retained between calls, so repeated invocations with the same
/// inputs produce identical results.
///
/// # Arguments
/// * `buffer` - Decoded pixel buffer to scan
/// * `config` - Detection thresholds and optional time budget
///
/// # Returns
/// Detected stars in cluster scan order, or [`EngineError::Timeout`] if a
/// phase overran the configured deadline. An image with no candidate pixels
/// yields an empty list, not an error.
pub fn detect_stars(buffer: &PixelBuffer, config: &DetectionConfig) -> Result<Vec<Star>> {
    let started = Instant::now();

    let candidates = scan_candidates(buffer, config.threshold);
    check_deadline(&started, config.deadline, "scan")?;
    log::debug!(
        "threshold scan found {} candidate pixels above {}",
        candidates.len(),
        config.threshold
    );

    let groups = cluster_candidates(&candidates, config.min_separation);
    check_deadline(&started, config.deadline, "clustering")?;

    let stars: Vec<Star> = groups
        .iter()
        .map(|group| reduce_group(group))
        .filter(|star| {
            star.radius >= config.min_radius
                && star.radius <= config.max_radius
                && star.brightness > config.threshold
        })
        .collect();

    log::debug!(
        "{} of {} clusters kept after size filter in {:?}",
        stars.len(),
        groups.len(),
        started.elapsed()
    );
    Ok(stars)
}

/// Collect interior pixels brighter than the threshold, in row-major order.
fn scan_candidates(buffer: &PixelBuffer, threshold: f64) -> Vec<BrightPixel> {
    let mut candidates = Vec::new();

    // The 1-pixel border is excluded so a cluster never straddles the edge
    for y in 1..buffer.height().saturating_sub(1) {
        for x in 1..buffer.width().saturating_sub(1) {
            let brightness = buffer.brightness(x, y);
            if brightness > threshold {
                candidates.push(BrightPixel { x, y, brightness });
            }
        }
    }

    candidates
}

/// Group candidates by distance to each group's seed pixel.
///
/// Single pass per seed over the remaining unassigned candidates; distances
/// are measured to the seed only. O(C^2) worst case.
fn cluster_candidates(candidates: &[BrightPixel], min_separation: f64) -> Vec<Vec<BrightPixel>> {
    let mut assigned = vec![false; candidates.len()];
    let mut groups = Vec::new();

    for i in 0..candidates.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let seed = candidates[i];
        let mut group = vec![seed];

        for j in (i + 1)..candidates.len() {
            if assigned[j] {
                continue;
            }
            if seed.distance_to(&candidates[j]) < min_separation {
                assigned[j] = true;
                group.push(candidates[j]);
            }
        }

        groups.push(group);
    }

    groups
}

/// Reduce a pixel group to a star at its brightness-weighted centroid.
fn reduce_group(group: &[BrightPixel]) -> Star {
    let total: f64 = group.iter().map(|p| p.brightness).sum();

    let (x, y) = if total > 0.0 {
        let x = group.iter().map(|p| p.x as f64 * p.brightness).sum::<f64>() / total;
        let y = group.iter().map(|p| p.y as f64 * p.brightness).sum::<f64>() / total;
        (x, y)
    } else {
        // Zero-flux group degenerates to the unweighted mean
        let n = group.len() as f64;
        let x = group.iter().map(|p| p.x as f64).sum::<f64>() / n;
        let y = group.iter().map(|p| p.y as f64).sum::<f64>() / n;
        (x, y)
    };

    let radius = group
        .iter()
        .map(|p| {
            let dx = p.x as f64 - x;
            let dy = p.y as f64 - y;
            (dx * dx + dy * dy).sqrt()
        })
        .fold(0.0_f64, f64::max);

    Star {
        x,
        y,
        brightness: total / group.len() as f64,
        radius,
        pixel_count: group.len(),
        photometry: None,
        classification: None,
    }
}

fn check_deadline(
    started: &Instant,
    deadline: Option<Duration>,
    phase: &'static str,
) -> Result<()> {
    match deadline {
        Some(budget) if started.elapsed() > budget => Err(EngineError::Timeout { budget, phase }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;
    use crate::synthetic;
    use approx::assert_relative_eq;

    fn luma_buffer(data: &[u8], width: usize, height: usize) -> PixelBuffer<'_> {
        PixelBuffer::new(data, width, height, PixelFormat::Luma).unwrap()
    }

    #[test]
    fn test_all_dark_buffer_yields_empty_list() {
        let data = vec![10u8; 64 * 64];
        let buffer = luma_buffer(&data, 64, 64);

        let stars = detect_stars(&buffer, &DetectionConfig::default()).unwrap();
        assert!(stars.is_empty());
    }

    #[test]
    fn test_single_disk_detected_once() {
        let mut field = synthetic::blank_field(64, 64, 0.0);
        synthetic::inject_disk(&mut field, 20.0, 24.0, 3.0, 220.0);
        let plane = synthetic::quantize_plane::<u8>(&field);
        let buffer = PixelBuffer::from_luma(&plane).unwrap();

        let config = DetectionConfig {
            threshold: 100.0,
            min_separation: 7.0,
            ..Default::default()
        };
        let stars = detect_stars(&buffer, &config).unwrap();

        assert_eq!(stars.len(), 1);
        let star = &stars[0];
        assert!((star.x - 20.0).abs() < 1.0, "centroid x off: {}", star.x);
        assert!((star.y - 24.0).abs() < 1.0, "centroid y off: {}", star.y);
        assert_relative_eq!(star.radius, 3.0, epsilon = 0.01);
        assert_relative_eq!(star.brightness, 220.0, epsilon = 0.5);
    }

    #[test]
    fn test_clustering_is_seed_relative_not_transitive() {
        // Seed scanned first; two pixels each within range of the seed but
        // farther than min_separation from each other still merge
        let mut data = vec![0u8; 32 * 32];
        let set = |data: &mut Vec<u8>, x: usize, y: usize| data[y * 32 + x] = 200;
        set(&mut data, 10, 10); // seed, first in scan order
        set(&mut data, 7, 13); // 4.24 px from seed
        set(&mut data, 13, 13); // 4.24 px from seed, 6.0 px from the other

        let buffer = luma_buffer(&data, 32, 32);
        let config = DetectionConfig {
            threshold: 100.0,
            min_separation: 5.0,
            ..Default::default()
        };

        let stars = detect_stars(&buffer, &config).unwrap();
        assert_eq!(stars.len(), 1, "seed-relative pull-in must merge all three");
        assert_eq!(stars[0].pixel_count, 3);
    }

    #[test]
    fn test_pixel_outside_seed_range_starts_new_group() {
        // Third pixel is adjacent to a group member but out of range of the
        // seed, so it must open its own group
        let mut data = vec![0u8; 32 * 32];
        let set = |data: &mut Vec<u8>, x: usize, y: usize| data[y * 32 + x] = 200;
        set(&mut data, 10, 10); // seed
        set(&mut data, 10, 14); // 4 px from seed, joins
        set(&mut data, 10, 16); // 6 px from seed, 2 px from the member above

        let buffer = luma_buffer(&data, 32, 32);
        let config = DetectionConfig {
            threshold: 100.0,
            min_separation: 5.0,
            ..Default::default()
        };

        let stars = detect_stars(&buffer, &config).unwrap();
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].pixel_count, 2);
        assert_eq!(stars[1].pixel_count, 1);
    }

    #[test]
    fn test_border_pixels_excluded_from_scan() {
        let mut data = vec![0u8; 16 * 16];
        data[0] = 255; // (0, 0)
        data[15] = 255; // (15, 0)
        data[15 * 16 + 7] = 255; // (7, 15)

        let buffer = luma_buffer(&data, 16, 16);
        let stars = detect_stars(&buffer, &DetectionConfig::default()).unwrap();
        assert!(stars.is_empty());
    }

    #[test]
    fn test_size_filter_drops_out_of_range_radii() {
        let mut field = synthetic::blank_field(64, 64, 0.0);
        synthetic::inject_disk(&mut field, 30.0, 30.0, 3.0, 220.0);
        let plane = synthetic::quantize_plane::<u8>(&field);
        let buffer = PixelBuffer::from_luma(&plane).unwrap();

        let config = DetectionConfig {
            threshold: 100.0,
            min_radius: 4.0,
            min_separation: 7.0,
            ..Default::default()
        };
        let stars = detect_stars(&buffer, &config).unwrap();
        assert!(stars.is_empty(), "radius 3 disk must fail min_radius 4");

        let config = DetectionConfig {
            threshold: 100.0,
            max_radius: 2.0,
            min_separation: 7.0,
            ..Default::default()
        };
        let stars = detect_stars(&buffer, &config).unwrap();
        assert!(stars.is_empty(), "radius 3 disk must fail max_radius 2");
    }

    #[test]
    fn test_zero_deadline_times_out() {
        let mut field = synthetic::blank_field(256, 256, 0.0);
        synthetic::inject_disk(&mut field, 100.0, 100.0, 4.0, 220.0);
        let plane = synthetic::quantize_plane::<u8>(&field);
        let buffer = PixelBuffer::from_luma(&plane).unwrap();

        let config = DetectionConfig {
            threshold: 100.0,
            deadline: Some(Duration::ZERO),
            ..Default::default()
        };

        match detect_stars(&buffer, &config) {
            Err(EngineError::Timeout { phase, .. }) => assert_eq!(phase, "scan"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut field = synthetic::blank_field(96, 96, 5.0);
        synthetic::inject_gaussian_star(&mut field, 30.0, 40.0, 180.0, 1.5);
        synthetic::inject_gaussian_star(&mut field, 70.0, 60.0, 140.0, 1.5);
        let plane = synthetic::quantize_plane::<u8>(&field);
        let buffer = PixelBuffer::from_luma(&plane).unwrap();

        let config = DetectionConfig {
            threshold: 60.0,
            ..Default::default()
        };

        let first = detect_stars(&buffer, &config).unwrap();
        let second = detect_stars(&buffer, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
