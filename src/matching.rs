//! Cross-filter star matching and color-index classification.
//!
//! Stars detected independently through two filters are paired by a greedy
//! one-sided nearest-neighbor search, and each pair yields a B-V color
//! index for physical estimation.

use serde::{Deserialize, Serialize};

use crate::star::{Classification, Star};
use crate::stellar::{color_index_to_spectral_class, color_index_to_temperature};

/// Stars measured through a single filter, tagged with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterObservation {
    /// Filter label, for example "B" or "V".
    pub name: String,
    /// Stars from one detection and photometry run through this filter.
    pub stars: Vec<Star>,
}

impl FilterObservation {
    /// Tag a measured star list with its filter label.
    pub fn new(name: impl Into<String>, stars: Vec<Star>) -> Self {
        Self {
            name: name.into(),
            stars,
        }
    }
}

/// Pair each primary star with its nearest secondary star within range.
///
/// Greedy one-sided nearest neighbor: every primary star independently
/// selects the closest secondary star within `max_distance`, ties broken by
/// first encountered in scan order. A secondary star can be claimed by more
/// than one primary star; this is not a bipartite-optimal assignment and is
/// relied upon downstream.
///
/// Time complexity: O(n * m) by brute force.
///
/// # Returns
/// `(primary_index, secondary_index)` pairs, in primary scan order.
pub fn pair_stars(primary: &[Star], secondary: &[Star], max_distance: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(primary.len());

    for (i, star) in primary.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;

        for (j, candidate) in secondary.iter().enumerate() {
            let distance = star.distance_to(candidate);
            if distance > max_distance {
                continue;
            }
            // Strict comparison keeps the first-encountered star on ties
            let closer = match best {
                Some((_, best_distance)) => distance < best_distance,
                None => true,
            };
            if closer {
                best = Some((j, distance));
            }
        }

        if let Some((j, _)) = best {
            pairs.push((i, j));
        }
    }

    pairs
}

/// Match two filter observations and classify the paired stars.
///
/// Pairs the blue-filter stars against the visual-filter stars, computes
/// the color index `B - V` from their instrumental magnitudes, and returns
/// the visual-band stars augmented with a [`Classification`]. Stars that
/// found no counterpart within `max_distance` carry no classification and
/// are omitted. Stars without photometry cannot produce a color index and
/// are skipped.
pub fn classify_pairs(
    blue: &FilterObservation,
    visual: &FilterObservation,
    max_distance: f64,
) -> Vec<Star> {
    let pairs = pair_stars(&blue.stars, &visual.stars, max_distance);
    log::debug!(
        "matched {} of {} {} stars against {} {} stars",
        pairs.len(),
        blue.stars.len(),
        blue.name,
        visual.stars.len(),
        visual.name
    );

    let mut classified = Vec::with_capacity(pairs.len());
    for (blue_index, visual_index) in pairs {
        let blue_star = &blue.stars[blue_index];
        let visual_star = &visual.stars[visual_index];

        let (blue_photometry, visual_photometry) =
            match (blue_star.photometry, visual_star.photometry) {
                (Some(b), Some(v)) => (b, v),
                _ => {
                    log::warn!(
                        "skipping unmeasured star pair at ({:.1}, {:.1})",
                        visual_star.x,
                        visual_star.y
                    );
                    continue;
                }
            };

        let color_index = blue_photometry.magnitude - visual_photometry.magnitude;

        let mut star = visual_star.clone();
        star.classification = Some(Classification {
            color_index,
            temperature: color_index_to_temperature(color_index),
            spectral_class: color_index_to_spectral_class(color_index),
        });
        classified.push(star);
    }

    classified
}
