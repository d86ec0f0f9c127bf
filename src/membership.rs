//! Fuzzy membership degrees and cluster similarity.

use crate::error::FuzzError;

/// Computes membership degrees for a fixed fuzziness parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Membership {
    /// `2 / (m - 1)`
    exponent: f64,
}

impl Membership {
    /// Builds a new engine. Fuzziness must be greater than 1.
    pub fn new(fuzziness: f64) -> Result<Self, FuzzError> {
        if !(fuzziness.is_finite() && fuzziness > 1.) {
            return Err(FuzzError::InvalidConfiguration(format!(
                "fuzziness must be greater than 1, got {}",
                fuzziness
            )));
        }
        Ok(Self {
            exponent: 2. / (fuzziness - 1.),
        })
    }

    /// Membership degree of a point to each cluster, given its distances to
    /// the cluster prototypes. Degrees sum to 1.
    ///
    /// When the point coincides with a prototype, the first such cluster
    /// gets degree 1 and all others 0. An infinitely distant cluster gets degree 0.
    pub fn degrees(&self, dists: &[f64]) -> Vec<f64> {
        if let Some(hit) = dists.iter().position(|d| *d == 0.) {
            return (0..dists.len())
                .map(|i| if i == hit { 1. } else { 0. })
                .collect();
        }
        dists
            .iter()
            .map(|di| {
                if di.is_infinite() {
                    return 0.;
                }
                let sum: f64 = dists.iter().map(|dj| (di / dj).powf(self.exponent)).sum();
                1. / sum
            })
            .collect()
    }
}

/// Similarity of two clusters: the sum of their radii over the distance
/// between their prototypes. Coinciding prototypes are maximally similar.
pub fn similarity(radius1: f64, radius2: f64, dist: f64) -> f64 {
    if dist == 0. {
        f64::INFINITY
    } else {
        (radius1 + radius2) / dist
    }
}
