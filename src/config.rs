use serde::{Deserialize, Serialize};

use crate::error::FuzzError;

/// Parameters of the summary structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clusters created unconditionally before outlier testing begins.
    pub min_fc: usize,
    /// Hard ceiling on live clusters, enforced by eviction.
    pub max_fc: usize,
    /// Merge trigger on the similarity score.
    pub threshold: f64,
    /// Softness of membership assignment, must be greater than 1.
    pub fuzziness: f64,
    /// Track creation, eviction, absorption and merge counters.
    pub instrument: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_fc: 5,
            max_fc: 200,
            threshold: 1.,
            fuzziness: 2.,
            instrument: false,
        }
    }
}

impl Config {
    /// Checks parameter bounds.
    pub fn validate(&self) -> Result<(), FuzzError> {
        if self.min_fc == 0 {
            return Err(invalid("min_fc must be positive"));
        }
        if self.max_fc < self.min_fc {
            return Err(invalid(format!(
                "max_fc ({}) must not be lower than min_fc ({})",
                self.max_fc, self.min_fc
            )));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.) {
            return Err(invalid(format!(
                "threshold must be a positive real, got {}",
                self.threshold
            )));
        }
        if !(self.fuzziness.is_finite() && self.fuzziness > 1.) {
            return Err(invalid(format!(
                "fuzziness must be greater than 1, got {}",
                self.fuzziness
            )));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> FuzzError {
    FuzzError::InvalidConfiguration(reason.into())
}
