//! Offline purity of a cluster set against a labeled stream.
//!
//! Each labeled point is attributed to the nearest cluster whose dispersion radius
//! strictly contains it, if any. A cluster scores the count of its majority label,
//! and purity is the sum of these scores over the number of points.

use std::collections::HashMap;

use crate::{
    cluster::MicroCluster,
    record::Record,
    space::{euclid_dist, RealPoint},
};

/// Computes purity, a value in [0, 1]. An empty stream has purity 0.
pub fn purity<'a>(
    clusters: impl IntoIterator<Item = &'a MicroCluster>,
    records: &[Record],
) -> f64 {
    if records.is_empty() {
        return 0.;
    }
    let regions: Vec<(RealPoint, f64)> = clusters
        .into_iter()
        .map(|c| (c.prototype(), c.fuzzy_dispersion()))
        .collect();
    let mut tallies: Vec<HashMap<&str, usize>> = vec![HashMap::new(); regions.len()];
    for record in records {
        let label = match &record.label {
            Some(label) => label.as_str(),
            None => continue,
        };
        if let Some(owner) = owner(&regions, &record.point) {
            *tallies[owner].entry(label).or_insert(0) += 1;
        }
    }
    let majority: usize = tallies
        .iter()
        .map(|tally| tally.values().copied().max().unwrap_or(0))
        .sum();
    majority as f64 / records.len() as f64
}

/// Index of the nearest region strictly containing the point, the first one on ties.
fn owner(regions: &[(RealPoint, f64)], point: &[f64]) -> Option<usize> {
    regions
        .iter()
        .enumerate()
        .map(|(i, (prototype, radius))| (i, euclid_dist(point, prototype), *radius))
        .filter(|(_, dist, radius)| dist < radius)
        .min_by(|(_, d1, _), (_, d2, _)| d1.total_cmp(d2))
        .map(|(i, _, _)| i)
}
