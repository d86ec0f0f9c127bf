use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    cluster::MicroCluster,
    config::Config,
    error::FuzzError,
    membership::{similarity, Membership},
    purity,
    record::Record,
    space::{euclid_dist, RealPoint},
};

/// Stable handle of a cluster. Handles are allocated in increasing order and never reused,
/// so iterating clusters by handle is iterating them by creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClusterId(u64);

impl ClusterId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What happened to a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// A new singleton cluster was created.
    Created(ClusterId),
    /// The stalest cluster was evicted to make room for a new one.
    Replaced {
        evicted: ClusterId,
        created: ClusterId,
    },
    /// The point was absorbed by every live cluster, weighted by membership.
    Absorbed,
}

/// A merge of `absorbed` into `survivor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Merge {
    pub survivor: ClusterId,
    pub absorbed: ClusterId,
}

/// Outcome of a single ingestion step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub clock: u64,
    pub action: Action,
    pub merge: Option<Merge>,
}

/// Instrumentation counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Counters {
    pub creations: u64,
    pub evictions: u64,
    pub absorptions: u64,
    pub merges: u64,
    /// Set once the stream is finished.
    pub purity: Option<f64>,
}

/// A cluster as seen by the outlier test.
pub(crate) struct Region {
    pub id: ClusterId,
    pub prototype: RealPoint,
    pub radius: f64,
}

/// Maintains the fuzzy micro-clusters summarizing a stream.
pub struct StreamProcessor {
    config: Config,
    membership: Membership,
    clusters: BTreeMap<ClusterId, MicroCluster>,
    next_id: u64,
    clock: u64,
    dimension: Option<usize>,
    counters: Option<Counters>,
}

impl StreamProcessor {
    /// Builds a new processor. The configuration is validated before anything else.
    pub fn new(config: Config) -> Result<Self, FuzzError> {
        config.validate()?;
        let membership = Membership::new(config.fuzziness)?;
        let counters = config.instrument.then(Counters::default);
        Ok(Self {
            config,
            membership,
            clusters: BTreeMap::new(),
            next_id: 0,
            clock: 0,
            dimension: None,
            counters,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Logical time: the number of points ingested so far.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Dimensionality fixed by the first ingested point.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Live clusters in handle order.
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterId, &MicroCluster)> + '_ {
        self.clusters.iter().map(|(id, c)| (*id, c))
    }

    pub fn get(&self, id: ClusterId) -> Option<&MicroCluster> {
        self.clusters.get(&id)
    }

    pub fn counters(&self) -> Option<&Counters> {
        self.counters.as_ref()
    }

    /// Ingests a single point.
    ///
    /// A rejected point leaves the processor untouched.
    pub fn step(&mut self, point: &[f64]) -> Result<Step, FuzzError> {
        self.check_point(point)?;
        let now = self.clock + 1;
        if self.clusters.len() < self.config.min_fc {
            self.clock = now;
            let created = self.create(point, now);
            return Ok(Step {
                clock: now,
                action: Action::Created(created),
                merge: None,
            });
        }
        let regions = self.regions();
        let dists: Vec<f64> = regions
            .iter()
            .map(|r| euclid_dist(point, &r.prototype))
            .collect();
        if dists.iter().any(|d| !d.is_finite()) {
            return Err(FuzzError::NumericOverflow);
        }
        let covering: Vec<bool> = regions
            .iter()
            .zip(&dists)
            .map(|(r, d)| *d <= r.radius)
            .collect();
        let absorbed = if covering.contains(&true) {
            Some(self.absorbed(point, &dists)?)
        } else {
            None
        };
        self.clock = now;
        let action = if let Some(updated) = absorbed {
            self.commit(updated);
            self.refresh_covering(&regions, &covering, now);
            Action::Absorbed
        } else if self.clusters.len() >= self.config.max_fc {
            let evicted = self.evict_oldest()?;
            let created = self.create(point, now);
            Action::Replaced { evicted, created }
        } else {
            Action::Created(self.create(point, now))
        };
        let merge = self.merge_pass();
        Ok(Step {
            clock: now,
            action,
            merge,
        })
    }

    /// Ingests a whole sequence of records, in order.
    pub fn cluster<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> Result<(), FuzzError> {
        for record in records {
            self.step(&record.point)?;
        }
        Ok(())
    }

    /// Computes purity against the full labeled stream once it has been consumed.
    /// Only available when instrumentation is enabled.
    pub fn finish(&mut self, records: &[Record]) -> Option<&Counters> {
        if self.counters.is_none() {
            return None;
        }
        let purity = purity::purity(self.clusters.values(), records);
        let counters = self.counters.as_mut()?;
        counters.purity = Some(purity);
        info!(
            creations = counters.creations,
            evictions = counters.evictions,
            absorptions = counters.absorptions,
            merges = counters.merges,
            purity,
            "stream finished"
        );
        Some(&*counters)
    }

    /// Prototype and comparison radius of every live cluster, in handle order.
    /// Singletons use the distance to the nearest other prototype as radius,
    /// infinite when they are alone.
    pub(crate) fn regions(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = self
            .clusters
            .iter()
            .map(|(id, c)| Region {
                id: *id,
                prototype: c.prototype(),
                radius: c.fuzzy_dispersion(),
            })
            .collect();
        let singletons: Vec<usize> = self
            .clusters
            .values()
            .enumerate()
            .filter(|(_, c)| c.n() == 1)
            .map(|(i, _)| i)
            .collect();
        for i in singletons {
            let radius = nearest_distance(&regions, i);
            regions[i].radius = radius;
        }
        regions
    }

    fn check_point(&mut self, point: &[f64]) -> Result<(), FuzzError> {
        if point.is_empty() {
            return Err(FuzzError::EmptyPoint);
        }
        if let Some(index) = point.iter().position(|x| !x.is_finite()) {
            return Err(FuzzError::NonFiniteCoordinate { index });
        }
        match self.dimension {
            Some(expected) if expected != point.len() => Err(FuzzError::DimensionMismatch {
                expected,
                actual: point.len(),
            }),
            Some(_) => Ok(()),
            None => {
                self.dimension = Some(point.len());
                Ok(())
            }
        }
    }

    fn create(&mut self, point: &[f64], now: u64) -> ClusterId {
        let id = ClusterId(self.next_id);
        self.next_id += 1;
        self.clusters
            .insert(id, MicroCluster::new(point.to_vec(), now));
        if let Some(counters) = self.counters.as_mut() {
            counters.creations += 1;
        }
        debug!(id = id.0, clock = now, "cluster created");
        id
    }

    /// Refreshes every cluster whose radius covers the point.
    fn refresh_covering(&mut self, regions: &[Region], covering: &[bool], now: u64) {
        for (region, _) in regions.iter().zip(covering).filter(|(_, c)| **c) {
            if let Some(c) = self.clusters.get_mut(&region.id) {
                c.touch(now);
            }
        }
    }

    /// Every live cluster after absorbing the point, in handle order.
    /// Fails without touching anything if a statistic would leave the finite range.
    fn absorbed(&self, point: &[f64], dists: &[f64]) -> Result<Vec<MicroCluster>, FuzzError> {
        let degrees = self.membership.degrees(dists);
        let updated: Vec<MicroCluster> = self
            .clusters
            .values()
            .zip(dists.iter().zip(&degrees))
            .map(|(c, (dist, degree))| {
                let mut c = c.clone();
                c.absorb(point, *degree, *dist);
                c
            })
            .collect();
        if updated.iter().all(MicroCluster::is_finite) {
            Ok(updated)
        } else {
            Err(FuzzError::NumericOverflow)
        }
    }

    fn commit(&mut self, updated: Vec<MicroCluster>) {
        self.clusters
            .values_mut()
            .zip(updated)
            .for_each(|(c, new)| *c = new);
        if let Some(counters) = self.counters.as_mut() {
            counters.absorptions += 1;
        }
        debug!(clock = self.clock, "point absorbed");
    }

    /// Removes the cluster with the oldest timestamp, the lowest handle on ties.
    fn evict_oldest(&mut self) -> Result<ClusterId, FuzzError> {
        let oldest = self
            .clusters
            .iter()
            .min_by_key(|(id, c)| (c.timestamp(), **id))
            .map(|(id, _)| *id)
            .ok_or(FuzzError::EmptyCollection)?;
        self.clusters.remove(&oldest);
        if let Some(counters) = self.counters.as_mut() {
            counters.evictions += 1;
        }
        debug!(id = oldest.0, clock = self.clock, "cluster evicted");
        Ok(oldest)
    }

    /// Merges the first pair of clusters, in handle order, whose similarity exceeds the threshold.
    /// Pairs whose summed statistics would overflow are left apart.
    fn merge_pass(&mut self) -> Option<Merge> {
        let threshold = self.config.threshold;
        let summary: Vec<(ClusterId, RealPoint, f64)> = self
            .clusters
            .iter()
            .map(|(id, c)| (*id, c.prototype(), c.fuzzy_dispersion()))
            .collect();
        let (survivor, absorbed) = summary.iter().enumerate().find_map(|(i, (id1, p1, r1))| {
            summary[i + 1..]
                .iter()
                .find(|(id2, p2, r2)| {
                    similarity(*r1, *r2, euclid_dist(p1, p2)) > threshold
                        && self.mergeable(*id1, *id2)
                })
                .map(|(id2, _, _)| (*id1, *id2))
        })?;
        let other = self.clusters.remove(&absorbed)?;
        self.clusters.get_mut(&survivor)?.merge(&other);
        if let Some(counters) = self.counters.as_mut() {
            counters.merges += 1;
        }
        debug!(
            survivor = survivor.0,
            absorbed = absorbed.0,
            clock = self.clock,
            "clusters merged"
        );
        Some(Merge { survivor, absorbed })
    }

    fn mergeable(&self, survivor: ClusterId, absorbed: ClusterId) -> bool {
        match (self.clusters.get(&survivor), self.clusters.get(&absorbed)) {
            (Some(c1), Some(c2)) => {
                let mut merged = c1.clone();
                merged.merge(c2);
                merged.is_finite()
            }
            _ => false,
        }
    }
}

fn nearest_distance(regions: &[Region], i: usize) -> f64 {
    regions
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, r)| euclid_dist(&regions[i].prototype, &r.prototype))
        .fold(f64::INFINITY, f64::min)
}
