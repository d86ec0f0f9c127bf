use serde::{Deserialize, Serialize};

use crate::space::{self, RealPoint};

/// Sufficient statistics of a fuzzy micro-cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MicroCluster {
    /// exact count of absorbed points
    n: u64,
    /// accumulated membership mass
    m: f64,
    /// membership-weighted linear sum
    cf: RealPoint,
    /// membership-weighted squared dispersion
    ssd: f64,
    /// logical time of last refresh
    timestamp: u64,
}

impl MicroCluster {
    /// Builds a singleton cluster seeded at the given point.
    pub fn new(point: RealPoint, timestamp: u64) -> Self {
        Self {
            n: 1,
            m: 1.,
            cf: point,
            ssd: 0.,
            timestamp,
        }
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn cf(&self) -> &RealPoint {
        &self.cf
    }

    pub fn ssd(&self) -> f64 {
        self.ssd
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Weighted centroid `CF / M`.
    pub fn prototype(&self) -> RealPoint {
        space::scale(&self.cf, 1. / self.m)
    }

    /// Cluster radius `sqrt(SSD / N)`. Always zero for a singleton.
    pub fn fuzzy_dispersion(&self) -> f64 {
        (self.ssd / self.n as f64).sqrt()
    }

    /// Refreshes the timestamp. Time never goes backwards.
    pub fn touch(&mut self, now: u64) {
        self.timestamp = self.timestamp.max(now);
    }

    /// Absorbs a point with the given membership degree,
    /// `dist` being the distance from the point to the current prototype.
    pub fn absorb(&mut self, point: &[f64], degree: f64, dist: f64) {
        if degree > 0. {
            self.ssd += degree * dist * dist;
        }
        space::weighted_add(&mut self.cf, point, degree);
        self.n += 1;
        self.m += degree;
    }

    /// Whether every statistic is a finite number.
    pub fn is_finite(&self) -> bool {
        self.m.is_finite() && self.ssd.is_finite() && self.cf.iter().all(|x| x.is_finite())
    }

    /// Sums the statistics of another cluster into this one.
    /// The timestamp of `self` is kept.
    pub fn merge(&mut self, other: &MicroCluster) {
        self.n += other.n;
        self.m += other.m;
        self.ssd += other.ssd;
        space::weighted_add(&mut self.cf, &other.cf, 1.);
    }
}

#[cfg(test)]
mod tests {
    use crate::cluster::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_build_singleton() {
        let c = MicroCluster::new(vec![3., -2.], 7);
        assert_eq!(1, c.n());
        assert_eq!(1., c.m());
        assert_eq!(0., c.ssd());
        assert_eq!(7, c.timestamp());
        assert_eq!(vec![3., -2.], c.prototype());
        assert_eq!(0., c.fuzzy_dispersion());
    }

    #[test]
    fn test_absorb() {
        let mut c = MicroCluster::new(vec![0., 0.], 1);
        c.absorb(&[2., 4.], 0.5, 20f64.sqrt());
        assert_eq!(2, c.n());
        assert_eq!(1.5, c.m());
        assert_eq!(vec![1., 2.], *c.cf());
        assert_approx_eq!(10., c.ssd(), 1E-12);
        assert_approx_eq!(5f64.sqrt(), c.fuzzy_dispersion(), 1E-12);
        let prototype = c.prototype();
        assert_approx_eq!(1. / 1.5, prototype[0], 1E-12);
        assert_approx_eq!(2. / 1.5, prototype[1], 1E-12);
    }

    #[test]
    fn test_absorb_zero_degree() {
        let mut c = MicroCluster::new(vec![1e200, 0.], 1);
        c.absorb(&[0., 0.], 0., f64::INFINITY);
        assert_eq!(2, c.n());
        assert_eq!(1., c.m());
        assert_eq!(0., c.ssd());
        assert_eq!(vec![1e200, 0.], *c.cf());
        assert!(c.is_finite());
    }

    #[test]
    fn test_is_finite() {
        let mut c = MicroCluster::new(vec![1e308, 0.], 1);
        assert!(c.is_finite());
        c.absorb(&[1e308, 0.], 1., 0.);
        assert!(!c.is_finite());
        let mut c = MicroCluster::new(vec![0.], 1);
        c.absorb(&[0.], 1., 1e200);
        assert!(!c.is_finite());
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut c = MicroCluster::new(vec![0.], 5);
        c.touch(9);
        assert_eq!(9, c.timestamp());
        c.touch(3);
        assert_eq!(9, c.timestamp());
    }

    #[test]
    fn test_merge() {
        let mut c1 = MicroCluster::new(vec![1., 1.], 2);
        c1.absorb(&[3., 1.], 0.5, 2.);
        let mut c2 = MicroCluster::new(vec![10., 0.], 4);
        c2.absorb(&[12., 0.], 0.25, 2.);
        c1.merge(&c2);
        assert_eq!(4, c1.n());
        assert_eq!(2.75, c1.m());
        assert_eq!(3., c1.ssd());
        assert_eq!(vec![15.5, 1.5], *c1.cf());
        assert_eq!(2, c1.timestamp());
    }
}
