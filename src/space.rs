//! This module defines the vector operations the algorithm needs for points that belong to R^n.
//!  - the Euclidian distance function
//!  - weighted accumulation and scaling of linear sums

/// A point in R^n.
pub type RealPoint = Vec<f64>;

/// Computes Euclidian distance in R^n.
/// Accumulates with `hypot` so that large finite coordinates do not overflow.
pub fn euclid_dist(p1: &[f64], p2: &[f64]) -> f64 {
    p1.iter()
        .zip(p2)
        .fold(0., |acc: f64, (x1, x2)| acc.hypot(x1 - x2))
}

/// Adds `w * p` to `acc` in place.
pub fn weighted_add(acc: &mut [f64], p: &[f64], w: f64) {
    acc.iter_mut().zip(p).for_each(|(a, x)| *a += x * w);
}

/// Computes `p * w`.
pub fn scale(p: &[f64], w: f64) -> RealPoint {
    p.iter().map(|x| x * w).collect()
}

#[cfg(test)]
mod tests {
    use crate::space::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_euclid_dist() {
        let d = euclid_dist(&[3., 4.], &[0., 0.]);
        assert_approx_eq!(5., d, 1E-12);
        let d = euclid_dist(&[1., 3.], &[-1., 4.]);
        assert_approx_eq!(5f64.sqrt(), d, 1E-12);
    }

    #[test]
    fn test_euclid_dist_n_dims() {
        let d = euclid_dist(&[1., 2., 3., 4.], &[1., 2., 3., 4.]);
        assert_eq!(0., d);
        let d = euclid_dist(&[2., 0., 0., 0.], &[0., 0., 0., 0.]);
        assert_eq!(2., d);
        let d = euclid_dist(&[1., 1., 1., 1.], &[0., 0., 0., 0.]);
        assert_approx_eq!(2., d, 1E-12);
    }

    #[test]
    fn test_euclid_dist_large_coordinates() {
        let d = euclid_dist(&[1e200, 0.], &[0., 0.]);
        assert_eq!(1e200, d);
        let d = euclid_dist(&[3e200, 4e200], &[0., 0.]);
        assert_approx_eq!(5e200, d, 1E-12);
        let d = euclid_dist(&[1.5e308], &[-1.5e308]);
        assert_eq!(f64::INFINITY, d);
    }

    #[test]
    fn test_weighted_add() {
        let mut acc = vec![1., -1.];
        weighted_add(&mut acc, &[2., 4.], 0.5);
        assert_eq!(vec![2., 1.], acc);
    }

    #[test]
    fn test_scale() {
        assert_eq!(vec![0.5, -2.], scale(&[1., -4.], 0.5));
    }
}
