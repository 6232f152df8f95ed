//! Gaussian filter with a smooth roll-off around the cutoff radius.

use crate::error::Result;
use crate::filters::filter::{
    check_cutoff, fill_mask, Filter, FilterConfig, FilterKind, Pass, CUTOFF_EPSILON,
};
use ndarray::Array2;
use num_complex::Complex64;

/// Gaussian filter, `v = exp(-2 dist / d²)`.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianFilter {
    /// Cutoff radius in frequency grid units.
    pub cutoff: f64,
    pub pass: Pass,
}

impl GaussianFilter {
    /// Creates a new Gaussian filter. A zero cutoff is allowed, the squared cutoff is floored
    /// at [`CUTOFF_EPSILON`].
    pub fn new(cutoff: f64, pass: Pass) -> Result<Self> {
        check_cutoff(cutoff)?;
        Ok(GaussianFilter { cutoff, pass })
    }
}

impl Filter for GaussianFilter {
    fn config(&self) -> FilterConfig {
        FilterConfig {
            name: FilterKind::Gaussian.to_string(),
            description: "Attenuates frequencies with a Gaussian profile centered on the zero \
                          frequency, no ringing."
                .to_string(),
        }
    }

    fn pass(&self) -> Pass {
        self.pass
    }

    fn low_pass_response(&self, dist: f64) -> f64 {
        let d2 = (self.cutoff * self.cutoff).max(CUTOFF_EPSILON);
        (-dist / d2 * 2.0).exp()
    }
}

/// Fills `mask` with a Gaussian filter response. `order` is ignored.
pub fn gaussian(mask: &mut Array2<Complex64>, d: f64, _order: i32, high_pass: bool) -> Result<()> {
    let filter = GaussianFilter::new(d, Pass::from_high_pass(high_pass))?;
    fill_mask(&filter, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_center_is_exact() {
        let mut mask = Array2::zeros((16, 16));
        gaussian(&mut mask, 4.0, 1, false).unwrap();
        assert_eq!(mask[[8, 8]], Complex64::new(1.0, 1.0));
        gaussian(&mut mask, 4.0, 1, true).unwrap();
        assert_eq!(mask[[8, 8]], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_gaussian_values() {
        let filter = GaussianFilter::new(2.0, Pass::LowPass).unwrap();
        // dist = d² gives exp(-2)
        assert_relative_eq!(filter.response(4.0), (-2.0f64).exp(), max_relative = 1e-12);
        assert!(filter.response(1.0) > filter.response(2.0));
    }

    #[test]
    fn test_gaussian_zero_cutoff() {
        let mut mask = Array2::zeros((8, 8));
        gaussian(&mut mask, 0.0, 1, false).unwrap();
        assert_eq!(mask[[4, 4]].re, 1.0);
        // everything but the center underflows to zero
        assert_eq!(mask[[4, 5]].re, 0.0);
        assert!(mask.iter().all(|c| c.re.is_finite()));
    }
}
