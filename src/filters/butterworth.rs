//! Butterworth filter, a smooth roll-off whose steepness grows with the order.

use crate::error::{FilterError, Result};
use crate::filters::filter::{
    check_cutoff, fill_mask, Filter, FilterConfig, FilterKind, Pass, CUTOFF_EPSILON,
};
use ndarray::Array2;
use num_complex::Complex64;

/// Butterworth filter, `v = 1 / (1 + (dist / d²)^order)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ButterworthFilter {
    /// Cutoff radius in frequency grid units.
    pub cutoff: f64,
    /// Filter order, at least 1.
    pub order: i32,
    pub pass: Pass,
}

impl ButterworthFilter {
    /// Creates a new Butterworth filter.
    ///
    /// # Errors
    /// [`FilterError::InvalidOrder`] for an order below 1, [`FilterError::InvalidCutoff`] for
    /// a negative or non-finite cutoff.
    pub fn new(cutoff: f64, order: i32, pass: Pass) -> Result<Self> {
        check_cutoff(cutoff)?;
        if order < 1 {
            return Err(FilterError::InvalidOrder { order });
        }
        Ok(ButterworthFilter {
            cutoff,
            order,
            pass,
        })
    }
}

impl Filter for ButterworthFilter {
    fn config(&self) -> FilterConfig {
        FilterConfig {
            name: FilterKind::Butterworth.to_string(),
            description: format!(
                "Butterworth filter of order {}, maximally flat in the pass band.",
                self.order
            ),
        }
    }

    fn pass(&self) -> Pass {
        self.pass
    }

    fn low_pass_response(&self, dist: f64) -> f64 {
        let d2 = (self.cutoff * self.cutoff).max(CUTOFF_EPSILON);
        1.0 / (1.0 + (dist / d2).powi(self.order))
    }
}

/// Fills `mask` with a Butterworth filter response.
pub fn butterworth(
    mask: &mut Array2<Complex64>,
    d: f64,
    order: i32,
    high_pass: bool,
) -> Result<()> {
    let filter = ButterworthFilter::new(d, order, Pass::from_high_pass(high_pass))?;
    fill_mask(&filter, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_butterworth_high_pass_is_complement() {
        for order in 1..=4 {
            let mut low = Array2::zeros((32, 32));
            let mut high = Array2::zeros((32, 32));
            butterworth(&mut low, 5.0, order, false).unwrap();
            butterworth(&mut high, 5.0, order, true).unwrap();
            for (l, h) in low.iter().zip(high.iter()) {
                assert_eq!(h.re, 1.0 - l.re);
                assert_eq!(h.im, 1.0 - l.im);
            }
        }
    }

    #[test]
    fn test_butterworth_half_power_at_cutoff() {
        let filter = ButterworthFilter::new(3.0, 2, Pass::LowPass).unwrap();
        assert_relative_eq!(filter.response(9.0), 0.5, max_relative = 1e-12);
        assert_eq!(filter.response(0.0), 1.0);
    }

    #[test]
    fn test_butterworth_order_sharpens() {
        let soft = ButterworthFilter::new(4.0, 1, Pass::LowPass).unwrap();
        let sharp = ButterworthFilter::new(4.0, 4, Pass::LowPass).unwrap();
        assert!(sharp.response(64.0) < soft.response(64.0));
        assert!(sharp.response(4.0) > soft.response(4.0));
    }

    #[test]
    fn test_butterworth_rejects_invalid_order() {
        let mut mask = Array2::zeros((4, 4));
        for order in [0, -1] {
            assert!(matches!(
                butterworth(&mut mask, 2.0, order, false),
                Err(FilterError::InvalidOrder { .. })
            ));
        }
        assert!(mask.iter().all(|c| *c == Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_butterworth_zero_cutoff() {
        let mut mask = Array2::zeros((4, 4));
        butterworth(&mut mask, 0.0, 1, false).unwrap();
        assert_eq!(mask[[2, 2]].re, 1.0);
        assert!(mask[[0, 0]].re < 1e-8);
        assert!(mask.iter().all(|c| c.re.is_finite()));
    }
}
