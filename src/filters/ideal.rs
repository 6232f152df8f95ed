//! Ideal filter with a hard pass/block boundary at the cutoff radius.
//!
//! The boundary test is strict: a cell whose squared distance equals the squared cutoff is
//! blocked by the low-pass filter. Inverting such a mask produces ringing artifacts.

use crate::error::Result;
use crate::filters::filter::{check_cutoff, fill_mask, Filter, FilterConfig, FilterKind, Pass};
use ndarray::Array2;
use num_complex::Complex64;

/// Ideal (brick wall) filter.
#[derive(Clone, Debug, PartialEq)]
pub struct IdealFilter {
    /// Cutoff radius in frequency grid units.
    pub cutoff: f64,
    pub pass: Pass,
}

impl IdealFilter {
    /// Creates a new ideal filter, rejecting negative or non-finite cutoffs.
    pub fn new(cutoff: f64, pass: Pass) -> Result<Self> {
        check_cutoff(cutoff)?;
        Ok(IdealFilter { cutoff, pass })
    }
}

impl Filter for IdealFilter {
    fn config(&self) -> FilterConfig {
        FilterConfig {
            name: FilterKind::Ideal.to_string(),
            description: "Passes every frequency strictly inside the cutoff radius and blocks \
                          the rest."
                .to_string(),
        }
    }

    fn pass(&self) -> Pass {
        self.pass
    }

    fn low_pass_response(&self, dist: f64) -> f64 {
        if dist < self.cutoff * self.cutoff {
            1.0
        } else {
            0.0
        }
    }
}

/// Fills `mask` with an ideal filter response. `order` is ignored.
pub fn ideal(mask: &mut Array2<Complex64>, d: f64, _order: i32, high_pass: bool) -> Result<()> {
    let filter = IdealFilter::new(d, Pass::from_high_pass(high_pass))?;
    fill_mask(&filter, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    #[test]
    fn test_ideal_boundary_is_strict() {
        let mut mask = Array2::zeros((16, 16));
        ideal(&mut mask, 3.0, 1, false).unwrap();
        // (8 + 3, 8) lies at squared distance 9, (8 + 2, 8 + 2) at 8
        assert_eq!(mask[[11, 8]], Complex64::new(0.0, 0.0));
        assert_eq!(mask[[10, 10]], Complex64::new(1.0, 1.0));
        assert_eq!(mask[[8, 8]], Complex64::new(1.0, 1.0));
    }

    #[test]
    fn test_ideal_high_pass_inverts() {
        let mut low = Array2::zeros((8, 8));
        let mut high = Array2::zeros((8, 8));
        ideal(&mut low, 2.5, 1, false).unwrap();
        ideal(&mut high, 2.5, 1, true).unwrap();
        for (l, h) in low.iter().zip(high.iter()) {
            assert_eq!(l.re + h.re, 1.0);
        }
        assert_eq!(high[[4, 4]].re, 0.0);
    }

    #[test]
    fn test_ideal_zero_cutoff_blocks_everything() {
        let mut mask = Array2::zeros((4, 4));
        ideal(&mut mask, 0.0, 1, false).unwrap();
        assert!(mask.iter().all(|c| c.re == 0.0 && c.im == 0.0));
        ideal(&mut mask, 0.0, 1, true).unwrap();
        assert!(mask.iter().all(|c| c.re == 1.0 && c.im == 1.0));
    }

    #[test]
    fn test_ideal_ignores_order() {
        let mut a = Array2::zeros((8, 8));
        let mut b = Array2::zeros((8, 8));
        ideal(&mut a, 3.0, 1, false).unwrap();
        ideal(&mut b, 3.0, -4, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ideal_rejects_negative_cutoff() {
        let mut mask = Array2::zeros((4, 4));
        assert!(matches!(
            ideal(&mut mask, -1.0, 1, false),
            Err(FilterError::InvalidCutoff { .. })
        ));
    }
}
