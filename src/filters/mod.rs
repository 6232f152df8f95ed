//! Frequency domain filters for square grayscale images.
//!
//! This module contains the frequency response families that can be synthesized into a
//! filter mask and applied to a centered spectrum. Every family is radially symmetric around
//! the grid center and exists as a low-pass and a high-pass variant.
//!
//! # Filter Implementations
//!
//! Each filter implements the `Filter` trait defined in the `filter` module, providing a
//! consistent interface for metadata and response evaluation. The free functions `ideal`,
//! `gaussian` and `butterworth` fill a caller supplied mask directly.

/// Butterworth filter with an adjustable order.
pub mod butterworth;

/// Core filter interfaces, filter parameters, the filter mask and mask application.
pub mod filter;

/// Gaussian filter.
pub mod gaussian;

/// Ideal filter with a hard cutoff.
pub mod ideal;

pub use butterworth::{butterworth, ButterworthFilter};
pub use filter::{
    apply_mask, fill_mask, Filter, FilterConfig, FilterKind, FilterMask, FilterParameters, Pass,
};
pub use gaussian::{gaussian, GaussianFilter};
pub use ideal::{ideal, IdealFilter};
