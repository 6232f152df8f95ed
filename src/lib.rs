//! Frequency domain filtering of square grayscale images.
//!
//! An image is transformed into its spectrum with a radix-2 FFT, the spectrum is centered and
//! multiplied with an ideal, Gaussian or Butterworth mask (low-pass or high-pass), and the
//! result is transformed back into a filtered image.
//!
//! ```rust
//! use image::{GrayImage, Luma};
//! use spectral_filter::filters::{FilterKind, FilterParameters, Pass};
//! use spectral_filter::pipeline::FrequencyFilterPipeline;
//!
//! let img = GrayImage::from_fn(32, 32, |x, y| Luma([((x ^ y) * 8) as u8]));
//! let pipeline = FrequencyFilterPipeline::new(FilterParameters {
//!     kind: FilterKind::Gaussian,
//!     cutoff: 8.0,
//!     order: 1,
//!     pass: Pass::LowPass,
//! })
//! .unwrap();
//! let report = pipeline.run(&img).unwrap();
//! assert_eq!(report.output_image.dimensions(), (32, 32));
//! ```

pub mod config;
pub mod data_container;
pub mod error;
pub mod filters;
pub mod math_tools;
pub mod pipeline;

pub use error::{FilterError, Result};
