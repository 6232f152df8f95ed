//! This module provides the `Filter` trait and the structures shared by all frequency response
//! families: filter parameters, the filter mask and the mask application.
//!
//! A filter maps the squared distance of a spectrum cell from the grid center to a response
//! value in `[0, 1]`. The mask built from it stores that value in both the real and the
//! imaginary part of every cell, and [`apply_mask`] multiplies componentwise.

use crate::error::{FilterError, Result};
use crate::filters::butterworth::ButterworthFilter;
use crate::filters::gaussian::GaussianFilter;
use crate::filters::ideal::IdealFilter;
use ndarray::{Array2, Zip};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Lower bound for the squared cutoff of the smooth families, avoids a division by zero.
pub const CUTOFF_EPSILON: f64 = 1e-8;

/// The `Filter` trait defines a radially symmetric frequency response.
///
/// Filters must implement:
/// - A `config` function that provides the name and a description of the filter.
/// - A `pass` function that returns whether the filter passes low or high frequencies.
/// - A `low_pass_response` function that evaluates the low-pass response for a squared
///   distance from the center of the spectrum.
///
/// The high-pass response is derived as `1 - low_pass_response` by [`Filter::response`].
///
/// **Example**:
/// ```rust
/// use spectral_filter::filters::filter::{Filter, FilterConfig, Pass};
///
/// #[derive(Clone, Debug)]
/// struct AllPass;
///
/// impl Filter for AllPass {
///     fn config(&self) -> FilterConfig {
///         FilterConfig {
///             name: "All Pass".to_string(),
///             description: "Leaves every frequency untouched.".to_string(),
///         }
///     }
///
///     fn pass(&self) -> Pass {
///         Pass::LowPass
///     }
///
///     fn low_pass_response(&self, _dist: f64) -> f64 {
///         1.0
///     }
/// }
///
/// assert_eq!(AllPass.response(42.0), 1.0);
/// ```
pub trait Filter: Send + Sync + Debug + CloneBoxedFilter {
    /// Returns the filter configuration, including name and description.
    fn config(&self) -> FilterConfig;

    /// Returns whether the filter passes low or high frequencies.
    fn pass(&self) -> Pass;

    /// Evaluates the low-pass response at squared distance `dist` from the center.
    fn low_pass_response(&self, dist: f64) -> f64;

    /// Evaluates the response at squared distance `dist`, inverted for high-pass filters.
    fn response(&self, dist: f64) -> f64 {
        let value = self.low_pass_response(dist);
        if self.pass().is_high_pass() {
            1.0 - value
        } else {
            value
        }
    }
}

/// A structure representing the metadata of a filter.
///
/// # Fields
/// - `name`: A human-readable name for the filter.
/// - `description`: A short description of what the filter does.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// The name of the filter, used for identification and display.
    pub name: String,
    /// A description of the filter, explaining its purpose and functionality.
    pub description: String,
}

/// A trait to allow cloning of boxed filters.
/// This is necessary because `Box<dyn Filter>` cannot be cloned directly.
pub trait CloneBoxedFilter {
    fn clone_box(&self) -> Box<dyn Filter>;
}

impl<T> CloneBoxedFilter for T
where
    T: 'static + Filter + Clone,
{
    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Filter> {
    fn clone(&self) -> Box<dyn Filter> {
        self.as_ref().clone_box()
    }
}

/// Whether a filter passes frequencies below or above the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pass {
    /// Passes frequencies below the cutoff.
    #[default]
    LowPass,
    /// Passes frequencies above the cutoff.
    HighPass,
}

impl Pass {
    /// Maps the `highpass` flag of the synthesis functions to a `Pass`.
    pub fn from_high_pass(high_pass: bool) -> Self {
        if high_pass {
            Pass::HighPass
        } else {
            Pass::LowPass
        }
    }

    pub fn is_high_pass(&self) -> bool {
        *self == Pass::HighPass
    }
}

/// The frequency response families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterKind {
    /// Hard pass/block boundary at the cutoff.
    #[default]
    Ideal,
    /// Gaussian roll-off.
    Gaussian,
    /// Butterworth roll-off with an adjustable order.
    Butterworth,
}

impl FilterKind {
    /// Short lowercase identifier, used for labels and command line arguments.
    pub fn id(&self) -> &'static str {
        match self {
            FilterKind::Ideal => "ideal",
            FilterKind::Gaussian => "gaussian",
            FilterKind::Butterworth => "butterworth",
        }
    }
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Ideal => {
                write!(f, "Ideal")
            }
            FilterKind::Gaussian => {
                write!(f, "Gaussian")
            }
            FilterKind::Butterworth => {
                write!(f, "Butterworth")
            }
        }
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ideal" => Ok(FilterKind::Ideal),
            "gaussian" => Ok(FilterKind::Gaussian),
            "butterworth" => Ok(FilterKind::Butterworth),
            other => Err(format!(
                "unknown filter kind '{other}', expected ideal, gaussian or butterworth"
            )),
        }
    }
}

/// Parameters selecting and configuring a filter.
///
/// # Fields
/// - `kind`: The response family.
/// - `cutoff`: Cutoff radius in frequency grid units, measured from the grid center.
/// - `order`: Butterworth order (at least 1), ignored by the other families.
/// - `pass`: Low-pass or high-pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    pub kind: FilterKind,
    pub cutoff: f64,
    pub order: i32,
    pub pass: Pass,
}

impl Default for FilterParameters {
    fn default() -> Self {
        FilterParameters {
            kind: FilterKind::Ideal,
            cutoff: 15.0,
            order: 1,
            pass: Pass::LowPass,
        }
    }
}

impl FilterParameters {
    /// Validates the parameters and instantiates the selected filter.
    pub fn build(&self) -> Result<Box<dyn Filter>> {
        Ok(match self.kind {
            FilterKind::Ideal => Box::new(IdealFilter::new(self.cutoff, self.pass)?),
            FilterKind::Gaussian => Box::new(GaussianFilter::new(self.cutoff, self.pass)?),
            FilterKind::Butterworth => {
                Box::new(ButterworthFilter::new(self.cutoff, self.order, self.pass)?)
            }
        })
    }

    /// Builds a `side`×`side` mask for these parameters.
    pub fn synthesize(&self, side: usize) -> Result<FilterMask> {
        let filter = self.build()?;
        FilterMask::synthesize(filter.as_ref(), side)
    }

    /// Compact label such as `idealLPF` or `butterworthHPF`, see the `Display` impl.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl Display for FilterParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let suffix = match self.pass {
            Pass::LowPass => "LPF",
            Pass::HighPass => "HPF",
        };
        write!(f, "{}{}", self.kind.id(), suffix)
    }
}

pub(crate) fn check_cutoff(cutoff: f64) -> Result<()> {
    if !cutoff.is_finite() || cutoff < 0.0 {
        return Err(FilterError::InvalidCutoff { cutoff });
    }
    Ok(())
}

/// Squared euclidean distance of cell `(i, j)` from `(center, center)`.
pub fn squared_distance(i: usize, j: usize, center: usize) -> f64 {
    let di = i as i64 - center as i64;
    let dj = j as i64 - center as i64;
    (di * di + dj * dj) as f64
}

/// Fills a square mask with the response of `filter`.
///
/// The distance origin is `(n / 2, n / 2)`, consistent with a centered spectrum. Every cell
/// receives the response value in both its real and imaginary part.
pub fn fill_mask(filter: &dyn Filter, mask: &mut Array2<Complex64>) -> Result<()> {
    let (rows, cols) = mask.dim();
    if rows != cols {
        return Err(FilterError::NotSquare { rows, cols });
    }
    let center = rows / 2;
    Zip::indexed(mask).par_for_each(|(i, j), cell| {
        let value = filter.response(squared_distance(i, j, center));
        *cell = Complex64::new(value, value);
    });
    Ok(())
}

/// A filter mask with identical real and imaginary parts in every cell.
///
/// Masks are only created by synthesis from a [`Filter`], which keeps the real and
/// imaginary parts equal.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterMask {
    values: Array2<Complex64>,
}

impl FilterMask {
    /// Synthesizes a `side`×`side` mask from `filter`.
    pub fn synthesize(filter: &dyn Filter, side: usize) -> Result<Self> {
        let mut values = Array2::zeros((side, side));
        fill_mask(filter, &mut values)?;
        let config = filter.config();
        log::debug!(
            "synthesized {} mask ({:?}) with side {}: {}",
            config.name,
            filter.pass(),
            side,
            config.description
        );
        Ok(FilterMask { values })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn values(&self) -> &Array2<Complex64> {
        &self.values
    }

    /// Scalar response of cell `(i, j)`.
    pub fn response(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]].re
    }
}

/// Applies a mask to a spectrum in place.
///
/// The product is componentwise: the real part is scaled by the real part of the mask and
/// the imaginary part by the imaginary part of the mask. This is not a complex multiplication.
///
/// # Errors
/// [`FilterError::ShapeMismatch`] if the shapes differ, the spectrum is left untouched.
pub fn apply_mask(spectrum: &mut Array2<Complex64>, mask: &FilterMask) -> Result<()> {
    if spectrum.dim() != mask.dim() {
        return Err(FilterError::ShapeMismatch {
            expected: spectrum.dim(),
            got: mask.dim(),
        });
    }
    Zip::from(spectrum)
        .and(&mask.values)
        .par_for_each(|value, m| {
            *value = Complex64::new(value.re * m.re, value.im * m.im);
        });
    Ok(())
}
