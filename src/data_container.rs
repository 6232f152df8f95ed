//! This module defines the complex image container and the conversion between complex
//! matrices and the grayscale grids handed in and out by the image codecs.
//!
//! A [`ComplexImage`] carries a zero-sized domain marker, so a spatial image, a raw spectrum
//! and a centered spectrum are distinct types even though they share the same storage.

use crate::error::{FilterError, Result};
use crate::filters::filter::{apply_mask, FilterMask};
use crate::math_tools::{check_square_power_of_two, cofactor, conjugate, fft_2d, fftshift};
use image::{GrayImage, Luma};
use ndarray::Array2;
use num_complex::Complex64;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Marker trait for the domain a [`ComplexImage`] lives in.
pub trait Domain: Debug + Clone + Copy + Send + Sync + 'static {
    /// Human-readable domain name, used in log messages.
    const NAME: &'static str;
}

/// Spatial domain, real part holds the normalized intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spatial;

/// Frequency domain with the zero-frequency term at `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spectrum;

/// Frequency domain with the zero-frequency term at `(N/2, N/2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenteredSpectrum;

impl Domain for Spatial {
    const NAME: &'static str = "spatial";
}

impl Domain for Spectrum {
    const NAME: &'static str = "spectrum";
}

impl Domain for CenteredSpectrum {
    const NAME: &'static str = "centered spectrum";
}

/// How a complex sample is reduced to a gray value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `sqrt(re² + im²)`, used for spectra.
    Magnitude,
    /// `|re|`, used for reconstructed spatial images.
    RealPart,
}

/// A square complex matrix with a power-of-two side, tagged with its domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexImage<D: Domain> {
    data: Array2<Complex64>,
    domain: PhantomData<D>,
}

impl<D: Domain> ComplexImage<D> {
    fn wrap(data: Array2<Complex64>) -> Self {
        ComplexImage {
            data,
            domain: PhantomData,
        }
    }

    /// Side length of the square matrix.
    pub fn side(&self) -> usize {
        self.data.nrows()
    }

    /// Name of the domain the image currently lives in.
    pub fn domain_name(&self) -> &'static str {
        D::NAME
    }

    pub fn data(&self) -> &Array2<Complex64> {
        &self.data
    }

    pub fn into_inner(self) -> Array2<Complex64> {
        self.data
    }

    /// Encodes the image as gray values, see [`encode`].
    pub fn encode(&self, mode: OutputMode) -> Array2<u8> {
        encode(&self.data, mode)
    }

    /// Encodes the image into a `GrayImage`, see [`to_gray_image`].
    pub fn to_gray_image(&self, mode: OutputMode) -> GrayImage {
        to_gray_image(&self.data, mode)
    }

    /// Encodes the image into a `GrayImage`, failing on NaN samples, see [`try_encode`].
    pub fn try_to_gray_image(&self, mode: OutputMode) -> Result<GrayImage> {
        Ok(gray_image_from(&try_encode(&self.data, mode)?))
    }
}

impl ComplexImage<Spatial> {
    /// Wraps a spatial complex matrix, verifying that it is square with a power-of-two side.
    pub fn from_matrix(data: Array2<Complex64>) -> Result<Self> {
        check_square_power_of_two(&data)?;
        Ok(Self::wrap(data))
    }

    /// Builds a spatial image from normalized intensities, imaginary parts are zero.
    pub fn from_intensities(values: &Array2<f64>) -> Result<Self> {
        Self::from_matrix(values.mapv(|v| Complex64::new(v, 0.0)))
    }

    /// Builds a spatial image from an 8 bit grayscale image, scaling intensities to `[0, 1]`.
    ///
    /// The image must be square with a power-of-two side, use [`pad_to_power_of_two`] first
    /// for other sizes.
    pub fn from_gray_image(img: &GrayImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let data = Array2::from_shape_fn((height as usize, width as usize), |(i, j)| {
            let value = img.get_pixel(j as u32, i as u32)[0];
            Complex64::new(value as f64 / 255.0, 0.0)
        });
        Self::from_matrix(data)
    }

    /// Multiplies every pixel by `(-1)^(i + j)`, see [`crate::math_tools::cofactor`].
    pub fn cofactor(&mut self) {
        cofactor(&mut self.data);
    }

    /// Forward 2D transform.
    pub fn forward(mut self) -> Result<ComplexImage<Spectrum>> {
        fft_2d(&mut self.data, false)?;
        Ok(ComplexImage::wrap(self.data))
    }
}

impl ComplexImage<Spectrum> {
    /// Moves the zero-frequency term to the center. Needs a side of at least 2.
    pub fn center(mut self) -> Result<ComplexImage<CenteredSpectrum>> {
        fftshift(&mut self.data)?;
        Ok(ComplexImage::wrap(self.data))
    }

    /// Inverse 2D transform.
    pub fn inverse(mut self) -> Result<ComplexImage<Spatial>> {
        fft_2d(&mut self.data, true)?;
        Ok(ComplexImage::wrap(self.data))
    }

    /// Replaces every sample with its complex conjugate.
    pub fn conjugate(&mut self) {
        conjugate(&mut self.data);
    }
}

impl ComplexImage<CenteredSpectrum> {
    /// Moves the zero-frequency term back to `(0, 0)`.
    pub fn uncenter(mut self) -> Result<ComplexImage<Spectrum>> {
        fftshift(&mut self.data)?;
        Ok(ComplexImage::wrap(self.data))
    }

    /// Applies a filter mask, see [`crate::filters::filter::apply_mask`].
    pub fn apply_mask(&mut self, mask: &FilterMask) -> Result<()> {
        apply_mask(&mut self.data, mask)
    }
}

fn encode_sample(value: Complex64, mode: OutputMode) -> f64 {
    let value = match mode {
        OutputMode::Magnitude => value.re.hypot(value.im),
        OutputMode::RealPart => value.re.abs(),
    };
    value * 255.0
}

/// Converts a complex matrix into gray values.
///
/// Each sample is reduced according to `mode`, scaled by 255, clamped to `[0, 255]` and
/// truncated. NaN samples are encoded as 0.
pub fn encode(matrix: &Array2<Complex64>, mode: OutputMode) -> Array2<u8> {
    let mut nan_count = 0usize;
    let encoded = matrix.mapv(|value| {
        let scaled = encode_sample(value, mode);
        if scaled.is_nan() {
            nan_count += 1;
            0
        } else {
            scaled.clamp(0.0, 255.0) as u8
        }
    });
    if nan_count > 0 {
        log::warn!("{nan_count} NaN samples encountered while encoding, written as 0");
    }
    encoded
}

/// Like [`encode`], but a NaN sample is an error instead of a 0.
///
/// # Errors
/// [`FilterError::NanSample`] with the position of the first NaN sample in row-major order.
pub fn try_encode(matrix: &Array2<Complex64>, mode: OutputMode) -> Result<Array2<u8>> {
    if let Some(((row, col), _)) = matrix
        .indexed_iter()
        .find(|(_, value)| encode_sample(**value, mode).is_nan())
    {
        return Err(FilterError::NanSample { row, col });
    }
    Ok(encode(matrix, mode))
}

/// Converts a complex matrix into a `GrayImage`, rows map to `y`.
pub fn to_gray_image(matrix: &Array2<Complex64>, mode: OutputMode) -> GrayImage {
    gray_image_from(&encode(matrix, mode))
}

fn gray_image_from(encoded: &Array2<u8>) -> GrayImage {
    let (height, width) = encoded.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([encoded[[y as usize, x as usize]]])
    })
}

/// Embeds `img` in the top-left corner of the smallest black square with a power-of-two side.
pub fn pad_to_power_of_two(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let side = width.max(height).next_power_of_two();
    if width == side && height == side {
        return img.clone();
    }
    let mut padded = GrayImage::new(side, side);
    image::imageops::replace(&mut padded, img, 0, 0);
    log::debug!("padded {width}x{height} image to {side}x{side}");
    padded
}

/// Cuts the top-left `width`×`height` region out of `img`, undoing [`pad_to_power_of_two`].
pub fn crop_to(img: &GrayImage, width: u32, height: u32) -> Result<GrayImage> {
    let (w, h) = img.dimensions();
    if width > w || height > h {
        return Err(FilterError::ShapeMismatch {
            expected: (h as usize, w as usize),
            got: (height as usize, width as usize),
        });
    }
    Ok(image::imageops::crop_imm(img, 0, 0, width, height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_encode_modes() {
        let matrix = Array2::from_shape_vec(
            (2, 2),
            vec![
                Complex64::new(3.0, 4.0),
                Complex64::new(-0.5, 0.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(0.3, 0.4),
            ],
        )
        .unwrap();

        let magnitude = encode(&matrix, OutputMode::Magnitude);
        assert_eq!(magnitude[[0, 0]], 255);
        assert_eq!(magnitude[[0, 1]], 127);
        assert_eq!(magnitude[[1, 0]], 255);
        assert_eq!(magnitude[[1, 1]], 127);

        let real = encode(&matrix, OutputMode::RealPart);
        assert_eq!(real[[0, 0]], 255);
        assert_eq!(real[[0, 1]], 127);
        assert_eq!(real[[1, 0]], 255);
        assert_eq!(real[[1, 1]], 76);
    }

    #[test]
    fn test_encode_nan_is_zero() {
        let matrix = Array2::from_elem((2, 2), Complex64::new(f64::NAN, 0.0));
        assert!(encode(&matrix, OutputMode::RealPart).iter().all(|v| *v == 0));
    }

    #[test]
    fn test_try_encode_reports_nan() {
        let mut matrix = Array2::from_elem((4, 4), Complex64::new(0.5, 0.0));
        assert_eq!(
            try_encode(&matrix, OutputMode::RealPart).unwrap(),
            encode(&matrix, OutputMode::RealPart)
        );

        matrix[[2, 1]] = Complex64::new(0.0, f64::NAN);
        // the real part mode never looks at the imaginary part
        assert!(try_encode(&matrix, OutputMode::RealPart).is_ok());
        assert!(matches!(
            try_encode(&matrix, OutputMode::Magnitude),
            Err(FilterError::NanSample { row: 2, col: 1 })
        ));

        let image = ComplexImage::from_matrix(matrix).unwrap();
        assert!(image.try_to_gray_image(OutputMode::Magnitude).is_err());
    }

    #[test]
    fn test_from_gray_image() {
        let img = GrayImage::from_fn(4, 4, |x, y| Luma([(x * 10 + y * 50) as u8]));
        let image = ComplexImage::from_gray_image(&img).unwrap();
        assert_eq!(image.side(), 4);
        // row index follows y
        assert_abs_diff_eq!(image.data()[[2, 1]].re, 110.0 / 255.0, epsilon = 1e-12);
        assert!(image.data().iter().all(|c| c.im == 0.0));
    }

    #[test]
    fn test_from_gray_image_rejects_bad_sizes() {
        let img = GrayImage::new(3, 3);
        assert!(matches!(
            ComplexImage::from_gray_image(&img),
            Err(FilterError::NotPowerOfTwo { len: 3 })
        ));
        let img = GrayImage::new(8, 4);
        assert!(matches!(
            ComplexImage::from_gray_image(&img),
            Err(FilterError::NotSquare { rows: 4, cols: 8 })
        ));
    }

    #[test]
    fn test_gray_image_round_trip_through_spectrum() {
        let img = GrayImage::from_fn(16, 16, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let restored = ComplexImage::from_gray_image(&img)
            .unwrap()
            .forward()
            .unwrap()
            .center()
            .unwrap()
            .uncenter()
            .unwrap()
            .inverse()
            .unwrap()
            .to_gray_image(OutputMode::RealPart);
        for (a, b) in img.pixels().zip(restored.pixels()) {
            assert!((a[0] as i32 - b[0] as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_centered_spectrum_of_constant_image() {
        let values = Array2::from_elem((8, 8), 0.5);
        let spectrum = ComplexImage::from_intensities(&values)
            .unwrap()
            .forward()
            .unwrap()
            .center()
            .unwrap();
        assert_abs_diff_eq!(spectrum.data()[[4, 4]].re, 32.0, epsilon = 1e-9);
        let encoded = spectrum.encode(OutputMode::Magnitude);
        assert_eq!(encoded[[4, 4]], 255);
        assert_eq!(encoded[[0, 0]], 0);
    }

    #[test]
    fn test_pad_and_crop() {
        let img = GrayImage::from_fn(5, 3, |x, y| Luma([(1 + x + y * 5) as u8]));
        let padded = pad_to_power_of_two(&img);
        assert_eq!(padded.dimensions(), (8, 8));
        assert_eq!(padded.get_pixel(4, 2)[0], 15);
        assert_eq!(padded.get_pixel(5, 2)[0], 0);
        assert_eq!(padded.get_pixel(0, 3)[0], 0);

        let cropped = crop_to(&padded, 5, 3).unwrap();
        assert_eq!(cropped, img);
        assert!(crop_to(&padded, 9, 3).is_err());

        let square = GrayImage::new(16, 16);
        assert_eq!(pad_to_power_of_two(&square).dimensions(), (16, 16));
    }
}
