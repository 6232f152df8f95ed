//! The frequency filter pipeline: decode, transform, center, mask, transform back, encode.
//!
//! Besides the filtered image, every run produces the magnitude spectra of the input, the
//! mask and the masked spectrum, so the effect of a filter can be inspected.

use crate::data_container::{to_gray_image, ComplexImage, OutputMode, Spatial};
use crate::error::Result;
use crate::filters::filter::{Filter, FilterMask, FilterParameters};
use image::GrayImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// File names used by [`FilterReport::save`].
pub const INPUT_SPECTRUM_FILE: &str = "input_spectrum.png";
pub const FILTER_SPECTRUM_FILE: &str = "filter_spectrum.png";
pub const OUTPUT_SPECTRUM_FILE: &str = "output_spectrum.png";
pub const OUTPUT_IMAGE_FILE: &str = "output.png";

/// Result of a pipeline run.
///
/// # Fields
/// - `input_spectrum`: Centered magnitude spectrum of the input image.
/// - `filter_spectrum`: Magnitude of the filter mask.
/// - `output_spectrum`: Centered magnitude spectrum after masking.
/// - `output_image`: The filtered image (absolute real part).
/// - `elapsed`: Wall time of the run.
#[derive(Debug, Clone)]
pub struct FilterReport {
    pub input_spectrum: GrayImage,
    pub filter_spectrum: GrayImage,
    pub output_spectrum: GrayImage,
    pub output_image: GrayImage,
    pub elapsed: Duration,
}

impl FilterReport {
    /// Writes the four images as PNG files into `dir` and returns their paths.
    ///
    /// The files are encoded in parallel, the returned paths keep the order of the fields.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = [
            (INPUT_SPECTRUM_FILE, &self.input_spectrum),
            (FILTER_SPECTRUM_FILE, &self.filter_spectrum),
            (OUTPUT_SPECTRUM_FILE, &self.output_spectrum),
            (OUTPUT_IMAGE_FILE, &self.output_image),
        ];
        entries
            .par_iter()
            .map(|(name, img)| -> Result<PathBuf> {
                let path = dir.join(name);
                img.save(&path)?;
                log::debug!("saved {:?}", path);
                Ok(path)
            })
            .collect()
    }
}

/// Applies one frequency domain filter to grayscale images.
#[derive(Debug, Clone)]
pub struct FrequencyFilterPipeline {
    parameters: FilterParameters,
    filter: Box<dyn Filter>,
}

impl FrequencyFilterPipeline {
    /// Validates `parameters` and builds the pipeline.
    pub fn new(parameters: FilterParameters) -> Result<Self> {
        let filter = parameters.build()?;
        Ok(FrequencyFilterPipeline { parameters, filter })
    }

    pub fn parameters(&self) -> &FilterParameters {
        &self.parameters
    }

    /// Filters a spatial image and returns the filtered spatial image together with the
    /// mask that was applied.
    pub fn filter_image(
        &self,
        image: ComplexImage<Spatial>,
    ) -> Result<(ComplexImage<Spatial>, FilterMask)> {
        let mut spectrum = image.forward()?.center()?;
        let mask = FilterMask::synthesize(self.filter.as_ref(), spectrum.side())?;
        spectrum.apply_mask(&mask)?;
        Ok((spectrum.uncenter()?.inverse()?, mask))
    }

    /// Runs the full pipeline on an 8 bit grayscale image.
    ///
    /// The image must be square with a power-of-two side.
    pub fn run(&self, img: &GrayImage) -> Result<FilterReport> {
        let start = Instant::now();

        let image = ComplexImage::from_gray_image(img)?;
        let side = image.side();

        let mut spectrum = image.forward()?.center()?;
        log::debug!(
            "{} of side {} ready after {:?}",
            spectrum.domain_name(),
            side,
            start.elapsed()
        );
        let input_spectrum = spectrum.to_gray_image(OutputMode::Magnitude);

        let mask = FilterMask::synthesize(self.filter.as_ref(), side)?;
        let filter_spectrum = to_gray_image(mask.values(), OutputMode::Magnitude);

        spectrum.apply_mask(&mask)?;
        let output_spectrum = spectrum.to_gray_image(OutputMode::Magnitude);

        let output = spectrum.uncenter()?.inverse()?;
        let output_image = output.try_to_gray_image(OutputMode::RealPart)?;

        let elapsed = start.elapsed();
        log::info!(
            "applied {} filter: cutoff={}, order={}, {:.2} ms",
            self.parameters.label(),
            self.parameters.cutoff,
            self.parameters.order,
            elapsed.as_secs_f64() * 1000.0
        );

        Ok(FilterReport {
            input_spectrum,
            filter_spectrum,
            output_spectrum,
            output_image,
            elapsed,
        })
    }
}

/// Reflects an image through its center using the spectrum.
///
/// The image is modulated by `(-1)^(i + j)`, transformed, conjugated, transformed back and
/// demodulated. Pixel `(x, y)` of the output holds input pixel `((N - x) % N, (N - y) % N)`.
pub fn point_reflect(img: &GrayImage) -> Result<GrayImage> {
    let start = Instant::now();
    let mut image = ComplexImage::from_gray_image(img)?;
    image.cofactor();
    let mut spectrum = image.forward()?;
    spectrum.conjugate();
    let mut reflected = spectrum.inverse()?;
    reflected.cofactor();
    log::info!(
        "reflected {0}x{0} image in {1:?}",
        reflected.side(),
        start.elapsed()
    );
    reflected.try_to_gray_image(OutputMode::RealPart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::filters::filter::{FilterKind, Pass};
    use image::Luma;

    fn test_image(side: u32) -> GrayImage {
        GrayImage::from_fn(side, side, |x, y| Luma([((x * 31 + y * 17) % 200 + 20) as u8]))
    }

    #[test]
    fn test_pass_all_low_pass_reproduces_input() {
        let img = test_image(16);
        let pipeline = FrequencyFilterPipeline::new(FilterParameters {
            kind: FilterKind::Ideal,
            cutoff: 100.0,
            order: 1,
            pass: Pass::LowPass,
        })
        .unwrap();
        let report = pipeline.run(&img).unwrap();
        assert_eq!(report.output_image.dimensions(), (16, 16));
        for (a, b) in img.pixels().zip(report.output_image.pixels()) {
            assert!((a[0] as i32 - b[0] as i32).abs() <= 1);
        }
        assert_eq!(report.input_spectrum, report.output_spectrum);
    }

    #[test]
    fn test_high_pass_removes_constant_image() {
        let img = GrayImage::from_pixel(8, 8, Luma([180]));
        let pipeline = FrequencyFilterPipeline::new(FilterParameters {
            kind: FilterKind::Gaussian,
            cutoff: 2.0,
            order: 1,
            pass: Pass::HighPass,
        })
        .unwrap();
        let report = pipeline.run(&img).unwrap();
        assert!(report.output_image.pixels().all(|p| p[0] == 0));
        // only the center of the input spectrum carries energy
        assert_eq!(report.input_spectrum.get_pixel(4, 4)[0], 255);
        assert_eq!(report.input_spectrum.get_pixel(0, 0)[0], 0);
        assert_eq!(report.filter_spectrum.get_pixel(4, 4)[0], 0);
    }

    #[test]
    fn test_filter_image_returns_mask() {
        let image = ComplexImage::from_gray_image(&test_image(8)).unwrap();
        let pipeline = FrequencyFilterPipeline::new(FilterParameters {
            kind: FilterKind::Butterworth,
            cutoff: 2.0,
            order: 2,
            pass: Pass::LowPass,
        })
        .unwrap();
        let (filtered, mask) = pipeline.filter_image(image).unwrap();
        assert_eq!(filtered.side(), 8);
        assert_eq!(mask.dim(), (8, 8));
        assert_eq!(mask.response(4, 4), 1.0);
    }

    #[test]
    fn test_run_rejects_non_power_of_two() {
        let pipeline = FrequencyFilterPipeline::new(FilterParameters::default()).unwrap();
        assert!(matches!(
            pipeline.run(&GrayImage::new(12, 12)),
            Err(FilterError::NotPowerOfTwo { len: 12 })
        ));
    }

    #[test]
    fn test_point_reflect() {
        let n = 16;
        let img = test_image(n);
        let reflected = point_reflect(&img).unwrap();
        for (x, y, pixel) in reflected.enumerate_pixels() {
            let source = img.get_pixel((n - x) % n, (n - y) % n);
            assert!((pixel[0] as i32 - source[0] as i32).abs() <= 1);
        }
    }
}
