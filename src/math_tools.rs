//! This module provides the numeric kernel of the spectral filter: an iterative radix-2 FFT,
//! its separable 2D extension, spectrum centering and a few helpers that operate on
//! complex matrices in place.
//!
//! All matrices are square `Array2<Complex64>` with a power-of-two side. The same container
//! holds spatial data and spectra, the caller keeps track of which one it is (see
//! [`crate::data_container::ComplexImage`] for a typed wrapper).

use crate::error::{FilterError, Result};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayViewMut1, Axis, Zip};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Returns `true` if `n` is a non-zero power of two.
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Checks that `matrix` is square with a power-of-two side and returns the side length.
pub fn check_square_power_of_two<T>(matrix: &Array2<T>) -> Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(FilterError::NotSquare { rows, cols });
    }
    if !is_power_of_two(rows) {
        return Err(FilterError::NotPowerOfTwo { len: rows });
    }
    Ok(rows)
}

/// Performs an FFT (or inverse FFT) over a sequence in place.
///
/// The forward transform is unnormalized and uses a positive exponent angle, the inverse
/// uses the negative angle and divides every sample by `n`.
///
/// # Arguments
/// - `seq`: The sequence to transform, its length must be a power of two.
/// - `inverse`: `true` for the inverse transform.
///
/// # Errors
/// Returns [`FilterError::NotPowerOfTwo`] without touching `seq` if its length is not a
/// power of two.
pub fn fft(seq: &mut [Complex64], inverse: bool) -> Result<()> {
    if !is_power_of_two(seq.len()) {
        return Err(FilterError::NotPowerOfTwo { len: seq.len() });
    }
    fft_in_place(seq, inverse);
    Ok(())
}

fn fft_in_place(seq: &mut [Complex64], inverse: bool) {
    let n = seq.len();

    // bit-reversal permutation
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            seq.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let angle = 2.0 * PI / len as f64 * if inverse { -1.0 } else { 1.0 };
        let root = Complex64::new(angle.cos(), angle.sin());
        let half = len / 2;
        for block in seq.chunks_exact_mut(len) {
            let mut w = Complex64::new(1.0, 0.0);
            for k in 0..half {
                let u = block[k];
                let v = block[k + half] * w;
                block[k] = u + v;
                block[k + half] = u - v;
                w *= root;
            }
        }
        len <<= 1;
    }

    if inverse {
        let scale = n as f64;
        for x in seq.iter_mut() {
            *x /= scale;
        }
    }
}

fn fft_row(mut row: ArrayViewMut1<Complex64>, inverse: bool) {
    if let Some(slice) = row.as_slice_mut() {
        fft_in_place(slice, inverse);
    } else {
        let mut buffer = row.to_vec();
        fft_in_place(&mut buffer, inverse);
        for (dst, src) in row.iter_mut().zip(buffer) {
            *dst = src;
        }
    }
}

fn fft_rows(matrix: &mut Array2<Complex64>, inverse: bool) {
    matrix
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|row| fft_row(row, inverse));
}

/// Performs a 2D FFT (or inverse FFT) over a square matrix in place.
///
/// The transform runs over every row, transposes, runs over every row again (the original
/// columns) and transposes back. Rows are independent and processed in parallel.
///
/// # Errors
/// [`FilterError::NotSquare`] or [`FilterError::NotPowerOfTwo`], checked before any data
/// is modified.
pub fn fft_2d(matrix: &mut Array2<Complex64>, inverse: bool) -> Result<()> {
    check_square_power_of_two(matrix)?;

    fft_rows(matrix, inverse);
    transpose(matrix);
    fft_rows(matrix, inverse);
    transpose(matrix);
    Ok(())
}

/// Transposes a square matrix in place by swapping across the main diagonal.
pub fn transpose<T>(matrix: &mut Array2<T>) {
    let n = matrix.nrows().min(matrix.ncols());
    for i in 0..n {
        for j in (i + 1)..n {
            matrix.swap([i, j], [j, i]);
        }
    }
}

/// Shifts the zero-frequency component of a spectrum to the center of the matrix.
///
/// Swaps the top-left quadrant with the bottom-right one and the bottom-left quadrant with
/// the top-right one. The operation is its own inverse.
///
/// # Errors
/// [`FilterError::NotSquare`] or [`FilterError::OddSide`].
pub fn fftshift<T>(matrix: &mut Array2<T>) -> Result<()> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(FilterError::NotSquare { rows, cols });
    }
    if rows % 2 != 0 {
        return Err(FilterError::OddSide { side: rows });
    }

    let offset = rows / 2;
    for i in 0..offset {
        for j in 0..offset {
            matrix.swap([i, j], [i + offset, j + offset]);
        }
    }
    for i in offset..rows {
        for j in 0..offset {
            matrix.swap([i, j], [i - offset, j + offset]);
        }
    }
    Ok(())
}

/// Multiplies every cell `(i, j)` by `(-1)^(i + j)`.
///
/// Applied to spatial data before a forward transform, this centers the resulting spectrum
/// without a quadrant swap.
pub fn cofactor(matrix: &mut Array2<Complex64>) {
    Zip::indexed(matrix).for_each(|(i, j), value| {
        if (i + j) & 1 == 1 {
            *value = -*value;
        }
    });
}

/// Replaces every sample with its complex conjugate.
pub fn conjugate(matrix: &mut Array2<Complex64>) {
    matrix.mapv_inplace(|value| value.conj());
}
