//! Square-root display stretch.
//!
//! Finite values are normalised to `[0, 1]` between the image minimum and
//! maximum and then square-rooted, lifting faint structure the way a sqrt
//! display stretch does in the usual astronomy viewers. NaN and infinite
//! cells (for example the fill of a partial cutout) stay NaN.

use ndarray::Array2;

/// Normalise to `[0, 1]` and apply `sqrt`.
///
/// A constant image maps to zeros; an image with no finite values maps to
/// all-NaN.
pub fn sqrt_stretch(data: &Array2<f64>) -> Array2<f64> {
    let (min, max) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return Array2::from_elem(data.dim(), f64::NAN);
    }

    let range = max - min;
    data.mapv(|v| {
        if !v.is_finite() {
            f64::NAN
        } else if range == 0.0 {
            0.0
        } else {
            ((v - min) / range).sqrt()
        }
    })
}

/// Quantise a `[0, 1]` image to 8 bits; NaN becomes 0 and values outside the
/// unit interval saturate
pub fn to_u8(data: &Array2<f64>) -> Array2<u8> {
    data.mapv(|v| {
        if v.is_nan() {
            0
        } else {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_sqrt_stretch_range() {
        let data = array![[10.0, 14.0], [26.0, 110.0]];
        let stretched = sqrt_stretch(&data);

        assert_relative_eq!(stretched[[0, 0]], 0.0);
        assert_relative_eq!(stretched[[0, 1]], 0.2, epsilon = 1e-12);
        assert_relative_eq!(stretched[[1, 0]], 0.4, epsilon = 1e-12);
        assert_relative_eq!(stretched[[1, 1]], 1.0);
    }

    #[test]
    fn test_nan_cells_are_ignored_and_kept() {
        let data = array![[f64::NAN, 0.0], [25.0, 100.0]];
        let stretched = sqrt_stretch(&data);

        assert!(stretched[[0, 0]].is_nan());
        assert_relative_eq!(stretched[[1, 0]], 0.5);
        assert_eq!(to_u8(&stretched), array![[0u8, 0], [128, 255]]);
    }

    #[test]
    fn test_degenerate_images() {
        let flat = Array2::from_elem((3, 3), 4.2);
        assert!(sqrt_stretch(&flat).iter().all(|&v| v == 0.0));

        let empty = Array2::from_elem((2, 2), f64::NAN);
        assert!(sqrt_stretch(&empty).iter().all(|v| v.is_nan()));
    }
}
