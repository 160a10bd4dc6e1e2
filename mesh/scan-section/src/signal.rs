//! One-dimensional signal helpers used for landmark detection.

use std::ops::Range;

/// Gaussian-smooth `signal` with standard deviation `sigma` (in samples).
///
/// The boundary is handled by mirror reflection (`d c b a | a b c d |
/// d c b a`) and the kernel is truncated at 4σ. A non-positive `sigma`
/// returns the signal unchanged.
///
/// # Example
///
/// ```
/// use scan_section::gaussian_smooth;
///
/// let flat = gaussian_smooth(&[5.0; 10], 3.0);
/// assert!(flat.iter().all(|v| (v - 5.0).abs() < 1e-12));
/// ```
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
// Truncation: kernel radius and signal length are small
pub fn gaussian_smooth(signal: &[f64], sigma: f64) -> Vec<f64> {
    if signal.is_empty() || sigma <= 0.0 {
        return signal.to_vec();
    }

    let radius = 4.0f64.mul_add(sigma, 0.5) as i64;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|k| {
            let x = k as f64;
            (-0.5 * x * x / (sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= total;
    }

    let n = signal.len() as i64;
    let period = 2 * n;
    let reflect = |i: i64| {
        let p = i.rem_euclid(period);
        (if p < n { p } else { period - 1 - p }) as usize
    };

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * signal[reflect(i + k as i64 - radius)])
                .sum()
        })
        .collect()
}

/// Index of the smallest value in `signal[range]` (first on ties).
///
/// `None` for an empty or out-of-bounds range.
#[must_use]
pub fn argmin_in(signal: &[f64], range: Range<usize>) -> Option<usize> {
    extreme_in(signal, range, |candidate, best| candidate < best)
}

/// Index of the largest value in `signal[range]` (first on ties).
#[must_use]
pub fn argmax_in(signal: &[f64], range: Range<usize>) -> Option<usize> {
    extreme_in(signal, range, |candidate, best| candidate > best)
}

fn extreme_in(
    signal: &[f64],
    range: Range<usize>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let slice = signal.get(range.clone())?;
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in slice.iter().enumerate() {
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((range.start + i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Left insertion point of `value` in ascending `sorted`.
#[must_use]
pub fn search_sorted(sorted: &[f64], value: f64) -> usize {
    sorted.partition_point(|&h| h < value)
}

/// Evenly spaced values from `start` to `end` inclusive.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| (i as f64).mul_add(step, start)).collect()
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smoothing_preserves_sum_of_impulse() {
        let mut signal = vec![0.0; 41];
        signal[20] = 1.0;
        let smooth = gaussian_smooth(&signal, 3.0);
        assert_relative_eq!(smooth.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert_eq!(argmax_in(&smooth, 0..41), Some(20));
        assert!(smooth[20] < 0.2);
    }

    #[test]
    fn reflection_keeps_edges_flat() {
        let ramp: Vec<f64> = (0..30).map(f64::from).collect();
        let smooth = gaussian_smooth(&ramp, 3.0);
        // Mirrored edges pull the endpoints inward but never past the data.
        assert!(smooth[0] >= 0.0 && smooth[0] < 3.0);
        assert!(smooth[29] <= 29.0 && smooth[29] > 26.0);
        assert_relative_eq!(smooth[15], 15.0, epsilon = 1e-9);
    }

    #[test]
    fn short_signal_longer_kernel() {
        let smooth = gaussian_smooth(&[1.0, 2.0, 3.0], 3.0);
        assert_eq!(smooth.len(), 3);
        assert!(smooth.iter().all(|v| (1.0..=3.0).contains(v)));
    }

    #[test]
    fn arg_extremes() {
        let s = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        assert_eq!(argmin_in(&s, 0..7), Some(1));
        assert_eq!(argmin_in(&s, 2..5), Some(3));
        assert_eq!(argmax_in(&s, 0..5), Some(4));
        assert_eq!(argmax_in(&s, 3..3), None);
        assert_eq!(argmax_in(&s, 5..9), None);
    }

    #[test]
    fn sorted_search_and_linspace() {
        let h = linspace(1.0, 99.0, 50);
        assert_eq!(h.len(), 50);
        assert_eq!(h[0], 1.0);
        assert_relative_eq!(h[49], 99.0);
        assert_eq!(search_sorted(&h, 0.0), 0);
        assert_eq!(search_sorted(&h, h[10]), 10);
        assert_eq!(search_sorted(&h, 1000.0), 50);
    }
}
