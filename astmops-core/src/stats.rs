//! Small pure statistics helpers shared by the accuracy and PIC-threshold
//! calculations.

/// Percentile of `values` using rank interpolation: 0 -> min, 100 -> max,
/// otherwise the bracketing order statistics around
/// `rank = percent / 100 * n` are averaged when the rank falls on a whole
/// number, or the upper bracket is taken otherwise.
pub fn percentile(values: &[f64], percent: f64) -> f64 {
    if values.is_empty() || !(0.0..=100.0).contains(&percent) {
        return f64::NAN;
    }
    if values.len() == 1 {
        return values[0];
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();

    if percent == 0.0 {
        return sorted[0];
    }
    if percent == 100.0 {
        return sorted[n - 1];
    }

    let rank = percent / 100.0 * n as f64;
    if rank >= (n - 1) as f64 {
        return sorted[n - 1];
    }

    let int_part = rank.trunc();
    let frac_part = rank - int_part;
    let idx = int_part as isize - 1;

    if frac_part != 0.0 {
        sorted[(idx + 1) as usize]
    } else {
        (sorted[idx as usize] + sorted[(idx + 1) as usize]) / 2.0
    }
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator); 0.0 for a single sample,
/// NaN for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => 0.0,
        n => {
            let m = mean(values);
            let sum_sq = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
            (sum_sq / (n - 1) as f64).sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_bounds() {
        let v = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 5.0);
    }

    #[test]
    fn percentile_midpoint_interpolates() {
        let v = vec![1.0, 2.0, 3.0, 4.0];
        let p50 = percentile(&v, 50.0);
        assert!((p50 - 2.5).abs() < 1e-9);
    }

    #[test]
    fn mean_and_std_dev() {
        let v = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v) - 5.0).abs() < 1e-9);
        assert!((std_dev(&v) - 2.138_089_935_299_395).abs() < 1e-6);
        assert_eq!(std_dev(&[1.0]), 0.0);
        assert!(std_dev(&[]).is_nan());
    }
}
