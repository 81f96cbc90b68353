//! Offline statistics over a fully materialized set of samples.
//!
//! Every function takes the samples by slice and, unless told the input is already sorted,
//! sorts a private copy. The caller's ordering is never changed. An empty input yields zeros.
use std::borrow::Cow;
use std::cmp::Ordering;
use std::ops::Sub;

use log::debug;
use num_traits::{AsPrimitive, Float, Zero};

use crate::consts::OUTLIER_BAND_WIDTH;

fn sorted_view<T: Copy + PartialOrd>(samples: &[T], is_sorted: bool) -> Cow<'_, [T]> {
    if is_sorted {
        return Cow::Borrowed(samples);
    }

    let mut dist = samples.to_vec();
    dist.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Cow::Owned(dist)
}

///
/// Mean and sample standard deviation with outliers removed.
///
/// The spread is approximated from order statistics, assuming a roughly normal shape: the
/// distance from the median to the one-third and two-thirds elements stands in for one
/// standard deviation. Samples further than five of those from the median are ignored, both
/// for the mean and for the standard deviation.
///
/// This heuristic is unreliable for skewed or multimodal data, and for unsigned-like domains
/// where the lower edge of the band would fall below zero.
///
/// # Arguments
/// - samples: the distribution
/// - is_sorted: skip sorting, `samples` is already in ascending order
///
/// # Returns
/// `(mean, stddev)`, both zero for empty input.
///
pub fn compute_std_dev<T>(samples: &[T], is_sorted: bool) -> (f64, f64)
where
    T: Copy + PartialOrd + AsPrimitive<f64>,
{
    if samples.is_empty() {
        return (0.0, 0.0);
    }

    let dist = sorted_view(samples, is_sorted);
    let n = dist.len();

    let median: f64 = dist[n / 2].as_();
    let one_third: f64 = dist[n / 3].as_();
    let two_third: f64 = dist[2 * n / 3].as_();

    let approx_std = (median - one_third).max(two_third - median);

    let biggest = median + approx_std * OUTLIER_BAND_WIDTH;
    let smallest = median - approx_std * OUTLIER_BAND_WIDTH;

    debug!(
        "compute_std_dev median={} one_third={} two_third={} approx_std={} band=[{}, {}]",
        median, one_third, two_third, approx_std, smallest, biggest
    );

    let inliers: Vec<f64> = dist
        .iter()
        .map(|v| -> f64 { v.as_() })
        .filter(|v| smallest <= *v && *v <= biggest)
        .collect();

    let num_samples = inliers.len();
    if num_samples == 0 {
        return (0.0, 0.0);
    }

    let mut mean: f64 = 0.0;
    for &v in &inliers {
        mean += v;
    }
    mean /= num_samples as f64;

    let mut stddev: f64 = 0.0;
    for &v in &inliers {
        stddev += (v - mean) * (v - mean);
    }

    if num_samples > 1 {
        stddev = (stddev / (num_samples - 1) as f64).sqrt();
    }

    (mean, stddev)
}

///
/// The most common value. When several values are equally common, the smallest wins.
///
pub fn compute_mode<T>(samples: &[T], is_sorted: bool) -> T
where
    T: Copy + PartialOrd + Zero,
{
    if samples.is_empty() {
        return T::zero();
    }

    let dist = sorted_view(samples, is_sorted);

    let mut mode_val = dist[0];
    let mut mode_cnt: usize = 0;

    let mut run_val = dist[0];
    let mut run_cnt: usize = 0;

    for &v in dist.iter() {
        if v != run_val {
            if mode_cnt < run_cnt {
                mode_cnt = run_cnt;
                mode_val = run_val;
            }
            run_val = v;
            run_cnt = 0;
        }
        run_cnt += 1;
    }

    if mode_cnt < run_cnt {
        mode_val = run_val;
    }

    mode_val
}

///
/// Median and median absolute deviation.
///
/// Both are taken as the element at index `len / 2` of the sorted sequence, so for an even
/// number of samples the upper of the two middle elements is reported, never their average.
///
/// # Returns
/// `(median, mad)`, both zero for empty input.
///
pub fn compute_median_absolute_deviation<T>(samples: &[T], is_sorted: bool) -> (T, T)
where
    T: Copy + PartialOrd + Sub<Output = T> + Zero,
{
    if samples.is_empty() {
        return (T::zero(), T::zero());
    }

    let dist = sorted_view(samples, is_sorted);
    let median = dist[dist.len() / 2];

    let deviations: Vec<T> = dist
        .iter()
        .map(|&v| if v < median { median - v } else { v - median })
        .collect();
    let deviations = sorted_view(&deviations, false);

    (median, deviations[deviations.len() / 2])
}

///
/// One step of an exponential moving average: `alpha * value + (1 - alpha) * ema`.
///
/// # Panics
/// If `alpha` is outside `[0, 1]`.
///
pub fn compute_exponential_moving_average<T: Float>(alpha: T, ema: T, value: T) -> T {
    assert!(
        T::zero() <= alpha && alpha <= T::one(),
        "exponential moving average weight must lie in [0, 1]"
    );

    alpha * value + (T::one() - alpha) * ema
}
