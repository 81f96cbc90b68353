use std::ops::Sub;
use std::sync::OnceLock;

use num_traits::{AsPrimitive, Zero};

use crate::batch::{compute_median_absolute_deviation, compute_mode, compute_std_dev};
use crate::models::SampleSummary;

///
/// Keeps every sample and derives summary statistics from the full set on demand.
///
/// Mean and standard deviation are outlier-filtered (see [`compute_std_dev`]); mode, median
/// and MAD use every sample. Use this when the samples fit in memory and are not integers
/// suited to [`HistogramStatistics`](crate::HistogramStatistics).
///
#[derive(Debug, Clone)]
pub struct SampleStatistics<T> {
    data: Vec<T>,
    summary: OnceLock<SampleSummary<T>>,
}

impl<T> Default for SampleStatistics<T> {
    fn default() -> Self {
        SampleStatistics {
            data: Vec::new(),
            summary: OnceLock::new(),
        }
    }
}

impl<T> SampleStatistics<T>
where
    T: Copy + PartialOrd + Sub<Output = T> + Zero + AsPrimitive<f64>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: T) {
        self.data.push(value);
        self.summary.take();
    }

    pub fn samples(&self) -> &[T] {
        &self.data
    }

    pub fn summary(&self) -> &SampleSummary<T> {
        self.summary.get_or_init(|| {
            let mut sorted = self.data.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let (mean, stddev) = compute_std_dev(&sorted, true);
            let mode = compute_mode(&sorted, true);
            let (median, mad) = compute_median_absolute_deviation(&sorted, true);

            SampleSummary {
                number_of_objects: sorted.len(),
                mean,
                stddev,
                mode,
                median,
                mad,
            }
        })
    }

    pub fn number_of_objects(&self) -> usize {
        self.data.len()
    }

    pub fn mean(&self) -> f64 {
        self.summary().mean
    }

    pub fn stddev(&self) -> f64 {
        self.summary().stddev
    }

    pub fn mode(&self) -> T {
        self.summary().mode
    }

    pub fn median(&self) -> T {
        self.summary().median
    }

    pub fn mad(&self) -> T {
        self.summary().mad
    }
}

impl<T> Extend<T> for SampleStatistics<T>
where
    T: Copy + PartialOrd + Sub<Output = T> + Zero + AsPrimitive<f64>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}
