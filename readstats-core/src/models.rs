#[cfg(feature = "serde")]
use serde::Serialize;

/// Everything a [`HistogramStatistics`](crate::HistogramStatistics) derives from its counts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HistogramSummary {
    /// Total weight, the sum of every bucket
    pub number_of_objects: u64,
    pub mean: f64,
    pub stddev: f64,
    /// Most populated index; the lowest one on ties
    pub mode: u64,
    /// Smallest index whose cumulative count reaches half the objects
    pub median: u64,
    /// Median absolute deviation, same cumulative convention as `median`
    pub mad: u64,
}

/// Statistics derived from a retained set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SampleSummary<T> {
    pub number_of_objects: usize,
    /// Outlier-filtered mean
    pub mean: f64,
    /// Outlier-filtered sample standard deviation
    pub stddev: f64,
    pub mode: T,
    pub median: T,
    pub mad: T,
}
