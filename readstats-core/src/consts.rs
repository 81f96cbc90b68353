/// Largest number of samples an [`OnlineStdDev`](crate::OnlineStdDev) will hold.
pub const MAX_COUNT: u32 = 0x7fff_ffff;

/// Slots allocated up front by [`HistogramStatistics::new`](crate::HistogramStatistics::new).
pub const DEFAULT_HISTOGRAM_CAPACITY: usize = 1024 * 1024;

pub const DEFAULT_HISTOGRAM_LABEL: &str = "value";

/// Half-width of the inlier band in `compute_std_dev`, in units of the approximate stddev.
pub const OUTLIER_BAND_WIDTH: f64 = 5.0;

pub const HISTOGRAM_HEADER_SUFFIX: &str = "quantity";
