//! Descriptive statistics for large numeric distributions such as read lengths, overlap
//! lengths and coverage depths.
//!
//! The same vocabulary (mean, standard deviation, mode, median, median absolute deviation) is
//! offered under three storage strategies; pick the one that fits the caller:
//!
//! - [`OnlineStdDev`]: running mean/stddev in constant space, with removal for sliding windows
//! - [`batch`]: free functions over a materialized slice of samples, including an
//!   outlier-filtered mean/stddev
//! - [`HistogramStatistics`]: bounded-memory counts over non-negative integers, with a flat
//!   text serialization
//!
//! [`SampleStatistics`] retains samples and caches the [`batch`] results.
//!
//! # Example
//!
//! ```
//! use readstats_core::{HistogramStatistics, OnlineStdDev};
//! use readstats_core::batch::compute_mode;
//!
//! let lengths = [1200u64, 1500, 1500, 900, 30000];
//!
//! let mut running = OnlineStdDev::new();
//! let mut hist = HistogramStatistics::with_capacity(1024);
//! for &len in &lengths {
//!     running.insert(len);
//!     hist.add(len);
//! }
//!
//! assert_eq!(compute_mode(&lengths, false), 1500);
//! assert_eq!(hist.mode(), 1500);
//! assert_eq!(running.size(), 5);
//! ```

pub mod batch;
pub mod consts;
pub mod errors;
pub mod histogram;
pub mod models;
pub mod samples;
pub mod stream;

// re-exports
pub use errors::StatsError;
pub use histogram::HistogramStatistics;
pub use models::{HistogramSummary, SampleSummary};
pub use samples::SampleStatistics;
pub use stream::OnlineStdDev;
