//! Statistics over a histogram of non-negative integer values.
//!
//! Samples are never retained. Each value is a bucket index, and only the per-bucket count is
//! kept, so memory is bounded by the largest value seen rather than by the number of samples.
//! Derived statistics are computed lazily and cached until the next [`add`](HistogramStatistics::add).
use std::io::{BufRead, Write};
use std::sync::OnceLock;

use log::{debug, trace};

use crate::consts::{DEFAULT_HISTOGRAM_CAPACITY, HISTOGRAM_HEADER_SUFFIX};
use crate::errors::{Result, StatsError};
use crate::models::HistogramSummary;

///
/// Smallest index at which the running sum of `counts` reaches `threshold`.
///
fn cumulative_threshold(counts: &[u64], threshold: u64) -> u64 {
    let mut seen: u64 = 0;

    for (ii, &count) in counts.iter().enumerate() {
        seen += count;
        if seen >= threshold {
            return ii as u64;
        }
    }

    0
}

///
/// Histogram-backed accumulator for non-negative integer samples, such as read lengths or
/// coverage depths.
///
/// ```
/// use readstats_core::HistogramStatistics;
///
/// let mut hist = HistogramStatistics::with_capacity(16);
/// for v in [1, 2, 3, 4] {
///     hist.add(v);
/// }
/// assert_eq!(hist.number_of_objects(), 4);
/// assert_eq!(hist.median(), 2);
/// assert_eq!(hist.mean(), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct HistogramStatistics {
    // every allocated slot is initialized; `histogram.len()` is the capacity
    histogram: Vec<u64>,
    histogram_max: usize,
    number_of_objects: u64,
    summary: OnceLock<HistogramSummary>,
}

impl Default for HistogramStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramStatistics {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTOGRAM_CAPACITY)
    }

    ///
    /// Create an empty histogram with room for values `0..capacity` before the first grow.
    ///
    pub fn with_capacity(capacity: usize) -> Self {
        HistogramStatistics {
            histogram: vec![0; capacity.max(1)],
            histogram_max: 0,
            number_of_objects: 0,
            summary: OnceLock::new(),
        }
    }

    pub fn add(&mut self, value: u64) {
        self.add_count(value, 1);
    }

    ///
    /// Add `count` occurrences of `value`.
    ///
    /// # Panics
    /// If storage for `value` can't be allocated, or the total count overflows `u64`.
    ///
    pub fn add_count(&mut self, value: u64, count: u64) {
        if let Err(e) = self.try_add_count(value, count) {
            panic!("{e}");
        }
    }

    ///
    /// Add `count` occurrences of `value`. Storage doubles until `value` fits; new slots
    /// read as zero. On error the histogram is left unchanged.
    ///
    pub fn try_add_count(&mut self, value: u64, count: u64) -> Result<()> {
        let index = usize::try_from(value).map_err(|_| StatsError::TooLarge(value))?;

        let total = self
            .number_of_objects
            .checked_add(count)
            .ok_or(StatsError::CountOverflow(value))?;

        if index >= self.histogram.len() {
            self.try_grow(index)?;
        }

        if self.histogram_max < index {
            self.histogram_max = index;
        }

        // no bucket can exceed the total
        self.histogram[index] += count;
        self.number_of_objects = total;
        self.summary.take();

        Ok(())
    }

    fn try_grow(&mut self, index: usize) -> Result<()> {
        let mut capacity = self.histogram.len();

        while capacity <= index {
            capacity = capacity
                .checked_mul(2)
                .ok_or(StatsError::TooLarge(index as u64))?;
        }

        debug!(
            "growing histogram from {} to {} slots for value {}",
            self.histogram.len(),
            capacity,
            index
        );

        self.histogram
            .try_reserve_exact(capacity - self.histogram.len())
            .map_err(|_| StatsError::TooLarge(index as u64))?;
        self.histogram.resize(capacity, 0);

        Ok(())
    }

    /// Count stored for `index`; zero for any index never written.
    pub fn histogram(&self, index: u64) -> u64 {
        usize::try_from(index)
            .ok()
            .and_then(|ii| self.histogram.get(ii))
            .copied()
            .unwrap_or(0)
    }

    /// Highest index ever written.
    pub fn histogram_max(&self) -> u64 {
        self.histogram_max as u64
    }

    pub fn capacity(&self) -> usize {
        self.histogram.len()
    }

    pub fn summary(&self) -> &HistogramSummary {
        self.summary.get_or_init(|| self.finalize_data())
    }

    pub fn number_of_objects(&self) -> u64 {
        self.summary().number_of_objects
    }

    pub fn mean(&self) -> f64 {
        self.summary().mean
    }

    pub fn stddev(&self) -> f64 {
        self.summary().stddev
    }

    pub fn mode(&self) -> u64 {
        self.summary().mode
    }

    pub fn median(&self) -> u64 {
        self.summary().median
    }

    pub fn mad(&self) -> u64 {
        self.summary().mad
    }

    //  Index `ii` is a sample value and `counts[ii]` how many times it was seen, so every
    //  sum below is the usual formula with each term weighted by its count.
    fn finalize_data(&self) -> HistogramSummary {
        trace!("recomputing histogram statistics over 0..={}", self.histogram_max);

        let counts = &self.histogram[..=self.histogram_max];

        let number_of_objects = self.number_of_objects;

        let mut mean: f64 = 0.0;
        for (ii, &count) in counts.iter().enumerate() {
            mean += ii as f64 * count as f64;
        }
        if number_of_objects > 1 {
            mean /= number_of_objects as f64;
        }

        let mut stddev: f64 = 0.0;
        for (ii, &count) in counts.iter().enumerate() {
            let deviation = ii as f64 - mean;
            stddev += count as f64 * deviation * deviation;
        }
        if number_of_objects > 1 {
            stddev = (stddev / (number_of_objects - 1) as f64).sqrt();
        }

        let mut mode = 0;
        for (ii, &count) in counts.iter().enumerate() {
            if count > counts[mode] {
                mode = ii;
            }
        }

        let half = number_of_objects / 2;
        let median = cumulative_threshold(counts, half);

        // |ii - median| never exceeds histogram_max, consider [0]=big, [max]=1.
        let mut deviations = vec![0u64; self.histogram_max + 1];
        for (ii, &count) in counts.iter().enumerate() {
            if count > 0 {
                deviations[(ii as u64).abs_diff(median) as usize] += count;
            }
        }
        let mad = cumulative_threshold(&deviations, half);

        HistogramSummary {
            number_of_objects,
            mean,
            stddev,
            mode: mode as u64,
            median,
            mad,
        }
    }

    ///
    /// Write the histogram as a two column table: a `#<label>\tquantity` header, then one
    /// `<index>\t<count>` row for every index from zero to [`histogram_max`](Self::histogram_max),
    /// empty buckets included.
    ///
    pub fn write_histogram<W: Write>(&self, mut writer: W, label: &str) -> Result<()> {
        writeln!(writer, "#{}\t{}", label, HISTOGRAM_HEADER_SUFFIX)?;

        for (ii, count) in self.histogram[..=self.histogram_max].iter().enumerate() {
            writeln!(writer, "{}\t{}", ii, count)?;
        }

        Ok(())
    }

    ///
    /// Read a table produced by [`write_histogram`](Self::write_histogram).
    ///
    /// Rows must be contiguous and start at index zero, so the storage needed is bounded by
    /// the length of the table.
    ///
    /// # Returns
    /// The label from the header and the reconstructed histogram.
    ///
    pub fn read_histogram<R: BufRead>(reader: R) -> Result<(String, Self)> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(StatsError::InvalidHistogram("missing header".to_string())),
        };

        let label = header
            .strip_prefix('#')
            .and_then(|h| h.strip_suffix(HISTOGRAM_HEADER_SUFFIX))
            .and_then(|h| h.strip_suffix('\t'))
            .ok_or_else(|| StatsError::InvalidHistogram(format!("bad header: {header}")))?
            .to_string();

        let mut histogram = HistogramStatistics::new();

        let mut expected_index: u64 = 0;

        for (lineno, line) in lines.enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let bad_row = |reason: &str| {
                StatsError::InvalidHistogram(format!("row {}: {} ({})", lineno + 2, line, reason))
            };

            let mut fields = line.split('\t');
            let mut parse = || fields.next().and_then(|f| f.parse::<u64>().ok());

            let (Some(index), Some(count), None) = (parse(), parse(), parse()) else {
                return Err(bad_row("expected <index>\\t<count>"));
            };

            if index != expected_index {
                return Err(bad_row(&format!("expected index {expected_index}")));
            }

            histogram
                .try_add_count(index, count)
                .map_err(|e| bad_row(&e.to_string()))?;

            expected_index += 1;
        }

        Ok((label, histogram))
    }
}

impl Extend<u64> for HistogramStatistics {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<u64> for HistogramStatistics {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut histogram = HistogramStatistics::new();
        histogram.extend(iter);
        histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn sparse() -> HistogramStatistics {
        // {0:0, 1:2, 2:0, 3:1}
        let mut hist = HistogramStatistics::with_capacity(4);
        hist.add_count(1, 2);
        hist.add(3);
        hist
    }

    #[rstest]
    fn test_empty_is_zero() {
        let hist = HistogramStatistics::with_capacity(8);
        assert_eq!(*hist.summary(), HistogramSummary::default());
        assert_eq!(hist.histogram_max(), 0);
        assert_eq!(hist.histogram(0), 0);
    }

    #[rstest]
    fn test_write_histogram(sparse: HistogramStatistics) {
        let mut out = Vec::new();
        sparse.write_histogram(&mut out, "L").unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#L\tquantity\n0\t0\n1\t2\n2\t0\n3\t1\n"
        );
    }

    #[rstest]
    fn test_read_histogram(sparse: HistogramStatistics) {
        let mut out = Vec::new();
        sparse.write_histogram(&mut out, "read length").unwrap();

        let (label, hist) = HistogramStatistics::read_histogram(out.as_slice()).unwrap();

        assert_eq!(label, "read length");
        assert_eq!(hist.histogram_max(), 3);
        assert_eq!(hist.histogram(1), 2);
        assert_eq!(hist.summary(), sparse.summary());
    }

    #[rstest]
    #[case("")]
    #[case("0\t0\n")]
    #[case("#L\tcount\n0\t1\n")]
    #[case("#L\tquantity\n0\tmany\n")]
    #[case("#L\tquantity\n0\t1\t2\n")]
    #[case("#L\tquantity\n1099511627776\t1\n")]
    #[case("#L\tquantity\n18446744073709551615\t1\n")]
    #[case("#L\tquantity\n0\t1\n2\t1\n")]
    #[case("#L\tquantity\n0\t18446744073709551615\n1\t1\n")]
    fn test_read_histogram_rejects_malformed(#[case] table: &str) {
        assert!(HistogramStatistics::read_histogram(table.as_bytes()).is_err());
    }

    #[rstest]
    fn test_read_histogram_reports_row() {
        let err = HistogramStatistics::read_histogram("#L\tquantity\n0\t1\n5\t1\n".as_bytes())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid histogram table: row 3: 5\t1 (expected index 1)"
        );
    }

    #[rstest]
    fn test_try_add_count_rejects_huge_value() {
        let mut hist = HistogramStatistics::with_capacity(4);
        hist.add(1);

        assert!(matches!(
            hist.try_add_count(u64::MAX, 1),
            Err(StatsError::TooLarge(_))
        ));
        assert_eq!(hist.capacity(), 4);
        assert_eq!(hist.histogram_max(), 1);
        assert_eq!(hist.number_of_objects(), 1);
    }

    #[rstest]
    fn test_try_add_count_rejects_total_overflow() {
        let mut hist = HistogramStatistics::with_capacity(4);
        hist.add_count(0, u64::MAX);

        assert!(matches!(
            hist.try_add_count(1, 1),
            Err(StatsError::CountOverflow(1))
        ));
        assert_eq!(hist.histogram(1), 0);
        assert_eq!(hist.number_of_objects(), u64::MAX);
    }

    #[rstest]
    #[should_panic(expected = "histogram count overflows")]
    fn test_add_count_panics_on_overflow() {
        let mut hist = HistogramStatistics::with_capacity(4);
        hist.add_count(2, u64::MAX);
        hist.add(2);
    }

    #[rstest]
    fn test_grow_keeps_counts_and_zero_fills() {
        let mut hist = HistogramStatistics::with_capacity(4);
        hist.add(0);
        hist.add(2);
        hist.add(37);

        assert_eq!(hist.capacity(), 64);
        assert_eq!(hist.histogram_max(), 37);
        assert_eq!(hist.histogram(0), 1);
        assert_eq!(hist.histogram(2), 1);
        assert!((3..37).all(|ii| hist.histogram(ii) == 0));
        assert_eq!(hist.histogram(37), 1);
        assert_eq!(hist.histogram(1000), 0);
    }

    #[rstest]
    fn test_mean_and_stddev() {
        let hist: HistogramStatistics = [2, 4, 4, 4, 5, 5, 7, 9].into_iter().collect();

        assert_eq!(hist.number_of_objects(), 8);
        assert_eq!(hist.mean(), 5.0);
        assert!((hist.stddev() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[rstest]
    fn test_single_object() {
        let mut hist = HistogramStatistics::with_capacity(8);
        hist.add(6);

        assert_eq!(hist.mean(), 6.0);
        assert_eq!(hist.stddev(), 0.0);
        assert_eq!(hist.mode(), 6);
        // threshold is 1 / 2 == 0, met at the first index
        assert_eq!(hist.median(), 0);
    }

    #[rstest]
    #[case(vec![1, 2, 3, 4], 2, 1)]
    #[case(vec![1, 1, 1, 5, 9], 1, 0)]
    #[case(vec![0, 10, 10, 10, 10], 10, 0)]
    #[case(vec![2, 4, 6, 8, 10, 12], 6, 2)]
    fn test_median_and_mad(#[case] values: Vec<u64>, #[case] median: u64, #[case] mad: u64) {
        let hist: HistogramStatistics = values.into_iter().collect();
        assert_eq!(hist.median(), median);
        assert_eq!(hist.mad(), mad);
    }

    #[rstest]
    fn test_mode_ties_go_low() {
        let mut hist = HistogramStatistics::with_capacity(8);
        hist.add_count(5, 3);
        hist.add_count(2, 3);
        hist.add_count(7, 1);
        assert_eq!(hist.mode(), 2);

        hist.add(5);
        assert_eq!(hist.mode(), 5);
    }

    #[rstest]
    fn test_add_invalidates_summary(sparse: HistogramStatistics) {
        let mut hist = sparse;
        assert_eq!(hist.number_of_objects(), 3);

        hist.add_count(3, 4);
        assert_eq!(hist.number_of_objects(), 7);
        assert_eq!(hist.mode(), 3);
    }
}
