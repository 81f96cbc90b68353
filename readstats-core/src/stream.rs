//! Online mean and standard deviation.
//!
//! Welford's method (Technometrics, Vol 4, No 3, 1962; also Knuth Vol 2, 3rd Ed., p. 232),
//! extended with an exact inverse so values can be removed again. Pairing `insert` with a
//! delayed `remove` gives sliding-window statistics without keeping the window around.
use num_traits::AsPrimitive;

use crate::consts::MAX_COUNT;
use crate::errors::{Result, StatsError};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Accumulator {
    /// Running sum of squared deviations (M2).
    Accumulating { variance_sum: f64 },
    /// Frozen standard deviation.
    Finalized { stddev: f64 },
}

///
/// Running mean and standard deviation over a stream of insertions and removals.
///
/// Once [`finalize`](OnlineStdDev::finalize) is called the accumulator is frozen: the
/// standard deviation is stored and `variance()` is reported as its square.
///
/// ```
/// use readstats_core::OnlineStdDev;
///
/// let mut sd = OnlineStdDev::new();
/// for v in [2, 4, 4, 4, 5, 5, 7, 9] {
///     sd.insert(v);
/// }
/// assert!((sd.mean() - 5.0).abs() < 1e-12);
/// assert_eq!(sd.size(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnlineStdDev {
    mean: f64,
    count: u32,
    state: Accumulator,
}

impl Default for OnlineStdDev {
    fn default() -> Self {
        Self::new()
    }
}

impl OnlineStdDev {
    pub fn new() -> Self {
        OnlineStdDev {
            mean: 0.0,
            count: 0,
            state: Accumulator::Accumulating { variance_sum: 0.0 },
        }
    }

    ///
    /// Resume accumulation from a saved mean, sum of squared deviations and count.
    ///
    pub fn from_parts(mean: f64, variance_sum: f64, count: u32) -> Result<Self> {
        if count > MAX_COUNT {
            return Err(StatsError::Full);
        }

        Ok(OnlineStdDev {
            mean,
            count,
            state: Accumulator::Accumulating { variance_sum },
        })
    }

    pub fn try_insert<T: AsPrimitive<f64>>(&mut self, value: T) -> Result<()> {
        let Accumulator::Accumulating { variance_sum } = self.state else {
            return Err(StatsError::Finalized { op: "insert" });
        };
        if self.count == MAX_COUNT {
            return Err(StatsError::Full);
        }

        let value: f64 = value.as_();
        let m0 = self.mean;
        let n0 = self.count + 1;

        self.mean = m0 + (value - m0) / n0 as f64;
        self.state = Accumulator::Accumulating {
            variance_sum: variance_sum + (value - m0) * (value - self.mean),
        };
        self.count = n0;

        Ok(())
    }

    pub fn try_remove<T: AsPrimitive<f64>>(&mut self, value: T) -> Result<()> {
        let Accumulator::Accumulating { variance_sum } = self.state else {
            return Err(StatsError::Finalized { op: "remove" });
        };
        if self.count == 0 {
            return Err(StatsError::Empty);
        }

        let value: f64 = value.as_();
        let n0 = self.count - 1;
        let m0 = if n0 == 0 {
            0.0
        } else {
            (self.count as f64 * self.mean - value) / n0 as f64
        };

        self.state = Accumulator::Accumulating {
            variance_sum: variance_sum - (value - m0) * (value - self.mean),
        };
        self.mean = m0;
        self.count = n0;

        Ok(())
    }

    ///
    /// Add a value.
    ///
    /// # Panics
    /// If the accumulator is finalized or already holds [`MAX_COUNT`] values.
    ///
    pub fn insert<T: AsPrimitive<f64>>(&mut self, value: T) {
        if let Err(e) = self.try_insert(value) {
            panic!("{e}");
        }
    }

    ///
    /// Undo a previous `insert` of `value`.
    ///
    /// # Panics
    /// If the accumulator is finalized or empty.
    ///
    pub fn remove<T: AsPrimitive<f64>>(&mut self, value: T) {
        if let Err(e) = self.try_remove(value) {
            panic!("{e}");
        }
    }

    pub fn finalize(&mut self) {
        if let Accumulator::Accumulating { .. } = self.state {
            self.state = Accumulator::Finalized {
                stddev: self.stddev(),
            };
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, Accumulator::Finalized { .. })
    }

    pub fn size(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        match self.state {
            Accumulator::Finalized { stddev } => stddev * stddev,
            Accumulator::Accumulating { .. } if self.count < 2 => 0.0,
            Accumulator::Accumulating { variance_sum } => variance_sum / (self.count - 1) as f64,
        }
    }

    pub fn stddev(&self) -> f64 {
        match self.state {
            Accumulator::Finalized { stddev } => stddev,
            Accumulator::Accumulating { .. } => self.variance().sqrt(),
        }
    }
}
