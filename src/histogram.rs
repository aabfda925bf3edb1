//! Power-of-two-bucketed latency histogram.
//!
//! Records nanosecond samples into 64 logarithmic buckets and answers
//! percentile queries by scanning cumulative counts. Memory use is
//! constant regardless of sample count, which lets the consumer record
//! one sample per message at multi-million-messages-per-second rates
//! without allocating.
//!
//! Percentiles are approximate by construction: a query returns the
//! *upper bound* of the bucket containing the requested rank, i.e. the
//! next power of two above every sample in that bucket.

/// Number of buckets. Bucket `i` covers samples in `[2^i, 2^(i+1))`,
/// except bucket 0 which also absorbs zero.
pub const BUCKETS: usize = 64;

/// Logarithmic histogram of nanosecond samples.
#[derive(Debug, Clone)]
pub struct Log2Histogram {
    counts: [u64; BUCKETS],
    total: u64,
}

impl Log2Histogram {
    pub fn new() -> Self {
        Self {
            counts: [0; BUCKETS],
            total: 0,
        }
    }

    /// Maps a sample to its bucket index: `floor(log2(ns))`, clamped to
    /// `[0, BUCKETS - 1]`. Zero maps to bucket 0.
    #[inline(always)]
    fn bucket(ns: u64) -> usize {
        if ns == 0 {
            return 0;
        }
        (ns.ilog2() as usize).min(BUCKETS - 1)
    }

    /// Records one sample.
    #[inline(always)]
    pub fn record(&mut self, ns: u64) {
        self.counts[Self::bucket(ns)] += 1;
        self.total += 1;
    }

    /// Total number of recorded samples.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns an upper bound on the value at percentile `p` (in `0.0..=1.0`).
    ///
    /// Scans buckets in order, accumulating counts until the cumulative
    /// count reaches `p * total` (at least one sample), and returns
    /// `2^(i+1)` for the bucket found there. Buckets 62 and 63 have no
    /// representable upper bound and report `u64::MAX`.
    ///
    /// Returns 0 when no samples have been recorded.
    pub fn percentile(&self, p: f64) -> u64 {
        if self.total == 0 {
            return 0;
        }
        let mut target = (p * self.total as f64) as u64;
        if target == 0 {
            target = 1;
        }

        let mut cumulative = 0u64;
        for (i, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                return if i >= 62 { u64::MAX } else { 1u64 << (i + 1) };
            }
        }
        u64::MAX
    }
}

impl Default for Log2Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram_reports_zero() {
        let hist = Log2Histogram::new();
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.percentile(0.5), 0);
        assert_eq!(hist.percentile(1.0), 0);
    }

    #[test]
    fn zero_sample_lands_in_bucket_zero() {
        let mut hist = Log2Histogram::new();
        hist.record(0);
        assert_eq!(hist.total(), 1);
        // Bucket 0's upper bound is 2^1.
        assert_eq!(hist.percentile(1.0), 2);
    }

    #[test]
    fn powers_of_two_hit_expected_buckets() {
        // Samples 1, 2, 4, ..., 128 occupy buckets 0..=7, one each.
        let mut hist = Log2Histogram::new();
        for i in 0..8u32 {
            hist.record(1u64 << i);
        }
        assert_eq!(hist.total(), 8);

        // The median falls in bucket 3 (sample 8); upper bound 2^4.
        assert_eq!(hist.percentile(0.5), 16);
        // The full distribution is bounded by bucket 7's upper bound 2^8.
        assert_eq!(hist.percentile(1.0), 256);
    }

    #[test]
    fn percentiles_are_monotonic() {
        let mut hist = Log2Histogram::new();
        for ns in [3u64, 17, 90, 333, 1024, 5000, 70_000, 70_000, 1_000_000] {
            hist.record(ns);
        }

        let ps = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99, 0.999, 1.0];
        for pair in ps.windows(2) {
            assert!(
                hist.percentile(pair[0]) <= hist.percentile(pair[1]),
                "percentile({}) > percentile({})",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn every_sample_is_bounded_by_top_percentile() {
        let samples = [1u64, 7, 42, 900, 12_345, 987_654];
        let mut hist = Log2Histogram::new();
        for &ns in &samples {
            hist.record(ns);
        }
        let bound = hist.percentile(1.0);
        for &ns in &samples {
            assert!(ns <= bound, "sample {} above percentile(1.0)={}", ns, bound);
        }
    }

    #[test]
    fn top_buckets_report_unbounded() {
        let mut hist = Log2Histogram::new();
        hist.record(u64::MAX);
        assert_eq!(hist.percentile(1.0), u64::MAX);
    }
}
