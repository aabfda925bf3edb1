/// Returns the monotonic clock reading in nanoseconds.
///
/// Producer and consumer both sample this clock, so enqueue-to-dequeue
/// latency is the plain difference of two readings. `CLOCK_MONOTONIC`
/// ticks in nanoseconds already, so no tick-to-nanosecond conversion or
/// frequency query is involved.
#[cfg(unix)]
#[inline(always)]
pub fn mono_time_ns() -> u64 {
    use libc::{CLOCK_MONOTONIC, clock_gettime, timespec};
    unsafe {
        let mut ts = timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        clock_gettime(CLOCK_MONOTONIC, &mut ts);
        (ts.tv_sec as u64) * 1_000_000_000 + (ts.tv_nsec as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn mono_time_ns_returns_positive() {
        let t = mono_time_ns();
        assert!(t > 0, "mono_time_ns should return a positive timestamp");
    }

    #[cfg(unix)]
    #[test]
    fn mono_time_ns_is_monotonic_non_decreasing() {
        // Back-to-back readings may be equal on coarse clocks, but must
        // never go backwards.
        let t1 = mono_time_ns();
        let t2 = mono_time_ns();
        assert!(
            t2 >= t1,
            "mono_time_ns should be monotonic: t2={} < t1={}",
            t2,
            t1
        );
    }

    #[cfg(unix)]
    #[test]
    fn mono_time_ns_increases_over_sleep() {
        use std::thread;
        use std::time::Duration;

        let t1 = mono_time_ns();
        thread::sleep(Duration::from_millis(5));
        let t2 = mono_time_ns();

        assert!(
            t2 > t1,
            "mono_time_ns should increase over time: t2={} <= t1={}",
            t2,
            t1
        );
    }
}
