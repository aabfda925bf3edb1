//! # SPSC byte-framed ring buffer for low-latency pipelines
//!
//! A lock-free, wait-free **single-producer / single-consumer** queue
//! that moves length-prefixed byte frames through a shared ring at
//! multi-million-messages-per-second rates, plus the benchmark harness
//! that stresses it.
//!
//! # Features
//!
//! * **Wait-free** on both sides: the producer never blocks, the consumer
//!   polls without parking
//! * **Two-counter publish scheme**: a coarse `reserve` hint amortized
//!   over 64 KiB blocks and a per-frame `commit` release store
//! * **In-band wrap markers** instead of splitting frames across the
//!   buffer end
//! * **Cache-friendly** layout (`CachePadded` counters, cache-line-aligned
//!   storage)
//! * Variable-length payloads with a fixed 4-byte header
//! * Zero allocations after construction
//!
//! # Backpressure
//!
//! There is none. The producer assumes the consumer keeps up; if it falls
//! more than one ring capacity behind, the consumer fails fast on an
//! assertion. A stalled consumer on these workloads (market data fan-in,
//! order flow) is a bug, not a condition to absorb silently.
//!
//! # Quick Example
//!
//! ```
//! use frame_ring::channel;
//!
//! let (mut tx, mut rx) = channel(1 << 20);
//!
//! tx.write(b"hello\0");
//!
//! let mut buf = [0u8; 64];
//! let n = rx.try_read(&mut buf);
//! assert_eq!(n, 6);
//! assert_eq!(&buf[..6], b"hello\0");
//! ```
//!
//! # Benchmark harness
//!
//! The `frame-ring-bench` binary pins a producer to CPU 0 and a consumer
//! to CPU 1, pushes order messages through a 1 MiB ring, and reports
//! throughput plus a log2-bucketed latency distribution. See
//! [`bench::BenchConfig`] for the knobs.

#[cfg(not(unix))]
compile_error!("This crate only supports Unix-like operating systems.");

pub mod bench;
pub mod histogram;
pub mod order;
pub mod ring_buffer;
mod utils;

pub use histogram::Log2Histogram;
pub use order::{ORDER_MSG_BYTES, OrderMsg, Side};
pub use ring_buffer::{BLOCK_ALIGN, Consumer, Producer, RESERVE_PUBLISH_BLOCK, channel};
pub use utils::mono_time_ns;
