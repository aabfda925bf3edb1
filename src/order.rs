//! Fixed-layout order message, the benchmark payload.
//!
//! `OrderMsg` is a packed 40-byte record carried through the ring as a
//! single frame. The layout is `#[repr(C)]` with explicit padding so the
//! byte image is stable and every byte is initialized, which makes the
//! raw-byte view safe to hand to the producer.

/// Order direction. The wire encoding is a single byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy = 1,
    Sell = 2,
}

/// One order message as it travels through the ring.
///
/// Field order and padding match the frame image byte for byte:
///
/// ```text
/// ┌──────────┬─────────┬──────┬─────┬───────┬──────────────┐
/// │ ts_ns u64│ seq u64 │ side │ pad │ qty   │ symbol [u8;16]│
/// │ 8 bytes  │ 8 bytes │ 1    │ 3   │ 4     │ NUL-terminated│
/// └──────────┴─────────┴──────┴─────┴───────┴──────────────┘
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderMsg {
    /// Monotonic timestamp taken immediately before enqueue.
    pub ts_ns: u64,
    /// Monotonic sequence number assigned by the producer.
    pub seq: u64,
    /// Order direction, encoded as [`Side`].
    pub side: u8,
    _pad: [u8; 3],
    /// Number of shares.
    pub qty: u32,
    /// NUL-terminated ticker symbol.
    pub symbol: [u8; 16],
}

/// Size of the wire image of one order message.
pub const ORDER_MSG_BYTES: usize = std::mem::size_of::<OrderMsg>();

const _: () = assert!(std::mem::size_of::<OrderMsg>() == 40);
const _: () = assert!(std::mem::align_of::<OrderMsg>() == 8);

impl OrderMsg {
    /// Builds an order message. `symbol` is truncated to 15 bytes so the
    /// terminating NUL always fits.
    pub fn new(ts_ns: u64, seq: u64, side: Side, qty: u32, symbol: &str) -> Self {
        let mut sym = [0u8; 16];
        let bytes = symbol.as_bytes();
        let n = bytes.len().min(sym.len() - 1);
        sym[..n].copy_from_slice(&bytes[..n]);
        Self {
            ts_ns,
            seq,
            side: side as u8,
            _pad: [0; 3],
            qty,
            symbol: sym,
        }
    }

    /// Raw byte view of the message, suitable for `Producer::write`.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        // Every byte of the struct is initialized (explicit padding field),
        // so viewing it as a byte slice is sound.
        unsafe { std::slice::from_raw_parts(self as *const Self as *const u8, ORDER_MSG_BYTES) }
    }

    /// Reconstructs a message from a received frame.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`ORDER_MSG_BYTES`].
    #[inline(always)]
    pub fn read(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() >= ORDER_MSG_BYTES,
            "order frame too short: {} bytes",
            bytes.len()
        );
        // Unaligned read: the destination buffer has no alignment guarantee.
        unsafe { std::ptr::read_unaligned(bytes.as_ptr() as *const Self) }
    }

    /// The symbol up to its NUL terminator.
    pub fn symbol_str(&self) -> &str {
        let end = self
            .symbol
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.symbol.len());
        std::str::from_utf8(&self.symbol[..end]).unwrap_or("")
    }
}
