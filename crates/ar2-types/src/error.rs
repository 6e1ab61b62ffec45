use ar2_wire::WireError;

use crate::product::Product;

/// Errors raised while reading or validating typed Archive II structures.
///
/// These sit one level above [`WireError`]: a `TypeError` knows which
/// block or message it was reading and which invariant failed, and wraps
/// a `WireError` when the problem is plain truncation.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                                  │
/// │   ├── InvalidWordSize       DWS not 8 or 16             │
/// │   ├── MomentLengthMismatch  raw bytes != NG * DWS / 8   │
/// │   ├── ProductAbsent         recoverable accessor miss   │
/// │   ├── UnknownProduct        selector name not known     │
/// │   ├── TooManyElevationCuts  Message 5 overflows slot    │
/// │   └── Wire(WireError)       truncated buffer            │
/// └─────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// A moment declared a data word size other than 8 or 16 bits.
    #[error("{product} moment has unsupported data word size {word_size} (expected 8 or 16)")]
    InvalidWordSize { product: Product, word_size: u8 },

    /// The raw gate buffer does not hold exactly `NG * DWS / 8` bytes.
    #[error("{product} moment expects {expected} raw bytes, got {actual}")]
    MomentLengthMismatch {
        product: Product,
        expected: usize,
        actual: usize,
    },

    /// The caller asked a radial for a product it does not carry.
    ///
    /// This is not a decode failure: radials of the same volume routinely
    /// carry different product sets (surveillance vs Doppler cuts).
    #[error("product {0} is not present on this radial")]
    ProductAbsent(Product),

    /// The caller named a product the selector does not know.
    #[error("unknown product name {0:?}")]
    UnknownProduct(String),

    /// Message 5 declared more elevation cuts than fit in its slot.
    #[error("volume coverage pattern declares {count} elevation cuts, at most {max} fit")]
    TooManyElevationCuts { count: u16, max: usize },

    #[error(transparent)]
    Wire(#[from] WireError),
}
