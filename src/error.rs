//! Error types for the curve and the IP-space layout.

use std::net::Ipv4Addr;

/// Errors raised by [`HilbertCurve`](crate::HilbertCurve) at the call boundary.
///
/// These indicate a bug in the caller, not a transient condition.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[non_exhaustive]
#[expect(
    variant_size_differences,
    reason = "out-of-range reports carry full-width values, the other variants a single word"
)]
pub enum HilbertError {
    /// Grid order is zero, not a power of two, or above `2^32`.
    #[error("invalid order {0}: must be a power of two between 1 and 2^32")]
    InvalidOrder(u64),

    /// A distance or coordinate lies outside `[0, limit)`.
    #[error("{what} {value} out of range [0, {limit})")]
    OutOfRange {
        /// Which argument was rejected: `distance`, `x` or `y`
        what: &'static str,
        /// The rejected value, signed so negative float inputs keep their sign
        value: i128,
        /// Exclusive upper bound
        limit: u128,
    },

    /// A floating point argument was NaN, infinite or fractional.
    #[error("non-integer input {0}")]
    NonIntegerInput(f64),
}

/// Errors raised by [`IpSpace`](crate::IpSpace), [`Ipv4Cidr`](crate::Ipv4Cidr)
/// and [`PoolTree`](crate::PoolTree).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum IpSpaceError {
    /// Text that is not `a.b.c.d/p`.
    #[error("invalid CIDR {0:?}")]
    InvalidCidr(String),

    /// Prefix length above 32.
    #[error("prefix length {0} exceeds 32")]
    InvalidPrefix(u8),

    /// An address that the base network does not contain.
    #[error("address {addr} is outside base network {base}")]
    AddressOutsideBase {
        /// The rejected address
        addr: Ipv4Addr,
        /// The base network, in CIDR notation
        base: String,
    },

    /// A subnet that is not entirely inside the base network.
    #[error("subnet {subnet} is outside base network {base}")]
    SubnetOutsideBase {
        /// The rejected subnet, in CIDR notation
        subnet: String,
        /// The base network, in CIDR notation
        base: String,
    },

    /// Display size of zero pixels.
    #[error("display size must be positive")]
    InvalidDisplaySize,

    /// Zoom to fit over no subnets.
    #[error("no subnets to fit")]
    EmptySelection,

    /// Rejected by the underlying curve.
    #[error(transparent)]
    Curve(#[from] HilbertError),
}
