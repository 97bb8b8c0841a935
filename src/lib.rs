//! # ipspace - Hilbert Curve Layout of IPv4 Space
//!
//! A Rust library for drawing IPv4 address space on a 2D grid using the Hilbert
//! space-filling curve.
//!
//! ## Features
//!
//! - **Hilbert Curve Mapping**: Exact `distance <-> (x, y)` conversion for any power-of-two grid
//! - **Strict Inputs**: Out-of-range or fractional arguments are rejected, never wrapped
//! - **Subnet Placement**: Aligned subnets map to squares (even host bits) or 1:2 rectangles (odd)
//! - **Pool Records**: Serde shapes of the pool listing API, ready to lay out
//! - **Utilization**: Pools nest by containment into a tree that reports how much of each is allocated
//!
//! ## Quick Start
//!
//! ```rust
//! use ipspace::prelude::*;
//!
//! // Lay out 10.0.0.0/8 on a 4096x4096 grid
//! let space = IpSpace::new("10.0.0.0/8".parse().unwrap()).unwrap();
//! assert_eq!(space.curve().order(), 4096);
//!
//! // Where is a /24 drawn?
//! let cell = space.cell("10.0.1.0/24".parse().unwrap()).unwrap();
//! assert_eq!((cell.width, cell.height), (16, 16));
//!
//! // The curve itself
//! let curve = HilbertCurve::new(4).unwrap();
//! assert_eq!(curve.decode(3).unwrap(), Point::new(1, 0));
//! assert_eq!(curve.encode(1, 0).unwrap(), 3);
//! ```
//!
//! ## How It Works
//!
//! The offset of an address from the base network address is its distance along
//! the curve. Since the Hilbert curve fills each aligned sub-square completely
//! before moving on, every aligned block of `4^k` addresses lands in one square
//! of side `2^k`, and numerically close networks are drawn close together.

pub mod cidr;
pub mod error;
pub mod hilbert_curve;
pub mod ip_space;
pub mod pool;
pub mod prelude;

pub use cidr::Ipv4Cidr;
pub use error::{HilbertError, IpSpaceError};
pub use hilbert_curve::{HilbertCurve, Point, Points, MAX_ORDER};
pub use ip_space::{Cell, IpSpace, Viewport};
pub use pool::{Pool, PoolId, PoolPage, PoolRef, PoolTree};

mod component_tests_ip_space;
mod integration_test;
