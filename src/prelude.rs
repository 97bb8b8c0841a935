//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use ipspace::prelude::*;
//! ```

pub use crate::{Cell, HilbertCurve, HilbertError, IpSpace, IpSpaceError, Ipv4Cidr, Point, Pool, PoolPage, PoolTree, Viewport};
