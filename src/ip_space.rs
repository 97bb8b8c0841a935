//! Layout of an IPv4 base network on a Hilbert grid.
//!
//! Each address of the base network is one grid cell: its offset from the
//! network address is the curve distance. Aligned subnets then occupy compact
//! rectangles, which is what the renderer draws.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cidr::Ipv4Cidr;
use crate::error::{HilbertError, IpSpaceError};
use crate::hilbert_curve::{HilbertCurve, Point};
use crate::pool::Pool;

/// Rectangle occupied by a subnet, in grid cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Left edge
    pub x: u32,
    /// Lower edge
    pub y: u32,
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// Prefix length of the subnet drawn here
    pub prefix_len: u8,
    /// Grey shade, darker for smaller subnets (`#rrggbb`)
    pub fill: String,
}

/// Zoom transform that brings a subnet to the top-left of the display.
///
/// `x` and `y` are in display pixels, not grid cells. The transform only lines
/// up with rectangles drawn at display size, i.e. with every [`Cell`] coordinate
/// multiplied by [`IpSpace::display_scale`] before the transform is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Magnification applied after the translation
    pub scale: f64,
    /// Subnet origin in display pixels, before scaling
    pub x: f64,
    /// Subnet origin in display pixels, before scaling
    pub y: f64,
}

impl Viewport {
    /// SVG `transform` attribute value for this viewport.
    pub fn transform(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            shift(self.x, self.scale),
            shift(self.y, self.scale),
            self.scale
        )
    }
}

/// Translation that moves the scaled `origin` to zero.
///
/// Adding `0.0` turns `-0` into `0`, so an origin at zero prints as `0`.
fn shift(origin: f64, scale: f64) -> f64 {
    -(origin * scale) + 0.0
}

/// A base network laid out on a Hilbert grid.
///
/// The grid side is `2^ceil(host_bits / 2)`. With an odd number of host bits the
/// base fills only the first half of the curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IpSpace {
    base: Ipv4Cidr,
    curve: HilbertCurve,
    display_size: u32,
}

impl IpSpace {
    /// Creates a layout of `base`. The display size defaults to one pixel per cell.
    ///
    /// # Errors
    ///
    /// Propagates [`HilbertError`] from building the curve, which cannot fail
    /// for a valid IPv4 network.
    pub fn new(base: Ipv4Cidr) -> Result<Self, IpSpaceError> {
        let curve = HilbertCurve::with_depth(base.host_bits().div_ceil(2))?;
        // depth <= 16 for any IPv4 base
        let display_size = 1_u32 << curve.depth();
        debug!(%base, order = curve.order(), "ip space layout");
        Ok(Self {
            base,
            curve,
            display_size,
        })
    }

    /// Sets the side of the drawing surface in pixels, rounded down to a power of two.
    ///
    /// # Errors
    ///
    /// [`IpSpaceError::InvalidDisplaySize`] for zero pixels.
    pub fn with_display_size(mut self, pixels: u32) -> Result<Self, IpSpaceError> {
        if pixels == 0 {
            return Err(IpSpaceError::InvalidDisplaySize);
        }
        self.display_size = 1_u32 << (31 - pixels.leading_zeros());
        debug!(pixels, display_size = self.display_size, "display size");
        Ok(self)
    }

    /// Network whose addresses the grid covers
    pub const fn base(&self) -> Ipv4Cidr {
        self.base
    }

    /// Curve the addresses are laid out along
    pub const fn curve(&self) -> &HilbertCurve {
        &self.curve
    }

    /// Side of the drawing surface in pixels
    pub const fn display_size(&self) -> u32 {
        self.display_size
    }

    /// Pixels per grid cell
    pub fn display_scale(&self) -> f64 {
        f64::from(self.display_size) / f64::from(self.side())
    }

    /// Curve distance of `addr`, its offset from the base network address.
    ///
    /// # Errors
    ///
    /// [`IpSpaceError::AddressOutsideBase`] when the base does not contain `addr`.
    pub fn distance_of(&self, addr: Ipv4Addr) -> Result<u64, IpSpaceError> {
        if !self.base.contains_addr(addr) {
            return Err(IpSpaceError::AddressOutsideBase {
                addr,
                base: self.base.to_string(),
            });
        }
        Ok(u64::from(u32::from(addr) - self.base.first()))
    }

    /// Grid cell of a single address.
    ///
    /// # Errors
    ///
    /// As [`distance_of`](Self::distance_of).
    pub fn locate(&self, addr: Ipv4Addr) -> Result<Point, IpSpaceError> {
        Ok(self.curve.decode(self.distance_of(addr)?)?)
    }

    /// Address shown at grid cell `point`.
    ///
    /// # Errors
    ///
    /// [`HilbertError::OutOfRange`] for a point off the grid, or on the unused
    /// half of the grid of a base with an odd number of host bits.
    pub fn address_at(&self, point: Point) -> Result<Ipv4Addr, IpSpaceError> {
        let distance = self.curve.encode(point.x, point.y)?;
        match u32::try_from(distance) {
            Ok(offset) if distance < self.base.size() => Ok(Ipv4Addr::from(self.base.first() + offset)),
            _ => Err(HilbertError::OutOfRange {
                what: "distance",
                value: i128::from(distance),
                limit: u128::from(self.base.size()),
            }
            .into()),
        }
    }

    /// Curve distances covered by `subnet`.
    ///
    /// # Errors
    ///
    /// [`IpSpaceError::SubnetOutsideBase`] unless `subnet` lies inside the base.
    pub fn range(&self, subnet: Ipv4Cidr) -> Result<RangeInclusive<u64>, IpSpaceError> {
        self.check_inside(subnet)?;
        let start = u64::from(subnet.first() - self.base.first());
        Ok(start..=start + subnet.size() - 1)
    }

    /// Rectangle covered by `subnet`.
    ///
    /// A block of `4^k` aligned addresses is a square of side `2^k`. A block of
    /// `2 * 4^k` is two such squares that are adjacent on the curve, so the
    /// rectangle is their bounding box.
    ///
    /// # Errors
    ///
    /// As [`range`](Self::range).
    pub fn cell(&self, subnet: Ipv4Cidr) -> Result<Cell, IpSpaceError> {
        let start = *self.range(subnet)?.start();
        let host_bits = subnet.host_bits();
        let side = 1_u32 << (host_bits / 2);

        let first = self.square_origin(start, side)?;
        let (x, y, width, height) = if host_bits % 2 == 0 {
            (first.x, first.y, side, side)
        } else {
            let second = self.square_origin(start + u64::from(side).pow(2), side)?;
            (
                first.x.min(second.x),
                first.y.min(second.y),
                first.x.abs_diff(second.x) + side,
                first.y.abs_diff(second.y) + side,
            )
        };

        trace!(%subnet, x, y, width, height, "cell");
        Ok(Cell {
            x,
            y,
            width,
            height,
            prefix_len: subnet.prefix_len(),
            fill: shade(host_bits),
        })
    }

    /// Cells for every pool inside the base. Pools elsewhere are skipped.
    pub fn cells(&self, pools: &[Pool]) -> Vec<Cell> {
        pools
            .iter()
            .filter_map(|pool| {
                let placed = pool.cidr().and_then(|cidr| self.cell(cidr));
                if let Err(err) = &placed {
                    debug!(network = %pool.network, prefix = pool.prefix_length, %err, "pool skipped");
                }
                placed.ok()
            })
            .collect()
    }

    /// Zoom transform that fills the display with `subnet`.
    ///
    /// The offsets are in display pixels; see [`Viewport`].
    ///
    /// # Errors
    ///
    /// As [`range`](Self::range).
    pub fn viewport(&self, subnet: Ipv4Cidr) -> Result<Viewport, IpSpaceError> {
        let cell = self.cell(subnet)?;
        let scale = f64::from(self.side()) / f64::from(cell.width.max(cell.height));
        let pixels = self.display_scale();
        let viewport = Viewport {
            scale,
            x: f64::from(cell.x) * pixels,
            y: f64::from(cell.y) * pixels,
        };
        debug!(%subnet, scale, "viewport");
        Ok(viewport)
    }

    /// Smallest subnet of the base that shows all of `subnets`.
    ///
    /// # Errors
    ///
    /// [`IpSpaceError::SubnetOutsideBase`] for any subnet outside the base,
    /// [`IpSpaceError::EmptySelection`] for an empty slice.
    pub fn zoom_to_fit(&self, subnets: &[Ipv4Cidr]) -> Result<Ipv4Cidr, IpSpaceError> {
        for &subnet in subnets {
            self.check_inside(subnet)?;
        }
        let fit = Ipv4Cidr::supernet_of(subnets).ok_or(IpSpaceError::EmptySelection)?;
        debug!(count = subnets.len(), %fit, "zoom to fit");
        Ok(fit)
    }

    /// Grid side in cells, at most `2^16` for an IPv4 base.
    const fn side(&self) -> u32 {
        1_u32 << self.curve.depth()
    }

    fn check_inside(&self, subnet: Ipv4Cidr) -> Result<(), IpSpaceError> {
        if self.base.contains(subnet) {
            Ok(())
        } else {
            Err(IpSpaceError::SubnetOutsideBase {
                subnet: subnet.to_string(),
                base: self.base.to_string(),
            })
        }
    }

    /// Lower-left corner of the aligned square of side `side` holding `distance`.
    fn square_origin(&self, distance: u64, side: u32) -> Result<Point, IpSpaceError> {
        let point = self.curve.decode(distance)?;
        let mask = !(side - 1);
        Ok(Point::new(point.x & mask, point.y & mask))
    }
}

fn shade(host_bits: u32) -> String {
    let v = (host_bits * 8).min(255);
    format!("#{v:02x}{v:02x}{v:02x}")
}
