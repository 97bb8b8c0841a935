//! Hilbert curve mapping between curve distance and 2D grid cells.
//!
//! The grid has side `order` (a power of two). Distances run over `[0, order^2)`.
//! Orientation: the curve starts at `(0, 0)` and ends at `(0, order - 1)` for
//! every order of at least 2. The direction of the first step alternates with
//! the parity of the depth, so that a curve of order `2n` continues the curve of
//! order `n` (its first quarter is the smaller curve, transposed).

use serde::{Deserialize, Serialize};

use crate::error::HilbertError;

/// Largest supported order: `2^32` cells per side, `2^64` cells total.
pub const MAX_ORDER: u64 = 1 << 32;
const MAX_DEPTH: u32 = 32;

/// Quadrant index along the curve for `(rx, ry)`, indexed by `2 * ry + rx`.
/// Gray-code order keeps neighbouring quadrants adjacent.
const QUADRANT_INDEX: [u64; 4] = [0, 1, 3, 2];

/// A cell of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// Column, growing rightwards
    pub x: u32,
    /// Row, growing upwards in curve terms
    pub y: u32,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Max of the per-axis distances.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Sum of the per-axis distances. Widened to `u64` since both axes may span `u32`.
    pub fn manhattan_distance(self, other: Self) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Bidirectional Hilbert mapping over a fixed `order x order` grid.
///
/// Holds only the order, so a single value can be shared freely between threads.
///
/// ```
/// use ipspace::{HilbertCurve, Point};
///
/// let curve = HilbertCurve::new(4).unwrap();
/// assert_eq!(curve.decode(2).unwrap(), Point::new(1, 1));
/// assert_eq!(curve.encode(2, 0).unwrap(), 4);
/// assert!(curve.decode(16).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HilbertCurve {
    /// Grid side length
    order: u64,
    /// `log2(order)`
    depth: u32,
}

impl HilbertCurve {
    /// Creates a curve over an `order x order` grid.
    ///
    /// # Errors
    ///
    /// [`HilbertError::InvalidOrder`] unless `order` is a power of two no
    /// larger than [`MAX_ORDER`].
    pub fn new(order: u64) -> Result<Self, HilbertError> {
        if !order.is_power_of_two() || order > MAX_ORDER {
            return Err(HilbertError::InvalidOrder(order));
        }
        Ok(Self {
            order,
            depth: order.trailing_zeros(),
        })
    }

    /// Creates a curve with `2^depth` cells per side.
    ///
    /// # Errors
    ///
    /// [`HilbertError::InvalidOrder`] when `depth` is above 32.
    pub fn with_depth(depth: u32) -> Result<Self, HilbertError> {
        if depth > MAX_DEPTH {
            return Err(HilbertError::InvalidOrder(1_u64.checked_shl(depth).unwrap_or(u64::MAX)));
        }
        Self::new(1_u64 << depth)
    }

    /// Grid side length
    pub const fn order(&self) -> u64 {
        self.order
    }

    /// Number of subdivision levels, `log2(order)`
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Last distance on the curve, `order^2 - 1`
    pub const fn max_distance(&self) -> u64 {
        if self.depth == 0 {
            0
        } else {
            u64::MAX >> (64 - 2 * self.depth)
        }
    }

    /// Number of cells, `order^2`
    pub fn cell_count(&self) -> u128 {
        u128::from(self.max_distance()) + 1
    }

    /// Whether `point` lies inside the grid
    pub fn contains(&self, point: Point) -> bool {
        u64::from(point.x) < self.order && u64::from(point.y) < self.order
    }

    /// Maps a curve distance to its grid cell ("d2xy").
    ///
    /// Works from the innermost 2x2 square outwards: each pair of distance bits
    /// picks a quadrant at scale `s`, the point built so far is rotated into that
    /// quadrant's frame and then offset into it.
    ///
    /// # Errors
    ///
    /// [`HilbertError::OutOfRange`] when `distance` is past [`max_distance`](Self::max_distance).
    pub fn decode(&self, distance: u64) -> Result<Point, HilbertError> {
        if distance > self.max_distance() {
            return Err(HilbertError::OutOfRange {
                what: "distance",
                value: i128::from(distance),
                limit: self.cell_count(),
            });
        }

        let mut remaining = distance;
        let (mut x, mut y) = (0_u32, 0_u32);
        for level in 0..self.depth {
            let s = 1_u32 << level;
            let ry = remaining & 2 != 0;
            let rx = ry ^ (remaining & 1 != 0);
            (x, y) = rotate(s, x, y, rx, ry);
            // x, y < s here, so adding s stays below 2^32
            x += s * u32::from(rx);
            y += s * u32::from(ry);
            remaining >>= 2;
        }
        Ok(Point::new(x, y))
    }

    /// Maps a grid cell to its curve distance ("xy2d"). Inverse of [`decode`](Self::decode).
    ///
    /// # Errors
    ///
    /// [`HilbertError::OutOfRange`] when either coordinate is `>= order`.
    pub fn encode(&self, x: u32, y: u32) -> Result<u64, HilbertError> {
        for (value, what) in [(x, "x"), (y, "y")] {
            if u64::from(value) >= self.order {
                return Err(HilbertError::OutOfRange {
                    what,
                    value: i128::from(value),
                    limit: u128::from(self.order),
                });
            }
        }

        let (mut x, mut y) = (x, y);
        let mut distance = 0_u64;
        for level in (0..self.depth).rev() {
            let s = 1_u32 << level;
            let rx = x & s != 0;
            let ry = y & s != 0;
            distance = (distance << 2) | QUADRANT_INDEX[2 * usize::from(ry) + usize::from(rx)];
            x &= s - 1;
            y &= s - 1;
            (x, y) = rotate(s, x, y, rx, ry);
        }
        Ok(distance)
    }

    /// [`decode`](Self::decode) for a floating point distance.
    ///
    /// Fractional, NaN and infinite values are rejected rather than truncated.
    ///
    /// # Errors
    ///
    /// [`HilbertError::NonIntegerInput`] for a value that is not a whole number,
    /// [`HilbertError::OutOfRange`] for a negative or too-large one.
    pub fn decode_f64(&self, distance: f64) -> Result<Point, HilbertError> {
        let distance: u64 = integral(distance, "distance", self.cell_count())?;
        self.decode(distance)
    }

    /// [`encode`](Self::encode) for floating point coordinates.
    ///
    /// # Errors
    ///
    /// As [`decode_f64`](Self::decode_f64), checked per coordinate against the order.
    pub fn encode_f64(&self, x: f64, y: f64) -> Result<u64, HilbertError> {
        let limit = u128::from(self.order);
        let x: u32 = integral(x, "x", limit)?;
        let y: u32 = integral(y, "y", limit)?;
        self.encode(x, y)
    }

    /// Iterates every cell in curve order.
    pub const fn points(&self) -> Points {
        Points {
            curve: *self,
            next: 0,
            done: false,
        }
    }
}

/// Iterator over the cells of a [`HilbertCurve`] in curve order.
#[derive(Clone, Debug)]
pub struct Points {
    curve: HilbertCurve,
    next: u64,
    done: bool,
}

impl Iterator for Points {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let point = self.curve.decode(self.next).ok()?;
        if self.next == self.curve.max_distance() {
            self.done = true;
        } else {
            self.next += 1;
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let left = self.curve.max_distance() - self.next;
        match usize::try_from(left).ok().and_then(|n| n.checked_add(1)) {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

/// Rotates `(x, y)` within a sub-square of side `s` for quadrant `(rx, ry)`.
///
/// Both coordinates come from the same input pair. The transform is an
/// involution, so encode and decode share it.
#[inline]
const fn rotate(s: u32, x: u32, y: u32, rx: bool, ry: bool) -> (u32, u32) {
    if rx {
        (x, y)
    } else if ry {
        (s - 1 - y, s - 1 - x)
    } else {
        (y, x)
    }
}

/// Checks that `value` is a whole number in `[0, limit)` and narrows it.
fn integral<T: TryFrom<u128>>(value: f64, what: &'static str, limit: u128) -> Result<T, HilbertError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(HilbertError::NonIntegerInput(value));
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to int casts saturate, and anything past i128 is out of range either way"
    )]
    let whole = value as i128;
    u128::try_from(whole)
        .ok()
        .filter(|&unsigned| unsigned < limit)
        .and_then(|unsigned| T::try_from(unsigned).ok())
        .ok_or(HilbertError::OutOfRange {
            what,
            value: whole,
            limit,
        })
}
