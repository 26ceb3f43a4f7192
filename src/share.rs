use crate::error::Result;
use crate::radix;
use num_bigint::BigInt;

/// One participant's share: an index and its value written in `radix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// x-coordinate of the share (1-based, unique within a set)
    pub index: u32,
    /// Radix the digits are written in
    pub radix: u32,
    /// Digit string of the polynomial value at `index`
    pub digits: String,
}

impl Share {
    pub fn new(index: u32, radix: u32, digits: impl Into<String>) -> Self {
        Share {
            index,
            radix,
            digits: digits.into(),
        }
    }

    /// Decode the digit string into a point on the polynomial.
    pub fn decode(&self) -> Result<Point> {
        let y = radix::decode(&self.digits, self.radix)?;
        Ok(Point::new(i64::from(self.index), y))
    }
}

/// A decoded share `(x, f(x))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: BigInt,
}

impl Point {
    pub fn new(x: i64, y: BigInt) -> Self {
        Point { x, y }
    }
}

/// Shares available for one reconstruction together with the threshold k.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSet {
    pub threshold: usize,
    pub shares: Vec<Share>,
}

impl ShareSet {
    pub fn new(threshold: usize, shares: Vec<Share>) -> Self {
        ShareSet { threshold, shares }
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}
