//! Exact rational arithmetic over `BigInt`.
//!
//! Every value is kept in lowest terms with a strictly positive denominator,
//! so the derived equality and hashing compare normalized forms only.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::DivisionError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: BigInt,
    denom: BigInt,
}

impl Rational {
    /// Build `numer / denom` in lowest terms.
    ///
    /// # Panics
    /// If `denom` is zero.
    pub fn new(numer: BigInt, denom: BigInt) -> Self {
        assert!(!denom.is_zero(), "zero denominator");
        let mut r = Self { numer, denom };
        r.reduce();
        r
    }

    /// Like [`Rational::new`] but returns `None` for a zero denominator.
    pub fn checked_new(numer: BigInt, denom: BigInt) -> Option<Self> {
        if denom.is_zero() {
            return None;
        }
        Some(Self::new(numer, denom))
    }

    pub fn from_integer(value: BigInt) -> Self {
        Self {
            numer: value,
            denom: BigInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(BigInt::zero())
    }

    pub fn one() -> Self {
        Self::from_integer(BigInt::one())
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// The integer value, if the denominator divides the numerator.
    pub fn to_integer(&self) -> Option<BigInt> {
        divide_exact(&self.numer, &self.denom).ok()
    }

    /// Divide out the gcd and move the sign onto the numerator.
    fn reduce(&mut self) {
        if self.numer.is_zero() {
            self.denom = BigInt::one();
            return;
        }
        let g = self.numer.gcd(&self.denom);
        if !g.is_one() {
            self.numer = &self.numer / &g;
            self.denom = &self.denom / &g;
        }
        if self.denom.is_negative() {
            self.numer = -std::mem::take(&mut self.numer);
            self.denom = -std::mem::take(&mut self.denom);
        }
    }
}

/// Quotient of `a / b`, only when `b` divides `a` exactly.
pub fn divide_exact(a: &BigInt, b: &BigInt) -> Result<BigInt, DivisionError> {
    if b.is_zero() {
        return Err(DivisionError::ByZero);
    }
    let (quotient, remainder) = a.div_rem(b);
    if !remainder.is_zero() {
        return Err(DivisionError::Inexact { remainder });
    }
    Ok(quotient)
}

impl From<BigInt> for Rational {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_integer(BigInt::from(value))
    }
}

impl Add<&Rational> for Rational {
    type Output = Self;
    fn add(self, rhs: &Self) -> Self {
        if self.denom == rhs.denom {
            return Rational::new(self.numer + &rhs.numer, self.denom);
        }
        let numer = self.numer * &rhs.denom + &rhs.numer * &self.denom;
        Rational::new(numer, self.denom * &rhs.denom)
    }
}

impl Sub<&Rational> for Rational {
    type Output = Self;
    fn sub(self, rhs: &Self) -> Self {
        let numer = self.numer * &rhs.denom - &rhs.numer * &self.denom;
        Rational::new(numer, self.denom * &rhs.denom)
    }
}

impl Mul<&Rational> for Rational {
    type Output = Self;
    fn mul(self, rhs: &Self) -> Self {
        Rational::new(self.numer * &rhs.numer, self.denom * &rhs.denom)
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;
    fn mul(self, rhs: &Rational) -> Rational {
        Rational::new(&self.numer * &rhs.numer, &self.denom * &rhs.denom)
    }
}

impl Mul<&BigInt> for Rational {
    type Output = Self;
    fn mul(self, rhs: &BigInt) -> Self {
        Rational::new(self.numer * rhs, self.denom)
    }
}

impl Neg for Rational {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive, so cross-multiplying keeps the order
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({})", self)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}
