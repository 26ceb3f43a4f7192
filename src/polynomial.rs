use crate::share::Point;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use rand::RngCore;

/// A polynomial f(x) = a0 + a1*x + ... + a_{t-1}*x^{t-1} with integer coefficients.
///
/// Only evaluation lives here; it is what fixtures and property tests use to
/// produce points with a known constant term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    /// Coefficients a0, a1, ..., a_{t-1}
    pub coeffs: Vec<BigInt>,
}

impl Poly {
    /// Construct a polynomial from explicit coefficients.
    pub fn from_coeffs(coeffs: Vec<BigInt>) -> Self {
        Poly { coeffs }
    }

    /// Degree of the polynomial (t-1 if threshold is t).
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Threshold (number of coefficients).
    pub fn threshold(&self) -> usize {
        self.coeffs.len()
    }

    /// The value at zero, a0, or `None` for a polynomial with no coefficients.
    pub fn constant_term(&self) -> Option<&BigInt> {
        self.coeffs.first()
    }

    /// Random polynomial of threshold t with signed 256-bit coefficients.
    /// Samples 32 random bytes plus a sign bit per coefficient.
    pub fn random<R: RngCore>(t: usize, rng: &mut R) -> Self {
        let mut coeffs = Vec::with_capacity(t);
        for _ in 0..t {
            let mut buf = [0u8; 32];
            rng.fill_bytes(&mut buf);
            let sign = if rng.next_u32() & 1 == 1 {
                Sign::Minus
            } else {
                Sign::Plus
            };
            coeffs.push(BigInt::from_biguint(sign, BigUint::from_bytes_be(&buf)));
        }
        Poly { coeffs }
    }

    /// Evaluate the polynomial at x using Horner's method.
    pub fn eval(&self, x: &BigInt) -> BigInt {
        let mut result = BigInt::zero();
        for coeff in self.coeffs.iter().rev() {
            result = result * x + coeff;
        }
        result
    }

    /// The points (x, f(x)) for each x in `xs`.
    pub fn points(&self, xs: &[i64]) -> Vec<Point> {
        xs.iter()
            .map(|&x| Point::new(x, self.eval(&BigInt::from(x))))
            .collect()
    }
}
