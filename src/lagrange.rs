//! Lagrange interpolation at x = 0 in exact rational arithmetic.

use std::collections::HashSet;

use crate::error::{Degeneracy, ReconstructionError, Result};
use crate::rational::Rational;
use crate::share::Point;
use num_bigint::BigInt;
use num_traits::One;

/// Lagrange coefficient λ_i for index `i` given a set of distinct indices `S`.
///
/// # Formula
/// ```text
/// λ_i = ∏_{j ∈ S, j ≠ i} (0 - j) / (i - j)
/// ```
/// These satisfy ∑_{i ∈ S} λ_i · f(i) = f(0) for any polynomial f of degree
/// below |S|. Numerator and denominator are accumulated as `BigInt` and only
/// combined once, into a reduced [`Rational`].
///
/// # Errors
/// [`ReconstructionError::DegenerateInput`] if `S` repeats an index.
#[allow(non_snake_case)]
pub fn lagrange_coefficient(i: i64, S: &[i64]) -> Result<Rational> {
    check_distinct(S)?;
    Ok(basis_at_zero(i, S))
}

/// Compute all Lagrange coefficients for the set `S`.
/// Returns a vector of (i, λ_i) for each i in S.
#[allow(non_snake_case)]
pub fn lagrange_coefficients(S: &[i64]) -> Result<Vec<(i64, Rational)>> {
    check_distinct(S)?;
    Ok(S.iter().map(|&i| (i, basis_at_zero(i, S))).collect())
}

// S must be free of repeats, otherwise a factor (i - j) is zero or skipped
#[allow(non_snake_case)]
fn basis_at_zero(i: i64, S: &[i64]) -> Rational {
    let x_i = BigInt::from(i);
    // numerator = ∏_{j != i} (-j)
    let mut num = BigInt::one();
    // denominator = ∏_{j != i} (i - j)
    let mut den = BigInt::one();
    for &j in S {
        if j == i {
            continue;
        }
        let x_j = BigInt::from(j);
        num *= -&x_j;
        den *= &x_i - x_j;
    }
    Rational::new(num, den)
}

/// One summand y_i · λ_i of the interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagrangeTerm {
    pub x: i64,
    pub coefficient: Rational,
    pub term: Rational,
}

fn check_points(points: &[Point]) -> Result<()> {
    if points.len() < 2 {
        return Err(Degeneracy::ThresholdTooSmall {
            threshold: points.len(),
        }
        .into());
    }
    let xs: Vec<i64> = points.iter().map(|p| p.x).collect();
    check_distinct(&xs)
}

fn check_distinct(xs: &[i64]) -> Result<()> {
    let mut seen = HashSet::with_capacity(xs.len());
    for &x in xs {
        if !seen.insert(x) {
            return Err(Degeneracy::DuplicateIndex { index: x }.into());
        }
    }
    Ok(())
}

/// Per-point terms y_i · λ_i for the given points.
pub fn lagrange_terms(points: &[Point]) -> Result<Vec<LagrangeTerm>> {
    check_points(points)?;
    let xs: Vec<i64> = points.iter().map(|p| p.x).collect();
    Ok(points
        .iter()
        .map(|p| {
            let coefficient = basis_at_zero(p.x, &xs);
            let term = coefficient.clone() * &p.y;
            LagrangeTerm {
                x: p.x,
                coefficient,
                term,
            }
        })
        .collect())
}

/// Sum of the terms, reduced after every addition.
pub fn sum_terms(terms: &[LagrangeTerm]) -> Rational {
    terms
        .iter()
        .fold(Rational::zero(), |acc, t| acc + &t.term)
}

/// Exact value of the interpolating polynomial at 0, integral or not.
pub fn interpolate_rational_at_zero(points: &[Point]) -> Result<Rational> {
    Ok(sum_terms(&lagrange_terms(points)?))
}

/// Recover f(0) for the polynomial through `points`.
///
/// # Errors
/// * [`ReconstructionError::DegenerateInput`] for fewer than two points or a
///   repeated x-coordinate
/// * [`ReconstructionError::NonIntegerSecret`] when the exact result is not an
///   integer, i.e. the points do not lie on one integer polynomial of degree
///   `points.len() - 1`
pub fn interpolate_at_zero(points: &[Point]) -> Result<BigInt> {
    into_secret(interpolate_rational_at_zero(points)?)
}

pub(crate) fn into_secret(value: Rational) -> Result<BigInt> {
    value
        .to_integer()
        .ok_or(ReconstructionError::NonIntegerSecret { value })
}
