//! Error types returned by decoding, interpolation and reconstruction.

use crate::rational::Rational;
use num_bigint::BigInt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconstructionError>;

/// Everything that can stop a share set from yielding a secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructionError {
    #[error("radix {radix} is outside the supported range 2..=36")]
    InvalidRadix { radix: u32 },

    #[error("share value has no digits")]
    EmptyDigits,

    /// A character is not alphanumeric or its value is not below the radix.
    #[error("invalid digit {digit:?} at position {position} for radix {radix}")]
    InvalidDigit {
        digit: char,
        position: usize,
        radix: u32,
    },

    #[error("cannot encode negative value {value}")]
    NegativeValue { value: BigInt },

    #[error("degenerate input: {0}")]
    DegenerateInput(#[from] Degeneracy),

    /// Exact interpolation landed on a non-integral rational.
    #[error("interpolated secret {value} is not an integer")]
    NonIntegerSecret { value: Rational },

    /// Different k-subsets produced different secrets.
    #[error("k-subsets disagree on the secret ({} distinct candidates)", .candidates.len())]
    InconsistentShares { candidates: Vec<Candidate> },
}

/// Structural problems with the share set or threshold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Degeneracy {
    #[error("threshold {threshold} is below the minimum of 2")]
    ThresholdTooSmall { threshold: usize },

    #[error("threshold {threshold} exceeds the {available} available shares")]
    ThresholdExceedsShares { threshold: usize, available: usize },

    #[error("index {index} appears more than once")]
    DuplicateIndex { index: i64 },

    #[error("share index 0 is reserved for the secret")]
    ZeroIndex,
}

/// One value recovered during cross-validation and how many subsets produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: Rational,
    pub subsets: usize,
}

/// Failure of [`divide_exact`](crate::rational::divide_exact).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DivisionError {
    #[error("division by zero")]
    ByZero,

    #[error("inexact division, remainder {remainder}")]
    Inexact { remainder: BigInt },
}
