//! Exact recovery of Shamir-style secrets over the integers.
//!
//! Share values arrive as digit strings in any radix from 2 to 36, are decoded
//! into [`BigInt`](num_bigint::BigInt)s, and the secret f(0) is recovered by
//! Lagrange interpolation carried out in exact rational arithmetic. A result
//! that is not an integer is reported as an error instead of being truncated.

pub mod engine;
pub mod error;
pub mod ingest;
pub mod lagrange;
pub mod observer;
pub mod polynomial;
pub mod radix;
pub mod rational;
pub mod share;

pub use engine::{reconstruct, Policy, ReconstructionConfig, ReconstructionEngine};
pub use error::{Candidate, Degeneracy, DivisionError, ReconstructionError, Result};
pub use ingest::IngestError;
pub use lagrange::{interpolate_at_zero, LagrangeTerm};
pub use observer::{NoopObserver, ReconstructionObserver};
pub use radix::decode;
pub use rational::Rational;
pub use share::{Point, Share, ShareSet};
