//! Hooks for surfacing intermediate values of a reconstruction.
//!
//! The engine never prints. Hosts that want per-share values, the chosen
//! subsets or the individual Lagrange terms implement
//! [`ReconstructionObserver`] and pass it to
//! [`ReconstructionEngine::reconstruct_with_observer`](crate::engine::ReconstructionEngine::reconstruct_with_observer).
//! Callbacks always run on the calling thread, in evaluation order.

use crate::lagrange::LagrangeTerm;
use crate::rational::Rational;
use crate::share::{Point, Share};

pub trait ReconstructionObserver {
    fn share_decoded(&mut self, _share: &Share, _point: &Point) {}

    /// x-coordinates of a subset about to be interpolated.
    fn subset_selected(&mut self, _xs: &[i64]) {}

    fn lagrange_term(&mut self, _term: &LagrangeTerm) {}

    /// Exact f(0) of a subset, before the integrality check.
    fn subset_evaluated(&mut self, _xs: &[i64], _value: &Rational) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ReconstructionObserver for NoopObserver {}
