//! Reconstruction facade: validation, decoding, subset selection and
//! cross-validation on top of [`lagrange`](crate::lagrange).

use std::collections::{BTreeMap, HashSet};

use crate::error::{Candidate, Degeneracy, ReconstructionError, Result};
use crate::lagrange::{into_secret, lagrange_terms, sum_terms, LagrangeTerm};
use crate::observer::{NoopObserver, ReconstructionObserver};
use crate::rational::Rational;
use crate::share::{Point, Share, ShareSet};
use num_bigint::BigInt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Upper bound on the number of k-subsets cross-validation evaluates by default.
pub const DEFAULT_MAX_SUBSETS: usize = 1024;

/// Which k of the n shares get interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Interpolate the first k shares in the order supplied.
    #[default]
    FirstK,
    /// Interpolate many k-subsets and require them to agree.
    CrossValidate,
}

/// Engine settings.
///
/// # Example
/// ```
/// use shamir_recover::{Policy, ReconstructionConfig};
///
/// let config = ReconstructionConfig::new()
///     .with_policy(Policy::CrossValidate)
///     .with_max_subsets(64)
///     .with_seed(7);
/// assert_eq!(config.max_subsets, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionConfig {
    pub policy: Policy,
    /// Cross-validation enumerates every k-subset when there are at most this
    /// many, and samples this many otherwise.
    pub max_subsets: usize,
    /// Seed for subset sampling; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        ReconstructionConfig {
            policy: Policy::FirstK,
            max_subsets: DEFAULT_MAX_SUBSETS,
            seed: None,
        }
    }
}

impl ReconstructionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_max_subsets(mut self, max_subsets: usize) -> Self {
        self.max_subsets = max_subsets.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Recovers secrets from share sets according to a [`ReconstructionConfig`].
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use shamir_recover::{ReconstructionEngine, Share};
///
/// let shares = vec![
///     Share::new(1, 10, "4"),
///     Share::new(2, 2, "111"),
///     Share::new(3, 10, "12"),
/// ];
/// let secret = ReconstructionEngine::new().reconstruct(&shares, 3).unwrap();
/// assert_eq!(secret, BigInt::from(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReconstructionEngine {
    config: ReconstructionConfig,
}

/// A subset's terms and its exact value at zero.
type Evaluation = (Vec<LagrangeTerm>, Rational);

impl ReconstructionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReconstructionConfig) -> Self {
        ReconstructionEngine { config }
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    pub fn reconstruct(&self, shares: &[Share], k: usize) -> Result<BigInt> {
        self.reconstruct_with_observer(shares, k, &mut NoopObserver)
    }

    pub fn reconstruct_set(&self, set: &ShareSet) -> Result<BigInt> {
        self.reconstruct(&set.shares, set.threshold)
    }

    /// Validate, decode every share, then interpolate per the configured policy.
    ///
    /// # Errors
    /// * [`ReconstructionError::DegenerateInput`] if `k < 2`, `k > shares.len()`,
    ///   an index is 0, or two shares share an index; checked before decoding
    /// * decoding errors of the first malformed share
    /// * [`ReconstructionError::NonIntegerSecret`] or
    ///   [`ReconstructionError::InconsistentShares`] from interpolation
    pub fn reconstruct_with_observer(
        &self,
        shares: &[Share],
        k: usize,
        observer: &mut dyn ReconstructionObserver,
    ) -> Result<BigInt> {
        let xs: Vec<i64> = shares.iter().map(|s| i64::from(s.index)).collect();
        validate(&xs, k)?;

        let mut points = Vec::with_capacity(shares.len());
        for share in shares {
            let point = share.decode()?;
            observer.share_decoded(share, &point);
            points.push(point);
        }
        self.interpolate(&points, k, observer)
    }

    /// Same as [`reconstruct`](Self::reconstruct) for already decoded points.
    pub fn reconstruct_points(&self, points: &[Point], k: usize) -> Result<BigInt> {
        let xs: Vec<i64> = points.iter().map(|p| p.x).collect();
        validate(&xs, k)?;
        self.interpolate(points, k, &mut NoopObserver)
    }

    fn interpolate(
        &self,
        points: &[Point],
        k: usize,
        observer: &mut dyn ReconstructionObserver,
    ) -> Result<BigInt> {
        match self.config.policy {
            Policy::FirstK => {
                let subset = &points[..k];
                let evaluation = evaluate(subset)?;
                report(observer, subset, &evaluation);
                into_secret(evaluation.1)
            }
            Policy::CrossValidate => self.cross_validate(points, k, observer),
        }
    }

    fn cross_validate(
        &self,
        points: &[Point],
        k: usize,
        observer: &mut dyn ReconstructionObserver,
    ) -> Result<BigInt> {
        let subsets = self.select_subsets(points.len(), k);
        let gather = |subset: &Vec<usize>| -> Vec<Point> {
            subset.iter().map(|&i| points[i].clone()).collect()
        };

        #[cfg(feature = "parallel")]
        let evaluations: Vec<(Vec<Point>, Result<Evaluation>)> = subsets
            .par_iter()
            .map(|s| {
                let chosen = gather(s);
                let evaluation = evaluate(&chosen);
                (chosen, evaluation)
            })
            .collect();
        #[cfg(not(feature = "parallel"))]
        let evaluations: Vec<(Vec<Point>, Result<Evaluation>)> = subsets
            .iter()
            .map(|s| {
                let chosen = gather(s);
                let evaluation = evaluate(&chosen);
                (chosen, evaluation)
            })
            .collect();

        let mut tally: BTreeMap<Rational, usize> = BTreeMap::new();
        for (chosen, evaluation) in evaluations {
            let evaluation = evaluation?;
            report(observer, &chosen, &evaluation);
            *tally.entry(evaluation.1).or_insert(0) += 1;
        }

        if tally.len() == 1 {
            if let Some((value, _)) = tally.pop_first() {
                return into_secret(value);
            }
        }
        let mut candidates: Vec<Candidate> = tally
            .into_iter()
            .map(|(value, subsets)| Candidate { value, subsets })
            .collect();
        // BTreeMap order already sorts by value; the stable sort keeps it within ties
        candidates.sort_by(|a, b| b.subsets.cmp(&a.subsets));
        Err(ReconstructionError::InconsistentShares { candidates })
    }

    /// Index sets to cross-validate: all of them in lexicographic order if
    /// there are few enough, else the first k plus distinct random samples.
    fn select_subsets(&self, n: usize, k: usize) -> Vec<Vec<usize>> {
        let cap = self.config.max_subsets.max(1);
        match binomial_capped(n, k, cap) {
            Some(_) => combinations(n, k),
            None => {
                let mut rng = match self.config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_rng(&mut rand::rng()),
                };
                sample_subsets(n, k, cap, &mut rng)
            }
        }
    }
}

/// Reconstruct with a default engine using `policy`.
pub fn reconstruct(shares: &[Share], k: usize, policy: Policy) -> Result<BigInt> {
    ReconstructionEngine::with_config(ReconstructionConfig::new().with_policy(policy))
        .reconstruct(shares, k)
}

fn validate(xs: &[i64], k: usize) -> Result<()> {
    if k < 2 {
        return Err(Degeneracy::ThresholdTooSmall { threshold: k }.into());
    }
    if k > xs.len() {
        return Err(Degeneracy::ThresholdExceedsShares {
            threshold: k,
            available: xs.len(),
        }
        .into());
    }
    let mut seen = HashSet::with_capacity(xs.len());
    for &x in xs {
        if x == 0 {
            return Err(Degeneracy::ZeroIndex.into());
        }
        if !seen.insert(x) {
            return Err(Degeneracy::DuplicateIndex { index: x }.into());
        }
    }
    Ok(())
}

fn evaluate(points: &[Point]) -> Result<Evaluation> {
    let terms = lagrange_terms(points)?;
    let value = sum_terms(&terms);
    Ok((terms, value))
}

fn report(observer: &mut dyn ReconstructionObserver, points: &[Point], evaluation: &Evaluation) {
    let xs: Vec<i64> = points.iter().map(|p| p.x).collect();
    observer.subset_selected(&xs);
    for term in &evaluation.0 {
        observer.lagrange_term(term);
    }
    observer.subset_evaluated(&xs, &evaluation.1);
}

/// C(n, k) if it does not exceed `cap`.
fn binomial_capped(n: usize, k: usize, cap: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut c: u128 = 1;
    for i in 0..k {
        // C(n, i+1) = C(n, i) * (n-i) / (i+1), exact at every step
        c = c * (n - i) as u128 / (i + 1) as u128;
        if c > cap as u128 {
            return None;
        }
    }
    Some(c as usize)
}

/// All k-element index sets of 0..n in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let mut i = k;
        while i > 0 && idx[i - 1] == n - k + i - 1 {
            i -= 1;
        }
        if i == 0 {
            break;
        }
        idx[i - 1] += 1;
        for j in i..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
    out
}

/// `count` distinct sorted k-subsets of 0..n, starting with the first k.
/// The caller guarantees C(n, k) > count.
fn sample_subsets<R: Rng + ?Sized>(n: usize, k: usize, count: usize, rng: &mut R) -> Vec<Vec<usize>> {
    if binomial_capped(n, k, count.saturating_mul(2)).is_some() {
        // dense: keep a random count - 1 of the remaining subsets instead of
        // drawing until the duplicates stop
        let mut out = combinations(n, k);
        let rest = out.split_off(1);
        let mut keep = rand::seq::index::sample(rng, rest.len(), count - 1).into_vec();
        keep.sort_unstable();
        out.extend(keep.into_iter().map(|i| rest[i].clone()));
        return out;
    }

    let first: Vec<usize> = (0..k).collect();
    let mut seen = HashSet::with_capacity(count);
    seen.insert(first.clone());
    let mut out = vec![first];
    while out.len() < count {
        let mut subset = rand::seq::index::sample(rng, n, k).into_vec();
        subset.sort_unstable();
        if seen.insert(subset.clone()) {
            out.push(subset);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Poly;
    use crate::radix::encode;

    #[derive(Default)]
    struct Recorder {
        decoded: Vec<i64>,
        subsets: Vec<Vec<i64>>,
        terms: usize,
        values: Vec<Rational>,
    }

    impl ReconstructionObserver for Recorder {
        fn share_decoded(&mut self, _share: &Share, point: &Point) {
            self.decoded.push(point.x);
        }
        fn subset_selected(&mut self, xs: &[i64]) {
            self.subsets.push(xs.to_vec());
        }
        fn lagrange_term(&mut self, _term: &LagrangeTerm) {
            self.terms += 1;
        }
        fn subset_evaluated(&mut self, _xs: &[i64], value: &Rational) {
            self.values.push(value.clone());
        }
    }

    fn shares_of(poly: &Poly, xs: &[u32], radix: u32) -> Vec<Share> {
        xs.iter()
            .map(|&x| {
                let y = poly.eval(&BigInt::from(x));
                Share::new(x, radix, encode(&y, radix).unwrap())
            })
            .collect()
    }

    fn cubic() -> Poly {
        // 1234 + 166x + 94x^2 + 5x^3, non-negative on positive x
        Poly::from_coeffs(vec![
            BigInt::from(1234),
            BigInt::from(166),
            BigInt::from(94),
            BigInt::from(5),
        ])
    }

    fn cross_validating() -> ReconstructionEngine {
        ReconstructionEngine::with_config(
            ReconstructionConfig::new().with_policy(Policy::CrossValidate),
        )
    }

    #[test]
    fn first_k_uses_leading_shares_only() {
        let mut shares = shares_of(&cubic(), &[1, 2, 3, 4, 5], 7);
        // corrupt a share past the threshold; first-k never looks at it
        shares[4].digits = "1".to_string();
        assert_eq!(
            reconstruct(&shares, 4, Policy::FirstK),
            Ok(BigInt::from(1234))
        );
    }

    #[test]
    fn cross_validate_accepts_consistent_shares() {
        let shares = shares_of(&cubic(), &[1, 2, 3, 4, 5, 6], 16);
        let mut recorder = Recorder::default();
        let secret = cross_validating()
            .reconstruct_with_observer(&shares, 4, &mut recorder)
            .unwrap();
        assert_eq!(secret, BigInt::from(1234));
        assert_eq!(recorder.subsets.len(), 15); // C(6, 4)
        assert_eq!(recorder.subsets[0], vec![1, 2, 3, 4]);
        assert_eq!(recorder.subsets[14], vec![3, 4, 5, 6]);
        assert_eq!(recorder.terms, 15 * 4);
    }

    #[test]
    fn cross_validate_reports_disagreeing_candidates() {
        let mut shares = shares_of(&cubic(), &[1, 2, 3, 4, 5], 10);
        shares[4].digits = "99999".to_string();
        let err = cross_validating().reconstruct(&shares, 4).unwrap_err();
        match err {
            ReconstructionError::InconsistentShares { candidates } => {
                // only the subset avoiding share 5 is clean
                assert_eq!(candidates.iter().map(|c| c.subsets).sum::<usize>(), 5);
                assert!(candidates
                    .iter()
                    .any(|c| c.value == Rational::from(1234) && c.subsets == 1));
                assert!(candidates.windows(2).all(|w| w[0].subsets >= w[1].subsets));
            }
            other => panic!("expected InconsistentShares, got {other:?}"),
        }
    }

    #[test]
    fn cross_validate_samples_large_share_sets() {
        let xs: Vec<u32> = (1..=12).collect();
        let mut shares = shares_of(&cubic(), &xs, 36);
        let engine = ReconstructionEngine::with_config(
            ReconstructionConfig::new()
                .with_policy(Policy::CrossValidate)
                .with_max_subsets(40)
                .with_seed(42),
        );

        let mut recorder = Recorder::default();
        let secret = engine
            .reconstruct_with_observer(&shares, 4, &mut recorder)
            .unwrap();
        assert_eq!(secret, BigInt::from(1234));
        assert_eq!(recorder.subsets.len(), 40); // C(12, 4) = 495 > 40
        assert_eq!(recorder.subsets[0], vec![1, 2, 3, 4]);
        let distinct: HashSet<_> = recorder.subsets.iter().collect();
        assert_eq!(distinct.len(), 40);

        // the first subset alone catches a corrupted leading share
        shares[0].digits = "zz".to_string();
        assert!(matches!(
            engine.reconstruct(&shares, 4),
            Err(ReconstructionError::InconsistentShares { .. })
        ));
    }

    #[test]
    fn seeded_sampling_is_deterministic() {
        let engine = ReconstructionEngine::with_config(
            ReconstructionConfig::new()
                .with_policy(Policy::CrossValidate)
                .with_max_subsets(10)
                .with_seed(9),
        );
        assert_eq!(engine.select_subsets(20, 5), engine.select_subsets(20, 5));
    }

    #[test]
    fn cross_validate_agreeing_on_fraction_is_non_integer() {
        let points = vec![
            Point::new(1, BigInt::from(1)),
            Point::new(3, BigInt::from(2)),
        ];
        assert!(matches!(
            cross_validating().reconstruct_points(&points, 2),
            Err(ReconstructionError::NonIntegerSecret { .. })
        ));
    }

    #[test]
    fn validation_runs_before_decoding() {
        let shares = vec![
            Share::new(1, 10, "not a number"),
            Share::new(1, 10, "5"),
            Share::new(2, 10, "7"),
        ];
        assert_eq!(
            reconstruct(&shares, 2, Policy::FirstK),
            Err(Degeneracy::DuplicateIndex { index: 1 }.into())
        );
    }

    #[test]
    fn threshold_bounds() {
        let shares = shares_of(&cubic(), &[1, 2, 3], 10);
        assert_eq!(
            reconstruct(&shares, 1, Policy::FirstK),
            Err(Degeneracy::ThresholdTooSmall { threshold: 1 }.into())
        );
        assert_eq!(
            reconstruct(&shares, 4, Policy::FirstK),
            Err(Degeneracy::ThresholdExceedsShares {
                threshold: 4,
                available: 3
            }
            .into())
        );
    }

    #[test]
    fn zero_index_is_rejected() {
        let shares = vec![Share::new(0, 10, "5"), Share::new(1, 10, "7")];
        assert_eq!(
            reconstruct(&shares, 2, Policy::FirstK),
            Err(Degeneracy::ZeroIndex.into())
        );
    }

    #[test]
    fn invalid_digit_aborts_reconstruction() {
        let shares = vec![
            Share::new(1, 10, "4"),
            Share::new(2, 2, "121"),
            Share::new(3, 10, "12"),
        ];
        assert_eq!(
            reconstruct(&shares, 3, Policy::FirstK),
            Err(ReconstructionError::InvalidDigit {
                digit: '2',
                position: 1,
                radix: 2
            })
        );
    }

    #[test]
    fn observer_sees_every_decoded_share() {
        let shares = shares_of(&cubic(), &[4, 2, 9, 7], 8);
        let mut recorder = Recorder::default();
        ReconstructionEngine::new()
            .reconstruct_with_observer(&shares, 4, &mut recorder)
            .unwrap();
        assert_eq!(recorder.decoded, vec![4, 2, 9, 7]);
        assert_eq!(recorder.subsets, vec![vec![4, 2, 9, 7]]);
        assert_eq!(recorder.values, vec![Rational::from(1234)]);
    }

    #[test]
    fn binomial_and_combinations_agree() {
        assert_eq!(binomial_capped(6, 4, 1000), Some(15));
        assert_eq!(binomial_capped(10, 7, 1000), Some(120));
        assert_eq!(binomial_capped(12, 4, 100), None);
        assert_eq!(binomial_capped(200, 100, usize::MAX), None);
        assert_eq!(combinations(6, 4).len(), 15);
        assert_eq!(combinations(4, 4), vec![vec![0, 1, 2, 3]]);
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn sampling_just_below_the_subset_count() {
        let all = combinations(10, 7);
        let mut rng = StdRng::seed_from_u64(5);
        for count in [119, 61, 60, 2, 1] {
            let sampled = sample_subsets(10, 7, count, &mut rng);
            assert_eq!(sampled.len(), count);
            assert_eq!(sampled[0], vec![0, 1, 2, 3, 4, 5, 6]);
            let distinct: HashSet<&Vec<usize>> = sampled.iter().collect();
            assert_eq!(distinct.len(), count);
            assert!(sampled.iter().all(|s| all.contains(s)));
        }

        let engine = ReconstructionEngine::with_config(
            ReconstructionConfig::new()
                .with_policy(Policy::CrossValidate)
                .with_max_subsets(119),
        );
        let shares = shares_of(&cubic(), &(1..=10).collect::<Vec<u32>>(), 16);
        assert_eq!(engine.reconstruct(&shares, 7), Ok(BigInt::from(1234)));
    }

    #[test]
    fn config_builder() {
        let config = ReconstructionConfig::new().with_max_subsets(0);
        assert_eq!(config.max_subsets, 1);
        assert_eq!(config.policy, Policy::FirstK);
        assert_eq!(config.seed, None);
        let engine = ReconstructionEngine::with_config(config.clone().with_seed(3));
        assert_eq!(engine.config().seed, Some(3));
    }
}
