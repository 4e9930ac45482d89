//! The chaotic heart pair of self-referential sequences.
//!
//! ```text
//! Q(1..=3) = 2, 2, 1    Q(n) = Q(n - Q(n-1)) + Q(n - Q(n-2))
//! a(1..=3) = 1, 1, 2    a(n) = a(a(n-1)) + a(n - a(n-1))
//! ```
//!
//! A recurrence reference that lands outside the already computed prefix
//! `[1, n-1]` contributes 0 instead of failing. Such lookups are counted so
//! callers can tell whether the fallback was ever taken.

use crate::error::SequenceError;

pub const MIN_BOUND: usize = 3;
pub const Q_SEEDS: [u32; 3] = [2, 2, 1];
pub const A_SEEDS: [u32; 3] = [1, 1, 2];

/// Check a bound coming from an untyped source (CLI, config file).
pub fn checked_bound(raw: i64) -> Result<usize, SequenceError> {
    let bound = usize::try_from(raw).map_err(|_| SequenceError::InvalidBound { bound: raw })?;
    validate_bound(bound)?;
    Ok(bound)
}

pub fn validate_bound(bound: usize) -> Result<(), SequenceError> {
    if bound < MIN_BOUND || u32::try_from(bound).is_err() {
        return Err(SequenceError::InvalidBound {
            bound: i64::try_from(bound).unwrap_or(i64::MAX),
        });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct SequenceGenerator {
    bound: usize,
}

impl SequenceGenerator {
    pub fn new(bound: usize) -> Result<Self, SequenceError> {
        validate_bound(bound)?;
        Ok(SequenceGenerator { bound })
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn generate(&self) -> Sequences {
        let (q, q_fallbacks) = fill_q(self.bound);
        let (a, a_fallbacks) = fill_a(self.bound);
        let fallbacks = q_fallbacks + a_fallbacks;

        if fallbacks > 0 {
            tracing::debug!(bound = self.bound, q_fallbacks, a_fallbacks, "out-of-domain lookups replaced by 0");
        }
        tracing::debug!(bound = self.bound, "sequences generated");

        Sequences { q, a, fallbacks }
    }
}

/// Validate `bound` and generate both sequences.
pub fn generate(bound: usize) -> Result<Sequences, SequenceError> {
    Ok(SequenceGenerator::new(bound)?.generate())
}

/// Both sequences for `1..=bound`.
///
/// Storage is 1-based: slot 0 of each vector is never part of a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequences {
    q: Vec<u32>,
    a: Vec<u32>,
    fallbacks: u64,
}

impl Sequences {
    pub fn bound(&self) -> usize {
        self.q.len() - 1
    }

    pub fn len(&self) -> usize {
        self.bound()
    }

    pub fn is_empty(&self) -> bool {
        self.bound() == 0
    }

    /// `Q(n)` for `1 <= n <= bound`.
    pub fn q(&self, n: usize) -> Option<u32> {
        if n == 0 { return None; }
        self.q.get(n).copied()
    }

    /// `a(n)` for `1 <= n <= bound`.
    pub fn a(&self, n: usize) -> Option<u32> {
        if n == 0 { return None; }
        self.a.get(n).copied()
    }

    pub fn q_values(&self) -> &[u32] {
        &self.q[1..]
    }

    pub fn a_values(&self) -> &[u32] {
        &self.a[1..]
    }

    /// Number of recurrence lookups that fell outside `[1, n-1]`.
    pub fn fallback_hits(&self) -> u64 {
        self.fallbacks
    }

    /// `(n, a(n) - Q(n))` for every `n` in `1..=bound`.
    pub fn difference(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.a_values()
            .iter()
            .zip(self.q_values())
            .enumerate()
            .map(|(i, (&a, &q))| (i + 1, i64::from(a) - i64::from(q)))
    }
}

// `Some` only when `idx` points into the computed prefix of term `n`.
fn term_at(terms: &[u32], idx: i64, n: usize) -> Option<u32> {
    let idx = usize::try_from(idx).ok()?;
    if (1..n).contains(&idx) { Some(terms[idx]) } else { None }
}

fn seeded(bound: usize, seeds: [u32; 3]) -> Vec<u32> {
    let mut terms = vec![0u32; bound + 1];
    terms[1..=3].copy_from_slice(&seeds);
    terms
}

fn combine(left: Option<u32>, right: Option<u32>, fallbacks: &mut u64) -> u32 {
    *fallbacks += u64::from(left.is_none()) + u64::from(right.is_none());
    left.unwrap_or(0).saturating_add(right.unwrap_or(0))
}

fn fill_q(bound: usize) -> (Vec<u32>, u64) {
    let mut q = seeded(bound, Q_SEEDS);
    let mut fallbacks = 0;

    for n in 4..=bound {
        let at = n as i64;
        let left = term_at(&q, at - i64::from(q[n - 1]), n);
        let right = term_at(&q, at - i64::from(q[n - 2]), n);
        q[n] = combine(left, right, &mut fallbacks);
    }
    (q, fallbacks)
}

fn fill_a(bound: usize) -> (Vec<u32>, u64) {
    let mut a = seeded(bound, A_SEEDS);
    let mut fallbacks = 0;

    for n in 4..=bound {
        let prev = i64::from(a[n - 1]);
        let left = term_at(&a, prev, n);
        let right = term_at(&a, n as i64 - prev, n);
        a[n] = combine(left, right, &mut fallbacks);
    }
    (a, fallbacks)
}
