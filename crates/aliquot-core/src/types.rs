//! Shared data types: factorizations, sequence status, and run limits.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GROWTH_BOUND, DEFAULT_MAX_STEPS};
use crate::error::ConfigError;

/// Prime-power factorization of a positive integer: prime -> exponent.
///
/// Keys are unique primes and every exponent is positive. The empty
/// factorization represents 1. Serializes as a JSON object keyed by the
/// decimal prime, e.g. `{"2": 2, "3": 1}` for 12.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Factorization(BTreeMap<u64, u32>);

impl Factorization {
    /// The empty factorization (the integer 1).
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct prime factors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Exponent of `prime`, or 0 if it does not divide the value.
    pub fn exponent(&self, prime: u64) -> u32 {
        self.0.get(&prime).copied().unwrap_or(0)
    }

    /// `(prime, exponent)` pairs in increasing prime order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.0.iter().map(|(&p, &e)| (p, e))
    }

    /// Multiply in `prime^exponent`. Exponents on an existing prime are summed.
    /// A zero exponent is a no-op.
    pub fn add(&mut self, prime: u64, exponent: u32) {
        if exponent == 0 {
            return;
        }
        *self.0.entry(prime).or_insert(0) += exponent;
    }

    /// Product of `self` and `other` as a new factorization.
    ///
    /// Shared primes have their exponents summed, never overwritten.
    pub fn merged(&self, other: &Factorization) -> Factorization {
        let mut out = self.clone();
        for (p, e) in other.iter() {
            out.add(p, e);
        }
        out
    }

    /// The integer this factorization represents, or `None` on `u128` overflow.
    pub fn value(&self) -> Option<u128> {
        self.iter().try_fold(1u128, |acc, (p, e)| {
            (p as u128).checked_pow(e).and_then(|pe| acc.checked_mul(pe))
        })
    }
}

impl FromIterator<(u64, u32)> for Factorization {
    fn from_iter<T: IntoIterator<Item = (u64, u32)>>(iter: T) -> Self {
        let mut f = Factorization::new();
        for (p, e) in iter {
            f.add(p, e);
        }
        f
    }
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("1");
        }
        for (i, (p, e)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" * ")?;
            }
            if e == 1 {
                write!(f, "{p}")?;
            } else {
                write!(f, "{p}^{e}")?;
            }
        }
        Ok(())
    }
}

/// Terminal classification of an aliquot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// The sequence reached 0.
    Terminated,
    /// A term repeated an earlier term.
    Looped,
    /// A term reached or passed the growth bound.
    BoundExceeded,
    /// The step budget ran out first.
    StepExhausted,
}

impl Status {
    /// All statuses in report order.
    pub const ALL: [Status; 4] = [
        Status::Terminated,
        Status::Looped,
        Status::BoundExceeded,
        Status::StepExhausted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terminated => "terminated",
            Self::Looped => "looped",
            Self::BoundExceeded => "bound-exceeded",
            Self::StepExhausted => "step-exhausted",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully traced aliquot sequence and how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliquotSequence {
    /// Every visited term, starting with the seed.
    pub terms: Vec<u128>,
    pub status: Status,
}

impl AliquotSequence {
    /// The starting value.
    pub fn seed(&self) -> u128 {
        self.terms[0]
    }

    /// Number of `s()` applications performed.
    pub fn steps(&self) -> usize {
        self.terms.len() - 1
    }

    /// The final term visited.
    pub fn last(&self) -> u128 {
        self.terms[self.terms.len() - 1]
    }
}

/// Stopping parameters for sequence tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Step budget `K`; at most `K - 1` terms are computed after the seed.
    pub max_steps: u32,
    /// Growth bound `I`; a term `>= I` stops the sequence.
    pub growth_bound: u64,
}

impl Limits {
    /// Validated constructor.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroSteps`] if `max_steps == 0`
    /// - [`ConfigError::BoundTooSmall`] if `growth_bound < 2`
    pub fn new(max_steps: u32, growth_bound: u64) -> Result<Self, ConfigError> {
        let limits = Self {
            max_steps,
            growth_bound,
        };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if self.growth_bound < 2 {
            return Err(ConfigError::BoundTooSmall(self.growth_bound));
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            growth_bound: DEFAULT_GROWTH_BOUND,
        }
    }
}
