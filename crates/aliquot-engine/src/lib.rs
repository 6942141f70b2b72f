//! # aliquot-engine — Number-theoretic core of the aliquot explorer.
//!
//! All arithmetic is integer-only; sums are carried in `u128` with checked
//! operations so an overflow surfaces as an error instead of wrapping.
//!
//! - **Prime sieve**: an Eratosthenes mask that extends in place to a larger
//!   bound without re-sieving the covered range.
//! - **Factorization cache**: trial division over the sieve's primes, memoized
//!   per `n`, splicing in the cached factorization of a cofactor when one is
//!   already known.
//! - **Divisor sums**: `sigma(n)` from the geometric-series formula and the
//!   aliquot map `s(n) = sigma(n) - n`.
//! - **Sequence engine**: the `n -> s(n)` state machine with its ordered
//!   stopping rules, plus the census that tallies outcomes over a seed range.

pub mod census;
pub mod divisor;
pub mod factor;
pub mod sequence;
pub mod sieve;

pub use census::{Census, survey};
pub use divisor::{DivisorSummer, aliquot_sum, sigma};
pub use factor::{CacheStats, FactorCache, check_prime, trial_divide};
pub use sequence::{SequenceState, Tracer, trace};
pub use sieve::PrimeSieve;
