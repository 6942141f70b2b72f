//! Run defaults. Every value here can be overridden through configuration.

/// Default step budget `K`: a sequence may take at most `K - 1` steps.
pub const DEFAULT_MAX_STEPS: u32 = 60;

/// Default growth bound `I`: any term `>= I` stops the sequence.
pub const DEFAULT_GROWTH_BOUND: u64 = 100_000_000_000;

/// Default upper end of the surveyed seed range `1..=n_max`.
pub const DEFAULT_N_MAX: u64 = 20_000;

/// Default persistence ceiling: cache entries with `n <= ceiling` are saved.
pub const DEFAULT_CACHE_CEILING: u64 = 100_000;

/// File name of the persisted primality mask inside the data directory.
pub const MASK_FILE_NAME: &str = "primes.txt";

/// File name of the persisted factorization cache inside the data directory.
pub const FACTORS_FILE_NAME: &str = "factors.json";

/// Sieve limit needed to factor every integer below `bound`.
///
/// Any `n < bound` has at most one prime factor above `isqrt(n)`, so primes up
/// to `isqrt(bound)` suffice. Returns 0 for `bound < 4`, where no trial
/// division is ever needed.
///
/// # Examples
///
/// ```
/// use aliquot_core::constants::sieve_limit_for;
/// assert_eq!(sieve_limit_for(100_000_000_000), 316_227);
/// assert_eq!(sieve_limit_for(49), 7);
/// assert_eq!(sieve_limit_for(3), 0);
/// ```
pub fn sieve_limit_for(bound: u64) -> u64 {
    if bound < 4 {
        return 0;
    }
    bound.isqrt()
}
