//! Shared reference implementations and fixtures for integration tests.

use std::path::Path;

use aliquot_core::types::Factorization;
use aliquot_runtime::ExplorerConfig;

/// Growth bound small enough to keep tests fast.
pub const TEST_GROWTH_BOUND: u64 = 1_000_000;

/// Sum of proper divisors by checking every candidate up to `sqrt(n)`.
pub fn naive_aliquot_sum(n: u64) -> u128 {
    if n <= 1 {
        return 0;
    }
    let mut sum: u128 = 1;
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            sum += d as u128;
            let pair = n / d;
            if pair != d {
                sum += pair as u128;
            }
        }
        d += 1;
    }
    sum
}

/// Factor `n` by dividing out every integer from 2 upward.
pub fn naive_factorization(mut n: u64) -> Factorization {
    let mut factors = Factorization::new();
    let mut d = 2;
    while d * d <= n {
        while n % d == 0 {
            factors.add(d, 1);
            n /= d;
        }
        d += 1;
    }
    if n > 1 {
        factors.add(n, 1);
    }
    factors
}

pub fn is_prime_naive(n: u64) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

/// Config rooted at `dir` with test-sized limits.
pub fn test_config(dir: &Path) -> ExplorerConfig {
    ExplorerConfig {
        data_dir: dir.to_path_buf(),
        growth_bound: TEST_GROWTH_BOUND,
        n_max: 300,
        cache_ceiling: 1_000,
        ..ExplorerConfig::default()
    }
}
