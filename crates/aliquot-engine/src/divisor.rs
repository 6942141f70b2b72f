//! Divisor sums from prime factorizations.
//!
//! `sigma(n) = prod (p^(e+1) - 1) / (p - 1)` over the prime powers of `n`.
//! All arithmetic is `u128` with checked operations; the division is
//! verified exact rather than assumed.

use aliquot_core::error::DivisorError;
use aliquot_core::traits::ProperDivisorSum;
use aliquot_core::types::Factorization;

use crate::factor::FactorCache;
use crate::sieve::PrimeSieve;

/// `1 + p + p^2 + ... + p^e`, computed as `(p^(e+1) - 1) / (p - 1)`.
fn geometric_sum(prime: u64, exponent: u32) -> Result<u128, DivisorError> {
    if prime < 2 {
        return Err(DivisorError::InvalidPrime(prime));
    }
    let p = prime as u128;
    let numerator = exponent
        .checked_add(1)
        .and_then(|e| p.checked_pow(e))
        .ok_or(DivisorError::ArithmeticOverflow)?
        - 1;
    let denominator = p - 1;
    if numerator % denominator != 0 {
        return Err(DivisorError::InexactDivision { prime, exponent });
    }
    Ok(numerator / denominator)
}

/// Sum of all divisors of the integer represented by `factors`.
///
/// The empty factorization (the integer 1) gives 1.
pub fn sigma(factors: &Factorization) -> Result<u128, DivisorError> {
    factors.iter().try_fold(1u128, |acc, (p, e)| {
        acc.checked_mul(geometric_sum(p, e)?)
            .ok_or(DivisorError::ArithmeticOverflow)
    })
}

/// The aliquot map `s(n) = sigma(n) - n`.
///
/// `s(1) = 0`; `s(0)` is undefined and reported as a factorization error.
pub fn aliquot_sum(cache: &mut FactorCache, sieve: &PrimeSieve, n: u64) -> Result<u128, DivisorError> {
    if n == 1 {
        return Ok(0);
    }
    let factors = cache.factorize(sieve, n)?;
    sigma(&factors)?
        .checked_sub(n as u128)
        .ok_or(DivisorError::ArithmeticOverflow)
}

/// Borrowed sieve and cache bundled as a [`ProperDivisorSum`].
pub struct DivisorSummer<'a> {
    sieve: &'a PrimeSieve,
    cache: &'a mut FactorCache,
}

impl<'a> DivisorSummer<'a> {
    pub fn new(sieve: &'a PrimeSieve, cache: &'a mut FactorCache) -> Self {
        Self { sieve, cache }
    }
}

impl ProperDivisorSum for DivisorSummer<'_> {
    fn proper_divisor_sum(&mut self, n: u64) -> Result<u128, DivisorError> {
        aliquot_sum(self.cache, self.sieve, n)
    }
}
