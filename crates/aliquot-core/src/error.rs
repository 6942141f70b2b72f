//! Error types for the aliquot explorer.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactorError {
    #[error("factorization is undefined for zero")] Zero,
    #[error("sieve limit {limit} is below isqrt({remaining}) while factoring {n}")] SieveExhausted { n: u64, remaining: u64, limit: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DivisorError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("invalid prime factor {0}")] InvalidPrime(u64),
    #[error("inexact geometric sum for {prime}^{exponent}")] InexactDivision { prime: u64, exponent: u32 },
    #[error(transparent)] Factor(#[from] FactorError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O on {}: {source}", path.display())] Io { path: PathBuf, source: std::io::Error },
    #[error("{}:{line}: invalid mask token {token:?}", path.display())] InvalidToken { path: PathBuf, line: usize, token: String },
    #[error("{}: corrupt mask: {reason}", path.display())] CorruptMask { path: PathBuf, reason: String },
    #[error("{}: malformed factor cache: {source}", path.display())] Json { path: PathBuf, source: serde_json::Error },
    #[error("{}: invalid factorization for {n}: {reason}", path.display())] InvalidEntry { path: PathBuf, n: u64, reason: String },
    #[error("stored factorization of {n} lists non-prime factor {factor}")] CompositeFactor { n: u64, factor: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_steps must be at least 1")] ZeroSteps,
    #[error("growth_bound must be at least 2, got {0}")] BoundTooSmall(u64),
    #[error("invalid configuration: {0}")] Invalid(String),
}

#[derive(Error, Debug)]
pub enum AliquotError {
    #[error(transparent)] Factor(#[from] FactorError),
    #[error(transparent)] Divisor(#[from] DivisorError),
    #[error(transparent)] Store(#[from] StoreError),
    #[error(transparent)] Config(#[from] ConfigError),
}

