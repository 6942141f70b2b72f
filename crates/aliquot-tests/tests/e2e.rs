//! End-to-end tests for the explorer against real state files.
//!
//! Each test opens an [`Explorer`] over a temp directory, runs work through
//! it, closes it, and inspects or reopens the persisted mask and factor
//! cache.

use std::collections::BTreeMap;
use std::fs;

use aliquot_core::constants::{FACTORS_FILE_NAME, MASK_FILE_NAME};
use aliquot_core::error::{AliquotError, FactorError, StoreError};
use aliquot_core::types::{Factorization, Status};
use aliquot_runtime::{Explorer, ExplorerConfig};
use aliquot_tests::helpers::*;

fn read_factors(dir: &std::path::Path) -> BTreeMap<u64, Factorization> {
    let text = fs::read_to_string(dir.join(FACTORS_FILE_NAME)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn cold_start_writes_mask_and_close_writes_factors() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut explorer = Explorer::open(&config).unwrap();
    let mask = fs::read_to_string(dir.path().join(MASK_FILE_NAME)).unwrap();
    assert_eq!(mask.lines().count(), 1_001);
    assert_eq!(mask.lines().nth(997), Some("true"));
    assert_eq!(mask.lines().nth(999), Some("false"));
    assert!(!dir.path().join(FACTORS_FILE_NAME).exists());

    let census = explorer.survey(config.n_max);
    assert_eq!(census.total(), 300);
    explorer.close().unwrap();

    let saved = read_factors(dir.path());
    assert!(!saved.is_empty());
    for (&n, factors) in &saved {
        assert!(n <= config.cache_ceiling, "{n} above ceiling");
        assert_eq!(factors, &naive_factorization(n));
    }
}

#[test]
fn reopen_reuses_state_without_rewriting_mask() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut first = Explorer::open(&config).unwrap();
    let cold = first.survey(config.n_max);
    first.close().unwrap();
    let mask_path = dir.path().join(MASK_FILE_NAME);
    let mask_before = fs::metadata(&mask_path).unwrap().modified().unwrap();
    let saved = read_factors(dir.path()).len();

    let mut second = Explorer::open(&config).unwrap();
    assert_eq!(second.cache().len(), saved);
    assert_eq!(
        fs::metadata(&mask_path).unwrap().modified().unwrap(),
        mask_before
    );

    let warm = second.survey(config.n_max);
    assert_eq!(warm, cold);
    assert!(second.cache().stats().hits > 0);
    second.close().unwrap();
}

#[test]
fn larger_growth_bound_extends_stored_mask() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    Explorer::open(&config).unwrap().close().unwrap();

    let bigger = ExplorerConfig {
        growth_bound: 100_000_000,
        ..config
    };
    let explorer = Explorer::open(&bigger).unwrap();
    assert_eq!(explorer.sieve().limit(), 10_000);
    let mask = fs::read_to_string(dir.path().join(MASK_FILE_NAME)).unwrap();
    assert_eq!(mask.lines().count(), 10_001);
}

#[test]
fn smaller_growth_bound_keeps_larger_mask() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    Explorer::open(&config).unwrap().close().unwrap();

    let smaller = ExplorerConfig {
        growth_bound: 10_000,
        ..config
    };
    let explorer = Explorer::open(&smaller).unwrap();
    assert_eq!(explorer.sieve().limit(), 1_000);
}

#[test]
fn lowered_ceiling_drops_entries_on_next_close() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut explorer = Explorer::open(&config).unwrap();
    explorer.survey(config.n_max);
    explorer.close().unwrap();
    assert!(read_factors(dir.path()).keys().any(|&n| n > 100));

    let lowered = ExplorerConfig {
        cache_ceiling: 100,
        ..config
    };
    Explorer::open(&lowered).unwrap().close().unwrap();
    let saved = read_factors(dir.path());
    assert!(!saved.is_empty());
    assert!(saved.keys().all(|&n| n <= 100));
}

#[test]
fn trace_through_explorer() {
    let dir = tempfile::tempdir().unwrap();
    let mut explorer = Explorer::open(&test_config(dir.path())).unwrap();

    let seq = explorer.trace(220).unwrap();
    assert_eq!(seq.terms, vec![220, 284, 220]);
    assert_eq!(seq.status, Status::Looped);

    let seq = explorer.trace(276).unwrap();
    assert_eq!(seq.status, Status::BoundExceeded);
}

#[test]
fn factor_beyond_sieve_reach_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut explorer = Explorer::open(&test_config(dir.path())).unwrap();
    let n = 1_000_003u64 * 1_000_003;
    assert!(matches!(
        explorer.factorize(n),
        Err(FactorError::SieveExhausted { remaining, .. }) if remaining == n
    ));
    assert_eq!(explorer.factorize(0), Err(FactorError::Zero));
}

#[test]
fn corrupt_mask_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(MASK_FILE_NAME), "false\nfalse\nmaybe\n").unwrap();
    let result = Explorer::open(&test_config(dir.path()));
    assert!(matches!(
        result,
        Err(AliquotError::Store(StoreError::InvalidToken { line: 3, .. }))
    ));
}

#[test]
fn corrupt_factor_cache_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(FACTORS_FILE_NAME), "[1, 2, 3]").unwrap();
    let result = Explorer::open(&test_config(dir.path()));
    assert!(matches!(
        result,
        Err(AliquotError::Store(StoreError::Json { .. }))
    ));
}

#[test]
fn mismatched_factor_entry_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(FACTORS_FILE_NAME),
        r#"{"10": {"2": 1, "5": 1}, "12": {"2": 1, "3": 1}}"#,
    )
    .unwrap();
    let result = Explorer::open(&test_config(dir.path()));
    assert!(matches!(
        result,
        Err(AliquotError::Store(StoreError::InvalidEntry { n: 12, .. }))
    ));
}

#[test]
fn composite_factor_entry_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    // Multiplies back to 12 but would give s(12) = 8.
    fs::write(
        dir.path().join(FACTORS_FILE_NAME),
        r#"{"12": {"4": 1, "3": 1}}"#,
    )
    .unwrap();
    let result = Explorer::open(&test_config(dir.path()));
    assert!(matches!(
        result,
        Err(AliquotError::Store(StoreError::CompositeFactor { n: 12, factor: 4 }))
    ));
}

#[test]
fn mask_with_missing_prime_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    Explorer::open(&config).unwrap().close().unwrap();

    let path = dir.path().join(MASK_FILE_NAME);
    let mut lines: Vec<String> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    lines[3] = "false".to_string();
    fs::write(&path, lines.join("\n")).unwrap();

    assert!(matches!(
        Explorer::open(&config),
        Err(AliquotError::Store(StoreError::CorruptMask { .. }))
    ));
}

#[test]
fn hand_written_cache_is_trusted_after_validation() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(FACTORS_FILE_NAME),
        r#"{"1": {}, "12": {"2": 2, "3": 1}}"#,
    )
    .unwrap();
    let mut explorer = Explorer::open(&test_config(dir.path())).unwrap();
    assert_eq!(explorer.cache().len(), 2);
    assert_eq!(explorer.aliquot_sum(12).unwrap(), 16);
    assert_eq!(explorer.cache().stats().hits, 1);
}

#[test]
fn no_persist_leaves_directory_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExplorerConfig {
        persist: false,
        ..test_config(dir.path())
    };
    let mut explorer = Explorer::open(&config).unwrap();
    explorer.survey(50);
    explorer.close().unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn session_limit_does_not_change_results() {
    let dir = tempfile::tempdir().unwrap();
    let unbounded = test_config(dir.path());
    let bounded = ExplorerConfig {
        persist: false,
        cache_ceiling: 10,
        session_cache_limit: Some(8),
        ..test_config(dir.path())
    };

    let mut a = Explorer::open(&ExplorerConfig {
        persist: false,
        ..unbounded
    })
    .unwrap();
    let mut b = Explorer::open(&bounded).unwrap();
    assert_eq!(a.survey(300), b.survey(300));
    assert!(b.cache().stats().evictions > 0);
}
