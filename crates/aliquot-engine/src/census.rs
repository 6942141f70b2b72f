//! Tallies of sequence outcomes over a range of seeds.

use std::fmt;
use std::ops::RangeInclusive;

use aliquot_core::traits::ProperDivisorSum;
use aliquot_core::types::{Limits, Status};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::sequence::trace;

/// Count of seeds per terminal [`Status`], plus seeds that failed to trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub terminated: u64,
    pub looped: u64,
    pub bound_exceeded: u64,
    pub step_exhausted: u64,
    /// Seeds whose computation returned an error.
    pub failed: u64,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: Status) {
        *self.slot(status) += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn count(&self, status: Status) -> u64 {
        match status {
            Status::Terminated => self.terminated,
            Status::Looped => self.looped,
            Status::BoundExceeded => self.bound_exceeded,
            Status::StepExhausted => self.step_exhausted,
        }
    }

    /// Every seed recorded, failures included.
    pub fn total(&self) -> u64 {
        Status::ALL.iter().map(|&s| self.count(s)).sum::<u64>() + self.failed
    }

    fn slot(&mut self, status: Status) -> &mut u64 {
        match status {
            Status::Terminated => &mut self.terminated,
            Status::Looped => &mut self.looped,
            Status::BoundExceeded => &mut self.bound_exceeded,
            Status::StepExhausted => &mut self.step_exhausted,
        }
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for status in Status::ALL {
            writeln!(f, "{:<16}{}", status.as_str(), self.count(status))?;
        }
        write!(f, "{:<16}{}", "failed", self.failed)
    }
}

/// Classify every seed in `seeds`.
///
/// A seed whose trace fails is logged and counted under `failed`; the survey
/// carries on with the next seed.
pub fn survey<S: ProperDivisorSum + ?Sized>(
    seeds: RangeInclusive<u64>,
    limits: &Limits,
    s: &mut S,
) -> Census {
    let mut census = Census::new();
    for seed in seeds {
        match trace(seed, limits, s) {
            Ok(seq) => census.record(seq.status),
            Err(e) => {
                warn!(seed, error = %e, "seed failed, skipping");
                census.record_failure();
            }
        }
    }
    info!(
        total = census.total(),
        terminated = census.terminated,
        looped = census.looped,
        bound_exceeded = census.bound_exceeded,
        step_exhausted = census.step_exhausted,
        failed = census.failed,
        "survey complete"
    );
    census
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divisor::DivisorSummer;
    use crate::factor::FactorCache;
    use crate::sieve::PrimeSieve;
    use aliquot_core::error::DivisorError;

    struct FailOn(u64);

    impl ProperDivisorSum for FailOn {
        fn proper_divisor_sum(&mut self, n: u64) -> Result<u128, DivisorError> {
            if n == self.0 {
                Err(DivisorError::ArithmeticOverflow)
            } else {
                Ok(0)
            }
        }
    }

    #[test]
    fn record_and_count() {
        let mut c = Census::new();
        c.record(Status::Looped);
        c.record(Status::Looped);
        c.record(Status::Terminated);
        c.record_failure();
        assert_eq!(c.count(Status::Looped), 2);
        assert_eq!(c.count(Status::Terminated), 1);
        assert_eq!(c.count(Status::BoundExceeded), 0);
        assert_eq!(c.total(), 4);
    }

    #[test]
    fn display_lists_every_status() {
        let text = Census::new().to_string();
        for status in Status::ALL {
            assert!(text.contains(status.as_str()));
        }
        assert!(text.contains("failed"));
    }

    #[test]
    fn serializes_to_json() {
        let mut c = Census::new();
        c.record(Status::StepExhausted);
        let json = serde_json::to_value(c).unwrap();
        assert_eq!(json["step_exhausted"], 1);
        assert_eq!(json["failed"], 0);
    }

    #[test]
    fn small_survey() {
        let sieve = PrimeSieve::with_capacity(1_000);
        let mut cache = FactorCache::new(1_000);
        let mut summer = DivisorSummer::new(&sieve, &mut cache);
        let census = survey(1..=30, &Limits::default(), &mut summer);
        assert_eq!(census.total(), 30);
        assert_eq!(census.failed, 0);
        // 6, 25 and 28 end in the 6/28 fixed points; nothing else loops below 31.
        assert_eq!(census.looped, 3);
        assert_eq!(census.terminated, 27);
    }

    #[test]
    fn failures_are_isolated() {
        let mut fail = FailOn(5);
        let census = survey(1..=10, &Limits::default(), &mut fail);
        assert_eq!(census.failed, 1);
        assert_eq!(census.terminated, 9);
    }
}
