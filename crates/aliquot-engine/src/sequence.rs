//! Aliquot sequence state machine.
//!
//! At most `K - 1` steps are taken. Before each step the current term is
//! checked in a fixed order:
//!
//! 1. term is 0 → [`Status::Terminated`]
//! 2. term `>=` growth bound → [`Status::BoundExceeded`]
//! 3. term seen earlier → [`Status::Looped`]
//!
//! otherwise the term is recorded and `s(term)` is appended. Once `K - 1`
//! steps have completed the sequence is [`Status::StepExhausted`] without
//! examining the last appended term. The seed itself is always checked, so
//! with `K = 1` a seed that is 0 or past the bound still reports that status.

use std::collections::HashSet;

use aliquot_core::error::DivisorError;
use aliquot_core::traits::ProperDivisorSum;
use aliquot_core::types::{AliquotSequence, Limits, Status};

/// Where a [`Tracer`] currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    Running,
    Finished(Status),
}

/// Step-by-step driver for a single aliquot sequence.
#[derive(Debug, Clone)]
pub struct Tracer {
    limits: Limits,
    terms: Vec<u128>,
    seen: HashSet<u128>,
    state: SequenceState,
}

impl Tracer {
    /// Start a sequence at `seed`. A `max_steps` of 0 behaves like 1.
    pub fn new(seed: u64, limits: Limits) -> Self {
        Self {
            limits,
            terms: vec![seed as u128],
            seen: HashSet::new(),
            state: SequenceState::Running,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Terms visited so far, seed first.
    pub fn terms(&self) -> &[u128] {
        &self.terms
    }

    fn current(&self) -> u128 {
        self.terms[self.terms.len() - 1]
    }

    fn classify(&mut self) -> Option<Status> {
        let steps = self.terms.len() - 1;
        let budget = self.limits.max_steps.saturating_sub(1) as usize;
        if steps > 0 && steps >= budget {
            return Some(Status::StepExhausted);
        }
        let current = self.current();
        if current == 0 {
            return Some(Status::Terminated);
        }
        if current >= self.limits.growth_bound as u128 {
            return Some(Status::BoundExceeded);
        }
        if !self.seen.insert(current) {
            return Some(Status::Looped);
        }
        // K = 1: the seed was checked, no step is allowed.
        if steps >= budget {
            return Some(Status::StepExhausted);
        }
        None
    }

    /// Advance by one step.
    ///
    /// Once finished, further calls are no-ops returning the final state.
    pub fn step<S: ProperDivisorSum + ?Sized>(&mut self, s: &mut S) -> Result<SequenceState, DivisorError> {
        if let SequenceState::Finished(_) = self.state {
            return Ok(self.state);
        }
        if let Some(status) = self.classify() {
            self.state = SequenceState::Finished(status);
            return Ok(self.state);
        }
        // Below the growth bound, which is itself a u64.
        let n = u64::try_from(self.current()).map_err(|_| DivisorError::ArithmeticOverflow)?;
        let next = s.proper_divisor_sum(n)?;
        self.terms.push(next);
        Ok(self.state)
    }

    /// Step until finished and return the completed sequence.
    pub fn run<S: ProperDivisorSum + ?Sized>(mut self, s: &mut S) -> Result<AliquotSequence, DivisorError> {
        loop {
            if let SequenceState::Finished(status) = self.step(s)? {
                return Ok(AliquotSequence {
                    terms: self.terms,
                    status,
                });
            }
        }
    }
}

/// Trace the aliquot sequence of `seed` to completion.
pub fn trace<S: ProperDivisorSum + ?Sized>(
    seed: u64,
    limits: &Limits,
    s: &mut S,
) -> Result<AliquotSequence, DivisorError> {
    Tracer::new(seed, *limits).run(s)
}
