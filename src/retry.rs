//! Bounded retry with a fixed pause between attempts.
//!
//! The policy is a pure function of `(attempt, outcome)`; [`Retrier`] keeps
//! the attempt counter and the current [`RetrievalState`] for one fetch and
//! leaves the actual waiting to the caller.

use std::time::Duration;

/// Result of a single attempt, as far as the retry policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Valid,
    Invalid,
    TransportFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Succeed,
    RetryAfter(Duration),
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalState {
    Idle,
    Fetching { attempt: u32 },
    Validating { attempt: u32 },
    Waiting { attempt: u32 },
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// `attempt` is the 1-based number of the attempt that produced `outcome`.
    pub fn decide(&self, attempt: u32, outcome: AttemptOutcome) -> Decision {
        match outcome {
            AttemptOutcome::Valid => Decision::Succeed,
            _ if attempt >= self.max_attempts => Decision::Fail,
            _ => Decision::RetryAfter(self.delay),
        }
    }
}

/// Tracks one fetch through Idle → Fetching → Validating → (Waiting →
/// Fetching)* → Success | Failure.
#[derive(Debug)]
pub struct Retrier {
    policy: RetryPolicy,
    attempt: u32,
    state: RetrievalState,
}

impl Retrier {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            state: RetrievalState::Idle,
        }
    }

    pub fn state(&self) -> RetrievalState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Enter `Fetching` for the next attempt and return its number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.state = RetrievalState::Fetching {
            attempt: self.attempt,
        };
        self.attempt
    }

    pub fn validating(&mut self) {
        self.state = RetrievalState::Validating {
            attempt: self.attempt,
        };
    }

    pub fn record(&mut self, outcome: AttemptOutcome) -> Decision {
        let decision = self.policy.decide(self.attempt, outcome);
        self.state = match decision {
            Decision::Succeed => RetrievalState::Success,
            Decision::RetryAfter(_) => RetrievalState::Waiting {
                attempt: self.attempt,
            },
            Decision::Fail => RetrievalState::Failure,
        };
        decision
    }
}
