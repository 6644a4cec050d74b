#![warn(missing_docs)]
//! # mediaguard-lifecycle
//!
//! ## Purpose
//! Tracks the single active analysis request through its lifecycle.
//!
//! ## Responsibilities
//! - Model `Idle -> Loading -> Succeeded | Failed` with explicit transitions.
//! - Refuse to start a request while one is in flight.
//! - Ignore completions that do not belong to the in-flight request.
//!
//! ## Data flow
//! Controller calls [`RequestLifecycle::begin`] -> dispatcher runs ->
//! [`RequestLifecycle::succeed`] or [`RequestLifecycle::fail`] stores the
//! outcome -> presentation reads [`RequestLifecycle::state`].
//!
//! ## Ownership and lifetimes
//! Each transition replaces the whole state value; results are never edited in
//! place.
//!
//! ## Error model
//! Illegal transitions return [`LifecycleError`] and leave state untouched.
//!
//! ## Example
//! ```rust
//! use mediaguard_lifecycle::{LifecycleState, RequestLifecycle};
//!
//! let mut lifecycle = RequestLifecycle::new();
//! let ticket = lifecycle.begin().unwrap();
//! assert!(lifecycle.begin().is_err());
//! lifecycle.fail(ticket, "Analysis failed: Bad Gateway").unwrap();
//! assert!(matches!(lifecycle.state(), LifecycleState::Failed(_)));
//! ```

use mediaguard_normalize::NormalizedResult;
use thiserror::Error;

/// Request lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleState {
    /// No outcome to show.
    Idle,
    /// A request is in flight.
    Loading,
    /// Last request succeeded.
    Succeeded(NormalizedResult),
    /// Last request failed with a user-facing message.
    Failed(String),
}

/// Handle identifying one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    /// Returns the request sequence number.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Lifecycle state machine with explicit legal transitions.
#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    state: LifecycleState,
    generation: u64,
}

impl RequestLifecycle {
    /// Creates a state machine in `Idle` state.
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Idle,
            generation: 0,
        }
    }

    /// Returns current state snapshot.
    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// Returns `true` while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LifecycleState::Loading)
    }

    /// Returns the current result, if the last request succeeded.
    pub fn result(&self) -> Option<&NormalizedResult> {
        match &self.state {
            LifecycleState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Returns the current error message, if the last request failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LifecycleState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Enters `Loading`, discarding any previous outcome.
    ///
    /// # Errors
    /// Returns [`LifecycleError::Busy`] while another request is in flight.
    pub fn begin(&mut self) -> Result<RequestTicket, LifecycleError> {
        if self.is_loading() {
            return Err(LifecycleError::Busy);
        }

        self.generation += 1;
        self.state = LifecycleState::Loading;
        tracing::debug!(generation = self.generation, "analysis request started");
        Ok(RequestTicket {
            generation: self.generation,
        })
    }

    /// Completes the in-flight request with a result.
    ///
    /// # Errors
    /// Returns [`LifecycleError::StaleTicket`] when `ticket` is not the
    /// in-flight request.
    pub fn succeed(
        &mut self,
        ticket: RequestTicket,
        result: NormalizedResult,
    ) -> Result<(), LifecycleError> {
        self.check_ticket(ticket)?;
        self.state = LifecycleState::Succeeded(result);
        tracing::debug!(generation = ticket.generation, "analysis request succeeded");
        Ok(())
    }

    /// Completes the in-flight request with an error message.
    ///
    /// # Errors
    /// Returns [`LifecycleError::StaleTicket`] when `ticket` is not the
    /// in-flight request.
    pub fn fail(
        &mut self,
        ticket: RequestTicket,
        message: impl Into<String>,
    ) -> Result<(), LifecycleError> {
        self.check_ticket(ticket)?;
        let message = message.into();
        tracing::debug!(generation = ticket.generation, %message, "analysis request failed");
        self.state = LifecycleState::Failed(message);
        Ok(())
    }

    /// Drops a terminal outcome after an input change.
    ///
    /// Has no effect while loading.
    pub fn clear_outcome(&mut self) {
        if matches!(
            self.state,
            LifecycleState::Succeeded(_) | LifecycleState::Failed(_)
        ) {
            self.state = LifecycleState::Idle;
        }
    }

    fn check_ticket(&self, ticket: RequestTicket) -> Result<(), LifecycleError> {
        if !self.is_loading() || ticket.generation != self.generation {
            return Err(LifecycleError::StaleTicket(ticket.generation));
        }
        Ok(())
    }
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Illegal lifecycle transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// A request is already in flight.
    #[error("an analysis is already in progress")]
    Busy,
    /// Completion does not match the in-flight request.
    #[error("request {0} is not the in-flight analysis")]
    StaleTicket(u64),
}

#[cfg(test)]
mod tests {
    //! Unit tests for lifecycle transitions.

    use super::*;

    #[test]
    fn terminal_states_can_restart() {
        let mut lifecycle = RequestLifecycle::new();
        let first = lifecycle.begin().expect("idle should start");
        lifecycle
            .fail(first, "network down")
            .expect("in-flight ticket should complete");
        assert_eq!(lifecycle.error(), Some("network down"));

        let second = lifecycle.begin().expect("failed should restart");
        assert!(lifecycle.is_loading());
        assert_eq!(lifecycle.error(), None);
        assert_eq!(second.generation(), 2);
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut lifecycle = RequestLifecycle::new();
        let first = lifecycle.begin().expect("idle should start");
        lifecycle.fail(first, "boom").expect("first completes");
        let _second = lifecycle.begin().expect("restart");

        assert_eq!(
            lifecycle.fail(first, "late"),
            Err(LifecycleError::StaleTicket(1))
        );
        assert!(lifecycle.is_loading());
    }

    #[test]
    fn clear_outcome_keeps_loading() {
        let mut lifecycle = RequestLifecycle::new();
        let _ticket = lifecycle.begin().expect("idle should start");
        lifecycle.clear_outcome();
        assert!(lifecycle.is_loading());
    }
}
