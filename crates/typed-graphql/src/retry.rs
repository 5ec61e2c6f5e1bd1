//! Retry seam.
//!
//! The client offers transport-level failures to a [`RetryPolicy`] before
//! giving up. Only [`NoRetry`] ships; callers wanting backoff plug in their
//! own policy.

use std::fmt;
use std::time::Duration;

use crate::error::GraphqlClientError;

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay.
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// Decides whether a failed attempt is repeated.
pub trait RetryPolicy: fmt::Debug + Send + Sync {
    /// `attempt` counts from 1 for the initial attempt.
    fn decide(&self, error: &GraphqlClientError, attempt: usize) -> RetryDecision;
}

/// Never retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn decide(&self, _error: &GraphqlClientError, _attempt: usize) -> RetryDecision {
        RetryDecision::DoNotRetry
    }
}
