// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by job tree bookkeeping

use crate::state::JobState;
use thiserror::Error;

/// A tracking invariant was violated.
///
/// These are never retried: the queue stops and reports the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("invalid state transition for {job}: {from} -> {to}")]
    InvalidTransition { job: String, from: JobState, to: JobState },

    #[error("cannot join {job}: it is already {state}")]
    InvalidJoin { job: String, state: JobState },

    #[error("cannot stream {job}: it is already {state}")]
    CannotStream { job: String, state: JobState },

    #[error("no causes recorded for {identifier} #{number}")]
    UnknownExecution { identifier: String, number: u64 },

    #[error("{identifier} #{number} has more than one running job: {first} and {second}")]
    MultipleMains { identifier: String, number: u64, first: String, second: String },

    #[error("{job} is not the main job of {identifier} #{number}")]
    NotMain { job: String, identifier: String, number: u64 },

    #[error("{job} has no execution number")]
    MissingExecution { job: String },
}
