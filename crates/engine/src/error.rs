// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that stop the queue

use jkq_core::{HttpError, JobError, Response};
use thiserror::Error;

/// Fatal errors. The queue stops and reports the message as the reason.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("{context} HTTP {status} from {url}: {body}")]
    UnexpectedStatus { context: String, url: String, status: u16, body: String },

    #[error("failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("response from {url} is missing the {header} header")]
    MissingHeader { url: String, header: &'static str },

    #[error(
        "Job parameters should be specified as \"parameterName=parameterValue\" with one name, value pair per line. Invalid parameter line: {0}"
    )]
    InvalidParameter(String),

    #[error("Jenkins job canceled.")]
    JobCanceled,

    #[error("queue was cancelled")]
    Cancelled,
}

impl RuntimeError {
    pub(crate) fn unexpected(context: impl Into<String>, url: &str, response: &Response) -> Self {
        Self::UnexpectedStatus {
            context: context.into(),
            url: url.to_string(),
            status: response.status,
            body: response.text().into_owned(),
        }
    }

    pub(crate) fn parse(url: &str, err: serde_json::Error) -> Self {
        Self::Parse { url: url.to_string(), message: err.to_string() }
    }
}

/// Separate connection resets, which are retried, from everything else.
///
/// Returns `Ok(None)` when the call should be repeated after the poll interval.
pub(crate) fn retry_on_reset(
    outcome: Result<Response, HttpError>,
) -> Result<Option<Response>, RuntimeError> {
    match outcome {
        Ok(response) => Ok(Some(response)),
        Err(e) if e.is_transient() => {
            tracing::warn!(error = %e, "connection reset, retrying");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
