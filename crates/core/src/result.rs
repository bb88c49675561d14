// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build results as reported by Jenkins and as reported to the host

use serde::{Deserialize, Serialize};

/// Jenkins build result code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
    Other(String),
}

impl ResultCode {
    pub fn parse(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "SUCCESS" => Self::Success,
            "UNSTABLE" => Self::Unstable,
            "FAILURE" => Self::Failure,
            "NOT_BUILT" => Self::NotBuilt,
            "ABORTED" => Self::Aborted,
            _ => Self::Other(code.to_string()),
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Self::Success => "Success",
            Self::Unstable => "Unstable",
            Self::Failure => "Failed",
            Self::NotBuilt => "Not built",
            Self::Aborted => "Aborted",
            Self::Other(raw) => raw,
        }
    }
}

/// Outcome reported back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskResult {
    Succeeded,
    Failed,
}

crate::simple_display! {
    TaskResult {
        Succeeded => "Succeeded",
        Failed => "Failed",
    }
}
