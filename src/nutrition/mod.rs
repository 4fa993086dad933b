// ABOUTME: Nutrition target computation and versioning for profile and goal changes
// ABOUTME: Advisory client, response parser, formula fallback, calculator, version manager, recalculation trigger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutrition Targets
//!
//! Whenever a user's profile or goal changes the server derives a new daily
//! target. The [`TargetCalculator`] asks the advisory service first and falls
//! back to the Mifflin-St Jeor formula on any advisory or parsing failure. The
//! [`TargetVersionManager`] keeps one active target per user by deactivating
//! older rows before inserting the new one, and the [`RecalculationTrigger`]
//! runs the whole sequence as a best-effort side effect of a save.

/// Advisory (AI) client wrapping an injected LLM provider
pub mod advisory;
/// Orchestrates advisory then fallback
pub mod calculator;
/// Deterministic formula calculator
pub mod fallback;
/// Extraction of the target JSON object from advisory text
pub mod parser;
/// Advisory prompt construction
pub mod prompts;
/// Best-effort recalculation after profile and goal saves
pub mod recalculation;
/// Active-row versioning for goals and targets
pub mod versioning;

pub use advisory::AdvisoryClient;
pub use calculator::{TargetCalculator, TargetInputs, TargetOutcome};
pub use fallback::FallbackCalculator;
pub use parser::parse_advisory_response;
pub use recalculation::{RecalculationOutcome, RecalculationTrigger, SkipReason};
pub use versioning::{TargetCommitMode, TargetVersionManager};

use crate::errors::{AppError, DatabaseError, ErrorCode};
use thiserror::Error;

/// Failures of the target computation pipeline
///
/// `AdvisoryUnavailable` and `MalformedResponse` never leave the calculator:
/// they become the reason attached to a formula fallback.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Required profile or goal attributes are missing or out of range
    #[error("cannot calculate targets: {}", fields.join(", "))]
    Validation {
        /// Offending field names
        fields: Vec<&'static str>,
    },

    /// Transport failure, timeout, or non-success status from the advisory service
    #[error("advisory service unavailable: {0}")]
    AdvisoryUnavailable(String),

    /// Advisory text could not be turned into a target
    #[error("malformed advisory response: {0}")]
    MalformedResponse(String),

    /// Store operation failed during a version commit
    #[error("persistence failed: {0}")]
    Persistence(#[from] DatabaseError),
}

impl From<TargetError> for AppError {
    fn from(error: TargetError) -> Self {
        match error {
            TargetError::Persistence(db) => Self::from(db),
            TargetError::Validation { .. } => Self::new(ErrorCode::InvalidInput, error.to_string()),
            TargetError::AdvisoryUnavailable(_) | TargetError::MalformedResponse(_) => {
                Self::new(ErrorCode::ExternalServiceError, error.to_string())
            }
        }
    }
}
