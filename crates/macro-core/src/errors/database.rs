// ABOUTME: Structured error types for store operations
// ABOUTME: Provides domain-specific errors with context for better error handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Errors raised by the profile/goal/target store
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connecting to or migrating the database failed
    #[error("Database connection failed: {context}")]
    ConnectionError {
        /// What was being attempted
        context: String,
    },

    /// A query failed to execute
    #[error("Database query failed: {context}")]
    QueryError {
        /// What was being attempted
        context: String,
    },

    /// A stored row could not be mapped back into a domain record
    #[error("Invalid stored value in {column}: {reason}")]
    InvalidData {
        /// Column holding the bad value
        column: String,
        /// Why the value was rejected
        reason: String,
    },
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        Self::QueryError {
            context: error.to_string(),
        }
    }
}
