// ABOUTME: Optimistic local state for caller-side saves
// ABOUTME: Tracks whether the displayed value has been confirmed by the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Confirmation status of the displayed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Matches what the server acknowledged
    Confirmed,
    /// Applied locally, request in flight
    Pending,
    /// Applied locally, every attempt failed
    Unconfirmed,
}

/// Locally applied value with the last server-acknowledged value kept for rollback
#[derive(Debug, Clone)]
pub struct OptimisticState<T> {
    confirmed: T,
    pending: Option<T>,
    status: SyncStatus,
}

impl<T: Clone> OptimisticState<T> {
    /// Start from a value the server already holds
    #[must_use]
    pub const fn new(confirmed: T) -> Self {
        Self {
            confirmed,
            pending: None,
            status: SyncStatus::Confirmed,
        }
    }

    /// Value to display
    #[must_use]
    pub fn current(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.confirmed)
    }

    /// Last value the server acknowledged
    #[must_use]
    pub const fn confirmed(&self) -> &T {
        &self.confirmed
    }

    /// Current confirmation status
    #[must_use]
    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    /// Whether the displayed value is saved
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == SyncStatus::Confirmed
    }

    /// Show `value` immediately, before the server responds
    pub fn apply(&mut self, value: T) {
        self.pending = Some(value);
        self.status = SyncStatus::Pending;
    }

    /// Server accepted the pending value
    pub fn confirm(&mut self) {
        if let Some(value) = self.pending.take() {
            self.confirmed = value;
        }
        self.status = SyncStatus::Confirmed;
    }

    /// Keep showing the pending value but flag it as not saved
    pub fn mark_unconfirmed(&mut self) {
        if self.pending.is_some() {
            self.status = SyncStatus::Unconfirmed;
        }
    }

    /// Discard the pending value and return it
    pub fn rollback(&mut self) -> Option<T> {
        self.status = SyncStatus::Confirmed;
        self.pending.take()
    }
}
