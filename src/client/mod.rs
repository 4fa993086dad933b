// ABOUTME: Caller-side sync layer for the profile and goal save endpoints
// ABOUTME: Retry with exponential backoff, optimistic local state, and the HTTP sync client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod optimistic;
mod retry;
mod sync;

pub use optimistic::{OptimisticState, SyncStatus};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use sync::{
    fitness_level_for, goal_type_for, GoalPayload, ProfilePayload, ProfileSyncClient, UserDetails,
};
