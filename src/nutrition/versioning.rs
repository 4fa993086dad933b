// ABOUTME: Active-row versioning for nutrition targets and fitness goals
// ABOUTME: Deactivate-then-insert commits with an optional per-user serialization lock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Version manager
//!
//! A commit is two store calls: deactivate every active row of the user, then
//! insert the new row as active. Old rows stay as history.
//!
//! With [`TargetCommitMode::Unserialized`] nothing coordinates two commits for
//! the same user, so interleaved pairs can leave two active rows (or an older
//! row active after a newer insert). [`TargetCommitMode::PerUser`] holds a
//! per-user async mutex across each pair, which keeps at most one active row
//! per user within this process.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use macro_core::models::{Goal, NutritionTarget};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::TargetError;
use crate::database::NutritionRepository;

/// How deactivate-then-insert pairs are coordinated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetCommitMode {
    /// No coordination; concurrent commits for one user may interleave
    #[default]
    Unserialized,
    /// One commit at a time per user
    PerUser,
}

impl TargetCommitMode {
    /// Parse a configured value
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unserialized" => Some(Self::Unserialized),
            "per_user" | "per-user" => Some(Self::PerUser),
            _ => None,
        }
    }
}

impl fmt::Display for TargetCommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unserialized => write!(f, "unserialized"),
            Self::PerUser => write!(f, "per_user"),
        }
    }
}

/// Keeps one active goal and one active target per user
pub struct TargetVersionManager {
    repository: Arc<dyn NutritionRepository>,
    mode: TargetCommitMode,
    user_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl TargetVersionManager {
    /// Create a manager over a repository
    #[must_use]
    pub fn new(repository: Arc<dyn NutritionRepository>, mode: TargetCommitMode) -> Self {
        Self {
            repository,
            mode,
            user_locks: DashMap::new(),
        }
    }

    /// Configured commit mode
    #[must_use]
    pub const fn mode(&self) -> TargetCommitMode {
        self.mode
    }

    /// Make `candidate` the user's only active target, referencing `goal_id`
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Persistence`] if either store call fails. A
    /// failed insert after a successful deactivate leaves the user with no
    /// active target.
    #[instrument(skip(self, candidate), fields(mode = %self.mode))]
    pub async fn commit(
        &self,
        user_id: Uuid,
        candidate: NutritionTarget,
        goal_id: Uuid,
    ) -> Result<NutritionTarget, TargetError> {
        let target = NutritionTarget {
            user_id,
            goal_id,
            is_active: true,
            ..candidate
        };

        let _guard = self.serialize(user_id).await;
        let deactivated = self.repository.deactivate_targets(user_id).await?;
        self.repository.insert_target(&target).await?;

        debug!(target_id = %target.id, deactivated, "Committed nutrition target");
        Ok(target)
    }

    /// Make `candidate` the user's only active goal
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Persistence`] if either store call fails
    #[instrument(skip(self, candidate), fields(mode = %self.mode))]
    pub async fn activate_goal(&self, user_id: Uuid, candidate: Goal) -> Result<Goal, TargetError> {
        let goal = Goal {
            user_id,
            is_active: true,
            ..candidate
        };

        let _guard = self.serialize(user_id).await;
        let deactivated = self.repository.deactivate_goals(user_id).await?;
        self.repository.insert_goal(&goal).await?;

        debug!(goal_id = %goal.id, deactivated, "Activated fitness goal");
        Ok(goal)
    }

    /// Current active target
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Persistence`] if the lookup fails
    pub async fn active_target(&self, user_id: Uuid) -> Result<Option<NutritionTarget>, TargetError> {
        Ok(self.repository.get_active_target(user_id).await?)
    }

    /// Users with a commit in flight or waiting
    #[must_use]
    pub fn tracked_users(&self) -> usize {
        self.user_locks.len()
    }

    /// Acquire the user's lock in `PerUser` mode
    async fn serialize(&self, user_id: Uuid) -> Option<UserLockGuard<'_>> {
        match self.mode {
            TargetCommitMode::Unserialized => None,
            TargetCommitMode::PerUser => {
                let lock = self
                    .user_locks
                    .entry(user_id)
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone();
                Some(UserLockGuard {
                    locks: &self.user_locks,
                    user_id,
                    guard: Some(lock.lock_owned().await),
                })
            }
        }
    }
}

/// Held for one commit; drops the user's map entry once nobody else holds it
struct UserLockGuard<'a> {
    locks: &'a DashMap<Uuid, Arc<Mutex<()>>>,
    user_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        // Release first so the map entry is the last reference when idle
        drop(self.guard.take());
        self.locks
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl fmt::Debug for TargetVersionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetVersionManager")
            .field("mode", &self.mode)
            .field("tracked_users", &self.user_locks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_mode_parse() {
        assert_eq!(
            TargetCommitMode::parse("Per_User"),
            Some(TargetCommitMode::PerUser)
        );
        assert_eq!(
            TargetCommitMode::parse("unserialized"),
            Some(TargetCommitMode::Unserialized)
        );
        assert_eq!(TargetCommitMode::parse("global"), None);
        assert_eq!(TargetCommitMode::default().to_string(), "unserialized");
    }
}
