// ABOUTME: Best-effort target recalculation after profile and goal saves
// ABOUTME: Loads current profile and active goal, calculates, commits, and never propagates failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use macro_core::models::{NutritionTarget, TargetSource};
use tracing::{error, info, instrument, warn, Instrument};
use uuid::Uuid;

use super::{TargetCalculator, TargetError, TargetVersionManager};
use crate::database::NutritionRepository;

/// Why a recalculation did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The user has not saved a profile
    NoProfile,
    /// The user has no active goal
    NoActiveGoal,
}

/// What a recalculation did
#[derive(Debug)]
pub enum RecalculationOutcome {
    /// Prerequisites missing; nothing attempted
    Skipped(SkipReason),
    /// A new active target was stored
    Committed {
        /// The stored target
        target: NutritionTarget,
        /// Advisory or formula
        source: TargetSource,
    },
    /// Validation or persistence failed; the active target did not change
    /// (or, for a failed insert, no target is active)
    Failed(TargetError),
    /// Still running when the caller stopped waiting; the task finishes in
    /// the background and logs its own result
    Detached,
}

impl RecalculationOutcome {
    /// The committed target, if any
    #[must_use]
    pub const fn committed_target(&self) -> Option<&NutritionTarget> {
        match self {
            Self::Committed { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// How long a save waits for its recalculation by default
pub const DEFAULT_RECALCULATION_WAIT: Duration = Duration::from_secs(45);

/// Runs calculate-then-commit as a side effect of a successful save
///
/// Each run is a spawned task, so dropping the caller (a timed-out or
/// disconnected request) never cancels a commit between its deactivate and
/// insert calls.
#[derive(Clone)]
pub struct RecalculationTrigger {
    repository: Arc<dyn NutritionRepository>,
    calculator: Arc<TargetCalculator>,
    versions: Arc<TargetVersionManager>,
    wait: Duration,
}

impl RecalculationTrigger {
    /// Create a trigger
    #[must_use]
    pub fn new(
        repository: Arc<dyn NutritionRepository>,
        calculator: Arc<TargetCalculator>,
        versions: Arc<TargetVersionManager>,
    ) -> Self {
        Self {
            repository,
            calculator,
            versions,
            wait: DEFAULT_RECALCULATION_WAIT,
        }
    }

    /// Bound how long `on_*` calls wait before returning [`RecalculationOutcome::Detached`]
    #[must_use]
    pub const fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Call after a goal was activated
    pub async fn on_goal_activated(&self, user_id: Uuid) -> RecalculationOutcome {
        self.spawn_and_wait(user_id, "goal_saved").await
    }

    /// Call after a profile was saved; runs only when an active goal exists
    pub async fn on_profile_saved(&self, user_id: Uuid) -> RecalculationOutcome {
        self.spawn_and_wait(user_id, "profile_saved").await
    }

    async fn spawn_and_wait(&self, user_id: Uuid, trigger: &'static str) -> RecalculationOutcome {
        let this = self.clone();
        let task = tokio::spawn(
            async move { this.recalculate(user_id, trigger).await }.in_current_span(),
        );

        match tokio::time::timeout(self.wait, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!(user_id = %user_id, error = %e, "Recalculation task aborted");
                RecalculationOutcome::Detached
            }
            Err(_) => {
                warn!(
                    user_id = %user_id,
                    wait = ?self.wait,
                    "Recalculation still running; continuing in the background"
                );
                RecalculationOutcome::Detached
            }
        }
    }

    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    async fn recalculate(&self, user_id: Uuid, trigger: &'static str) -> RecalculationOutcome {
        let outcome = match self.try_recalculate(user_id).await {
            Ok(outcome) => outcome,
            Err(e) => RecalculationOutcome::Failed(e),
        };

        match &outcome {
            RecalculationOutcome::Skipped(reason) => {
                info!(?reason, "Recalculation skipped");
            }
            RecalculationOutcome::Committed { target, source } => {
                info!(
                    target_id = %target.id,
                    source = source.as_str(),
                    daily_calories = target.daily_calories,
                    "Nutrition target recalculated"
                );
            }
            RecalculationOutcome::Failed(e @ TargetError::Validation { .. }) => {
                warn!(error = %e, "Recalculation abandoned: incomplete profile or goal");
            }
            RecalculationOutcome::Failed(e) => {
                error!(error = %e, "Recalculation failed");
            }
            RecalculationOutcome::Detached => {}
        }

        outcome
    }

    async fn try_recalculate(&self, user_id: Uuid) -> Result<RecalculationOutcome, TargetError> {
        let Some(profile) = self.repository.get_profile(user_id).await? else {
            return Ok(RecalculationOutcome::Skipped(SkipReason::NoProfile));
        };
        let Some(goal) = self.repository.get_active_goal(user_id).await? else {
            return Ok(RecalculationOutcome::Skipped(SkipReason::NoActiveGoal));
        };

        let outcome = self.calculator.calculate(&profile, &goal).await?;
        let source = outcome.source();
        let target = self
            .versions
            .commit(user_id, outcome.into_target(), goal.id)
            .await?;

        Ok(RecalculationOutcome::Committed { target, source })
    }
}

impl std::fmt::Debug for RecalculationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecalculationTrigger")
            .field("calculator", &self.calculator)
            .field("versions", &self.versions)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}
