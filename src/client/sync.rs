// ABOUTME: Caller-side profile and goal sync against the user save endpoints
// ABOUTME: Applies local edits optimistically, retries each save, and flags unconfirmed state on exhaustion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Profile sync client
//!
//! The onboarding screens keep a flat set of user details with short goal
//! names (`lose`, `gain`, `maintain`). A sync maps those onto the profile and
//! goal save contracts, posts the profile first and the goal second, and
//! retries each request with [`RetryPolicy`] backoff.

use std::time::Duration;

use macro_core::models::{ActivityLevel, FitnessLevel, Gender, GoalType};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::optimistic::OptimisticState;
use super::retry::{retry_with_backoff, RetryPolicy};
use crate::auth::USER_ID_HEADER;
use crate::errors::AppError;

const SERVICE_NAME: &str = "macro-tracker-api";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TARGET_PHYSIQUE: &str = "athletic";

/// User details as edited on the client
///
/// Every field is optional so the same shape carries both full state and a
/// partial edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDetails {
    /// Display name
    pub full_name: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Gender
    pub gender: Option<Gender>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Activity level as selected
    pub activity_level: Option<String>,
    /// Short goal name: `lose`, `gain`, or anything else for maintenance
    pub goal: Option<String>,
}

impl UserDetails {
    /// Overlay the fields set in `edit`
    #[must_use]
    pub fn merged_with(&self, edit: &Self) -> Self {
        Self {
            full_name: edit.full_name.clone().or_else(|| self.full_name.clone()),
            age: edit.age.or(self.age),
            gender: edit.gender.or(self.gender),
            height_cm: edit.height_cm.or(self.height_cm),
            weight_kg: edit.weight_kg.or(self.weight_kg),
            activity_level: edit
                .activity_level
                .clone()
                .or_else(|| self.activity_level.clone()),
            goal: edit.goal.clone().or_else(|| self.goal.clone()),
        }
    }

    /// Whether saving `self` as an edit touches the goal
    #[must_use]
    pub const fn touches_goal(&self) -> bool {
        self.goal.is_some() || self.activity_level.is_some()
    }
}

/// Body sent to `POST /api/user/profile`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfilePayload {
    /// Display name
    pub full_name: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Wire gender value
    pub gender: Option<&'static str>,
    /// Body weight in kilograms
    pub current_weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Derived from the activity level
    pub fitness_level: &'static str,
}

impl ProfilePayload {
    /// Map client details onto the profile contract
    #[must_use]
    pub fn from_details(details: &UserDetails) -> Self {
        Self {
            full_name: details.full_name.clone(),
            age: details.age,
            gender: details.gender.map(Gender::as_str),
            current_weight_kg: details.weight_kg,
            height_cm: details.height_cm,
            fitness_level: fitness_level_for(details.activity_level.as_deref()).as_str(),
        }
    }
}

/// Body sent to `POST /api/user/goals`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalPayload {
    /// Wire goal type
    pub goal_type: &'static str,
    /// Physique label
    pub target_physique: &'static str,
    /// Desired body weight in kilograms
    pub target_weight_kg: Option<f64>,
    /// Activity level as selected
    pub activity_level: Option<String>,
}

impl GoalPayload {
    /// Map client details onto the goal contract
    ///
    /// The client has no separate target weight field, so the current weight
    /// is sent.
    #[must_use]
    pub fn from_details(details: &UserDetails) -> Self {
        Self {
            goal_type: goal_type_for(details.goal.as_deref()).as_str(),
            target_physique: DEFAULT_TARGET_PHYSIQUE,
            target_weight_kg: details.weight_kg,
            activity_level: details.activity_level.clone(),
        }
    }
}

/// Fitness level implied by the selected activity level
#[must_use]
pub fn fitness_level_for(activity_level: Option<&str>) -> FitnessLevel {
    match activity_level.and_then(ActivityLevel::parse) {
        Some(ActivityLevel::Sedentary | ActivityLevel::LightlyActive) => FitnessLevel::Beginner,
        Some(ActivityLevel::VeryActive | ActivityLevel::ExtremelyActive) => FitnessLevel::Advanced,
        Some(ActivityLevel::ModeratelyActive) | None => FitnessLevel::Intermediate,
    }
}

/// Goal type for a short client goal name
#[must_use]
pub fn goal_type_for(goal: Option<&str>) -> GoalType {
    match goal.map(|g| g.trim().to_lowercase()).as_deref() {
        Some("lose") => GoalType::WeightLoss,
        Some("gain") => GoalType::MuscleGain,
        _ => GoalType::Maintenance,
    }
}

/// HTTP client for the user save endpoints
#[derive(Debug, Clone)]
pub struct ProfileSyncClient {
    http: reqwest::Client,
    base_url: String,
    user_id: Uuid,
    policy: RetryPolicy,
}

impl ProfileSyncClient {
    /// Create a client for `user_id` against the server at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, user_id: Uuid) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            user_id,
            policy: RetryPolicy::default(),
        })
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Save the profile, retrying on failure
    ///
    /// # Errors
    ///
    /// Returns the last failure once retries are exhausted
    pub async fn save_profile(&self, payload: &ProfilePayload) -> Result<(), AppError> {
        retry_with_backoff(&self.policy, "save_profile", move || {
            self.post_json("/api/user/profile", payload)
        })
        .await
    }

    /// Save the goal, retrying on failure
    ///
    /// # Errors
    ///
    /// Returns the last failure once retries are exhausted
    pub async fn save_goal(&self, payload: &GoalPayload) -> Result<(), AppError> {
        retry_with_backoff(&self.policy, "save_goal", move || {
            self.post_json("/api/user/goals", payload)
        })
        .await
    }

    /// Apply `edit` locally, then push it to the server
    ///
    /// The merged details are shown right away. On success the state is
    /// confirmed; on failure it stays applied but unconfirmed so the caller
    /// can surface the error or roll back.
    ///
    /// # Errors
    ///
    /// Returns the failure of the profile or goal save
    pub async fn sync(
        &self,
        state: &mut OptimisticState<UserDetails>,
        edit: &UserDetails,
    ) -> Result<(), AppError> {
        let merged = state.current().merged_with(edit);
        state.apply(merged.clone());

        let result = self.push(&merged, edit.touches_goal()).await;
        match &result {
            Ok(()) => {
                state.confirm();
                info!(user_id = %self.user_id, "User details synced");
            }
            Err(e) => {
                state.mark_unconfirmed();
                warn!(user_id = %self.user_id, error = %e, "User details not saved");
            }
        }
        result
    }

    async fn push(&self, details: &UserDetails, include_goal: bool) -> Result<(), AppError> {
        self.save_profile(&ProfilePayload::from_details(details)).await?;
        if include_goal {
            self.save_goal(&GoalPayload::from_details(details)).await?;
        }
        Ok(())
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header(USER_ID_HEADER, self.user_id.to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::external_unavailable(SERVICE_NAME, format!("{path}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::external_service(
            SERVICE_NAME,
            format!("{path} returned {status}: {body}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitness_level_from_activity() {
        assert_eq!(fitness_level_for(Some("sedentary")), FitnessLevel::Beginner);
        assert_eq!(fitness_level_for(Some("lightly_active")), FitnessLevel::Beginner);
        assert_eq!(fitness_level_for(Some("moderately_active")), FitnessLevel::Intermediate);
        assert_eq!(fitness_level_for(Some("extremely_active")), FitnessLevel::Advanced);
        assert_eq!(fitness_level_for(None), FitnessLevel::Intermediate);
    }

    #[test]
    fn test_short_goal_names() {
        assert_eq!(goal_type_for(Some("lose")), GoalType::WeightLoss);
        assert_eq!(goal_type_for(Some("gain")), GoalType::MuscleGain);
        assert_eq!(goal_type_for(Some("maintain")), GoalType::Maintenance);
        assert_eq!(goal_type_for(None), GoalType::Maintenance);
    }

    #[test]
    fn test_goal_payload_uses_current_weight() {
        let details = UserDetails {
            weight_kg: Some(81.5),
            goal: Some("gain".to_owned()),
            activity_level: Some("very_active".to_owned()),
            ..UserDetails::default()
        };
        let payload = GoalPayload::from_details(&details);
        assert_eq!(payload.goal_type, "muscle_gain");
        assert_eq!(payload.target_physique, "athletic");
        assert_eq!(payload.target_weight_kg, Some(81.5));
        assert_eq!(payload.activity_level.as_deref(), Some("very_active"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let base = UserDetails {
            full_name: Some("Sam".to_owned()),
            age: Some(30),
            ..UserDetails::default()
        };
        let edit = UserDetails {
            age: Some(31),
            ..UserDetails::default()
        };
        let merged = base.merged_with(&edit);
        assert_eq!(merged.full_name.as_deref(), Some("Sam"));
        assert_eq!(merged.age, Some(31));
        assert!(!edit.touches_goal());
    }
}
