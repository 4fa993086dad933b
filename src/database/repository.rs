// ABOUTME: Repository trait abstracting the store behind the nutrition core
// ABOUTME: Profile, goal, and target operations with the SQLite implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use macro_core::models::{Goal, NutritionTarget, Profile};
use uuid::Uuid;

use super::Database;
use crate::errors::DatabaseError;

/// Store operations used by the version manager and recalculation trigger
///
/// Each call is individually atomic; nothing here spans more than one statement.
#[async_trait]
pub trait NutritionRepository: Send + Sync {
    /// Profile for a user, if one was saved
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError>;

    /// Create or update a user's profile, returning the stored row
    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, DatabaseError>;

    /// Most recent active goal
    async fn get_active_goal(&self, user_id: Uuid) -> Result<Option<Goal>, DatabaseError>;

    /// Mark every goal of the user inactive
    async fn deactivate_goals(&self, user_id: Uuid) -> Result<u64, DatabaseError>;

    /// Insert a goal row as given
    async fn insert_goal(&self, goal: &Goal) -> Result<(), DatabaseError>;

    /// Mark every target of the user inactive
    async fn deactivate_targets(&self, user_id: Uuid) -> Result<u64, DatabaseError>;

    /// Insert a target row as given
    async fn insert_target(&self, target: &NutritionTarget) -> Result<(), DatabaseError>;

    /// Most recent active target
    async fn get_active_target(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NutritionTarget>, DatabaseError>;

    /// Every target of the user, newest first
    async fn list_targets(&self, user_id: Uuid) -> Result<Vec<NutritionTarget>, DatabaseError>;
}

#[async_trait]
impl NutritionRepository for Database {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        self.get_user_profile(user_id).await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        self.upsert_user_profile(profile).await
    }

    async fn get_active_goal(&self, user_id: Uuid) -> Result<Option<Goal>, DatabaseError> {
        self.get_active_fitness_goal(user_id).await
    }

    async fn deactivate_goals(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        self.deactivate_fitness_goals(user_id).await
    }

    async fn insert_goal(&self, goal: &Goal) -> Result<(), DatabaseError> {
        self.insert_fitness_goal(goal).await
    }

    async fn deactivate_targets(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        self.deactivate_nutrition_targets(user_id).await
    }

    async fn insert_target(&self, target: &NutritionTarget) -> Result<(), DatabaseError> {
        self.insert_nutrition_target(target).await
    }

    async fn get_active_target(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NutritionTarget>, DatabaseError> {
        self.get_active_nutrition_target(user_id).await
    }

    async fn list_targets(&self, user_id: Uuid) -> Result<Vec<NutritionTarget>, DatabaseError> {
        self.list_nutrition_targets(user_id).await
    }
}
