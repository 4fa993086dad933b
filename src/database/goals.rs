// ABOUTME: Fitness goal table queries for the SQLite store
// ABOUTME: Goal history with an is_active flag flipped by the version manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use macro_core::models::{Goal, GoalType};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{invalid_enum, parse_uuid, Database};
use crate::errors::DatabaseError;

impl Database {
    /// Most recently created active goal
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row holds invalid values
    pub async fn get_active_fitness_goal(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Goal>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, goal_type, target_weight_kg, activity_level,
                   target_physique, is_active, created_at
            FROM fitness_goals
            WHERE user_id = ?1 AND is_active = 1
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(Self::row_to_goal).transpose()
    }

    /// Deactivate every goal of the user, returning the number of rows touched
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn deactivate_fitness_goals(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result =
            sqlx::query("UPDATE fitness_goals SET is_active = 0 WHERE user_id = ?1 AND is_active = 1")
                .bind(user_id.to_string())
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected())
    }

    /// Insert a goal row
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn insert_fitness_goal(&self, goal: &Goal) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO fitness_goals (
                id, user_id, goal_type, target_weight_kg, activity_level,
                target_physique, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(goal.goal_type.as_str())
        .bind(goal.target_weight_kg)
        .bind(goal.activity_level.as_deref())
        .bind(goal.target_physique.as_deref())
        .bind(goal.is_active)
        .bind(goal.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    fn row_to_goal(row: &SqliteRow) -> Result<Goal, DatabaseError> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let goal_type: String = row.try_get("goal_type")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(Goal {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            goal_type: GoalType::parse(&goal_type)
                .ok_or_else(|| invalid_enum("goal_type", &goal_type))?,
            target_weight_kg: row.try_get("target_weight_kg")?,
            activity_level: row.try_get("activity_level")?,
            target_physique: row.try_get("target_physique")?,
            is_active: row.try_get("is_active")?,
            created_at,
        })
    }
}
