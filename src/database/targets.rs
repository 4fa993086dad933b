// ABOUTME: Nutrition target table queries for the SQLite store
// ABOUTME: Immutable target rows; only is_active ever changes after insert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use macro_core::models::{NutritionTarget, TargetSource};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{invalid_enum, parse_uuid, Database};
use crate::errors::DatabaseError;

const TARGET_COLUMNS: &str = "id, user_id, goal_id, daily_calories, daily_protein_g, daily_carbs_g, \
     daily_fats_g, daily_fiber_g, daily_water_ml, notes, source, is_active, created_at";

impl Database {
    /// Most recently created active target
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row holds invalid values
    pub async fn get_active_nutrition_target(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NutritionTarget>, DatabaseError> {
        let sql = format!(
            "SELECT {TARGET_COLUMNS} FROM nutrition_targets \
             WHERE user_id = ?1 AND is_active = 1 \
             ORDER BY created_at DESC, rowid DESC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(Self::row_to_target).transpose()
    }

    /// Full target history, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row holds invalid values
    pub async fn list_nutrition_targets(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NutritionTarget>, DatabaseError> {
        let sql = format!(
            "SELECT {TARGET_COLUMNS} FROM nutrition_targets \
             WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(Self::row_to_target).collect()
    }

    /// Deactivate every target of the user, returning the number of rows touched
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn deactivate_nutrition_targets(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "UPDATE nutrition_targets SET is_active = 0 WHERE user_id = ?1 AND is_active = 1",
        )
        .bind(user_id.to_string())
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert a target row
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn insert_nutrition_target(
        &self,
        target: &NutritionTarget,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO nutrition_targets (
                id, user_id, goal_id, daily_calories, daily_protein_g, daily_carbs_g,
                daily_fats_g, daily_fiber_g, daily_water_ml, notes, source, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ",
        )
        .bind(target.id.to_string())
        .bind(target.user_id.to_string())
        .bind(target.goal_id.to_string())
        .bind(i64::from(target.daily_calories))
        .bind(target.daily_protein_g)
        .bind(target.daily_carbs_g)
        .bind(target.daily_fats_g)
        .bind(target.daily_fiber_g)
        .bind(target.daily_water_ml)
        .bind(&target.notes)
        .bind(target.source.as_str())
        .bind(target.is_active)
        .bind(target.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    fn row_to_target(row: &SqliteRow) -> Result<NutritionTarget, DatabaseError> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let goal_id: String = row.try_get("goal_id")?;
        let calories: i64 = row.try_get("daily_calories")?;
        let source: String = row.try_get("source")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(NutritionTarget {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            goal_id: parse_uuid("goal_id", &goal_id)?,
            daily_calories: u32::try_from(calories).map_err(|_| DatabaseError::InvalidData {
                column: "daily_calories".to_owned(),
                reason: format!("{calories} out of range"),
            })?,
            daily_protein_g: row.try_get("daily_protein_g")?,
            daily_carbs_g: row.try_get("daily_carbs_g")?,
            daily_fats_g: row.try_get("daily_fats_g")?,
            daily_fiber_g: row.try_get("daily_fiber_g")?,
            daily_water_ml: row.try_get("daily_water_ml")?,
            notes: row.try_get("notes")?,
            source: TargetSource::parse(&source).ok_or_else(|| invalid_enum("source", &source))?,
            is_active: row.try_get("is_active")?,
            created_at,
        })
    }
}
