// ABOUTME: Profile table queries for the SQLite store
// ABOUTME: One row per user, created or updated in place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use macro_core::models::{FitnessLevel, Gender, Profile};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{invalid_enum, parse_uuid, Database};
use crate::errors::DatabaseError;

impl Database {
    /// Load a user's profile
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row holds invalid values
    pub async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT user_id, full_name, age, gender, height_cm, current_weight_kg,
                   fitness_level, created_at, updated_at
            FROM user_profiles
            WHERE user_id = ?1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    /// Insert or update a profile, keeping the original `created_at`
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn upsert_user_profile(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO user_profiles (
                user_id, full_name, age, gender, height_cm, current_weight_kg,
                fitness_level, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(user_id) DO UPDATE SET
                full_name = excluded.full_name,
                age = excluded.age,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                current_weight_kg = excluded.current_weight_kg,
                fitness_level = excluded.fitness_level,
                updated_at = excluded.updated_at
            ",
        )
        .bind(profile.user_id.to_string())
        .bind(profile.full_name.as_deref())
        .bind(profile.age.map(i64::from))
        .bind(profile.gender.map(Gender::as_str))
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.fitness_level.map(FitnessLevel::as_str))
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(self.pool())
        .await?;

        self.get_user_profile(profile.user_id)
            .await?
            .ok_or_else(|| DatabaseError::QueryError {
                context: format!("profile for {} missing after upsert", profile.user_id),
            })
    }

    fn row_to_profile(row: &SqliteRow) -> Result<Profile, DatabaseError> {
        let user_id: String = row.try_get("user_id")?;
        let age: Option<i64> = row.try_get("age")?;
        let gender: Option<String> = row.try_get("gender")?;
        let fitness_level: Option<String> = row.try_get("fitness_level")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        Ok(Profile {
            user_id: parse_uuid("user_id", &user_id)?,
            full_name: row.try_get("full_name")?,
            age: age
                .map(|a| {
                    u32::try_from(a).map_err(|_| DatabaseError::InvalidData {
                        column: "age".to_owned(),
                        reason: format!("{a} out of range"),
                    })
                })
                .transpose()?,
            gender: gender
                .map(|g| Gender::parse(&g).ok_or_else(|| invalid_enum("gender", &g)))
                .transpose()?,
            height_cm: row.try_get("height_cm")?,
            weight_kg: row.try_get("current_weight_kg")?,
            fitness_level: fitness_level
                .map(|f| FitnessLevel::parse(&f).ok_or_else(|| invalid_enum("fitness_level", &f)))
                .transpose()?,
            created_at,
            updated_at,
        })
    }
}
