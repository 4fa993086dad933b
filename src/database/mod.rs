// ABOUTME: SQLite store for profiles, fitness goals, and versioned nutrition targets
// ABOUTME: Database handle over an sqlx pool with idempotent table migrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! The store serializes individual statements but never wraps multi-step
//! sequences in a transaction; version commits are coordinated above it.

mod goals;
mod profiles;
/// Persistence operations consumed by the nutrition core
pub mod repository;
mod targets;

pub use repository::NutritionRepository;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseUrl;
use crate::errors::DatabaseError;

/// Connections kept for file-backed databases
const FILE_POOL_SIZE: u32 = 5;

/// Database manager for profile, goal, and target storage
#[derive(Clone, Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect and run migrations
    ///
    /// In-memory databases use a single connection so every query sees the
    /// same schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(database_url: &DatabaseUrl) -> Result<Self, DatabaseError> {
        if let DatabaseUrl::SQLite { path } = database_url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::ConnectionError {
                    context: format!("cannot create {}: {e}", parent.display()),
                })?;
            }
        }

        let connection_string = database_url.to_connection_string();
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| DatabaseError::ConnectionError {
                context: format!("invalid database url {connection_string}: {e}"),
            })?
            .create_if_missing(true);

        let max_connections = if database_url.is_memory() {
            1
        } else {
            FILE_POOL_SIZE
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError {
                context: e.to_string(),
            })?;

        let db = Self { pool };
        db.migrate().await?;

        info!(database = %database_url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        self.migrate_profiles().await?;
        self.migrate_goals().await?;
        self.migrate_targets().await?;
        Ok(())
    }

    async fn migrate_profiles(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                full_name TEXT,
                age INTEGER,
                gender TEXT CHECK (gender IN ('male', 'female', 'other')),
                height_cm REAL,
                current_weight_kg REAL,
                fitness_level TEXT CHECK (fitness_level IN ('beginner', 'intermediate', 'advanced')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_goals(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS fitness_goals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                goal_type TEXT NOT NULL CHECK (goal_type IN ('weight_loss', 'muscle_gain', 'maintenance')),
                target_weight_kg REAL,
                activity_level TEXT,
                target_physique TEXT,
                is_active BOOLEAN NOT NULL DEFAULT true,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_fitness_goals_user_active ON fitness_goals(user_id, is_active)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_targets(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS nutrition_targets (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                goal_id TEXT NOT NULL,
                daily_calories INTEGER NOT NULL,
                daily_protein_g REAL NOT NULL,
                daily_carbs_g REAL NOT NULL,
                daily_fats_g REAL NOT NULL,
                daily_fiber_g REAL NOT NULL,
                daily_water_ml REAL NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                source TEXT NOT NULL CHECK (source IN ('advisory', 'formula')),
                is_active BOOLEAN NOT NULL DEFAULT true,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_nutrition_targets_user_active ON nutrition_targets(user_id, is_active)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Parse a UUID stored as TEXT
pub(crate) fn parse_uuid(column: &str, raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| DatabaseError::InvalidData {
        column: column.to_owned(),
        reason: e.to_string(),
    })
}

/// Build an `InvalidData` error for an unrecognized enum value
pub(crate) fn invalid_enum(column: &str, raw: &str) -> DatabaseError {
    DatabaseError::InvalidData {
        column: column.to_owned(),
        reason: format!("unrecognized value '{raw}'"),
    }
}
