// ABOUTME: User profile and fitness goal route handlers
// ABOUTME: Saves are primary; target recalculation follows in a spawned task and never changes the response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! User routes
//!
//! All handlers identify the caller from the trusted session header. A save
//! responds with the stored record; whether the follow-up recalculation
//! committed a new target is only visible through `GET /profile`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    handler::Handler,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use macro_core::models::{FitnessLevel, Gender, Goal, GoalType, NutritionTarget, Profile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::auth::authenticate_user;
use crate::errors::AppError;
use crate::server::ServerResources;

/// Body of `POST /profile`
///
/// Numeric fields accept numbers or numeric strings; empty or non-numeric
/// height and weight are stored as null.
#[derive(Debug, Default, Deserialize)]
pub struct SaveProfileRequest {
    /// Display name
    pub full_name: Option<String>,
    /// Age in years
    #[serde(default)]
    pub age: Option<Value>,
    /// `male`, `female`, or `other`
    pub gender: Option<String>,
    /// Height in centimeters
    #[serde(default)]
    pub height_cm: Option<Value>,
    /// Body weight in kilograms
    #[serde(default)]
    pub current_weight_kg: Option<Value>,
    /// `beginner`, `intermediate`, or `advanced`
    pub fitness_level: Option<String>,
}

/// Body of `POST /goals`
#[derive(Debug, Default, Deserialize)]
pub struct SaveGoalRequest {
    /// `weight_loss`, `muscle_gain`, or `maintenance`
    pub goal_type: Option<String>,
    /// Free-form physique label
    pub target_physique: Option<String>,
    /// Desired body weight in kilograms
    #[serde(default)]
    pub target_weight_kg: Option<Value>,
    /// Declared activity level
    pub activity_level: Option<String>,
}

/// Body of `GET /profile`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileOverview {
    /// Stored profile
    pub profile: Option<Profile>,
    /// Active goal
    pub goals: Option<Goal>,
    /// Active nutrition target
    pub nutrition: Option<NutritionTarget>,
}

/// User profile and goal routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes; `read_timeout` applies to the GET handlers only
    pub fn routes(resources: Arc<ServerResources>, read_timeout: Duration) -> Router {
        let timeout = TimeoutLayer::new(read_timeout);

        Router::new()
            .route(
                "/api/user/profile",
                get(Self::handle_get_profile.layer(timeout.clone()))
                    .post(Self::handle_save_profile),
            )
            .route("/api/user/goals", post(Self::handle_save_goal))
            .route(
                "/api/user/targets",
                get(Self::handle_list_targets.layer(timeout)),
            )
            .with_state(resources)
    }

    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<ProfileOverview>, AppError> {
        let user_id = authenticate_user(&headers)?;
        let repository = &resources.repository;

        Ok(Json(ProfileOverview {
            profile: repository.get_profile(user_id).await?,
            goals: repository.get_active_goal(user_id).await?,
            nutrition: repository.get_active_target(user_id).await?,
        }))
    }

    async fn handle_save_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SaveProfileRequest>,
    ) -> Result<Json<Profile>, AppError> {
        let user_id = authenticate_user(&headers)?;

        let existing = resources.repository.get_profile(user_id).await?;
        let mut profile = existing.unwrap_or_else(|| Profile::new(user_id));
        profile.full_name = non_empty(request.full_name);
        profile.age = parse_age(request.age.as_ref())?;
        profile.gender = parse_enum(request.gender, "gender", Gender::parse)?;
        profile.height_cm = lenient_measure(request.height_cm.as_ref());
        profile.weight_kg = lenient_measure(request.current_weight_kg.as_ref());
        profile.fitness_level =
            parse_enum(request.fitness_level, "fitness_level", FitnessLevel::parse)?;
        profile.updated_at = Utc::now();

        let saved = resources.repository.upsert_profile(&profile).await?;
        info!(user_id = %user_id, "Profile saved");

        resources.recalculation.on_profile_saved(user_id).await;

        Ok(Json(saved))
    }

    async fn handle_save_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SaveGoalRequest>,
    ) -> Result<Json<Goal>, AppError> {
        let user_id = authenticate_user(&headers)?;

        let goal_type = parse_enum(request.goal_type, "goal_type", GoalType::parse)?
            .ok_or_else(|| AppError::missing_field("goal_type"))?;
        let candidate = Goal::new(
            user_id,
            goal_type,
            lenient_measure(request.target_weight_kg.as_ref()),
            non_empty(request.activity_level),
            non_empty(request.target_physique),
        );

        let saved = resources.versions.activate_goal(user_id, candidate).await?;
        info!(user_id = %user_id, goal_id = %saved.id, "Fitness goal activated");

        resources.recalculation.on_goal_activated(user_id).await;

        Ok(Json(saved))
    }

    async fn handle_list_targets(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<Vec<NutritionTarget>>, AppError> {
        let user_id = authenticate_user(&headers)?;
        Ok(Json(resources.repository.list_targets(user_id).await?))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Blank means unset; anything else must name a variant
fn parse_enum<T>(
    value: Option<String>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, AppError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| AppError::invalid_input(format!("Invalid {field}: '{raw}'"))),
    }
}

/// Positive number or numeric string, otherwise unset
fn lenient_measure(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (number.is_finite() && number > 0.0).then_some(number)
}

fn parse_age(value: Option<&Value>) -> Result<Option<u32>, AppError> {
    let invalid = || AppError::invalid_input("Invalid age: expected a whole number of years");

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<u32>().map(Some).map_err(|_| invalid()),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|a| u32::try_from(a).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}
