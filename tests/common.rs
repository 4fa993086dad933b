// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory stores, stub advisory providers, and record builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `macro_tracker_server`

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use macro_tracker_server::{
    config::DatabaseUrl,
    database::{Database, NutritionRepository},
    errors::{AppError, DatabaseError},
    llm::{ChatRequest, ChatResponse, LlmProvider},
    models::{FitnessLevel, Gender, Goal, GoalType, NutritionTarget, Profile},
    nutrition::AdvisoryClient,
};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// In-memory `SQLite` database with migrations applied
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&DatabaseUrl::Memory).await?)
}

// ============================================================================
// Record builders
// ============================================================================

/// Complete profile: 30 year old male, 180 cm, 80 kg
pub fn complete_profile(user_id: Uuid) -> Profile {
    Profile {
        full_name: Some("Test Athlete".to_owned()),
        age: Some(30),
        gender: Some(Gender::Male),
        height_cm: Some(180.0),
        weight_kg: Some(80.0),
        fitness_level: Some(FitnessLevel::Intermediate),
        ..Profile::new(user_id)
    }
}

/// Active muscle gain goal at `very_active`
pub fn muscle_gain_goal(user_id: Uuid) -> Goal {
    Goal::new(
        user_id,
        GoalType::MuscleGain,
        Some(85.0),
        Some("very_active".to_owned()),
        Some("athletic".to_owned()),
    )
}

/// Advisory answer wrapped in a fenced code block
pub const FENCED_ADVISORY_ANSWER: &str = "Based on your stats:\n```json\n{\n  \"daily_calories\": 2900,\n  \"daily_protein_g\": 190,\n  \"daily_carbs_g\": 330,\n  \"daily_fats_g\": 85,\n  \"daily_fiber_g\": 38,\n  \"daily_water_ml\": 3400,\n  \"notes\": \"Prioritize protein after training.\"\n}\n```\n";

// ============================================================================
// Stub advisory providers
// ============================================================================

/// What a [`StubProvider`] does on every call
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Answer with fixed text
    Reply(String),
    /// Fail as if the service were down
    Unavailable,
    /// Never answer within any reasonable timeout
    Hang,
}

/// LLM provider with scripted behavior and a call counter
#[derive(Debug)]
pub struct StubProvider {
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(StubBehavior::Reply(text.to_owned()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            StubBehavior::Reply(text) => Ok(ChatResponse {
                content: text.clone(),
                model: "stub-model".to_owned(),
                finish_reason: Some("STOP".to_owned()),
            }),
            StubBehavior::Unavailable => Err(AppError::external_unavailable(
                "stub",
                "connection refused",
            )),
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::external_unavailable("stub", "hung"))
            }
        }
    }
}

/// Advisory client over a stub with a short timeout
pub fn stub_advisory(provider: Arc<StubProvider>) -> AdvisoryClient {
    AdvisoryClient::new(provider, Duration::from_millis(200))
}

// ============================================================================
// In-memory repository
// ============================================================================

/// Repository kept in process memory
///
/// `pause_after_deactivate` holds every target commit between its deactivate
/// and insert calls so concurrent commits interleave deterministically.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    profiles: Mutex<HashMap<Uuid, Profile>>,
    goals: Mutex<Vec<Goal>>,
    targets: Mutex<Vec<NutritionTarget>>,
    pause_after_deactivate: Option<Duration>,
    fail_target_inserts: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_pause_after_deactivate(pause: Duration) -> Arc<Self> {
        Arc::new(Self {
            pause_after_deactivate: Some(pause),
            ..Self::default()
        })
    }

    pub fn fail_target_inserts(&self, fail: bool) {
        self.fail_target_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn active_targets(&self, user_id: Uuid) -> Vec<NutritionTarget> {
        self.targets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && t.is_active)
            .cloned()
            .collect()
    }

    pub fn target_count(&self, user_id: Uuid) -> usize {
        self.targets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .count()
    }

    pub fn active_goal_count(&self, user_id: Uuid) -> usize {
        self.goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id && g.is_active)
            .count()
    }
}

#[async_trait]
impl NutritionRepository for MemoryRepository {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile.clone());
        Ok(profile.clone())
    }

    async fn get_active_goal(&self, user_id: Uuid) -> Result<Option<Goal>, DatabaseError> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|g| g.user_id == user_id && g.is_active)
            .cloned())
    }

    async fn deactivate_goals(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let mut count = 0;
        for goal in self.goals.lock().unwrap().iter_mut() {
            if goal.user_id == user_id && goal.is_active {
                goal.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert_goal(&self, goal: &Goal) -> Result<(), DatabaseError> {
        self.goals.lock().unwrap().push(goal.clone());
        Ok(())
    }

    async fn deactivate_targets(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let count = {
            let mut targets = self.targets.lock().unwrap();
            let mut count = 0;
            for target in targets.iter_mut() {
                if target.user_id == user_id && target.is_active {
                    target.is_active = false;
                    count += 1;
                }
            }
            count
        };
        if let Some(pause) = self.pause_after_deactivate {
            tokio::time::sleep(pause).await;
        }
        Ok(count)
    }

    async fn insert_target(&self, target: &NutritionTarget) -> Result<(), DatabaseError> {
        if self.fail_target_inserts.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError {
                context: "insert nutrition target: disk full".to_owned(),
            });
        }
        self.targets.lock().unwrap().push(target.clone());
        Ok(())
    }

    async fn get_active_target(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NutritionTarget>, DatabaseError> {
        Ok(self
            .targets
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|t| t.user_id == user_id && t.is_active)
            .cloned())
    }

    async fn list_targets(&self, user_id: Uuid) -> Result<Vec<NutritionTarget>, DatabaseError> {
        Ok(self
            .targets
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}
