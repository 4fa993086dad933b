// ABOUTME: Fitness goal model driving calorie adjustment and activity multipliers
// ABOUTME: Goal record plus GoalType and ActivityLevel enumerations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the user is training for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Caloric deficit
    WeightLoss,
    /// Caloric surplus
    MuscleGain,
    /// Caloric balance
    Maintenance,
}

impl GoalType {
    /// Stored/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::MuscleGain => "muscle_gain",
            Self::Maintenance => "maintenance",
        }
    }

    /// Parse a stored/wire value
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weight_loss" => Some(Self::WeightLoss),
            "muscle_gain" => Some(Self::MuscleGain),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    LightlyActive,
    /// 3-5 days/week
    ModeratelyActive,
    /// 6-7 days/week
    VeryActive,
    /// Hard daily training or physical job
    ExtremelyActive,
}

impl ActivityLevel {
    /// Stored/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly_active",
            Self::ModeratelyActive => "moderately_active",
            Self::VeryActive => "very_active",
            Self::ExtremelyActive => "extremely_active",
        }
    }

    /// Parse a stored/wire value, `None` when unrecognized
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Some(Self::Sedentary),
            "lightly_active" => Some(Self::LightlyActive),
            "moderately_active" => Some(Self::ModeratelyActive),
            "very_active" => Some(Self::VeryActive),
            "extremely_active" => Some(Self::ExtremelyActive),
            _ => None,
        }
    }
}

/// A fitness goal
///
/// At most one goal per user has `is_active = true`. Older goals are kept as
/// history. `activity_level` is stored as supplied so an unrecognized value
/// still reaches the advisory service verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Goal id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Goal type
    pub goal_type: GoalType,
    /// Desired body weight in kilograms
    pub target_weight_kg: Option<f64>,
    /// Declared activity level (free text, see [`ActivityLevel::parse`])
    pub activity_level: Option<String>,
    /// Free-form physique label ("athletic", "lean", ...)
    pub target_physique: Option<String>,
    /// Whether this is the user's current goal
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Build a new active goal candidate
    #[must_use]
    pub fn new(
        user_id: Uuid,
        goal_type: GoalType,
        target_weight_kg: Option<f64>,
        activity_level: Option<String>,
        target_physique: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            goal_type,
            target_weight_kg,
            activity_level,
            target_physique,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Recognized activity level, if any
    #[must_use]
    pub fn parsed_activity_level(&self) -> Option<ActivityLevel> {
        self.activity_level.as_deref().and_then(ActivityLevel::parse)
    }
}
