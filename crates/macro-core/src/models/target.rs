// ABOUTME: Daily nutrition target model produced by advisory or formula calculation
// ABOUTME: Immutable NutritionTarget rows, TargetValues candidates, and their provenance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a target's numbers came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// Parsed from the advisory (AI) service answer
    Advisory,
    /// Computed by the Mifflin-St Jeor formula fallback
    Formula,
}

impl TargetSource {
    /// Stored/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advisory => "advisory",
            Self::Formula => "formula",
        }
    }

    /// Parse a stored value
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "advisory" => Some(Self::Advisory),
            "formula" => Some(Self::Formula),
            _ => None,
        }
    }
}

/// A calculated but not yet persisted daily target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetValues {
    /// Daily energy (kcal)
    pub daily_calories: u32,
    /// Daily protein (g)
    pub daily_protein_g: f64,
    /// Daily carbohydrates (g)
    pub daily_carbs_g: f64,
    /// Daily fat (g)
    pub daily_fats_g: f64,
    /// Daily fiber (g)
    pub daily_fiber_g: f64,
    /// Daily water (ml)
    pub daily_water_ml: f64,
    /// Short explanation of the numbers
    pub notes: String,
}

/// A persisted daily target
///
/// Rows are never edited: a recalculation inserts a new row and flips
/// `is_active` off on the old ones, so the table is the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionTarget {
    /// Target id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Goal that was active when this target was computed
    pub goal_id: Uuid,
    /// Daily energy (kcal)
    pub daily_calories: u32,
    /// Daily protein (g)
    pub daily_protein_g: f64,
    /// Daily carbohydrates (g)
    pub daily_carbs_g: f64,
    /// Daily fat (g)
    pub daily_fats_g: f64,
    /// Daily fiber (g)
    pub daily_fiber_g: f64,
    /// Daily water (ml)
    pub daily_water_ml: f64,
    /// Short explanation of the numbers
    pub notes: String,
    /// Advisory or formula
    pub source: TargetSource,
    /// Whether this is the user's current target
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl NutritionTarget {
    /// Materialize a candidate into a new active row for `user_id`/`goal_id`
    #[must_use]
    pub fn from_values(
        user_id: Uuid,
        goal_id: Uuid,
        values: TargetValues,
        source: TargetSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            goal_id,
            daily_calories: values.daily_calories,
            daily_protein_g: values.daily_protein_g,
            daily_carbs_g: values.daily_carbs_g,
            daily_fats_g: values.daily_fats_g,
            daily_fiber_g: values.daily_fiber_g,
            daily_water_ml: values.daily_water_ml,
            notes: values.notes,
            source,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
