// ABOUTME: Body profile model used as input to nutrition target calculation
// ABOUTME: Profile record plus Gender and FitnessLevel enumerations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gender as recorded on the profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other or undisclosed
    Other,
}

impl Gender {
    /// Stored/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    /// Parse a stored/wire value
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    /// New to training
    Beginner,
    /// Trains regularly
    Intermediate,
    /// Experienced athlete
    Advanced,
}

impl FitnessLevel {
    /// Stored/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse a stored/wire value
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// A user's body profile
///
/// Exactly one per user, updated in place. Every attribute is optional in
/// storage; completeness is checked only when a target is calculated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Owning user
    pub user_id: Uuid,
    /// Display name
    pub full_name: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Gender
    pub gender: Option<Gender>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Current body weight in kilograms
    #[serde(rename = "current_weight_kg")]
    pub weight_kg: Option<f64>,
    /// Training experience
    pub fitness_level: Option<FitnessLevel>,
    /// First save
    pub created_at: DateTime<Utc>,
    /// Most recent save
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create an empty profile for a user
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            full_name: None,
            age: None,
            gender: None,
            height_cm: None,
            weight_kg: None,
            fitness_level: None,
            created_at: now,
            updated_at: now,
        }
    }
}
