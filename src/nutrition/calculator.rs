// ABOUTME: Target calculator turning a profile and active goal into one target candidate
// ABOUTME: Tries the advisory path once and falls back to the formula on any advisory failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use macro_core::models::{
    ActivityLevel, FitnessLevel, Gender, Goal, GoalType, NutritionTarget, Profile, TargetSource,
    TargetValues,
};
use tracing::{info, instrument, warn};

use super::{parse_advisory_response, AdvisoryClient, FallbackCalculator, TargetError};

/// Validated calculation inputs drawn from a profile and goal
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInputs {
    /// Age in years
    pub age: u32,
    /// Gender
    pub gender: Gender,
    /// Height in centimeters
    pub height_cm: f64,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Training experience
    pub fitness_level: FitnessLevel,
    /// Goal type
    pub goal_type: GoalType,
    /// Declared activity level as supplied
    pub activity_level: String,
    /// Desired body weight
    pub target_weight_kg: Option<f64>,
    /// Physique label
    pub target_physique: Option<String>,
}

impl TargetInputs {
    /// Check that every required attribute is present and positive
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Validation`] listing every offending field
    pub fn from_records(profile: &Profile, goal: &Goal) -> Result<Self, TargetError> {
        let mut fields = Vec::new();

        let age = profile.age.filter(|a| *a > 0);
        let height_cm = profile.height_cm.filter(|h| h.is_finite() && *h > 0.0);
        let weight_kg = profile.weight_kg.filter(|w| w.is_finite() && *w > 0.0);
        let activity_level = goal
            .activity_level
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        if age.is_none() {
            fields.push("age");
        }
        if profile.gender.is_none() {
            fields.push("gender");
        }
        if height_cm.is_none() {
            fields.push("height_cm");
        }
        if weight_kg.is_none() {
            fields.push("current_weight_kg");
        }
        if profile.fitness_level.is_none() {
            fields.push("fitness_level");
        }
        if activity_level.is_none() {
            fields.push("activity_level");
        }

        match (
            age,
            profile.gender,
            height_cm,
            weight_kg,
            profile.fitness_level,
            activity_level,
        ) {
            (
                Some(age),
                Some(gender),
                Some(height_cm),
                Some(weight_kg),
                Some(fitness_level),
                Some(activity_level),
            ) => Ok(Self {
                age,
                gender,
                height_cm,
                weight_kg,
                fitness_level,
                goal_type: goal.goal_type,
                activity_level: activity_level.to_owned(),
                target_weight_kg: goal.target_weight_kg,
                target_physique: goal.target_physique.clone(),
            }),
            _ => Err(TargetError::Validation { fields }),
        }
    }

    /// Recognized activity level, `None` for free text the formula does not know
    #[must_use]
    pub fn activity_level(&self) -> Option<ActivityLevel> {
        ActivityLevel::parse(&self.activity_level)
    }
}

/// Result of a successful calculation
#[derive(Debug)]
pub enum TargetOutcome {
    /// Numbers came from the advisory service
    Advisory(NutritionTarget),
    /// Numbers came from the formula because the advisory path failed
    Fallback {
        /// Formula-based candidate
        target: NutritionTarget,
        /// Why the advisory path was abandoned
        reason: TargetError,
    },
}

impl TargetOutcome {
    /// The candidate regardless of origin
    #[must_use]
    pub const fn target(&self) -> &NutritionTarget {
        match self {
            Self::Advisory(target) | Self::Fallback { target, .. } => target,
        }
    }

    /// Consume into the candidate
    #[must_use]
    pub fn into_target(self) -> NutritionTarget {
        match self {
            Self::Advisory(target) | Self::Fallback { target, .. } => target,
        }
    }

    /// Where the numbers came from
    #[must_use]
    pub const fn source(&self) -> TargetSource {
        match self {
            Self::Advisory(_) => TargetSource::Advisory,
            Self::Fallback { .. } => TargetSource::Formula,
        }
    }
}

/// Entry point turning (profile, goal) into a target candidate
#[derive(Debug, Clone, Default)]
pub struct TargetCalculator {
    advisory: Option<AdvisoryClient>,
}

impl TargetCalculator {
    /// Calculator that consults the advisory service first
    #[must_use]
    pub const fn new(advisory: AdvisoryClient) -> Self {
        Self {
            advisory: Some(advisory),
        }
    }

    /// Calculator that always uses the formula
    #[must_use]
    pub const fn formula_only() -> Self {
        Self { advisory: None }
    }

    /// Whether an advisory service is wired in
    #[must_use]
    pub const fn has_advisory(&self) -> bool {
        self.advisory.is_some()
    }

    /// Produce one unpersisted candidate for the goal's user
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Validation`] when required fields are missing.
    /// Advisory and parsing failures never surface; they select the fallback.
    #[instrument(skip_all, fields(user_id = %goal.user_id, goal_id = %goal.id))]
    pub async fn calculate(
        &self,
        profile: &Profile,
        goal: &Goal,
    ) -> Result<TargetOutcome, TargetError> {
        let inputs = TargetInputs::from_records(profile, goal)?;

        let advisory = match &self.advisory {
            Some(client) => Self::try_advisory(client, &inputs).await,
            None => Err(TargetError::AdvisoryUnavailable(
                "advisory service not configured".to_owned(),
            )),
        };

        Ok(match advisory {
            Ok(values) => {
                info!("Targets calculated by advisory service");
                TargetOutcome::Advisory(NutritionTarget::from_values(
                    goal.user_id,
                    goal.id,
                    values,
                    TargetSource::Advisory,
                ))
            }
            Err(reason) => {
                warn!(reason = %reason, "Advisory path failed, using formula fallback");
                TargetOutcome::Fallback {
                    target: NutritionTarget::from_values(
                        goal.user_id,
                        goal.id,
                        FallbackCalculator::calculate(&inputs),
                        TargetSource::Formula,
                    ),
                    reason,
                }
            }
        })
    }

    async fn try_advisory(
        client: &AdvisoryClient,
        inputs: &TargetInputs,
    ) -> Result<TargetValues, TargetError> {
        let text = client.request_targets(inputs).await?;
        parse_advisory_response(&text)
    }
}
