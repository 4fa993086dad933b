// ABOUTME: Deterministic nutrition targets from the Mifflin-St Jeor equation
// ABOUTME: BMR, activity-scaled TDEE, goal adjustment, fixed macro split, fiber and water
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Formula fallback
//!
//! # Reference
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use macro_core::constants::{activity, bmr, energy, targets};
use macro_core::models::{ActivityLevel, Gender, GoalType, TargetValues};

use super::TargetInputs;

/// Formula-based target calculator
///
/// Performs no I/O and cannot fail for validated inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCalculator;

impl FallbackCalculator {
    /// Compute a full target candidate
    #[must_use]
    pub fn calculate(inputs: &TargetInputs) -> TargetValues {
        let bmr = Self::bmr(inputs.weight_kg, inputs.height_cm, inputs.age, inputs.gender);
        let tdee = bmr * Self::activity_multiplier(inputs.activity_level());
        let calories = Self::adjusted_calories(tdee, inputs.goal_type);
        let kcal = f64::from(calories);

        TargetValues {
            daily_calories: calories,
            daily_protein_g: (kcal * targets::PROTEIN_SHARE / energy::KCAL_PER_G_PROTEIN).round(),
            daily_carbs_g: (kcal * targets::CARBS_SHARE / energy::KCAL_PER_G_CARBS).round(),
            daily_fats_g: (kcal * targets::FAT_SHARE / energy::KCAL_PER_G_FAT).round(),
            daily_fiber_g: targets::FORMULA_FIBER_G,
            daily_water_ml: (targets::WATER_ML_PER_KG * inputs.weight_kg).round(),
            notes: targets::FORMULA_NOTES.to_owned(),
        }
    }

    /// Basal metabolic rate (kcal/day)
    ///
    /// Every gender other than male uses the female constant.
    #[must_use]
    pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
        let constant = match gender {
            Gender::Male => bmr::MALE_CONSTANT,
            Gender::Female | Gender::Other => bmr::NON_MALE_CONSTANT,
        };

        let weight_component = bmr::WEIGHT_COEF * weight_kg;
        let height_component = bmr::HEIGHT_COEF * height_cm;
        let age_component = bmr::AGE_COEF * f64::from(age);

        weight_component + height_component - age_component + constant
    }

    /// TDEE multiplier; absent or unrecognized levels count as moderately active
    #[must_use]
    pub const fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
        match level {
            Some(ActivityLevel::Sedentary) => activity::SEDENTARY,
            Some(ActivityLevel::LightlyActive) => activity::LIGHTLY_ACTIVE,
            Some(ActivityLevel::ModeratelyActive) | None => activity::MODERATELY_ACTIVE,
            Some(ActivityLevel::VeryActive) => activity::VERY_ACTIVE,
            Some(ActivityLevel::ExtremelyActive) => activity::EXTREMELY_ACTIVE,
        }
    }

    /// Apply the goal delta to TDEE and round half away from zero
    #[must_use]
    pub fn adjusted_calories(tdee: f64, goal_type: GoalType) -> u32 {
        let adjusted = match goal_type {
            GoalType::WeightLoss => tdee - targets::GOAL_CALORIE_ADJUSTMENT,
            GoalType::MuscleGain => tdee + targets::GOAL_CALORIE_ADJUSTMENT,
            GoalType::Maintenance => tdee,
        };
        adjusted.round().max(0.0) as u32
    }
}
