// ABOUTME: Integration tests for the Mifflin-St Jeor formula fallback
// ABOUTME: Validates the reference example, goal adjustments, and determinism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use macro_tracker_server::models::{ActivityLevel, FitnessLevel, Gender, GoalType};
use macro_tracker_server::nutrition::{FallbackCalculator, TargetInputs};

fn inputs(gender: Gender, goal_type: GoalType, activity_level: &str) -> TargetInputs {
    TargetInputs {
        age: 30,
        gender,
        height_cm: 180.0,
        weight_kg: 80.0,
        fitness_level: FitnessLevel::Intermediate,
        goal_type,
        activity_level: activity_level.to_owned(),
        target_weight_kg: None,
        target_physique: None,
    }
}

#[test]
fn test_reference_male_muscle_gain_very_active() {
    let values =
        FallbackCalculator::calculate(&inputs(Gender::Male, GoalType::MuscleGain, "very_active"));

    assert_eq!(values.daily_calories, 3571);
    assert!((values.daily_protein_g - 268.0).abs() < f64::EPSILON);
    assert!((values.daily_carbs_g - 402.0).abs() < f64::EPSILON);
    assert!((values.daily_fats_g - 99.0).abs() < f64::EPSILON);
    assert!((values.daily_fiber_g - 30.0).abs() < f64::EPSILON);
    assert!((values.daily_water_ml - 2800.0).abs() < f64::EPSILON);
    assert!(!values.notes.is_empty());
}

#[test]
fn test_bmr_and_tdee_components() {
    let bmr = FallbackCalculator::bmr(80.0, 180.0, 30, Gender::Male);
    assert!((bmr - 1780.0).abs() < 1e-9);

    let tdee = bmr * FallbackCalculator::activity_multiplier(Some(ActivityLevel::VeryActive));
    assert!((tdee - 3070.5).abs() < 1e-9);
}

#[test]
fn test_other_gender_uses_non_male_constant() {
    let female = FallbackCalculator::bmr(60.0, 165.0, 28, Gender::Female);
    let other = FallbackCalculator::bmr(60.0, 165.0, 28, Gender::Other);
    assert!((female - 1330.25).abs() < 1e-9);
    assert!((female - other).abs() < f64::EPSILON);
}

#[test]
fn test_goal_adjustments_move_calories_by_500() {
    let maintain =
        FallbackCalculator::calculate(&inputs(Gender::Male, GoalType::Maintenance, "sedentary"));
    let lose =
        FallbackCalculator::calculate(&inputs(Gender::Male, GoalType::WeightLoss, "sedentary"));
    let gain =
        FallbackCalculator::calculate(&inputs(Gender::Male, GoalType::MuscleGain, "sedentary"));

    // 1780 * 1.2 = 2136
    assert_eq!(maintain.daily_calories, 2136);
    assert_eq!(lose.daily_calories, 1636);
    assert_eq!(gain.daily_calories, 2636);
}

#[test]
fn test_unrecognized_activity_counts_as_moderate() {
    let unknown =
        FallbackCalculator::calculate(&inputs(Gender::Male, GoalType::Maintenance, "couch_athlete"));
    let moderate = FallbackCalculator::calculate(&inputs(
        Gender::Male,
        GoalType::Maintenance,
        "moderately_active",
    ));
    assert_eq!(unknown, moderate);
    // 1780 * 1.55 = 2759
    assert_eq!(moderate.daily_calories, 2759);
}

#[test]
fn test_identical_inputs_give_identical_outputs() {
    let input = inputs(Gender::Female, GoalType::WeightLoss, "lightly_active");
    let first = FallbackCalculator::calculate(&input);
    for _ in 0..10 {
        assert_eq!(FallbackCalculator::calculate(&input), first);
    }
}
