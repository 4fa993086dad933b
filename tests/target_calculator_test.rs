// ABOUTME: Integration tests for the target calculator's advisory and fallback paths
// ABOUTME: Uses stub LLM providers to drive success, outage, garbage, and timeout cases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    complete_profile, init_test_logging, muscle_gain_goal, stub_advisory, StubBehavior,
    StubProvider, FENCED_ADVISORY_ANSWER,
};
use macro_tracker_server::models::TargetSource;
use macro_tracker_server::nutrition::{TargetCalculator, TargetError, TargetOutcome};
use uuid::Uuid;

#[tokio::test]
async fn test_advisory_answer_is_used_when_parseable() {
    init_test_logging();
    let user_id = Uuid::new_v4();
    let provider = StubProvider::replying(FENCED_ADVISORY_ANSWER);
    let calculator = TargetCalculator::new(stub_advisory(provider.clone()));

    let goal = muscle_gain_goal(user_id);
    let outcome = calculator
        .calculate(&complete_profile(user_id), &goal)
        .await
        .unwrap();

    assert_eq!(outcome.source(), TargetSource::Advisory);
    let target = outcome.target();
    assert_eq!(target.daily_calories, 2900);
    assert!((target.daily_fiber_g - 38.0).abs() < f64::EPSILON);
    assert_eq!(target.goal_id, goal.id);
    assert_eq!(target.user_id, user_id);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_outage_falls_back_without_retry() {
    init_test_logging();
    let user_id = Uuid::new_v4();
    let provider = StubProvider::new(StubBehavior::Unavailable);
    let calculator = TargetCalculator::new(stub_advisory(provider.clone()));

    let outcome = calculator
        .calculate(&complete_profile(user_id), &muscle_gain_goal(user_id))
        .await
        .unwrap();

    match outcome {
        TargetOutcome::Fallback { target, reason } => {
            assert_eq!(target.daily_calories, 3571);
            assert_eq!(target.source, TargetSource::Formula);
            assert!(matches!(reason, TargetError::AdvisoryUnavailable(_)));
        }
        TargetOutcome::Advisory(_) => panic!("expected formula fallback"),
    }
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_unparseable_answer_falls_back() {
    init_test_logging();
    let user_id = Uuid::new_v4();
    let provider = StubProvider::replying("Eat well and sleep more!");
    let calculator = TargetCalculator::new(stub_advisory(provider));

    let outcome = calculator
        .calculate(&complete_profile(user_id), &muscle_gain_goal(user_id))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        TargetOutcome::Fallback {
            reason: TargetError::MalformedResponse(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_hanging_advisory_times_out_into_fallback() {
    init_test_logging();
    let user_id = Uuid::new_v4();
    let provider = StubProvider::new(StubBehavior::Hang);
    let calculator = TargetCalculator::new(stub_advisory(provider));

    let outcome = calculator
        .calculate(&complete_profile(user_id), &muscle_gain_goal(user_id))
        .await
        .unwrap();

    assert_eq!(outcome.source(), TargetSource::Formula);
    assert_eq!(outcome.target().daily_calories, 3571);
}

#[tokio::test]
async fn test_formula_only_calculator_never_calls_out() {
    let user_id = Uuid::new_v4();
    let calculator = TargetCalculator::formula_only();
    assert!(!calculator.has_advisory());

    let outcome = calculator
        .calculate(&complete_profile(user_id), &muscle_gain_goal(user_id))
        .await
        .unwrap();
    assert!((outcome.into_target().daily_water_ml - 2800.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_incomplete_profile_is_a_validation_error() {
    let user_id = Uuid::new_v4();
    let provider = StubProvider::replying(FENCED_ADVISORY_ANSWER);
    let calculator = TargetCalculator::new(stub_advisory(provider.clone()));

    let mut profile = complete_profile(user_id);
    profile.age = None;
    profile.weight_kg = None;

    let err = calculator
        .calculate(&profile, &muscle_gain_goal(user_id))
        .await
        .unwrap_err();

    match err {
        TargetError::Validation { fields } => {
            assert_eq!(fields, vec!["age", "current_weight_kg"]);
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_goal_without_activity_level_is_a_validation_error() {
    let user_id = Uuid::new_v4();
    let mut goal = muscle_gain_goal(user_id);
    goal.activity_level = Some("   ".to_owned());

    let err = TargetCalculator::formula_only()
        .calculate(&complete_profile(user_id), &goal)
        .await
        .unwrap_err();
    assert!(matches!(err, TargetError::Validation { ref fields } if fields == &vec!["activity_level"]));
}
