// ABOUTME: Integration tests for active-row versioning of goals and targets
// ABOUTME: Covers single-active commits, audit history, and the concurrent commit race per mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{create_test_database, muscle_gain_goal, MemoryRepository};
use macro_tracker_server::database::NutritionRepository;
use macro_tracker_server::models::{GoalType, NutritionTarget, TargetSource, TargetValues};
use macro_tracker_server::nutrition::{TargetCommitMode, TargetVersionManager};
use uuid::Uuid;

fn candidate(user_id: Uuid, goal_id: Uuid, calories: u32) -> NutritionTarget {
    NutritionTarget::from_values(
        user_id,
        goal_id,
        TargetValues {
            daily_calories: calories,
            daily_protein_g: 150.0,
            daily_carbs_g: 250.0,
            daily_fats_g: 70.0,
            daily_fiber_g: 30.0,
            daily_water_ml: 2500.0,
            notes: String::new(),
        },
        TargetSource::Formula,
    )
}

#[tokio::test]
async fn test_sequential_commits_leave_one_active_and_keep_history() {
    let database = create_test_database().await.unwrap();
    let repository: Arc<dyn NutritionRepository> = Arc::new(database);
    let versions = TargetVersionManager::new(Arc::clone(&repository), TargetCommitMode::default());

    let user_id = Uuid::new_v4();
    let goal_id = Uuid::new_v4();
    for calories in [2000, 2100, 2200] {
        versions
            .commit(user_id, candidate(user_id, goal_id, calories), goal_id)
            .await
            .unwrap();
    }

    let history = repository.list_targets(user_id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.iter().filter(|t| t.is_active).count(), 1);

    let active = versions.active_target(user_id).await.unwrap().unwrap();
    assert_eq!(active.daily_calories, 2200);
    assert_eq!(active.goal_id, goal_id);
}

#[tokio::test]
async fn test_commit_overrides_user_and_goal_on_candidate() {
    let repository = MemoryRepository::new();
    let versions = TargetVersionManager::new(repository.clone(), TargetCommitMode::PerUser);

    let user_id = Uuid::new_v4();
    let goal_id = Uuid::new_v4();
    let mut stray = candidate(Uuid::new_v4(), Uuid::new_v4(), 1900);
    stray.is_active = false;

    let committed = versions.commit(user_id, stray, goal_id).await.unwrap();
    assert_eq!(committed.user_id, user_id);
    assert_eq!(committed.goal_id, goal_id);
    assert!(committed.is_active);
    assert_eq!(repository.active_targets(user_id).len(), 1);
}

#[tokio::test]
async fn test_commits_for_different_users_are_independent() {
    let repository = MemoryRepository::new();
    let versions = TargetVersionManager::new(repository.clone(), TargetCommitMode::Unserialized);

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let goal_id = Uuid::new_v4();
    versions
        .commit(alice, candidate(alice, goal_id, 2000), goal_id)
        .await
        .unwrap();
    versions
        .commit(bob, candidate(bob, goal_id, 2500), goal_id)
        .await
        .unwrap();

    assert_eq!(repository.active_targets(alice).len(), 1);
    assert_eq!(repository.active_targets(bob).len(), 1);
}

#[tokio::test]
async fn test_unserialized_concurrent_commits_can_leave_two_active_targets() {
    let repository = MemoryRepository::with_pause_after_deactivate(Duration::from_millis(50));
    let versions = TargetVersionManager::new(repository.clone(), TargetCommitMode::Unserialized);

    let user_id = Uuid::new_v4();
    let first_goal = Uuid::new_v4();
    let second_goal = Uuid::new_v4();

    let (a, b) = tokio::join!(
        versions.commit(user_id, candidate(user_id, first_goal, 2000), first_goal),
        versions.commit(user_id, candidate(user_id, second_goal, 2400), second_goal),
    );
    a.unwrap();
    b.unwrap();

    // Both deactivated before either inserted
    assert_eq!(repository.active_targets(user_id).len(), 2);
}

#[tokio::test]
async fn test_per_user_concurrent_commits_leave_one_active_target() {
    let repository = MemoryRepository::with_pause_after_deactivate(Duration::from_millis(50));
    let versions = TargetVersionManager::new(repository.clone(), TargetCommitMode::PerUser);

    let user_id = Uuid::new_v4();
    let first_goal = Uuid::new_v4();
    let second_goal = Uuid::new_v4();

    let (a, b) = tokio::join!(
        versions.commit(user_id, candidate(user_id, first_goal, 2000), first_goal),
        versions.commit(user_id, candidate(user_id, second_goal, 2400), second_goal),
    );
    a.unwrap();
    b.unwrap();

    let active = repository.active_targets(user_id);
    assert_eq!(active.len(), 1);
    assert_eq!(repository.target_count(user_id), 2);
    assert_eq!(active[0].goal_id, second_goal);
    assert_eq!(versions.tracked_users(), 0);
}

#[tokio::test]
async fn test_per_user_locks_are_released_after_commits() {
    let repository = MemoryRepository::new();
    let versions = TargetVersionManager::new(repository.clone(), TargetCommitMode::PerUser);

    for _ in 0..5 {
        let user_id = Uuid::new_v4();
        let goal_id = Uuid::new_v4();
        versions
            .activate_goal(user_id, muscle_gain_goal(user_id))
            .await
            .unwrap();
        versions
            .commit(user_id, candidate(user_id, goal_id, 2200), goal_id)
            .await
            .unwrap();
    }

    assert_eq!(versions.tracked_users(), 0);
}

#[tokio::test]
async fn test_activate_goal_deactivates_previous_goals() {
    let database = create_test_database().await.unwrap();
    let repository: Arc<dyn NutritionRepository> = Arc::new(database);
    let versions = TargetVersionManager::new(Arc::clone(&repository), TargetCommitMode::PerUser);

    let user_id = Uuid::new_v4();
    let first = versions
        .activate_goal(user_id, muscle_gain_goal(user_id))
        .await
        .unwrap();

    let mut replacement = muscle_gain_goal(user_id);
    replacement.goal_type = GoalType::WeightLoss;
    let second = versions.activate_goal(user_id, replacement).await.unwrap();

    let active = repository.get_active_goal(user_id).await.unwrap().unwrap();
    assert_eq!(active.id, second.id);
    assert_ne!(active.id, first.id);
    assert_eq!(active.goal_type, GoalType::WeightLoss);
}

#[tokio::test]
async fn test_failed_insert_after_deactivate_leaves_no_active_target() {
    let repository = MemoryRepository::new();
    let versions = TargetVersionManager::new(repository.clone(), TargetCommitMode::Unserialized);

    let user_id = Uuid::new_v4();
    let goal_id = Uuid::new_v4();
    versions
        .commit(user_id, candidate(user_id, goal_id, 2000), goal_id)
        .await
        .unwrap();

    repository.fail_target_inserts(true);
    let result = versions
        .commit(user_id, candidate(user_id, goal_id, 2100), goal_id)
        .await;

    assert!(result.is_err());
    assert!(repository.active_targets(user_id).is_empty());
    assert_eq!(repository.target_count(user_id), 1);
}
