// ABOUTME: Domain records for the nutrition target service
// ABOUTME: Profile, Goal, and NutritionTarget definitions with their enumerations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Fitness goals and activity levels
pub mod goal;
/// Body profile records
pub mod profile;
/// Daily nutrition targets
pub mod target;

pub use goal::{ActivityLevel, Goal, GoalType};
pub use profile::{FitnessLevel, Gender, Profile};
pub use target::{NutritionTarget, TargetSource, TargetValues};
