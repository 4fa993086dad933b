// ABOUTME: Route module organization for the macro tracker HTTP endpoints
// ABOUTME: Health checks plus user profile, goal, and target routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Health check and readiness routes
pub mod health;
/// User profile, goal, and nutrition target routes
pub mod user;

pub use health::HealthRoutes;
pub use user::{ProfileOverview, SaveGoalRequest, SaveProfileRequest, UserRoutes};
