// ABOUTME: Main library entry point for the macro tracker API server
// ABOUTME: Daily nutrition targets from profile and goal, AI-advised with a formula fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Macro Tracker Server
//!
//! Computes and versions a user's daily nutrition targets (calories, protein,
//! carbohydrates, fat, fiber, water) whenever their profile or fitness goal
//! changes.
//!
//! ## Architecture
//!
//! - **Nutrition**: target calculation (advisory service first, Mifflin-St Jeor
//!   formula as fallback), response parsing, active-row versioning, and the
//!   recalculation trigger
//! - **LLM**: provider abstraction and the Gemini implementation used as the
//!   advisory service
//! - **Database**: `SQLite` persistence behind the `NutritionRepository` trait
//! - **Routes**: profile, goal, and target endpoints plus health checks
//! - **Client**: caller-side sync with retry and optimistic state
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use macro_tracker_server::config::ServerConfig;
//! use macro_tracker_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Macro tracker configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Caller identity extraction
pub mod auth;

/// Caller-side sync with retry and optimistic state
pub mod client;

/// Typed environment configuration
pub mod config;

/// `SQLite` persistence
pub mod database;

/// LLM provider abstraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Nutrition target computation and versioning
pub mod nutrition;

/// HTTP route handlers
pub mod routes;

/// Server assembly and serve loop
pub mod server;

pub use macro_core::{constants, errors, models};
