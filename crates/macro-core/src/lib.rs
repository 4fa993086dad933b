// ABOUTME: Core types and constants for the macro tracker nutrition target service
// ABOUTME: Foundation crate with error handling, domain models, and nutrition constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Macro Core
//!
//! Foundation crate providing shared types and constants for the macro tracker
//! service. It changes infrequently, so the server crate gets incremental
//! compilation benefits from keeping these definitions here.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `DatabaseError`
//! - **models**: Profile, goal, and nutrition target records
//! - **constants**: Nutrition defaults shared by the advisory and formula paths

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Domain records: profiles, fitness goals, and nutrition targets
pub mod models;

/// Nutrition constants (energy densities, defaults, macro split)
pub mod constants;
