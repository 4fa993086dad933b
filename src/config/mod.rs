// ABOUTME: Configuration module aggregating environment-driven server settings
// ABOUTME: Re-exports ServerConfig and its typed sub-settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration management

/// Environment-based configuration
pub mod environment;

pub use environment::{
    defaults, keys, AdvisoryConfig, DatabaseUrl, Environment, LogLevel, ServerConfig,
};
