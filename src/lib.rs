//! modup - Interactive Go module upgrader library
//!
//! This library provides the core functionality for upgrading the direct
//! requirements of a Go module:
//! - Reading go.mod and selecting the modules to query
//! - Querying newer versions concurrently with per-module retry
//! - Computing the change set and applying the operator's selection

pub mod cli;
pub mod domain;
pub mod error;
pub mod executor;
pub mod go_command;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod query;
pub mod resolver;
