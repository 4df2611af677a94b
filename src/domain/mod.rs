//! Core domain models for modup
//!
//! This module contains the fundamental types used throughout the application:
//! - Module identity and go.mod requirement structures
//! - Resolution results and offered changes
//! - Run outcomes

mod change;
mod module;

pub use change::{ChangeEntry, Outcome, UpdateInfo};
pub use module::{is_directory_path, ModuleVersion, Replacement, Requirement};
