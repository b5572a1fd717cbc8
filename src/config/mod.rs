//! Configuration module for the bookkeeper
//!
//! This module provides configuration management including:
//! - Base/tenant directory resolution
//! - Settings persistence (matching thresholds, retry bounds, defaults)

pub mod paths;
pub mod settings;

pub use paths::BookkeeperPaths;
pub use settings::{MatchThresholds, Settings};
