//! Configuration management for the unfollow tool
//!
//! This module handles loading and validating account, session, network
//! and pacing settings.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{Settings, drop_empty_exclusions, parse_exclusion_list};
