//! Command-line entry points

pub mod run;

pub use run::{RunArgs, run_unfollow_mode};
