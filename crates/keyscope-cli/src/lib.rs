//! Command-line front end for the keyscope keybinding engine
//!
//! The binary works against an exported host snapshot instead of a live IDE.

pub mod cli;
pub mod report;
pub mod runner;

pub use cli::{Cli, Commands};
pub use runner::{open_engine, run, SnapshotEngine};
