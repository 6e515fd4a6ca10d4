//! Centralized constants for the lens project.
//!
//! All project-wide constant values live here.
//! Change a value in one place and it applies everywhere.

pub mod labels;
pub mod logs;
pub mod network;
pub mod paths;
pub mod state;
