// Run configuration
//
// TestConfig mirrors the subset of a Playwright config file the engine
// honours; LaunchOptions is the browser-level part of it.

pub mod config;
pub mod launch_options;

pub use config::{ExpectConfig, TestConfig, UseOptions};
pub use launch_options::LaunchOptions;
