//! Summarizer app shell: configuration, effect execution, the submission
//! controller and a line-oriented terminal front end.
pub mod config;
pub mod controller;
mod effects;
pub mod render;
mod shell;

pub use config::{AppConfig, ConfigError, LogTarget};
pub use controller::SubmissionController;
pub use shell::{run, run_batch, run_interactive};
