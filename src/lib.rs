pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod release;
pub mod telemetry;
pub mod tracker;
pub mod ui;

pub use error::{Result, RolloutError};
