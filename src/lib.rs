//! hypertrack - Personal hypertrophy training tracker
//!
//! Logs sets with load, reps and RIR, turns them into weekly volume per
//! muscle group, progression advice and fatigue signals, and asks Gemini
//! for coaching notes.

pub mod ai;
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod exercises;
pub mod identity;
pub mod models;
pub mod prompts;
pub mod store;

pub use config::Config;
pub use db::Database;
pub use error::{EngineError, EngineResult, ValidationError};
pub use store::{Snapshot, Store};
