//! Coaching session management
//!
//! This module provides the session state machine and its async driver:
//! - Lifecycle transitions (Idle, Recording, Processing, Complete)
//! - Per-tick frame sampling and metric extraction
//! - Rolling pitch and pace series with filler accumulation
//! - Settle delay and final report generation

mod config;
mod controller;
mod session;
mod state;
mod stats;

pub use config::SessionConfig;
pub use controller::{SessionController, SessionError};
pub use session::CoachingSession;
pub use state::SessionState;
pub use stats::SessionSnapshot;
