// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod baseline;
pub mod config;
pub mod metrics;
pub mod score;
pub mod signal;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::score::{valuate, ValuationReport};
pub use crate::signal::{ContentSignal, SignalDefaults};
