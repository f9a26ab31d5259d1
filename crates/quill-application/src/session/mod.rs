//! Session orchestration.
//!
//! - `controller`: `SessionController`, which runs the lifecycle
//! - `history`: `HistorySynchronizer`, the store-backed history list

mod controller;
mod history;

pub use controller::SessionController;
pub use history::HistorySynchronizer;
