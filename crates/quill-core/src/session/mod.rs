//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: The `Session` entity, `SessionState` and `TransformKind`
//! - `event`: Events accepted by the state machine (`SessionEvent`)
//! - `machine`: The transition function (`Session::apply`)

mod event;
mod machine;
mod model;

// Re-export public API
pub use event::SessionEvent;
pub use model::{Session, SessionState, TransformKind};
