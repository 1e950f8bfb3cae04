// State machine module for actor lifecycle
//
// Status and Action are closed enums; `transition` is the total, pure mapping
// between them and `State` is the single-writer controller that applies it.

pub mod actions;
pub mod controller;
pub mod states;
pub mod transitions;

// Re-export main types for convenient access
pub use actions::Action;
pub use controller::State;
pub use states::Status;
pub use transitions::{is_effective, transition};
