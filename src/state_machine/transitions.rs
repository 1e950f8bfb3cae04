//! Pure transition table for actor lifecycle.
//!
//! `transition` is total: every `(status, action)` pair yields exactly one
//! next status. Pairs that are not applicable map to the current status.

use super::actions::Action;
use super::states::Status;

/// Compute the status reached by applying `action` in `current`
pub fn transition(current: Status, action: Action) -> Status {
    match (current, action) {
        // Kill is accepted from every status
        (_, Action::Kill) => Status::Killed,

        // Nothing else leaves a terminal status
        (status, _) if status.is_terminal() => status,

        (Status::InActive, Action::Start) => Status::Started,
        (Status::Started | Status::Running, Action::Process) => Status::Running,
        (Status::Running, Action::Pause) => Status::Paused,
        (Status::Paused, Action::Resume) => Status::Running,
        (_, Action::Stop) => Status::Stopped,

        // Delay, Check and inapplicable actions
        (status, _) => status,
    }
}

/// Check whether `action` changes `current`
pub fn is_effective(current: Status, action: Action) -> bool {
    transition(current, action) != current
}
