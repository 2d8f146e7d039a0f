//! Run state for the single-flight generator loop.

/// Where the controller is in its run loop.
///
/// ```text
///            request               request
///   Idle ──────────────> Running ──────────> RerunPending
///    ^                    │  ^                   │
///    └────── complete ────┘  └──── complete ─────┘
///                                (runs again)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    RerunPending,
}

impl RunState {
    /// Register a trigger. Returns `true` when the caller must start the
    /// run loop, `false` when the trigger was folded into the active run.
    pub fn request(&mut self) -> bool {
        match self {
            RunState::Idle => {
                *self = RunState::Running;
                true
            }
            RunState::Running | RunState::RerunPending => {
                *self = RunState::RerunPending;
                false
            }
        }
    }

    /// Mark the current run finished. Returns `true` when a trigger arrived
    /// during the run and the loop must go again.
    pub fn complete(&mut self) -> bool {
        match self {
            RunState::RerunPending => {
                *self = RunState::Running;
                true
            }
            RunState::Running | RunState::Idle => {
                *self = RunState::Idle;
                false
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RunState::Idle)
    }
}

/// Mutable state owned by one controller.
#[derive(Debug, Default)]
pub struct ControllerState {
    pub run: RunState,
    /// Dev-server mode performs its initial sync once per session.
    pub initial_sync_done: bool,
}
