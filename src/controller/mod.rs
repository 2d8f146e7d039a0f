//! Regeneration controller.
//!
//! Decides when the generator runs:
//! - at most one generator process is active at any time
//! - triggers arriving during a run are coalesced into one follow-up run
//! - watch triggers are debounced; each new trigger restarts the quiet
//!   period and only the last one reaches the run loop
//!
//! State changes happen synchronously between awaits, so the locks below
//! are never held across a suspension point.

mod state;

pub use state::{ControllerState, RunState};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::generator::{GenerateError, Generator};
use crate::host::{Logger, TracingLogger};

/// Quiet period for watch-triggered runs.
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Logged after every successful generator run.
pub const SUCCESS_MESSAGE: &str =
    "[plugin @devwizard/vite-plugin-enumify] Enum types generated successfully";

/// Prefix for failure messages on the host channel.
pub const ERROR_PREFIX: &str = "[enumify]";

/// Result of a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// This call ran the loop; `runs` generator invocations happened.
    Completed { runs: usize },
    /// A run was already active; it will go again once it finishes.
    Coalesced,
}

/// Serializes and debounces generator runs.
///
/// Cloning is cheap and every clone drives the same state.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

struct Inner {
    generator: Arc<dyn Generator>,
    state: Mutex<ControllerState>,
    logger: RwLock<Arc<dyn Logger>>,
    /// Pending debounce timer, if any.
    debounce: Mutex<Option<JoinHandle<()>>>,
    quiet_period: Duration,
}

/// Returns the controller to `Idle` if the loop task unwinds or is torn
/// down with the runtime.
struct RunGuard<'a> {
    state: &'a Mutex<ControllerState>,
    armed: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().run = RunState::Idle;
        }
    }
}

impl Controller {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self::with_quiet_period(generator, WATCH_DEBOUNCE)
    }

    pub fn with_quiet_period(generator: Arc<dyn Generator>, quiet_period: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                generator,
                state: Mutex::new(ControllerState::default()),
                logger: RwLock::new(Arc::new(TracingLogger)),
                debounce: Mutex::new(None),
                quiet_period,
            }),
        }
    }

    /// Route success and failure messages to the host's logger.
    pub fn set_logger(&self, logger: Arc<dyn Logger>) {
        *self.inner.logger.write() = logger;
    }

    fn logger(&self) -> Arc<dyn Logger> {
        self.inner.logger.read().clone()
    }

    pub fn run_state(&self) -> RunState {
        self.inner.state.lock().run
    }

    /// Claim the once-per-session initial sync. Returns `true` only for the
    /// first caller.
    pub fn claim_initial_sync(&self) -> bool {
        let mut state = self.inner.state.lock();
        if state.initial_sync_done {
            return false;
        }
        state.initial_sync_done = true;
        true
    }

    /// Trigger a generator run.
    ///
    /// If a run is already active this returns `Coalesced` immediately and
    /// the active loop runs once more when it finishes. Otherwise a loop
    /// task is started and awaited until no rerun is pending.
    ///
    /// The loop lives in its own task, so dropping this future does not
    /// stop it: the generator process finishes, queued reruns still happen
    /// and the controller only becomes idle once the loop is done.
    ///
    /// Every failure is logged. The error of the loop's first run is
    /// returned; failures of follow-up runs are only logged. A failed run
    /// does not cancel a pending rerun.
    pub async fn run(&self) -> Result<RunOutcome, GenerateError> {
        let Some(task) = self.start() else {
            crate::debug_event!("controller", "run in progress, rerun queued");
            return Ok(RunOutcome::Coalesced);
        };

        match task.await {
            Ok(result) => result.map(|runs| RunOutcome::Completed { runs }),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(GenerateError::Interrupted),
        }
    }

    /// Claim the controller and spawn the run loop, or queue a rerun if a
    /// loop is already active.
    fn start(&self) -> Option<JoinHandle<Result<usize, GenerateError>>> {
        let claimed = self.inner.state.lock().run.request();
        if !claimed {
            return None;
        }

        let controller = self.clone();
        Some(tokio::spawn(async move { controller.run_loop().await }))
    }

    /// Run the generator until no rerun is pending. Only this loop moves
    /// the state back to `Idle`.
    async fn run_loop(&self) -> Result<usize, GenerateError> {
        let mut guard = RunGuard {
            state: &self.inner.state,
            armed: true,
        };
        let mut runs = 0;
        let mut first_error = None;

        loop {
            runs += 1;

            match self.inner.generator.generate().await {
                Ok(()) => self.logger().info(SUCCESS_MESSAGE),
                Err(e) => {
                    self.logger().error(&format!("{ERROR_PREFIX} {e}"));
                    if runs == 1 {
                        first_error = Some(e);
                    }
                }
            }

            let again = self.inner.state.lock().run.complete();
            if !again {
                break;
            }
            crate::debug_event!("controller", "rerun", "#{}", runs + 1);
        }

        guard.armed = false;

        match first_error {
            Some(e) => Err(e),
            None => Ok(runs),
        }
    }

    /// Debounced trigger. Restarts the quiet period; once it elapses with
    /// no further calls, one run is triggered in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self) {
        let controller = self.clone();
        let quiet_period = self.inner.quiet_period;

        let mut pending = self.inner.debounce.lock();
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            crate::debug_event!("controller", "debounce elapsed");
            // The loop task is detached; failures are logged inside it.
            if controller.start().is_none() {
                crate::debug_event!("controller", "run in progress, rerun queued");
            }
        }));
    }

    /// Whether a debounce timer is waiting to fire.
    pub fn has_pending_trigger(&self) -> bool {
        self.inner
            .debounce
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}
