use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::layout::ScheduleViewState;
use crate::upstream::PlannerApi;

/// A browser control that admits one request at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Search,
    AddCourse,
    BuildSchedule,
    AdvancePage,
    Gather,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Control::Search => "search",
            Control::AddCourse => "add-course",
            Control::BuildSchedule => "build-schedule",
            Control::AdvancePage => "advance-page",
            Control::Gather => "gather",
        };
        f.write_str(name)
    }
}

/// State shared by every request handler.
pub struct WrapperState {
    pub config: PlannerConfig,
    pub planner: Arc<dyn PlannerApi>,
    /// Built map layers and the visible one
    pub view: Mutex<ScheduleViewState>,
    /// One lock per control; a request holds it until it finishes
    control_locks: DashMap<Control, Arc<Mutex<()>>>,
}

impl WrapperState {
    pub fn new(config: PlannerConfig, planner: Arc<dyn PlannerApi>) -> Self {
        Self {
            config,
            planner,
            view: Mutex::new(ScheduleViewState::new()),
            control_locks: DashMap::new(),
        }
    }

    /// Claims `control` for the lifetime of the returned guard.
    ///
    /// A second claim while the guard is alive fails instead of waiting.
    pub fn claim(&self, control: Control) -> Result<OwnedMutexGuard<()>, PlannerError> {
        let lock = self
            .control_locks
            .entry(control)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        lock.try_lock_owned()
            .map_err(|_| PlannerError::OperationInProgress { control })
    }
}
