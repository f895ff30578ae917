//! Monitor registry transitions and window reassignment.

use crate::{
    model::SessionState,
    reducer::{ReducerError, RuntimeEffect, SessionAction},
};

pub(super) fn reduce_monitor_action(
    state: &mut SessionState,
    action: &SessionAction,
    _effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    match action {
        SessionAction::AddMonitor(spec) => {
            state.monitors.add(spec.clone());
        }
        SessionAction::RemoveMonitor { monitor_id } => {
            let fallback = state.monitors.remove(*monitor_id)?;
            for window in &mut state.windows {
                if window.monitor_id == *monitor_id {
                    window.monitor_id = fallback;
                }
            }
        }
        SessionAction::SetPrimaryMonitor { monitor_id } => {
            state.monitors.set_primary(*monitor_id)?;
        }
        SessionAction::SetActiveMonitor { monitor_id } => {
            state.monitors.set_active(*monitor_id)?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
