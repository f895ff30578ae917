//! Reducer helpers for session settings.

use crate::{
    model::SessionState,
    reducer::{ReducerError, RuntimeEffect, SessionAction},
    settings::SessionSettings,
};

pub(super) fn reduce_settings_action(
    state: &mut SessionState,
    action: &SessionAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    match action {
        SessionAction::UpdateSettings(patch) => {
            let before = state.settings.clone();
            state.settings.merge(patch.clone());
            if state.settings != before {
                effects.push(RuntimeEffect::SettingsChanged);
            }
        }
        SessionAction::ResetSettings => {
            if state.settings != SessionSettings::default() {
                state.settings = SessionSettings::default();
                effects.push(RuntimeEffect::SettingsChanged);
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}
