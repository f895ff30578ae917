//! Drag and resize gestures, sampled as discrete actions.
//!
//! Every sample is computed from the snapshot taken at gesture start, never from the previous
//! sample.

use crate::{
    model::{DragSession, InteractionState, ResizeSession, SessionState},
    reducer::{find_window_mut, focus, ReducerError, RuntimeEffect, SessionAction},
    window_manager::{
        is_partially_outside, resize_from_snapshot, snap_candidate, snap_window, unsnap_window,
    },
};

pub(super) fn reduce_gesture_action(
    state: &mut SessionState,
    interaction: &mut InteractionState,
    action: &SessionAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    match action {
        SessionAction::BeginDrag { window_id, pointer } => {
            let window = find_window_mut(state, *window_id)?;
            if !window.flags.draggable || !window.flags.movable {
                return Err(ReducerError::WindowLocked);
            }
            if window.maximized {
                window.maximized = false;
                window.size = window.initial_size;
            }
            let position_start = window.position;
            focus(state, *window_id, effects)?;
            interaction.resizing = None;
            interaction.snap_preview = None;
            interaction.dragging = Some(DragSession {
                window_id: *window_id,
                pointer_start: *pointer,
                position_start,
            });
        }
        SessionAction::UpdateDrag { pointer, bounds } => {
            let Some(session) = interaction.dragging.as_ref() else {
                return Ok(true);
            };
            let dx = pointer.x - session.pointer_start.x;
            let dy = pointer.y - session.pointer_start.y;
            let window = find_window_mut(state, session.window_id)?;
            window.position = session.position_start.offset(dx, dy);
            interaction.snap_preview = snap_candidate(window.geometry(), *bounds);
        }
        SessionAction::EndDrag { bounds } => {
            interaction.snap_preview = None;
            let Some(session) = interaction.dragging.take() else {
                return Ok(true);
            };
            let window = find_window_mut(state, session.window_id)?;
            match snap_candidate(window.geometry(), *bounds) {
                Some(position) => snap_window(window, position, *bounds),
                None if window.snapped && is_partially_outside(window.geometry(), *bounds) => {
                    unsnap_window(window);
                }
                None => {}
            }
        }
        SessionAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window = find_window_mut(state, *window_id)?;
            if !window.flags.resizable {
                return Err(ReducerError::WindowLocked);
            }
            let snapshot = window.geometry();
            focus(state, *window_id, effects)?;
            interaction.dragging = None;
            interaction.snap_preview = None;
            interaction.resizing = Some(ResizeSession {
                window_id: *window_id,
                edge: *edge,
                pointer_start: *pointer,
                snapshot,
            });
        }
        SessionAction::UpdateResize { pointer, bounds } => {
            let Some(session) = interaction.resizing.as_ref() else {
                return Ok(true);
            };
            let dx = pointer.x - session.pointer_start.x;
            let dy = pointer.y - session.pointer_start.y;
            let window = find_window_mut(state, session.window_id)?;
            if !window.maximized && !window.fullscreen {
                let max = window.effective_max_size(*bounds);
                window.set_geometry(resize_from_snapshot(
                    session.snapshot,
                    session.edge,
                    dx,
                    dy,
                    window.min_size,
                    max,
                ));
            }
        }
        SessionAction::EndResize => {
            interaction.resizing = None;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
