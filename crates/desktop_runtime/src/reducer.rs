//! Session actions, side-effect intents, and transition logic.

mod filesystem;
mod gestures;
mod monitors;
mod settings;

use desktop_app_contract::{AppLifecycleEvent, WindowContent};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    model::{
        GroupId, InteractionState, MonitorId, MonitorSpec, OpenWindowRequest, Point, Rect,
        ResizeEdge, SessionState, Size, SnapPosition, WindowGroup, WindowId, WindowRecord,
        DEFAULT_MIN_WINDOW_HEIGHT, DEFAULT_MIN_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT,
        DEFAULT_WINDOW_WIDTH,
    },
    monitors::MonitorError,
    settings::SettingsPatch,
    vfs::{
        ClipboardOperation, FileSpec, FolderView, ItemId, NameValidationError, SortKey, SortOrder,
        VfsError,
    },
    window_manager::{
        cascade_position, clamp_size, fit_size_to_bounds, focus_window_internal, snap_window,
        unsnap_window,
    },
};

pub const MIN_WINDOW_OPACITY: f64 = 0.1;
pub const MAX_WINDOW_OPACITY: f64 = 1.0;

/// Display colors assigned to new window groups.
pub const GROUP_COLORS: [&str; 8] = [
    "#e74c3c", "#e67e22", "#f1c40f", "#2ecc71", "#1abc9c", "#3498db", "#9b59b6", "#ec407a",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Actions accepted by [`reduce_session`] to mutate [`SessionState`].
pub enum SessionAction {
    /// Open a window for a component, or focus the one already open for it.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Flip the maximized flag.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Flip the fullscreen flag.
    ToggleFullscreen {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Clear minimized/maximized/fullscreen and focus the window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Place a window at an absolute position.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New top-left corner.
        position: Point,
    },
    /// Resize a window, clamped to its min and effective max size.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// Requested size.
        size: Size,
        /// Desktop container bounds, used when the window has no explicit max size.
        bounds: Rect,
    },
    /// Pin a window into (or out of) the always-on-top tier.
    SetAlwaysOnTop {
        /// Window to update.
        window_id: WindowId,
        /// Whether the window stays on top.
        enabled: bool,
    },
    /// Set window opacity, clamped to `[0.1, 1.0]`.
    SetOpacity {
        /// Window to update.
        window_id: WindowId,
        /// Requested opacity.
        opacity: f64,
    },
    /// Replace a window title.
    SetWindowTitle {
        /// Window to update.
        window_id: WindowId,
        /// New title.
        title: String,
    },
    /// Reassign a window to another monitor.
    MoveWindowToMonitor {
        /// Window to move.
        window_id: WindowId,
        /// Destination monitor.
        monitor_id: MonitorId,
    },
    /// Snap a window to a half or quarter of the container.
    SnapWindow {
        /// Window to snap.
        window_id: WindowId,
        /// Snap target.
        position: SnapPosition,
        /// Desktop container bounds.
        bounds: Rect,
    },
    /// Leave the snapped state and restore the pre-snap geometry.
    UnsnapWindow {
        /// Window to unsnap.
        window_id: WindowId,
    },
    /// Switch focus between non-minimized windows.
    CycleFocus {
        /// Return to the previously focused window instead of raising the oldest one.
        reverse: bool,
    },
    /// Begin dragging a window; focuses it in the same step.
    BeginDrag {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: Point,
    },
    /// Update an in-progress drag.
    UpdateDrag {
        /// Current pointer position.
        pointer: Point,
        /// Desktop container bounds, used for the live snap preview.
        bounds: Rect,
    },
    /// End the drag, snapping or unsnapping against the container.
    EndDrag {
        /// Desktop container bounds.
        bounds: Rect,
    },
    /// Begin resizing a window; focuses it in the same step.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Handle being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: Point,
    },
    /// Update an in-progress resize.
    UpdateResize {
        /// Current pointer position.
        pointer: Point,
        /// Desktop container bounds, used when the window has no explicit max size.
        bounds: Rect,
    },
    /// End the active resize.
    EndResize,
    /// Background content for a window finished loading.
    ContentResolved {
        /// Window whose content resolved.
        window_id: WindowId,
        /// Final URL or path.
        resolved_url: String,
    },
    /// Put windows into a new group.
    GroupWindows {
        /// Members of the group.
        window_ids: Vec<WindowId>,
        /// Display name.
        name: String,
    },
    /// Dissolve a group; member windows stay open.
    Ungroup {
        /// Group to remove.
        group_id: GroupId,
    },
    /// Register a monitor.
    AddMonitor(MonitorSpec),
    /// Remove a monitor and move its windows to the fallback monitor.
    RemoveMonitor {
        /// Monitor to remove.
        monitor_id: MonitorId,
    },
    /// Mark a monitor as primary.
    SetPrimaryMonitor {
        /// Monitor to promote.
        monitor_id: MonitorId,
    },
    /// Mark the monitor new windows open on.
    SetActiveMonitor {
        /// Monitor to activate.
        monitor_id: MonitorId,
    },
    /// Create a file under a folder.
    CreateFile {
        /// Parent folder path.
        parent_path: String,
        /// File to create.
        spec: FileSpec,
    },
    /// Create a folder under a folder.
    CreateFolder {
        /// Parent folder path.
        parent_path: String,
        /// New folder name.
        name: String,
    },
    /// Move an item into the trash.
    DeleteItem {
        /// Item path.
        path: String,
    },
    /// Rename an item in place.
    RenameItem {
        /// Item path.
        path: String,
        /// New name.
        new_name: String,
    },
    /// Move an item into another folder.
    MoveItem {
        /// Item path.
        source_path: String,
        /// Destination folder path.
        target_path: String,
    },
    /// Update the selection.
    SelectItem {
        /// Item to select.
        item_id: ItemId,
        /// Toggle membership instead of replacing the selection.
        multi_select: bool,
    },
    /// Clear the selection.
    ClearSelection,
    /// Change the current folder.
    Navigate {
        /// Folder path.
        path: String,
    },
    /// Flip a folder's expanded flag.
    ToggleFolderExpansion {
        /// Folder path.
        path: String,
    },
    /// Snapshot items into the clipboard.
    CopyToClipboard {
        /// Item paths.
        paths: Vec<String>,
        /// Copy or cut.
        operation: ClipboardOperation,
    },
    /// Paste the clipboard into a folder.
    PasteFromClipboard {
        /// Destination folder path.
        target_path: String,
    },
    /// Open an item with its associated application.
    OpenFile {
        /// Item path.
        path: String,
        /// Desktop container bounds for a newly opened window.
        bounds: Rect,
    },
    /// Permanently drop everything in the trash.
    EmptyTrash,
    /// Bookmark a folder.
    AddBookmark {
        /// Folder path.
        path: String,
    },
    /// Remove a folder bookmark.
    RemoveBookmark {
        /// Folder path.
        path: String,
    },
    /// Set a folder's view and sort preferences.
    SetFolderView {
        /// Folder path.
        path: String,
        /// View mode.
        view: FolderView,
        /// Sort key.
        sort_by: SortKey,
        /// Sort direction.
        sort_order: SortOrder,
    },
    /// Merge a partial settings document into the current settings.
    UpdateSettings(SettingsPatch),
    /// Restore default settings.
    ResetSettings,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_session`] for the host layer to execute.
pub enum RuntimeEffect {
    /// Move keyboard focus into the window's primary input.
    FocusWindowInput(WindowId),
    /// Notify the app rendered in a window about a lifecycle change.
    Lifecycle {
        /// Affected window.
        window_id: WindowId,
        /// Lifecycle change.
        event: AppLifecycleEvent,
    },
    /// File-system items left the tree; background work bound to them is stale.
    ItemsRemoved(Vec<ItemId>),
    /// Session settings changed and may be written back to the preference store.
    SettingsChanged,
}

impl RuntimeEffect {
    fn lifecycle(window_id: WindowId, event: AppLifecycleEvent) -> Self {
        Self::Lifecycle { window_id, event }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons an action was rejected. A rejected action leaves the session unchanged.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
    /// The target monitor id was not found.
    #[error("monitor not found")]
    MonitorNotFound,
    /// The target group id was not found.
    #[error("window group not found")]
    GroupNotFound,
    /// The only remaining monitor cannot be removed.
    #[error("cannot remove the last monitor")]
    LastMonitor,
    /// No item lives at the path.
    #[error("no item at `{0}`")]
    PathNotFound(String),
    /// No item has the id.
    #[error("no item with id {0}")]
    ItemNotFound(ItemId),
    /// The path names a file where a folder is required.
    #[error("`{0}` is not a folder")]
    NotAFolder(String),
    /// A sibling already uses the name.
    #[error("an item named `{0}` already exists there")]
    NameConflict(String),
    /// The name failed validation.
    #[error("invalid name: {0}")]
    InvalidName(NameValidationError),
    /// A folder cannot move into itself or one of its descendants.
    #[error("cannot move `{0}` into itself")]
    InvalidMove(String),
    /// The root folder cannot be renamed, moved, or deleted.
    #[error("the root folder cannot be changed")]
    RootImmutable,
    /// Paste was requested with nothing in the clipboard.
    #[error("clipboard is empty")]
    EmptyClipboard,
    /// The window's flags forbid the requested geometry change.
    #[error("window does not allow this interaction")]
    WindowLocked,
    /// A group needs at least one member.
    #[error("a window group needs at least one member")]
    EmptyGroup,
    /// A background completion arrived for a task that is no longer live.
    #[error("background task result is stale")]
    StaleTask,
}

impl ReducerError {
    /// Structured name validation failure the UI can surface next to the input.
    pub fn validation(&self) -> Option<&NameValidationError> {
        match self {
            Self::InvalidName(err) => Some(err),
            _ => None,
        }
    }
}

impl From<VfsError> for ReducerError {
    fn from(err: VfsError) -> Self {
        match err {
            VfsError::PathNotFound(path) => Self::PathNotFound(path),
            VfsError::ItemNotFound(id) => Self::ItemNotFound(id),
            VfsError::NotAFolder(path) => Self::NotAFolder(path),
            VfsError::NameConflict(name) => Self::NameConflict(name),
            VfsError::InvalidName(err) => Self::InvalidName(err),
            VfsError::InvalidMove(path) => Self::InvalidMove(path),
            VfsError::RootImmutable => Self::RootImmutable,
            VfsError::EmptyClipboard => Self::EmptyClipboard,
        }
    }
}

impl From<MonitorError> for ReducerError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::NotFound => Self::MonitorNotFound,
            MonitorError::LastMonitor => Self::LastMonitor,
        }
    }
}

/// Applies a [`SessionAction`] to the session state and collects resulting side effects.
///
/// The function mutates in place and may leave partial changes behind when it returns an error;
/// callers run it on a working copy and discard that copy on error.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action references something that does not exist or breaks
/// a constraint that cannot be clamped.
pub fn reduce_session(
    state: &mut SessionState,
    interaction: &mut InteractionState,
    action: SessionAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        SessionAction::OpenWindow(req) => {
            open_window(state, req, &mut effects);
        }
        SessionAction::CloseWindow { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound);
            }
            remove_from_groups(state, window_id);
            if state.active_window == Some(window_id) {
                state.active_window = None;
            }
            if interaction.gesture_window() == Some(window_id) {
                *interaction = InteractionState::default();
            }
            effects.push(RuntimeEffect::lifecycle(window_id, AppLifecycleEvent::Closed));
        }
        SessionAction::FocusWindow { window_id } => {
            // A click that lands on a window mid-gesture was already folded into gesture start.
            if interaction.gesture_window() == Some(window_id) {
                return Ok(effects);
            }
            focus(state, window_id, &mut effects)?;
        }
        SessionAction::MinimizeWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.minimized = true;
            window.maximized = false;
            window.fullscreen = false;
            if state.active_window == Some(window_id) {
                state.active_window = None;
            }
            effects.push(RuntimeEffect::lifecycle(window_id, AppLifecycleEvent::Minimized));
        }
        SessionAction::ToggleMaximize { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.maximized = !window.maximized;
            let event = if window.maximized {
                window.minimized = false;
                window.fullscreen = false;
                AppLifecycleEvent::Maximized
            } else {
                AppLifecycleEvent::Restored
            };
            effects.push(RuntimeEffect::lifecycle(window_id, event));
        }
        SessionAction::ToggleFullscreen { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.fullscreen = !window.fullscreen;
            let event = if window.fullscreen {
                window.minimized = false;
                window.maximized = false;
                AppLifecycleEvent::Fullscreen
            } else {
                AppLifecycleEvent::Restored
            };
            effects.push(RuntimeEffect::lifecycle(window_id, event));
        }
        SessionAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.minimized = false;
            window.maximized = false;
            window.fullscreen = false;
            focus(state, window_id, &mut effects)?;
            effects.push(RuntimeEffect::lifecycle(window_id, AppLifecycleEvent::Restored));
        }
        SessionAction::MoveWindow {
            window_id,
            position,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.flags.movable {
                return Err(ReducerError::WindowLocked);
            }
            window.position = position;
        }
        SessionAction::ResizeWindow {
            window_id,
            size,
            bounds,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.flags.resizable {
                return Err(ReducerError::WindowLocked);
            }
            window.size = clamp_size(size, window.min_size, window.effective_max_size(bounds));
        }
        SessionAction::SetAlwaysOnTop { window_id, enabled } => {
            find_window_mut(state, window_id)?.always_on_top = enabled;
        }
        SessionAction::SetOpacity { window_id, opacity } => {
            let opacity = if opacity.is_finite() {
                opacity.clamp(MIN_WINDOW_OPACITY, MAX_WINDOW_OPACITY)
            } else {
                MAX_WINDOW_OPACITY
            };
            find_window_mut(state, window_id)?.opacity = opacity;
        }
        SessionAction::SetWindowTitle { window_id, title } => {
            find_window_mut(state, window_id)?.title = title;
        }
        SessionAction::MoveWindowToMonitor {
            window_id,
            monitor_id,
        } => {
            if !state.monitors.contains(monitor_id) {
                return Err(ReducerError::MonitorNotFound);
            }
            find_window_mut(state, window_id)?.monitor_id = monitor_id;
        }
        SessionAction::SnapWindow {
            window_id,
            position,
            bounds,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.flags.movable {
                return Err(ReducerError::WindowLocked);
            }
            snap_window(window, position, bounds);
        }
        SessionAction::UnsnapWindow { window_id } => {
            unsnap_window(find_window_mut(state, window_id)?);
        }
        SessionAction::CycleFocus { reverse } => {
            let candidates: Vec<WindowId> = state
                .windows_by_z_order()
                .into_iter()
                .filter(|w| !w.minimized)
                .map(|w| w.id)
                .collect();
            let target = if reverse {
                candidates.iter().rev().nth(1).or(candidates.last())
            } else {
                candidates.first()
            };
            if let Some(window_id) = target.copied() {
                focus(state, window_id, &mut effects)?;
            }
        }
        SessionAction::ContentResolved {
            window_id,
            resolved_url,
        } => {
            find_window_mut(state, window_id)?
                .content
                .mark_ready(resolved_url);
        }
        SessionAction::GroupWindows { window_ids, name } => {
            group_windows(state, window_ids, name)?;
        }
        SessionAction::Ungroup { group_id } => {
            let index = state
                .groups
                .iter()
                .position(|g| g.id == group_id)
                .ok_or(ReducerError::GroupNotFound)?;
            state.groups.remove(index);
            for window in &mut state.windows {
                if window.group_id == Some(group_id) {
                    window.group_id = None;
                }
            }
        }
        other => {
            let handled =
                gestures::reduce_gesture_action(state, interaction, &other, &mut effects)?
                    || monitors::reduce_monitor_action(state, &other, &mut effects)?
                    || filesystem::reduce_file_action(state, &other, &mut effects)?
                    || settings::reduce_settings_action(state, &other, &mut effects)?;
            debug_assert!(handled, "unhandled session action: {other:?}");
        }
    }

    Ok(effects)
}

fn next_window_id(state: &mut SessionState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn next_group_id(state: &mut SessionState) -> GroupId {
    let id = GroupId(state.next_group_id);
    state.next_group_id = state.next_group_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut SessionState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound)
}

fn focus(
    state: &mut SessionState,
    window_id: WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    if !focus_window_internal(state, window_id) {
        return Err(ReducerError::WindowNotFound);
    }
    effects.push(RuntimeEffect::lifecycle(window_id, AppLifecycleEvent::Focused));
    effects.push(RuntimeEffect::FocusWindowInput(window_id));
    Ok(())
}

/// Opens a window for `req.component`, or focuses the existing one. Returns the window id.
fn open_window(
    state: &mut SessionState,
    req: OpenWindowRequest,
    effects: &mut Vec<RuntimeEffect>,
) -> WindowId {
    if let Some(window_id) = state.window_for_component(&req.component).map(|w| w.id) {
        if let (Some(content), Some(window)) = (
            req.content,
            state.windows.iter_mut().find(|w| w.id == window_id),
        ) {
            window.content = content;
        }
        if focus_window_internal(state, window_id) {
            effects.push(RuntimeEffect::lifecycle(window_id, AppLifecycleEvent::Focused));
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        return window_id;
    }

    let window_id = next_window_id(state);
    let bounds = req.bounds;
    let min_size = req
        .min_size
        .unwrap_or(Size::new(DEFAULT_MIN_WINDOW_WIDTH, DEFAULT_MIN_WINDOW_HEIGHT));
    let max_size = req.max_size.unwrap_or_else(|| bounds.size());
    let requested = req
        .size
        .unwrap_or(Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
    let size = fit_size_to_bounds(clamp_size(requested, min_size, max_size), bounds);
    let position = req
        .position
        .unwrap_or_else(|| cascade_position(state.windows.len(), bounds));

    let record = WindowRecord {
        id: window_id,
        title: req
            .title
            .unwrap_or_else(|| req.component.short_name().to_string()),
        content: req
            .content
            .unwrap_or_else(|| WindowContent::new(req.component.clone())),
        component: req.component,
        minimized: false,
        maximized: false,
        fullscreen: false,
        position,
        size,
        initial_size: size,
        z_index: 0,
        flags: req.flags,
        snapped: false,
        snap_position: None,
        monitor_id: state.monitors.active_id(),
        group_id: None,
        min_size,
        max_size: req.max_size,
        opacity: MAX_WINDOW_OPACITY,
        always_on_top: req.always_on_top,
        pre_snap: None,
    };
    state.windows.push(record);
    focus_window_internal(state, window_id);
    effects.push(RuntimeEffect::lifecycle(window_id, AppLifecycleEvent::Opened));
    effects.push(RuntimeEffect::FocusWindowInput(window_id));
    window_id
}

fn remove_from_groups(state: &mut SessionState, window_id: WindowId) {
    for group in &mut state.groups {
        group.members.retain(|member| *member != window_id);
    }
    let emptied: Vec<GroupId> = state
        .groups
        .iter()
        .filter(|g| g.members.is_empty())
        .map(|g| g.id)
        .collect();
    state.groups.retain(|g| !g.members.is_empty());
    for window in &mut state.windows {
        if window.group_id.is_some_and(|id| emptied.contains(&id)) {
            window.group_id = None;
        }
    }
}

fn group_windows(
    state: &mut SessionState,
    window_ids: Vec<WindowId>,
    name: String,
) -> Result<GroupId, ReducerError> {
    let mut members: Vec<WindowId> = Vec::with_capacity(window_ids.len());
    for window_id in window_ids {
        if state.window(window_id).is_none() {
            return Err(ReducerError::WindowNotFound);
        }
        if !members.contains(&window_id) {
            members.push(window_id);
        }
    }
    if members.is_empty() {
        return Err(ReducerError::EmptyGroup);
    }

    for window_id in &members {
        remove_from_groups(state, *window_id);
    }
    let group_id = next_group_id(state);
    let mut rng = rand::rng();
    let color = GROUP_COLORS[rng.random_range(0..GROUP_COLORS.len())].to_string();
    for window in &mut state.windows {
        if members.contains(&window.id) {
            window.group_id = Some(group_id);
        }
    }
    state.groups.push(WindowGroup {
        id: group_id,
        name,
        members,
        color,
    });
    Ok(group_id)
}
