//! File tree transitions.

use platform_host::normalize_virtual_path;

use crate::{
    apps::open_request_for_item,
    model::SessionState,
    reducer::{open_window, ReducerError, RuntimeEffect, SessionAction},
};

pub(super) fn reduce_file_action(
    state: &mut SessionState,
    action: &SessionAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    let tree = &mut state.file_system;
    match action {
        SessionAction::CreateFile { parent_path, spec } => {
            tree.create_file(parent_path, spec.clone())?;
        }
        SessionAction::CreateFolder { parent_path, name } => {
            tree.create_folder(parent_path, name)?;
        }
        SessionAction::DeleteItem { path } => {
            let removed = tree.delete(path)?;
            effects.push(RuntimeEffect::ItemsRemoved(removed));
        }
        SessionAction::RenameItem { path, new_name } => {
            let new_path = tree.rename(path, new_name)?;
            retarget_window_content(state, &normalize_virtual_path(path), &new_path);
        }
        SessionAction::MoveItem {
            source_path,
            target_path,
        } => {
            let new_path = tree.move_item(source_path, target_path)?;
            retarget_window_content(state, &normalize_virtual_path(source_path), &new_path);
        }
        SessionAction::SelectItem {
            item_id,
            multi_select,
        } => {
            tree.select(*item_id, *multi_select)?;
        }
        SessionAction::ClearSelection => tree.clear_selection(),
        SessionAction::Navigate { path } => tree.navigate(path)?,
        SessionAction::ToggleFolderExpansion { path } => {
            tree.toggle_folder_expansion(path)?;
        }
        SessionAction::CopyToClipboard { paths, operation } => {
            tree.copy_to_clipboard(paths, *operation)?;
        }
        SessionAction::PasteFromClipboard { target_path } => {
            let outcome = tree.paste_from_clipboard(target_path)?;
            for (old, new) in &outcome.moved {
                retarget_window_content(state, old, new);
            }
        }
        SessionAction::OpenFile { path, bounds } => {
            let path = normalize_virtual_path(path);
            let item = tree
                .item(&path)
                .ok_or_else(|| ReducerError::PathNotFound(path.clone()))?;
            let req = open_request_for_item(item, *bounds);
            if item.is_folder() {
                tree.navigate(&path)?;
            } else {
                tree.touch(&path)?;
            }
            open_window(state, req, effects);
        }
        SessionAction::EmptyTrash => {
            tree.empty_trash();
        }
        SessionAction::AddBookmark { path } => tree.add_bookmark(path)?,
        SessionAction::RemoveBookmark { path } => tree.remove_bookmark(path)?,
        SessionAction::SetFolderView {
            path,
            view,
            sort_by,
            sort_order,
        } => tree.set_folder_view(path, *view, *sort_by, *sort_order)?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Points window content that referenced `old` (or anything below it) at the item's new path.
fn retarget_window_content(state: &mut SessionState, old: &str, new: &str) {
    for window in &mut state.windows {
        let Some(url) = window.content.resolved_url.as_mut() else {
            continue;
        };
        if let Some(rest) = url.strip_prefix(old) {
            if rest.is_empty() || rest.starts_with('/') {
                *url = format!("{new}{rest}");
            }
        }
    }
}
