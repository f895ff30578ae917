//! Window geometry, snap, and focus helpers used by the session reducer.
//!
//! The geometry functions are pure: they take the live container bounds as an argument and
//! never cache them.

use crate::model::{
    Point, Rect, ResizeEdge, SessionState, Size, SnapPosition, WindowGeometry, WindowId,
    WindowRecord,
};

/// Distance (in px) from a container edge at which a dragged window becomes a snap candidate.
pub const SNAP_EDGE_THRESHOLD: f64 = 20.0;
/// Offset of the first cascaded window from the container origin.
pub const CASCADE_ORIGIN: f64 = 40.0;
/// Per-window cascade step.
pub const CASCADE_STEP: f64 = 30.0;

/// Initial position for a new window given how many windows are already open.
pub fn cascade_position(window_count: usize, bounds: Rect) -> Point {
    let offset = CASCADE_ORIGIN + CASCADE_STEP * window_count as f64;
    Point::new(bounds.x + offset, bounds.y + offset)
}

/// Clamps `size` into `[min, max]` per axis; `min` wins when the bounds cross.
pub fn clamp_size(size: Size, min: Size, max: Size) -> Size {
    Size::new(
        size.width.min(max.width).max(min.width),
        size.height.min(max.height).max(min.height),
    )
}

/// Shrinks `size` so it never exceeds the visible container.
pub fn fit_size_to_bounds(size: Size, bounds: Rect) -> Size {
    Size::new(size.width.min(bounds.width), size.height.min(bounds.height))
}

/// Computes the geometry for a resize sample from the gesture-start snapshot.
///
/// Handles touching the top or left edge move the window so the opposite edge stays put.
pub fn resize_from_snapshot(
    snapshot: WindowGeometry,
    edge: ResizeEdge,
    dx: f64,
    dy: f64,
    min: Size,
    max: Size,
) -> WindowGeometry {
    let start = snapshot.size;
    let mut requested = start;
    if edge.grows_right() {
        requested.width = start.width + dx;
    } else if edge.moves_left_edge() {
        requested.width = start.width - dx;
    }
    if edge.grows_down() {
        requested.height = start.height + dy;
    } else if edge.moves_top_edge() {
        requested.height = start.height - dy;
    }

    let size = clamp_size(requested, min, max);
    let mut position = snapshot.position;
    if edge.moves_left_edge() {
        position.x = snapshot.position.x + (start.width - size.width);
    }
    if edge.moves_top_edge() {
        position.y = snapshot.position.y + (start.height - size.height);
    }
    WindowGeometry { position, size }
}

/// Returns the first container edge (left, right, top, bottom) within the snap threshold.
///
/// Distances are absolute, so a window pushed well past an edge is not a candidate.
pub fn snap_candidate(geometry: WindowGeometry, bounds: Rect) -> Option<SnapPosition> {
    let left = geometry.position.x - bounds.x;
    let right = bounds.right() - (geometry.position.x + geometry.size.width);
    let top = geometry.position.y - bounds.y;
    let bottom = bounds.bottom() - (geometry.position.y + geometry.size.height);

    SnapPosition::EDGE_PRIORITY
        .into_iter()
        .zip([left, right, top, bottom])
        .find(|(_, distance)| distance.abs() <= SNAP_EDGE_THRESHOLD)
        .map(|(position, _)| position)
}

/// Geometry a window takes when snapped to `position` inside `bounds`.
pub fn snapped_geometry(position: SnapPosition, bounds: Rect) -> WindowGeometry {
    let half_w = bounds.width / 2.0;
    let half_h = bounds.height / 2.0;
    let (x, y, width, height) = match position {
        SnapPosition::Left => (bounds.x, bounds.y, half_w, bounds.height),
        SnapPosition::Right => (bounds.x + half_w, bounds.y, half_w, bounds.height),
        SnapPosition::Top => (bounds.x, bounds.y, bounds.width, half_h),
        SnapPosition::Bottom => (bounds.x, bounds.y + half_h, bounds.width, half_h),
        SnapPosition::TopLeft => (bounds.x, bounds.y, half_w, half_h),
        SnapPosition::TopRight => (bounds.x + half_w, bounds.y, half_w, half_h),
        SnapPosition::BottomLeft => (bounds.x, bounds.y + half_h, half_w, half_h),
        SnapPosition::BottomRight => (bounds.x + half_w, bounds.y + half_h, half_w, half_h),
    };
    WindowGeometry {
        position: Point::new(x, y),
        size: Size::new(width, height),
    }
}

/// Whether any part of `geometry` lies outside `bounds`.
pub fn is_partially_outside(geometry: WindowGeometry, bounds: Rect) -> bool {
    geometry.position.x < bounds.x
        || geometry.position.y < bounds.y
        || geometry.position.x + geometry.size.width > bounds.right()
        || geometry.position.y + geometry.size.height > bounds.bottom()
}

/// Snaps `window` to `position`, remembering its pre-snap geometry on the first snap.
pub fn snap_window(window: &mut WindowRecord, position: SnapPosition, bounds: Rect) {
    if !window.snapped {
        window.pre_snap = Some(window.geometry());
    }
    window.set_geometry(snapped_geometry(position, bounds));
    window.snapped = true;
    window.snap_position = Some(position);
    window.minimized = false;
    window.maximized = false;
    window.fullscreen = false;
}

/// Leaves the snapped state and restores the remembered geometry. Returns `false` if the window
/// was not snapped.
pub fn unsnap_window(window: &mut WindowRecord) -> bool {
    if !window.snapped {
        return false;
    }
    if let Some(geometry) = window.pre_snap.take() {
        window.set_geometry(geometry);
    }
    window.snapped = false;
    window.snap_position = None;
    true
}

/// Stamps the focus counter onto `window_id` and makes it the active window.
///
/// Returns `false` when the window does not exist.
pub fn focus_window_internal(state: &mut SessionState, window_id: WindowId) -> bool {
    let z_index = state.next_z_index;
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return false;
    };
    window.z_index = z_index;
    window.minimized = false;
    state.next_z_index = z_index.saturating_add(1);
    state.active_window = Some(window_id);
    true
}
