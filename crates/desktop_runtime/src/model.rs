use desktop_app_contract::{ApplicationId, WindowContent};
use serde::{Deserialize, Serialize};

use crate::{monitors::MonitorRegistry, settings::SessionSettings, vfs::FileSystemTree};

pub const DEFAULT_WINDOW_WIDTH: f64 = 800.0;
pub const DEFAULT_WINDOW_HEIGHT: f64 = 600.0;
pub const DEFAULT_MIN_WINDOW_WIDTH: f64 = 300.0;
pub const DEFAULT_MIN_WINDOW_HEIGHT: f64 = 200.0;
/// Base of the rendered always-on-top tier while the focus counter stays below it.
pub const ALWAYS_ON_TOP_Z_OFFSET: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonitorId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Live bounding rectangle of the desktop container, supplied by the host at call time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapPosition {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapPosition {
    /// Order in which container edges are tested during a drag; the first edge in range wins.
    pub const EDGE_PRIORITY: [SnapPosition; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "sw")]
    SouthWest,
}

impl ResizeEdge {
    /// Whether dragging this handle moves the window's left edge.
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Whether dragging this handle moves the window's top edge.
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Self::North | Self::NorthWest | Self::NorthEast)
    }

    pub fn grows_right(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn grows_down(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFlags {
    pub resizable: bool,
    pub draggable: bool,
    pub movable: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            resizable: true,
            draggable: true,
            movable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub component: ApplicationId,
    pub content: WindowContent,
    pub minimized: bool,
    pub maximized: bool,
    pub fullscreen: bool,
    pub position: Point,
    pub size: Size,
    pub initial_size: Size,
    pub z_index: u64,
    pub flags: WindowFlags,
    pub snapped: bool,
    pub snap_position: Option<SnapPosition>,
    pub monitor_id: MonitorId,
    pub group_id: Option<GroupId>,
    pub min_size: Size,
    pub max_size: Option<Size>,
    pub opacity: f64,
    pub always_on_top: bool,
    pub pre_snap: Option<WindowGeometry>,
}

impl WindowRecord {
    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry {
            position: self.position,
            size: self.size,
        }
    }

    pub fn set_geometry(&mut self, geometry: WindowGeometry) {
        self.position = geometry.position;
        self.size = geometry.size;
    }

    /// Stacking order key: the always-on-top tier first, then focus recency within the tier.
    pub fn stacking_key(&self) -> (bool, u64) {
        (self.always_on_top, self.z_index)
    }

    /// Maximum size, falling back to the container bounds when none was configured.
    pub fn effective_max_size(&self, bounds: Rect) -> Size {
        self.max_size.unwrap_or_else(|| bounds.size())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: MonitorId,
    pub name: String,
    pub primary: bool,
    pub resolution: Size,
    pub position: Point,
    pub scale_factor: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSpec {
    pub name: String,
    pub resolution: Size,
    pub position: Point,
    pub scale_factor: f64,
    pub primary: bool,
}

impl MonitorSpec {
    pub fn new(name: impl Into<String>, resolution: Size) -> Self {
        Self {
            name: name.into(),
            resolution,
            position: Point::default(),
            scale_factor: 1.0,
            primary: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGroup {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<WindowId>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub component: ApplicationId,
    pub title: Option<String>,
    pub size: Option<Size>,
    pub position: Option<Point>,
    pub content: Option<WindowContent>,
    pub flags: WindowFlags,
    pub min_size: Option<Size>,
    pub max_size: Option<Size>,
    pub always_on_top: bool,
    /// Desktop container bounds at the time of the request.
    pub bounds: Rect,
}

impl OpenWindowRequest {
    pub fn new(component: ApplicationId, bounds: Rect) -> Self {
        Self {
            component,
            title: None,
            size: None,
            position: None,
            content: None,
            flags: WindowFlags::default(),
            min_size: None,
            max_size: None,
            always_on_top: false,
            bounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub windows: Vec<WindowRecord>,
    pub active_window: Option<WindowId>,
    pub next_window_id: u64,
    /// Focus counter; every focus stamps the current value and increments it.
    pub next_z_index: u64,
    pub groups: Vec<WindowGroup>,
    pub next_group_id: u64,
    pub monitors: MonitorRegistry,
    pub file_system: FileSystemTree,
    pub settings: SessionSettings,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            active_window: None,
            next_window_id: 1,
            next_z_index: 1,
            groups: Vec::new(),
            next_group_id: 1,
            monitors: MonitorRegistry::default(),
            file_system: FileSystemTree::seeded(),
            settings: SessionSettings::default(),
        }
    }
}

impl SessionState {
    /// Fresh session with an empty file tree instead of the seeded sample folders.
    pub fn empty() -> Self {
        Self {
            file_system: FileSystemTree::new(),
            ..Self::default()
        }
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn window_for_component(&self, component: &ApplicationId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.component == component)
    }

    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.active_window.and_then(|id| self.window(id))
    }

    pub fn group(&self, group_id: GroupId) -> Option<&WindowGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Windows ordered bottom to top by effective z-index.
    pub fn windows_by_z_order(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|w| (w.stacking_key(), w.id));
        ordered
    }

    /// Rendered z-index of `window`.
    ///
    /// The always-on-top tier is offset past every value the focus counter has handed out, so
    /// it stays above normal windows however many focus changes happen.
    pub fn effective_z_index(&self, window: &WindowRecord) -> u64 {
        if window.always_on_top {
            self.next_z_index
                .max(ALWAYS_ON_TOP_Z_OFFSET)
                .saturating_add(window.z_index)
        } else {
            window.z_index
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: Point,
    pub position_start: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: Point,
    /// Geometry captured once at gesture start; every sample is computed from it.
    pub snapshot: WindowGeometry,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
    /// Snap target highlighted while a drag is in flight.
    pub snap_preview: Option<SnapPosition>,
}

impl InteractionState {
    /// Window currently under a drag or resize gesture.
    pub fn gesture_window(&self) -> Option<WindowId> {
        self.dragging
            .as_ref()
            .map(|session| session.window_id)
            .or_else(|| self.resizing.as_ref().map(|session| session.window_id))
    }
}
