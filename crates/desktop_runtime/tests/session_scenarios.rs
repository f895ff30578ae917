use desktop_app_contract::{builtin, ApplicationId};
use desktop_runtime::{
    vfs::{sort_items, FileSpec, FileSystemItem, FolderRecord, SearchOptions, SortKey, SortOrder},
    MonitorId, OpenWindowRequest, Point, Rect, ReducerError, ResizeEdge, SessionAction,
    SessionState, SessionStore, Size, SnapPosition, WindowId,
};
use platform_host::{join_path, parent_path};
use pretty_assertions::assert_eq;

const BOUNDS: Rect = Rect::new(0.0, 0.0, 1200.0, 800.0);

fn store() -> SessionStore {
    SessionStore::new(SessionState::empty())
}

fn accept(store: &mut SessionStore, action: SessionAction) {
    let outcome = store.dispatch(action);
    assert_eq!(outcome.rejection, None);
}

fn open(store: &mut SessionStore, app: &str) -> WindowId {
    accept(
        store,
        SessionAction::OpenWindow(OpenWindowRequest::new(ApplicationId::trusted(app), BOUNDS)),
    );
    store.state().active_window.expect("opened window is active")
}

fn create_folder(store: &mut SessionStore, parent: &str, name: &str) {
    accept(
        store,
        SessionAction::CreateFolder {
            parent_path: parent.to_string(),
            name: name.to_string(),
        },
    );
}

fn create_file(store: &mut SessionStore, parent: &str, name: &str, size: u64) {
    accept(
        store,
        SessionAction::CreateFile {
            parent_path: parent.to_string(),
            spec: FileSpec::new(name).with_size(size),
        },
    );
}

fn assert_aggregates(folder: &FolderRecord) {
    assert_eq!(folder.item_count, folder.children.len(), "{}", folder.meta.path);
    let expected: u64 = folder.children.values().map(FileSystemItem::aggregate_size).sum();
    assert_eq!(folder.total_size, expected, "{}", folder.meta.path);
    for child in folder.children.values() {
        if let Some(sub) = child.as_folder() {
            assert_aggregates(sub);
        }
    }
}

#[test]
fn nested_create_records_count_and_path() {
    let mut store = store();
    create_folder(&mut store, "/", "Projects");
    create_folder(&mut store, "/Projects", "demo");
    create_file(&mut store, "/Projects/demo", "demo.txt", 12);

    let tree = &store.state().file_system;
    let demo = tree.folder("/Projects/demo").expect("demo folder");
    assert_eq!(demo.item_count, 1);
    assert_eq!(
        tree.item("/Projects/demo/demo.txt").map(FileSystemItem::path),
        Some("/Projects/demo/demo.txt")
    );
    assert_aggregates(&tree.root);
}

#[test]
fn opening_same_app_twice_focuses_existing_window() {
    let mut store = store();
    let first = open(&mut store, builtin::NOTEPAD);
    open(&mut store, builtin::TERMINAL);
    let again = open(&mut store, builtin::NOTEPAD);

    let notepad = ApplicationId::trusted(builtin::NOTEPAD);
    let count = store
        .state()
        .windows
        .iter()
        .filter(|w| w.component == notepad)
        .count();
    assert_eq!(count, 1);
    assert_eq!(again, first);
    assert_eq!(store.state().active_window, Some(first));
}

#[test]
fn drag_release_near_left_edge_snaps_to_left_half() {
    let mut store = store();
    let id = open(&mut store, builtin::EXPLORER);
    accept(
        &mut store,
        SessionAction::MoveWindow {
            window_id: id,
            position: Point::new(300.0, 120.0),
        },
    );
    accept(
        &mut store,
        SessionAction::BeginDrag {
            window_id: id,
            pointer: Point::new(400.0, 130.0),
        },
    );
    accept(
        &mut store,
        SessionAction::UpdateDrag {
            pointer: Point::new(112.0, 140.0),
            bounds: BOUNDS,
        },
    );
    accept(&mut store, SessionAction::EndDrag { bounds: BOUNDS });

    let window = store.state().window(id).expect("window");
    assert_eq!(window.snap_position, Some(SnapPosition::Left));
    assert_eq!(window.size.width, BOUNDS.width / 2.0);
    assert_eq!(window.position, Point::new(0.0, 0.0));
}

#[test]
fn removing_only_monitor_is_rejected() {
    let mut store = store();
    let before = store.state().clone();

    let outcome = store.dispatch(SessionAction::RemoveMonitor {
        monitor_id: MonitorId(1),
    });

    assert_eq!(outcome.rejection, Some(ReducerError::LastMonitor));
    assert_eq!(store.state().monitors.len(), 1);
    assert_eq!(store.state(), &before);
}

#[test]
fn west_resize_past_minimum_keeps_right_edge() {
    let mut store = store();
    let id = open(&mut store, builtin::EXPLORER);
    let start = store.state().window(id).expect("window").geometry();
    let right_edge = start.position.x + start.size.width;
    accept(
        &mut store,
        SessionAction::BeginResize {
            window_id: id,
            edge: ResizeEdge::West,
            pointer: start.position,
        },
    );
    accept(
        &mut store,
        SessionAction::UpdateResize {
            pointer: start.position.offset(start.size.width, 0.0),
            bounds: BOUNDS,
        },
    );
    accept(&mut store, SessionAction::EndResize);

    let window = store.state().window(id).expect("window");
    assert_eq!(window.size.width, window.min_size.width);
    assert_eq!(window.position.x + window.size.width, right_edge);
    assert_eq!(window.size.height, start.size.height);
}

#[test]
fn deleting_file_updates_folder_aggregates() {
    let mut store = store();
    create_folder(&mut store, "/", "Reports");
    for name in ["q1.csv", "q2.csv", "q3.csv"] {
        create_file(&mut store, "/Reports", name, 1024);
    }
    let reports = store.state().file_system.folder("/Reports").expect("folder");
    assert_eq!((reports.item_count, reports.total_size), (3, 3072));

    accept(
        &mut store,
        SessionAction::DeleteItem {
            path: "/Reports/q2.csv".to_string(),
        },
    );

    let reports = store.state().file_system.folder("/Reports").expect("folder");
    assert_eq!((reports.item_count, reports.total_size), (2, 2048));
    assert_aggregates(&store.state().file_system.root);
}

#[test]
fn focused_window_has_greatest_z_among_normal_windows() {
    let mut store = store();
    let ids = [
        open(&mut store, builtin::NOTEPAD),
        open(&mut store, builtin::TERMINAL),
        open(&mut store, builtin::MAIL),
    ];
    accept(
        &mut store,
        SessionAction::SetAlwaysOnTop {
            window_id: ids[2],
            enabled: true,
        },
    );

    for id in [ids[0], ids[2], ids[1], ids[0]] {
        accept(&mut store, SessionAction::FocusWindow { window_id: id });
        let state = store.state();
        let focused = state.window(id).expect("window");
        for other in state.windows.iter().filter(|w| w.id != id && !w.always_on_top) {
            if !focused.always_on_top {
                assert!(focused.z_index > other.z_index);
            }
        }
        let top = state.windows_by_z_order().last().map(|w| w.id);
        assert_eq!(top, Some(ids[2]));
    }
}

#[test]
fn snap_then_unsnap_restores_exact_geometry() {
    let mut store = store();
    let id = open(&mut store, builtin::GALLERY);
    accept(
        &mut store,
        SessionAction::MoveWindow {
            window_id: id,
            position: Point::new(123.25, 77.5),
        },
    );
    accept(
        &mut store,
        SessionAction::ResizeWindow {
            window_id: id,
            size: Size::new(511.75, 333.125),
            bounds: BOUNDS,
        },
    );
    let before = store.state().window(id).expect("window").geometry();

    for position in [SnapPosition::TopRight, SnapPosition::Bottom] {
        accept(
            &mut store,
            SessionAction::SnapWindow {
                window_id: id,
                position,
                bounds: BOUNDS,
            },
        );
    }
    accept(&mut store, SessionAction::UnsnapWindow { window_id: id });

    let window = store.state().window(id).expect("window");
    assert!(!window.snapped);
    assert_eq!(window.geometry(), before);
}

#[test]
fn rename_places_item_under_same_parent() {
    let mut store = store();
    create_folder(&mut store, "/", "Docs");
    create_file(&mut store, "/Docs", "draft.md", 5);
    let path = "/Docs/draft.md";

    accept(
        &mut store,
        SessionAction::RenameItem {
            path: path.to_string(),
            new_name: "final.md".to_string(),
        },
    );

    let expected = join_path(&parent_path(path), "final.md");
    let tree = &store.state().file_system;
    assert_eq!(tree.item(&expected).map(FileSystemItem::path), Some(expected.as_str()));
    assert!(tree.item(path).is_none());
}

#[test]
fn search_respects_limit_and_case_rule() {
    let state = SessionState::default();
    let tree = &state.file_system;

    let options = SearchOptions {
        max_results: 3,
        ..SearchOptions::default()
    };
    let hits = tree.search("E", &options);
    assert!(!hits.is_empty() && hits.len() <= 3);
    assert!(hits.iter().all(|item| item.name().to_lowercase().contains('e')));

    let strict = SearchOptions {
        case_sensitive: true,
        ..SearchOptions::default()
    };
    assert!(tree
        .search("P", &strict)
        .iter()
        .all(|item| item.name().contains('P')));
}

#[test]
fn type_sort_puts_folders_first_then_names() {
    let state = SessionState::default();
    let mut items: Vec<&FileSystemItem> = state.file_system.root.children.values().collect();
    let documents = state.file_system.folder("/Documents").expect("seeded");
    items.extend(documents.children.values());

    sort_items(&mut items, SortKey::Type, SortOrder::Ascending);

    let first_file = items.iter().position(|item| !item.is_folder()).expect("files");
    assert!(items[first_file..].iter().all(|item| !item.is_folder()));
    let folder_names: Vec<String> = items[..first_file]
        .iter()
        .map(|item| item.name().to_lowercase())
        .collect();
    let mut sorted = folder_names.clone();
    sorted.sort();
    assert_eq!(folder_names, sorted);
}

#[test]
fn rejected_action_reports_reason_and_keeps_state() {
    let mut store = store();
    let before = store.state().clone();

    let outcome = store.dispatch(SessionAction::CreateFolder {
        parent_path: "/nowhere".to_string(),
        name: "x".to_string(),
    });

    assert_eq!(
        outcome.rejection,
        Some(ReducerError::PathNotFound("/nowhere".to_string()))
    );
    assert_eq!(store.state(), &before);
}
