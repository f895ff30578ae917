//! Session core for a browser desktop: window manager, virtual file tree, and settings, all
//! mutated through one action-dispatch store.

pub mod apps;
pub mod model;
pub mod monitors;
pub mod reducer;
pub mod runtime_context;
pub mod settings;
pub mod store;
pub mod tasks;
pub mod vfs;
pub mod window_manager;

pub use model::*;
pub use monitors::{MonitorError, MonitorRegistry};
pub use reducer::{reduce_session, ReducerError, RuntimeEffect, SessionAction};
pub use runtime_context::{
    try_use_session_runtime, use_session_runtime, SessionProvider, SessionRuntimeContext,
};
pub use settings::{SessionSettings, SettingsPatch};
pub use store::{transition, DispatchOutcome, ListenerId, SessionStore};
pub use tasks::{TaskRegistry, TaskTarget, TaskTicket};
