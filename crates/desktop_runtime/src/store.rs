//! The session store: single owner and sole mutator of session state.
//!
//! Dispatch is total. The reducer runs on a working copy that is committed only on success, so a
//! rejected action leaves the published state untouched and reports why in [`DispatchOutcome`].

use std::future::Future;

use desktop_app_contract::AppLifecycleEvent;
use futures::future::Abortable;
use leptos::logging;

use crate::{
    model::{InteractionState, SessionState},
    reducer::{reduce_session, ReducerError, RuntimeEffect, SessionAction},
    tasks::{TaskRegistry, TaskTarget, TaskTicket},
};

#[derive(Debug, Clone, PartialEq)]
/// Result of a dispatch.
pub struct DispatchOutcome {
    /// Whether the session or interaction state changed.
    pub changed: bool,
    /// Side-effect intents for the host layer.
    pub effects: Vec<RuntimeEffect>,
    /// Why the action was refused, when it was.
    pub rejection: Option<ReducerError>,
}

impl DispatchOutcome {
    fn rejected(err: ReducerError) -> Self {
        Self {
            changed: false,
            effects: Vec::new(),
            rejection: Some(err),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&SessionState)>;

pub struct SessionStore {
    state: SessionState,
    interaction: InteractionState,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
    tasks: TaskRegistry,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}

impl SessionStore {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            interaction: InteractionState::default(),
            listeners: Vec::new(),
            next_listener_id: 1,
            tasks: TaskRegistry::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Applies `action` and republishes the state to every listener when it changed.
    pub fn dispatch(&mut self, action: SessionAction) -> DispatchOutcome {
        let mut next = self.state.clone();
        let mut interaction = self.interaction.clone();
        match reduce_session(&mut next, &mut interaction, action) {
            Ok(effects) => {
                let changed = next != self.state || interaction != self.interaction;
                self.state = next;
                self.interaction = interaction;
                self.cancel_orphaned_tasks(&effects);
                if changed {
                    self.notify();
                }
                DispatchOutcome {
                    changed,
                    effects,
                    rejection: None,
                }
            }
            Err(err) => {
                logging::warn!("session reducer rejected action: {err}");
                DispatchOutcome::rejected(err)
            }
        }
    }

    /// Registers a listener called with the new state after every changing dispatch.
    pub fn subscribe(&mut self, listener: impl Fn(&SessionState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Registers background work for `target`; spawn the returned future on the host executor.
    pub fn begin_task<F: Future>(
        &mut self,
        target: TaskTarget,
        future: F,
    ) -> (TaskTicket, Abortable<F>) {
        self.tasks.begin(target, future)
    }

    /// Applies a background result, unless its task was cancelled or its target is gone.
    pub fn complete_task(&mut self, ticket: TaskTicket, action: SessionAction) -> DispatchOutcome {
        let Some(target) = self.tasks.finish(ticket) else {
            logging::log!("discarding result of retired task {ticket:?}");
            return DispatchOutcome::rejected(ReducerError::StaleTask);
        };
        if !self.target_exists(target) {
            logging::log!("discarding result for vanished {target:?}");
            return DispatchOutcome::rejected(ReducerError::StaleTask);
        }
        self.dispatch(action)
    }

    fn target_exists(&self, target: TaskTarget) -> bool {
        match target {
            TaskTarget::Window(window_id) => self.state.window(window_id).is_some(),
            TaskTarget::Item(item_id) => self.state.file_system.contains_id(item_id),
        }
    }

    fn cancel_orphaned_tasks(&mut self, effects: &[RuntimeEffect]) {
        for effect in effects {
            match effect {
                RuntimeEffect::Lifecycle {
                    window_id,
                    event: AppLifecycleEvent::Closed,
                } => {
                    self.tasks.cancel_for(TaskTarget::Window(*window_id));
                }
                RuntimeEffect::ItemsRemoved(item_ids) => {
                    for item_id in item_ids {
                        self.tasks.cancel_for(TaskTarget::Item(*item_id));
                    }
                }
                _ => {}
            }
        }
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

/// Pure transition: the state after `action`, or a clone of `state` when the action is rejected.
pub fn transition(
    state: &SessionState,
    interaction: &InteractionState,
    action: SessionAction,
) -> (SessionState, InteractionState) {
    let mut next = state.clone();
    let mut next_interaction = interaction.clone();
    match reduce_session(&mut next, &mut next_interaction, action) {
        Ok(_) => (next, next_interaction),
        Err(_) => (state.clone(), interaction.clone()),
    }
}
