//! Leptos binding for the session store.
//!
//! The provider owns one [`SessionStore`] and mirrors its state into signals after every changing
//! dispatch. Reducer effects are queued for the UI layer; settings changes are also written back
//! to the preference store.
#![allow(clippy::clone_on_copy)]

use std::rc::Rc;

use leptos::*;
use platform_host::PrefsStore;

use crate::{
    model::{InteractionState, SessionState},
    reducer::{ReducerError, RuntimeEffect, SessionAction},
    settings::{load_settings_patch, save_session_settings},
    store::SessionStore,
};

#[derive(Clone, Copy)]
/// Leptos context for reading session state and dispatching [`SessionAction`] values.
pub struct SessionRuntimeContext {
    /// The store every dispatch goes through.
    pub store: StoredValue<SessionStore>,
    /// Preference store that settings are persisted to.
    pub prefs: StoredValue<Rc<dyn PrefsStore>>,
    /// Reactive session state signal.
    pub state: RwSignal<SessionState>,
    /// Reactive drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Effects emitted by the reducer, oldest first, until the UI drains them.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Most recent rejection, cleared by the next accepted action.
    pub last_rejection: RwSignal<Option<ReducerError>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<SessionAction>,
}

impl SessionRuntimeContext {
    /// Creates the store and its signals under the current reactive runtime.
    pub fn new(initial: SessionState, prefs: Rc<dyn PrefsStore>) -> Self {
        let state = create_rw_signal(initial.clone());
        let interaction = create_rw_signal(InteractionState::default());
        let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
        let last_rejection = create_rw_signal(None::<ReducerError>);
        let store = store_value(SessionStore::new(initial));
        let prefs = store_value(prefs);

        let dispatch = Callback::new(move |action: SessionAction| {
            let Some(outcome) = store.try_update_value(|store| store.dispatch(action)) else {
                logging::warn!("session store disposed; dropping action");
                return;
            };
            if let Some(err) = outcome.rejection {
                last_rejection.set(Some(err));
                return;
            }
            if last_rejection.get_untracked().is_some() {
                last_rejection.set(None);
            }
            if outcome.changed {
                store.with_value(|store| {
                    if store.state() != &state.get_untracked() {
                        state.set(store.state().clone());
                    }
                    if store.interaction() != &interaction.get_untracked() {
                        interaction.set(store.interaction().clone());
                    }
                });
            }
            if outcome.effects.contains(&RuntimeEffect::SettingsChanged) {
                persist_settings(prefs, state.get_untracked());
            }
            if !outcome.effects.is_empty() {
                effects.update(|queue| queue.extend(outcome.effects));
            }
        });

        Self {
            store,
            prefs,
            state,
            interaction,
            effects,
            last_rejection,
            dispatch,
        }
    }

    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: SessionAction) {
        self.dispatch.call(action);
    }

    /// Removes and returns every queued effect.
    pub fn drain_effects(&self) -> Vec<RuntimeEffect> {
        let mut drained = Vec::new();
        self.effects.update(|queue| drained = std::mem::take(queue));
        drained
    }
}

fn persist_settings(prefs: StoredValue<Rc<dyn PrefsStore>>, state: SessionState) {
    let prefs = prefs.get_value();
    spawn_local(async move {
        if let Err(err) = save_session_settings(prefs.as_ref(), &state.settings).await {
            logging::warn!("persist session settings failed: {err}");
        }
    });
}

fn install_boot_hydration(runtime: SessionRuntimeContext) {
    let prefs = runtime.prefs.get_value();
    spawn_local(async move {
        if let Some(patch) = load_settings_patch(prefs.as_ref()).await {
            runtime.dispatch_action(SessionAction::UpdateSettings(patch));
        }
    });
}

#[component]
/// Provides [`SessionRuntimeContext`] to descendant components and hydrates stored settings.
pub fn SessionProvider(
    /// Preference store assembled by the entry layer.
    prefs: Rc<dyn PrefsStore>,
    children: Children,
) -> impl IntoView {
    let runtime = SessionRuntimeContext::new(SessionState::default(), prefs);
    provide_context(runtime.clone());
    install_boot_hydration(runtime);
    children().into_view()
}

/// Returns the current [`SessionRuntimeContext`], if a provider is mounted above.
pub fn try_use_session_runtime() -> Option<SessionRuntimeContext> {
    use_context::<SessionRuntimeContext>()
}

/// Returns the current [`SessionRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`SessionProvider`].
pub fn use_session_runtime() -> SessionRuntimeContext {
    try_use_session_runtime().expect("SessionRuntimeContext not provided")
}
