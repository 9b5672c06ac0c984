//! Runtime provider and context wiring for an upload surface.
//!
//! This module owns the reducer container, the effect queue, and transfer id minting. UI
//! composition stays in [`crate::components`].

use leptos::*;

use crate::{
    effect_executor,
    host::UploadHostContext,
    model::{TransferId, UploadState},
    reducer::{reduce_upload, UploadAction, UploadEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading upload state and dispatching [`UploadAction`] values.
pub struct UploadRuntimeContext {
    /// Host service bundle for executing reducer effects.
    pub host: StoredValue<UploadHostContext>,
    /// Reactive upload state signal.
    pub state: RwSignal<UploadState>,
    /// Queue of effects emitted by the reducer and drained by the executor.
    pub effects: RwSignal<Vec<UploadEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<UploadAction>,
    last_transfer: StoredValue<u64>,
}

impl UploadRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    ///
    /// Actions arriving after the surface was disposed are dropped.
    pub fn dispatch_action(&self, action: UploadAction) {
        if self.state.try_with_untracked(|_| ()).is_none() {
            logging::log!("upload surface disposed, dropping `{}`", action.name());
            return;
        }
        self.dispatch.call(action);
    }

    /// Mints an id for a new request.
    pub fn next_transfer_id(&self) -> TransferId {
        self.last_transfer.update_value(|last| *last += 1);
        TransferId(self.last_transfer.get_value())
    }

    /// Submits the queued files.
    pub fn start_upload(&self) {
        let transfer = self.next_transfer_id();
        self.dispatch_action(UploadAction::StartUpload { transfer });
    }

    /// Resubmits the queued files after a failure or abort.
    pub fn retry_upload(&self) {
        let transfer = self.next_transfer_id();
        self.dispatch_action(UploadAction::Retry { transfer });
    }
}

#[component]
/// Provides [`UploadRuntimeContext`] to descendant components.
pub fn UploadProvider(
    /// Host service bundle assembled by the entry layer.
    host: UploadHostContext,
    children: Children,
) -> impl IntoView {
    let host = store_value(host);
    let state = create_rw_signal(UploadState::default());
    let effects = create_rw_signal(Vec::<UploadEffect>::new());

    let dispatch = Callback::new(move |action: UploadAction| {
        let name = action.name();
        let current = state.get_untracked();

        match reduce_upload(&current, action) {
            Ok((next, new_effects)) => {
                if next != current {
                    state.set(next);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("upload reducer rejected `{name}`: {err}"),
        }
    });

    let runtime = UploadRuntimeContext {
        host,
        state,
        effects,
        dispatch,
        last_transfer: store_value(0),
    };

    provide_context(runtime);
    effect_executor::install(runtime);
    on_cleanup(move || host.with_value(UploadHostContext::discard_all));

    children().into_view()
}

/// Returns the current [`UploadRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`UploadProvider`].
pub fn use_upload_runtime() -> UploadRuntimeContext {
    use_context::<UploadRuntimeContext>().expect("UploadRuntimeContext not provided")
}
