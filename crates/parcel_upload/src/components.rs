//! Upload surface UI composition.

mod dropzone;
mod list;
mod progress;
mod summary;

use leptos::*;
use parcel_host_web::{close_enclosing_modal, listen_for_dropped_files, DomListener};

use self::{dropzone::DropZone, list::FileList, progress::UploadProgress, summary::FileSummary};
use crate::{
    files::from_file_list,
    host::UploadHostContext,
    model::UploadMode,
    reducer::UploadAction,
    runtime_context::{use_upload_runtime, UploadProvider, UploadRuntimeContext},
};

#[component]
/// A complete upload surface: runtime provider plus form.
pub fn UploadSurface(
    /// Host service bundle for this surface.
    host: UploadHostContext,
    /// Called once the drop anchor is mounted and listening.
    #[prop(optional)]
    on_ready: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <UploadProvider host=host>
            <UploadForm on_ready=on_ready />
        </UploadProvider>
    }
}

fn cancel_or_close(runtime: UploadRuntimeContext, receiver: NodeRef<html::Div>) {
    if runtime.state.with_untracked(|state| state.mode == UploadMode::Uploading) {
        runtime.dispatch_action(UploadAction::Cancel);
        return;
    }
    let Some(element) = receiver.get_untracked() else {
        return;
    };
    let element: web_sys::Element = (*element).clone().into();
    if let Err(err) = close_enclosing_modal(&element) {
        logging::warn!("failed to close upload surface: {err}");
    }
}

#[component]
fn UploadForm(on_ready: Option<Callback<()>>) -> impl IntoView {
    let runtime = use_upload_runtime();
    let state = runtime.state;
    let receiver = create_node_ref::<html::Div>();
    let dropped_listener = store_value(None::<DomListener>);

    receiver.on_load(move |element| {
        let target: web_sys::EventTarget = (*element).clone().into();
        match listen_for_dropped_files(&target, move |files| {
            runtime.dispatch_action(UploadAction::Add {
                files: from_file_list(files),
            });
        }) {
            Ok(listener) => dropped_listener.set_value(Some(listener)),
            Err(err) => logging::warn!("upload surface cannot receive dropped files: {err}"),
        }
        if let Some(on_ready) = on_ready {
            on_ready.call(());
        }
    });
    on_cleanup(move || dropped_listener.update_value(|listener| drop(listener.take())));

    let mode = create_memo(move |_| state.with(|state| state.mode));
    let has_files = move || state.with(|state| !state.files.is_empty());

    view! {
        <div
            node_ref=receiver
            class="event-receiver grid grid-rows-[max-content_1fr_max-content] max-h-[80vh] gap-4"
            data-mode=move || mode.get().token()
        >
            <DropZone runtime=runtime receiver=receiver />
            <Show when=has_files fallback=|| ()>
                <div class="border border-gray-300 dark:border-slate-600 rounded-md flex flex-col gap-2 overflow-y-hidden">
                    <Show
                        when=move || mode.get() == UploadMode::Uploading
                        fallback=move || view! { <FileSummary runtime=runtime /> }
                    >
                        <UploadProgress runtime=runtime />
                    </Show>
                    <div class="overflow-y-scroll px-4 mb-4">
                        <FileList runtime=runtime />
                    </div>
                </div>
            </Show>
            <div class="buttons end">
                <button
                    type="button"
                    class="button hollow"
                    on:click=move |_| cancel_or_close(runtime, receiver)
                >
                    "Cancel"
                </button>
                {move || match mode.get() {
                    UploadMode::Preparing | UploadMode::Uploading => view! {
                        <button
                            type="button"
                            class="button"
                            disabled=move || !state.with(|state| state.can_start())
                            on:click=move |_| runtime.start_upload()
                        >
                            <span class="icon-upload"></span>
                            " Upload file"
                        </button>
                    }
                    .into_view(),
                    UploadMode::Error | UploadMode::Aborted => view! {
                        <button
                            type="button"
                            class="button hollow"
                            on:click=move |_| runtime.dispatch_action(UploadAction::Reset)
                        >
                            "Start over"
                        </button>
                        <button
                            type="button"
                            class="button"
                            disabled=move || !state.with(|state| state.can_retry())
                            on:click=move |_| runtime.retry_upload()
                        >
                            <span class="icon-rotate-ccw"></span>
                            " Retry"
                        </button>
                    }
                    .into_view(),
                    UploadMode::Complete => view! {
                        <button
                            type="button"
                            class="button"
                            on:click=move |_| runtime.dispatch_action(UploadAction::Reset)
                        >
                            <span class="icon-upload"></span>
                            " Upload more"
                        </button>
                    }
                    .into_view(),
                }}
            </div>
        </div>
    }
}
