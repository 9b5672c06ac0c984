use leptos::*;

use crate::{
    format::format_bytes,
    model::{UploadMode, UploadState},
    reducer::UploadAction,
    runtime_context::UploadRuntimeContext,
};

pub(super) fn summary_text(state: &UploadState) -> String {
    let prefix = if state.mode == UploadMode::Complete {
        "Uploaded "
    } else {
        ""
    };
    let count = state.files.len();
    let noun = if count == 1 { "file" } else { "files" };
    format!(
        "{prefix}{} over {count} {noun}",
        format_bytes(state.total_size, 2)
    )
}

#[component]
pub(super) fn FileSummary(runtime: UploadRuntimeContext) -> impl IntoView {
    let state = runtime.state;

    view! {
        <div class="flex flex-row justify-between p-4">
            <div class="font-semibold select-none">{move || state.with(summary_text)}</div>
            // Queued files are frozen outside Preparing.
            <Show when=move || state.with(|state| state.mode == UploadMode::Preparing) fallback=|| ()>
                <a
                    href="#"
                    class="text-red-200 dark:text-red-800 hover:text-red-500"
                    on:click=move |ev| {
                        ev.prevent_default();
                        runtime.dispatch_action(UploadAction::RemoveAll);
                    }
                >
                    "Remove all files"
                </a>
            </Show>
        </div>
    }
}
