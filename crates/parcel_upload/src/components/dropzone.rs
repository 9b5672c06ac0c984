use leptos::*;
use parcel_host_web::{drag_item_types, drop_entries, pick_files};

use crate::{
    files::{drag_candidates, from_drop_payload, from_file_list},
    model::{UploadMode, UploadState},
    reducer::UploadAction,
    runtime_context::UploadRuntimeContext,
};

const DROP_ZONE_CLASS: &str =
    "transition-colors cursor-pointer border border-gray-300 dark:border-slate-600 rounded-md p-8 flex flex-col gap-4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tone {
    Idle,
    Active,
    Complete,
    Error,
}

impl Tone {
    fn classes(self) -> &'static str {
        match self {
            Self::Idle => "bg-neutral-100 dark:bg-slate-800/50 text-neutral-500 dark:text-slate-500",
            Self::Active => {
                "bg-neutral-200 dark:bg-slate-800/75 text-neutral-600 dark:text-slate-400"
            }
            Self::Complete => "bg-green-200 dark:bg-green-900/50 text-green-600 dark:text-green-500",
            Self::Error => "bg-red-200 dark:bg-red-900/50 text-red-400 dark:text-red-600",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Banner {
    pub icon: &'static str,
    pub title: String,
    pub subtitle: &'static str,
    pub tone: Tone,
}

pub(super) fn banner(state: &UploadState) -> Banner {
    match state.mode {
        UploadMode::Preparing => Banner {
            icon: state.drag_icon,
            title: state
                .drag_hint
                .clone()
                .unwrap_or_else(|| "Drop files".to_string()),
            subtitle: "Drag and drop your files here or click to select files",
            tone: if state.is_dragging() {
                Tone::Active
            } else {
                Tone::Idle
            },
        },
        UploadMode::Uploading => Banner {
            icon: "icon-loader-circle animate-rotate",
            title: "Uploading files".to_string(),
            subtitle: "Please wait while we upload your files",
            tone: Tone::Active,
        },
        UploadMode::Error => Banner {
            icon: "icon-octagon-alert",
            title: "Failed to upload files".to_string(),
            subtitle: "There was an error uploading your files",
            tone: Tone::Error,
        },
        UploadMode::Aborted => Banner {
            icon: "icon-x-circle",
            title: "Upload aborted".to_string(),
            subtitle: "The upload was aborted",
            tone: Tone::Error,
        },
        UploadMode::Complete => Banner {
            icon: "icon-badge-circle",
            title: "Upload complete".to_string(),
            subtitle: "Your files have been uploaded successfully",
            tone: Tone::Complete,
        },
    }
}

fn drop_zone_class(tone: Tone) -> String {
    format!("{DROP_ZONE_CLASS} {}", tone.classes())
}

#[component]
/// Drag target and picker trigger. While its surface is in the document it owns drags for the
/// whole window.
pub(super) fn DropZone(
    runtime: UploadRuntimeContext,
    receiver: NodeRef<html::Div>,
) -> impl IntoView {
    let state = runtime.state;
    let current = create_memo(move |_| state.with(banner));

    // Removed surfaces are never disposed, so every listener checks the surface is still mounted.
    let connected = move || {
        receiver
            .get_untracked()
            .map(|element| element.is_connected())
            .unwrap_or(false)
    };
    let preparing = move || state.with_untracked(|state| state.mode == UploadMode::Preparing);

    let dragover_listener = window_event_listener(ev::dragover, move |ev| {
        if !connected() {
            return;
        }
        ev.prevent_default();
        if preparing() {
            let items = drag_candidates(drag_item_types(&ev));
            runtime.dispatch_action(UploadAction::DragOver { items });
        }
    });
    on_cleanup(move || dragover_listener.remove());

    let dragleave_listener = window_event_listener(ev::dragleave, move |ev| {
        // Only a leave without a related target exits the window.
        if !connected() || ev.related_target().is_some() {
            return;
        }
        if state.with_untracked(UploadState::is_dragging) {
            runtime.dispatch_action(UploadAction::DragLeave);
        }
    });
    on_cleanup(move || dragleave_listener.remove());

    let drop_listener = window_event_listener(ev::drop, move |ev| {
        if !connected() {
            return;
        }
        ev.prevent_default();
        if !preparing() {
            return;
        }
        let entries = drop_entries(&ev);
        spawn_local(async move {
            let files = from_drop_payload(entries).await;
            runtime.dispatch_action(UploadAction::Drop { files });
        });
    });
    on_cleanup(move || drop_listener.remove());

    let open_picker = move |_| {
        if !preparing() {
            return;
        }
        spawn_local(async move {
            match pick_files().await {
                Ok(Some(files)) => runtime.dispatch_action(UploadAction::Add {
                    files: from_file_list(files),
                }),
                Ok(None) => {}
                Err(err) => logging::warn!("file picker failed: {err}"),
            }
        });
    };

    view! {
        <div class=move || current.with(|banner| drop_zone_class(banner.tone)) on:click=open_picker>
            <h1 class="text-3xl font-bold text-center select-none gap-2">
                <span class=move || current.with(|banner| banner.icon)></span>
                " "
                <span>{move || current.with(|banner| banner.title.clone())}</span>
            </h1>
            <h2 class="text-xl font-semibold text-center select-none">
                {move || current.with(|banner| banner.subtitle)}
            </h2>
        </div>
    }
}
