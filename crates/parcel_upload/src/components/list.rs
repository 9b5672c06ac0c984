use leptos::*;

use crate::{model::UploadMode, reducer::UploadAction, runtime_context::UploadRuntimeContext};

const REMOVE_LINK_CLASS: &str = "text-neutral-400 dark:text-neutral-600 hover:text-red-500";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RowAction {
    /// Link that removes the row's file.
    Remove,
    /// Status glyph classes.
    Glyph(&'static str),
}

pub(super) fn row_action(mode: UploadMode) -> RowAction {
    match mode {
        UploadMode::Preparing => RowAction::Remove,
        UploadMode::Uploading => RowAction::Glyph("icon-upload text-neutral-400 dark:text-neutral-600"),
        UploadMode::Error | UploadMode::Aborted => RowAction::Glyph("icon-x text-red-600"),
        UploadMode::Complete => RowAction::Glyph("icon-check text-green-600"),
    }
}

#[component]
pub(super) fn FileList(runtime: UploadRuntimeContext) -> impl IntoView {
    let state = runtime.state;
    let mode = create_memo(move |_| state.with(|state| state.mode));

    view! {
        <div class="grid grid-cols-[max-content_1fr_max-content] gap-2">
            <For
                each=move || state.with(|state| state.files.iter().cloned().enumerate().collect::<Vec<_>>())
                key=|(index, file)| (*index, file.name.clone(), file.size)
                let:row
            >
                {{
                    let (index, file) = row;
                    let icon = file.icon();
                    view! {
                        <div class=icon></div>
                        <div class="truncate select-none">{file.name}</div>
                        <div class="text-right">
                            {move || match row_action(mode.get()) {
                                RowAction::Remove => view! {
                                    <a
                                        href="#"
                                        class=REMOVE_LINK_CLASS
                                        on:click=move |ev| {
                                            ev.prevent_default();
                                            ev.stop_propagation();
                                            runtime.dispatch_action(UploadAction::Remove { index });
                                        }
                                    >
                                        <span class="icon-x"></span>
                                    </a>
                                }
                                .into_view(),
                                RowAction::Glyph(class) => view! { <span class=class></span> }.into_view(),
                            }}
                        </div>
                    }
                }}
            </For>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn only_preparing_rows_are_removable() {
        assert_eq!(row_action(UploadMode::Preparing), RowAction::Remove);
        for mode in [
            UploadMode::Uploading,
            UploadMode::Error,
            UploadMode::Aborted,
            UploadMode::Complete,
        ] {
            assert!(matches!(row_action(mode), RowAction::Glyph(_)));
        }
        assert_eq!(
            row_action(UploadMode::Complete),
            RowAction::Glyph("icon-check text-green-600")
        );
    }
}
