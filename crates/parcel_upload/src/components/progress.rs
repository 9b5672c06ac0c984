use leptos::*;

use crate::{format::format_bytes, runtime_context::UploadRuntimeContext};

pub(super) fn progress_caption(uploaded: u64, total: u64) -> String {
    format!(
        "{} of {}",
        format_bytes(uploaded, 2),
        format_bytes(total, 2)
    )
}

#[component]
pub(super) fn UploadProgress(runtime: UploadRuntimeContext) -> impl IntoView {
    let state = runtime.state;
    let percent = create_memo(move |_| state.with(|state| state.upload_progress));

    view! {
        <div class="grid grid-cols-[1fr_max-content] items-center gap-4 p-4">
            <div class="rounded-full w-40 md:w-80 dark:bg-gray-700 border border-blue-600 dark:border-0">
                <div
                    class="quickly bg-blue-600 text-xs font-medium text-blue-100 text-center p-0.5 leading-none rounded-full whitespace-nowrap"
                    style=move || format!("width: {}%", percent.get())
                >
                    {move || format!("{}%", percent.get())}
                </div>
            </div>
            <div class="select-none">
                {move || state.with(|state| progress_caption(state.uploaded_bytes, state.total_size))}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn caption_formats_both_sides() {
        assert_eq!(
            progress_caption(512 * 1024, 2 * 1024 * 1024),
            "512.00 KB of 2.00 MB"
        );
    }
}
