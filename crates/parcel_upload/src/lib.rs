//! Browser upload runtime: file model, directory scanning, the upload state machine, the
//! page-level drop coordinator, and the Leptos upload surface.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod components;
pub mod coordinator;
mod effect_executor;
pub mod files;
pub mod format;
pub mod host;
pub mod mime;
pub mod model;
pub mod page_listeners;
pub mod reducer;
pub mod runtime_context;
pub mod scanner;

pub use components::UploadSurface;
pub use coordinator::{DragDisposition, DropCoordinator, HandoffOutcome};
pub use host::{SurfaceAttributes, UploadHostContext};
pub use model::{TransferId, UploadMode, UploadState};
pub use page_listeners::install_drop_coordinator;
pub use reducer::{reduce_upload, TransitionError, UploadAction, UploadEffect};
pub use runtime_context::{use_upload_runtime, UploadProvider, UploadRuntimeContext};
