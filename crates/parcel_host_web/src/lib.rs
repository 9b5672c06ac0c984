//! Browser (`wasm32`) implementations of [`parcel_host`] contracts.
//!
//! This crate is the concrete browser-side wiring for the upload transport, dropped filesystem
//! entries, the page host used by the drop coordinator, and htmx list refresh. Entry points that
//! need a live document report an "only available when compiled for wasm32" error elsewhere, so
//! the crate still builds and unit-tests on native targets.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod dom;
pub mod entries;
pub mod files;
mod htmx;
pub mod listener;
pub mod page;
pub mod refresh;
pub mod surface;
pub mod transfer;

pub use dom::{load_team_identifier, load_upload_config, sleep};
pub use entries::{drag_item_types, drop_entries, WebDropEntry};
pub use files::{
    browser_file, dropped_files_notification, files_from_notification, listen_for_dropped_files,
    pick_files, resolved_file, resolved_files, FILES_DROPPED_EVENT,
};
pub use listener::DomListener;
pub use page::WebPageHost;
pub use refresh::HtmxListRefresh;
pub use surface::{
    claim_body_flag, claim_surface_mounts, close_enclosing_modal, BodyObserver, MountRegistry,
    SurfaceMount, SURFACE_MOUNTED_ATTRIBUTE,
};
pub use transfer::XhrUploadTransport;
