//! Typed host contracts and shared models for the upload runtime.
//!
//! This crate is the target-independent boundary between the upload core and the browser. It
//! exposes the upload transport, dropped-entry filesystem, page host, and list-refresh service
//! traits together with configuration and in-memory adapters, while concrete browser adapters
//! live in `parcel_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod entry;
pub mod handle;
pub mod page;
pub mod refresh;
pub mod team;
pub mod transfer;

pub use config::{ConfigError, HandoffPolicy, UploadConfig, UPLOAD_CONFIG_SCRIPT_ID};
pub use entry::{
    DirectoryReader, DropEntry, DropEntryFuture, DropEntryKind, MemoryDropEntry, ResolvedFile,
};
pub use handle::OpaqueHandle;
pub use page::{IndicatorClasses, PageFuture, PageHost};
pub use refresh::{ListRefreshService, MemoryListRefresh, NoopListRefresh};
pub use team::{parse_team_identifier, TeamIdentifierError};
pub use transfer::{
    terminal_once, MemoryTransfer, MemoryUploadTransport, NoopUploadTransport, TransferEvent,
    TransferEventSink, TransferFile, TransferHandle, TransferRequest, UploadTransport,
};
