//! Upload state model.

use std::fmt;

use crate::{
    files::{DragCandidate, FileCandidate},
    mime::GENERIC_FILE_ICON,
};

/// User-visible message stored when the transport reports a failure.
pub const TRANSPORT_ERROR_MESSAGE: &str = "There was an error uploading files";
/// User-visible message stored when an upload is aborted.
pub const ABORT_MESSAGE: &str = "The file upload was aborted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identity of one upload request. Events carrying any other id are stale.
pub struct TransferId(pub u64);

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Upload lifecycle mode.
pub enum UploadMode {
    /// Collecting files.
    Preparing,
    /// A request is in flight.
    Uploading,
    /// The last request was aborted.
    Aborted,
    /// The last request failed.
    Error,
    /// The last request succeeded.
    Complete,
}

impl UploadMode {
    /// Returns `true` for modes that end an upload attempt.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Aborted | Self::Error | Self::Complete)
    }

    /// Lower-case name used in logs and data attributes.
    pub fn token(self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Uploading => "uploading",
            Self::Aborted => "aborted",
            Self::Error => "error",
            Self::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Complete upload surface state.
pub struct UploadState {
    /// Lifecycle mode.
    pub mode: UploadMode,
    /// Items currently hovering over the page.
    pub drag_files: Vec<DragCandidate>,
    /// Icon summarizing the hovering items.
    pub drag_icon: &'static str,
    /// Hint summarizing the hovering items.
    pub drag_hint: Option<String>,
    /// Files queued for upload, in insertion order.
    pub files: Vec<FileCandidate>,
    /// Sum of queued file sizes.
    pub total_size: u64,
    /// In-flight request; `Some` exactly while uploading.
    pub transfer: Option<TransferId>,
    /// Bytes reported sent by the in-flight or last request.
    pub uploaded_bytes: u64,
    /// Whole-number upload percentage.
    pub upload_progress: u8,
    /// User-visible failure message.
    pub error: Option<String>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            mode: UploadMode::Preparing,
            drag_files: Vec::new(),
            drag_icon: GENERIC_FILE_ICON,
            drag_hint: None,
            files: Vec::new(),
            total_size: 0,
            transfer: None,
            uploaded_bytes: 0,
            upload_progress: 0,
            error: None,
        }
    }
}

impl UploadState {
    /// Returns `true` while items hover over the page.
    pub fn is_dragging(&self) -> bool {
        self.mode == UploadMode::Preparing && !self.drag_files.is_empty()
    }

    /// Returns `true` when the upload button should be enabled.
    pub fn can_start(&self) -> bool {
        self.mode == UploadMode::Preparing && !self.files.is_empty()
    }

    /// Returns `true` when a failed or aborted upload can be retried.
    pub fn can_retry(&self) -> bool {
        matches!(self.mode, UploadMode::Error | UploadMode::Aborted) && !self.files.is_empty()
    }
}
