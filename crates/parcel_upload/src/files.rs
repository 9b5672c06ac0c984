//! File model: drag-time candidates and drop-time file candidates.

use parcel_host::{DropEntry, OpaqueHandle, ResolvedFile, TransferFile};

use crate::{mime, scanner};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Metadata-only preview of an item being dragged. Browsers hide names and sizes until drop.
pub struct DragCandidate {
    /// Reported content type; may be empty.
    pub content_type: String,
}

impl DragCandidate {
    /// Creates a candidate for `content_type`.
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }

    /// Icon for the candidate's content type.
    pub fn icon(&self) -> &'static str {
        mime::classify(&self.content_type).icon
    }

    /// Descriptive phrase, when the content type is known.
    pub fn hint(&self) -> Option<&'static str> {
        mime::classify(&self.content_type).hint
    }
}

/// Builds drag candidates from the content types of file-kind drag items.
pub fn drag_candidates<I, S>(content_types: I) -> Vec<DragCandidate>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    content_types.into_iter().map(DragCandidate::new).collect()
}

#[derive(Debug, Clone, PartialEq)]
/// A resolved file eligible for upload.
pub struct FileCandidate {
    /// Host payload handle; identity is preserved through the upload request.
    pub payload: OpaqueHandle,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Reported content type; may be empty.
    pub content_type: String,
}

impl FileCandidate {
    /// Icon for the candidate's content type.
    pub fn icon(&self) -> &'static str {
        mime::classify(&self.content_type).icon
    }

    /// Multipart part for this file.
    pub fn to_transfer_file(&self) -> TransferFile {
        TransferFile {
            name: self.name.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl From<ResolvedFile> for FileCandidate {
    fn from(file: ResolvedFile) -> Self {
        Self {
            payload: file.payload,
            name: file.name,
            size: file.size,
            content_type: file.content_type,
        }
    }
}

/// Converts a picker or notification file list, preserving order.
pub fn from_file_list(files: impl IntoIterator<Item = ResolvedFile>) -> Vec<FileCandidate> {
    files.into_iter().map(FileCandidate::from).collect()
}

/// Resolves dropped entries (flattening directories) into candidates.
///
/// Entries that fail to read are logged and skipped; the rest are returned in entry order.
pub async fn from_drop_payload(entries: Vec<Box<dyn DropEntry>>) -> Vec<FileCandidate> {
    let report = scanner::scan_entries(entries).await;
    report.log_failures();
    from_file_list(report.files)
}

/// Sum of candidate sizes.
pub fn total_size(files: &[FileCandidate]) -> u64 {
    files.iter().map(|file| file.size).sum()
}
