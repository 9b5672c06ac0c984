//! Recursive directory scanner for dropped entries.
//!
//! Top-level entries and sibling children are resolved concurrently; results are reassembled in
//! entry order. A directory is drained by repeating batched reads until one comes back empty.

use futures::{
    future::{join_all, LocalBoxFuture},
    FutureExt,
};
use leptos::logging;
use parcel_host::{DropEntry, DropEntryKind, ResolvedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
/// An entry whose contribution was lost to a read failure.
pub struct ScanFailure {
    /// Name of the failing entry.
    pub entry: String,
    /// Host error detail.
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Files found under a set of entries plus any local failures.
pub struct ScanReport {
    /// Resolved files, flattened.
    pub files: Vec<ResolvedFile>,
    /// Entries that could not be read.
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    fn single(file: ResolvedFile) -> Self {
        Self {
            files: vec![file],
            failures: Vec::new(),
        }
    }

    fn failed(entry: String, message: String) -> Self {
        Self {
            files: Vec::new(),
            failures: vec![ScanFailure { entry, message }],
        }
    }

    fn merged(mut self, other: Self) -> Self {
        self.files.extend(other.files);
        self.failures.extend(other.failures);
        self
    }

    /// Logs every recorded failure.
    pub fn log_failures(&self) {
        for failure in &self.failures {
            logging::warn!(
                "skipping dropped entry `{}`: {}",
                failure.entry,
                failure.message
            );
        }
    }
}

/// Scans `entries` concurrently and concatenates their reports in input order.
pub async fn scan_entries(entries: Vec<Box<dyn DropEntry>>) -> ScanReport {
    join_all(entries.into_iter().map(scan_entry))
        .await
        .into_iter()
        .fold(ScanReport::default(), ScanReport::merged)
}

/// Scans a single entry. Files resolve to one result; directories recurse into their children.
pub fn scan_entry(entry: Box<dyn DropEntry>) -> LocalBoxFuture<'static, ScanReport> {
    async move {
        let name = entry.name();
        match entry.kind() {
            DropEntryKind::File => match entry.resolve_file().await {
                Ok(file) => ScanReport::single(file),
                Err(err) => ScanReport::failed(name, err),
            },
            DropEntryKind::Directory => match read_children(entry.as_ref()).await {
                Ok(children) => scan_entries(children).await,
                Err(err) => ScanReport::failed(name, err),
            },
            DropEntryKind::Other => ScanReport::default(),
        }
    }
    .boxed_local()
}

async fn read_children(entry: &dyn DropEntry) -> Result<Vec<Box<dyn DropEntry>>, String> {
    let mut reader = entry.open_reader()?;
    let mut children = Vec::new();
    loop {
        let batch = reader.read_batch().await?;
        if batch.is_empty() {
            return Ok(children);
        }
        children.extend(batch);
    }
}
