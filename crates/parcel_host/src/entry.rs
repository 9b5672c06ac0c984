//! Dropped-entry filesystem contracts and the in-memory adapter used by tests.
//!
//! Browsers expose a dropped item as a filesystem entry that is either a file (resolved
//! asynchronously into a `File`) or a directory (read through a reader that hands out children
//! in batches). These traits model exactly that surface so the directory scanner stays
//! target-independent.

use std::{collections::VecDeque, future::Future, pin::Pin};

use crate::handle::OpaqueHandle;

/// Object-safe boxed future used by [`DropEntry`] and [`DirectoryReader`].
pub type DropEntryFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Kind of a dropped filesystem entry.
pub enum DropEntryKind {
    /// A regular file.
    File,
    /// A directory whose children are read in batches.
    Directory,
    /// Anything the browser reports as neither (ignored by the scanner).
    Other,
}

#[derive(Debug, Clone, PartialEq)]
/// A file entry resolved into its payload and metadata.
pub struct ResolvedFile {
    /// File name (no directory components).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Reported content type; empty when the browser does not know it.
    pub content_type: String,
    /// Host payload handle (a browser `File` on wasm targets).
    pub payload: OpaqueHandle,
}

/// A single dropped filesystem entry.
pub trait DropEntry {
    /// Entry name.
    fn name(&self) -> String;

    /// Entry kind.
    fn kind(&self) -> DropEntryKind;

    /// Resolves a file entry into its payload.
    fn resolve_file(&self) -> DropEntryFuture<'_, Result<ResolvedFile, String>>;

    /// Opens a reader over a directory entry's children.
    fn open_reader(&self) -> Result<Box<dyn DirectoryReader>, String>;
}

/// Batched reader over a directory's children.
pub trait DirectoryReader {
    /// Reads the next batch of children. An empty batch means the directory is exhausted.
    fn read_batch(&mut self) -> DropEntryFuture<'_, Result<Vec<Box<dyn DropEntry>>, String>>;
}

const DEFAULT_MEMORY_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone)]
enum MemoryNode {
    File {
        size: u64,
        content_type: String,
        payload: OpaqueHandle,
    },
    Directory {
        children: Vec<MemoryDropEntry>,
        batch_size: usize,
    },
}

#[derive(Debug, Clone)]
/// In-memory entry tree for scanner tests and non-browser hosts.
pub struct MemoryDropEntry {
    name: String,
    node: MemoryNode,
    failing: bool,
}

impl MemoryDropEntry {
    /// Creates a file entry with a fresh payload handle.
    pub fn file(name: impl Into<String>, size: u64, content_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            node: MemoryNode::File {
                size,
                content_type: content_type.into(),
                payload: OpaqueHandle::new(name.clone()),
            },
            name,
            failing: false,
        }
    }

    /// Creates a directory entry.
    pub fn directory(name: impl Into<String>, children: Vec<MemoryDropEntry>) -> Self {
        Self {
            name: name.into(),
            node: MemoryNode::Directory {
                children,
                batch_size: DEFAULT_MEMORY_BATCH_SIZE,
            },
            failing: false,
        }
    }

    /// Limits how many children a single directory read returns.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        if let MemoryNode::Directory { batch_size, .. } = &mut self.node {
            *batch_size = size.max(1);
        }
        self
    }

    /// Makes every read of this entry fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Boxes the entry for APIs that take trait objects.
    pub fn boxed(self) -> Box<dyn DropEntry> {
        Box::new(self)
    }

    /// Counts the files reachable from this entry, ignoring failure flags.
    pub fn file_count(&self) -> usize {
        match &self.node {
            MemoryNode::File { .. } => 1,
            MemoryNode::Directory { children, .. } => {
                children.iter().map(MemoryDropEntry::file_count).sum()
            }
        }
    }
}

impl DropEntry for MemoryDropEntry {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> DropEntryKind {
        match self.node {
            MemoryNode::File { .. } => DropEntryKind::File,
            MemoryNode::Directory { .. } => DropEntryKind::Directory,
        }
    }

    fn resolve_file(&self) -> DropEntryFuture<'_, Result<ResolvedFile, String>> {
        Box::pin(async move {
            match &self.node {
                MemoryNode::File { .. } if self.failing => {
                    Err(format!("failed to read file `{}`", self.name))
                }
                MemoryNode::File {
                    size,
                    content_type,
                    payload,
                } => Ok(ResolvedFile {
                    name: self.name.clone(),
                    size: *size,
                    content_type: content_type.clone(),
                    payload: payload.clone(),
                }),
                MemoryNode::Directory { .. } => Err(format!("`{}` is a directory", self.name)),
            }
        })
    }

    fn open_reader(&self) -> Result<Box<dyn DirectoryReader>, String> {
        match &self.node {
            MemoryNode::Directory {
                children,
                batch_size,
            } => Ok(Box::new(MemoryDirectoryReader {
                name: self.name.clone(),
                pending: children.iter().cloned().collect(),
                batch_size: *batch_size,
                failing: self.failing,
            })),
            MemoryNode::File { .. } => Err(format!("`{}` is not a directory", self.name)),
        }
    }
}

struct MemoryDirectoryReader {
    name: String,
    pending: VecDeque<MemoryDropEntry>,
    batch_size: usize,
    failing: bool,
}

impl DirectoryReader for MemoryDirectoryReader {
    fn read_batch(&mut self) -> DropEntryFuture<'_, Result<Vec<Box<dyn DropEntry>>, String>> {
        Box::pin(async move {
            if self.failing {
                return Err(format!("failed to read directory `{}`", self.name));
            }
            let take = self.batch_size.min(self.pending.len());
            Ok(self
                .pending
                .drain(..take)
                .map(MemoryDropEntry::boxed)
                .collect())
        })
    }
}
