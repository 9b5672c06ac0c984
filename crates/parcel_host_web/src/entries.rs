//! `FileSystemEntry` adapters for dropped items.
//!
//! The entry API is callback based (`file(success, error)`, `readEntries(success, error)`); each
//! call is bridged into a future through a oneshot channel.

use std::{cell::RefCell, rc::Rc};

use futures::channel::oneshot;
use parcel_host::{DirectoryReader, DropEntry, DropEntryFuture, DropEntryKind, ResolvedFile};
use wasm_bindgen::{closure::Closure, prelude::*, JsCast};

use crate::{dom::js_error, files::resolved_file};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = js_sys::Object)]
    #[derive(Debug, Clone)]
    type FileSystemEntryHandle;

    #[wasm_bindgen(method, getter, js_name = isFile)]
    fn is_file(this: &FileSystemEntryHandle) -> bool;

    #[wasm_bindgen(method, getter, js_name = isDirectory)]
    fn is_directory(this: &FileSystemEntryHandle) -> bool;

    #[wasm_bindgen(method, getter)]
    fn name(this: &FileSystemEntryHandle) -> String;

    #[wasm_bindgen(method, catch)]
    fn file(
        this: &FileSystemEntryHandle,
        success: &js_sys::Function,
        failure: &js_sys::Function,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = createReader)]
    fn create_reader(this: &FileSystemEntryHandle) -> Result<DirectoryReaderHandle, JsValue>;

    #[wasm_bindgen(extends = js_sys::Object)]
    #[derive(Debug, Clone)]
    type DirectoryReaderHandle;

    #[wasm_bindgen(method, catch, js_name = readEntries)]
    fn read_entries(
        this: &DirectoryReaderHandle,
        success: &js_sys::Function,
        failure: &js_sys::Function,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(extends = js_sys::Object)]
    type DataTransferItemHandle;

    #[wasm_bindgen(method, js_name = webkitGetAsEntry)]
    fn webkit_get_as_entry(this: &DataTransferItemHandle) -> Option<FileSystemEntryHandle>;
}

struct CallbackPair {
    success: Closure<dyn FnMut(JsValue)>,
    failure: Closure<dyn FnMut(JsValue)>,
    receiver: oneshot::Receiver<Result<JsValue, JsValue>>,
}

impl CallbackPair {
    fn new() -> Self {
        let (tx, receiver) = oneshot::channel();
        let sender = Rc::new(RefCell::new(Some(tx)));

        let success_sender = sender.clone();
        let success = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |value| {
            if let Some(tx) = success_sender.borrow_mut().take() {
                let _ = tx.send(Ok(value));
            }
        }));
        let failure = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |err| {
            if let Some(tx) = sender.borrow_mut().take() {
                let _ = tx.send(Err(err));
            }
        }));

        Self {
            success,
            failure,
            receiver,
        }
    }

    fn success(&self) -> &js_sys::Function {
        self.success.as_ref().unchecked_ref()
    }

    fn failure(&self) -> &js_sys::Function {
        self.failure.as_ref().unchecked_ref()
    }

    async fn settled(self) -> Result<JsValue, String> {
        let Self {
            success,
            failure,
            receiver,
        } = self;
        let outcome = receiver
            .await
            .map_err(|_| "filesystem callback was dropped".to_string())?;
        drop((success, failure));
        outcome.map_err(js_error)
    }
}

/// A dropped item's filesystem entry.
pub struct WebDropEntry {
    entry: FileSystemEntryHandle,
}

impl WebDropEntry {
    /// Boxes the entry for APIs that take trait objects.
    pub fn boxed(self) -> Box<dyn DropEntry> {
        Box::new(self)
    }
}

impl DropEntry for WebDropEntry {
    fn name(&self) -> String {
        self.entry.name()
    }

    fn kind(&self) -> DropEntryKind {
        if self.entry.is_file() {
            DropEntryKind::File
        } else if self.entry.is_directory() {
            DropEntryKind::Directory
        } else {
            DropEntryKind::Other
        }
    }

    fn resolve_file(&self) -> DropEntryFuture<'_, Result<ResolvedFile, String>> {
        Box::pin(async move {
            let callbacks = CallbackPair::new();
            self.entry
                .file(callbacks.success(), callbacks.failure())
                .map_err(js_error)?;
            let value = callbacks.settled().await?;
            let file = value
                .dyn_into::<web_sys::File>()
                .map_err(|_| format!("`{}` did not resolve to a file", self.name()))?;
            Ok(resolved_file(file))
        })
    }

    fn open_reader(&self) -> Result<Box<dyn DirectoryReader>, String> {
        let reader = self.entry.create_reader().map_err(js_error)?;
        Ok(Box::new(WebDirectoryReader { reader }))
    }
}

struct WebDirectoryReader {
    reader: DirectoryReaderHandle,
}

impl DirectoryReader for WebDirectoryReader {
    fn read_batch(&mut self) -> DropEntryFuture<'_, Result<Vec<Box<dyn DropEntry>>, String>> {
        Box::pin(async move {
            let callbacks = CallbackPair::new();
            self.reader
                .read_entries(callbacks.success(), callbacks.failure())
                .map_err(js_error)?;
            let batch = callbacks.settled().await?;
            Ok(js_sys::Array::from(&batch)
                .iter()
                .map(|entry| {
                    WebDropEntry {
                        entry: entry.unchecked_into(),
                    }
                    .boxed()
                })
                .collect())
        })
    }
}

fn file_items(event: &web_sys::DragEvent) -> Vec<web_sys::DataTransferItem> {
    let Some(transfer) = event.data_transfer() else {
        return Vec::new();
    };
    let items = transfer.items();
    (0..items.length())
        .filter_map(|index| items.get(index))
        .filter(|item| item.kind() == "file")
        .collect()
}

/// Content types of the file items being dragged. Names and sizes stay hidden until drop.
pub fn drag_item_types(event: &web_sys::DragEvent) -> Vec<String> {
    file_items(event).iter().map(|item| item.type_()).collect()
}

/// Top-level filesystem entries of a drop. Must be called while the drop event is dispatched.
pub fn drop_entries(event: &web_sys::DragEvent) -> Vec<Box<dyn DropEntry>> {
    file_items(event)
        .into_iter()
        .filter_map(|item| {
            item.unchecked_into::<DataTransferItemHandle>()
                .webkit_get_as_entry()
        })
        .map(|entry| WebDropEntry { entry }.boxed())
        .collect()
}
