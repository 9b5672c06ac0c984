//! Browser `File` conversion, the file picker, and the files-dropped notification.

use std::{cell::RefCell, rc::Rc};

use futures::channel::oneshot;
use parcel_host::{OpaqueHandle, ResolvedFile};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::{
    dom::{self, js_error},
    listener::DomListener,
};

/// Name of the custom event carrying dropped files to a surface anchor.
pub const FILES_DROPPED_EVENT: &str = "parcelDrop";

/// Wraps a browser `File`; the payload handle owns the `File` itself.
pub fn resolved_file(file: web_sys::File) -> ResolvedFile {
    ResolvedFile {
        name: file.name(),
        size: file.size() as u64,
        content_type: file.type_(),
        payload: OpaqueHandle::new(file),
    }
}

/// Converts a `FileList`, preserving order.
pub fn resolved_files(list: &web_sys::FileList) -> Vec<ResolvedFile> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .map(resolved_file)
        .collect()
}

/// Returns the browser `File` behind a resolved file.
pub fn browser_file(file: &ResolvedFile) -> Result<web_sys::File, String> {
    file.payload
        .downcast_ref::<web_sys::File>()
        .cloned()
        .ok_or_else(|| format!("payload for `{}` is not a browser File", file.name))
}

/// Builds the files-dropped notification: a non-bubbling event whose detail is `{ files }`.
pub fn dropped_files_notification(files: &[ResolvedFile]) -> Result<web_sys::CustomEvent, String> {
    let array = js_sys::Array::new();
    for file in files {
        let file = browser_file(file)?;
        array.push(&file);
    }
    let detail = js_sys::Object::new();
    js_sys::Reflect::set(&detail, &JsValue::from_str("files"), &array).map_err(js_error)?;

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&detail);
    web_sys::CustomEvent::new_with_event_init_dict(FILES_DROPPED_EVENT, &init).map_err(js_error)
}

/// Reads the files carried by a files-dropped notification. Anything else yields no files.
pub fn files_from_notification(event: &web_sys::Event) -> Vec<ResolvedFile> {
    let Some(event) = event.dyn_ref::<web_sys::CustomEvent>() else {
        return Vec::new();
    };
    let Ok(files) = js_sys::Reflect::get(&event.detail(), &JsValue::from_str("files")) else {
        return Vec::new();
    };
    if !js_sys::Array::is_array(&files) {
        return Vec::new();
    }
    js_sys::Array::from(&files)
        .iter()
        .filter_map(|value| value.dyn_into::<web_sys::File>().ok())
        .map(resolved_file)
        .collect()
}

/// Listens for files-dropped notifications on `target`.
pub fn listen_for_dropped_files(
    target: &web_sys::EventTarget,
    on_files: impl Fn(Vec<ResolvedFile>) + 'static,
) -> Result<DomListener, String> {
    DomListener::new(target, FILES_DROPPED_EVENT, move |event| {
        on_files(files_from_notification(&event));
    })
}

/// Settles one picker interaction exactly once, with the selection or with a cancel.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Clone)]
struct PickSettlement {
    sender: Rc<RefCell<Option<oneshot::Sender<Vec<ResolvedFile>>>>>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl PickSettlement {
    fn new() -> (Self, oneshot::Receiver<Vec<ResolvedFile>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sender: Rc::new(RefCell::new(Some(tx))),
            },
            rx,
        )
    }

    fn choose(&self, files: Vec<ResolvedFile>) {
        if let Some(tx) = self.sender.borrow_mut().take() {
            let _ = tx.send(files);
        }
    }

    /// Drops the sender so the receiver resolves with `Canceled`.
    fn cancel(&self) {
        self.sender.borrow_mut().take();
    }
}

/// Opens a multiple-selection file picker.
///
/// Resolves with `None` when the picker is dismissed.
pub async fn pick_files() -> Result<Option<Vec<ResolvedFile>>, String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Err(dom::unsupported("file picking"))
    }

    #[cfg(target_arch = "wasm32")]
    {
        let input = dom::document()?
            .create_element("input")
            .map_err(|err| format!("failed to create file input: {}", js_error(err)))?
            .dyn_into::<web_sys::HtmlInputElement>()
            .map_err(|_| "failed to cast file input".to_string())?;
        input.set_type("file");
        input.set_multiple(true);

        let (settlement, rx) = PickSettlement::new();
        let chosen = settlement.clone();
        let input_for_change = input.clone();
        let on_change = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            let files = input_for_change
                .files()
                .map(|list| resolved_files(&list))
                .unwrap_or_default();
            chosen.choose(files);
        }));
        let on_cancel = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            settlement.cancel();
        }));
        input.set_onchange(Some(on_change.as_ref().unchecked_ref()));
        input
            .add_event_listener_with_callback("cancel", on_cancel.as_ref().unchecked_ref())
            .map_err(js_error)?;
        input.click();

        let outcome = rx.await;
        input.set_onchange(None);
        let _ = input
            .remove_event_listener_with_callback("cancel", on_cancel.as_ref().unchecked_ref());
        Ok(outcome.ok())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn picked(name: &str) -> ResolvedFile {
        ResolvedFile {
            name: name.to_string(),
            size: 3,
            content_type: "text/plain".to_string(),
            payload: OpaqueHandle::new(name.to_string()),
        }
    }

    #[test]
    fn dismissed_picker_settles_without_files() {
        let (settlement, rx) = PickSettlement::new();
        let change = settlement.clone();
        settlement.cancel();
        change.choose(vec![picked("late.txt")]);

        assert!(block_on(rx).is_err());
        assert!(settlement.sender.borrow().is_none());
    }

    #[test]
    fn chosen_files_settle_once() {
        let (settlement, rx) = PickSettlement::new();
        settlement.choose(vec![picked("a.txt")]);
        settlement.cancel();

        let files = block_on(rx).expect("selection");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.txt");
    }

    #[test]
    fn native_targets_cannot_pick_files() {
        let err = block_on(pick_files()).expect_err("no picker on native targets");
        assert!(err.contains("wasm32"));
    }
}
