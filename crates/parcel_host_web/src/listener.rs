//! Owned DOM event listeners.

use wasm_bindgen::{closure::Closure, JsCast};

use crate::dom::js_error;

/// An event listener that is removed when dropped.
pub struct DomListener {
    target: web_sys::EventTarget,
    event: String,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl DomListener {
    /// Adds `handler` for `event` on `target`.
    pub fn new(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, String> {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(js_error)?;
        Ok(Self {
            target: target.clone(),
            event: event.to_string(),
            callback,
        })
    }

    /// Keeps the listener installed for the rest of the page's life.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(&self.event, self.callback.as_ref().unchecked_ref());
    }
}
