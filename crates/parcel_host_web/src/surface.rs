//! Upload surface mount points and modal integration.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use crate::dom::{self, js_error};

/// Attribute set on a surface element once a view has been mounted into it.
pub const SURFACE_MOUNTED_ATTRIBUTE: &str = "data-parcel-mounted";

#[derive(Debug, Clone)]
/// A server-rendered surface element waiting for its view.
pub struct SurfaceMount {
    /// Element the view mounts into.
    pub element: web_sys::HtmlElement,
    /// Authenticity token from the element's `csrf_token` attribute.
    pub csrf_token: String,
    /// Team id from the element's `team` attribute.
    pub team: Option<String>,
}

/// Returns every unmounted element matching `selector` and marks each one as mounted.
pub fn claim_surface_mounts(selector: &str) -> Result<Vec<SurfaceMount>, String> {
    let nodes = dom::document()?
        .query_selector_all(selector)
        .map_err(js_error)?;
    let mut mounts = Vec::new();
    for index in 0..nodes.length() {
        let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            continue;
        };
        if element.has_attribute(SURFACE_MOUNTED_ATTRIBUTE) {
            continue;
        }
        element
            .set_attribute(SURFACE_MOUNTED_ATTRIBUTE, "")
            .map_err(js_error)?;
        mounts.push(SurfaceMount {
            csrf_token: element.get_attribute("csrf_token").unwrap_or_default(),
            team: element
                .get_attribute("team")
                .filter(|team| !team.trim().is_empty()),
            element,
        });
    }
    Ok(mounts)
}

/// Closes the modal element enclosing `element`.
///
/// # Errors
///
/// Returns an error when `element` is not inside a modal or the modal cannot be closed.
pub fn close_enclosing_modal(element: &web_sys::Element) -> Result<(), String> {
    let modal = element
        .closest("parcel-modal")
        .map_err(js_error)?
        .ok_or_else(|| "surface is not inside a parcel-modal".to_string())?;
    let close = js_sys::Reflect::get(&modal, &JsValue::from_str("closeModal")).map_err(js_error)?;
    let close = close
        .dyn_into::<js_sys::Function>()
        .map_err(|_| "parcel-modal has no closeModal method".to_string())?;
    close.call0(&modal).map_err(js_error)?;
    Ok(())
}

/// Sets `attribute` on `<body>`. Returns `false` when it was already present.
pub fn claim_body_flag(attribute: &str) -> Result<bool, String> {
    let body = dom::body()?;
    if body.has_attribute(attribute) {
        return Ok(false);
    }
    body.set_attribute(attribute, "").map_err(js_error)?;
    Ok(true)
}

/// Mounted values keyed by the element they render into.
#[derive(Debug)]
pub struct MountRegistry<E, T> {
    mounts: Vec<(E, T)>,
}

impl<E, T> Default for MountRegistry<E, T> {
    fn default() -> Self {
        Self { mounts: Vec::new() }
    }
}

impl<E, T> MountRegistry<E, T> {
    /// Tracks `value` until `element` is detached.
    pub fn insert(&mut self, element: E, value: T) {
        self.mounts.push((element, value));
    }

    /// Number of tracked mounts.
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    /// Returns `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Removes and returns the values whose element is no longer attached.
    pub fn take_detached(&mut self, is_attached: impl Fn(&E) -> bool) -> Vec<T> {
        let (attached, detached): (Vec<_>, Vec<_>) = std::mem::take(&mut self.mounts)
            .into_iter()
            .partition(|(element, _)| is_attached(element));
        self.mounts = attached;
        detached.into_iter().map(|(_, value)| value).collect()
    }
}

/// A child-list observer over the whole `<body>` subtree, disconnected on drop.
pub struct BodyObserver {
    observer: web_sys::MutationObserver,
    _callback: Closure<dyn FnMut()>,
}

impl BodyObserver {
    /// Calls `on_mutation` after nodes are added or removed anywhere under `<body>`.
    pub fn new(on_mutation: impl FnMut() + 'static) -> Result<Self, String> {
        let body = dom::body()?;
        let callback = Closure::<dyn FnMut()>::wrap(Box::new(on_mutation));
        let observer =
            web_sys::MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(js_error)?;
        let options = web_sys::MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(&body, &options)
            .map_err(js_error)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    /// Keeps observing for the rest of the page's life.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for BodyObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_targets_cannot_claim_mounts() {
        let err = claim_surface_mounts("parcel-upload-form").expect_err("no document");
        assert!(err.contains("wasm32"));
        assert!(claim_body_flag("data-parcel-drop").is_err());
        assert!(BodyObserver::new(|| {}).is_err());
    }

    struct Teardown(Rc<RefCell<Vec<&'static str>>>, &'static str);

    impl Drop for Teardown {
        fn drop(&mut self) {
            self.0.borrow_mut().push(self.1);
        }
    }

    #[test]
    fn detached_mounts_are_released_and_attached_ones_kept() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let attached = ["second"];
        let mut registry = MountRegistry::default();
        for name in ["first", "second", "third"] {
            registry.insert(name, Teardown(released.clone(), name));
        }

        drop(registry.take_detached(|element| attached.contains(element)));
        assert_eq!(*released.borrow(), vec!["first", "third"]);
        assert_eq!(registry.len(), 1);

        assert!(registry.take_detached(|element| attached.contains(element)).is_empty());
        drop(registry.take_detached(|_| false));
        assert_eq!(*released.borrow(), vec!["first", "third", "second"]);
        assert!(registry.is_empty());
    }
}
