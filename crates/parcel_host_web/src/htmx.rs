//! Bindings to the page's global `htmx` object.

#[cfg(target_arch = "wasm32")]
use serde::Serialize;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use crate::dom::unsupported;
#[cfg(target_arch = "wasm32")]
use crate::dom::js_error;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = htmx, js_name = ajax, catch)]
    fn htmx_ajax(verb: &str, path: &str, context: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = htmx, js_name = trigger, catch)]
    fn htmx_trigger(target: &str, event: &str) -> Result<(), JsValue>;
}

#[cfg(target_arch = "wasm32")]
#[derive(Serialize)]
struct AjaxContext<'a> {
    target: &'a str,
    swap: &'a str,
}

/// GETs `url` and appends the response to the end of `<body>`.
pub(crate) async fn append_to_body(url: &str) -> Result<(), String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = url;
        Err(unsupported("htmx requests"))
    }

    #[cfg(target_arch = "wasm32")]
    {
        let context = serde_wasm_bindgen::to_value(&AjaxContext {
            target: "body",
            swap: "beforeend",
        })
        .map_err(|err| err.to_string())?;
        let promise = htmx_ajax("get", url, &context).map_err(js_error)?;
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(js_error)
    }
}

/// Fires `event` at the element matched by `target`.
pub(crate) fn trigger(target: &str, event: &str) -> Result<(), String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (target, event);
        Err(unsupported("htmx triggers"))
    }

    #[cfg(target_arch = "wasm32")]
    {
        htmx_trigger(target, event).map_err(js_error)
    }
}
