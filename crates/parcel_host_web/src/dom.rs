//! Document access, `<script>` data loading, and timers.

use std::time::Duration;

use parcel_host::{parse_team_identifier, ConfigError, UploadConfig, UPLOAD_CONFIG_SCRIPT_ID};
use wasm_bindgen::JsValue;

pub(crate) fn unsupported(what: &str) -> String {
    format!("{what} is only available when compiled for wasm32")
}

pub(crate) fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Returns the current document.
pub fn document() -> Result<web_sys::Document, String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Err(unsupported("document access"))
    }

    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| "document unavailable".to_string())
    }
}

/// Returns the document body.
pub fn body() -> Result<web_sys::HtmlElement, String> {
    document()?
        .body()
        .ok_or_else(|| "document has no body".to_string())
}

/// Returns the first element matching `selector`.
pub fn query(selector: &str) -> Result<Option<web_sys::Element>, String> {
    document()?.query_selector(selector).map_err(js_error)
}

/// Returns the text of the `<script>` element with id `id`, or `None` when no element has it.
pub fn script_text(id: &str) -> Result<Option<String>, String> {
    let Some(element) = document()?.get_element_by_id(id) else {
        return Ok(None);
    };
    if !element.tag_name().eq_ignore_ascii_case("script") {
        return Err(format!("element `#{id}` is not a <script>"));
    }
    Ok(Some(element.text_content().unwrap_or_default()))
}

/// Loads the page's upload configuration; pages without a configuration script get defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] when the configuration element is not a script or does not parse.
pub fn load_upload_config() -> Result<UploadConfig, ConfigError> {
    match script_text(UPLOAD_CONFIG_SCRIPT_ID) {
        Ok(Some(raw)) => UploadConfig::from_json(&raw),
        Ok(None) => Ok(UploadConfig::default()),
        Err(_) => Err(ConfigError::MissingScript(format!(
            "#{UPLOAD_CONFIG_SCRIPT_ID}"
        ))),
    }
}

/// Reads the team identifier script with id `id`. A page without one is not team scoped.
pub fn load_team_identifier(id: &str) -> Result<Option<String>, String> {
    match script_text(id)? {
        Some(raw) => parse_team_identifier(&raw).map_err(|err| err.to_string()),
        None => Ok(None),
    }
}

/// Resolves after `duration` using the window timer.
pub async fn sleep(duration: Duration) -> Result<(), String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = duration;
        Err(unsupported("timers"))
    }

    #[cfg(target_arch = "wasm32")]
    {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
            }
        });
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(js_error)
    }
}
