//! `XMLHttpRequest` upload transport.

use parcel_host::{
    TransferEvent, TransferEventSink, TransferHandle, TransferRequest, UploadTransport,
};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[cfg(target_arch = "wasm32")]
use crate::dom::js_error;

#[derive(Debug, Clone, Copy, Default)]
/// Sends multipart uploads through `XMLHttpRequest`, reporting upload-body progress.
pub struct XhrUploadTransport;

#[cfg(target_arch = "wasm32")]
struct XhrTransferHandle {
    request: web_sys::XmlHttpRequest,
}

#[cfg(target_arch = "wasm32")]
impl TransferHandle for XhrTransferHandle {
    fn abort(&self) {
        let _ = self.request.abort();
    }
}

#[cfg(target_arch = "wasm32")]
fn form_data(request: &TransferRequest) -> Result<web_sys::FormData, String> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    for (name, value) in &request.fields {
        form.append_with_str(name, value).map_err(js_error)?;
    }
    for file in &request.files {
        let blob = file
            .payload
            .downcast_ref::<web_sys::File>()
            .ok_or_else(|| format!("payload for `{}` is not a browser File", file.name))?;
        form.append_with_blob_and_filename(&request.file_field, blob, &file.name)
            .map_err(js_error)?;
    }
    Ok(form)
}

/// Maps the status of a finished request to its event. Only 2xx counts as a completed upload.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn load_outcome(status: u16) -> TransferEvent {
    if (200..300).contains(&status) {
        TransferEvent::Load
    } else {
        TransferEvent::Error {
            message: format!("server responded with status {status}"),
        }
    }
}

impl UploadTransport for XhrUploadTransport {
    fn begin(
        &self,
        request: TransferRequest,
        events: TransferEventSink,
    ) -> Result<Box<dyn TransferHandle>, String> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (request, events);
            Err(crate::dom::unsupported("upload transport"))
        }

        #[cfg(target_arch = "wasm32")]
        {
            let body = form_data(&request)?;
            let xhr = web_sys::XmlHttpRequest::new().map_err(js_error)?;

            let progress_events = events.clone();
            let on_progress = Closure::<dyn FnMut(web_sys::ProgressEvent)>::wrap(Box::new(
                move |event: web_sys::ProgressEvent| {
                    progress_events(TransferEvent::Progress {
                        loaded: event.loaded() as u64,
                    });
                },
            ));
            xhr.upload()
                .map_err(js_error)?
                .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

            let load_events = events.clone();
            let load_xhr = xhr.clone();
            let on_load = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
                load_events(load_outcome(load_xhr.status().unwrap_or(0)));
            }));
            xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));

            let error_events = events.clone();
            let on_error = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
                error_events(TransferEvent::Error {
                    message: "network error".to_string(),
                });
            }));
            xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));

            let on_abort = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
                events(TransferEvent::Abort);
            }));
            xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));

            // Handlers run after the handle is released, so they live as long as the request.
            on_progress.forget();
            on_load.forget();
            on_error.forget();
            on_abort.forget();

            xhr.open_with_async("POST", &request.endpoint, true)
                .map_err(js_error)?;
            xhr.send_with_opt_form_data(Some(&body))
                .map_err(js_error)?;
            Ok(Box::new(XhrTransferHandle { request: xhr }))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn only_success_statuses_complete_the_upload() {
        assert_eq!(load_outcome(200), TransferEvent::Load);
        assert_eq!(load_outcome(204), TransferEvent::Load);
        assert_eq!(
            load_outcome(500),
            TransferEvent::Error {
                message: "server responded with status 500".to_string()
            }
        );
        assert_eq!(
            load_outcome(0),
            TransferEvent::Error {
                message: "server responded with status 0".to_string()
            }
        );
    }

    #[test]
    fn native_targets_refuse_uploads() {
        let request = TransferRequest {
            endpoint: "/uploads/new".to_string(),
            fields: Vec::new(),
            file_field: "file".to_string(),
            files: Vec::new(),
        };
        let err = XhrUploadTransport
            .begin(request, Rc::new(|_| {}))
            .err()
            .expect("error");
        assert!(err.contains("wasm32"));
    }
}
