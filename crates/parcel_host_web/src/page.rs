//! [`PageHost`] implementation backed by the live document.

use std::time::Duration;

use parcel_host::{IndicatorClasses, PageFuture, PageHost, ResolvedFile, UploadConfig};

use crate::{
    dom::{self, js_error},
    files::dropped_files_notification,
    htmx,
};

#[derive(Debug, Clone)]
/// Page host for the current document, using `config` selectors and ids.
pub struct WebPageHost {
    config: UploadConfig,
}

impl WebPageHost {
    /// Creates a page host.
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }
}

impl PageHost for WebPageHost {
    type Target = web_sys::EventTarget;
    type Anchor = web_sys::Element;

    fn has_upload_surface(&self) -> bool {
        matches!(dom::query(&self.config.surface_selector), Ok(Some(_)))
    }

    fn apply_indicator(&self, classes: IndicatorClasses) {
        let Ok(document) = dom::document() else {
            return;
        };
        let Some(indicator) = document.get_element_by_id(&self.config.indicator_id) else {
            return;
        };
        let list = indicator.class_list();
        for (token, present) in classes.class_tokens() {
            let _ = list.toggle_with_force(token, present);
        }
    }

    fn team_identifier(&self) -> Result<Option<String>, String> {
        dom::load_team_identifier(&self.config.team_identifier_id)
    }

    fn request_surface<'a>(&'a self, url: &'a str) -> PageFuture<'a, Result<(), String>> {
        Box::pin(htmx::append_to_body(url))
    }

    fn find_drop_anchor(&self) -> Option<Self::Anchor> {
        dom::query(&self.config.anchor_selector).ok().flatten()
    }

    fn deliver_files(&self, anchor: &Self::Anchor, files: &[ResolvedFile]) -> Result<(), String> {
        let event = dropped_files_notification(files)?;
        anchor.dispatch_event(&event).map_err(js_error)?;
        Ok(())
    }

    fn sleep(&self, duration: Duration) -> PageFuture<'static, ()> {
        Box::pin(async move {
            let _ = dom::sleep(duration).await;
        })
    }
}
