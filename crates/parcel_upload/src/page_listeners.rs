//! Window listeners that feed page drag events into the [`DropCoordinator`].

use std::rc::Rc;

use leptos::*;
use parcel_host::PageHost;
use parcel_host_web::{claim_body_flag, drop_entries, WebPageHost};
use wasm_bindgen::JsCast;

use crate::coordinator::{DropCoordinator, HandoffOutcome};

/// Body attribute marking a document whose drop coordinator is installed.
pub const COORDINATOR_INSTALLED_ATTRIBUTE: &str = "data-parcel-drop-coordinator";

/// Installs the page-level drag listeners. A second install on the same document is a no-op.
///
/// # Errors
///
/// Returns an error when the document body is unavailable.
pub fn install_drop_coordinator(
    coordinator: Rc<DropCoordinator<WebPageHost>>,
) -> Result<(), String> {
    if !claim_body_flag(COORDINATOR_INSTALLED_ATTRIBUTE)? {
        logging::log!("drop coordinator already installed");
        return Ok(());
    }

    let entered = coordinator.clone();
    let _ = window_event_listener(ev::dragenter, move |ev| {
        let Some(target) = ev.target() else {
            return;
        };
        if entered.on_drag_enter(target).prevents_default() {
            ev.prevent_default();
        }
    });

    let hovering = coordinator.clone();
    let _ = window_event_listener(ev::dragover, move |ev| {
        if hovering.on_drag_over().prevents_default() {
            ev.prevent_default();
        }
    });

    let leaving = coordinator.clone();
    let _ = window_event_listener(ev::dragleave, move |ev| {
        let Some(target) = ev.target() else {
            return;
        };
        if leaving.on_drag_leave(&target).prevents_default() {
            ev.prevent_default();
        }
    });

    let dropping = coordinator.clone();
    let _ = window_event_listener(ev::drop, move |ev| {
        if dropping.host().has_upload_surface() {
            return;
        }
        ev.prevent_default();
        let Some(handoff) = dropping.on_drop(drop_entries(&ev)) else {
            return;
        };
        spawn_local(async move {
            if let HandoffOutcome::Delivered { attempts, files } = handoff.await {
                logging::log!("handed {files} dropped files to a new upload surface after {attempts} attempts");
            }
        });
    });

    let _ = window_event_listener(ev::animationend, move |ev| {
        let is_indicator = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .is_some_and(|element| element.id() == coordinator.config().indicator_id);
        if is_indicator {
            coordinator.on_animation_end();
        }
    });

    Ok(())
}
