//! Surface mounting and coordinator install for the live page.
//!
//! Each surface renders under its own reactive owner. A body observer disposes that owner once the
//! surface element leaves the document, which runs the surface's `on_cleanup` handlers.

use std::{cell::RefCell, rc::Rc};

use leptos::{
    as_child_of_current_owner, leptos_dom::Mountable, logging, view, Callback, Disposer, IntoView,
    View,
};
use parcel_host::UploadConfig;
use parcel_host_web::{
    claim_surface_mounts, dom, load_upload_config, BodyObserver, DomListener, MountRegistry,
    SurfaceMount, WebPageHost,
};
use parcel_upload::{
    install_drop_coordinator, DropCoordinator, SurfaceAttributes, UploadHostContext,
    UploadSurface,
};

/// htmx event fired after new content is processed.
const HTMX_LOAD_EVENT: &str = "htmx:load";

struct MountedSurface {
    _view: View,
    _owner: Disposer,
}

type MountedSurfaces = Rc<RefCell<MountRegistry<web_sys::HtmlElement, MountedSurface>>>;

#[derive(Clone)]
struct Page {
    config: UploadConfig,
    coordinator: Rc<DropCoordinator<WebPageHost>>,
    mounted: MountedSurfaces,
}

impl Page {
    fn mount_surfaces(&self) {
        let mounts = match claim_surface_mounts(&self.config.surface_selector) {
            Ok(mounts) => mounts,
            Err(err) => {
                logging::warn!("failed to look up upload surfaces: {err}");
                return;
            }
        };
        for mount in mounts {
            self.mount_surface(mount);
        }
    }

    fn mount_surface(&self, mount: SurfaceMount) {
        let host = UploadHostContext::browser(
            self.config.clone(),
            SurfaceAttributes {
                csrf_token: mount.csrf_token,
                team: mount.team,
            },
        );
        let coordinator = self.coordinator.clone();
        let render = as_child_of_current_owner(move |()| {
            let coordinator = coordinator.clone();
            let on_ready = Callback::new(move |()| coordinator.announce_surface_ready());
            view! { <UploadSurface host=host.clone() on_ready=on_ready /> }.into_view()
        });
        let (view, owner) = render(());

        if let Err(err) = mount.element.append_child(&view.get_mountable_node()) {
            logging::warn!("failed to mount upload surface: {err:?}");
            return;
        }
        self.mounted.borrow_mut().insert(
            mount.element,
            MountedSurface {
                _view: view,
                _owner: owner,
            },
        );
    }

    fn release_detached(&self) {
        let detached = self
            .mounted
            .borrow_mut()
            .take_detached(|element| element.is_connected());
        drop(detached);
    }
}

fn page_config() -> UploadConfig {
    load_upload_config().unwrap_or_else(|err| {
        logging::warn!("using default upload configuration: {err}");
        UploadConfig::default()
    })
}

/// Boots the upload runtime on the current page.
pub fn mount() {
    console_error_panic_hook::set_once();

    let config = page_config();
    let coordinator = DropCoordinator::new(WebPageHost::new(config.clone()), config.clone());
    if let Err(err) = install_drop_coordinator(coordinator.clone()) {
        logging::warn!("drop coordinator not installed: {err}");
    }

    let page = Page {
        config,
        coordinator,
        mounted: Rc::default(),
    };
    page.mount_surfaces();

    let observed = page.clone();
    match BodyObserver::new(move || observed.release_detached()) {
        Ok(observer) => observer.forget(),
        Err(err) => logging::warn!("removed upload surfaces will not be disposed: {err}"),
    }

    let document = match dom::document() {
        Ok(document) => document,
        Err(err) => {
            logging::warn!("upload surfaces will not mount after htmx swaps: {err}");
            return;
        }
    };
    match DomListener::new(&document, HTMX_LOAD_EVENT, move |_| page.mount_surfaces()) {
        Ok(listener) => listener.forget(),
        Err(err) => logging::warn!("upload surfaces will not mount after htmx swaps: {err}"),
    }
}
