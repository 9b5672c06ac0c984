//! Page-level drop coordinator.
//!
//! While no upload surface is mounted, the coordinator owns page drags: it shows the drop
//! indicator, and on drop asks the page for a new surface, flattens the dropped entries in the
//! meantime, then hands the files to the surface once its anchor appears. A mounted surface owns
//! drag handling itself, so every handler defers while one exists.

use std::{cell::RefCell, rc::Rc};

use futures::{
    channel::oneshot,
    future::{self, LocalBoxFuture},
    FutureExt,
};
use leptos::logging;
use parcel_host::{DropEntry, IndicatorClasses, PageHost, UploadConfig};

use crate::scanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What the page listener should do with the browser event.
pub enum DragDisposition {
    /// A surface is mounted; leave the event alone.
    Deferred,
    /// The coordinator consumed the event; prevent the browser default.
    Handled,
}

impl DragDisposition {
    /// Returns `true` when the browser default should be prevented.
    pub fn prevents_default(self) -> bool {
        self == Self::Handled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of handing dropped files to a freshly requested surface.
pub enum HandoffOutcome {
    /// The files-dropped notification reached the surface anchor.
    Delivered {
        /// Anchor lookups performed, including the successful one.
        attempts: u32,
        /// Files delivered.
        files: usize,
    },
    /// The anchor never appeared within the attempt budget.
    TimedOut {
        /// Files that were not delivered.
        files: usize,
    },
    /// The page refused to insert a surface.
    SurfaceRequestFailed {
        /// Host error detail.
        message: String,
    },
    /// The anchor was found but the notification could not be dispatched.
    DeliveryFailed {
        /// Host error detail.
        message: String,
    },
}

struct DragTracking<T> {
    indicating: bool,
    origin: Option<T>,
    classes: IndicatorClasses,
}

/// Page singleton bridging page-level drops into an upload surface.
pub struct DropCoordinator<H: PageHost> {
    host: H,
    config: UploadConfig,
    drag: RefCell<DragTracking<H::Target>>,
    ready: RefCell<Option<oneshot::Sender<()>>>,
}

impl<H: PageHost + 'static> DropCoordinator<H> {
    /// Creates a coordinator in the idle state.
    pub fn new(host: H, config: UploadConfig) -> Rc<Self> {
        Rc::new(Self {
            host,
            config,
            drag: RefCell::new(DragTracking {
                indicating: false,
                origin: None,
                classes: IndicatorClasses::HIDDEN,
            }),
            ready: RefCell::new(None),
        })
    }

    /// Page host used by the coordinator.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Configuration the coordinator was created with.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Returns `true` while the indicator is shown for an ongoing drag.
    pub fn is_indicating(&self) -> bool {
        self.drag.borrow().indicating
    }

    /// Current indicator classes.
    pub fn indicator(&self) -> IndicatorClasses {
        self.drag.borrow().classes
    }

    /// Handles `dragenter`. The latest entered target becomes the one whose `dragleave` hides the
    /// indicator.
    pub fn on_drag_enter(&self, target: H::Target) -> DragDisposition {
        if self.host.has_upload_surface() {
            return DragDisposition::Deferred;
        }
        let shown = {
            let mut drag = self.drag.borrow_mut();
            drag.origin = Some(target);
            if drag.indicating {
                None
            } else {
                drag.indicating = true;
                drag.classes = drag.classes.shown();
                Some(drag.classes)
            }
        };
        if let Some(classes) = shown {
            self.host.apply_indicator(classes);
        }
        DragDisposition::Handled
    }

    /// Handles `dragover`; handling it is what allows `drop` to fire on the page.
    pub fn on_drag_over(&self) -> DragDisposition {
        if self.host.has_upload_surface() {
            DragDisposition::Deferred
        } else {
            DragDisposition::Handled
        }
    }

    /// Handles `dragleave`. Only a leave from the remembered target hides the indicator.
    pub fn on_drag_leave(&self, target: &H::Target) -> DragDisposition {
        if self.host.has_upload_surface() {
            return DragDisposition::Deferred;
        }
        let matches_origin = self.drag.borrow().origin.as_ref() == Some(target);
        if matches_origin {
            self.hide(true);
        }
        DragDisposition::Handled
    }

    /// Applies the indicator element's `animationend` signal.
    pub fn on_animation_end(&self) {
        let classes = {
            let mut drag = self.drag.borrow_mut();
            let next = drag.classes.animation_finished();
            if next == drag.classes {
                return;
            }
            drag.classes = next;
            next
        };
        self.host.apply_indicator(classes);
    }

    /// Handles `drop`. `entries` must be collected synchronously inside the event.
    ///
    /// Returns `None` when a surface is mounted; otherwise the handoff future, which the caller
    /// spawns.
    pub fn on_drop(
        self: &Rc<Self>,
        entries: Vec<Box<dyn DropEntry>>,
    ) -> Option<LocalBoxFuture<'static, HandoffOutcome>> {
        if self.host.has_upload_surface() {
            return None;
        }
        self.hide(false);

        let (sender, receiver) = oneshot::channel();
        *self.ready.borrow_mut() = Some(sender);
        let coordinator = Rc::clone(self);
        Some(coordinator.hand_off(entries, receiver).boxed_local())
    }

    /// Called by a surface once it has mounted its anchor; wakes a pending handoff early.
    pub fn announce_surface_ready(&self) {
        if let Some(sender) = self.ready.borrow_mut().take() {
            let _ = sender.send(());
        }
    }

    fn hide(&self, animated: bool) {
        let classes = {
            let mut drag = self.drag.borrow_mut();
            drag.origin = None;
            if !drag.indicating {
                return;
            }
            drag.indicating = false;
            drag.classes = drag.classes.hidden(animated);
            drag.classes
        };
        self.host.apply_indicator(classes);
    }

    fn surface_url(&self) -> String {
        let team = match self.host.team_identifier() {
            Ok(team) => team,
            Err(err) => {
                logging::warn!("ignoring team identifier: {err}");
                None
            }
        };
        self.config.surface_request_url(team.as_deref())
    }

    async fn hand_off(
        self: Rc<Self>,
        entries: Vec<Box<dyn DropEntry>>,
        ready: oneshot::Receiver<()>,
    ) -> HandoffOutcome {
        let url = self.surface_url();
        let (inserted, report) =
            future::join(self.host.request_surface(&url), scanner::scan_entries(entries)).await;
        report.log_failures();
        let files = report.files;

        if let Err(message) = inserted {
            logging::error!("failed to request an upload surface: {message}");
            return HandoffOutcome::SurfaceRequestFailed { message };
        }

        let policy = self.config.handoff;
        let mut ready = ready.fuse();
        for attempt in 1..=policy.max_attempts {
            // A consumed announcement stays pending, so later attempts wait out the interval.
            let _ = future::select(&mut ready, self.host.sleep(policy.interval())).await;
            let Some(anchor) = self.host.find_drop_anchor() else {
                continue;
            };
            return match self.host.deliver_files(&anchor, &files) {
                Ok(()) => HandoffOutcome::Delivered {
                    attempts: attempt,
                    files: files.len(),
                },
                Err(message) => {
                    logging::error!("failed to deliver dropped files: {message}");
                    HandoffOutcome::DeliveryFailed { message }
                }
            };
        }

        logging::error!(
            "upload surface did not mount after {} attempts; {} dropped files were discarded",
            policy.max_attempts,
            files.len()
        );
        HandoffOutcome::TimedOut { files: files.len() }
    }
}
