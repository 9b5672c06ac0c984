//! Upload transport contracts, the terminal-event guard, and test adapters.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::handle::OpaqueHandle;

#[derive(Debug, Clone, PartialEq)]
/// One file part of a multipart upload body.
pub struct TransferFile {
    /// File name sent with the part.
    pub name: String,
    /// Host payload handle.
    pub payload: OpaqueHandle,
}

#[derive(Debug, Clone, PartialEq)]
/// Multipart POST request issued when an upload starts.
pub struct TransferRequest {
    /// Target URL.
    pub endpoint: String,
    /// Plain form fields (authenticity token, optional team id), in submission order.
    pub fields: Vec<(String, String)>,
    /// Form field name used for every file part.
    pub file_field: String,
    /// File parts in candidate order.
    pub files: Vec<TransferFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Signals observed on an in-flight upload request.
pub enum TransferEvent {
    /// Upload body progress in bytes sent so far.
    Progress {
        /// Bytes sent.
        loaded: u64,
    },
    /// The request finished.
    Load,
    /// The request failed at the network level.
    Error {
        /// Diagnostic detail for logs.
        message: String,
    },
    /// The request was cancelled.
    Abort,
}

impl TransferEvent {
    /// Returns `true` for events that end a request.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Callback receiving transport events for one request.
pub type TransferEventSink = Rc<dyn Fn(TransferEvent)>;

/// Wraps `sink` so it forwards at most one terminal event and nothing after it.
///
/// After a user cancel the transport must report exactly one `Abort`, never followed by a late
/// `Load` or `Error` for the same request.
pub fn terminal_once(sink: TransferEventSink) -> TransferEventSink {
    let finished = Cell::new(false);
    Rc::new(move |event: TransferEvent| {
        if finished.get() {
            return;
        }
        if event.is_terminal() {
            finished.set(true);
        }
        sink(event);
    })
}

/// Live handle to an in-flight request.
pub trait TransferHandle {
    /// Cancels the underlying request. The transport then reports [`TransferEvent::Abort`].
    fn abort(&self);
}

/// Host service that sends upload requests.
pub trait UploadTransport {
    /// Starts `request`, reporting progress and the terminal outcome through `events`.
    fn begin(
        &self,
        request: TransferRequest,
        events: TransferEventSink,
    ) -> Result<Box<dyn TransferHandle>, String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Transport for targets without a network stack.
pub struct NoopUploadTransport;

impl UploadTransport for NoopUploadTransport {
    fn begin(
        &self,
        _request: TransferRequest,
        _events: TransferEventSink,
    ) -> Result<Box<dyn TransferHandle>, String> {
        Err("upload transport unavailable".to_string())
    }
}

#[derive(Clone)]
/// A request captured by [`MemoryUploadTransport`].
pub struct MemoryTransfer {
    /// The submitted request.
    pub request: TransferRequest,
    events: TransferEventSink,
    aborted: Rc<Cell<bool>>,
}

impl MemoryTransfer {
    /// Delivers `event` as if the network produced it.
    pub fn emit(&self, event: TransferEvent) {
        (self.events)(event);
    }

    /// Returns `true` once the handle has been aborted.
    pub fn was_aborted(&self) -> bool {
        self.aborted.get()
    }
}

#[derive(Clone, Default)]
/// Recording transport that lets tests drive request events by hand.
pub struct MemoryUploadTransport {
    transfers: Rc<RefCell<Vec<MemoryTransfer>>>,
}

impl MemoryUploadTransport {
    /// Returns every request started so far, oldest first.
    pub fn transfers(&self) -> Vec<MemoryTransfer> {
        self.transfers.borrow().clone()
    }

    /// Returns the most recently started request.
    pub fn last(&self) -> Option<MemoryTransfer> {
        self.transfers.borrow().last().cloned()
    }
}

struct MemoryTransferHandle {
    events: TransferEventSink,
    aborted: Rc<Cell<bool>>,
}

impl TransferHandle for MemoryTransferHandle {
    fn abort(&self) {
        if !self.aborted.replace(true) {
            (self.events)(TransferEvent::Abort);
        }
    }
}

impl UploadTransport for MemoryUploadTransport {
    fn begin(
        &self,
        request: TransferRequest,
        events: TransferEventSink,
    ) -> Result<Box<dyn TransferHandle>, String> {
        let aborted = Rc::new(Cell::new(false));
        self.transfers.borrow_mut().push(MemoryTransfer {
            request,
            events: events.clone(),
            aborted: aborted.clone(),
        });
        Ok(Box::new(MemoryTransferHandle { events, aborted }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn recording_sink() -> (TransferEventSink, Rc<RefCell<Vec<TransferEvent>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink: TransferEventSink = Rc::new(move |event| sink_seen.borrow_mut().push(event));
        (sink, seen)
    }

    #[test]
    fn terminal_once_drops_events_after_abort() {
        let (sink, seen) = recording_sink();
        let guarded = terminal_once(sink);

        guarded(TransferEvent::Progress { loaded: 5 });
        guarded(TransferEvent::Abort);
        guarded(TransferEvent::Load);
        guarded(TransferEvent::Error {
            message: "late".to_string(),
        });
        guarded(TransferEvent::Progress { loaded: 9 });

        assert_eq!(
            *seen.borrow(),
            vec![TransferEvent::Progress { loaded: 5 }, TransferEvent::Abort]
        );
    }

    #[test]
    fn memory_transport_abort_reports_once() {
        let transport = MemoryUploadTransport::default();
        let (sink, seen) = recording_sink();
        let request = TransferRequest {
            endpoint: "/uploads/new".to_string(),
            fields: vec![("csrf_token".to_string(), "t".to_string())],
            file_field: "file".to_string(),
            files: Vec::new(),
        };

        let handle = transport.begin(request.clone(), sink).expect("begin");
        handle.abort();
        handle.abort();

        assert_eq!(*seen.borrow(), vec![TransferEvent::Abort]);
        let recorded = transport.last().expect("recorded");
        assert!(recorded.was_aborted());
        assert_eq!(recorded.request, request);
    }

    #[test]
    fn noop_transport_refuses_requests() {
        let (sink, _) = recording_sink();
        let request = TransferRequest {
            endpoint: String::new(),
            fields: Vec::new(),
            file_field: "file".to_string(),
            files: Vec::new(),
        };
        let err = NoopUploadTransport.begin(request, sink).err().expect("error");
        assert!(err.contains("unavailable"));
    }
}
