//! Host-side runtime helpers for executing reducer effects against the upload transport and
//! list-refresh services.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use leptos::logging;
use parcel_host::{
    terminal_once, ListRefreshService, TransferEvent, TransferHandle, TransferRequest,
    UploadConfig, UploadTransport,
};
use parcel_host_web::{HtmxListRefresh, XhrUploadTransport};

use crate::{
    files::FileCandidate,
    model::TransferId,
    reducer::{UploadAction, UploadEffect},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-surface values rendered by the server onto the surface element.
pub struct SurfaceAttributes {
    /// Authenticity token submitted with every upload.
    pub csrf_token: String,
    /// Destination team, when the surface is team scoped.
    pub team: Option<String>,
}

type LiveTransfers = Rc<RefCell<HashMap<TransferId, Option<Rc<dyn TransferHandle>>>>>;

#[derive(Clone)]
/// Host service bundle for upload runtime side effects.
pub struct UploadHostContext {
    transport: Rc<dyn UploadTransport>,
    refresh: Rc<dyn ListRefreshService>,
    config: Rc<UploadConfig>,
    attributes: Rc<SurfaceAttributes>,
    live: LiveTransfers,
}

impl UploadHostContext {
    /// Creates a context over explicit services.
    pub fn new(
        transport: Rc<dyn UploadTransport>,
        refresh: Rc<dyn ListRefreshService>,
        config: UploadConfig,
        attributes: SurfaceAttributes,
    ) -> Self {
        Self {
            transport,
            refresh,
            config: Rc::new(config),
            attributes: Rc::new(attributes),
            live: Rc::default(),
        }
    }

    /// Creates a context backed by the browser XHR transport and htmx list refresh.
    pub fn browser(config: UploadConfig, attributes: SurfaceAttributes) -> Self {
        Self::new(
            Rc::new(XhrUploadTransport),
            Rc::new(HtmxListRefresh),
            config,
            attributes,
        )
    }

    /// Active configuration.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Surface attributes.
    pub fn attributes(&self) -> &SurfaceAttributes {
        &self.attributes
    }

    /// Returns `true` while `transfer` has not been released or discarded.
    pub fn is_live(&self, transfer: TransferId) -> bool {
        self.live.borrow().contains_key(&transfer)
    }

    /// Builds the multipart request for `files`.
    pub fn transfer_request(&self, files: &[FileCandidate]) -> TransferRequest {
        let mut fields = vec![(
            self.config.csrf_field.clone(),
            self.attributes.csrf_token.clone(),
        )];
        if let Some(team) = &self.attributes.team {
            fields.push((self.config.team_field.clone(), team.clone()));
        }
        TransferRequest {
            endpoint: self.config.endpoint.clone(),
            fields,
            file_field: self.config.file_field.clone(),
            files: files.iter().map(FileCandidate::to_transfer_file).collect(),
        }
    }

    /// Aborts every live request without feeding anything back to the reducer.
    pub fn discard_all(&self) {
        let handles: Vec<_> = self.live.borrow_mut().drain().filter_map(|(_, h)| h).collect();
        for handle in handles {
            handle.abort();
        }
    }

    /// Executes a single [`UploadEffect`] emitted by the reducer. Transport events are fed back
    /// through `dispatch`.
    pub fn run_effect<D>(&self, effect: UploadEffect, dispatch: D)
    where
        D: Fn(UploadAction) + Clone + 'static,
    {
        match effect {
            UploadEffect::BeginTransfer { transfer, files } => {
                self.begin_transfer(transfer, &files, dispatch)
            }
            UploadEffect::AbortTransfer(transfer) => match self.handle(transfer) {
                Some(handle) => handle.abort(),
                None => logging::warn!("cannot cancel upload {transfer}: no live request"),
            },
            UploadEffect::DiscardTransfer(transfer) => {
                let handle = self.live.borrow_mut().remove(&transfer).flatten();
                if let Some(handle) = handle {
                    handle.abort();
                }
            }
            UploadEffect::ReleaseTransfer(transfer) => {
                self.live.borrow_mut().remove(&transfer);
            }
            UploadEffect::RefreshList => {
                if let Err(err) = self
                    .refresh
                    .refresh(&self.config.refresh_target, &self.config.refresh_event)
                {
                    logging::warn!("upload list refresh failed: {err}");
                }
            }
        }
    }

    fn handle(&self, transfer: TransferId) -> Option<Rc<dyn TransferHandle>> {
        self.live.borrow().get(&transfer).cloned().flatten()
    }

    fn begin_transfer<D>(&self, transfer: TransferId, files: &[FileCandidate], dispatch: D)
    where
        D: Fn(UploadAction) + Clone + 'static,
    {
        self.live.borrow_mut().insert(transfer, None);

        let live = self.live.clone();
        let forward = dispatch.clone();
        let events = terminal_once(Rc::new(move |event: TransferEvent| {
            if !live.borrow().contains_key(&transfer) {
                return;
            }
            forward(action_for_event(transfer, event));
        }));

        match self.transport.begin(self.transfer_request(files), events) {
            Ok(handle) => {
                if let Some(slot) = self.live.borrow_mut().get_mut(&transfer) {
                    *slot = Some(Rc::from(handle));
                }
            }
            Err(err) => {
                logging::warn!("failed to start upload {transfer}: {err}");
                dispatch(UploadAction::Error { transfer });
            }
        }
    }
}

fn action_for_event(transfer: TransferId, event: TransferEvent) -> UploadAction {
    match event {
        TransferEvent::Progress { loaded } => UploadAction::Progress { transfer, loaded },
        TransferEvent::Load => {
            logging::log!("upload {transfer} complete");
            UploadAction::Complete { transfer }
        }
        TransferEvent::Error { message } => {
            logging::warn!("upload {transfer} failed: {message}");
            UploadAction::Error { transfer }
        }
        TransferEvent::Abort => {
            logging::warn!("upload {transfer} was aborted");
            UploadAction::Abort { transfer }
        }
    }
}

#[cfg(test)]
mod tests {
    use parcel_host::{MemoryListRefresh, MemoryUploadTransport, NoopUploadTransport, OpaqueHandle};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::{UploadMode, UploadState},
        reducer::reduce_upload,
    };

    /// Drives the reducer and executor together, the way the Leptos provider does.
    struct Harness {
        host: UploadHostContext,
        transport: MemoryUploadTransport,
        refresh: Rc<MemoryListRefresh>,
        state: Rc<RefCell<UploadState>>,
        rejected: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Harness {
        fn new(attributes: SurfaceAttributes) -> Self {
            let transport = MemoryUploadTransport::default();
            let refresh = Rc::new(MemoryListRefresh::default());
            let host = UploadHostContext::new(
                Rc::new(transport.clone()),
                refresh.clone(),
                UploadConfig::default(),
                attributes,
            );
            Self {
                host,
                transport,
                refresh,
                state: Rc::default(),
                rejected: Rc::default(),
            }
        }

        fn dispatcher(&self) -> impl Fn(UploadAction) + Clone + 'static {
            let host = self.host.clone();
            let state = self.state.clone();
            let rejected = self.rejected.clone();
            move |action| dispatch(&host, &state, &rejected, action)
        }

        fn dispatch(&self, action: UploadAction) {
            (self.dispatcher())(action);
        }

        fn mode(&self) -> UploadMode {
            self.state.borrow().mode
        }
    }

    fn dispatch(
        host: &UploadHostContext,
        state: &Rc<RefCell<UploadState>>,
        rejected: &Rc<RefCell<Vec<&'static str>>>,
        action: UploadAction,
    ) {
        let name = action.name();
        let outcome = reduce_upload(&state.borrow(), action);
        match outcome {
            Ok((next, effects)) => {
                *state.borrow_mut() = next;
                for effect in effects {
                    let host_for_effect = host.clone();
                    let state = state.clone();
                    let rejected = rejected.clone();
                    host.run_effect(effect, move |action| {
                        dispatch(&host_for_effect, &state, &rejected, action)
                    });
                }
            }
            Err(_) => rejected.borrow_mut().push(name),
        }
    }

    fn candidate(name: &str, size: u64) -> FileCandidate {
        FileCandidate {
            payload: OpaqueHandle::new(name.to_string()),
            name: name.to_string(),
            size,
            content_type: String::new(),
        }
    }

    fn team_surface() -> SurfaceAttributes {
        SurfaceAttributes {
            csrf_token: "tok".to_string(),
            team: Some("t-1".to_string()),
        }
    }

    #[test]
    fn request_carries_token_team_and_files_in_order() {
        let harness = Harness::new(team_surface());
        let files = vec![candidate("a", 30), candidate("b", 40)];

        let request = harness.host.transfer_request(&files);

        assert_eq!(request.endpoint, "/uploads/new");
        assert_eq!(
            request.fields,
            vec![
                ("csrf_token".to_string(), "tok".to_string()),
                ("team".to_string(), "t-1".to_string())
            ]
        );
        assert_eq!(request.file_field, "file");
        assert!(request.files[0].payload.ptr_eq(&files[0].payload));
        assert_eq!(request.files[1].name, "b");
    }

    #[test]
    fn completed_upload_refreshes_the_list_once_and_releases_the_request() {
        let harness = Harness::new(SurfaceAttributes::default());
        harness.dispatch(UploadAction::Add {
            files: vec![candidate("a", 30), candidate("b", 40)],
        });
        harness.dispatch(UploadAction::StartUpload {
            transfer: TransferId(1),
        });
        assert!(harness.host.is_live(TransferId(1)));

        let transfer = harness.transport.last().expect("request sent");
        transfer.emit(TransferEvent::Progress { loaded: 35 });
        assert_eq!(harness.state.borrow().upload_progress, 50);

        transfer.emit(TransferEvent::Load);
        transfer.emit(TransferEvent::Load);

        assert_eq!(harness.mode(), UploadMode::Complete);
        assert!(!harness.host.is_live(TransferId(1)));
        assert_eq!(
            harness.refresh.calls(),
            vec![("#upload-list-refresh".to_string(), "refresh".to_string())]
        );
        assert!(harness.rejected.borrow().is_empty());
    }

    #[test]
    fn cancel_aborts_once_and_ignores_late_completion() {
        let harness = Harness::new(SurfaceAttributes::default());
        harness.dispatch(UploadAction::Add {
            files: vec![candidate("a", 10)],
        });
        harness.dispatch(UploadAction::StartUpload {
            transfer: TransferId(1),
        });

        harness.dispatch(UploadAction::Cancel);
        let transfer = harness.transport.last().expect("request sent");
        transfer.emit(TransferEvent::Load);

        assert!(transfer.was_aborted());
        assert_eq!(harness.mode(), UploadMode::Aborted);
        assert!(harness.refresh.calls().is_empty());
        assert!(harness.rejected.borrow().is_empty());
    }

    #[test]
    fn reset_discards_the_request_without_feedback() {
        let harness = Harness::new(SurfaceAttributes::default());
        harness.dispatch(UploadAction::Add {
            files: vec![candidate("a", 10)],
        });
        harness.dispatch(UploadAction::StartUpload {
            transfer: TransferId(3),
        });

        harness.dispatch(UploadAction::Reset);

        assert!(harness.transport.last().expect("sent").was_aborted());
        assert!(!harness.host.is_live(TransferId(3)));
        assert_eq!(*harness.state.borrow(), UploadState::default());
        assert!(harness.rejected.borrow().is_empty());
    }

    #[test]
    fn discarding_all_requests_aborts_without_feedback() {
        let harness = Harness::new(SurfaceAttributes::default());
        harness.dispatch(UploadAction::Add {
            files: vec![candidate("a", 10)],
        });
        harness.dispatch(UploadAction::StartUpload {
            transfer: TransferId(4),
        });

        harness.host.discard_all();
        let transfer = harness.transport.last().expect("request sent");
        transfer.emit(TransferEvent::Load);

        assert!(transfer.was_aborted());
        assert!(!harness.host.is_live(TransferId(4)));
        assert_eq!(harness.mode(), UploadMode::Uploading);
        assert!(harness.refresh.calls().is_empty());
    }

    #[test]
    fn transport_refusal_surfaces_as_error() {
        let refresh = Rc::new(MemoryListRefresh::default());
        let host = UploadHostContext::new(
            Rc::new(NoopUploadTransport),
            refresh,
            UploadConfig::default(),
            SurfaceAttributes::default(),
        );
        let harness = Harness {
            host,
            transport: MemoryUploadTransport::default(),
            refresh: Rc::new(MemoryListRefresh::default()),
            state: Rc::default(),
            rejected: Rc::default(),
        };
        harness.dispatch(UploadAction::Add {
            files: vec![candidate("a", 10)],
        });
        harness.dispatch(UploadAction::StartUpload {
            transfer: TransferId(1),
        });

        assert_eq!(harness.mode(), UploadMode::Error);
        assert!(!harness.host.is_live(TransferId(1)));
    }
}
