//! Reducer actions, side-effect intents, and transition logic for the upload surface.

use thiserror::Error;

use crate::{
    files::{self, DragCandidate, FileCandidate},
    mime::GENERIC_FILE_ICON,
    model::{TransferId, UploadMode, UploadState, ABORT_MESSAGE, TRANSPORT_ERROR_MESSAGE},
};

const EMPTY_DRAG_ICON: &str = "icon-ban";
const MULTI_DRAG_ICON: &str = "icon-files";

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_upload`].
pub enum UploadAction {
    /// Items are hovering over the page.
    DragOver {
        /// Metadata previews of the hovering items.
        items: Vec<DragCandidate>,
    },
    /// The hover ended without a drop.
    DragLeave,
    /// Files were dropped.
    Drop {
        /// Resolved files, in drop order.
        files: Vec<FileCandidate>,
    },
    /// Files were chosen with the picker.
    Add {
        /// Picked files, in picker order.
        files: Vec<FileCandidate>,
    },
    /// Remove one queued file.
    Remove {
        /// Index into the queued files.
        index: usize,
    },
    /// Remove every queued file.
    RemoveAll,
    /// Submit the queued files as a new request.
    StartUpload {
        /// Id minted for the new request.
        transfer: TransferId,
    },
    /// Upload body progress.
    Progress {
        /// Request the event belongs to.
        transfer: TransferId,
        /// Bytes sent so far.
        loaded: u64,
    },
    /// The request finished.
    Complete {
        /// Request the event belongs to.
        transfer: TransferId,
    },
    /// The request failed.
    Error {
        /// Request the event belongs to.
        transfer: TransferId,
    },
    /// The request was aborted.
    Abort {
        /// Request the event belongs to.
        transfer: TransferId,
    },
    /// The user asked to cancel the in-flight request.
    Cancel,
    /// Resubmit the queued files after a failure or abort.
    Retry {
        /// Id minted for the new request.
        transfer: TransferId,
    },
    /// Return to the initial state.
    Reset,
}

impl UploadAction {
    /// Short action name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DragOver { .. } => "drag-over",
            Self::DragLeave => "drag-leave",
            Self::Drop { .. } => "drop",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::RemoveAll => "remove-all",
            Self::StartUpload { .. } => "start-upload",
            Self::Progress { .. } => "progress",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
            Self::Abort { .. } => "abort",
            Self::Cancel => "cancel",
            Self::Retry { .. } => "retry",
            Self::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_upload`] and executed by the runtime host.
pub enum UploadEffect {
    /// Send `files` as request `transfer`.
    BeginTransfer {
        /// Id of the new request.
        transfer: TransferId,
        /// Files to submit, in order.
        files: Vec<FileCandidate>,
    },
    /// Cancel an in-flight request; the transport reports the abort back.
    AbortTransfer(TransferId),
    /// Stop and forget a request without reporting anything back.
    DiscardTransfer(TransferId),
    /// Drop host resources held for a finished request.
    ReleaseTransfer(TransferId),
    /// Ask the page to refresh its upload list.
    RefreshList,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejected transitions. The state is left untouched.
pub enum TransitionError {
    /// The action is not accepted in the current mode.
    #[error("`{action}` is not accepted while {}", .mode.token())]
    NotAccepted {
        /// Rejected action name.
        action: &'static str,
        /// Mode at the time of the action.
        mode: UploadMode,
    },
    /// Starting an upload requires at least one queued file.
    #[error("there are no files to upload")]
    NoFiles,
    /// A transport event named a request that is not the active one.
    #[error("transfer {0} is not the active request")]
    StaleTransfer(TransferId),
}

/// Next state plus the effects to execute.
pub type Transition = (UploadState, Vec<UploadEffect>);

/// Applies `action` to `state`, returning the successor state and emitted effects.
///
/// `state` is never mutated; a rejected action leaves the caller's state as it was.
///
/// # Errors
///
/// Returns [`TransitionError`] when the action is not valid in the current mode, when an upload is
/// requested with no files, or when a transport event names a stale request.
pub fn reduce_upload(
    state: &UploadState,
    action: UploadAction,
) -> Result<Transition, TransitionError> {
    let name = action.name();
    let reject = || TransitionError::NotAccepted {
        action: name,
        mode: state.mode,
    };
    let preparing = || {
        if state.mode == UploadMode::Preparing {
            Ok(())
        } else {
            Err(reject())
        }
    };
    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        UploadAction::DragOver { items } => {
            preparing()?;
            let (icon, hint) = drag_summary(&items);
            next.drag_icon = icon;
            next.drag_hint = Some(hint);
            next.drag_files = items;
        }
        UploadAction::DragLeave => {
            preparing()?;
            clear_drag(&mut next);
        }
        UploadAction::Drop { files } | UploadAction::Add { files } => {
            preparing()?;
            clear_drag(&mut next);
            next.files.extend(files);
            next.total_size = files::total_size(&next.files);
        }
        UploadAction::Remove { index } => {
            preparing()?;
            if index < next.files.len() {
                next.files.remove(index);
                next.total_size = files::total_size(&next.files);
            }
        }
        UploadAction::RemoveAll => {
            preparing()?;
            next.files.clear();
            next.total_size = 0;
        }
        UploadAction::StartUpload { transfer } => {
            preparing()?;
            if state.files.is_empty() {
                return Err(TransitionError::NoFiles);
            }
            clear_drag(&mut next);
            begin(&mut next, &mut effects, transfer);
        }
        UploadAction::Retry { transfer } => {
            if !matches!(state.mode, UploadMode::Error | UploadMode::Aborted) {
                return Err(reject());
            }
            if state.files.is_empty() {
                return Err(TransitionError::NoFiles);
            }
            begin(&mut next, &mut effects, transfer);
        }
        UploadAction::Progress { transfer, loaded } => {
            require_active(state, transfer)?;
            next.uploaded_bytes = loaded;
            next.upload_progress = percentage(loaded, state.total_size);
        }
        UploadAction::Complete { transfer } => {
            require_active(state, transfer)?;
            next.mode = UploadMode::Complete;
            next.transfer = None;
            effects.push(UploadEffect::ReleaseTransfer(transfer));
            effects.push(UploadEffect::RefreshList);
        }
        UploadAction::Error { transfer } => {
            require_active(state, transfer)?;
            next.mode = UploadMode::Error;
            next.transfer = None;
            next.error = Some(TRANSPORT_ERROR_MESSAGE.to_string());
            effects.push(UploadEffect::ReleaseTransfer(transfer));
        }
        UploadAction::Abort { transfer } => {
            require_active(state, transfer)?;
            next.mode = UploadMode::Aborted;
            next.transfer = None;
            next.error = Some(ABORT_MESSAGE.to_string());
            effects.push(UploadEffect::ReleaseTransfer(transfer));
        }
        UploadAction::Cancel => {
            let transfer = state.transfer.ok_or_else(reject)?;
            effects.push(UploadEffect::AbortTransfer(transfer));
        }
        UploadAction::Reset => {
            if let Some(transfer) = state.transfer {
                effects.push(UploadEffect::DiscardTransfer(transfer));
            }
            next = UploadState::default();
        }
    }

    Ok((next, effects))
}

fn require_active(state: &UploadState, transfer: TransferId) -> Result<(), TransitionError> {
    if state.mode == UploadMode::Uploading && state.transfer == Some(transfer) {
        Ok(())
    } else {
        Err(TransitionError::StaleTransfer(transfer))
    }
}

fn begin(next: &mut UploadState, effects: &mut Vec<UploadEffect>, transfer: TransferId) {
    next.mode = UploadMode::Uploading;
    next.transfer = Some(transfer);
    next.uploaded_bytes = 0;
    next.upload_progress = 0;
    next.error = None;
    effects.push(UploadEffect::BeginTransfer {
        transfer,
        files: next.files.clone(),
    });
}

fn clear_drag(next: &mut UploadState) {
    next.drag_files.clear();
    next.drag_icon = GENERIC_FILE_ICON;
    next.drag_hint = None;
}

fn drag_summary(items: &[DragCandidate]) -> (&'static str, String) {
    match items {
        [] => (EMPTY_DRAG_ICON, "No files".to_string()),
        [only] => (
            only.icon(),
            only.hint().unwrap_or("Upload file").to_string(),
        ),
        many => (MULTI_DRAG_ICON, format!("Upload {} files", many.len())),
    }
}

/// Rounded whole-number percentage of `loaded` over `total`; `0` when `total` is `0`.
pub fn percentage(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let loaded = u128::from(loaded.min(total));
    let total = u128::from(total);
    ((loaded * 200 + total) / (total * 2)) as u8
}

#[cfg(test)]
mod tests {
    use parcel_host::OpaqueHandle;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn file(name: &str, size: u64) -> FileCandidate {
        FileCandidate {
            payload: OpaqueHandle::new(name.to_string()),
            name: name.to_string(),
            size,
            content_type: String::new(),
        }
    }

    fn apply(state: &UploadState, action: UploadAction) -> Transition {
        reduce_upload(state, action).expect("transition")
    }

    fn queued(sizes: &[u64]) -> UploadState {
        let files = sizes
            .iter()
            .enumerate()
            .map(|(index, size)| file(&format!("f{index}"), *size))
            .collect();
        apply(&UploadState::default(), UploadAction::Drop { files }).0
    }

    fn uploading(sizes: &[u64], transfer: TransferId) -> UploadState {
        apply(&queued(sizes), UploadAction::StartUpload { transfer }).0
    }

    #[test]
    fn drag_hints_reflect_item_count() {
        let state = UploadState::default();

        let (one, _) = apply(
            &state,
            UploadAction::DragOver {
                items: vec![DragCandidate::new("image/png")],
            },
        );
        assert_eq!(one.drag_icon, "icon-file-image");
        assert_eq!(one.drag_hint.as_deref(), Some("PNG image"));

        let (unknown, _) = apply(
            &state,
            UploadAction::DragOver {
                items: vec![DragCandidate::new("")],
            },
        );
        assert_eq!(unknown.drag_icon, GENERIC_FILE_ICON);
        assert_eq!(unknown.drag_hint.as_deref(), Some("Upload file"));

        let (many, _) = apply(
            &state,
            UploadAction::DragOver {
                items: vec![DragCandidate::new(""), DragCandidate::new("text/plain")],
            },
        );
        assert_eq!(many.drag_icon, MULTI_DRAG_ICON);
        assert_eq!(many.drag_hint.as_deref(), Some("Upload 2 files"));

        let (none, _) = apply(&state, UploadAction::DragOver { items: Vec::new() });
        assert_eq!(none.drag_icon, EMPTY_DRAG_ICON);
        assert_eq!(none.drag_hint.as_deref(), Some("No files"));

        let (left, _) = apply(&many, UploadAction::DragLeave);
        assert!(left.drag_files.is_empty());
        assert_eq!(left.drag_icon, GENERIC_FILE_ICON);
        assert_eq!(left.drag_hint, None);
    }

    #[test]
    fn drop_then_add_accumulates_in_order() {
        let dropped = queued(&[100, 200]);
        assert_eq!(dropped.total_size, 300);

        let (added, effects) = apply(
            &dropped,
            UploadAction::Add {
                files: vec![file("picked", 50)],
            },
        );
        let names: Vec<&str> = added.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["f0", "f1", "picked"]);
        assert_eq!(added.total_size, 350);
        assert!(effects.is_empty());
    }

    #[test]
    fn remove_ignores_out_of_range_indices() {
        let state = queued(&[100, 200]);

        let (removed, _) = apply(&state, UploadAction::Remove { index: 0 });
        assert_eq!(removed.files.len(), 1);
        assert_eq!(removed.total_size, 200);

        let (unchanged, _) = apply(&removed, UploadAction::Remove { index: 5 });
        assert_eq!(unchanged, removed);

        let (cleared, _) = apply(&state, UploadAction::RemoveAll);
        assert!(cleared.files.is_empty());
        assert_eq!(cleared.total_size, 0);
    }

    #[test]
    fn successful_upload_reports_progress_then_completes() {
        let transfer = TransferId(1);
        let state = queued(&[100, 200]);

        let (started, effects) = apply(&state, UploadAction::StartUpload { transfer });
        assert_eq!(started.mode, UploadMode::Uploading);
        assert_eq!(started.transfer, Some(transfer));
        assert_eq!(
            effects,
            vec![UploadEffect::BeginTransfer {
                transfer,
                files: state.files.clone(),
            }]
        );

        let (halfway, _) = apply(
            &started,
            UploadAction::Progress {
                transfer,
                loaded: 150,
            },
        );
        assert_eq!(halfway.uploaded_bytes, 150);
        assert_eq!(halfway.upload_progress, 50);

        let (done, effects) = apply(&halfway, UploadAction::Complete { transfer });
        assert_eq!(done.mode, UploadMode::Complete);
        assert_eq!(done.transfer, None);
        assert_eq!(done.files.len(), 2);
        assert_eq!(
            effects,
            vec![
                UploadEffect::ReleaseTransfer(transfer),
                UploadEffect::RefreshList
            ]
        );
    }

    #[test]
    fn failed_upload_can_be_retried_with_a_new_transfer() {
        let first = TransferId(1);
        let (failed, effects) = apply(
            &uploading(&[10], first),
            UploadAction::Error { transfer: first },
        );
        assert_eq!(failed.mode, UploadMode::Error);
        assert_eq!(failed.error.as_deref(), Some(TRANSPORT_ERROR_MESSAGE));
        assert_eq!(effects, vec![UploadEffect::ReleaseTransfer(first)]);

        let second = TransferId(2);
        let (retrying, effects) = apply(&failed, UploadAction::Retry { transfer: second });
        assert_eq!(retrying.mode, UploadMode::Uploading);
        assert_eq!(retrying.error, None);
        assert_eq!(retrying.upload_progress, 0);
        assert!(matches!(
            effects.as_slice(),
            [UploadEffect::BeginTransfer { transfer, .. }] if *transfer == second
        ));

        assert_eq!(
            reduce_upload(&retrying, UploadAction::Complete { transfer: first }),
            Err(TransitionError::StaleTransfer(first))
        );
    }

    #[test]
    fn cancel_requests_abort_and_abort_event_settles_state() {
        let transfer = TransferId(4);
        let state = uploading(&[10, 20], transfer);

        let (unchanged, effects) = apply(&state, UploadAction::Cancel);
        assert_eq!(unchanged, state);
        assert_eq!(effects, vec![UploadEffect::AbortTransfer(transfer)]);

        let (aborted, _) = apply(&state, UploadAction::Abort { transfer });
        assert_eq!(aborted.mode, UploadMode::Aborted);
        assert_eq!(aborted.error.as_deref(), Some(ABORT_MESSAGE));
        assert_eq!(aborted.transfer, None);
    }

    #[test]
    fn reset_while_uploading_discards_the_request() {
        let transfer = TransferId(9);
        let (reset, effects) = apply(&uploading(&[5], transfer), UploadAction::Reset);

        assert_eq!(reset, UploadState::default());
        assert_eq!(effects, vec![UploadEffect::DiscardTransfer(transfer)]);

        let (fresh, effects) = apply(&queued(&[5]), UploadAction::Reset);
        assert_eq!(fresh, UploadState::default());
        assert!(effects.is_empty());
    }

    #[test]
    fn file_mutations_are_rejected_outside_preparing() {
        let state = uploading(&[5], TransferId(1));

        assert_eq!(
            reduce_upload(&state, UploadAction::Add { files: Vec::new() }),
            Err(TransitionError::NotAccepted {
                action: "add",
                mode: UploadMode::Uploading,
            })
        );
        assert!(reduce_upload(&state, UploadAction::RemoveAll).is_err());
        assert!(reduce_upload(&state, UploadAction::DragLeave).is_err());
    }

    #[test]
    fn start_requires_files() {
        assert_eq!(
            reduce_upload(
                &UploadState::default(),
                UploadAction::StartUpload {
                    transfer: TransferId(1)
                }
            ),
            Err(TransitionError::NoFiles)
        );
    }

    #[test]
    fn progress_is_zero_when_total_is_zero() {
        let transfer = TransferId(1);
        let (state, _) = apply(
            &uploading(&[0], transfer),
            UploadAction::Progress {
                transfer,
                loaded: 0,
            },
        );
        assert_eq!(state.upload_progress, 0);
    }

    fn action_strategy() -> impl Strategy<Value = UploadAction> {
        let transfer = (0u64..4).prop_map(TransferId);
        prop_oneof![
            (0usize..4).prop_map(|count| UploadAction::DragOver {
                items: (0..count).map(|_| DragCandidate::new("image/png")).collect(),
            })
            .boxed(),
            Just(UploadAction::DragLeave).boxed(),
            prop::collection::vec(0u64..5_000, 0..4).prop_map(|sizes| UploadAction::Drop {
                files: sizes.iter().map(|size| file("d", *size)).collect(),
            })
            .boxed(),
            prop::collection::vec(0u64..5_000, 0..4).prop_map(|sizes| UploadAction::Add {
                files: sizes.iter().map(|size| file("a", *size)).collect(),
            })
            .boxed(),
            (0usize..6)
                .prop_map(|index| UploadAction::Remove { index })
                .boxed(),
            Just(UploadAction::RemoveAll).boxed(),
            transfer
                .clone()
                .prop_map(|transfer| UploadAction::StartUpload { transfer })
                .boxed(),
            (transfer.clone(), 0u64..20_000)
                .prop_map(|(transfer, loaded)| UploadAction::Progress { transfer, loaded })
                .boxed(),
            transfer
                .clone()
                .prop_map(|transfer| UploadAction::Complete { transfer })
                .boxed(),
            transfer
                .clone()
                .prop_map(|transfer| UploadAction::Error { transfer })
                .boxed(),
            transfer
                .clone()
                .prop_map(|transfer| UploadAction::Abort { transfer })
                .boxed(),
            Just(UploadAction::Cancel).boxed(),
            transfer
                .prop_map(|transfer| UploadAction::Retry { transfer })
                .boxed(),
            Just(UploadAction::Reset).boxed(),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_action_sequence(
            actions in prop::collection::vec(action_strategy(), 0..40)
        ) {
            let mut state = UploadState::default();
            for action in actions {
                let before = state.clone();
                match reduce_upload(&state, action.clone()) {
                    Ok((next, effects)) => {
                        if before.mode.is_terminal() && next.mode != before.mode {
                            let leaves_terminal_mode = matches!(
                                action,
                                UploadAction::Reset | UploadAction::Retry { .. }
                            );
                            prop_assert!(leaves_terminal_mode);
                        }
                        for effect in &effects {
                            if let UploadEffect::AbortTransfer(id) | UploadEffect::DiscardTransfer(id) = effect {
                                prop_assert_eq!(before.transfer, Some(*id));
                            }
                        }
                        if matches!(action, UploadAction::Reset) {
                            prop_assert_eq!(&next, &UploadState::default());
                        }
                        state = next;
                    }
                    Err(_) => prop_assert_eq!(&state, &before),
                }

                prop_assert_eq!(state.total_size, files::total_size(&state.files));
                prop_assert_eq!(state.mode == UploadMode::Uploading, state.transfer.is_some());
                prop_assert!(state.upload_progress <= 100);
                if state.total_size == 0 {
                    prop_assert_eq!(state.upload_progress, 0);
                }
            }
        }

        #[test]
        fn percentage_is_monotonic_in_loaded(total in 1u64..1_000_000, a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(percentage(low, total) <= percentage(high, total));
            prop_assert!(percentage(high, total) <= 100);
        }
    }
}
