//! Effect-queue executor for reducer-emitted upload side effects.

use leptos::*;

use crate::runtime_context::UploadRuntimeContext;

/// Installs the executor that drains reducer-emitted effects in order.
pub fn install(runtime: UploadRuntimeContext) {
    // A transport that reports synchronously (begin failure, abort on cancel) dispatches back
    // into the reducer during this drain. The queue is emptied first so those effects land in a
    // new batch.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        for effect in queued {
            host.run_effect(effect, move |action| runtime.dispatch_action(action));
        }
    });
}
