//! Reachability of the chat endpoint: on-demand checks and the keep-alive loop.

use std::future::Future;

use chat_types::ConnectionStatus;
use dioxus_logger::tracing::debug;
use futures::future::{AbortHandle, Abortable};

use crate::api::ChatTransport;
use crate::session::ChatSession;
use crate::state::StateHandle;

/// Probe the chat endpoint and record the verdict.
///
/// Returns whether the endpoint answered. The displayed status only changes if
/// nothing that started after this check has reported first.
pub async fn check<T, S>(session: &ChatSession<T>, mut state: S) -> bool
where
    T: ChatTransport,
    S: StateHandle,
{
    let ticket = state.update(|s| s.status.begin());
    let reachable = match session.transport.probe(&session.id).await {
        Ok(()) => true,
        Err(e) => {
            debug!("Health check failed: {e}");
            false
        }
    };

    let landed = state.update(|s| {
        s.status
            .resolve(ticket, ConnectionStatus::from_reachable(reachable))
    });
    if !landed {
        debug!("Discarded stale health check result");
    }
    reachable
}

/// Run `tick` after every `sleep`, forever.
pub async fn keepalive_loop<Sl, SF, Tk, TF>(mut sleep: Sl, mut tick: Tk)
where
    Sl: FnMut() -> SF,
    SF: Future<Output = ()>,
    Tk: FnMut() -> TF,
    TF: Future<Output = ()>,
{
    loop {
        sleep().await;
        tick().await;
    }
}

/// Wrap a keep-alive loop so it can be stopped from the session.
pub fn abortable_keepalive<F>(task: F) -> (AbortHandle, Abortable<F>)
where
    F: Future<Output = ()>,
{
    let (handle, registration) = AbortHandle::new_pair();
    (handle, Abortable::new(task, registration))
}
