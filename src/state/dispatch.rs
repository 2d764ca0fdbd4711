// UI-thread dispatch.
// Runs SDK calls on the tokio runtime and hands their results back to the event loop.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::sdk::{CardSummary, SdkError, SecureDisplay};

/// Identifies one async SDK request so late results can be matched or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub(crate) u64);

/// Result of an async SDK call, delivered back to the UI thread.
#[derive(Debug)]
pub enum Completion {
    Cards {
        request: RequestId,
        result: Result<Vec<CardSummary>, SdkError>,
    },
    Pin {
        request: RequestId,
        result: Result<SecureDisplay, SdkError>,
    },
}

impl Completion {
    pub fn request(&self) -> RequestId {
        match self {
            Completion::Cards { request, .. } | Completion::Pin { request, .. } => *request,
        }
    }
}

/// Sending half: spawns work and posts its completion to the UI inbox.
#[derive(Clone)]
pub struct UiContext {
    runtime: Handle,
    tx: UnboundedSender<Completion>,
}

/// Receiving half, drained by the event loop.
pub struct UiInbox {
    rx: UnboundedReceiver<Completion>,
}

/// Create a linked context/inbox pair on the given runtime.
pub fn ui_channel(runtime: Handle) -> (UiContext, UiInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiContext { runtime, tx }, UiInbox { rx })
}

impl UiContext {
    /// Run `work` in the background; its completion is queued for the UI thread.
    pub fn spawn<F>(&self, work: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let completion = work.await;
            if tx.send(completion).is_err() {
                tracing::debug!("ui inbox closed, dropping completion");
            }
        });
    }
}

impl UiInbox {
    /// Next queued completion without blocking.
    pub fn try_next(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next completion.
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }
}

/// Await an SDK call, optionally bounded by a timeout.
pub async fn within<T>(
    limit: Option<Duration>,
    call: impl Future<Output = Result<T, SdkError>>,
) -> Result<T, SdkError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(SdkError::Timeout(limit))),
        None => call.await,
    }
}
