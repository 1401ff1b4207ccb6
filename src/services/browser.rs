//! Directory browser: navigation below a fixed base path.
//!
//! Every navigation issues exactly one listing request. Requests are tagged
//! with an id and their target path; issuing a new one aborts the previous
//! fetch, and any response that still shows up for a superseded request is
//! dropped when it arrives.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::error::{AppError, ListingError};
use crate::models::{DirectoryEntry, EntryOrder};
use crate::scope_path::{self, PathStyle};
use crate::services::listing_service::{order_entries, ListingProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    Loading,
    Loaded(Vec<DirectoryEntry>),
    Failed(ListingError),
}

/// What a gesture did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// A listing request was issued for `path`.
    Navigated { path: String },
    Selected,
    Closed,
    Ignored,
}

#[derive(Debug)]
struct ListingResponse {
    request_id: u64,
    path: String,
    result: Result<Vec<DirectoryEntry>, ListingError>,
}

struct PendingRequest {
    id: u64,
    path: String,
    task: JoinHandle<()>,
    // Set once `task` has been joined; a JoinHandle must not be polled again.
    task_ended: bool,
}

enum Arrival {
    Response(ListingResponse),
    TaskEnded(Result<(), JoinError>),
    ChannelClosed,
}

type SelectCallback = Box<dyn FnMut(DirectoryEntry) + Send>;
type CloseCallback = Box<dyn FnMut() + Send>;

pub struct DirectoryBrowser {
    base_path: String,
    current_path: String,
    style: PathStyle,
    view: ListingView,
    order: EntryOrder,
    provider: Arc<dyn ListingProvider>,
    runtime: Handle,
    next_request_id: u64,
    pending: Option<PendingRequest>,
    responses_tx: mpsc::UnboundedSender<ListingResponse>,
    responses_rx: mpsc::UnboundedReceiver<ListingResponse>,
    on_select: SelectCallback,
    on_close: CloseCallback,
    finished: bool,
}

impl DirectoryBrowser {
    /// Mounts a browser at `base_path` and requests its listing.
    ///
    /// Fails with [`AppError::Runtime`] outside a tokio runtime.
    pub fn mount<S, C>(
        base_path: impl Into<String>,
        provider: Arc<dyn ListingProvider>,
        on_select: S,
        on_close: C,
    ) -> Result<Self, AppError>
    where
        S: FnMut(DirectoryEntry) + Send + 'static,
        C: FnMut() + Send + 'static,
    {
        let base_path = base_path.into();
        if base_path.trim().is_empty() {
            return Err(AppError::InvalidBasePath(base_path));
        }
        let runtime = Handle::try_current().map_err(|e| AppError::Runtime(e.to_string()))?;

        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        let mut browser = Self {
            current_path: base_path.clone(),
            style: PathStyle::detect(&base_path),
            base_path,
            view: ListingView::Loading,
            order: EntryOrder::default(),
            provider,
            runtime,
            next_request_id: 0,
            pending: None,
            responses_tx,
            responses_rx,
            on_select: Box::new(on_select),
            on_close: Box::new(on_close),
            finished: false,
        };

        tracing::debug!(base_path = %browser.base_path, "mounting directory browser");
        browser.request_listing(browser.base_path.clone());
        Ok(browser)
    }

    pub fn with_entry_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn display_path(&self) -> String {
        scope_path::relative_display(&self.current_path, &self.base_path, self.style)
    }

    pub fn view(&self) -> &ListingView {
        &self.view
    }

    /// Entries of the last applied listing; empty while loading or failed.
    pub fn entries(&self) -> &[DirectoryEntry] {
        match &self.view {
            ListingView::Loaded(entries) => entries,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&ListingError> {
        match &self.view {
            ListingView::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ListingView::Loading)
    }

    /// Target of the listing request still in flight, if any.
    pub fn pending_path(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.path.as_str())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn can_navigate_up(&self) -> bool {
        !scope_path::same_path(&self.current_path, &self.base_path, self.style)
    }

    /// Enters a directory entry, or reports a file entry to `on_select`.
    pub fn select_entry(&mut self, entry: &DirectoryEntry) -> GestureOutcome {
        if self.finished {
            return GestureOutcome::Ignored;
        }

        if entry.is_directory {
            if !scope_path::is_within_scope(&entry.path, &self.base_path, self.style) {
                tracing::warn!(
                    path = %entry.path,
                    base_path = %self.base_path,
                    "refusing to enter directory outside the base path"
                );
                return GestureOutcome::Ignored;
            }
            return self.navigate_to(entry.path.clone());
        }

        tracing::info!(path = %entry.path, "entry selected");
        self.finished = true;
        (self.on_select)(entry.clone());
        GestureOutcome::Selected
    }

    /// Selects the `index`-th entry of the current listing.
    pub fn select_index(&mut self, index: usize) -> GestureOutcome {
        match self.entries().get(index).cloned() {
            Some(entry) => self.select_entry(&entry),
            None => GestureOutcome::Ignored,
        }
    }

    pub fn navigate_up(&mut self) -> GestureOutcome {
        if self.finished || !self.can_navigate_up() {
            return GestureOutcome::Ignored;
        }

        let target = match scope_path::parent(&self.current_path, self.style) {
            Some(parent) if scope_path::same_path(&parent, &self.base_path, self.style) => {
                self.base_path.clone()
            }
            Some(parent) if scope_path::is_within_scope(&parent, &self.base_path, self.style) => {
                parent
            }
            _ => self.base_path.clone(),
        };
        self.navigate_to(target)
    }

    /// Re-requests the listing of the current directory.
    pub fn refresh(&mut self) -> GestureOutcome {
        if self.finished {
            return GestureOutcome::Ignored;
        }
        let path = self.current_path.clone();
        self.request_listing(path.clone());
        GestureOutcome::Navigated { path }
    }

    pub fn close(&mut self) -> GestureOutcome {
        tracing::debug!(current_path = %self.current_path, "browser closed");
        (self.on_close)();
        GestureOutcome::Closed
    }

    /// Waits for one listing response and applies it. Returns whether the
    /// response was current; stale responses are dropped.
    ///
    /// A fetch task that ends without answering (a panicking provider) is
    /// reported as a host error for its path.
    pub async fn next_response(&mut self) -> bool {
        let arrival = match self.pending.as_mut() {
            Some(pending) if !pending.task_ended => tokio::select! {
                biased;
                response = self.responses_rx.recv() => {
                    response.map_or(Arrival::ChannelClosed, Arrival::Response)
                }
                joined = &mut pending.task => Arrival::TaskEnded(joined),
            },
            _ => self
                .responses_rx
                .recv()
                .await
                .map_or(Arrival::ChannelClosed, Arrival::Response),
        };

        let response = match arrival {
            Arrival::Response(response) => response,
            Arrival::ChannelClosed => return false,
            Arrival::TaskEnded(joined) => {
                let Some(pending) = self.pending.as_mut() else {
                    return false;
                };
                pending.task_ended = true;
                let (request_id, path) = (pending.id, pending.path.clone());
                match joined {
                    // The task sent its response before finishing.
                    Ok(()) => loop {
                        match self.responses_rx.recv().await {
                            Some(response) if response.request_id == request_id => {
                                break response;
                            }
                            Some(stale) => {
                                self.apply_response(stale);
                            }
                            None => return false,
                        }
                    },
                    Err(err) => {
                        tracing::error!(
                            request_id,
                            path = %path,
                            error = %err,
                            "listing task ended without a response"
                        );
                        ListingResponse {
                            request_id,
                            path,
                            result: Err(ListingError::Host(format!("listing task failed: {err}"))),
                        }
                    }
                }
            }
        };
        self.apply_response(response)
    }

    /// Processes responses until the request for the current path has been
    /// applied. Waits indefinitely on a provider that never answers; a
    /// provider that panics settles as a host error.
    pub async fn settle(&mut self) {
        while self.pending.is_some() {
            self.next_response().await;
        }
    }

    fn navigate_to(&mut self, path: String) -> GestureOutcome {
        tracing::debug!(from = %self.current_path, to = %path, "navigating");
        self.current_path = path.clone();
        self.request_listing(path.clone());
        GestureOutcome::Navigated { path }
    }

    fn request_listing(&mut self, path: String) {
        if let Some(previous) = self.pending.take() {
            tracing::debug!(
                request_id = previous.id,
                path = %previous.path,
                "aborting superseded listing request"
            );
            previous.task.abort();
        }

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.view = ListingView::Loading;

        let provider = Arc::clone(&self.provider);
        let responses = self.responses_tx.clone();
        let target = path.clone();
        let task = self.runtime.spawn(async move {
            let result = provider.list(&target).await;
            let _ = responses.send(ListingResponse {
                request_id,
                path: target,
                result,
            });
        });

        tracing::debug!(request_id, path = %path, "listing requested");
        self.pending = Some(PendingRequest {
            id: request_id,
            path,
            task,
            task_ended: false,
        });
    }

    fn apply_response(&mut self, response: ListingResponse) -> bool {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.id == response.request_id && p.path == response.path)
            && response.path == self.current_path;

        if !is_current {
            tracing::debug!(
                request_id = response.request_id,
                path = %response.path,
                "dropping stale listing response"
            );
            return false;
        }

        self.pending = None;
        self.view = match response.result {
            Ok(entries) => ListingView::Loaded(self.accept_entries(&response.path, entries)),
            Err(err) => {
                tracing::warn!(path = %response.path, error = %err, "listing failed");
                ListingView::Failed(err)
            }
        };
        true
    }

    /// Keeps unique direct children of `queried`, in the configured order.
    fn accept_entries(&self, queried: &str, entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
        let mut seen = HashSet::new();
        let mut accepted: Vec<DirectoryEntry> = entries
            .into_iter()
            .filter(|entry| {
                if !scope_path::is_direct_child(&entry.path, queried, self.style) {
                    tracing::warn!(path = %entry.path, queried, "dropping entry outside listed directory");
                    return false;
                }
                if !seen.insert(entry.path.clone()) {
                    tracing::warn!(path = %entry.path, "dropping duplicate entry");
                    return false;
                }
                true
            })
            .collect();

        order_entries(&mut accepted, self.order);
        accepted
    }
}

impl Drop for DirectoryBrowser {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}
