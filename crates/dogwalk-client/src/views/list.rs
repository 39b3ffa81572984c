//! Dog list view: debounced search and "load more" paging.
//!
//! The view runs as a task that owns the list state. Search input is
//! debounced; once it settles, page one is fetched for the new query and
//! replaces the list. "Load more" fetches the page after the last received
//! `nextToken`, resending the query, and appends. Every fetch carries a
//! generation number and only the newest generation may touch the state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dogwalk_core::{Dog, DogList};

use crate::client::{DogApi, ListQuery};
use crate::error::ApiError;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Search text applied to the first fetch.
    pub name: Option<String>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub dogs: Vec<Dog>,
    pub next_token: Option<String>,
    /// Search text the current `dogs` were fetched for.
    pub search: String,
    pub loading: bool,
    pub error: Option<ApiError>,
    /// Highest command sequence number fully processed.
    settled: u64,
}

impl ListState {
    pub const fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}

#[derive(Debug)]
enum Command {
    Search(String),
    LoadMore,
    Refresh,
}

type FetchResult = (u64, bool, Result<DogList, ApiError>);

pub struct DogListView {
    commands: mpsc::UnboundedSender<(u64, Command)>,
    state: watch::Receiver<ListState>,
    issued: AtomicU64,
    cancel: CancellationToken,
}

impl DogListView {
    /// Start the view and fetch the first page.
    pub fn spawn(api: Arc<dyn DogApi>, options: ListOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let initial = ListState {
            search: options.name.clone().unwrap_or_default(),
            loading: true,
            ..ListState::default()
        };
        let (state_tx, state_rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        let worker = Worker {
            api,
            page_size: options.page_size,
            query: options.name.unwrap_or_default(),
            generation: 0,
            received: 0,
            debounce: None,
            inflight: JoinSet::new(),
            state: state_tx,
        };
        tokio::spawn(worker.run(rx, cancel.clone()));

        let view = Self {
            commands: tx,
            state: state_rx,
            issued: AtomicU64::new(0),
            cancel,
        };
        view.send(Command::Refresh);
        view
    }

    /// Update the search text. The fetch waits for [`SEARCH_DEBOUNCE`] of quiet.
    pub fn set_search(&self, text: impl Into<String>) {
        self.send(Command::Search(text.into()));
    }

    /// Fetch the page after the last one received, if there is one.
    pub fn load_more(&self) {
        self.send(Command::LoadMore);
    }

    pub fn refresh(&self) {
        self.send(Command::Refresh);
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.clone()
    }

    /// Wait until every command issued so far has been handled and no fetch
    /// or debounce is outstanding.
    pub async fn settled(&self) -> ListState {
        let target = self.issued.load(Ordering::SeqCst);
        let mut rx = self.state.clone();
        let done = rx.wait_for(|s| s.settled >= target).await.map(|s| s.clone());
        done.unwrap_or_else(|_| rx.borrow().clone())
    }

    fn send(&self, command: Command) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        if self.commands.send((seq, command)).is_err() {
            debug!("List view worker has stopped");
        }
    }
}

impl Drop for DogListView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker {
    api: Arc<dyn DogApi>,
    page_size: Option<usize>,
    /// Latest search text, possibly not yet fetched.
    query: String,
    generation: u64,
    received: u64,
    debounce: Option<Pin<Box<Sleep>>>,
    inflight: JoinSet<FetchResult>,
    state: watch::Sender<ListState>,
}

impl Worker {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<(u64, Command)>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                cmd = commands.recv() => {
                    let Some((seq, cmd)) = cmd else { break };
                    self.received = seq;
                    self.handle(cmd);
                }
                () = debounce_elapsed(&mut self.debounce) => {
                    self.debounce = None;
                    self.fetch(None);
                }
                Some(joined) = self.inflight.join_next(), if !self.inflight.is_empty() => {
                    match joined {
                        Ok(result) => self.apply(result),
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => warn!(error = %e, "List fetch task failed"),
                    }
                }
            }
            self.publish_progress();
        }
        self.inflight.abort_all();
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Search(text) => {
                self.query = text;
                self.debounce = Some(Box::pin(tokio::time::sleep(SEARCH_DEBOUNCE)));
            }
            Command::Refresh => {
                self.debounce = None;
                self.fetch(None);
            }
            Command::LoadMore => {
                if !self.inflight.is_empty() || self.debounce.is_some() {
                    debug!("Load more ignored while a fetch is pending");
                    return;
                }
                let token = self.state.borrow().next_token.clone();
                if let Some(token) = token {
                    self.fetch(Some(token));
                }
            }
        }
    }

    /// Start a fetch. Page one supersedes anything still in flight.
    fn fetch(&mut self, next_token: Option<String>) {
        let append = next_token.is_some();
        if !append {
            self.inflight.abort_all();
        }
        self.generation += 1;
        let generation = self.generation;
        let query = ListQuery {
            name: Some(self.query.clone()).filter(|q| !q.is_empty()),
            next_token,
            limit: self.page_size,
        };
        debug!(generation, ?query, "Fetching dogs");

        let api = Arc::clone(&self.api);
        self.inflight
            .spawn(async move { (generation, append, api.list_dogs(&query).await) });
    }

    fn apply(&mut self, (generation, append, result): FetchResult) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Dropping stale list response");
            return;
        }
        let search = self.query.clone();
        self.state.send_modify(|state| match result {
            Ok(page) => {
                if append {
                    state.dogs.extend(page.dogs);
                } else {
                    state.dogs = page.dogs;
                    state.search = search;
                }
                state.next_token = page.next_token;
                state.error = None;
            }
            Err(e) => state.error = Some(e),
        });
    }

    fn publish_progress(&self) {
        let idle = self.debounce.is_none() && self.inflight.is_empty();
        let received = self.received;
        self.state.send_if_modified(|state| {
            let settled = if idle { received } else { state.settled };
            let changed = state.loading == idle || state.settled != settled;
            state.loading = !idle;
            state.settled = settled;
            changed
        });
    }
}

fn debounce_elapsed(sleep: &mut Option<Pin<Box<Sleep>>>) -> impl Future<Output = ()> + '_ {
    async move {
        match sleep {
            Some(s) => s.as_mut().await,
            None => std::future::pending().await,
        }
    }
}
