//! List View Controllers
//!
//! Per-resource view state for paged lists: the current page of items, the
//! loading flag, and a generation counter that makes out-of-order fetch
//! completions harmless. Navigating or re-filtering supersedes in-flight
//! fetches logically — their results are discarded on arrival rather than
//! cancelled on the wire.

use crate::error::GatewayError;
use crate::gateway::Page;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Snapshot of a paged list view
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub loading: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: 0,
            total: 0,
            loading: false,
        }
    }
}

/// View-state holder for one resource list
pub struct ListController<T: Clone> {
    state: Mutex<ListState<T>>,
    feed: watch::Sender<ListState<T>>,
    generation: AtomicU64,
}

impl<T: Clone> ListController<T> {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(ListState::default());
        Self {
            state: Mutex::new(ListState::default()),
            feed,
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> ListState<T> {
        self.state.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.feed.subscribe()
    }

    /// Start a fetch: supersedes every earlier in-flight fetch and marks the
    /// view loading. Returns the tag `commit`/`fail` must present.
    pub fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock();
        state.loading = true;
        self.feed.send_replace(state.clone());
        generation
    }

    /// Replace the view wholesale with a fetched page — unless a newer fetch
    /// has since begun, in which case the result is stale and dropped.
    pub fn commit(&self, generation: u64, page: Page<T>) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale fetch result (generation {})", generation);
            return false;
        }
        let mut state = self.state.lock();
        state.items = page.items;
        state.page = page.page;
        state.page_size = page.page_size;
        state.total = page.total;
        state.loading = false;
        self.feed.send_replace(state.clone());
        true
    }

    /// Clear the loading flag after a failed fetch, if still current
    pub fn fail(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        let mut state = self.state.lock();
        state.loading = false;
        self.feed.send_replace(state.clone());
    }

    /// Run one fetch through the begin/commit cycle. `Ok(false)` means the
    /// result arrived stale and was discarded.
    pub async fn load<F>(&self, fetch: F) -> Result<bool, GatewayError>
    where
        F: Future<Output = Result<Page<T>, GatewayError>>,
    {
        let generation = self.begin();
        match fetch.await {
            Ok(page) => Ok(self.commit(generation, page)),
            Err(e) => {
                self.fail(generation);
                Err(e)
            }
        }
    }

    /// Optimistic local edit after a successful mutation. The next full
    /// fetch replaces the list wholesale; this never becomes a second source
    /// of truth.
    pub fn patch<F>(&self, apply: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut state = self.state.lock();
        apply(&mut state.items);
        self.feed.send_replace(state.clone());
    }
}

impl<T: Clone> Default for ListController<T> {
    fn default() -> Self {
        Self::new()
    }
}
