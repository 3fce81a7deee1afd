//! Runs a [`ListController`]'s fetches on the tokio runtime.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinSet;

use crate::error::Result;
use crate::notice::Notice;

use super::controller::{FetchRequest, ListController};
use super::filters::FilterSet;
use super::ListSource;

/// A list controller wired to its fetch adapter.
///
/// Each state change spawns one fetch; results land through
/// [`ListController::complete`], so late responses for superseded requests
/// are dropped. Dropping a `LiveList` aborts every fetch still in flight.
pub struct LiveList<T, F, S> {
    controller: Arc<Mutex<ListController<T, F>>>,
    source: Arc<S>,
    tasks: JoinSet<()>,
}

impl<T, F, S> LiveList<T, F, S>
where
    T: Send + 'static,
    F: FilterSet,
    S: ListSource<T, F> + 'static,
{
    pub fn new(source: S, controller: ListController<T, F>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            source: Arc::new(source),
            tasks: JoinSet::new(),
        }
    }

    /// Issue the initial fetch.
    pub fn start(&mut self) {
        let request = self.controller.lock().start();
        self.dispatch(request);
    }

    /// Apply a state change and dispatch the fetch it produced, if any.
    /// Returns whether a fetch was dispatched.
    pub fn update<R>(&mut self, change: impl FnOnce(&mut ListController<T, F>) -> R) -> bool
    where
        R: Into<Option<FetchRequest<F>>>,
    {
        let request = change(&mut self.controller.lock()).into();
        match request {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Like [`update`](Self::update) for changes that validate their input.
    pub fn try_update<R>(
        &mut self,
        change: impl FnOnce(&mut ListController<T, F>) -> Result<R>,
    ) -> Result<bool>
    where
        R: Into<Option<FetchRequest<F>>>,
    {
        let request = change(&mut self.controller.lock())?.into();
        Ok(match request {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        })
    }

    fn dispatch(&mut self, request: FetchRequest<F>) {
        let source = Arc::clone(&self.source);
        let controller = Arc::clone(&self.controller);
        self.tasks.spawn(async move {
            let result = source.fetch(&request.query).await;
            controller.lock().complete(request.generation, result);
        });
    }

    /// Wait until every dispatched fetch has finished.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    tracing::error!(error = %e, "list fetch task panicked");
                }
            }
        }
    }

    /// Read the controller state.
    pub fn with<R>(&self, read: impl FnOnce(&ListController<T, F>) -> R) -> R {
        read(&self.controller.lock())
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.controller.lock().take_notices()
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }
}

impl<T, F, S> Drop for LiveList<T, F, S> {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(count = self.tasks.len(), "aborting in-flight list fetches");
            self.tasks.abort_all();
        }
    }
}
