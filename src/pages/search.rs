use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::errors::PageError;
use crate::services::SearchApi;
use crate::store::Store;
use crate::summary::{HasSummary, SummaryState, SummaryStreamer};
use crate::types::SearchResult;
use crate::utils::replace_query_param;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Everything the search page renders from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// Address-bar query string after the last search
    pub location: String,
    pub phase: Phase,
    pub result: Option<SearchResult>,
    pub error: Option<String>,
    pub summary: SummaryState,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// No further updates are expected for the current search
    pub fn is_settled(&self) -> bool {
        match self.phase {
            Phase::Idle | Phase::Loading => false,
            Phase::Failed => true,
            Phase::Loaded => {
                let streams = self.result.as_ref().is_some_and(SearchResult::has_organic_results);
                !streams || self.summary.is_finished()
            }
        }
    }
}

impl HasSummary for SearchState {
    fn summary_mut(&mut self) -> &mut SummaryState {
        &mut self.summary
    }
}

/// One search page: orchestrates the query, its result and its summary
pub struct SearchApp {
    api: Arc<dyn SearchApi>,
    streamer: SummaryStreamer,
    base_query: String,
    store: Store<SearchState>,
}

impl SearchApp {
    /// `base_query` is the page's current query string, kept when `q` is replaced
    pub fn new(api: Arc<dyn SearchApi>, streamer: SummaryStreamer, base_query: impl Into<String>) -> Self {
        Self {
            api,
            streamer,
            base_query: base_query.into(),
            store: Store::new(SearchState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> SearchState {
        self.store.snapshot()
    }

    /// Run one search; returns the summary task when one was started
    pub async fn search(&self, query: &str) -> Result<Option<JoinHandle<()>>, PageError> {
        let location = replace_query_param(&self.base_query, "q", query);
        let session = self.store.update(|s| {
            s.query = query.to_string();
            s.location = location;
            s.phase = Phase::Loading;
            s.result = None;
            s.error = None;
            s.summary.reset()
        });
        info!("Search session {} started for '{}'", session, query);

        let result = match self.api.search(query).await {
            Ok(result) => result,
            Err(err) => {
                warn!("Search for '{}' failed: {}", query, err);
                let message = err.to_string();
                self.store.update(|s| {
                    if s.summary.is_current(session) {
                        s.phase = Phase::Failed;
                        s.error = Some(message);
                    }
                });
                return Err(err);
            }
        };

        let applied = self.store.update(|s| {
            if !s.summary.is_current(session) {
                return false;
            }
            s.result = Some(result.clone());
            s.phase = Phase::Loaded;
            true
        });
        if !applied {
            debug!("Discarding result of superseded session {}", session);
            return Ok(None);
        }

        if !result.has_organic_results() {
            debug!("No organic results for '{}', skipping summary", query);
            return Ok(None);
        }
        Ok(Some(self.streamer.spawn(self.store.clone(), session, result)))
    }
}
