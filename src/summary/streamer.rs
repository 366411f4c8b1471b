use std::sync::Arc;

use futures::StreamExt;
use log::{debug, error, info, warn};
use tokio::task::JoinHandle;

use super::prompt;
use super::state::{SessionId, SummaryState};
use super::SummaryConfig;
use crate::errors::PageError;
use crate::llm::BackendRegistry;
use crate::store::Store;
use crate::types::SearchResult;

/// State that carries a summary region
pub trait HasSummary {
    fn summary_mut(&mut self) -> &mut SummaryState;
}

impl HasSummary for SummaryState {
    fn summary_mut(&mut self) -> &mut SummaryState {
        self
    }
}

/// Streams a backend's answer for one search result into the store
#[derive(Clone)]
pub struct SummaryStreamer {
    backends: Arc<BackendRegistry>,
    config: SummaryConfig,
}

impl SummaryStreamer {
    pub fn new(backends: Arc<BackendRegistry>, config: SummaryConfig) -> Self {
        Self { backends, config }
    }

    pub fn spawn<S>(&self, store: Store<S>, session: SessionId, result: SearchResult) -> JoinHandle<()>
    where
        S: HasSummary + Clone + Send + Sync + 'static,
    {
        let streamer = self.clone();
        tokio::spawn(async move { streamer.run(store, session, result).await })
    }

    /// Build the prompt, stream deltas, and mark the session finished
    pub async fn run<S>(&self, store: Store<S>, session: SessionId, result: SearchResult)
    where
        S: HasSummary + Clone + Send + Sync + 'static,
    {
        let model = self.config.model.as_str();
        let backend = match self.backends.select(model) {
            Ok(backend) => backend,
            Err(err) => {
                error!("Cannot summarize: {}", err);
                let notice = format!("**{}**", err);
                store.update(|s| s.summary_mut().set_unavailable(session, notice));
                return;
            }
        };

        let prompt = prompt::build(&result, &self.config);
        debug!("Summary prompt for session {}:\n{}", session, prompt.user.content);

        if !store.update(|s| s.summary_mut().begin(session)) {
            debug!("Session {} superseded before streaming", session);
            return;
        }

        let mut deltas = match backend.stream_chat(&prompt.system, &prompt.user).await {
            Ok(deltas) => deltas,
            Err(err) => {
                error!("Summary stream for '{}' failed to start: {}", result.search_parameters.q, err);
                store.update(|s| s.summary_mut().fail(session, err.to_string()));
                return;
            }
        };

        let mut chunks = 0usize;
        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(text) => {
                    if !store.update(|s| s.summary_mut().append(session, &text)) {
                        // Dropping the stream closes the upstream connection
                        info!("Session {} is stale, discarding the rest of its stream", session);
                        return;
                    }
                    chunks += 1;
                }
                Err(err) => {
                    warn!("Summary stream interrupted after {} chunks: {}", chunks, err);
                    store.update(|s| s.summary_mut().fail(session, interrupted(&err)));
                    return;
                }
            }
        }

        if store.update(|s| s.summary_mut().finish(session)) {
            info!("Summary session {} finished after {} chunks via {}", session, chunks, backend.model());
        }
    }
}

fn interrupted(err: &PageError) -> String {
    format!("summary interrupted: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatBackend, ChatMessage, DeltaStream};
    use crate::summary::SummaryStatus;
    use crate::types::{OrganicResult, SearchParameters};
    use async_trait::async_trait;
    use futures::stream;

    struct Scripted(Vec<Result<&'static str, &'static str>>);

    #[async_trait]
    impl ChatBackend for Scripted {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn stream_chat(&self, _: &ChatMessage, _: &ChatMessage) -> Result<DeltaStream, PageError> {
            let items: Vec<Result<String, PageError>> = self
                .0
                .iter()
                .map(|item| match item {
                    Ok(text) => Ok(text.to_string()),
                    Err(e) => Err(PageError::Fetch(e.to_string())),
                })
                .collect();
            Ok(Box::pin(stream::iter(items)))
        }
    }

    fn result() -> SearchResult {
        SearchResult {
            search_parameters: SearchParameters { q: "cats".to_string() },
            organic_results: vec![OrganicResult { position: 1, title: "Cat".to_string(), ..Default::default() }],
            ..Default::default()
        }
    }

    fn streamer(model: &str, script: Vec<Result<&'static str, &'static str>>) -> SummaryStreamer {
        let mut registry = BackendRegistry::new();
        registry.register("scripted", Arc::new(Scripted(script)));
        let config = SummaryConfig { model: model.to_string(), ..SummaryConfig::default() };
        SummaryStreamer::new(Arc::new(registry), config)
    }

    #[tokio::test]
    async fn accumulates_deltas_and_finishes() {
        let store = Store::new(SummaryState::default());
        let session = store.update(|s| s.reset());
        streamer("scripted", vec![Ok("Cats "), Ok("are "), Ok("great.")])
            .run(store.clone(), session, result())
            .await;
        let state = store.snapshot();
        assert_eq!(state.text(), "Cats are great.");
        assert_eq!(state.status(), &SummaryStatus::Done);
    }

    #[tokio::test]
    async fn unknown_model_renders_notice() {
        let store = Store::new(SummaryState::default());
        let session = store.update(|s| s.reset());
        streamer("gpt-5", vec![]).run(store.clone(), session, result()).await;
        let state = store.snapshot();
        assert_eq!(state.text(), "**unknown model: gpt-5**");
        assert_eq!(state.status(), &SummaryStatus::Unavailable);
    }

    #[tokio::test]
    async fn mid_stream_failure_is_surfaced() {
        let store = Store::new(SummaryState::default());
        let session = store.update(|s| s.reset());
        streamer("scripted", vec![Ok("partial"), Err("connection reset")])
            .run(store.clone(), session, result())
            .await;
        let state = store.snapshot();
        assert_eq!(state.text(), "partial");
        match state.status() {
            SummaryStatus::Failed(reason) => assert!(reason.contains("connection reset")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn superseded_session_writes_nothing() {
        let store = Store::new(SummaryState::default());
        let stale = store.update(|s| s.reset());
        store.update(|s| s.reset());
        streamer("scripted", vec![Ok("old text")]).run(store.clone(), stale, result()).await;
        let state = store.snapshot();
        assert_eq!(state.text(), "");
        assert_eq!(state.status(), &SummaryStatus::Idle);
    }
}
