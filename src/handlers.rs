use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path as AxumPath, RawQuery, State},
    http::{header, HeaderValue, Response, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
};
use futures::Stream;
use tokio::task::JoinHandle;

use crate::components::search::{render_regions, search_page, RegionCache};
use crate::components::shortcuts::{delayed_navigation, load_error as shortcuts_error, not_found, redirect_notice};
use crate::components::{PageContext, TemplateComponent};
use crate::errors::PageError;
use crate::pages::{BookmarksState, Navigation, Phase, Redirector, SearchApp, SearchState};
use crate::services::{MarkdownService, Source};
use crate::summary::{SummaryConfig, SummaryStreamer};
use crate::types::{AppState, ShortcutMap};
use crate::utils::{content_type_for, encode_query, is_contained, leading_segment, normalize_path, parse_query};

const SEARCH_SCRIPT: &str = "/static/js/search.js";

/// Query parameters of a search page, decoded
struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    fn parse(raw: Option<String>) -> Self {
        Self { pairs: parse_query(&raw.unwrap_or_default()) }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    fn query(&self) -> &str {
        self.get("q").map(str::trim).unwrap_or("")
    }

    /// The page's own query string, the base for later `q` replacements
    fn location(&self) -> String {
        if self.pairs.is_empty() {
            String::new()
        } else {
            encode_query(&self.pairs)
        }
    }
}

/// Handle the bookmarks directory at `/`
pub async fn handle_bookmarks(State(state): State<AppState>) -> Result<impl IntoResponse, PageError> {
    log::info!("Bookmarks request received");
    let source = Source::parse(&state.config.bookmarks)?;
    let page = BookmarksState::load(&state.loader, &source).await;
    let status = match page {
        BookmarksState::Loaded(_) => StatusCode::OK,
        BookmarksState::Failed(_) => StatusCode::BAD_GATEWAY,
    };

    let templates = TemplateComponent::new(state.config.static_dir.clone());
    let html = templates.render(&PageContext {
        title: "Bookmarks".to_string(),
        content: page.view().to_html(),
        ..Default::default()
    });
    Ok((status, Html(html)))
}

/// Handle the search page shell; results arrive over `/search/events`
pub async fn handle_search_page(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> impl IntoResponse {
    let params = SearchParams::parse(raw);
    let query = params.query();
    log::info!("Search page request received for query: '{}'", query);

    let title = if query.is_empty() { "Search".to_string() } else { format!("{} - Search", query) };
    let content = search_page(query, params.get("lang"), params.get("model"));
    let templates = TemplateComponent::new(state.config.static_dir.clone());
    Html(templates.render(&PageContext {
        title,
        content: content.to_html(),
        loading: !query.is_empty(),
        scripts: vec![SEARCH_SCRIPT],
        ..Default::default()
    }))
}

/// Aborts a background task when its owner goes away
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run one search and stream its page regions as Server-Sent Events
pub async fn handle_search_events(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, PageError> {
    let params = SearchParams::parse(raw);
    let query = params.query().to_string();
    if query.is_empty() {
        log::warn!("Search events requested without a query");
        return Err(PageError::BadRequest("missing query parameter 'q'".to_string()));
    }
    log::info!("Search events request received for query: '{}'", query);

    let summary = SummaryConfig::from_request(&state.config, params.get("model"), params.get("lang"));
    log::debug!("Summary model '{}', lang {:?}", summary.model, summary.lang);
    let streamer = SummaryStreamer::new(state.backends.clone(), summary.clone());
    let app = Arc::new(SearchApp::new(state.search.clone(), streamer, params.location()));
    let mut updates = app.subscribe();

    let stream = async_stream::stream! {
        // Dropping the guard when the client disconnects cancels the search and its summary
        let _search = {
            let app = app.clone();
            let query = query.clone();
            AbortOnDrop(tokio::spawn(async move {
                if let Ok(Some(summary)) = app.search(&query).await {
                    let mut summary = AbortOnDrop(summary);
                    let _ = (&mut summary.0).await;
                }
            }))
        };
        let markdown = MarkdownService::new();
        let mut cache = RegionCache::default();
        let mut shown = SearchState::default();
        // The search page shell renders with the indicator visible
        let mut indicator = true;

        loop {
            let current = updates.borrow_and_update().clone();
            if current.location != shown.location && !current.location.is_empty() {
                yield Ok(Event::default().event("location").data(current.location.clone()));
            }
            // Idle is the moment before the search task starts; leave the indicator as the shell drew it
            if current.phase != Phase::Idle && current.is_loading() != indicator {
                indicator = current.is_loading();
                yield Ok(Event::default().event("loading").data(indicator.to_string()));
            }
            for region in cache.reconcile(render_regions(&current, &summary, &markdown)) {
                let payload = serde_json::json!({ "id": region.name, "html": region.html });
                yield Ok(Event::default().event("region").data(payload.to_string()));
            }
            let settled = current.is_settled();
            shown = current;
            if settled || updates.changed().await.is_err() {
                break;
            }
        }
        log::debug!("Search events for '{}' complete", shown.query);
        yield Ok(Event::default().event("close").data("done"));
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Serve files below the static directory
pub async fn handle_static(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<impl IntoResponse, PageError> {
    let normalized = normalize_path(&path);
    if !is_contained(Path::new(&normalized)) {
        log::warn!("Rejected static path '{}'", path);
        return Err(PageError::InvalidPath);
    }
    let requested = state.config.static_dir.join(&normalized);

    let bytes = match tokio::fs::read(&requested).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PageError::NotFound(format!("/static/{}", normalized)));
        }
        Err(e) => return Err(PageError::from(e)),
    };
    let content_type = content_type_for(&requested);
    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    Ok(resp)
}

async fn load_shortcut_map(state: &AppState) -> Result<ShortcutMap, PageError> {
    let source = Source::parse(&state.config.shortcuts)?;
    state.loader.load_shortcuts(&source).await
}

/// Resolve `/<name>/...` against the shortcut table
pub async fn handle_shortcut(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, PageError> {
    log::info!("Shortcut request received: '{}'", path);
    let templates = TemplateComponent::new(state.config.static_dir.clone());
    let shortcuts = match load_shortcut_map(&state).await {
        Ok(shortcuts) => shortcuts,
        Err(err) => {
            log::warn!("Shortcuts unavailable: {}", err);
            let page = templates.render(&PageContext {
                title: "Shortcuts unavailable".to_string(),
                content: shortcuts_error(&err.to_string()).to_html(),
                ..Default::default()
            });
            return Ok((err.status(), Html(page)).into_response());
        }
    };

    match Redirector::from_config(&state.config).resolve(&shortcuts, &path) {
        Navigation::Immediate(url) => {
            let location = HeaderValue::from_str(&url)
                .map_err(|_| PageError::BadRequest(format!("shortcut target is not a valid URL: {}", url)))?;
            let page = templates.render(&PageContext {
                title: "Redirecting".to_string(),
                content: redirect_notice(&url).to_html(),
                ..Default::default()
            });
            Ok((StatusCode::FOUND, [(header::LOCATION, location)], Html(page)).into_response())
        }
        Navigation::Delayed { url, after } => {
            let name = leading_segment(&path);
            let page = templates.render(&PageContext {
                title: "Not Found".to_string(),
                content: not_found(name, &url, after).to_html(),
                head: delayed_navigation(&url, after),
                ..Default::default()
            });
            Ok((StatusCode::NOT_FOUND, Html(page)).into_response())
        }
    }
}
