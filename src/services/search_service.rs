use async_trait::async_trait;
use log::{debug, error, info};

use crate::errors::PageError;
use crate::types::SearchResult;

/// Remote search capability used by the search page
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResult, PageError>;
}

/// Client for the JSON search endpoint
#[derive(Clone)]
pub struct SearchService {
    client: reqwest::Client,
    endpoint: String,
}

impl SearchService {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    /// `<endpoint>?q=<encoded query>`
    pub fn request_url(&self, query: &str) -> Result<reqwest::Url, PageError> {
        reqwest::Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map_err(|e| PageError::Parse(format!("invalid search endpoint {}: {}", self.endpoint, e)))
    }
}

#[async_trait]
impl SearchApi for SearchService {
    async fn search(&self, query: &str) -> Result<SearchResult, PageError> {
        let url = self.request_url(query)?;
        info!("Searching for '{}'", query);
        let start_time = std::time::Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Search request failed: {}", e);
            PageError::Fetch(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            error!("Search endpoint returned {}", status);
            return Err(PageError::Fetch(format!("search endpoint returned {}", status)));
        }
        let body = response.bytes().await.map_err(|e| PageError::Fetch(e.to_string()))?;
        let result: SearchResult = serde_json::from_slice(&body)?;

        debug!(
            "Search for '{}' returned {} organic results in {}ms",
            query,
            result.organic_results.len(),
            start_time.elapsed().as_millis()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_url_encoded() {
        let service = SearchService::new(reqwest::Client::new(), "https://api.example.com/search");
        let url = service.request_url("cats & dogs").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/search?q=cats+%26+dogs");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, [("q".to_string(), "cats & dogs".to_string())]);
    }

    #[test]
    fn bad_endpoint_is_reported() {
        let service = SearchService::new(reqwest::Client::new(), "not a url");
        assert!(matches!(service.request_url("x"), Err(PageError::Parse(_))));
    }
}
