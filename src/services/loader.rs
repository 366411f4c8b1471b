use std::fmt;
use std::path::PathBuf;

use log::{debug, error, info};
use serde::de::DeserializeOwned;

use crate::errors::PageError;
use crate::types::{BookmarkFolder, ShortcutFile, ShortcutMap};

/// Location of a static document
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Url(reqwest::Url),
    File(PathBuf),
}

impl Source {
    /// `http://` and `https://` locations are fetched, anything else is a file path
    pub fn parse(location: &str) -> Result<Self, PageError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = reqwest::Url::parse(location)
                .map_err(|e| PageError::Parse(format!("invalid document URL {location}: {e}")))?;
            Ok(Source::Url(url))
        } else {
            Ok(Source::File(PathBuf::from(location)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches and parses the small documents behind each page
#[derive(Clone)]
pub struct DataLoader {
    client: reqwest::Client,
}

impl DataLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Raw document text; no caching, no retries
    pub async fn load_text(&self, source: &Source) -> Result<String, PageError> {
        debug!("Loading document from {}", source);
        let text = match source {
            Source::Url(url) => {
                let response = self.client.get(url.clone()).send().await.map_err(|e| {
                    error!("Failed to fetch {}: {}", url, e);
                    PageError::Fetch(e.to_string())
                })?;
                let status = response.status();
                if !status.is_success() {
                    error!("Fetching {} returned {}", url, status);
                    return Err(PageError::Fetch(format!("{} returned {}", url, status)));
                }
                response.text().await.map_err(|e| PageError::Fetch(e.to_string()))?
            }
            Source::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                error!("Failed to read {:?}: {}", path, e);
                PageError::Fetch(format!("{}: {}", path.display(), e))
            })?,
        };
        info!("Loaded {} ({} bytes)", source, text.len());
        Ok(text)
    }

    pub async fn load_yaml<T: DeserializeOwned>(&self, source: &Source) -> Result<T, PageError> {
        let text = self.load_text(source).await?;
        serde_yaml::from_str(&text).map_err(|e| {
            error!("Malformed YAML in {}: {}", source, e);
            PageError::Parse(format!("{}: {}", source, e))
        })
    }

    pub async fn load_bookmarks(&self, source: &Source) -> Result<Vec<BookmarkFolder>, PageError> {
        // An empty document is an empty directory
        let folders: Option<Vec<BookmarkFolder>> = self.load_yaml(source).await?;
        Ok(folders.unwrap_or_default())
    }

    pub async fn load_shortcuts(&self, source: &Source) -> Result<ShortcutMap, PageError> {
        let file: Option<ShortcutFile> = self.load_yaml(source).await?;
        Ok(file.map(|f| f.shortcuts).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture(name: &str) -> Source {
        Source::File(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name))
    }

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert!(matches!(Source::parse("https://example.com/data.yaml").unwrap(), Source::Url(_)));
        assert_eq!(
            Source::parse("data/bookmarks.yaml").unwrap(),
            Source::File(PathBuf::from("data/bookmarks.yaml"))
        );
    }

    #[tokio::test]
    async fn loads_bookmark_folders_in_order() {
        let loader = DataLoader::new(reqwest::Client::new());
        let folders = loader.load_bookmarks(&fixture("bookmarks.yaml")).await.unwrap();
        let names: Vec<&str> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Daily", "Development"]);
        assert_eq!(folders[1].links[0].title, "GitHub");
    }

    #[tokio::test]
    async fn loads_shortcut_map() {
        let loader = DataLoader::new(reqwest::Client::new());
        let shortcuts = loader.load_shortcuts(&fixture("shortcuts.yaml")).await.unwrap();
        assert_eq!(shortcuts.get("foo").map(String::as_str), Some("https://example.com"));
    }

    #[tokio::test]
    async fn malformed_yaml_is_a_parse_error() {
        let loader = DataLoader::new(reqwest::Client::new());
        let err = loader.load_bookmarks(&fixture("malformed.yaml")).await.unwrap_err();
        assert!(matches!(err, PageError::Parse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let loader = DataLoader::new(reqwest::Client::new());
        let err = loader.load_bookmarks(&fixture("nope.yaml")).await.unwrap_err();
        assert!(matches!(err, PageError::Fetch(_)), "{err:?}");
    }
}
