use std::collections::BTreeMap;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::llm::BackendRegistry;
use crate::services::{DataLoader, SearchApi};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub loader: DataLoader,
    pub search: Arc<dyn SearchApi>,
    pub backends: Arc<BackendRegistry>,
}

/// A named group of bookmarks
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookmarkFolder {
    pub name: String,
    #[serde(default)]
    pub links: Vec<Bookmark>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
    /// Either an image location or a literal glyph
    #[serde(default)]
    pub icon: Option<String>,
}

/// Path name to destination URL
pub type ShortcutMap = BTreeMap<String, String>;

/// Shape of the shortcut data file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortcutFile {
    #[serde(default)]
    pub shortcuts: ShortcutMap,
}

/// Search API payload, replaced wholesale on every query
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchResult {
    pub search_parameters: SearchParameters,
    pub organic_results: Vec<OrganicResult>,
    pub top_stories: Option<Vec<TopStory>>,
    pub related_questions: Option<Vec<RelatedQuestion>>,
    pub related_searches: Option<Vec<RelatedSearch>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchParameters {
    pub q: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrganicResult {
    pub position: u32,
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub displayed_link: String,
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TopStory {
    pub title: String,
    pub link: String,
    pub source: String,
    pub date: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelatedQuestion {
    pub question: String,
    pub snippet: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub displayed_link: Option<String>,
    pub source_logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelatedSearch {
    pub query: String,
    pub link: Option<String>,
}

impl SearchResult {
    pub fn has_organic_results(&self) -> bool {
        !self.organic_results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_tolerates_missing_sections() {
        let json = r#"{
            "search_parameters": { "q": "cats" },
            "organic_results": [
                { "position": 1, "title": "Cat", "link": "https://en.wikipedia.org/wiki/Cat",
                  "displayed_link": "en.wikipedia.org", "snippet": "The cat is a small carnivore." }
            ],
            "related_searches": [ { "query": "cat breeds" } ]
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.search_parameters.q, "cats");
        assert_eq!(result.organic_results[0].favicon, None);
        assert!(result.top_stories.is_none());
        assert!(result.related_questions.is_none());
        assert_eq!(result.related_searches.unwrap()[0].query, "cat breeds");
    }

    #[test]
    fn bookmark_icon_is_optional() {
        let yaml = "- name: Dev\n  links:\n    - title: GitHub\n      url: https://github.com\n    - title: Rust\n      url: https://rust-lang.org\n      icon: \"🦀\"\n";
        let folders: Vec<BookmarkFolder> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(folders[0].links[0].icon, None);
        assert_eq!(folders[0].links[1].icon.as_deref(), Some("🦀"));
    }
}
