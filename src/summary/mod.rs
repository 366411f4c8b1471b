//! Streamed language-model overview of a search result.

pub mod prompt;
pub mod state;
pub mod streamer;

pub use prompt::{build as build_prompt, result_anchor, Prompt};
pub use state::{SessionId, SummaryState, SummaryStatus};
pub use streamer::{HasSummary, SummaryStreamer};

use crate::config::{Config, DEFAULT_MODEL};

/// Per-page summary settings, fixed when the streamer is constructed
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryConfig {
    pub model: String,
    /// Output language; `None` answers in the language of the query
    pub lang: Option<String>,
    pub include_related_questions: bool,
    pub continuation_url: Option<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            lang: None,
            include_related_questions: false,
            continuation_url: None,
        }
    }
}

impl SummaryConfig {
    /// Server configuration overridden by the page's `model` and `lang` parameters
    pub fn from_request(config: &Config, model: Option<&str>, lang: Option<&str>) -> Self {
        let non_empty = |value: Option<&str>| value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        Self {
            model: non_empty(model).unwrap_or_else(|| config.default_model.clone()),
            lang: non_empty(lang),
            include_related_questions: config.related_questions,
            continuation_url: config.continuation_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parameters_override_configuration() {
        let config = Config { related_questions: true, ..Config::default() };
        let summary = SummaryConfig::from_request(&config, Some("qwen2"), Some("中文"));
        assert_eq!(summary.model, "qwen2");
        assert_eq!(summary.lang.as_deref(), Some("中文"));
        assert!(summary.include_related_questions);

        let fallback = SummaryConfig::from_request(&config, Some(""), None);
        assert_eq!(fallback.model, "gpt-3.5-turbo");
        assert_eq!(fallback.lang, None);
    }
}
