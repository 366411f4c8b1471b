use std::time::Duration;

use log::{debug, info};

use crate::config::{Config, DEFAULT_REDIRECT_DELAY_MS};
use crate::types::ShortcutMap;
use crate::utils::leading_segment;

/// Where the browser goes next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Replace the current page right away
    Immediate(String),
    /// Show a notice, then go to `url`
    Delayed { url: String, after: Duration },
}

/// Resolves a request path against the shortcut table
#[derive(Debug, Clone)]
pub struct Redirector {
    fallback: String,
    delay: Duration,
}

impl Default for Redirector {
    fn default() -> Self {
        Self {
            fallback: "/".to_string(),
            delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
        }
    }
}

impl Redirector {
    pub fn new(fallback: impl Into<String>, delay: Duration) -> Self {
        Self { fallback: fallback.into(), delay }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fallback_url.clone(), config.redirect_delay())
    }

    /// Only the first path segment is looked up; the rest is ignored
    pub fn resolve(&self, shortcuts: &ShortcutMap, path: &str) -> Navigation {
        let key = leading_segment(path);
        match shortcuts.get(key) {
            Some(url) => {
                info!("Shortcut '{}' -> {}", key, url);
                Navigation::Immediate(url.clone())
            }
            None => {
                debug!("No shortcut for '{}', falling back to {}", key, self.fallback);
                Navigation::Delayed {
                    url: self.fallback.clone(),
                    after: self.delay,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortcuts() -> ShortcutMap {
        ShortcutMap::from([("foo".to_string(), "https://example.com".to_string())])
    }

    #[test]
    fn known_shortcut_navigates_immediately() {
        let navigation = Redirector::default().resolve(&shortcuts(), "/foo");
        assert_eq!(navigation, Navigation::Immediate("https://example.com".to_string()));
    }

    #[test]
    fn trailing_segments_are_ignored() {
        let navigation = Redirector::default().resolve(&shortcuts(), "/foo/bar/baz");
        assert_eq!(navigation, Navigation::Immediate("https://example.com".to_string()));
    }

    #[test]
    fn unknown_shortcut_falls_back_after_delay() {
        let navigation = Redirector::default().resolve(&shortcuts(), "/unknown");
        assert_eq!(
            navigation,
            Navigation::Delayed { url: "/".to_string(), after: Duration::from_millis(3000) }
        );
    }

    #[test]
    fn empty_path_is_a_miss() {
        assert!(matches!(
            Redirector::default().resolve(&shortcuts(), "/"),
            Navigation::Delayed { .. }
        ));
    }
}
