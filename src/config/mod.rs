use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5004;
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SEARCH_URL: &str = "https://api.lsong.org/search";
pub const DEFAULT_OPENAI_API: &str = "https://api.openai.com/v1";
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 3000;

/// Application configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "signpost", about = "Bookmarks, search and shortcut pages", version)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "SIGNPOST_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "SIGNPOST_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding css, js and the html shell.
    #[arg(long, env = "SIGNPOST_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Bookmark YAML document, a file path or an http(s) URL.
    #[arg(long, env = "SIGNPOST_BOOKMARKS", default_value = "data/bookmarks.yaml")]
    pub bookmarks: String,

    /// Shortcut YAML document, a file path or an http(s) URL.
    #[arg(long, env = "SIGNPOST_SHORTCUTS", default_value = "data/shortcuts.yaml")]
    pub shortcuts: String,

    /// Search endpoint, queried as `<url>?q=<query>`.
    #[arg(long, env = "SIGNPOST_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_url: String,

    /// Base URL of the OpenAI-compatible chat API.
    #[arg(long, env = "SIGNPOST_OPENAI_API", default_value = DEFAULT_OPENAI_API)]
    pub openai_api: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Ollama gateway serving the local model.
    #[arg(long, env = "SIGNPOST_OLLAMA_HOST", default_value = DEFAULT_OLLAMA_HOST)]
    pub ollama_host: String,

    /// Model used when the page does not pass `model`.
    #[arg(long, env = "SIGNPOST_MODEL", default_value = DEFAULT_MODEL)]
    pub default_model: String,

    /// Where unknown shortcuts end up.
    #[arg(long, env = "SIGNPOST_FALLBACK_URL", default_value = "/")]
    pub fallback_url: String,

    #[arg(long, env = "SIGNPOST_REDIRECT_DELAY_MS", default_value_t = DEFAULT_REDIRECT_DELAY_MS)]
    pub redirect_delay_ms: u64,

    /// Include related questions in the summary prompt.
    #[arg(long, env = "SIGNPOST_RELATED_QUESTIONS")]
    pub related_questions: bool,

    /// External page that continues the conversation after a summary.
    #[arg(long, env = "SIGNPOST_CONTINUATION_URL")]
    pub continuation_url: Option<String>,
}

impl Config {
    /// Get the socket address for binding
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        let ip = self
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0]));
        std::net::SocketAddr::new(ip, self.port)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
            bookmarks: "data/bookmarks.yaml".to_string(),
            shortcuts: "data/shortcuts.yaml".to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            openai_api: DEFAULT_OPENAI_API.to_string(),
            openai_api_key: None,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            fallback_url: "/".to_string(),
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            related_questions: false,
            continuation_url: None,
        }
    }
}
