use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Upstream credential. `None` when unset or empty.
    pub newsapi_key: Option<String>,
    pub newsapi_base_url: String,
    pub data_dir: PathBuf,
    pub cache_ttl: Duration,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; `from_env` reads the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        Ok(Self {
            port: parse_var(&lookup, "PORT", 3000)?,
            newsapi_key: lookup("NEWSAPI_KEY").filter(|k| !k.trim().is_empty()),
            newsapi_base_url: lookup("NEWSAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NEWSAPI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            data_dir: PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "./data".to_string())),
            cache_ttl: Duration::from_secs(parse_var(&lookup, "NEWS_CACHE_TTL_SECS", 30)?),
            rate_limit_max_requests: parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS", 40)?,
            rate_limit_window: Duration::from_secs(parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS", 60)?),
        })
    }

    pub fn comments_file(&self) -> PathBuf {
        self.data_dir.join("comments.json")
    }

    pub fn articles_meta_file(&self) -> PathBuf {
        self.data_dir.join("articles.json")
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, String> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a valid number, got '{}'", name, raw)),
        None => Ok(default),
    }
}
