use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod cache;
mod config;
mod controllers;
mod error;
mod gateway;
mod http;
mod identity;
mod news;
mod rate_limit;
mod store;

use cache::ResponseCache;
use config::Config;
use gateway::EventBroadcaster;
use news::{NewsAggregator, NewsApiClient, NewsProvider};
use rate_limit::RateLimiter;
use store::{CommentStore, MetadataStore};

pub struct AppState {
    pub config: Config,
    pub aggregator: Arc<NewsAggregator>,
    pub metadata: Arc<MetadataStore>,
    pub comments: Arc<CommentStore>,
    pub broadcaster: Arc<EventBroadcaster>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wire stores, cache, limiter and aggregator around `provider`.
    /// The data directory must already exist.
    pub fn new(config: Config, provider: Arc<dyn NewsProvider>) -> Self {
        let broadcaster = Arc::new(EventBroadcaster::new());
        let metadata = Arc::new(MetadataStore::open(
            &config.articles_meta_file(),
            broadcaster.clone(),
        ));
        let comments = Arc::new(CommentStore::open(
            &config.comments_file(),
            broadcaster.clone(),
        ));
        let aggregator = Arc::new(NewsAggregator::new(
            provider,
            config.newsapi_key.clone(),
            ResponseCache::new(config.cache_ttl),
            metadata.clone(),
        ));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window,
        ));

        Self {
            config,
            aggregator,
            metadata,
            comments,
            broadcaster,
            rate_limiter,
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let port = config.port;

    std::fs::create_dir_all(&config.data_dir)?;
    log::info!("Using data directory {}", config.data_dir.display());

    if config.newsapi_key.is_some() {
        log::info!("News provider configured at {}", config.newsapi_base_url);
    } else {
        log::warn!("NEWSAPI_KEY not set; /api/news will return a configuration error");
    }

    let provider: Arc<dyn NewsProvider> = Arc::new(NewsApiClient::new(&config.newsapi_base_url));
    let state = web::Data::new(AppState::new(config, provider));

    // Keep the limiter map from accumulating one-off callers
    let limiter = state.rate_limiter.clone();
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(limiter.window().max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            let removed = limiter.purge_expired();
            if removed > 0 {
                log::debug!("Purged {} expired rate limit window(s)", removed);
            }
        }
    });

    log::info!("Starting newsroom backend on port {}", port);
    log::info!("Live updates on ws://0.0.0.0:{}/ws", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
