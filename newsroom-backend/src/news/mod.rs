pub mod aggregator;
pub mod provider;

#[cfg(test)]
pub mod stub;

pub use aggregator::NewsAggregator;
pub use provider::{NewsApiClient, NewsProvider};
