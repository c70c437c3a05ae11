// src/lib.rs

use std::sync::Arc;

use config::Config;
use services::{bucket_cache::BucketCache, features::Dataset, stopwords::StopwordSet};

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub buckets: BucketCache,
    pub stopwords: Arc<StopwordSet>,
}

impl AppState {
    pub fn new(dataset: Dataset, stopwords: StopwordSet, config: &Config) -> Self {
        let dataset = Arc::new(dataset);
        Self {
            buckets: BucketCache::new(Arc::clone(&dataset), config.bucket_cache_ttl_secs),
            dataset,
            stopwords: Arc::new(stopwords),
        }
    }
}

pub mod config;
pub mod error;
pub mod routes;

pub mod services {
    pub mod loader;
    pub mod features;
    pub mod selection;
    pub mod variables;
    pub mod resampler;
    pub mod metrics;
    pub mod distribution;
    pub mod profiler;
    pub mod keywords;
    pub mod stopwords;
    pub mod export;
    pub mod bucket_cache;
}

pub mod models {
    pub mod common;
    pub mod dataset;
    pub mod stats;
    pub mod series;
    pub mod cycles;
    pub mod performance;
    pub mod text;
}

pub mod handlers {
    pub mod common;
    pub mod dataset;
    pub mod stats;
    pub mod series;
    pub mod cycles;
    pub mod performance;
    pub mod text;
}
