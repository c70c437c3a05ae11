//! Cached full-history resamples, one entry per time scale.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::services::features::Dataset;
use crate::services::resampler::{AggregationSpec, Bucket, TimeScale, resample};

#[derive(Clone)]
pub struct BucketCache {
    dataset: Arc<Dataset>,
    cache: Cache<TimeScale, Arc<Vec<Bucket>>>,
}

impl BucketCache {
    pub fn new(dataset: Arc<Dataset>, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(4) // One per time scale
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { dataset, cache }
    }

    /// Buckets for the whole dataset at `scale`, computed on first use.
    pub async fn buckets(&self, scale: TimeScale) -> Result<Arc<Vec<Bucket>>, String> {
        let dataset = Arc::clone(&self.dataset);
        self.cache
            .try_get_with(scale, async move {
                let buckets = tokio::task::spawn_blocking(move || {
                    resample(dataset.rows(), scale, &AggregationSpec::default())
                })
                .await?;
                info!(scale = scale.as_str(), buckets = buckets.len(), "Cached resampled series");
                Ok::<_, tokio::task::JoinError>(Arc::new(buckets))
            })
            .await
            .map_err(|e| format!("Resampling failed: {}", e))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }
}
