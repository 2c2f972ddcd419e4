//! Producer trait and factory

use crate::producer::config::{ProducerConfig, ProducerKind};
use crate::producer::engine::RecordProducer;
use crate::producer::error::{ConfigError, ConfigResult, ProduceResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface of every publishing strategy
#[async_trait]
pub trait Producer: Send + Sync {
    /// Begin accepting records. Idempotent.
    async fn start(&self);

    /// Publish one record and wait for its outcome
    async fn produce(&self, partition_key: &str, payload: &[u8]) -> ProduceResult<()>;

    /// Stop accepting records and wait for in-flight work. Idempotent.
    async fn stop(&self);
}

#[async_trait]
impl Producer for RecordProducer {
    async fn start(&self) {
        RecordProducer::start(self).await
    }

    async fn produce(&self, partition_key: &str, payload: &[u8]) -> ProduceResult<()> {
        RecordProducer::produce(self, partition_key, payload).await
    }

    async fn stop(&self) {
        RecordProducer::stop(self).await
    }
}

/// Build the producer selected by `config.settings.kind`
pub fn create_producer(config: ProducerConfig) -> ConfigResult<Arc<dyn Producer>> {
    match config.settings.kind {
        ProducerKind::Record => Ok(Arc::new(RecordProducer::new(config)?)),
        ProducerKind::Batch => {
            // Surface a missing stream before the unsupported kind
            config.settings.with_defaults()?;
            Err(ConfigError::NotImplemented {
                kind: ProducerKind::Batch.to_string(),
            })
        }
    }
}
