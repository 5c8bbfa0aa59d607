//! Syndication server demo
//!
//! Seeds one outbound and one inbound link, logs every mutation event and
//! serves both resources over REST.
//!
//! ```text
//! cargo run --example syndication_server [config.yaml]
//!
//! curl -X POST localhost:3000/syndication_out \
//!   -H 'content-type: application/json' \
//!   -d '{"blog_id":"…","consumer_id":"…","consumer_blog_id":"…"}'
//! ```

use anyhow::Result;
use syndication::prelude::*;

const DEFAULT_CONFIG: &str = "demos/syndication_server/config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = SyndicationConfig::from_yaml_file(&path)?;
    init_tracing(&config.logging)?;

    let store = InMemoryRecordStore::new();
    let bus = config.event_bus();
    let shared: Arc<dyn RecordStore> = Arc::new(store.clone());

    // Seed data through the same store the server uses
    let outbound = syndication_out_service(shared.clone(), Arc::new(config.token_issuer()?))?;
    let inbound = syndication_in_service(shared)?;

    let link = outbound
        .create_one(&NewSyndicationOut::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        ))
        .await?;
    tracing::info!(id = %link.id, "seeded outbound link");

    let producer_link = inbound
        .create_one(&NewSyndicationIn {
            blog_id: Uuid::new_v4(),
            blog_token: generate_token()?,
            producer_id: Uuid::new_v4(),
            producer_blog_id: Uuid::new_v4(),
        })
        .await?;
    tracing::info!(id = %producer_link.id, "seeded inbound link");

    tokio::spawn(log_events(bus.subscribe()));

    ServerBuilder::from_config(&config)?
        .with_store(store)
        .with_event_bus(bus)
        .serve(&config.bind_address())
        .await
}
