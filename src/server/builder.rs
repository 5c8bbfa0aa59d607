//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use super::registry::{RecordDescriptor, ResourceRegistry};
use crate::config::SyndicationConfig;
use crate::core::events::EventBus;
use crate::core::store::RecordStore;
use crate::core::token::{OsTokenIssuer, TokenIssuer};
use crate::records::{syndication_in_service, syndication_out_service};
use crate::storage::InMemoryRecordStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder wiring the record store, token issuer and event bus into a server
///
/// Both syndication resources are always registered. Without explicit
/// components the builder uses an [`InMemoryRecordStore`] and an
/// [`OsTokenIssuer`] with default length, and publishes no events.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_store(InMemoryRecordStore::new())
///     .with_event_bus(EventBus::new(1024))
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn RecordStore>>,
    token_issuer: Option<Arc<dyn TokenIssuer>>,
    custom_routes: Vec<Router>,
    event_bus: Option<EventBus>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            token_issuer: None,
            custom_routes: Vec::new(),
            event_bus: None,
        }
    }

    /// Builder with the issuer and event bus described by `config`
    pub fn from_config(config: &SyndicationConfig) -> Result<Self> {
        let issuer = config.token_issuer()?;
        Ok(Self::new()
            .with_token_issuer(issuer)
            .with_event_bus(config.event_bus()))
    }

    /// Set the record store
    pub fn with_store(mut self, store: impl RecordStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set the issuer generating outbound tokens
    pub fn with_token_issuer(mut self, issuer: impl TokenIssuer + 'static) -> Self {
        self.token_issuer = Some(Arc::new(issuer));
        self
    }

    /// Add routes that don't fit the resource pattern
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Publish mutation events on `event_bus`
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<ServerHost> {
        let store: Arc<dyn RecordStore> = match self.store.take() {
            Some(store) => store,
            None => Arc::new(InMemoryRecordStore::new()),
        };
        let issuer: Arc<dyn TokenIssuer> = match self.token_issuer.take() {
            Some(issuer) => issuer,
            None => Arc::new(OsTokenIssuer::new()),
        };

        let mut outbound = syndication_out_service(store.clone(), issuer)?;
        let mut inbound = syndication_in_service(store)?;
        if let Some(bus) = &self.event_bus {
            outbound = outbound.with_event_bus(bus.clone());
            inbound = inbound.with_event_bus(bus.clone());
        }

        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(RecordDescriptor::new(outbound.clone())));
        registry.register(Box::new(RecordDescriptor::new(inbound.clone())));

        tracing::info!(resources = ?registry.collections(), "resources registered");

        Ok(ServerHost::from_builder_components(
            outbound,
            inbound,
            registry,
            self.event_bus.take(),
        ))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        Ok(RestExposure::build_router(host, custom_routes))
    }

    /// Serve the application with graceful shutdown on SIGTERM or Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
