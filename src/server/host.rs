//! Server host holding the wired services
//!
//! The host is transport-agnostic: it owns the two syndication services
//! (sharing one record store) and the resource registry. An exposure (currently
//! REST) turns it into a router.

use crate::core::events::EventBus;
use crate::records::{SyndicationInService, SyndicationOutService};
use crate::server::registry::ResourceRegistry;

/// Host context containing all service state
pub struct ServerHost {
    /// Outbound links, with token assignment on creation
    pub outbound: SyndicationOutService,

    /// Inbound links
    pub inbound: SyndicationInService,

    /// Registered resources and their routes
    pub registry: ResourceRegistry,

    /// Bus receiving mutation events, when enabled
    pub event_bus: Option<EventBus>,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(
        outbound: SyndicationOutService,
        inbound: SyndicationInService,
        registry: ResourceRegistry,
        event_bus: Option<EventBus>,
    ) -> Self {
        Self {
            outbound,
            inbound,
            registry,
            event_bus,
        }
    }

    /// Collections exposed by this host
    pub fn collections(&self) -> Vec<&str> {
        self.registry.collections()
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }
}
