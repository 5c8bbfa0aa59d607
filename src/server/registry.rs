//! Resource registry for managing resource descriptors and generating routes

use crate::core::entity::Record;
use crate::core::service::ResourceService;
use crate::server::handlers::{
    create_records, delete_record, get_record, list_records, replace_record, update_record,
};
use axum::Router;
use axum::routing::get;
use indexmap::IndexMap;

/// Trait that describes how to build routes for a resource
pub trait ResourceDescriptor: Send + Sync {
    /// Collection name, used as the URL segment (e.g., "syndication_out")
    fn collection(&self) -> &str;

    /// Build the routes for this resource:
    /// - GET|POST /{collection}
    /// - GET|PATCH|PUT|DELETE /{collection}/{id}
    fn build_routes(&self) -> Router;
}

/// Descriptor exposing a [`ResourceService`] with the generic handlers
pub struct RecordDescriptor<T: Record> {
    service: ResourceService<T>,
}

impl<T: Record> RecordDescriptor<T> {
    pub fn new(service: ResourceService<T>) -> Self {
        Self { service }
    }
}

impl<T: Record> ResourceDescriptor for RecordDescriptor<T> {
    fn collection(&self) -> &str {
        T::collection_name()
    }

    fn build_routes(&self) -> Router {
        let collection = T::collection_name();
        Router::new()
            .route(
                &format!("/{}", collection),
                get(list_records::<T>).post(create_records::<T>),
            )
            .route(
                &format!("/{}/{{id}}", collection),
                get(get_record::<T>)
                    .patch(update_record::<T>)
                    .put(replace_record::<T>)
                    .delete(delete_record::<T>),
            )
            .with_state(self.service.clone())
    }
}

/// Registry for all resources exposed by the server
#[derive(Default)]
pub struct ResourceRegistry {
    descriptors: IndexMap<String, Box<dyn ResourceDescriptor>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; a second descriptor for the same collection
    /// replaces the first
    pub fn register(&mut self, descriptor: Box<dyn ResourceDescriptor>) {
        let collection = descriptor.collection().to_string();
        self.descriptors.insert(collection, descriptor);
    }

    /// Merge the routes of every registered resource
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered collection names, in registration order
    pub fn collections(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
