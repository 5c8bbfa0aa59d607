//! Per-resource lifecycle hooks
//!
//! A [`ResourceService`](crate::core::service::ResourceService) runs its hooks
//! on the caller's documents before handing them to the store. Hooks mutate
//! documents in place and never persist anything themselves; an error from a
//! hook aborts the whole operation.

use crate::core::entity::Document;
use crate::core::error::SyndicationResult;

/// Hooks invoked by a resource service around store writes
///
/// Every method defaults to a no-op, so implementors override only the
/// lifecycle steps they care about.
pub trait ResourceHooks: Send + Sync {
    /// Called with the whole batch before it is created
    fn on_create(&self, _docs: &mut [Document]) -> SyndicationResult<()> {
        Ok(())
    }

    /// Called before a partial update is applied to `original`
    fn on_update(&self, _updates: &mut Document, _original: &Document) -> SyndicationResult<()> {
        Ok(())
    }

    /// Called before `original` is replaced by `doc`
    fn on_replace(&self, _doc: &mut Document, _original: &Document) -> SyndicationResult<()> {
        Ok(())
    }
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ResourceHooks for NoHooks {}
