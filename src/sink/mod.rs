pub mod backend;
pub mod dry_run;

use async_trait::async_trait;

use crate::types::CanonicalListing;

/// Destination for normalized listings.
#[async_trait]
pub trait ListingSink: Send + Sync {
    /// Deliver one listing. Failures are reported by the sink and surface
    /// here only as `false`.
    async fn forward(&self, listing: &CanonicalListing) -> bool;
}

pub use backend::BackendSink;
pub use dry_run::DryRunSink;
