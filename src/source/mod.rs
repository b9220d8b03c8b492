pub mod opensea;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::ListingPage;

/// Upstream provider of paginated sell listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of listings, continuing from `cursor` when given.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ListingPage, FetchError>;
}

pub use opensea::OpenSeaListings;
