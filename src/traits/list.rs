//! List trait for fetching pages of resources.

use async_trait::async_trait;

use crate::client::GtrClient;
use crate::error::Result;
use crate::paging::{PaginationParams, MAX_PAGE_SIZE};
use crate::resources::{Resource, ResourceList};

/// Maximum pages to walk (safety limit).
const MAX_PAGES: u32 = 10_000;

/// List resources page by page.
///
/// # Example
///
/// ```ignore
/// use gtrclient::{GtrClient, List, PaginationParams, Project};
///
/// let client = GtrClient::from_env()?;
///
/// // Fetch a single page
/// let mut page = Project::list(&client, PaginationParams::new(Some(1), Some(50))).await?;
/// page.next_page().await?;
///
/// // Fetch all pages
/// let all_projects = Project::list_all(&client, None).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Fetch one page of the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn list(client: &GtrClient, params: PaginationParams) -> Result<ResourceList<Self>>;

    /// Fetch every page and collect all items.
    ///
    /// `page_size` defaults to the largest size the server accepts.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &GtrClient, page_size: Option<u32>) -> Result<Vec<Self>>;
}

#[async_trait]
impl<R: Resource> List for R {
    async fn list(client: &GtrClient, params: PaginationParams) -> Result<ResourceList<Self>> {
        let url = client.list_url(R::PATH);
        let fetched = client.fetch(&url, params).await?;
        ResourceList::from_fetch(client, url, fetched)
    }

    async fn list_all(client: &GtrClient, page_size: Option<u32>) -> Result<Vec<Self>> {
        let params = PaginationParams::new(Some(1), Some(page_size.unwrap_or(MAX_PAGE_SIZE)));
        let mut list = Self::list(client, params).await?;

        let mut all_items = list.items()?;
        let mut pages = 1;
        while list.next_page().await? {
            all_items.extend(list.items()?);
            pages += 1;

            // Safety limit to prevent infinite loops
            if pages >= MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
        }

        Ok(all_items)
    }
}
