//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::GtrClient;
use crate::error::Result;
use crate::resources::{self, Resource};

/// Fetch a single resource by id.
///
/// # Example
///
/// ```ignore
/// use gtrclient::{Get, GtrClient, Project};
///
/// let client = GtrClient::from_env()?;
/// let project = Project::get(&client, "0D2C6B1C-6D1A-4A0B-9C3E-1F2A3B4C5D6E".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The id type for this resource.
    type Id;

    /// Fetch the resource by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with
    /// anything but 200, or the body cannot be decoded.
    async fn get(client: &GtrClient, id: Self::Id) -> Result<Self>;
}

#[async_trait]
impl<R: Resource> Get for R {
    type Id = String;

    async fn get(client: &GtrClient, id: String) -> Result<Self> {
        resources::get(client, &id).await
    }
}
