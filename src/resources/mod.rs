//! Format-agnostic resource facades.
//!
//! A facade owns a client handle and a decoder, and delegates every
//! accessor to the decoder. Related resources are built through the
//! client's decoder factory, so a lead organisation cut out of a project
//! behaves exactly like one fetched on its own.

mod list;
mod organisation;
mod person;
mod project;
mod publication;

use std::fmt;

use crate::client::GtrClient;
use crate::decoder::{Field, Relation, ResourceDecoder, ResourceKind};
use crate::error::{GtrError, Result};
use crate::format::Body;
use crate::paging::{PaginationParams, Paging};

pub use list::{IterOptions, ListIter, ResourceList};
pub use organisation::Organisation;
pub use person::Person;
pub use project::Project;
pub use publication::Publication;

/// A page of projects.
pub type Projects = ResourceList<Project>;
/// A page of organisations.
pub type Organisations = ResourceList<Organisation>;
/// A page of people.
pub type People = ResourceList<Person>;
/// A page of publications.
pub type Publications = ResourceList<Publication>;

/// A native resource type with its own endpoint.
pub trait Resource: Sized + Send + fmt::Debug {
    /// Kind of a single resource.
    const KIND: ResourceKind;
    /// Kind of a page of these resources.
    const LIST_KIND: ResourceKind;
    /// Path segment under the API root.
    const PATH: &'static str;

    #[doc(hidden)]
    fn from_core(core: ResourceCore) -> Self;
}

/// State shared by every facade: the client, the URL the resource came
/// from (if fetched on its own), its decoder and the paging headers that
/// came with it.
#[derive(Debug)]
pub struct ResourceCore {
    client: GtrClient,
    url: Option<String>,
    decoder: Box<dyn ResourceDecoder>,
    paging: Option<Paging>,
}

impl ResourceCore {
    fn field(&self, field: Field) -> Option<String> {
        self.decoder.field(field)
    }

    fn related<R: Resource>(&self, relation: Relation) -> Result<Vec<R>> {
        build_all(&self.client, self.decoder.subresources(relation))
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn render(&self) -> Result<String> {
        self.decoder.render()
    }

    fn paging(&self) -> Option<&Paging> {
        self.paging.as_ref()
    }

    /// Re-request the resource by id and swap in the fresh decoder and
    /// paging.
    async fn refetch(&mut self, kind: ResourceKind, path: &str) -> Result<()> {
        let id = self.field(Field::Id).ok_or(GtrError::MissingId { kind })?;
        let url = self.client.item_url(path, &id);

        self.load(kind, &url, PaginationParams::default()).await?;
        self.url = Some(url);
        Ok(())
    }

    /// Move to the page a cursor points at.
    async fn follow(
        &mut self,
        kind: ResourceKind,
        cursor: impl Fn(&Paging) -> Option<&str>,
    ) -> Result<bool> {
        let Some(target) = list::cursor_target(self.paging(), cursor) else {
            return Ok(false);
        };
        self.load(kind, &target, PaginationParams::default()).await?;
        Ok(true)
    }

    /// Re-request this resource's URL at another page.
    async fn skip_to_page(&mut self, kind: ResourceKind, page: u32) -> Result<bool> {
        let (Some(url), Some(params)) = (self.url.clone(), list::page_params(self.paging(), page))
        else {
            return Ok(false);
        };
        self.load(kind, &url, params).await?;
        Ok(true)
    }

    async fn load(
        &mut self,
        kind: ResourceKind,
        url: &str,
        params: PaginationParams,
    ) -> Result<()> {
        let fetched = self.client.fetch(url, params).await?;
        let decoder = self.client.decoder(kind, fetched.body)?;

        self.decoder = decoder;
        self.paging = fetched.paging;
        Ok(())
    }
}

/// Build a facade from a body, failing if the client cannot decode it.
pub(crate) fn build<R: Resource>(
    client: &GtrClient,
    url: Option<String>,
    body: Body,
    paging: Option<Paging>,
) -> Result<R> {
    let decoder = client.decoder(R::KIND, body)?;
    Ok(R::from_core(ResourceCore {
        client: client.clone(),
        url,
        decoder,
        paging,
    }))
}

pub(crate) fn build_all<R: Resource>(client: &GtrClient, bodies: Vec<Body>) -> Result<Vec<R>> {
    bodies
        .into_iter()
        .map(|body| build(client, None, body, None))
        .collect()
}

/// Fetch a single resource by id.
pub(crate) async fn get<R: Resource>(client: &GtrClient, id: &str) -> Result<R> {
    let url = client.item_url(R::PATH, id);
    let fetched = client.fetch(&url, PaginationParams::default()).await?;
    build(client, Some(url), fetched.body, fetched.paging)
}
