//! Organisation facade.

use super::{Project, Resource, ResourceCore};
use crate::decoder::{Field, Relation, ResourceKind};
use crate::error::Result;
use crate::paging::Paging;

/// A research organisation.
///
/// An organisation fetched on its own is paged: its overview lists one
/// page of projects at a time, and the navigation methods move through
/// those pages the same way [`ResourceList`](super::ResourceList) does.
#[derive(Debug)]
pub struct Organisation {
    core: ResourceCore,
}

impl Resource for Organisation {
    const KIND: ResourceKind = ResourceKind::Organisation;
    const LIST_KIND: ResourceKind = ResourceKind::Organisations;
    const PATH: &'static str = "organisation";

    fn from_core(core: ResourceCore) -> Self {
        Self { core }
    }
}

impl Organisation {
    pub fn id(&self) -> Option<String> {
        self.core.field(Field::Id)
    }

    pub fn name(&self) -> Option<String> {
        self.core.field(Field::Name)
    }

    /// Projects listed in the organisation overview.
    ///
    /// Embedded organisations (a project's lead, partners, collaborators)
    /// carry no projects until fetched.
    pub fn projects(&self) -> Result<Vec<Project>> {
        self.core.related(Relation::Projects)
    }

    pub fn url(&self) -> Option<&str> {
        self.core.url()
    }

    pub fn render(&self) -> Result<String> {
        self.core.render()
    }

    /// Paging state of the project list, if the server sent any.
    pub fn paging(&self) -> Option<&Paging> {
        self.core.paging()
    }

    pub fn record_count(&self) -> Option<u64> {
        self.paging().map(|p| p.record_count)
    }

    pub fn pages(&self) -> Option<u32> {
        self.paging().map(|p| p.pages)
    }

    pub fn current_page(&self) -> Option<u32> {
        self.paging().and_then(Paging::current_page)
    }

    pub fn current_page_size(&self) -> Option<u32> {
        self.paging().and_then(Paging::current_page_size)
    }

    pub async fn next_page(&mut self) -> Result<bool> {
        self.core.follow(Self::KIND, |p| p.next.as_deref()).await
    }

    pub async fn previous_page(&mut self) -> Result<bool> {
        self.core.follow(Self::KIND, |p| p.previous.as_deref()).await
    }

    pub async fn first_page(&mut self) -> Result<bool> {
        self.core.follow(Self::KIND, |p| p.first.as_deref()).await
    }

    pub async fn last_page(&mut self) -> Result<bool> {
        self.core.follow(Self::KIND, |p| p.last.as_deref()).await
    }

    /// Jump to page `page` of the project list, keeping the page size.
    ///
    /// Returns `Ok(false)` unless `1 <= page <= pages` and the organisation
    /// was fetched on its own.
    pub async fn skip_to_page(&mut self, page: u32) -> Result<bool> {
        self.core.skip_to_page(Self::KIND, page).await
    }

    /// Re-fetch the organisation by id, refreshing this value and its
    /// paging in place.
    pub async fn fetch(&mut self) -> Result<()> {
        self.core.refetch(Self::KIND, Self::PATH).await
    }
}
