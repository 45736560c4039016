//! Publication facade.

use super::{Resource, ResourceCore};
use crate::decoder::{Field, ResourceKind};
use crate::error::Result;

/// A research publication.
#[derive(Debug)]
pub struct Publication {
    core: ResourceCore,
}

impl Resource for Publication {
    const KIND: ResourceKind = ResourceKind::Publication;
    const LIST_KIND: ResourceKind = ResourceKind::Publications;
    const PATH: &'static str = "publication";

    fn from_core(core: ResourceCore) -> Self {
        Self { core }
    }
}

impl Publication {
    pub fn id(&self) -> Option<String> {
        self.core.field(Field::Id)
    }

    pub fn title(&self) -> Option<String> {
        self.core.field(Field::Title)
    }

    pub fn url(&self) -> Option<&str> {
        self.core.url()
    }

    pub fn render(&self) -> Result<String> {
        self.core.render()
    }

    /// Re-fetch the publication by id, refreshing this value in place.
    pub async fn fetch(&mut self) -> Result<()> {
        self.core.refetch(Self::KIND, Self::PATH).await
    }
}
