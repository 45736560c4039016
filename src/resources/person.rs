//! Person facade.

use super::{Project, Resource, ResourceCore};
use crate::decoder::{Field, Relation, ResourceKind};
use crate::error::Result;

/// A researcher.
#[derive(Debug)]
pub struct Person {
    core: ResourceCore,
}

impl Resource for Person {
    const KIND: ResourceKind = ResourceKind::Person;
    const LIST_KIND: ResourceKind = ResourceKind::People;
    const PATH: &'static str = "person";

    fn from_core(core: ResourceCore) -> Self {
        Self { core }
    }
}

impl Person {
    pub fn id(&self) -> Option<String> {
        self.core.field(Field::Id)
    }

    pub fn name(&self) -> Option<String> {
        self.core.field(Field::Name)
    }

    /// Projects this person works on.
    pub fn projects(&self) -> Result<Vec<Project>> {
        self.core.related(Relation::Projects)
    }

    pub fn url(&self) -> Option<&str> {
        self.core.url()
    }

    pub fn render(&self) -> Result<String> {
        self.core.render()
    }

    /// Re-fetch the person by id, refreshing this value in place.
    pub async fn fetch(&mut self) -> Result<()> {
        self.core.refetch(Self::KIND, Self::PATH).await
    }
}
