//! CERIF facades.

use super::{CerifClient, CerifEndpoint};
use crate::decoder::{Field, Relation, ResourceDecoder, ResourceKind};
use crate::error::{GtrError, Result};
use crate::format::Body;
use crate::paging::PaginationParams;

/// A project in CERIF form.
#[derive(Debug)]
pub struct CerifProject {
    client: CerifClient,
    url: Option<String>,
    decoder: Box<dyn ResourceDecoder>,
}

impl CerifProject {
    pub(crate) fn build(client: &CerifClient, url: Option<String>, body: Body) -> Result<Self> {
        Ok(Self {
            client: client.clone(),
            url,
            decoder: client.decoder(ResourceKind::CerifProject, body)?,
        })
    }

    pub fn id(&self) -> Option<String> {
        self.decoder.field(Field::Id)
    }

    /// Links from the project to its organisation units.
    pub fn org_relations(&self) -> Result<Vec<CerifRelation>> {
        relations(&self.client, self.decoder.as_ref(), Relation::OrgUnits)
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn render(&self) -> Result<String> {
        self.decoder.render()
    }

    /// Re-fetch the project by id, refreshing this value in place.
    pub async fn fetch(&mut self) -> Result<()> {
        let kind = ResourceKind::CerifProject;
        let id = self.id().ok_or(GtrError::MissingId { kind })?;
        let url = self.client.url_for(CerifEndpoint::Project, Some(&id));

        let fetched = self.client.client().fetch(&url, PaginationParams::default()).await?;
        let decoder = self.client.decoder(kind, fetched.body)?;

        self.decoder = decoder;
        self.url = Some(url);
        Ok(())
    }
}

/// A classified link between two CERIF entities.
#[derive(Debug)]
pub struct CerifRelation {
    client: CerifClient,
    decoder: Box<dyn ResourceDecoder>,
}

impl CerifRelation {
    pub(crate) fn build(client: &CerifClient, body: Body) -> Result<Self> {
        Ok(Self {
            client: client.clone(),
            decoder: client.decoder(ResourceKind::CerifRelation, body)?,
        })
    }

    /// Qualified name of the relation, e.g.
    /// `{urn:xmlns:org:eurocris:cerif-1.5-1}cfProj_OrgUnit`.
    pub fn name(&self) -> Option<String> {
        self.decoder.field(Field::RelationName)
    }

    pub fn class_scheme_id(&self) -> Option<String> {
        self.decoder.field(Field::ClassSchemeId)
    }

    pub fn class_id(&self) -> Option<String> {
        self.decoder.field(Field::ClassId)
    }

    pub fn value(&self) -> Option<String> {
        self.decoder.field(Field::Value)
    }

    /// Resolve the relation's class through the client's class cache.
    pub async fn class(&self) -> Result<Option<CerifClass>> {
        match self.class_id() {
            Some(id) => self.client.cerif_class(&id).await,
            None => Ok(None),
        }
    }

    pub fn render(&self) -> Result<String> {
        self.decoder.render()
    }
}

/// A CERIF class definition.
#[derive(Debug)]
pub struct CerifClass {
    client: CerifClient,
    decoder: Box<dyn ResourceDecoder>,
}

impl CerifClass {
    pub(crate) fn build(client: &CerifClient, body: Body) -> Result<Self> {
        Ok(Self {
            client: client.clone(),
            decoder: client.decoder(ResourceKind::CerifClass, body)?,
        })
    }

    pub fn id(&self) -> Option<String> {
        self.decoder.field(Field::Id)
    }

    pub fn class_scheme_id(&self) -> Option<String> {
        self.decoder.field(Field::ClassSchemeId)
    }

    /// The class's term entries.
    pub fn term_relations(&self) -> Result<Vec<CerifRelation>> {
        relations(&self.client, self.decoder.as_ref(), Relation::Terms)
    }

    pub fn render(&self) -> Result<String> {
        self.decoder.render()
    }
}

fn relations(
    client: &CerifClient,
    decoder: &dyn ResourceDecoder,
    relation: Relation,
) -> Result<Vec<CerifRelation>> {
    decoder
        .subresources(relation)
        .into_iter()
        .map(|body| CerifRelation::build(client, body))
        .collect()
}
