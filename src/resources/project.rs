//! Project facade.

use chrono::NaiveDate;

use super::{Organisation, Person, Resource, ResourceCore};
use crate::decoder::{Field, Relation, ResourceKind};
use crate::error::Result;

/// A GtR project.
///
/// Projects are the central record of the API: a grant with its funding,
/// its lead research organisation, partner organisations and people.
/// Any scalar may be missing from live data.
#[derive(Debug)]
pub struct Project {
    core: ResourceCore,
}

impl Resource for Project {
    const KIND: ResourceKind = ResourceKind::Project;
    const LIST_KIND: ResourceKind = ResourceKind::Projects;
    const PATH: &'static str = "project";

    fn from_core(core: ResourceCore) -> Self {
        Self { core }
    }
}

impl Project {
    pub fn id(&self) -> Option<String> {
        self.core.field(Field::Id)
    }

    pub fn title(&self) -> Option<String> {
        self.core.field(Field::Title)
    }

    /// Funding start date as published.
    pub fn start(&self) -> Option<String> {
        self.core.field(Field::Start)
    }

    /// Funding end date as published.
    pub fn end(&self) -> Option<String> {
        self.core.field(Field::End)
    }

    pub fn status(&self) -> Option<String> {
        self.core.field(Field::Status)
    }

    pub fn abstract_text(&self) -> Option<String> {
        self.core.field(Field::Abstract)
    }

    /// Name of the funding body.
    pub fn funder(&self) -> Option<String> {
        self.core.field(Field::Funder)
    }

    /// Funding amount in pounds, as published.
    pub fn value(&self) -> Option<String> {
        self.core.field(Field::Value)
    }

    /// Grant category, e.g. "Research Grant".
    pub fn category(&self) -> Option<String> {
        self.core.field(Field::Category)
    }

    /// Grant reference, e.g. "NE/H012345/1".
    pub fn reference(&self) -> Option<String> {
        self.core.field(Field::Reference)
    }

    /// Funding start date, if it parses as a date.
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.start()?)
    }

    /// Funding end date, if it parses as a date.
    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_date(&self.end()?)
    }

    /// Funding amount in pounds, if it parses as a number.
    pub fn value_pounds(&self) -> Option<f64> {
        self.value()?.trim().parse().ok()
    }

    /// The lead research organisation.
    pub fn lead_organisation(&self) -> Result<Option<Organisation>> {
        Ok(self
            .core
            .related(Relation::LeadOrganisation)?
            .into_iter()
            .next())
    }

    /// Every organisation involved in the project.
    pub fn organisations(&self) -> Result<Vec<Organisation>> {
        self.core.related(Relation::Organisations)
    }

    /// People working on the project.
    pub fn people(&self) -> Result<Vec<Person>> {
        self.core.related(Relation::People)
    }

    /// Collaborating organisations.
    pub fn collaborators(&self) -> Result<Vec<Organisation>> {
        self.core.related(Relation::Collaborators)
    }

    /// The URL this project was fetched from, if fetched on its own.
    pub fn url(&self) -> Option<&str> {
        self.core.url()
    }

    /// The underlying document as text.
    pub fn render(&self) -> Result<String> {
        self.core.render()
    }

    /// Re-fetch the project by id, refreshing this value in place.
    pub async fn fetch(&mut self) -> Result<()> {
        self.core.refetch(Self::KIND, Self::PATH).await
    }
}

/// Parse the `YYYY-MM-DD` prefix of a published date (`2010-10-01Z`,
/// `2010-10-01T00:00:00Z`).
fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim().get(..10)?, "%Y-%m-%d").ok()
}
