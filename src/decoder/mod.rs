//! Format-specific decoders for GtR resources.
//!
//! Every resource kind can be read from either serialisation, but the two
//! wire shapes have nothing in common: XML documents are walked with
//! child-axis paths, JSON records with key paths. A [`ResourceDecoder`]
//! hides that difference behind field and relation lookups, and the
//! [`DecoderFactory`] picks the implementation for a client's
//! serialisation.

mod json;
mod xml;

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::format::{Body, Serialisation};

pub(crate) use json::JsonDecoder;
pub(crate) use xml::XmlDecoder;

/// The kinds of resource a decoder can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Projects,
    Organisation,
    Organisations,
    Person,
    People,
    Publication,
    Publications,
    CerifProject,
    CerifRelation,
    CerifClass,
    CerifClasses,
}

impl ResourceKind {
    /// A human-readable name for messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Projects => "project list",
            Self::Organisation => "organisation",
            Self::Organisations => "organisation list",
            Self::Person => "person",
            Self::People => "person list",
            Self::Publication => "publication",
            Self::Publications => "publication list",
            Self::CerifProject => "CERIF project",
            Self::CerifRelation => "CERIF relation",
            Self::CerifClass => "CERIF class",
            Self::CerifClasses => "CERIF class list",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar fields a decoder can extract.
///
/// Which fields exist depends on the resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Title,
    Name,
    Start,
    End,
    Status,
    Abstract,
    Funder,
    Value,
    Category,
    Reference,
    ClassId,
    ClassSchemeId,
    RelationName,
}

/// Sub-resources a decoder can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The members of a list resource.
    Items,
    LeadOrganisation,
    Organisations,
    People,
    Collaborators,
    Projects,
    /// CERIF project to organisation-unit links.
    OrgUnits,
    /// CERIF class terms.
    Terms,
}

/// Reads fields and sub-resources out of one decoded body.
///
/// Absent fields are `None` and absent relations are empty; neither is an
/// error, since live records routinely omit funding, abstracts and end
/// dates. Sub-resource bodies come back in the envelope their own decoder
/// expects, indistinguishable from a standalone fetch.
pub trait ResourceDecoder: fmt::Debug + Send + Sync {
    /// The resource kind this decoder reads.
    fn kind(&self) -> ResourceKind;

    /// The serialisation of the underlying body.
    fn serialisation(&self) -> Serialisation;

    /// Extract a scalar field as text.
    fn field(&self, field: Field) -> Option<String>;

    /// Extract the bodies of related resources.
    fn subresources(&self, relation: Relation) -> Vec<Body>;

    /// Render the underlying document.
    fn render(&self) -> Result<String>;
}

/// Which decoder family and schema reads a resource kind.
#[derive(Debug, Clone, Copy)]
enum DecoderSpec {
    Xml(&'static xml::XmlSchema),
    Json(&'static json::JsonSchema),
}

impl DecoderSpec {
    fn build(self, kind: ResourceKind, body: Body) -> Option<Box<dyn ResourceDecoder>> {
        match (self, body) {
            (Self::Xml(schema), Body::Xml(root)) => {
                Some(Box::new(XmlDecoder::new(kind, schema, root)))
            }
            (Self::Json(schema), Body::Json(root)) => {
                Some(Box::new(JsonDecoder::new(kind, schema, root)))
            }
            _ => None,
        }
    }
}

/// Maps `(serialisation, resource kind)` to a decoder.
///
/// Combinations without an entry are unsupported: [`DecoderFactory::decoder`]
/// returns `None` and callers report [`crate::GtrError::Unsupported`].
#[derive(Debug, Clone)]
pub struct DecoderFactory {
    class_map: HashMap<Serialisation, HashMap<ResourceKind, DecoderSpec>>,
}

impl DecoderFactory {
    /// Decoders for the native API, available in both serialisations.
    pub fn native() -> Self {
        let xml = HashMap::from([
            (ResourceKind::Projects, DecoderSpec::Xml(&xml::PROJECTS)),
            (ResourceKind::Project, DecoderSpec::Xml(&xml::PROJECT)),
            (ResourceKind::Organisations, DecoderSpec::Xml(&xml::ORGANISATIONS)),
            (ResourceKind::Organisation, DecoderSpec::Xml(&xml::ORGANISATION)),
            (ResourceKind::People, DecoderSpec::Xml(&xml::PEOPLE)),
            (ResourceKind::Person, DecoderSpec::Xml(&xml::PERSON)),
            (ResourceKind::Publications, DecoderSpec::Xml(&xml::PUBLICATIONS)),
            (ResourceKind::Publication, DecoderSpec::Xml(&xml::PUBLICATION)),
        ]);
        let json = HashMap::from([
            (ResourceKind::Projects, DecoderSpec::Json(&json::PROJECTS)),
            (ResourceKind::Project, DecoderSpec::Json(&json::PROJECT)),
            (ResourceKind::Organisations, DecoderSpec::Json(&json::ORGANISATIONS)),
            (ResourceKind::Organisation, DecoderSpec::Json(&json::ORGANISATION)),
            (ResourceKind::People, DecoderSpec::Json(&json::PEOPLE)),
            (ResourceKind::Person, DecoderSpec::Json(&json::PERSON)),
            (ResourceKind::Publications, DecoderSpec::Json(&json::PUBLICATIONS)),
            (ResourceKind::Publication, DecoderSpec::Json(&json::PUBLICATION)),
        ]);

        Self {
            class_map: HashMap::from([(Serialisation::Xml, xml), (Serialisation::Json, json)]),
        }
    }

    /// Decoders for the CERIF extension.
    ///
    /// Relations and classes are only published as JSON records.
    pub fn cerif() -> Self {
        let xml = HashMap::from([(
            ResourceKind::CerifProject,
            DecoderSpec::Xml(&xml::CERIF_PROJECT),
        )]);
        let json = HashMap::from([
            (ResourceKind::CerifProject, DecoderSpec::Json(&json::CERIF_PROJECT)),
            (ResourceKind::CerifRelation, DecoderSpec::Json(&json::CERIF_RELATION)),
            (ResourceKind::CerifClass, DecoderSpec::Json(&json::CERIF_CLASS)),
            (ResourceKind::CerifClasses, DecoderSpec::Json(&json::CERIF_CLASSES)),
        ]);

        Self {
            class_map: HashMap::from([(Serialisation::Xml, xml), (Serialisation::Json, json)]),
        }
    }

    /// Whether a decoder exists for the combination.
    pub fn supports(&self, serialisation: Serialisation, kind: ResourceKind) -> bool {
        self.spec(serialisation, kind).is_some()
    }

    /// Build a decoder for a body, or `None` if the combination is
    /// unsupported or the body is in the other serialisation.
    pub fn decoder(
        &self,
        serialisation: Serialisation,
        kind: ResourceKind,
        body: Body,
    ) -> Option<Box<dyn ResourceDecoder>> {
        self.spec(serialisation, kind)?.build(kind, body)
    }

    fn spec(&self, serialisation: Serialisation, kind: ResourceKind) -> Option<DecoderSpec> {
        self.class_map.get(&serialisation)?.get(&kind).copied()
    }
}
