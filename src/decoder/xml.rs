//! Decoders for the XML serialisation.
//!
//! Each resource kind has a fixed table of absolute paths rooted at the
//! envelope element of a standalone document. Related resources are cut out
//! of the parent, ported into a freshly named element where the parent
//! uses a different element name, and wrapped in the envelope the target
//! kind expects.

use super::{Field, Relation, ResourceDecoder, ResourceKind};
use crate::error::Result;
use crate::format::{Body, Serialisation};
use crate::xml::Element;

/// Field and relation paths for one resource kind.
#[derive(Debug)]
pub(crate) struct XmlSchema {
    fields: &'static [(Field, &'static str)],
    relations: &'static [(Relation, XmlRelation)],
}

impl XmlSchema {
    fn field(&self, field: Field) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, path)| *path)
    }

    fn relation(&self, relation: Relation) -> Option<&XmlRelation> {
        self.relations
            .iter()
            .find(|(r, _)| *r == relation)
            .map(|(_, rel)| rel)
    }
}

/// How to extract one relation.
#[derive(Debug)]
pub(crate) struct XmlRelation {
    /// Path selecting each related element.
    path: &'static str,
    /// New element name for the selected content, if it must be renamed.
    port: Option<&'static str>,
    /// Envelope hierarchy, outermost first.
    wrapper: &'static str,
}

impl XmlRelation {
    fn extract(&self, element: &Element) -> Element {
        let fragment = match self.port {
            Some(name) => element.port(name),
            None => element.clone(),
        };
        fragment.wrap(self.wrapper)
    }
}

/// Reads one resource kind out of an XML document.
#[derive(Debug)]
pub(crate) struct XmlDecoder {
    kind: ResourceKind,
    schema: &'static XmlSchema,
    root: Element,
}

impl XmlDecoder {
    pub(crate) fn new(kind: ResourceKind, schema: &'static XmlSchema, root: Element) -> Self {
        Self { kind, schema, root }
    }
}

impl ResourceDecoder for XmlDecoder {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn serialisation(&self) -> Serialisation {
        Serialisation::Xml
    }

    fn field(&self, field: Field) -> Option<String> {
        self.root.first_text(self.schema.field(field)?)
    }

    fn subresources(&self, relation: Relation) -> Vec<Body> {
        let Some(relation) = self.schema.relation(relation) else {
            return Vec::new();
        };
        self.root
            .select(relation.path)
            .into_iter()
            .map(|element| Body::Xml(relation.extract(element)))
            .collect()
    }

    fn render(&self) -> Result<String> {
        self.root.to_pretty_string()
    }
}

const ORGANISATION_OVERVIEW: &str = "gtr:organisationOverview";
const PERSON_OVERVIEW: &str = "gtr:personOverview";
const PROJECT_OVERVIEW: &str = "gtr:projectOverview";

pub(crate) static PROJECT: XmlSchema = XmlSchema {
    fields: &[
        (Field::Id, "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:id"),
        (Field::Title, "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:title"),
        (
            Field::Start,
            "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:fund/gtr:start",
        ),
        (Field::End, "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:fund/gtr:end"),
        (Field::Status, "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:status"),
        (
            Field::Abstract,
            "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:abstractText",
        ),
        (
            Field::Funder,
            "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:fund/gtr:funder/gtr:name",
        ),
        (
            Field::Value,
            "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:fund/gtr:valuePounds",
        ),
        (
            Field::Category,
            "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:grantCategory",
        ),
        (
            Field::Reference,
            "/gtr:projectOverview/gtr:projectComposition/gtr:project/gtr:grantReference",
        ),
    ],
    relations: &[
        (
            Relation::LeadOrganisation,
            XmlRelation {
                path: "/gtr:projectOverview/gtr:projectComposition/gtr:leadResearchOrganisation",
                port: Some("gtr:organisation"),
                wrapper: ORGANISATION_OVERVIEW,
            },
        ),
        (
            Relation::Organisations,
            XmlRelation {
                path: "/gtr:projectOverview/gtr:projectComposition/gtr:organisations/gtr:organisation",
                port: None,
                wrapper: ORGANISATION_OVERVIEW,
            },
        ),
        (
            Relation::People,
            XmlRelation {
                path: "/gtr:projectOverview/gtr:projectComposition/gtr:projectPeople/gtr:projectPerson",
                port: Some("gtr:person"),
                wrapper: PERSON_OVERVIEW,
            },
        ),
        (
            Relation::Collaborators,
            XmlRelation {
                path: "/gtr:projectOverview/gtr:projectComposition/gtr:collaborations/gtr:collaborator",
                port: Some("gtr:organisation"),
                wrapper: ORGANISATION_OVERVIEW,
            },
        ),
    ],
};

pub(crate) static PROJECTS: XmlSchema = XmlSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        XmlRelation {
            path: "/gtr:projects/gtr:project",
            port: None,
            wrapper: "gtr:projectOverview/gtr:projectComposition",
        },
    )],
};

pub(crate) static ORGANISATION: XmlSchema = XmlSchema {
    fields: &[
        (Field::Id, "/gtr:organisationOverview/gtr:organisation/gtr:id"),
        (Field::Name, "/gtr:organisationOverview/gtr:organisation/gtr:name"),
    ],
    relations: &[(
        Relation::Projects,
        XmlRelation {
            path: "/gtr:organisationOverview/gtr:projectCompositions/gtr:projectComposition",
            port: None,
            wrapper: PROJECT_OVERVIEW,
        },
    )],
};

pub(crate) static ORGANISATIONS: XmlSchema = XmlSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        XmlRelation {
            path: "/gtr:organisations/gtr:organisation",
            port: None,
            wrapper: ORGANISATION_OVERVIEW,
        },
    )],
};

pub(crate) static PERSON: XmlSchema = XmlSchema {
    fields: &[
        (Field::Id, "/gtr:personOverview/gtr:person/gtr:id"),
        (Field::Name, "/gtr:personOverview/gtr:person/gtr:name"),
    ],
    relations: &[(
        Relation::Projects,
        XmlRelation {
            path: "/gtr:personOverview/gtr:projectCompositions/gtr:projectComposition",
            port: None,
            wrapper: PROJECT_OVERVIEW,
        },
    )],
};

pub(crate) static PEOPLE: XmlSchema = XmlSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        XmlRelation {
            path: "/gtr:people/gtr:person",
            port: None,
            wrapper: PERSON_OVERVIEW,
        },
    )],
};

pub(crate) static PUBLICATION: XmlSchema = XmlSchema {
    fields: &[
        (Field::Id, "/gtr:publicationOverview/gtr:publication/gtr:id"),
        (Field::Title, "/gtr:publicationOverview/gtr:publication/gtr:title"),
    ],
    relations: &[],
};

pub(crate) static PUBLICATIONS: XmlSchema = XmlSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        XmlRelation {
            path: "/gtr:publications/gtr:publication",
            port: None,
            wrapper: "gtr:publicationOverview",
        },
    )],
};

// CERIF relations are only published as JSON.
pub(crate) static CERIF_PROJECT: XmlSchema = XmlSchema {
    fields: &[(Field::Id, "/cerif:CERIF/cerif:cfProj/cerif:cfProjId")],
    relations: &[],
};
