//! Decoders for the JSON serialisation.
//!
//! JSON records nest the same element names as the XML documents, without
//! prefixes, with repeated elements as arrays. Key paths flatten any array
//! they meet so that a path selects every matching record.

use serde_json::{Map, Value};

use super::{Field, Relation, ResourceDecoder, ResourceKind};
use crate::error::Result;
use crate::format::{Body, Serialisation};

/// Key under which CERIF wraps its tagged entries.
const TAGGED_ENTRY: &str = "JAXBElement";

/// Field and relation key paths for one resource kind.
#[derive(Debug)]
pub(crate) struct JsonSchema {
    fields: &'static [(Field, &'static [&'static str])],
    relations: &'static [(Relation, JsonRelation)],
}

impl JsonSchema {
    fn field(&self, field: Field) -> Option<&'static [&'static str]> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, path)| *path)
    }

    fn relation(&self, relation: Relation) -> Option<&JsonRelation> {
        self.relations
            .iter()
            .find(|(r, _)| *r == relation)
            .map(|(_, rel)| rel)
    }
}

/// How to extract one relation.
#[derive(Debug)]
pub(crate) struct JsonRelation {
    /// Key path selecting each related record.
    path: &'static [&'static str],
    /// Keep only tagged entries with this name, unwrapped.
    tag: Option<&'static str>,
    /// Key to place the record under before wrapping.
    key: Option<&'static str>,
    /// Envelope keys, outermost first.
    wrapper: &'static [&'static str],
}

impl JsonRelation {
    fn extract(&self, record: &Value) -> Option<Value> {
        let record = match self.tag {
            Some(tag) => {
                let entry = record.get(TAGGED_ENTRY)?;
                if entry.get("name").and_then(Value::as_str) != Some(tag) {
                    return None;
                }
                entry
            }
            None => record,
        };

        let fragment = match self.key {
            Some(key) => keyed(key, record.clone()),
            None => record.clone(),
        };
        Some(
            self.wrapper
                .iter()
                .rev()
                .fold(fragment, |inner, key| keyed(key, inner)),
        )
    }
}

/// Reads one resource kind out of a JSON record.
#[derive(Debug)]
pub(crate) struct JsonDecoder {
    kind: ResourceKind,
    schema: &'static JsonSchema,
    root: Value,
}

impl JsonDecoder {
    pub(crate) fn new(kind: ResourceKind, schema: &'static JsonSchema, root: Value) -> Self {
        Self { kind, schema, root }
    }
}

impl ResourceDecoder for JsonDecoder {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn serialisation(&self) -> Serialisation {
        Serialisation::Json
    }

    fn field(&self, field: Field) -> Option<String> {
        let path = self.schema.field(field)?;
        select(&self.root, path).first().and_then(|v| scalar(v))
    }

    fn subresources(&self, relation: Relation) -> Vec<Body> {
        let Some(relation) = self.schema.relation(relation) else {
            return Vec::new();
        };
        select(&self.root, relation.path)
            .into_iter()
            .filter_map(|record| relation.extract(record))
            .map(Body::Json)
            .collect()
    }

    fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

/// Select every value at a key path, flattening arrays along the way.
fn select<'a>(root: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let mut current = flatten(Some(root));
    for key in path {
        current = current
            .into_iter()
            .flat_map(|value| flatten(value.get(*key)))
            .collect();
    }
    current
}

fn flatten(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(value) => vec![value],
    }
}

/// Render a scalar as text; empty strings and compound values are absent.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

const PROJECT_OVERVIEW: &[&str] = &["projectOverview"];
const ORGANISATION_OVERVIEW: &[&str] = &["organisationOverview"];
const PERSON_OVERVIEW: &[&str] = &["personOverview"];

pub(crate) static PROJECT: JsonSchema = JsonSchema {
    fields: &[
        (Field::Id, &["projectOverview", "projectComposition", "project", "id"]),
        (Field::Title, &["projectOverview", "projectComposition", "project", "title"]),
        (
            Field::Start,
            &["projectOverview", "projectComposition", "project", "fund", "start"],
        ),
        (
            Field::End,
            &["projectOverview", "projectComposition", "project", "fund", "end"],
        ),
        (Field::Status, &["projectOverview", "projectComposition", "project", "status"]),
        (
            Field::Abstract,
            &["projectOverview", "projectComposition", "project", "abstractText"],
        ),
        (
            Field::Funder,
            &["projectOverview", "projectComposition", "project", "fund", "funder", "name"],
        ),
        (
            Field::Value,
            &["projectOverview", "projectComposition", "project", "fund", "valuePounds"],
        ),
        (
            Field::Category,
            &["projectOverview", "projectComposition", "project", "grantCategory"],
        ),
        (
            Field::Reference,
            &["projectOverview", "projectComposition", "project", "grantReference"],
        ),
    ],
    relations: &[
        (
            Relation::LeadOrganisation,
            JsonRelation {
                path: &["projectOverview", "projectComposition", "leadResearchOrganisation"],
                tag: None,
                key: Some("organisation"),
                wrapper: ORGANISATION_OVERVIEW,
            },
        ),
        (
            Relation::Organisations,
            JsonRelation {
                path: &["projectOverview", "projectComposition", "organisations", "organisation"],
                tag: None,
                key: Some("organisation"),
                wrapper: ORGANISATION_OVERVIEW,
            },
        ),
        (
            Relation::People,
            JsonRelation {
                path: &["projectOverview", "projectComposition", "projectPeople", "projectPerson"],
                tag: None,
                key: Some("person"),
                wrapper: PERSON_OVERVIEW,
            },
        ),
        (
            Relation::Collaborators,
            JsonRelation {
                path: &["projectOverview", "projectComposition", "collaborations", "collaborator"],
                tag: None,
                key: Some("organisation"),
                wrapper: ORGANISATION_OVERVIEW,
            },
        ),
    ],
};

pub(crate) static PROJECTS: JsonSchema = JsonSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        JsonRelation {
            path: &["projects", "project"],
            tag: None,
            key: Some("project"),
            wrapper: &["projectOverview", "projectComposition"],
        },
    )],
};

pub(crate) static ORGANISATION: JsonSchema = JsonSchema {
    fields: &[
        (Field::Id, &["organisationOverview", "organisation", "id"]),
        (Field::Name, &["organisationOverview", "organisation", "name"]),
    ],
    relations: &[(
        Relation::Projects,
        JsonRelation {
            path: &["organisationOverview", "projectCompositions", "projectComposition"],
            tag: None,
            key: Some("projectComposition"),
            wrapper: PROJECT_OVERVIEW,
        },
    )],
};

pub(crate) static ORGANISATIONS: JsonSchema = JsonSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        JsonRelation {
            path: &["organisations", "organisation"],
            tag: None,
            key: Some("organisation"),
            wrapper: ORGANISATION_OVERVIEW,
        },
    )],
};

pub(crate) static PERSON: JsonSchema = JsonSchema {
    fields: &[
        (Field::Id, &["personOverview", "person", "id"]),
        (Field::Name, &["personOverview", "person", "name"]),
    ],
    relations: &[(
        Relation::Projects,
        JsonRelation {
            path: &["personOverview", "projectCompositions", "projectComposition"],
            tag: None,
            key: Some("projectComposition"),
            wrapper: PROJECT_OVERVIEW,
        },
    )],
};

pub(crate) static PEOPLE: JsonSchema = JsonSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        JsonRelation {
            path: &["people", "person"],
            tag: None,
            key: Some("person"),
            wrapper: PERSON_OVERVIEW,
        },
    )],
};

pub(crate) static PUBLICATION: JsonSchema = JsonSchema {
    fields: &[
        (Field::Id, &["publicationOverview", "publication", "id"]),
        (Field::Title, &["publicationOverview", "publication", "title"]),
    ],
    relations: &[],
};

pub(crate) static PUBLICATIONS: JsonSchema = JsonSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        JsonRelation {
            path: &["publications", "publication"],
            tag: None,
            key: Some("publication"),
            wrapper: &["publicationOverview"],
        },
    )],
};

const CERIF_ROOT: &str = "cfClassOrCfClassSchemeOrCfClassSchemeDescr";

pub(crate) static CERIF_PROJECT: JsonSchema = JsonSchema {
    fields: &[(Field::Id, &[CERIF_ROOT, "cfProj", "cfProjId"])],
    relations: &[(
        Relation::OrgUnits,
        JsonRelation {
            path: &[CERIF_ROOT, "cfProj", "cfTitleOrCfAbstrOrCfKeyw"],
            tag: Some("{urn:xmlns:org:eurocris:cerif-1.5-1}cfProj_OrgUnit"),
            key: None,
            wrapper: &[],
        },
    )],
};

pub(crate) static CERIF_RELATION: JsonSchema = JsonSchema {
    fields: &[
        (Field::RelationName, &["name"]),
        (Field::ClassSchemeId, &["value", "cfClassSchemeId"]),
        (Field::ClassId, &["value", "cfClassId"]),
        (Field::Value, &["value", "value"]),
    ],
    relations: &[],
};

pub(crate) static CERIF_CLASS: JsonSchema = JsonSchema {
    fields: &[
        (Field::Id, &["cfClassId"]),
        (Field::ClassSchemeId, &["cfClassSchemeId"]),
    ],
    relations: &[(
        Relation::Terms,
        JsonRelation {
            path: &["cfDescrOrCfDescrSrcOrCfTerm"],
            tag: Some("{urn:xmlns:org:eurocris:cerif-1.5-1}cfTerm"),
            key: None,
            wrapper: &[],
        },
    )],
};

pub(crate) static CERIF_CLASSES: JsonSchema = JsonSchema {
    fields: &[],
    relations: &[(
        Relation::Items,
        JsonRelation {
            path: &[CERIF_ROOT, "cfClass"],
            tag: None,
            key: None,
            wrapper: &[],
        },
    )],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_flattens_arrays() {
        let root = json!({
            "people": {"person": [{"id": "a"}, null, {"id": "b"}]}
        });
        let ids: Vec<_> = select(&root, &["people", "person", "id"])
            .into_iter()
            .filter_map(scalar)
            .collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(scalar(&json!(12.5)), Some("12.5".to_string()));
        assert_eq!(scalar(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar(&json!("")), None);
        assert_eq!(scalar(&json!({"a": 1})), None);
        assert_eq!(scalar(&Value::Null), None);
    }

    #[test]
    fn test_single_record_relation_is_rekeyed_and_wrapped() {
        let decoder = JsonDecoder::new(
            ResourceKind::Project,
            &PROJECT,
            json!({
                "projectOverview": {"projectComposition": {
                    "leadResearchOrganisation": {"id": "org-1", "name": "Lead Uni"}
                }}
            }),
        );

        let lead = decoder.subresources(Relation::LeadOrganisation);
        assert_eq!(
            lead,
            vec![Body::Json(json!({
                "organisationOverview": {"organisation": {"id": "org-1", "name": "Lead Uni"}}
            }))]
        );
    }

    #[test]
    fn test_tagged_entries_are_filtered_by_name() {
        let decoder = JsonDecoder::new(
            ResourceKind::CerifClass,
            &CERIF_CLASS,
            json!({
                "cfClassId": "c1",
                "cfDescrOrCfDescrSrcOrCfTerm": [
                    {"JAXBElement": {"name": "{urn:xmlns:org:eurocris:cerif-1.5-1}cfDescr",
                                     "value": {"value": "a description"}}},
                    {"JAXBElement": {"name": "{urn:xmlns:org:eurocris:cerif-1.5-1}cfTerm",
                                     "value": {"value": "Lead Organisation"}}}
                ]
            }),
        );

        let terms = decoder.subresources(Relation::Terms);
        assert_eq!(terms.len(), 1);
        let Body::Json(term) = &terms[0] else {
            panic!("expected a JSON fragment");
        };
        assert_eq!(term["value"]["value"], "Lead Organisation");
        assert_eq!(decoder.field(Field::Id).as_deref(), Some("c1"));
    }
}
