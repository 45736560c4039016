//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to dumping the raw document.

use crate::cerif::{CerifClass, CerifProject};
use crate::{Organisation, Person, Project, Publication};

/// Trait for human-readable key-value output.
///
/// Implemented by facade types to provide formatted output suitable for
/// terminal display when `--raw` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

/// Header line, a divider as wide as it, then one line per present value.
fn block(header: String, rows: &[(&str, Option<String>)]) -> String {
    let divider = "─".repeat(header.chars().count().max(30));
    let mut lines = vec![header, divider];

    for (label, value) in rows {
        if let Some(value) = value {
            lines.push(format!("{:<16}{}", format!("{label}:"), value));
        }
    }

    lines.join("\n")
}

fn names<T>(items: &[T], name: impl Fn(&T) -> Option<String>) -> Option<String> {
    let names: Vec<String> = items.iter().filter_map(name).collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn or_unknown(id: Option<String>) -> String {
    id.unwrap_or_else(|| "(unknown)".to_string())
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let lead = self
            .lead_organisation()
            .ok()
            .flatten()
            .and_then(|org| org.name());
        let people = self.people().ok().and_then(|p| names(&p, Person::name));
        let collaborators = self
            .collaborators()
            .ok()
            .and_then(|c| names(&c, Organisation::name));

        let value = match (self.value_pounds(), self.value()) {
            (Some(pounds), _) => Some(format!("£{pounds:.0}")),
            (None, raw) => raw,
        };

        block(
            format!("Project: {}", or_unknown(self.id())),
            &[
                ("Title", self.title()),
                ("Status", self.status()),
                ("Reference", self.reference()),
                ("Category", self.category()),
                ("Funder", self.funder()),
                ("Value", value),
                ("Start", self.start_date().map(|d| d.to_string()).or_else(|| self.start())),
                ("End", self.end_date().map(|d| d.to_string()).or_else(|| self.end())),
                ("Lead", lead),
                ("People", people),
                ("Collaborators", collaborators),
            ],
        )
    }
}

impl PrettyPrint for Organisation {
    fn pretty_print(&self) -> String {
        let projects = self.projects().map(|p| p.len()).unwrap_or(0);
        block(
            format!("Organisation: {}", or_unknown(self.id())),
            &[
                ("Name", self.name()),
                ("Projects", (projects > 0).then(|| projects.to_string())),
            ],
        )
    }
}

impl PrettyPrint for Person {
    fn pretty_print(&self) -> String {
        let projects = self.projects().map(|p| p.len()).unwrap_or(0);
        block(
            format!("Person: {}", or_unknown(self.id())),
            &[
                ("Name", self.name()),
                ("Projects", (projects > 0).then(|| projects.to_string())),
            ],
        )
    }
}

impl PrettyPrint for Publication {
    fn pretty_print(&self) -> String {
        block(
            format!("Publication: {}", or_unknown(self.id())),
            &[("Title", self.title())],
        )
    }
}

impl PrettyPrint for CerifProject {
    fn pretty_print(&self) -> String {
        let mut out = block(format!("CERIF project: {}", or_unknown(self.id())), &[]);

        for relation in self.org_relations().unwrap_or_default() {
            out.push_str(&format!(
                "\nOrgUnit:        {} (class {})",
                relation.value().unwrap_or_default(),
                relation.class_id().unwrap_or_default()
            ));
        }

        out
    }
}

impl PrettyPrint for CerifClass {
    fn pretty_print(&self) -> String {
        let terms = self
            .term_relations()
            .ok()
            .and_then(|t| names(&t, |r| r.value()));

        block(
            format!("CERIF class: {}", or_unknown(self.id())),
            &[("Scheme", self.class_scheme_id()), ("Terms", terms)],
        )
    }
}
