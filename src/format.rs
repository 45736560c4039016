//! Wire formats and decoded response bodies.

use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::xml::Element;

/// The serialisation a client negotiates with the server.
///
/// A client is fixed to one serialisation for its whole lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Serialisation {
    /// Tree-structured XML documents.
    #[default]
    Xml,
    /// Nested JSON records.
    Json,
}

impl Serialisation {
    /// Resolve a serialisation by name.
    ///
    /// Unrecognised names fall back to XML.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Xml,
        }
    }

    /// The MIME type sent in the `Accept` header.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
        }
    }

    /// The short name of the serialisation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for Serialisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded response body or document fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Xml(Element),
    Json(Value),
}

impl Body {
    /// The serialisation this body was decoded from.
    pub fn serialisation(&self) -> Serialisation {
        match self {
            Self::Xml(_) => Serialisation::Xml,
            Self::Json(_) => Serialisation::Json,
        }
    }

    /// Render the body as indented text in its own serialisation.
    pub fn render(&self) -> Result<String> {
        match self {
            Self::Xml(element) => element.to_pretty_string(),
            Self::Json(value) => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

/// Decode raw response text in the given serialisation.
pub fn decode(serialisation: Serialisation, text: &str) -> Result<Body> {
    match serialisation {
        Serialisation::Xml => Ok(Body::Xml(Element::parse(text)?)),
        Serialisation::Json => Ok(Body::Json(serde_json::from_str(text)?)),
    }
}
