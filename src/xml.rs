//! Owned XML element tree for the XML serialisation.
//!
//! Documents are parsed with `quick-xml` into [`Element`] values that own
//! their children, so fragments can be cloned out of one document and
//! re-wrapped into another without aliasing the source. Paths are simple
//! child-axis expressions such as `/gtr:projects/gtr:project`.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};

use crate::error::{GtrError, Result};

/// Namespace of the native GtR API documents.
pub const GTR_NS: &str = "http://gtr.rcuk.ac.uk/api";
/// Namespace of the CERIF 1.5 documents.
pub const CERIF_NS: &str = "urn:xmlns:org:eurocris:cerif-1.5-1";

/// Prefixes understood in paths and declared on serialised documents.
pub const NAMESPACES: &[(&str, &str)] = &[("gtr", GTR_NS), ("cerif", CERIF_NS)];

/// A node in an element's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its namespace, attributes and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty element from a prefixed name like `gtr:project`.
    ///
    /// Unprefixed names are placed in the GtR namespace.
    pub fn from_qname(qname: &str) -> Self {
        match qname.split_once(':') {
            Some((prefix, local)) => Self::new(namespace_for(prefix), local),
            None => Self::new(Some(GTR_NS), qname),
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        loop {
            let (ns, event) = reader.read_resolved_event().map_err(xml_error)?;
            match event {
                Event::Start(start) => stack.push(Self::from_start(&ns, &start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&ns, &start)?;
                    if let Some(root) = attach(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| GtrError::XmlError("unbalanced end tag".to_string()))?;
                    if let Some(root) = attach(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = text.unescape().map_err(xml_error)?;
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        parent.children.push(Node::Text(text));
                    }
                }
                Event::Eof => {
                    return Err(GtrError::XmlError(
                        "document ended before the root element closed".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }

    fn from_start(ns: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Self> {
        let namespace = match ns {
            ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
            _ => None,
        };
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            namespace,
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// The local name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace URI, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Look up an attribute by its (possibly prefixed) name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over the child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append text content.
    pub fn push_text(&mut self, text: &str) {
        self.children.push(Node::Text(text.to_string()));
    }

    /// The element's own text content, or `None` if it has none.
    pub fn text(&self) -> Option<String> {
        let mut texts = self
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .peekable();
        texts.peek()?;
        Some(texts.collect())
    }

    /// Select every element matched by a child-axis path.
    ///
    /// An absolute path (`/gtr:a/gtr:b`) starts by matching this element
    /// itself as the document root; a relative path (`gtr:b/gtr:c`) starts
    /// from this element's children. A step with an unknown prefix matches
    /// nothing.
    pub fn select(&self, path: &str) -> Vec<&Element> {
        let mut steps = path.split('/').filter(|s| !s.is_empty()).map(Step::parse);

        let mut current = vec![self];
        if path.starts_with('/') {
            match steps.next() {
                Some(Some(step)) if step.matches(self) => {}
                Some(_) => return Vec::new(),
                None => return current,
            }
        }

        for step in steps {
            let Some(step) = step else {
                return Vec::new();
            };
            current = current
                .into_iter()
                .flat_map(|el| el.child_elements().filter(move |c| step.matches(c)))
                .collect();
        }
        current
    }

    /// The text of the first element matched by `path`.
    pub fn first_text(&self, path: &str) -> Option<String> {
        self.select(path).first().and_then(|el| el.text())
    }

    /// Deep-copy this element's content into a new element named `qname`.
    pub fn port(&self, qname: &str) -> Element {
        let mut ported = Self::from_qname(qname);
        ported.children = self.children.clone();
        ported
    }

    /// Wrap this element in a hierarchy such as
    /// `gtr:projectOverview/gtr:projectComposition` (outermost first).
    pub fn wrap(self, wrappers: &str) -> Element {
        wrappers
            .rsplit('/')
            .filter(|s| !s.is_empty())
            .fold(self, |inner, qname| {
                let mut outer = Self::from_qname(qname);
                outer.push(inner);
                outer
            })
    }

    /// Serialise as an indented document with the known prefixes declared
    /// on the root.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write(&mut writer, true)?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>, root: bool) -> Result<()> {
        let qname = self.qualified_name();
        let mut start = BytesStart::new(qname.as_str());

        if root {
            for (prefix, uri) in NAMESPACES {
                start.push_attribute((format!("xmlns:{prefix}").as_str(), *uri));
            }
        }
        if let Some(ns) = self.namespace.as_deref() {
            if prefix_for(ns).is_none() {
                start.push_attribute(("xmlns", ns));
            }
        }
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(xml_error)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(xml_error)?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer, false)?,
                Node::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(xml_error)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(qname.as_str())))
            .map_err(xml_error)?;
        Ok(())
    }

    fn qualified_name(&self) -> String {
        match self.namespace.as_deref().and_then(prefix_for) {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// One step of a child-axis path.
#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    namespace: Option<&'static str>,
    local: &'a str,
}

impl<'a> Step<'a> {
    fn parse(step: &'a str) -> Option<Self> {
        match step.split_once(':') {
            Some((prefix, local)) => Some(Self {
                namespace: Some(namespace_for(prefix)?),
                local,
            }),
            None => Some(Self {
                namespace: None,
                local: step,
            }),
        }
    }

    fn matches(&self, element: &Element) -> bool {
        element.name == self.local && element.namespace.as_deref() == self.namespace
    }
}

fn attach(stack: &mut Vec<Element>, element: Element) -> Option<Element> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push(element);
            None
        }
        None => Some(element),
    }
}

fn namespace_for(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

fn prefix_for(namespace: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(_, uri)| *uri == namespace)
        .map(|(prefix, _)| *prefix)
}

fn xml_error(err: impl std::fmt::Display) -> GtrError {
    GtrError::XmlError(err.to_string())
}
