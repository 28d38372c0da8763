use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("document has no root element")]
    NoRoot,

    #[error("unexpected element <{0}> after the root element")]
    TrailingElement(String),

    #[error("text {0:?} outside the root element")]
    StrayText(String),

    #[error("element <{0}> is never closed")]
    Unclosed(String),
}

/// A parsed XML element.
///
/// `text` holds only the character data that appears before the first
/// child element, which is where JUnit writers put failure messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Look up an attribute value by name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given tag name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn from_start(start: &BytesStart) -> Result<Self, XmlError> {
        let mut element = Element {
            name: String::from_utf8_lossy(start.name().as_ref()).to_string(),
            ..Default::default()
        };

        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()?.to_string();
            element.attributes.push((key, value));
        }

        Ok(element)
    }

    fn push_text(&mut self, text: &str) {
        // Character data after the first child is tail text, not ours
        if !self.children.is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }
}

/// Parse a whole document into its root element
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let xml = xml.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err(XmlError::TrailingElement(
                        String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    ));
                }
                stack.push(Element::from_start(e)?);
            }
            Event::Empty(ref e) => {
                if root.is_some() {
                    return Err(XmlError::TrailingElement(
                        String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    ));
                }
                let element = Element::from_start(e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml checks end names, so the stack top is the match
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                match stack.last_mut() {
                    Some(top) => top.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(XmlError::StrayText(text.trim().to_string())),
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                match stack.last_mut() {
                    Some(top) => top.push_text(&text),
                    None => return Err(XmlError::StrayText(text)),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    root.ok_or(XmlError::NoRoot)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
