use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// SEC-003: Maximum element nesting depth accepted from a remote document.
/// RSS needs four or five levels; anything deeper is hostile or broken.
const MAX_XML_DEPTH: usize = 64;

/// Errors that can occur while building an element tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The underlying XML reader rejected the input.
    #[error("XML parse error: {0}")]
    Syntax(String),

    /// The document contains no root element.
    #[error("document has no root element")]
    Empty,

    /// The input ended while elements were still open.
    #[error("unexpected end of document inside <{0}>")]
    Unclosed(String),

    /// SEC-003: Nesting depth exceeds safety limit.
    #[error("XML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// One element of a parsed XML document.
///
/// Names are kept exactly as written, namespace prefix included
/// (`itunes:image`), because feeds reference extension elements by prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Concatenated, trimmed text and CDATA content.
    pub text: String,
}

impl XmlElement {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            ..Self::default()
        }
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Value of the named attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Parses an XML document into a tree rooted at its first element.
///
/// Comments, processing instructions and the DOCTYPE are skipped, as is
/// anything after the root element closes.
///
/// # Security
///
/// SEC-002: `quick-xml` (0.37) never expands `<!ENTITY>` declarations, so
/// external entity tricks in a hostile feed cannot reach the filesystem or
/// network. Only the five predefined XML entities and character references
/// are resolved.
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement, TreeError> {
    // Text is trimmed once per element in the `End` arm, so whitespace
    // between text and CDATA fragments survives
    let mut reader = Reader::from_reader(bytes);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(TreeError::MaxDepthExceeded(MAX_XML_DEPTH));
                }
                stack.push(start_element(&e, &reader));
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&e, &reader);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Ok(Event::End(_)) => {
                // End names are checked against the open element by the reader
                let Some(mut element) = stack.pop() else {
                    return Err(TreeError::Syntax("unmatched closing tag".to_owned()));
                };
                element.text = element.text.trim().to_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    match e.unescape() {
                        Ok(text) => current.text.push_str(&text),
                        Err(err) => {
                            // Unknown entities (`&nbsp;` is common in feeds) keep their raw form
                            tracing::debug!(error = %err, element = %current.name, "Keeping unescaped text");
                            current.text.push_str(&String::from_utf8_lossy(&e));
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => {
                return Err(match stack.pop() {
                    Some(open) => TreeError::Unclosed(open.name),
                    None => TreeError::Empty,
                });
            }
            Err(e) => return Err(TreeError::Syntax(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
}

fn start_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> XmlElement {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(err) => {
                tracing::warn!(element = %name, error = %err, "Skipping malformed XML attribute");
                continue;
            }
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.decode_and_unescape_value(reader.decoder()) {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.push((key, value));
    }

    XmlElement::new(name, attributes)
}
