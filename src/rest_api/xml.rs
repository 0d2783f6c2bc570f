//! # XML Wire Format
//!
//! Reading is rootless: the document element is dropped and its children
//! become the fields of the record. Element text is kept verbatim as a
//! string, `<x></x>` is the empty string, the self-closing `<x/>` is null,
//! and repeated siblings collapse into an array.
//!
//! Writing is the inverse, with the root element name chosen by the caller.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use thiserror::Error;

use super::record::Record;

const INDENT_SIZE: usize = 2;

/// XML read and write failures
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("body is not valid UTF-8")]
    Encoding,

    #[error("unclosed element <{0}> at end of document")]
    Unclosed(String),

    #[error("unexpected closing tag")]
    UnexpectedEnd,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("text content outside of the root element")]
    TextOutsideRoot,

    #[error("root element <{0}> holds text instead of fields")]
    TextOnlyRoot(String),
}

/// An element being read, before its closing tag
struct Frame {
    name: String,
    children: Record,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    /// Whitespace between child elements is layout; a leaf keeps its text as-is
    fn into_value(self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        }
    }
}

/// Parse raw body bytes into a canonical record
pub fn parse_bytes(body: &[u8]) -> Result<Record, XmlError> {
    let text = std::str::from_utf8(body).map_err(|_| XmlError::Encoding)?;
    parse_rootless(text)
}

/// Parse an XML document, discarding its root element.
///
/// An empty or whitespace-only document yields an empty record.
pub fn parse_rootless(input: &str) -> Result<Record, XmlError> {
    if input.trim().is_empty() {
        return Ok(Map::new());
    }

    let mut reader = Reader::from_str(input);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Frame> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::MultipleRoots);
                }
                stack.push(Frame::new(local_name(e.local_name().as_ref())));
            }
            Event::Empty(e) => {
                let name = local_name(e.local_name().as_ref());
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, Value::Null),
                    None if root.is_some() => return Err(XmlError::MultipleRoots),
                    None => root = Some(Frame::new(name)),
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(stack.last_mut(), &text)?;
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                push_text(stack.last_mut(), &String::from_utf8_lossy(&raw))?;
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or(XmlError::UnexpectedEnd)?;
                match stack.last_mut() {
                    Some(parent) => {
                        let name = frame.name.clone();
                        insert_child(&mut parent.children, name, frame.into_value());
                    }
                    None => root = Some(frame),
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, DOCTYPE
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    match root {
        None => Ok(Map::new()),
        Some(frame) if frame.children.is_empty() && !frame.text.trim().is_empty() => {
            Err(XmlError::TextOnlyRoot(frame.name))
        }
        Some(frame) => Ok(frame.children),
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn push_text(frame: Option<&mut Frame>, text: &str) -> Result<(), XmlError> {
    match frame {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::TextOutsideRoot),
    }
}

fn insert_child(children: &mut Record, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

/// Serialize a canonical value as an XML document.
///
/// A sequence becomes `root` wrapping one `item` element per entry. Any
/// other value is written as a single `root` element. Strings are written
/// verbatim, so an empty string is `<x></x>` while null is `<x/>`.
pub fn write_document(root: &str, item: &str, value: &Value) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    match value {
        Value::Array(items) if items.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(element_name(root))))?;
        }
        Value::Array(items) => {
            let root = element_name(root);
            writer.write_event(Event::Start(BytesStart::new(root.as_str())))?;
            for entry in items {
                write_element(&mut writer, item, entry)?;
            }
            writer.write_event(Event::End(BytesEnd::new(root.as_str())))?;
        }
        other => write_element(&mut writer, root, other)?,
    }

    String::from_utf8(writer.into_inner()).map_err(|_| XmlError::Encoding)
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), XmlError> {
    let name = element_name(name);

    match value {
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name.as_str())))?;
        }
        Value::Bool(b) => write_text_element(writer, &name, &b.to_string())?,
        Value::Number(n) => write_text_element(writer, &name, &n.to_string())?,
        Value::String(s) => write_text_element(writer, &name, s)?,
        Value::Array(items) => {
            // repeated siblings under the same name
            for entry in items {
                write_element(writer, &name, entry)?;
            }
        }
        Value::Object(fields) if fields.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name.as_str())))?;
        }
        Value::Object(fields) => {
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            for (key, child) in fields {
                write_element(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
    }

    Ok(())
}

/// `<name>text</name>` on one line; the text event keeps the closing tag
/// from being indented even when `text` is empty
fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), XmlError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Map an arbitrary record key onto a legal XML element name
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_badly = name
        .chars()
        .next()
        .map_or(true, |c| c.is_ascii_digit() || c == '-' || c == '.');
    if starts_badly {
        name.insert(0, '_');
    }
    name
}
