//! Serializes a [`WireMap`] into the XML document of a wire schema.
//!
//! Depth-first walk: every map entry becomes a child element; nested maps
//! keyed `itemN` / `noteN` are rewritten to the fixed collection tags
//! (`tetel`, `kifizetes`) so ordered lists turn into repeated sibling
//! elements. Scalar text is CDATA-wrapped by default or entity-escaped
//! under explicit configuration, never both.

use std::io::Cursor;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::core::{AgentError, WireMap, WireNode};
use crate::schema::WireSchema;

/// How scalar character data is protected in the emitted XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// Wrap text in CDATA sections (wire default).
    #[default]
    Cdata,
    /// Escape markup characters as entities instead.
    Entities,
}

fn xml_io(e: std::io::Error) -> AgentError {
    AgentError::Serialization {
        message: format!("XML write error: {e}"),
        partial_xml: None,
    }
}

/// Rewrites an internal collection key to its fixed sibling tag.
fn collection_tag(key: &str) -> &str {
    if key.contains("item") {
        "tetel"
    } else if key.contains("note") {
        "kifizetes"
    } else {
        key
    }
}

/// Build the complete request document for `schema` from `root`.
///
/// The root element carries the namespace and schema-location attributes of
/// the schema. The finished document is re-parsed for well-formedness; a
/// malformed tree (bad element name from a stray key, unbalanced nesting)
/// is logged and surfaced as [`AgentError::Serialization`] with the
/// best-effort document attached.
pub fn build_document(
    schema: &WireSchema,
    root: &WireMap,
    escaping: Escaping,
) -> Result<String, AgentError> {
    debug!(schema = schema.xml_name, "building request XML");

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_io)?;

    let namespace = schema.namespace();
    let schema_location = schema.schema_location();
    let mut root_start = BytesStart::new(schema.xml_name);
    root_start.push_attribute(("xmlns", namespace.as_str()));
    root_start.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    root_start.push_attribute(("xsi:schemaLocation", schema_location.as_str()));
    writer
        .write_event(Event::Start(root_start))
        .map_err(xml_io)?;

    write_map(&mut writer, root, escaping)?;

    writer
        .write_event(Event::End(BytesEnd::new(schema.xml_name)))
        .map_err(xml_io)?;

    let buf = writer.into_inner().into_inner();
    let xml = String::from_utf8(buf).map_err(|e| AgentError::Serialization {
        message: format!("XML UTF-8 error: {e}"),
        partial_xml: None,
    })?;

    if let Err(message) = check_well_formed(&xml) {
        debug!(tree = ?root, "request tree could not be emitted as valid XML");
        return Err(AgentError::Serialization {
            message,
            partial_xml: Some(xml),
        });
    }

    debug!(schema = schema.xml_name, bytes = xml.len(), "request XML ready");
    Ok(xml)
}

fn write_map(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    map: &WireMap,
    escaping: Escaping,
) -> Result<(), AgentError> {
    for (key, node) in map.entries() {
        match node {
            WireNode::Map(child) => {
                let tag = collection_tag(key);
                writer
                    .write_event(Event::Start(BytesStart::new(tag)))
                    .map_err(xml_io)?;
                write_map(writer, child, escaping)?;
                writer
                    .write_event(Event::End(BytesEnd::new(tag)))
                    .map_err(xml_io)?;
            }
            WireNode::Text(text) => {
                writer
                    .write_event(Event::Start(BytesStart::new(key.as_str())))
                    .map_err(xml_io)?;
                match escaping {
                    Escaping::Cdata => {
                        // A "]]>" inside the payload would terminate the
                        // section early, split it across two sections.
                        let safe = text.replace("]]>", "]]]]><![CDATA[>");
                        writer
                            .write_event(Event::CData(BytesCData::new(safe)))
                            .map_err(xml_io)?;
                    }
                    Escaping::Entities => {
                        writer
                            .write_event(Event::Text(BytesText::new(text)))
                            .map_err(xml_io)?;
                    }
                }
                writer
                    .write_event(Event::End(BytesEnd::new(key.as_str())))
                    .map_err(xml_io)?;
            }
        }
    }
    Ok(())
}

/// Re-parse the emitted document against basic XML rules.
fn check_well_formed(xml: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return Ok(()),
            Ok(Event::Start(ref e)) => {
                for attr in e.attributes() {
                    if let Err(e) = attr {
                        return Err(format!("emitted XML is not well-formed: {e}"));
                    }
                }
            }
            Ok(_) => {}
            Err(e) => return Err(format!("emitted XML is not well-formed: {e}")),
        }
    }
}
