//! A "dumb" XML driver that pulls tokens from a reader and notifies a
//! tree-building sink of events.
//!
//! The copier owns the pull side of the bridge: it advances the reader to
//! each token and forwards an equivalent event to the sink, preserving
//! qualified names, per-element namespace bindings and document order.
//! Copying consumes the copier, so the reader is released on success and
//! failure alike; the sink is finished only by its owner.

use crate::error::IngestError;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use std::io::BufRead;
use xylem_tree::{DocumentBuilder, QName};

/// Drives a pull XML reader into a push sink.
pub struct StreamCopier<R: BufRead> {
    reader: Reader<R>,
}

impl<R: BufRead> StreamCopier<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = true;
        Self { reader }
    }

    /// Copies every token from the reader into `sink`.
    ///
    /// With `fragment` unset the stream must hold exactly one top-level
    /// element; with it set, any number of top-level nodes is accepted.
    /// Reader-reported well-formedness violations map to
    /// [`IngestError::Malformed`] carrying the byte position.
    pub fn copy(mut self, sink: &mut DocumentBuilder, fragment: bool) -> Result<(), IngestError> {
        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut top_level_elements = 0usize;
        sink.start_document();

        loop {
            let pos = self.reader.buffer_position();
            let event = match self.reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => {
                    let position = self.reader.buffer_position();
                    return Err(IngestError::from_reader(e, position));
                }
            };
            match event {
                XmlEvent::Start(e) => {
                    self.forward_element(sink, &e, pos)?;
                    depth += 1;
                    if depth == 1 {
                        top_level_elements += 1;
                        if !fragment && top_level_elements > 1 {
                            return Err(IngestError::malformed(
                                "multiple top-level elements",
                                pos,
                            ));
                        }
                    }
                }
                XmlEvent::Empty(e) => {
                    self.forward_element(sink, &e, pos)?;
                    sink.end_element()?;
                    if depth == 0 {
                        top_level_elements += 1;
                        if !fragment && top_level_elements > 1 {
                            return Err(IngestError::malformed(
                                "multiple top-level elements",
                                pos,
                            ));
                        }
                    }
                }
                XmlEvent::Text(e) => {
                    let raw = std::str::from_utf8(e.as_ref())?;
                    let text = unescape(raw)
                        .map_err(|e| IngestError::malformed(e.to_string(), pos))?;
                    if depth == 0 && !fragment {
                        if !text.trim().is_empty() {
                            return Err(IngestError::malformed(
                                "text content outside the root element",
                                pos,
                            ));
                        }
                    } else {
                        sink.text(&text);
                    }
                }
                XmlEvent::CData(e) => {
                    if depth == 0 && !fragment {
                        return Err(IngestError::malformed(
                            "CDATA outside the root element",
                            pos,
                        ));
                    }
                    let raw = e.into_inner();
                    sink.text(std::str::from_utf8(&raw)?);
                }
                XmlEvent::Comment(e) => {
                    sink.comment(std::str::from_utf8(e.as_ref())?.to_string());
                }
                XmlEvent::PI(e) => {
                    let target = std::str::from_utf8(e.target())?.to_string();
                    let content = std::str::from_utf8(e.content())?.trim_start();
                    let value = (!content.is_empty()).then(|| content.to_string());
                    sink.processing_instruction(target, value);
                }
                XmlEvent::End(_) => {
                    sink.end_element()?;
                    depth = depth.saturating_sub(1);
                }
                XmlEvent::Decl(_) | XmlEvent::DocType(_) => {}
                XmlEvent::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let position = self.reader.buffer_position();
        if depth > 0 {
            return Err(IngestError::malformed(
                "unexpected end of input inside an element",
                position,
            ));
        }
        if !fragment && top_level_elements == 0 {
            return Err(IngestError::malformed("no root element", position));
        }
        sink.end_document();
        log::debug!(
            "copied {} top-level node(s), {} bytes",
            top_level_elements,
            position
        );
        Ok(())
    }

    /// Forwards a start tag: element name first, then namespace declarations
    /// and attributes in source order.
    fn forward_element(
        &self,
        sink: &mut DocumentBuilder,
        e: &BytesStart,
        pos: u64,
    ) -> Result<(), IngestError> {
        sink.start_element(qname_from_bytes(e.name().as_ref())?);
        for attr in e.attributes() {
            let attr = attr.map_err(|e| IngestError::malformed(e.to_string(), pos))?;
            let key = attr.key.as_ref();
            let value = attr
                .unescape_value()
                .map_err(|e| IngestError::malformed(e.to_string(), pos))?
                .into_owned();
            if key == b"xmlns" {
                sink.namespace(None, value)?;
            } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                sink.namespace(Some(std::str::from_utf8(prefix)?.to_string()), value)?;
            } else {
                sink.attribute(qname_from_bytes(key)?, value)?;
            }
        }
        Ok(())
    }
}

fn qname_from_bytes(raw: &[u8]) -> Result<QName, IngestError> {
    Ok(QName::parse(std::str::from_utf8(raw)?))
}
