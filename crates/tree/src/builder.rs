//! Push-style sink that accumulates XML events into a [`Document`].
//!
//! The builder is the receiving half of a pull-to-push copy: a driver feeds
//! it document, element, attribute, namespace and character events in
//! document order, then calls [`DocumentBuilder::finish`] to extract the
//! immutable tree. Finishing consumes the builder, so a tree can never be
//! mutated after it has been handed out.

use crate::name::{Namespace, QName};
use crate::node::{Attribute, Document, NodeData, NodeId, NodeKind};
use thiserror::Error;

/// Violations of the tree-building event protocol.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("no document was started")]
    NoDocument,
    #[error("end of element without a matching start")]
    UnbalancedEnd,
    #[error("element '{0}' was never closed")]
    UnclosedElement(String),
    #[error("attribute '{0}' arrived after child content")]
    MisplacedAttribute(String),
    #[error("namespace declaration for '{0}' arrived after child content")]
    MisplacedNamespace(String),
}

/// Accumulates pushed XML events into an immutable [`Document`].
///
/// Adjacent text events coalesce into a single text node. Structural events
/// other than `start_document` implicitly start the document, which lets a
/// driver push fragment content without an enclosing document event.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
    pending_text: String,
    started: bool,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_document(&mut self) {
        if !self.started {
            self.nodes.push(NodeData {
                parent: None,
                first_child: None,
                last_child: None,
                next_sibling: None,
                kind: NodeKind::Root,
            });
            self.open.push(NodeId(0));
            self.started = true;
        }
    }

    pub fn start_element(&mut self, name: QName) {
        self.start_document();
        self.flush_text();
        let id = self.append(NodeKind::Element {
            name,
            attributes: Vec::new(),
            namespaces: Vec::new(),
        });
        self.open.push(id);
    }

    /// Attaches an attribute to the innermost open element. Attributes must
    /// arrive before the element has any child content.
    pub fn attribute(&mut self, name: QName, value: String) -> Result<(), BuildError> {
        let target = self
            .clean_open_element()
            .ok_or_else(|| BuildError::MisplacedAttribute(name.to_string()))?;
        match &mut self.nodes[target.0].kind {
            NodeKind::Element { attributes, .. } => {
                attributes.push(Attribute { name, value });
                Ok(())
            }
            _ => Err(BuildError::MisplacedAttribute(name.to_string())),
        }
    }

    /// Attaches a namespace declaration to the innermost open element.
    pub fn namespace(&mut self, prefix: Option<String>, uri: String) -> Result<(), BuildError> {
        let described = prefix.clone().unwrap_or_default();
        let target = self
            .clean_open_element()
            .ok_or(BuildError::MisplacedNamespace(described.clone()))?;
        match &mut self.nodes[target.0].kind {
            NodeKind::Element { namespaces, .. } => {
                namespaces.push(Namespace { prefix, uri });
                Ok(())
            }
            _ => Err(BuildError::MisplacedNamespace(described)),
        }
    }

    pub fn text(&mut self, content: &str) {
        self.start_document();
        self.pending_text.push_str(content);
    }

    pub fn comment(&mut self, content: String) {
        self.start_document();
        self.flush_text();
        self.append(NodeKind::Comment(content));
    }

    pub fn processing_instruction(&mut self, target: String, value: Option<String>) {
        self.start_document();
        self.flush_text();
        self.append(NodeKind::ProcessingInstruction { target, value });
    }

    pub fn end_element(&mut self) -> Result<(), BuildError> {
        self.flush_text();
        if self.open.len() <= 1 {
            return Err(BuildError::UnbalancedEnd);
        }
        self.open.pop();
        Ok(())
    }

    /// Marks the end of the document token stream. Idempotent.
    pub fn end_document(&mut self) {
        self.flush_text();
    }

    /// Closes the sink and extracts the built tree.
    pub fn finish(mut self) -> Result<Document, BuildError> {
        self.flush_text();
        if !self.started {
            return Err(BuildError::NoDocument);
        }
        if self.open.len() > 1 {
            let id = self.open[self.open.len() - 1];
            let name = match &self.nodes[id.0].kind {
                NodeKind::Element { name, .. } => name.to_string(),
                _ => String::new(),
            };
            return Err(BuildError::UnclosedElement(name));
        }
        Ok(Document { nodes: self.nodes })
    }

    /// The innermost open element, provided nothing has been appended below
    /// it yet.
    fn clean_open_element(&self) -> Option<NodeId> {
        let target = *self.open.last()?;
        let clean = self.nodes[target.0].first_child.is_none() && self.pending_text.is_empty();
        clean.then_some(target)
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.pending_text);
        self.append(NodeKind::Text(content));
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(NodeData {
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            kind,
        });
        if let Some(parent) = parent {
            match self.nodes[parent.0].last_child {
                Some(prev) => self.nodes[prev.0].next_sibling = Some(id),
                None => self.nodes[parent.0].first_child = Some(id),
            }
            self.nodes[parent.0].last_child = Some(id);
        }
        id
    }
}
