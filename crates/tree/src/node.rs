//! The arena-allocated document and its read-only node cursors.

use crate::name::{Namespace, QName, XML_NAMESPACE_URI};

/// Index of a node inside its [`Document`] arena. Ids follow document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn get(self) -> usize {
        self.0
    }
}

/// An attribute attached to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// What a node is.
#[derive(Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node itself. Always id 0, never has a parent.
    Root,
    Element {
        name: QName,
        attributes: Vec<Attribute>,
        namespaces: Vec<Namespace>,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        value: Option<String>,
    },
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

/// A fully built, immutable XML document.
///
/// Nodes live in an arena in document order; the node at id 0 is the
/// document root whose children are the top-level nodes.
#[derive(Debug)]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
}

impl Document {
    /// The document node.
    pub fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            id: NodeId(0),
        }
    }

    /// The first top-level element, if any.
    pub fn root_element(&self) -> Option<Node<'_>> {
        self.root().children().find(Node::is_element)
    }

    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { doc: self, id })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every node in document order, starting at the root.
    pub fn descendants(&self) -> Descendants<'_> {
        self.root().descendants()
    }
}

/// A copyable read cursor over one node of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl<'a> Node<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.data().kind
    }

    fn data(&self) -> &'a NodeData {
        &self.doc.nodes[self.id.0]
    }

    pub fn is_root(&self) -> bool {
        matches!(self.data().kind, NodeKind::Root)
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data().kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data().kind, NodeKind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.data().kind, NodeKind::Comment(_))
    }

    pub fn is_pi(&self) -> bool {
        matches!(self.data().kind, NodeKind::ProcessingInstruction { .. })
    }

    /// The qualified name of an element.
    pub fn name(&self) -> Option<&'a QName> {
        match &self.data().kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Local part of an element name, `""` for non-elements.
    pub fn tag_name(&self) -> &'a str {
        self.name().map(|n| n.local.as_str()).unwrap_or("")
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        match &self.data().kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Looks an attribute up by local name.
    pub fn attribute(&self, local: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Namespace declarations carried by this element itself.
    pub fn namespaces(&self) -> &'a [Namespace] {
        match &self.data().kind {
            NodeKind::Element { namespaces, .. } => namespaces,
            _ => &[],
        }
    }

    /// Resolves a namespace prefix against this node's in-scope bindings,
    /// walking ancestors from the innermost declaration outwards. `None`
    /// resolves the default namespace.
    pub fn lookup_namespace(&self, prefix: Option<&str>) -> Option<&'a str> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE_URI);
        }
        let mut cursor = Some(*self);
        while let Some(node) = cursor {
            if let Some(ns) = node
                .namespaces()
                .iter()
                .find(|ns| ns.prefix.as_deref() == prefix)
            {
                return Some(ns.uri.as_str());
            }
            cursor = node.parent();
        }
        None
    }

    /// The namespace this element's own name lives in.
    pub fn namespace_uri(&self) -> Option<&'a str> {
        let name = self.name()?;
        self.lookup_namespace(name.prefix.as_deref())
    }

    /// Content of a text node.
    pub fn text(&self) -> Option<&'a str> {
        match &self.data().kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Concatenated text of this node's subtree; the text content itself for
    /// text and comment nodes.
    pub fn string_value(&self) -> String {
        match &self.data().kind {
            NodeKind::Text(content) => content.clone(),
            NodeKind::Comment(content) => content.clone(),
            NodeKind::ProcessingInstruction { value, .. } => {
                value.clone().unwrap_or_default()
            }
            NodeKind::Root | NodeKind::Element { .. } => self
                .descendants()
                .filter_map(|n| n.text())
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node { doc: self.doc, id })
    }

    pub fn first_child(&self) -> Option<Node<'a>> {
        self.data().first_child.map(|id| Node { doc: self.doc, id })
    }

    pub fn next_sibling(&self) -> Option<Node<'a>> {
        self.data()
            .next_sibling
            .map(|id| Node { doc: self.doc, id })
    }

    pub fn has_children(&self) -> bool {
        self.data().first_child.is_some()
    }

    /// Direct children in document order.
    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            next: self.data().first_child,
        }
    }

    /// This node and everything below it, in document order.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            doc: self.doc,
            stack: vec![self.id],
        }
    }
}

/// Iterator over a node's direct children.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.doc.nodes[id.0].next_sibling;
        Some(Node { doc: self.doc, id })
    }
}

/// Pre-order iterator over a subtree, starting at the subtree root.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = Node { doc: self.doc, id };
        let children: Vec<NodeId> = {
            let mut ids = Vec::new();
            let mut next = self.doc.nodes[id.0].first_child;
            while let Some(child) = next {
                ids.push(child);
                next = self.doc.nodes[child.0].next_sibling;
            }
            ids
        };
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}
