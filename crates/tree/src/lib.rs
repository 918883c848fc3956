//! Immutable XML document tree.
//!
//! A [`Document`] is built once through the push-style [`DocumentBuilder`]
//! sink and is read-only afterwards. Navigation happens through copyable
//! [`Node`] cursors, so any number of consumers can walk the same tree
//! concurrently without synchronization.
//!
//! ## Key Types
//!
//! - **[`DocumentBuilder`]**: push sink accepting document/element/text events
//! - **[`Document`]**: arena-allocated, immutable tree
//! - **[`Node`]**: copyable read cursor over one node
//! - **[`QName`]** / **[`Namespace`]**: qualified names and namespace bindings

pub mod builder;
pub mod name;
pub mod node;

pub use builder::{BuildError, DocumentBuilder};
pub use name::{Namespace, QName, XML_NAMESPACE_URI};
pub use node::{Attribute, Children, Descendants, Document, Node, NodeId, NodeKind};
