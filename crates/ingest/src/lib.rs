//! Streaming XML ingestion.
//!
//! Turns a byte source into tree-building events:
//!
//! - **[`source`]**: resolves a named byte source to a readable stream,
//!   layering decompression when the name calls for it
//! - **[`copier`]**: drains a pull-style XML reader and pushes every token
//!   into a [`xylem_tree::DocumentBuilder`] sink, preserving document order
//!   and namespace context
//!
//! The sink is deliberately not finished here: whoever owns the builder
//! decides when the tree is complete.

pub mod copier;
pub mod error;
pub mod source;

pub use copier::StreamCopier;
pub use error::IngestError;
pub use source::{open_path, CompressionCodec};
