//! # xylem
//!
//! Streaming XML ingestion adapter for record pipelines.
//!
//! A host pipeline hands a command a record plus a byte source — a file, a
//! gzip-compressed file, or an in-flight attachment — and gets back an
//! immutable, navigable document and a continue/stop signal:
//!
//! - **[`tree`]**: the immutable document tree and its push-style builder
//! - **[`ingest`]**: byte-source resolution, decompression, and the
//!   pull-to-push copier
//! - **[`record`]**: the pipeline record multimap and downstream seam
//! - **[`engine`]**: engine configuration, processor facade, and the
//!   diagnostic listener contract
//! - **[`command`]**: the [`XmlCommand`] template tying it all together
//!
//! ## Design Principle
//!
//! One configured engine per command instance, one error-translation
//! boundary, and scoped ownership of every byte source: streams, readers and
//! sinks are released on every exit path, success or failure.

// Re-export foundation crates
pub use xylem_engine as engine;
pub use xylem_ingest as ingest;
pub use xylem_record as record;
pub use xylem_tree as tree;

pub mod command;
pub mod error;

// Re-export from internal modules
pub use command::{DocumentHandle, EvalInput, Evaluate, InputKind, XmlCommand};
pub use error::PipelineError;

// Re-export commonly used types from foundation crates
pub use engine::{
    Diagnostic, Engine, EngineError, EngineSettings, ErrorListener, InMemoryEngine, Location,
    LogListener, Processor, Severity,
};
pub use ingest::{CompressionCodec, IngestError, StreamCopier, open_path};
pub use record::{Collector, Command, Record, fields};
pub use tree::{
    Attribute, BuildError, Document, DocumentBuilder, Namespace, Node, NodeId, NodeKind, QName,
};
