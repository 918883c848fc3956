// src/error.rs
//! Defines the unified error type for all pipeline operations.
//!
//! Lower-level failures are translated here and nowhere else: command
//! implementations use `?` and never carry their own mapping logic, and the
//! host pipeline only ever sees [`PipelineError`].

use thiserror::Error;
use xylem_engine::EngineError;
use xylem_ingest::IngestError;
use xylem_tree::BuildError;

/// The main error enum for all high-level operations within the adapter.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML ingestion error: {0}")]
    Ingest(#[from] IngestError),
    #[error("tree construction error: {0}")]
    Build(#[from] BuildError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
