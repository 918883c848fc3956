//! Shared lifecycle for XML-processing pipeline commands.
//!
//! Every concrete command (an XQuery runner, an XSLT runner, …) shares the
//! same setup: an engine configured once at construction, a stream-to-tree
//! ingestion path, and a single boundary where lower-level failures become
//! [`PipelineError`]. The part that differs — evaluating a record against a
//! document — is the [`Evaluate`] seam.

use crate::error::PipelineError;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use xylem_engine::{Engine, EngineError, EngineSettings, ErrorListener, Processor};
use xylem_ingest::StreamCopier;
use xylem_record::{Command, Record};
use xylem_tree::Document;

/// A fully built tree, shared read-only between any number of consumers.
pub type DocumentHandle = Arc<Document>;

/// What a concrete command wants handed to its evaluation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// A navigable document built from the byte source.
    #[default]
    Tree,
    /// The raw byte source, untouched.
    Stream,
}

/// Input handed to [`Evaluate::evaluate`].
pub enum EvalInput<'a> {
    Tree(DocumentHandle),
    Stream(&'a mut dyn Read),
}

/// The per-command evaluation seam.
///
/// One implementation per concrete command variant. Emitted output records
/// go to `downstream`; the returned boolean is the pipeline continue/stop
/// signal.
pub trait Evaluate<E: Engine> {
    /// Whether `evaluate` receives a built tree or the raw stream.
    fn input_kind(&self) -> InputKind {
        InputKind::Tree
    }

    fn evaluate(
        &mut self,
        processor: &Processor<E>,
        record: &Record,
        input: EvalInput<'_>,
        downstream: &mut dyn Command,
    ) -> Result<bool, EngineError>;
}

/// Template for commands that run an XML engine over record payloads.
///
/// Owns one configured [`Processor`] and the downstream continuation. All
/// engine, ingestion and I/O failures are translated into [`PipelineError`]
/// here and only here.
pub struct XmlCommand<E: Engine, V: Evaluate<E>> {
    processor: Processor<E>,
    evaluator: V,
    downstream: Box<dyn Command>,
}

impl<E: Engine, V: Evaluate<E>> std::fmt::Debug for XmlCommand<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlCommand").finish_non_exhaustive()
    }
}

impl<E: Engine, V: Evaluate<E>> XmlCommand<E, V> {
    /// Configures `engine` with `settings` and assembles the command.
    /// Construction fails fast on a rejected feature.
    pub fn new(
        settings: &EngineSettings,
        engine: E,
        evaluator: V,
        downstream: Box<dyn Command>,
    ) -> Result<Self, PipelineError> {
        let processor = Processor::configure(settings, engine)?;
        Ok(XmlCommand {
            processor,
            evaluator,
            downstream,
        })
    }

    /// Like [`XmlCommand::new`], reading settings straight from a host
    /// configuration object.
    pub fn from_config(
        config: &serde_json::Value,
        engine: E,
        evaluator: V,
        downstream: Box<dyn Command>,
    ) -> Result<Self, PipelineError> {
        let settings = EngineSettings::from_config(config)?;
        Self::new(&settings, engine, evaluator, downstream)
    }

    /// Swaps the diagnostic listener installed on the underlying processor.
    pub fn with_error_listener(mut self, listener: Arc<dyn ErrorListener>) -> Self {
        self.processor = self.processor.with_error_listener(listener);
        self
    }

    pub fn processor(&self) -> &Processor<E> {
        &self.processor
    }

    /// Runs one record against its byte payload.
    ///
    /// Builds the document first when the evaluator asked for a tree, and
    /// returns the evaluator's continue/stop signal unchanged. The source is
    /// consumed and released on every exit path.
    pub fn process<R: Read>(&mut self, record: &Record, source: R) -> Result<bool, PipelineError> {
        let proceed = match self.evaluator.input_kind() {
            InputKind::Tree => {
                let document = self.parse_document(source)?;
                self.evaluator.evaluate(
                    &self.processor,
                    record,
                    EvalInput::Tree(document),
                    self.downstream.as_mut(),
                )?
            }
            InputKind::Stream => {
                let mut source = source;
                self.evaluator.evaluate(
                    &self.processor,
                    record,
                    EvalInput::Stream(&mut source),
                    self.downstream.as_mut(),
                )?
            }
        };
        Ok(proceed)
    }

    /// Builds a navigable document from an already-open byte stream.
    pub fn parse_document<R: Read>(&self, source: R) -> Result<DocumentHandle, PipelineError> {
        let mut sink = self.processor.new_document_builder();
        StreamCopier::new(BufReader::new(source)).copy(&mut sink, false)?;
        let document = sink.finish()?;
        log::debug!("built document with {} nodes", document.node_count());
        Ok(Arc::new(document))
    }

    /// Builds a document from a named file, selecting decompression from the
    /// file-name suffix. The file is closed on every exit path.
    pub fn parse_document_path(&self, path: &Path) -> Result<DocumentHandle, PipelineError> {
        let stream = xylem_ingest::open_path(path)?;
        self.parse_document(stream)
    }
}
