//! The command template: configuration, evaluation, and the error boundary.

mod common;

use common::SharedCollector;
use serde_json::{Value, json};
use std::io::Read;
use xylem::{
    Command, Diagnostic, Engine, EngineError, EngineSettings, EvalInput, Evaluate, InMemoryEngine,
    InputKind, PipelineError, Processor, Record, XmlCommand, fields,
};

/// Emits one output record per `<user>` child of the root, carrying the
/// user's text and the input record's id.
struct ExtractUsers;

impl<E: Engine> Evaluate<E> for ExtractUsers {
    fn evaluate(
        &mut self,
        _processor: &Processor<E>,
        record: &Record,
        input: EvalInput<'_>,
        downstream: &mut dyn Command,
    ) -> Result<bool, EngineError> {
        let EvalInput::Tree(document) = input else {
            return Err(EngineError::Evaluation("expected a built tree".into()));
        };
        let root = document
            .root_element()
            .ok_or_else(|| EngineError::Evaluation("empty document".into()))?;
        for user in root.children().filter(|n| n.tag_name() == "user") {
            let mut output = Record::new();
            if let Some(id) = record.first(fields::ID) {
                output.put(fields::ID, id.clone());
            }
            output.put("name", user.string_value());
            if !downstream.process(output) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn users_command(collector: &SharedCollector) -> XmlCommand<InMemoryEngine, ExtractUsers> {
    XmlCommand::new(
        &EngineSettings::default(),
        InMemoryEngine::new(),
        ExtractUsers,
        Box::new(collector.clone()),
    )
    .unwrap()
}

#[test]
fn evaluator_sees_the_tree_and_emits_downstream() {
    common::init_logs();
    let collector = SharedCollector::new();
    let mut command = users_command(&collector);

    let mut record = Record::new();
    record.put(fields::ID, "rec-1");

    let proceed = command
        .process(&record, &b"<users><user>Alice</user><user>Bob</user></users>"[..])
        .unwrap();
    assert!(proceed);

    let emitted = collector.records();
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[0].first("name"), Some(&json!("Alice")));
    assert_eq!(emitted[1].first("name"), Some(&json!("Bob")));
    assert_eq!(emitted[0].first(fields::ID), Some(&json!("rec-1")));
}

#[test]
fn input_record_is_not_mutated() {
    let collector = SharedCollector::new();
    let mut command = users_command(&collector);

    let mut record = Record::new();
    record.put(fields::ID, "rec-2");
    let before = record.clone();

    command
        .process(&record, &b"<users><user>Ada</user></users>"[..])
        .unwrap();
    assert_eq!(record, before);
}

#[test]
fn stop_signal_propagates_unchanged() {
    struct Halt;
    impl Evaluate<InMemoryEngine> for Halt {
        fn evaluate(
            &mut self,
            _processor: &Processor<InMemoryEngine>,
            _record: &Record,
            _input: EvalInput<'_>,
            _downstream: &mut dyn Command,
        ) -> Result<bool, EngineError> {
            Ok(false)
        }
    }

    let mut command = XmlCommand::new(
        &EngineSettings::default(),
        InMemoryEngine::new(),
        Halt,
        Box::new(SharedCollector::new()),
    )
    .unwrap();

    let proceed = command.process(&Record::new(), &b"<r/>"[..]).unwrap();
    assert!(!proceed);
}

#[test]
fn stream_input_bypasses_tree_building() {
    struct RawLength(SharedCollector);
    impl Evaluate<InMemoryEngine> for RawLength {
        fn input_kind(&self) -> InputKind {
            InputKind::Stream
        }

        fn evaluate(
            &mut self,
            _processor: &Processor<InMemoryEngine>,
            _record: &Record,
            input: EvalInput<'_>,
            _downstream: &mut dyn Command,
        ) -> Result<bool, EngineError> {
            let EvalInput::Stream(stream) = input else {
                return Err(EngineError::Evaluation("expected the raw stream".into()));
            };
            let mut bytes = Vec::new();
            stream
                .read_to_end(&mut bytes)
                .map_err(|e| EngineError::Evaluation(e.to_string()))?;
            let mut output = Record::new();
            output.put("length", bytes.len());
            self.0.process(output);
            Ok(true)
        }
    }

    let collector = SharedCollector::new();
    let mut command = XmlCommand::new(
        &EngineSettings::default(),
        InMemoryEngine::new(),
        RawLength(collector.clone()),
        Box::new(SharedCollector::new()),
    )
    .unwrap();

    // Not XML at all: the raw path must not care.
    command.process(&Record::new(), &b"0123456789"[..]).unwrap();
    assert_eq!(collector.records()[0].first("length"), Some(&json!(10)));
}

#[test]
fn features_land_on_the_engine_at_construction() {
    let collector = SharedCollector::new();
    let command = XmlCommand::from_config(
        &json!({
            "isTracing": true,
            "features": { "foo": "bar" }
        }),
        InMemoryEngine::new(),
        ExtractUsers,
        Box::new(collector),
    )
    .unwrap();

    assert!(command.processor().is_tracing());
    assert_eq!(
        command.processor().engine().property("foo"),
        Some(&json!("bar"))
    );
}

#[test]
fn rejected_feature_fails_construction_naming_the_key() {
    struct Rejecting;
    impl Engine for Rejecting {
        fn set_property(&mut self, name: &str, _value: &Value) -> Result<(), EngineError> {
            Err(EngineError::Evaluation(format!("unsupported property {name}")))
        }

        fn set_licensed(&mut self, _licensed: bool) {}
    }

    let err = XmlCommand::from_config(
        &json!({ "features": { "nope": true } }),
        Rejecting,
        ExtractUsers,
        Box::new(SharedCollector::new()),
    )
    .unwrap_err();

    match err {
        PipelineError::Engine(EngineError::Feature { feature, .. }) => {
            assert_eq!(feature, "nope");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn listener_raised_diagnostics_cross_the_boundary_as_pipeline_errors() {
    struct Distrust;
    impl Evaluate<InMemoryEngine> for Distrust {
        fn evaluate(
            &mut self,
            processor: &Processor<InMemoryEngine>,
            _record: &Record,
            _input: EvalInput<'_>,
            _downstream: &mut dyn Command,
        ) -> Result<bool, EngineError> {
            processor.error_listener().warning(&Diagnostic::warning("odd but fine"));
            processor
                .error_listener()
                .error(Diagnostic::error("document cannot be trusted").at(1, 1))?;
            Ok(true)
        }
    }

    let mut command = XmlCommand::new(
        &EngineSettings::default(),
        InMemoryEngine::new(),
        Distrust,
        Box::new(SharedCollector::new()),
    )
    .unwrap();

    let err = command.process(&Record::new(), &b"<r/>"[..]).unwrap_err();
    assert!(
        matches!(err, PipelineError::Engine(EngineError::Diagnostic(_))),
        "got {err:?}"
    );
}

#[test]
fn a_custom_listener_replaces_the_default() {
    use std::sync::{Arc, Mutex};
    use xylem::ErrorListener;

    #[derive(Default)]
    struct Recording {
        warnings: Mutex<Vec<String>>,
    }

    impl ErrorListener for Recording {
        fn warning(&self, diagnostic: &Diagnostic) {
            self.warnings.lock().unwrap().push(diagnostic.message.clone());
        }

        fn error(&self, diagnostic: Diagnostic) -> Result<(), EngineError> {
            Err(EngineError::Diagnostic(diagnostic))
        }

        fn fatal(&self, diagnostic: Diagnostic) -> Result<(), EngineError> {
            Err(EngineError::Diagnostic(diagnostic))
        }
    }

    struct Warns;
    impl Evaluate<InMemoryEngine> for Warns {
        fn evaluate(
            &mut self,
            processor: &Processor<InMemoryEngine>,
            _record: &Record,
            _input: EvalInput<'_>,
            _downstream: &mut dyn Command,
        ) -> Result<bool, EngineError> {
            processor
                .error_listener()
                .warning(&Diagnostic::warning("dubious attribute value"));
            Ok(true)
        }
    }

    let listener = Arc::new(Recording::default());
    let mut command = XmlCommand::new(
        &EngineSettings::default(),
        InMemoryEngine::new(),
        Warns,
        Box::new(SharedCollector::new()),
    )
    .unwrap()
    .with_error_listener(listener.clone());

    assert!(command.process(&Record::new(), &b"<r/>"[..]).unwrap());
    assert_eq!(
        *listener.warnings.lock().unwrap(),
        vec!["dubious attribute value".to_string()]
    );
}

#[test]
fn malformed_payload_never_reaches_the_evaluator() {
    struct MustNotRun;
    impl Evaluate<InMemoryEngine> for MustNotRun {
        fn evaluate(
            &mut self,
            _processor: &Processor<InMemoryEngine>,
            _record: &Record,
            _input: EvalInput<'_>,
            _downstream: &mut dyn Command,
        ) -> Result<bool, EngineError> {
            panic!("evaluator ran on a malformed document");
        }
    }

    let mut command = XmlCommand::new(
        &EngineSettings::default(),
        InMemoryEngine::new(),
        MustNotRun,
        Box::new(SharedCollector::new()),
    )
    .unwrap();

    let err = command.process(&Record::new(), &b"<a><b></a>"[..]).unwrap_err();
    assert!(matches!(err, PipelineError::Ingest(_)), "got {err:?}");
}
