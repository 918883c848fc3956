//! The processor facade: one configured engine instance per command.
//!
//! Engine state is owned exclusively by the instance that configured it —
//! there is no process-wide property table. After construction the engine is
//! only read, so sharing a processor across read-only consumers is safe.

use crate::config::EngineSettings;
use crate::error::EngineError;
use crate::listener::{ErrorListener, LogListener};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use xylem_tree::DocumentBuilder;

/// Configuration target for an evaluation engine.
///
/// Feature names are forwarded verbatim — validation, if any, is the
/// engine's call.
pub trait Engine: Send {
    /// Installs a named configuration property.
    fn set_property(&mut self, name: &str, value: &Value) -> Result<(), EngineError>;

    /// Switches licensed-edition behavior.
    fn set_licensed(&mut self, licensed: bool);
}

/// An engine that stores every property it is given. Stands in for a real
/// evaluation engine wherever only the configuration surface matters.
#[derive(Debug, Default)]
pub struct InMemoryEngine {
    licensed: bool,
    properties: BTreeMap<String, Value>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn is_licensed(&self) -> bool {
        self.licensed
    }
}

impl Engine for InMemoryEngine {
    fn set_property(&mut self, name: &str, value: &Value) -> Result<(), EngineError> {
        self.properties.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn set_licensed(&mut self, licensed: bool) {
        self.licensed = licensed;
    }
}

/// Owns one engine instance together with the settings applied to it, the
/// installed diagnostic listener, and the document-builder factory.
pub struct Processor<E: Engine> {
    engine: E,
    tracing: bool,
    listener: Arc<dyn ErrorListener>,
}

impl<E: Engine> std::fmt::Debug for Processor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("tracing", &self.tracing)
            .finish_non_exhaustive()
    }
}

impl<E: Engine> Processor<E> {
    /// Applies `settings` to `engine` exactly once and takes ownership. A
    /// rejected feature fails construction.
    pub fn configure(settings: &EngineSettings, mut engine: E) -> Result<Self, EngineError> {
        settings.apply(&mut engine)?;
        Ok(Processor {
            engine,
            tracing: settings.is_tracing,
            listener: Arc::new(LogListener),
        })
    }

    /// Swaps the diagnostic listener installed on this processor.
    pub fn with_error_listener(mut self, listener: Arc<dyn ErrorListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn is_tracing(&self) -> bool {
        self.tracing
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn error_listener(&self) -> &Arc<dyn ErrorListener> {
        &self.listener
    }

    /// A fresh sink for building one document.
    pub fn new_document_builder(&self) -> DocumentBuilder {
        DocumentBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Rejecting;

    impl Engine for Rejecting {
        fn set_property(&mut self, name: &str, _value: &Value) -> Result<(), EngineError> {
            Err(EngineError::Evaluation(format!("unknown property {name}")))
        }

        fn set_licensed(&mut self, _licensed: bool) {}
    }

    fn settings_with(features: Value) -> EngineSettings {
        EngineSettings::from_config(&json!({ "features": features })).unwrap()
    }

    #[test]
    fn features_land_on_the_engine() {
        let settings = settings_with(json!({ "foo": "bar" }));
        let processor = Processor::configure(&settings, InMemoryEngine::new()).unwrap();
        assert_eq!(processor.engine().property("foo"), Some(&json!("bar")));
    }

    #[test]
    fn rejection_names_the_offending_key() {
        let settings = settings_with(json!({ "nope": 1 }));
        let err = Processor::configure(&settings, Rejecting).unwrap_err();
        match err {
            EngineError::Feature { feature, .. } => assert_eq!(feature, "nope"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn licensing_is_applied_before_features() {
        let settings = EngineSettings::from_config(&json!({
            "licensedSaxonEdition": true
        }))
        .unwrap();
        let processor = Processor::configure(&settings, InMemoryEngine::new()).unwrap();
        assert!(processor.engine().is_licensed());
        assert!(!processor.is_tracing());
    }
}
