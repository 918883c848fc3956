//! The per-instance engine configuration surface.

use crate::error::EngineError;
use crate::processor::Engine;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Settings applied to an engine instance exactly once, at construction.
///
/// Deserializes from the host configuration's camelCase keys; missing keys
/// take their defaults. Feature values are opaque here — the engine is the
/// one that accepts or rejects them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub is_tracing: bool,
    pub licensed_saxon_edition: bool,
    pub features: BTreeMap<String, Value>,
}

impl EngineSettings {
    /// Reads settings from a configuration object.
    pub fn from_config(config: &Value) -> Result<Self, EngineError> {
        serde_json::from_value(config.clone()).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Installs every feature entry into `engine` by name, after switching
    /// the licensing mode. A rejection fails the whole application, naming
    /// the offending key.
    pub fn apply<E: Engine>(&self, engine: &mut E) -> Result<(), EngineError> {
        engine.set_licensed(self.licensed_saxon_edition);
        for (name, value) in &self.features {
            engine.set_property(name, value).map_err(|e| match e {
                feature @ EngineError::Feature { .. } => feature,
                other => EngineError::Feature {
                    feature: name.clone(),
                    message: other.to_string(),
                },
            })?;
            log::debug!("installed engine feature '{name}'");
        }
        Ok(())
    }
}
