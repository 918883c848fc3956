//! Engine lifecycle plumbing.
//!
//! The evaluation engine itself (XQuery, XSLT, …) lives outside this
//! workspace; this crate owns everything around it:
//!
//! - **[`EngineSettings`]**: the per-instance configuration surface, applied
//!   exactly once at construction
//! - **[`Engine`]**: the configuration-target trait a concrete engine
//!   implements
//! - **[`Processor`]**: owns one configured engine instance plus the
//!   document-builder factory and the installed error listener
//! - **[`ErrorListener`]**: the diagnostic contract — warnings are logged,
//!   errors and fatals are logged and re-raised

pub mod config;
pub mod error;
pub mod listener;
pub mod processor;

pub use config::EngineSettings;
pub use error::EngineError;
pub use listener::{Diagnostic, ErrorListener, Location, LogListener, Severity};
pub use processor::{Engine, InMemoryEngine, Processor};
