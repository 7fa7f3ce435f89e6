//! Engine Configuration Module
//!
//! Tuning values for the analyzers, loaded from TOML or built from defaults.
//!
//! ## Usage
//!
//! The configuration is a plain value object. Callers build it once and pass
//! a reference into each analysis entry point; the engine keeps no global copy.
//!
//! ```ignore
//! let config = EngineConfig::load_from_file(Path::new("engine.toml"))?;
//! model.perform_analysis(&config)?;
//! ```

mod engine_config;
pub mod defaults;
pub mod validation;

pub use engine_config::*;
