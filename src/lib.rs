//! logsynth library
//!
//! Synthetic log lines in real vendor formats, for feeding log ingestion and parsing
//! pipelines with test traffic:
//!
//! - **generator**: the `Generator` contract and the format registry
//! - **formats**: bundled vendor formats and the bootstrap list registering them
//! - **template**: minijinja adapter with an explicit function set
//! - **random**: random addresses, ports, times and lookup-table picks
//! - **config**: environment-based configuration for the binary
//!
//! # Example
//!
//! ```no_run
//! use logsynth::formats::{build, default_registry};
//! use logsynth::{Generator, GeneratorConfig};
//!
//! let registry = default_registry();
//! let config = GeneratorConfig::new("fortinet:firewall")
//!     .with_options(serde_json::json!({ "timezone": "+0100" }));
//!
//! let mut generator = build(&registry, &config).expect("Failed to build generator");
//! for _ in 0..10 {
//!     let line = generator.next().expect("Failed to render line");
//!     println!("{}", String::from_utf8_lossy(&line));
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod formats;
pub mod generator;
pub mod random;
pub mod template;

// Re-export commonly used types at crate root for convenience
pub use config::{Config, ConfigError};
pub use error::GeneratorError;
pub use generator::{Constructor, Generator, GeneratorConfig, GeneratorRegistry};
pub use template::{FunctionSet, TemplateEngine, TemplateId};
