//! Bundled vendor log formats and the bootstrap list that registers them.

pub mod citrix_cef;
pub mod fortinet_firewall;

use tracing::debug;

use crate::error::GeneratorError;
use crate::generator::{Generator, GeneratorConfig, GeneratorRegistry};

pub use citrix_cef::CitrixCef;
pub use fortinet_firewall::FortinetFirewall;

/// Registration functions for every bundled format, in registration order.
const BUILTIN: [fn(&mut GeneratorRegistry); 2] = [
    citrix_cef::register,
    fortinet_firewall::register,
];

/// Register every bundled format into `registry`.
pub fn register_all(registry: &mut GeneratorRegistry) {
    for register in BUILTIN {
        register(registry);
    }
}

/// A registry holding every bundled format.
pub fn default_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    register_all(&mut registry);
    debug!(formats = ?registry.formats(), "Generator registry initialized");
    registry
}

/// Construct the generator named by `config`.
///
/// A format missing from `registry` is reported as [`GeneratorError::UnknownFormat`].
pub fn build(
    registry: &GeneratorRegistry,
    config: &GeneratorConfig,
) -> Result<Box<dyn Generator>, GeneratorError> {
    let constructor = registry
        .lookup(&config.format)
        .ok_or_else(|| GeneratorError::UnknownFormat(config.format.clone()))?;
    constructor(&config.options)
}
