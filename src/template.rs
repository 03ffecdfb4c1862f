//! Template engine adapter.
//!
//! Log line shapes are written as [minijinja] templates. Each [`TemplateEngine`] owns
//! its own environment, and the callable helpers available to templates are handed in
//! explicitly as a [`FunctionSet`] when the engine is created.
//!
//! Compilation only checks template syntax. Variables are resolved strictly at render
//! time, so a template naming a field the record does not have fails with
//! [`GeneratorError::Render`].

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::DateTime;
use minijinja::{Environment, Error, ErrorKind, UndefinedBehavior, Value};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::GeneratorError;

/// Number of dotted components in a NetScaler geolocation value.
const GEO_COMPONENTS: usize = 6;

/// Named callables exposed to templates compiled by one engine.
#[derive(Debug, Clone, Default)]
pub struct FunctionSet {
    functions: BTreeMap<&'static str, Value>,
}

impl FunctionSet {
    /// Create an empty function set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a callable, usually built with [`Value::from_function`].
    pub fn with(mut self, name: &'static str, function: Value) -> Self {
        self.functions.insert(name, function);
        self
    }

    /// The helpers every bundled log format relies on.
    ///
    /// - `strftime(unix_seconds, layout)`
    /// - `itoa(value, width?)`
    /// - `geolocation(location)`
    pub fn standard() -> Self {
        Self::new()
            .with("strftime", Value::from_function(strftime))
            .with("itoa", Value::from_function(itoa))
            .with("geolocation", Value::from_function(geolocation))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }
}

/// Format a unix timestamp (UTC) with a chrono `strftime` layout.
pub fn strftime(unix_seconds: i64, layout: &str) -> Result<String, Error> {
    let instant = DateTime::from_timestamp(unix_seconds, 0).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("timestamp {unix_seconds} is out of range"),
        )
    })?;

    let mut out = String::new();
    write!(out, "{}", instant.format(layout)).map_err(|_| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date layout '{layout}'"),
        )
    })?;
    Ok(out)
}

/// Integer to decimal string, zero-padded to `width` when given.
pub fn itoa(value: i64, width: Option<usize>) -> String {
    format!("{:0width$}", value, width = width.unwrap_or(0))
}

/// Expand `Continent.Country.Region.City` to the six-component NetScaler form.
pub fn geolocation(location: &str) -> String {
    if location.is_empty() || location == "Unknown" {
        return location.to_string();
    }

    let missing = GEO_COMPONENTS.saturating_sub(location.split('.').count());
    let mut out = location.to_string();
    for _ in 0..missing {
        out.push_str(".*");
    }
    out
}

/// Handle to a template compiled into a [`TemplateEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(usize);

/// A set of compiled templates sharing one function set.
pub struct TemplateEngine {
    env: Environment<'static>,
    names: Vec<&'static str>,
}

impl TemplateEngine {
    /// Create an engine whose templates can call the given functions and nothing else.
    pub fn new(functions: &FunctionSet) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for (name, function) in &functions.functions {
            env.add_global(*name, function.clone());
        }

        Self {
            env,
            names: Vec::new(),
        }
    }

    /// Compile a list of `(name, source)` templates in order.
    pub fn compile_all(
        functions: &FunctionSet,
        templates: &[(&'static str, &'static str)],
    ) -> Result<Self, GeneratorError> {
        let mut engine = Self::new(functions);
        for (name, source) in templates {
            engine.compile(name, source)?;
        }
        Ok(engine)
    }

    /// Parse one template. Fails with [`GeneratorError::Template`] on a syntax error
    /// or when the name is already taken.
    pub fn compile(
        &mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<TemplateId, GeneratorError> {
        if self.names.contains(&name) {
            return Err(GeneratorError::Template {
                name: name.to_string(),
                source: Error::new(ErrorKind::InvalidOperation, "template already compiled"),
            });
        }

        self.env
            .add_template(name, source)
            .map_err(|source| GeneratorError::Template {
                name: name.to_string(),
                source,
            })?;

        debug!(template = name, "Template compiled");
        self.names.push(name);
        Ok(TemplateId(self.names.len() - 1))
    }

    /// Render a compiled template against `data`.
    pub fn render<S: Serialize>(&self, id: TemplateId, data: &S) -> Result<Vec<u8>, GeneratorError> {
        let name = self.name(id).ok_or_else(|| GeneratorError::Render {
            name: format!("#{}", id.0),
            source: Error::new(ErrorKind::TemplateNotFound, "no template with this id"),
        })?;

        let render_error = |source| GeneratorError::Render {
            name: name.to_string(),
            source,
        };
        let template = self.env.get_template(name).map_err(render_error)?;
        let line = template.render(data).map_err(render_error)?;
        Ok(line.into_bytes())
    }

    /// Uniformly chosen template, `None` if nothing is compiled yet.
    pub fn random_id<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TemplateId> {
        if self.names.is_empty() {
            return None;
        }
        Some(TemplateId(rng.gen_range(0..self.names.len())))
    }

    pub fn name(&self, id: TemplateId) -> Option<&'static str> {
        self.names.get(id.0).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = TemplateId> {
        (0..self.names.len()).map(TemplateId)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
