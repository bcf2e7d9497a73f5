//! One generator run: parse, register, validate, emit.
//!
//! A [`Pipeline`] owns its sources and builds a fresh symbol table per
//! [`run`](Pipeline::run), so independent pipelines can run on separate
//! threads.

use std::fs;
use std::path::Path;

use tracing::{debug, info, info_span};

use idlbind_emit::{BindingModel, emit};
use idlbind_engine::Validator;
use idlbind_foundation::{Diagnostics, Error, Result};
use idlbind_language::{SourceId, SourceMap, parse_file};
use idlbind_registry::SymbolTable;

use crate::config::GeneratorConfig;

/// The result of a successful run.
#[derive(Clone, Debug)]
pub struct RunOutput {
    /// The emitted binding model.
    pub model: BindingModel,
    /// Recoverable problems found along the way.
    pub diagnostics: Diagnostics,
}

/// Everything a run produced, including the diagnostics gathered before a
/// fatal error stopped it.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The binding model, or the fatal error.
    pub outcome: Result<BindingModel>,
    /// Recoverable problems found before the run finished or failed.
    pub diagnostics: Diagnostics,
}

impl RunReport {
    /// Returns true if the run produced a model.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Drops the diagnostics of a failed run and returns its error.
    ///
    /// # Errors
    /// Returns the fatal error, if any.
    pub fn into_result(self) -> Result<RunOutput> {
        let diagnostics = self.diagnostics;
        self.outcome.map(|model| RunOutput { model, diagnostics })
    }
}

/// A configured set of sources ready to be processed.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: GeneratorConfig,
    sources: SourceMap,
}

impl Pipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            sources: SourceMap::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the registered sources.
    #[must_use]
    pub const fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Reads a source file. The file is read now, not during [`run`](Self::run).
    ///
    /// # Errors
    /// Returns an `Io` error if the file cannot be read.
    pub fn add_source<P: AsRef<Path>>(&mut self, path: P) -> Result<SourceId> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read '{}': {e}", path.display())))?;
        Ok(self.add_source_text(path.display().to_string(), text))
    }

    /// Adds in-memory source text under `name`.
    pub fn add_source_text(&mut self, name: impl Into<String>, text: impl Into<String>) -> SourceId {
        let name = name.into();
        let text = text.into();
        debug!(source = %name, bytes = text.len(), "added source");
        self.sources.add(name, text)
    }

    /// Processes every source and emits the binding model.
    ///
    /// Syntax errors are collected into the diagnostics and the offending
    /// declarations skipped, unless the configuration says to fail on them.
    /// Use [`report`](Self::report) to keep those diagnostics when the run
    /// fails.
    ///
    /// # Errors
    /// Returns the first fatal error.
    pub fn run(&self) -> Result<RunOutput> {
        self.report().into_result()
    }

    /// Processes every source like [`run`](Self::run), keeping the
    /// diagnostics even when a fatal error ends the run.
    ///
    /// Every source is parsed before any is registered, so a registration
    /// error in one file does not hide syntax errors in the others.
    #[must_use]
    pub fn report(&self) -> RunReport {
        let _span = info_span!("run", sources = self.sources.files().count()).entered();
        let mut diagnostics = Diagnostics::new();
        let outcome = self.process(&mut diagnostics);
        match &outcome {
            Ok(model) => info!(
                bindings = model.len(),
                diagnostics = diagnostics.len(),
                "run complete"
            ),
            Err(error) => debug!(%error, diagnostics = diagnostics.len(), "run failed"),
        }
        RunReport {
            outcome,
            diagnostics,
        }
    }

    fn process(&self, diagnostics: &mut Diagnostics) -> Result<BindingModel> {
        let mut parsed = Vec::new();
        let mut first_syntax_error = None;
        for (id, file) in self.sources.files() {
            let _span = info_span!("parse", source = %file.name).entered();
            let output = parse_file(&self.sources, id)?;
            debug!(
                definitions = output.definitions.len(),
                errors = output.errors.len(),
                "parsed"
            );
            for error in output.errors {
                if first_syntax_error.is_none() {
                    first_syntax_error = Some(error.clone());
                }
                diagnostics.error(error);
            }
            parsed.push(output.definitions);
        }
        if self.config.fail_on_syntax_errors {
            if let Some(error) = first_syntax_error {
                return Err(error);
            }
        }

        let mut table = SymbolTable::with_sources(self.sources.clone());
        for definitions in parsed {
            table.register_definitions(definitions)?;
        }
        debug!(declarations = table.len(), "registered");

        let validated = {
            let _span = info_span!("validate").entered();
            Validator::with_options(&table, self.config.validator_options()).validate()?
        };
        diagnostics.extend(validated.diagnostics().clone());
        Ok(emit(&validated))
    }
}
