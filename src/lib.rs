//! Detects `errors.As` calls that will panic because their target is not a pointer.
//!
//! The crate exposes a tree-sitter based `LintEngine` over Go source. The
//! detector itself only sees the closed syntax model in [`syntax`] and a
//! [`syntax::SymbolResolver`]; [`lowering`] builds both from Go code.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod level;
pub mod lint;
pub mod lowering;
pub mod parser;
pub mod rules;
pub mod suppression;
pub mod syntax;
pub mod telemetry;
pub mod visitor;

use std::path::Path;

use crate::diagnostics::Diagnostic;
use crate::error::LintResult;
use crate::lint::{LintContext, LintRegistry, LintSettings};
use crate::lowering::CompilationUnit;

/// Engine orchestrates linting by lowering source and running registered passes.
///
/// Each call is independent, so one engine can be shared across threads.
pub struct LintEngine {
    registry: LintRegistry,
    settings: LintSettings,
}

impl LintEngine {
    /// Create a new engine with default lint settings.
    pub fn new(registry: LintRegistry) -> Self {
        Self {
            registry,
            settings: LintSettings::default(),
        }
    }

    /// Create a new engine with explicit lint settings (e.g. from config).
    pub fn new_with_settings(registry: LintRegistry, settings: LintSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &LintRegistry {
        &self.registry
    }

    /// Lint a single in-memory source string and return diagnostics in source order.
    ///
    /// Sources with syntax errors are rejected rather than analyzed.
    pub fn lint_source(&self, source: &str) -> LintResult<Vec<Diagnostic>> {
        let unit = instrument_block!("lower", { CompilationUnit::from_source(source) })?;
        Ok(self.run_rules(&unit))
    }

    /// Lint a file on disk; diagnostics carry its path.
    pub fn lint_file(&self, path: &Path) -> LintResult<Vec<Diagnostic>> {
        let source = std::fs::read_to_string(path)?;
        let mut diagnostics = self.lint_source(&source).inspect_err(|_err| {
            #[cfg(feature = "telemetry")]
            tracing::warn!(file = %path.display(), error = %_err, "file not analyzed");
        })?;

        let file = path.display().to_string();
        for diag in &mut diagnostics {
            diag.file = Some(file.clone());
        }
        Ok(diagnostics)
    }

    fn run_rules(&self, unit: &CompilationUnit) -> Vec<Diagnostic> {
        let mut ctx = LintContext::new(unit.nolint(), &self.settings);

        instrument_block!("check", {
            for rule in self.registry.rules() {
                rule.check(unit, &mut ctx);
            }
        });

        let diagnostics = ctx.into_diagnostics();
        #[cfg(feature = "telemetry")]
        tracing::debug!(
            package = unit.package().unwrap_or("<none>"),
            nodes = unit.tree().len(),
            symbols = unit.symbols().len(),
            diagnostics = diagnostics.len(),
            "unit checked"
        );
        diagnostics
    }
}

/// Construct a `LintEngine` with every built-in pass and default settings.
pub fn create_default_engine() -> LintEngine {
    LintEngine::new(LintRegistry::default_rules())
}
