use crate::diagnostics::{Diagnostic, Span};
use crate::error::{LintError, LintResult};
use crate::level::LintLevel;
use crate::lowering::CompilationUnit;
use crate::rules::{FaultyErrorsAsLint, HelperTarget};
use crate::suppression::NolintDirectives;
use std::collections::{HashMap, HashSet};

/// High-level categories used to group lints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LintCategory {
    /// Code that compiles but is very likely wrong at runtime.
    Suspicious,
}

impl LintCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintCategory::Suspicious => "suspicious",
        }
    }
}

/// Static metadata describing a lint pass: its stable identity and documentation.
#[derive(Debug)]
pub struct LintDescriptor {
    pub name: &'static str,
    pub category: LintCategory,
    /// One-line summary.
    pub description: &'static str,
    /// Longer documentation shown by `explain`.
    pub explanation: &'static str,
}

/// A single analysis pass, run once per compilation unit.
///
/// Implementations must not keep state between calls; the engine may share one
/// instance across threads.
pub trait LintRule: Send + Sync {
    fn descriptor(&self) -> &'static LintDescriptor;
    fn check(&self, unit: &CompilationUnit, ctx: &mut LintContext<'_>);
}

/// Per-lint configuration derived from `faulty-errorsas.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSettings {
    levels: HashMap<String, LintLevel>,
    helpers: Vec<HelperTarget>,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            levels: HashMap::new(),
            helpers: HelperTarget::defaults(),
        }
    }
}

impl LintSettings {
    #[must_use]
    pub fn with_config_levels(mut self, levels: HashMap<String, LintLevel>) -> Self {
        self.levels.extend(levels);
        self
    }

    #[must_use]
    pub fn disable(mut self, disabled: impl IntoIterator<Item = String>) -> Self {
        for name in disabled {
            self.levels.insert(name, LintLevel::Allow);
        }
        self
    }

    /// Add helpers on top of the defaults; duplicates are ignored.
    #[must_use]
    pub fn with_helpers(mut self, helpers: impl IntoIterator<Item = HelperTarget>) -> Self {
        for helper in helpers {
            if !self.helpers.contains(&helper) {
                self.helpers.push(helper);
            }
        }
        self
    }

    pub fn level_for(&self, lint_name: &str) -> LintLevel {
        self.levels.get(lint_name).copied().unwrap_or_default()
    }

    pub fn helpers(&self) -> &[HelperTarget] {
        &self.helpers
    }
}

/// Diagnostic sink for one file.
pub struct LintContext<'a> {
    settings: &'a LintSettings,
    nolint: &'a NolintDirectives,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> LintContext<'a> {
    pub fn new(nolint: &'a NolintDirectives, settings: &'a LintSettings) -> Self {
        Self {
            settings,
            nolint,
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, lint: &'static LintDescriptor, span: Span, message: impl Into<String>) {
        let level = self.settings.level_for(lint.name);
        if level == LintLevel::Allow {
            return;
        }
        if self.nolint.is_suppressed(span.start.row, lint.name) {
            return;
        }

        self.diagnostics.push(Diagnostic {
            lint,
            level,
            file: None,
            span,
            message: message.into(),
        });
    }

    pub fn settings(&self) -> &LintSettings {
        self.settings
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

pub fn all_known_lints() -> HashSet<&'static str> {
    LintRegistry::default_rules()
        .descriptors()
        .map(|d| d.name)
        .collect()
}

/// Registry of the passes an engine runs.
pub struct LintRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl Default for LintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LintRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl LintRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static LintDescriptor> + '_ {
        self.rules.iter().map(|r| r.descriptor())
    }

    pub fn find_descriptor(&self, name: &str) -> Option<&'static LintDescriptor> {
        self.descriptors().find(|d| d.name == name)
    }

    #[must_use = "registry should be used to create an engine"]
    pub fn default_rules() -> Self {
        Self::new().with_rule(FaultyErrorsAsLint)
    }

    /// Default rules minus `disabled`.
    ///
    /// # Errors
    ///
    /// Returns error if any name in `disabled` is not a known lint.
    pub fn default_rules_filtered(disabled: &[String]) -> LintResult<Self> {
        let known = all_known_lints();
        if let Some(unknown) = disabled.iter().find(|n| !known.contains(n.as_str())) {
            return Err(LintError::UnknownLint(unknown.clone()));
        }

        let disabled: HashSet<&str> = disabled.iter().map(String::as_str).collect();
        let mut reg = Self::new();
        for rule in Self::default_rules().rules {
            if !disabled.contains(rule.descriptor().name) {
                reg.rules.push(rule);
            }
        }
        Ok(reg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Position;
    use crate::rules::faulty_errors_as::FAULTY_ERRORS_AS;

    fn span_at(row: usize) -> Span {
        Span::new(Position::new(row, 5), Position::new(row, 10))
    }

    #[test]
    fn default_level_is_warning() {
        let settings = LintSettings::default();
        let nolint = NolintDirectives::default();
        let mut ctx = LintContext::new(&nolint, &settings);
        ctx.report(&FAULTY_ERRORS_AS, span_at(1), "msg");
        let diags = ctx.into_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].level, LintLevel::Warn);
    }

    #[test]
    fn allow_level_drops_reports() {
        let settings = LintSettings::default().disable(["faulty_errorsas".to_string()]);
        let nolint = NolintDirectives::default();
        let mut ctx = LintContext::new(&nolint, &settings);
        ctx.report(&FAULTY_ERRORS_AS, span_at(1), "msg");
        assert!(ctx.into_diagnostics().is_empty());
    }

    #[test]
    fn nolint_comment_drops_reports_on_its_line() {
        let settings = LintSettings::default();
        let source = "package p\n\nvar x = 1 //nolint:faulty_errorsas\nvar y = 2\n";
        let tree = crate::parser::parse_source(source).expect("parse");
        let nolint = NolintDirectives::from_tree(&tree, source);
        let mut ctx = LintContext::new(&nolint, &settings);
        ctx.report(&FAULTY_ERRORS_AS, span_at(3), "suppressed");
        ctx.report(&FAULTY_ERRORS_AS, span_at(4), "kept");
        let diags = ctx.into_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "kept");
    }

    #[test]
    fn helpers_are_deduplicated() {
        let settings = LintSettings::default().with_helpers([
            HelperTarget::errors_as(),
            HelperTarget::new("golang.org/x/xerrors", "As"),
        ]);
        assert_eq!(
            settings.helpers(),
            &[
                HelperTarget::errors_as(),
                HelperTarget::new("golang.org/x/xerrors", "As")
            ]
        );
    }

    #[test]
    fn filtered_registry_rejects_unknown_names() {
        let err = LintRegistry::default_rules_filtered(&["no_such_lint".to_string()])
            .err()
            .expect("unknown lint must be rejected");
        assert!(matches!(err, LintError::UnknownLint(name) if name == "no_such_lint"));

        let reg = LintRegistry::default_rules_filtered(&["faulty_errorsas".to_string()])
            .expect("known lint");
        assert_eq!(reg.descriptors().count(), 0);
    }
}
