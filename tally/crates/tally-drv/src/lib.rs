//! tally-drv - The document orchestrator.
//!
//! Wires the pipeline per line: preprocess → lex → parse → prune →
//! select → normalize → evaluate → format. Tracks the variable scope
//! across lines, aggregates diagnostics per phase, and exposes the
//! caller API: [`Calculator::calculate`], [`Calculator::parse`],
//! [`Calculator::load_exchange_rates`], [`Calculator::set_user_locale`].

pub mod preprocess;
pub mod scope;

use std::sync::Arc;

use tracing::debug;

use tally_data::{RatesInput, RatesSnapshot, ReferenceIndex, Region};
use tally_eval::temporal::Instant;
use tally_eval::{evaluate, EvalCx, Value};
use tally_fmt::Formatter;
use tally_lex::Lexer;
use tally_par::{parse_line, prune, select, NodeRef};
use tally_sem::{Expr, ExprKind, Normalizer};
use tally_util::{Diagnostic, Diagnostics, Phase, Settings, Span};

pub use preprocess::{preprocess, LineKind, PreprocessedLine};
pub use scope::Scope;

/// Classification of one evaluated line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineResultKind {
    ExpressionLine,
    VariableDefinition,
    PlainText,
    Heading,
    EmptyLine,
}

/// One line's outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct LineResult {
    /// 1-indexed line number
    pub line: u32,
    pub kind: LineResultKind,
    /// The rendered result, `Error: …` included; `None` for empty
    /// lines, plain text, and successful definitions
    pub rendered: Option<String>,
    pub has_error: bool,
}

/// Diagnostics aggregated per phase.
#[derive(Clone, Debug, Default)]
pub struct PhaseErrors {
    pub lexer: Vec<Diagnostic>,
    pub parser: Vec<Diagnostic>,
    pub runtime: Vec<Diagnostic>,
}

impl PhaseErrors {
    fn absorb(&mut self, diags: Diagnostics) {
        for diag in diags.entries() {
            match diag.phase {
                Phase::Lexer => self.lexer.push(diag.clone()),
                Phase::Parser => self.parser.push(diag.clone()),
                Phase::Runtime => self.runtime.push(diag.clone()),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lexer.is_empty() && self.parser.is_empty() && self.runtime.is_empty()
    }
}

/// Output of [`Calculator::calculate`].
#[derive(Clone, Debug)]
pub struct CalcOutput {
    pub results: Vec<LineResult>,
    pub errors: PhaseErrors,
}

/// Output of [`Calculator::parse`]: the pipeline stopped after
/// normalization.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    /// One normalized expression per line; `None` for empty, heading,
    /// and unparseable lines
    pub ast: Vec<Option<Expr>>,
    pub errors: PhaseErrors,
}

/// A notebook calculator over a shared reference index.
///
/// The index is immutable and freely shared; each calculator owns its
/// presentation settings, locale, and the most recently installed
/// exchange-rate snapshot. Documents re-run deterministically: `now`
/// is sampled once per run.
pub struct Calculator {
    index: Arc<ReferenceIndex>,
    settings: Settings,
    rates: Option<RatesSnapshot>,
    locale: Option<String>,
}

impl Calculator {
    /// A calculator over the embedded reference data.
    pub fn new() -> Self {
        Self::with_index(Arc::new(ReferenceIndex::builtin()))
    }

    /// A calculator over a caller-provided index.
    pub fn with_index(index: Arc<ReferenceIndex>) -> Self {
        Self {
            index,
            settings: Settings::default(),
            rates: None,
            locale: None,
        }
    }

    /// Replace the presentation settings for subsequent runs.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Install an exchange-rate snapshot; takes effect on the next
    /// evaluation.
    pub fn load_exchange_rates(&mut self, input: RatesInput) {
        self.rates = Some(RatesSnapshot::from_input(input));
    }

    /// Set the user locale region (`"US"`, `"GB"`, …); affects
    /// regional unit variants and timezone alias preference from the
    /// next evaluation.
    pub fn set_user_locale(&mut self, region: impl Into<String>) {
        self.locale = Some(region.into());
    }

    /// Evaluate a whole document.
    pub fn calculate(&self, document: &str) -> CalcOutput {
        self.run(document, Instant::now())
    }

    /// Evaluate with a fixed `now`, for deterministic replay.
    pub fn calculate_at(&self, document: &str, now: Instant) -> CalcOutput {
        self.run(document, now)
    }

    fn run(&self, document: &str, now: Instant) -> CalcOutput {
        let mut results = Vec::new();
        let mut errors = PhaseErrors::default();
        let mut scope = Scope::new();
        let formatter = Formatter::new(&self.index, &self.settings);
        let region = self
            .locale
            .as_deref()
            .map(Region::from_locale)
            .unwrap_or_default();

        for line in preprocess(document) {
            let result = match &line.kind {
                LineKind::Empty => LineResult {
                    line: line.number,
                    kind: LineResultKind::EmptyLine,
                    rendered: None,
                    has_error: false,
                },
                LineKind::Heading { text, .. } => LineResult {
                    line: line.number,
                    kind: LineResultKind::Heading,
                    rendered: Some(text.clone()),
                    has_error: false,
                },
                LineKind::Expression { content } => {
                    self.run_expression(&line, content, &mut scope, &mut errors, &formatter, region, now)
                }
            };
            debug!(line = line.number, kind = ?result.kind, "evaluated line");
            results.push(result);
        }
        CalcOutput { results, errors }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_expression(
        &self,
        line: &PreprocessedLine,
        content: &str,
        scope: &mut Scope,
        errors: &mut PhaseErrors,
        formatter: &Formatter<'_>,
        region: Region,
        now: Instant,
    ) -> LineResult {
        let (expr, failed) = self.analyze(line, content, &scope.names(), errors);
        let Some(expr) = expr else {
            return LineResult {
                line: line.number,
                kind: LineResultKind::PlainText,
                rendered: None,
                has_error: failed,
            };
        };

        let cx = EvalCx {
            index: &self.index,
            region,
            rates: self.rates.as_ref(),
            angle_unit: self.settings.angle_unit,
            now,
        };
        let value = evaluate(&expr, &cx, &*scope);

        let has_error = value.is_error();
        if let Value::Error(e) = &value {
            errors.runtime.push(Diagnostic::error(
                Phase::Runtime,
                e.message.clone(),
                e.span,
            ));
        }

        if let ExprKind::Assignment { name, .. } = &expr.kind {
            if !has_error {
                scope.define(name.clone(), value);
                return LineResult {
                    line: line.number,
                    kind: LineResultKind::VariableDefinition,
                    rendered: None,
                    has_error: false,
                };
            }
            return LineResult {
                line: line.number,
                kind: LineResultKind::VariableDefinition,
                rendered: Some(formatter.format(&value)),
                has_error: true,
            };
        }

        LineResult {
            line: line.number,
            kind: LineResultKind::ExpressionLine,
            rendered: Some(formatter.format(&value)),
            has_error,
        }
    }

    /// Lex, parse, prune, select, and normalize one expression line.
    /// Returns the normalized expression, or `None` with `true` when
    /// diagnostics were recorded (plain text surface).
    fn analyze(
        &self,
        line: &PreprocessedLine,
        content: &str,
        defined: &rustc_hash::FxHashSet<String>,
        errors: &mut PhaseErrors,
    ) -> (Option<Expr>, bool) {
        if content.is_empty() {
            return (None, false);
        }
        let (tokens, lex_diags) = Lexer::new(content, line.number, line.offset).tokenize();
        let lex_failed = lex_diags.has_errors();
        errors.absorb(lex_diags);
        if lex_failed {
            // An untokenizable character turns the line into plain
            // text; the diagnostic already carries the span.
            return (None, true);
        }

        let candidates = parse_line(&tokens, &self.index);
        let line_span = Span::new(
            line.offset,
            line.offset + content.len(),
            line.number,
            1,
        );
        if candidates.is_empty() {
            errors.parser.push(Diagnostic::error(
                Phase::Parser,
                format!("could not parse `{}`", content.trim()),
                line_span,
            ));
            return (None, true);
        }

        let outcome = prune(candidates, defined);
        if outcome.kept.is_empty() {
            let (name, span) = outcome
                .first_undefined
                .unwrap_or_else(|| ("?".to_string(), line_span));
            errors.parser.push(Diagnostic::error(
                Phase::Parser,
                format!("unknown variable `{name}`"),
                span,
            ));
            return (None, true);
        }

        let selected: NodeRef = select(&outcome.kept, &self.index, defined)
            .expect("non-empty candidate set always selects");
        let normalizer = Normalizer::new(&self.index, self.locale.as_deref());
        (Some(normalizer.lower(&selected)), false)
    }

    /// Run the pipeline up to normalization, collecting the per-line
    /// AST and lexer/parser diagnostics.
    pub fn parse(&self, document: &str) -> ParseOutput {
        let mut ast = Vec::new();
        let mut errors = PhaseErrors::default();
        let mut defined = rustc_hash::FxHashSet::default();

        for line in preprocess(document) {
            match &line.kind {
                LineKind::Empty | LineKind::Heading { .. } => ast.push(None),
                LineKind::Expression { content } => {
                    let (expr, _) = self.analyze(&line, content, &defined, &mut errors);
                    if let Some(expr) = &expr {
                        if let ExprKind::Assignment { name, .. } = &expr.kind {
                            defined.insert(name.clone());
                        }
                    }
                    ast.push(expr);
                }
            }
        }
        ParseOutput { ast, errors }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}
