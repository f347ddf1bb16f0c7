//! Validation events, diagnostics, and the reporting sink
//!
//! The syntax rule engine reports violations as structured events through
//! a [`ValidationHandler`]. It never raises errors for malformed
//! documents; malformed documents are precisely what it reports on.

pub mod syntax;

pub use syntax::{SyntaxEvaluator, evaluator_for, validate};

/// Event category attached to each report.
///
/// Syntax rule violations are element occurrence errors; the category is
/// carried explicitly so sinks shared with the surrounding streaming
/// parser can discriminate event classes on one callback surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamEvent {
    ElementOccurrenceError,
}

/// The specific violation a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationErrorCode {
    /// A `required`, `paired`, `conditional`, or `list` rule position
    /// that must be used but is not.
    ConditionalRequiredDataElementMissing,
    /// An `exclusion` or `single` rule with more than one position used.
    ExclusionConditionViolated,
}

/// Sink for validation reports; the engine's only side-effecting output.
///
/// `element` is the 1-based element position, `component` the component
/// position for composite children, and `repetition` the occurrence
/// index, all forwarded unchanged from the violating slot's structural
/// context. `code` is the violating element's own identifying code, when
/// the schema assigns one.
pub trait ValidationHandler {
    fn element_error(
        &mut self,
        event: StreamEvent,
        error: ValidationErrorCode,
        code: Option<&str>,
        element: usize,
        component: Option<usize>,
        repetition: usize,
    );
}

/// One reported violation, as captured by [`DiagnosticCollector`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub event: StreamEvent,
    pub error: ValidationErrorCode,
    pub code: Option<String>,
    pub element: usize,
    pub component: Option<usize>,
    pub repetition: usize,
}

/// A collecting [`ValidationHandler`] for callers that accumulate
/// diagnostics per structure rather than streaming them onward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ValidationHandler for DiagnosticCollector {
    fn element_error(
        &mut self,
        event: StreamEvent,
        error: ValidationErrorCode,
        code: Option<&str>,
        element: usize,
        component: Option<usize>,
        repetition: usize,
    ) {
        self.diagnostics.push(Diagnostic {
            event,
            error,
            code: code.map(str::to_owned),
            element,
            component,
            repetition,
        });
    }
}
