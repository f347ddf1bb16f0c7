//! # EDI Syntax Rule Validation
//!
//! A validation engine for the syntax rules EDI schemas declare over the
//! children of a segment or composite element. A streaming parser hands
//! the engine the usage state of one structure's children as it closes
//! the structure out; the engine evaluates each declared rule and reports
//! one diagnostic per violating position through a caller-supplied sink.
//!
//! ## Features
//!
//! - **Six rule kinds**: single, paired, required, exclusion, conditional,
//!   and list constraints over 1-based element/component positions
//! - **Per-position diagnostics**: each violation names its own position
//!   and identifying code, never a batched generic failure
//! - **Stateless evaluators**: safe to reuse concurrently across
//!   structures, with no cross-call state
//! - **Fail-fast schema checks**: malformed rule declarations are
//!   rejected at construction, never reported as document errors
//!
//! ## Quick Start
//!
//! ```rust
//! use edi_syntax::*;
//!
//! # fn example() -> Result<()> {
//! // A paired rule: positions 1, 3, and 4 are used together or not at all
//! let rule = SyntaxRule::new(SyntaxRuleType::Paired, vec![1, 3, 4])?;
//!
//! let structure = StructureView::segment(vec![
//!     UsageNode::new(1, true),
//!     UsageNode::new(2, false),
//!     UsageNode::new(3, true),
//!     UsageNode::new(4, true),
//! ]);
//!
//! let mut handler = DiagnosticCollector::new();
//! validation::validate(&rule, &structure, &mut handler);
//! assert!(handler.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod error;
pub mod types;
pub mod validation;

pub use error::Result; // Our Result type takes precedence
pub use error::EdiSyntaxError;
pub use types::{StructureView, SyntaxRule, SyntaxRuleType, UsageNode};
pub use validation::{
    Diagnostic, DiagnosticCollector, StreamEvent, SyntaxEvaluator, ValidationErrorCode,
    ValidationHandler, evaluator_for,
};
