//! Schema-facing data model for syntax rule validation
//!
//! A schema declares syntax rules against the children of a structure (a
//! segment or a composite element). During streaming parse, the parser
//! materializes the usage state of those children as [`UsageNode`] values
//! collected into a [`StructureView`], which the validation engine reads
//! but never mutates.

use std::fmt;
use std::str::FromStr;

use crate::error::{EdiSyntaxError, Result};

/// The kind of combinatorial constraint a syntax rule declares over its
/// positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxRuleType {
    /// At most one of the positions may be used.
    Single,
    /// All of the positions are used, or none of them.
    Paired,
    /// At least one of the positions must be used.
    Required,
    /// At most one of the positions may be used.
    Exclusion,
    /// If the first position is used, all remaining positions must be used.
    Conditional,
    /// If the first position is used, at least one remaining position must
    /// be used.
    List,
}

impl SyntaxRuleType {
    /// Minimum number of positions a rule of this kind must declare.
    ///
    /// Pairing and grouping rules are meaningless for fewer than two
    /// positions.
    pub fn minimum_positions(&self) -> usize {
        match self {
            Self::Single | Self::Required => 1,
            Self::Paired | Self::Exclusion | Self::Conditional | Self::List => 2,
        }
    }
}

impl fmt::Display for SyntaxRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::Paired => "paired",
            Self::Required => "required",
            Self::Exclusion => "exclusion",
            Self::Conditional => "conditional",
            Self::List => "list",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SyntaxRuleType {
    type Err = EdiSyntaxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(Self::Single),
            "paired" => Ok(Self::Paired),
            "required" => Ok(Self::Required),
            "exclusion" => Ok(Self::Exclusion),
            "conditional" => Ok(Self::Conditional),
            "list" => Ok(Self::List),
            other => Err(EdiSyntaxError::parsing(format!(
                "Unknown syntax rule type: {other}"
            ))),
        }
    }
}

/// A schema-declared syntax rule: a rule kind plus the 1-based positions
/// it governs within one structure.
///
/// Rules are validated on construction so that malformed declarations
/// surface at schema-load time, never as document diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SyntaxRule {
    #[serde(rename = "type")]
    kind: SyntaxRuleType,
    positions: Vec<usize>,
}

impl SyntaxRule {
    /// Create a syntax rule, enforcing the declaration invariants.
    ///
    /// Positions must be non-empty, 1-based, distinct, and at least as
    /// many as the rule kind requires. Position order is preserved; the
    /// first position is the anchor for [`SyntaxRuleType::Conditional`]
    /// and [`SyntaxRuleType::List`] rules.
    pub fn new(kind: SyntaxRuleType, positions: Vec<usize>) -> Result<Self> {
        if let Some(message) = Self::declaration_error(kind, &positions) {
            tracing::debug!(
                %kind,
                ?positions,
                "rejecting syntax rule declaration: {message}"
            );
            return Err(EdiSyntaxError::schema(message));
        }

        Ok(Self { kind, positions })
    }

    fn declaration_error(kind: SyntaxRuleType, positions: &[usize]) -> Option<String> {
        if positions.len() < kind.minimum_positions() {
            return Some(format!(
                "Syntax rule '{kind}' requires at least {} position(s), found {}",
                kind.minimum_positions(),
                positions.len()
            ));
        }

        for (index, &position) in positions.iter().enumerate() {
            if position == 0 {
                return Some(format!(
                    "Syntax rule '{kind}' declares position 0; positions are 1-based"
                ));
            }
            if positions[..index].contains(&position) {
                return Some(format!(
                    "Syntax rule '{kind}' declares duplicate position {position}"
                ));
            }
        }

        None
    }

    pub fn kind(&self) -> SyntaxRuleType {
        self.kind
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

/// The usage state of one child of a structure under validation.
///
/// Produced by the parser/schema-binding layer as it walks a structure's
/// children; read-only to the validation engine and discarded once the
/// structure has been processed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UsageNode {
    position: usize,
    used: bool,
    code: Option<String>,
}

impl UsageNode {
    pub fn new(position: usize, used: bool) -> Self {
        Self {
            position,
            used,
            code: None,
        }
    }

    /// Attach the schema-level identifying code used for diagnostic
    /// attribution.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// 1-based ordinal of this child within its parent structure.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the parser recorded an occurrence for this position. An
    /// empty value still counts as an occurrence.
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// The children of one structure currently closing out, together with the
/// structural context diagnostics are reported against.
///
/// Children appear in document occurrence order, which need not match
/// declared position order; a declared position with no corresponding
/// child is treated as unused.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructureView {
    children: Vec<UsageNode>,
    parent_element: Option<usize>,
    repetition: usize,
}

impl StructureView {
    /// View over a segment's elements. Rule positions are element
    /// positions.
    pub fn segment(children: Vec<UsageNode>) -> Self {
        Self {
            children,
            parent_element: None,
            repetition: 1,
        }
    }

    /// View over a composite's components. Rule positions are component
    /// positions within the element at `element_position`.
    pub fn composite(element_position: usize, children: Vec<UsageNode>) -> Self {
        Self {
            children,
            parent_element: Some(element_position),
            repetition: 1,
        }
    }

    /// Set the 1-based repetition index of the occurrence under
    /// validation. Forwarded unchanged into diagnostics.
    pub fn with_repetition(mut self, repetition: usize) -> Self {
        self.repetition = repetition;
        self
    }

    pub fn children(&self) -> &[UsageNode] {
        &self.children
    }

    /// Look up the child declared at `position`, if the document supplied
    /// one.
    pub fn child_at(&self, position: usize) -> Option<&UsageNode> {
        self.children.iter().find(|node| node.position() == position)
    }

    /// The element position diagnostics carry for the child at
    /// `position`: the position itself for segment children, the parent
    /// element's position for composite components.
    pub fn element_position(&self, position: usize) -> usize {
        self.parent_element.unwrap_or(position)
    }

    /// The component position diagnostics carry for the child at
    /// `position`; `None` for segment children.
    pub fn component_position(&self, position: usize) -> Option<usize> {
        self.parent_element.map(|_| position)
    }

    pub fn repetition(&self) -> usize {
        self.repetition
    }
}
