//! The syntax rule evaluator family
//!
//! One stateless evaluator per rule kind, each implementing the same
//! contract: given a rule and the usage state of one structure's
//! children, report a diagnostic for every violating position. A
//! declared position missing from the structure's children is
//! indistinguishable from one present but unused; [`resolve_slots`]
//! performs that normalization once so no evaluator special-cases
//! missing children.
//!
//! Evaluators hold no per-call state and are safe to share across
//! threads validating independent structures.

use crate::types::{StructureView, SyntaxRule, SyntaxRuleType};
use crate::validation::{StreamEvent, ValidationErrorCode, ValidationHandler};

/// The normalized view of one declared position: its usage state and
/// identifying code, with "absent from children" merged into "unused".
#[derive(Debug, Clone, Copy)]
struct ResolvedSlot<'a> {
    position: usize,
    used: bool,
    code: Option<&'a str>,
}

/// Resolve each declared position against the structure's children, in
/// declared order.
///
/// Linear scan per position; both sequences are bounded by schema
/// element counts, typically well under twenty.
fn resolve_slots<'a>(positions: &[usize], structure: &'a StructureView) -> Vec<ResolvedSlot<'a>> {
    positions
        .iter()
        .map(|&position| match structure.child_at(position) {
            Some(node) => ResolvedSlot {
                position,
                used: node.is_used(),
                code: node.code(),
            },
            None => ResolvedSlot {
                position,
                used: false,
                code: None,
            },
        })
        .collect()
}

fn signal(
    handler: &mut dyn ValidationHandler,
    structure: &StructureView,
    slot: &ResolvedSlot<'_>,
    error: ValidationErrorCode,
) {
    handler.element_error(
        StreamEvent::ElementOccurrenceError,
        error,
        slot.code,
        structure.element_position(slot.position),
        structure.component_position(slot.position),
        structure.repetition(),
    );
}

/// Report every used slot beyond the first used one.
fn signal_excess_used(
    handler: &mut dyn ValidationHandler,
    structure: &StructureView,
    slots: &[ResolvedSlot<'_>],
) {
    let mut tally = 0;
    for slot in slots {
        if slot.used {
            tally += 1;
            if tally > 1 {
                signal(
                    handler,
                    structure,
                    slot,
                    ValidationErrorCode::ExclusionConditionViolated,
                );
            }
        }
    }
}

/// A stateless rule-kind evaluator.
///
/// Evaluation is a pure, single-pass function over the resolved slots:
/// calling twice with identical input produces an identical, identically
/// ordered diagnostic sequence, and well-formed input produces none.
pub trait SyntaxEvaluator: Send + Sync {
    fn evaluate(
        &self,
        rule: &SyntaxRule,
        structure: &StructureView,
        handler: &mut dyn ValidationHandler,
    );
}

/// Look up the evaluator for a rule kind.
///
/// Evaluators are unit values; lookup never fails and requires no
/// synchronization.
pub fn evaluator_for(kind: SyntaxRuleType) -> &'static dyn SyntaxEvaluator {
    match kind {
        SyntaxRuleType::Single => &SingleEvaluator,
        SyntaxRuleType::Paired => &PairedEvaluator,
        SyntaxRuleType::Required => &RequiredEvaluator,
        SyntaxRuleType::Exclusion => &ExclusionEvaluator,
        SyntaxRuleType::Conditional => &ConditionalEvaluator,
        SyntaxRuleType::List => &ListEvaluator,
    }
}

/// Evaluate `rule` against `structure`, reporting violations to
/// `handler` in declared-position order.
pub fn validate(rule: &SyntaxRule, structure: &StructureView, handler: &mut dyn ValidationHandler) {
    tracing::trace!(
        kind = %rule.kind(),
        positions = ?rule.positions(),
        "evaluating syntax rule"
    );
    evaluator_for(rule.kind()).evaluate(rule, structure, handler);
}

/// At least one declared position must be used.
#[derive(Debug)]
pub struct RequiredEvaluator;

impl SyntaxEvaluator for RequiredEvaluator {
    fn evaluate(
        &self,
        rule: &SyntaxRule,
        structure: &StructureView,
        handler: &mut dyn ValidationHandler,
    ) {
        let slots = resolve_slots(rule.positions(), structure);

        if !slots.iter().any(|slot| slot.used) {
            for slot in &slots {
                signal(
                    handler,
                    structure,
                    slot,
                    ValidationErrorCode::ConditionalRequiredDataElementMissing,
                );
            }
        }
    }
}

/// At most one declared position may be used.
#[derive(Debug)]
pub struct ExclusionEvaluator;

impl SyntaxEvaluator for ExclusionEvaluator {
    fn evaluate(
        &self,
        rule: &SyntaxRule,
        structure: &StructureView,
        handler: &mut dyn ValidationHandler,
    ) {
        let slots = resolve_slots(rule.positions(), structure);
        signal_excess_used(handler, structure, &slots);
    }
}

/// If the anchor is used, every remaining position must be used; an
/// unused anchor imposes no constraint.
#[derive(Debug)]
pub struct ConditionalEvaluator;

impl SyntaxEvaluator for ConditionalEvaluator {
    fn evaluate(
        &self,
        rule: &SyntaxRule,
        structure: &StructureView,
        handler: &mut dyn ValidationHandler,
    ) {
        let slots = resolve_slots(rule.positions(), structure);
        let Some((anchor, rest)) = slots.split_first() else {
            return;
        };

        if anchor.used {
            for slot in rest.iter().filter(|slot| !slot.used) {
                signal(
                    handler,
                    structure,
                    slot,
                    ValidationErrorCode::ConditionalRequiredDataElementMissing,
                );
            }
        }
    }
}

/// If the anchor is used, at least one remaining position must be used;
/// an unused anchor imposes no constraint.
#[derive(Debug)]
pub struct ListEvaluator;

impl SyntaxEvaluator for ListEvaluator {
    fn evaluate(
        &self,
        rule: &SyntaxRule,
        structure: &StructureView,
        handler: &mut dyn ValidationHandler,
    ) {
        let slots = resolve_slots(rule.positions(), structure);
        let Some((anchor, rest)) = slots.split_first() else {
            return;
        };

        if anchor.used && !rest.iter().any(|slot| slot.used) {
            for slot in rest {
                signal(
                    handler,
                    structure,
                    slot,
                    ValidationErrorCode::ConditionalRequiredDataElementMissing,
                );
            }
        }
    }
}

/// All declared positions are used together, or none of them.
#[derive(Debug)]
pub struct PairedEvaluator;

impl SyntaxEvaluator for PairedEvaluator {
    fn evaluate(
        &self,
        rule: &SyntaxRule,
        structure: &StructureView,
        handler: &mut dyn ValidationHandler,
    ) {
        let slots = resolve_slots(rule.positions(), structure);
        let used = slots.iter().filter(|slot| slot.used).count();

        if used > 0 && used < slots.len() {
            for slot in slots.iter().filter(|slot| !slot.used) {
                signal(
                    handler,
                    structure,
                    slot,
                    ValidationErrorCode::ConditionalRequiredDataElementMissing,
                );
            }
        }
    }
}

/// At most one position of the declared group may be used; the
/// single-occurrence counterpart of [`ExclusionEvaluator`].
#[derive(Debug)]
pub struct SingleEvaluator;

impl SyntaxEvaluator for SingleEvaluator {
    fn evaluate(
        &self,
        rule: &SyntaxRule,
        structure: &StructureView,
        handler: &mut dyn ValidationHandler,
    ) {
        let slots = resolve_slots(rule.positions(), structure);
        signal_excess_used(handler, structure, &slots);
    }
}
