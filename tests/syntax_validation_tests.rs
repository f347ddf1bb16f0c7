use edi_syntax::*;

fn node(position: usize, used: bool) -> UsageNode {
    UsageNode::new(position, used)
}

#[test]
fn test_rule_construction_rejects_bad_declarations() {
    // Pairing rules need at least two positions
    let err = SyntaxRule::new(SyntaxRuleType::Paired, vec![1]).unwrap_err();
    assert!(matches!(err, EdiSyntaxError::Schema { .. }));

    // Positions are 1-based and distinct
    assert!(SyntaxRule::new(SyntaxRuleType::Conditional, vec![0, 2]).is_err());
    assert!(SyntaxRule::new(SyntaxRuleType::List, vec![2, 2]).is_err());

    // A single-position required rule is well formed
    assert!(SyntaxRule::new(SyntaxRuleType::Required, vec![3]).is_ok());
}

#[test]
fn test_rule_type_parsing_from_schema_tokens() {
    for (token, kind) in [
        ("single", SyntaxRuleType::Single),
        ("paired", SyntaxRuleType::Paired),
        ("required", SyntaxRuleType::Required),
        ("exclusion", SyntaxRuleType::Exclusion),
        ("conditional", SyntaxRuleType::Conditional),
        ("list", SyntaxRuleType::List),
    ] {
        assert_eq!(token.parse::<SyntaxRuleType>().unwrap(), kind);
        assert_eq!(kind.to_string(), token);
    }

    let err = "optional".parse::<SyntaxRuleType>().unwrap_err();
    assert!(matches!(err, EdiSyntaxError::Parsing { .. }));
}

#[test]
fn test_paired_rule_reports_each_unused_position() {
    let rule = SyntaxRule::new(SyntaxRuleType::Paired, vec![1, 3, 4]).unwrap();

    // Position 4 is entirely absent from the document
    let structure = StructureView::segment(vec![
        node(1, false).with_code("E001"),
        node(2, false),
        node(3, true),
    ]);

    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &structure, &mut handler);

    let diagnostics = handler.diagnostics();
    assert_eq!(diagnostics.len(), 2);

    assert_eq!(diagnostics[0].element, 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("E001"));
    assert_eq!(diagnostics[1].element, 4);
    assert_eq!(diagnostics[1].code, None);

    for diagnostic in diagnostics {
        assert_eq!(diagnostic.event, StreamEvent::ElementOccurrenceError);
        assert_eq!(
            diagnostic.error,
            ValidationErrorCode::ConditionalRequiredDataElementMissing
        );
        assert_eq!(diagnostic.component, None);
        assert_eq!(diagnostic.repetition, 1);
    }
}

#[test]
fn test_required_rule_reports_every_position_as_missing() {
    let rule = SyntaxRule::new(SyntaxRuleType::Required, vec![1, 2]).unwrap();
    let structure = StructureView::segment(vec![node(1, false), node(2, false)]);

    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &structure, &mut handler);

    assert_eq!(handler.error_count(), 2);
    for diagnostic in handler.diagnostics() {
        assert_eq!(
            diagnostic.error,
            ValidationErrorCode::ConditionalRequiredDataElementMissing
        );
    }
}

#[test]
fn test_conditional_rule_gated_by_anchor() {
    let rule = SyntaxRule::new(SyntaxRuleType::Conditional, vec![5, 1, 2]).unwrap();

    // Anchor unused: the state of the remaining positions is irrelevant
    let gated = StructureView::segment(vec![node(1, true), node(2, false), node(5, false)]);
    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &gated, &mut handler);
    assert!(handler.is_empty());

    // Anchor used: every unused remaining position is reported
    let open = StructureView::segment(vec![node(1, true), node(2, false), node(5, true)]);
    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &open, &mut handler);
    let positions: Vec<usize> = handler.diagnostics().iter().map(|d| d.element).collect();
    assert_eq!(positions, vec![2]);
}

#[test]
fn test_list_rule_needs_one_companion() {
    let rule = SyntaxRule::new(SyntaxRuleType::List, vec![2, 4, 6]).unwrap();

    let alone = StructureView::segment(vec![node(2, true)]);
    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &alone, &mut handler);
    let positions: Vec<usize> = handler.diagnostics().iter().map(|d| d.element).collect();
    assert_eq!(positions, vec![4, 6]);

    let accompanied = StructureView::segment(vec![node(2, true), node(6, true)]);
    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &accompanied, &mut handler);
    assert!(handler.is_empty());
}

#[test]
fn test_exclusion_and_single_flag_excess_use() {
    for kind in [SyntaxRuleType::Exclusion, SyntaxRuleType::Single] {
        let rule = SyntaxRule::new(kind, vec![1, 2, 3]).unwrap();
        let structure = StructureView::segment(vec![node(1, true), node(3, true)]);

        let mut handler = DiagnosticCollector::new();
        validation::validate(&rule, &structure, &mut handler);

        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.diagnostics()[0].element, 3);
        assert_eq!(
            handler.diagnostics()[0].error,
            ValidationErrorCode::ExclusionConditionViolated
        );
    }
}

#[test]
fn test_evaluator_reuse_across_structures() {
    // Singleton evaluators carry no state between calls
    let evaluator = evaluator_for(SyntaxRuleType::Paired);
    let rule = SyntaxRule::new(SyntaxRuleType::Paired, vec![1, 2]).unwrap();

    let broken = StructureView::segment(vec![node(1, true), node(2, false)]);
    let mut first = DiagnosticCollector::new();
    evaluator.evaluate(&rule, &broken, &mut first);
    assert_eq!(first.error_count(), 1);

    let intact = StructureView::segment(vec![node(1, true), node(2, true)]);
    let mut second = DiagnosticCollector::new();
    evaluator.evaluate(&rule, &intact, &mut second);
    assert!(second.is_empty());

    let mut third = DiagnosticCollector::new();
    evaluator.evaluate(&rule, &broken, &mut third);
    assert_eq!(third.diagnostics(), first.diagnostics());
}

#[test]
fn test_composite_diagnostics_forward_caller_context() {
    let rule = SyntaxRule::new(SyntaxRuleType::Required, vec![1, 2]).unwrap();
    let structure =
        StructureView::composite(7, vec![node(1, false), node(2, false)]).with_repetition(3);

    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &structure, &mut handler);

    let diagnostics = handler.diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].element, 7);
    assert_eq!(diagnostics[0].component, Some(1));
    assert_eq!(diagnostics[1].component, Some(2));
    for diagnostic in diagnostics {
        assert_eq!(diagnostic.repetition, 3);
    }
}

#[test]
fn test_diagnostic_serialization() {
    let rule = SyntaxRule::new(SyntaxRuleType::Paired, vec![1, 2]).unwrap();
    let structure = StructureView::segment(vec![node(1, true)]);

    let mut handler = DiagnosticCollector::new();
    validation::validate(&rule, &structure, &mut handler);

    let json = serde_json::to_string(handler.diagnostics()).unwrap();
    assert!(json.contains("element-occurrence-error"));
    assert!(json.contains("conditional-required-data-element-missing"));

    let back: Vec<Diagnostic> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, handler.into_diagnostics());
}
