use rowan::TextRange;

use super::*;
use crate::source_map::{SourceId, SourceMap, Span};

fn span(start: u32, end: u32) -> Span {
    Span::new(SourceId::default(), TextRange::new(start.into(), end.into()))
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedColon, span(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.messages(), vec!["expected `:`"]);
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateRule, span(0, 4))
        .message("expr")
        .emit();

    assert_eq!(diagnostics.messages(), vec!["rule `expr` is already defined"]);
}

#[test]
fn warnings_are_not_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::IllegalOption, span(2, 3))
        .message("foo")
        .emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn identical_diagnostics_are_reported_once() {
    let mut diagnostics = Diagnostics::new();
    for _ in 0..2 {
        diagnostics
            .report(DiagnosticKind::UnknownSimpleAttribute, span(4, 6))
            .message("$x")
            .emit();
    }
    diagnostics
        .report(DiagnosticKind::UnknownSimpleAttribute, span(10, 12))
        .message("$x")
        .emit();

    assert_eq!(diagnostics.len(), 2);

    let mut other = Diagnostics::new();
    other
        .report(DiagnosticKind::UnknownSimpleAttribute, span(4, 6))
        .message("$x")
        .emit();
    diagnostics.extend(other);
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn default_hint_is_attached() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::NoNonLrAlts, span(0, 1))
        .message("e")
        .emit();

    insta::assert_snapshot!(diagnostics.to_string(), @"error at 0..1: left-recursive rule `e` must contain an alternative which is not left recursive (hint: add an alternative that does not start with a reference to the rule itself)");
}

#[test]
fn display_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, span(0, 5))
        .message("block opened here")
        .related_to("opened", span(0, 1))
        .emit();

    insta::assert_snapshot!(diagnostics.to_string(), @"error at 0..5: missing closing `)`; block opened here (related: opened at 0..1)");
}

#[test]
fn printer_with_related_info() {
    let sources = SourceMap::one_liner("hello world!");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, span(0, 5))
        .message("primary")
        .related_to("related info", span(6, 10))
        .emit();

    let result = diagnostics.printer(&sources).render();
    insta::assert_snapshot!(result, @r"
    error: missing closing `)`; primary
      |
    1 | hello world!
      | ^^^^^ ---- related info
    ");
}

#[test]
fn printer_with_path() {
    let mut sources = SourceMap::new();
    sources.add_file("Expr.g4", "hello world");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateRule, span(0, 5))
        .message("hello")
        .emit();

    let result = diagnostics.printer(&sources).render();
    insta::assert_snapshot!(result, @r"
    error: rule `hello` is already defined
     --> Expr.g4:1:1
      |
    1 | hello world
      | ^^^^^
    ");
}

#[test]
fn printer_zero_width_span() {
    let sources = SourceMap::one_liner("hello");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedElement, span(0, 0))
        .message("zero width error")
        .emit();

    let result = diagnostics.printer(&sources).render();
    insta::assert_snapshot!(result, @r"
    error: expected an element: zero width error
      |
    1 | hello
      | ^
    ");
}

#[test]
fn printer_appends_hints() {
    let sources = SourceMap::one_liner("hello");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedSemicolon, span(0, 5))
        .hint("rules end with `;`")
        .emit();

    let result = diagnostics.printer(&sources).render();
    assert!(result.starts_with("error: expected `;`"));
    assert!(result.ends_with("help: rules end with `;`"));
}

#[test]
fn printer_colored() {
    let sources = SourceMap::one_liner("hello");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedRuleName, span(0, 5))
        .message("test")
        .emit();

    let result = diagnostics.printer(&sources).colored(true).render();
    assert!(result.contains("expected rule name"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let sources = SourceMap::one_liner("source");
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.render(&sources).is_empty());
}

#[test]
fn filtered_drops_structural_error_at_root_cause() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, span(4, 12))
        .emit();
    diagnostics
        .report(DiagnosticKind::ExpectedElement, span(4, 5))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].kind, DiagnosticKind::ExpectedElement);
}

#[test]
fn filtered_keeps_root_cause_in_either_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedElement, span(4, 5))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, span(4, 12))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].kind, DiagnosticKind::ExpectedElement);
}

#[test]
fn filtered_drops_contained_lower_priority() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, span(0, 20))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, span(6, 7))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].kind, DiagnosticKind::UnclosedBlock);
}

#[test]
fn filtered_keeps_other_sources_apart() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBlock, span(0, 20))
        .emit();
    diagnostics
        .report(
            DiagnosticKind::UnexpectedToken,
            Span::new(SourceId(1), TextRange::new(6.into(), 7.into())),
        )
        .emit();

    assert_eq!(diagnostics.filtered().len(), 2);
}

#[test]
fn kind_priority() {
    assert!(DiagnosticKind::UnclosedBlock.suppresses(&DiagnosticKind::UnexpectedToken));
    assert!(!DiagnosticKind::ToolError.suppresses(&DiagnosticKind::DuplicateRule));
    assert!(DiagnosticKind::ToolError.is_tool_error());
    assert_eq!(
        DiagnosticKind::UnrecognizedAssocOption.default_severity(),
        Severity::Warning
    );
}
