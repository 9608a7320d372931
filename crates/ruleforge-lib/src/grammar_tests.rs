use indoc::indoc;

use crate::config::TransformConfig;
use crate::diagnostics::DiagnosticKind;
use crate::source_map::SourceMap;
use crate::tree::{NodeKind, OptionValue};
use crate::{Error, GrammarBuilder, RuleOutcome};

#[test]
fn full_grammar() {
    let src = indoc! {"
        grammar Expr;

        prog : stat+ ;
        stat : e ';' | ID '=' e ';' ;
        e : e ('*'|'/') e
          | e ('+'|'-') e
          | '(' e ')'
          | INT
          | ID
          ;

        INT : [0-9]+ ;
        ID : [a-z]+ ;
        WS : [ \\t\\n]+ -> skip ;
    "};
    let grammar = GrammarBuilder::one_liner(src).parse().unwrap().analyze();
    assert!(grammar.is_valid(), "{}", grammar.diagnostics());

    let outcomes: Vec<_> = grammar.summary().outcomes().collect();
    assert_eq!(
        outcomes,
        vec![
            ("prog", RuleOutcome::NotLeftRecursive),
            ("stat", RuleOutcome::NotLeftRecursive),
            ("e", RuleOutcome::Transformed),
        ]
    );
    assert!(grammar.summary().is_left_recursive("e"));
    assert!(grammar.rule("e").unwrap().is_left_recursive());
    assert_eq!(grammar.rules().len(), 6);

    let tree = grammar.tree();
    let stat = grammar.rule("stat").unwrap();
    for call in tree.nodes_with_kind(stat.ast, &[NodeKind::RuleRef]) {
        assert_eq!(tree.node(call).option("p"), Some(&OptionValue::Int(0)));
    }
}

#[test]
fn blocks_inside_operators_survive() {
    let src = "e : e ('*'|'/') e | INT ;";
    let grammar = GrammarBuilder::one_liner(src).parse().unwrap().analyze();
    assert!(grammar.is_valid(), "{}", grammar.diagnostics());
    let text = grammar.rule_text("e").unwrap();
    assert!(
        text.contains("{precpred(_ctx, 2)}?<p=2> ('*'<tokenIndex=7>|'/'<tokenIndex=9>) e<tokenIndex=12,p=3>"),
        "{text}"
    );
}

#[test]
fn syntax_errors_skip_rewrite() {
    let parsed = GrammarBuilder::one_liner("e : e '+' e | INT ; s : ( e ;")
        .parse()
        .unwrap();
    assert!(!parsed.is_valid());

    let grammar = parsed.analyze();
    assert!(grammar.left_recursive_rules().is_empty());
    assert_eq!(grammar.summary().outcomes().count(), 0);
    assert_eq!(grammar.rule_text("e"), None);
    assert!(grammar.diagnostics().has_kind(DiagnosticKind::UnclosedBlock));
}

#[test]
fn invalid_grammar_into_result() {
    let parsed = GrammarBuilder::one_liner("e : e '+' e | INT")
        .parse()
        .unwrap();
    let Err(Error::GrammarParseError(diagnostics)) = parsed.into_valid() else {
        panic!("expected a parse error");
    };
    assert_eq!(diagnostics.kinds(), vec![DiagnosticKind::ExpectedSemicolon]);

    let grammar = GrammarBuilder::one_liner("e : e '+' e ;")
        .parse()
        .unwrap()
        .analyze();
    let Err(Error::GrammarAnalyzeError(diagnostics)) = grammar.into_valid() else {
        panic!("expected an analysis error");
    };
    assert_eq!(diagnostics.error_count(), 1);
}

#[test]
fn several_sources() {
    let mut sources = SourceMap::new();
    sources.add_file("expr.g4", "e : e '+' e | INT ;");
    sources.add_file("stmt.g4", "s : e ';' ;");

    let grammar = GrammarBuilder::new(sources).parse().unwrap().analyze();
    assert!(grammar.is_valid(), "{}", grammar.diagnostics());
    assert_eq!(grammar.tree().roots().len(), 2);

    let tree = grammar.tree();
    let call = tree.nodes_with_kind(grammar.rule("s").unwrap().ast, &[NodeKind::RuleRef])[0];
    assert_eq!(tree.node(call).option("p"), Some(&OptionValue::Int(0)));
    // the rewritten rule is registered as a source of its own
    assert_eq!(grammar.source_map().len(), 3);
}

#[test]
fn duplicate_rules_keep_first() {
    let grammar = GrammarBuilder::one_liner("e : e '+' e | INT ; e : ID ;")
        .parse()
        .unwrap()
        .analyze();
    assert_eq!(grammar.diagnostics().kinds(), vec![DiagnosticKind::DuplicateRule]);
    assert_eq!(grammar.summary().outcome("e"), None);
}

#[test]
fn out_of_fuel() {
    let config = TransformConfig::new().with_exec_fuel(Some(4));
    let result = GrammarBuilder::one_liner("e : e '+' e | INT ;")
        .with_config(config)
        .parse();
    assert!(matches!(result, Err(Error::ExecFuelExhausted)));
}

#[test]
fn diagnostics_render_against_sources() {
    let grammar = GrammarBuilder::one_liner("e : e '+' e ;")
        .parse()
        .unwrap()
        .analyze();
    let rendered = grammar.diagnostics().render(grammar.source_map());
    assert!(rendered.contains("left-recursive rule `e` must contain an alternative which is not left recursive"));
    assert!(rendered.contains("e : e '+' e ;"));
}

#[test]
fn warnings_keep_grammar_valid() {
    let grammar = GrammarBuilder::one_liner("a : <assoc=right> A | B ;")
        .parse()
        .unwrap()
        .analyze();
    assert!(grammar.is_valid());
    assert_eq!(
        grammar.diagnostics().kinds(),
        vec![DiagnosticKind::UnrecognizedAssocOption]
    );
}
