use ruleforge_lib::{Grammar, GrammarBuilder};

use super::alts::{collect_reports, render_table};

fn analyze(src: &str) -> Grammar {
    let grammar = GrammarBuilder::one_liner(src).parse().unwrap().analyze();
    assert!(grammar.is_valid(), "{}", grammar.diagnostics());
    grammar
}

#[test]
fn table() {
    let grammar = analyze("e : e '*' e | e '+' e | INT ; s : e ';' ;");
    let reports = collect_reports(&grammar, None);

    insta::assert_snapshot!(render_table(&reports), @r"
    e
      alt  kind     prec  next  assoc  alternative
      1    binary   3     4     left   '*'<tokenIndex=6> e<tokenIndex=8,p=4>
      2    binary   2     3     left   '+'<tokenIndex=14> e<tokenIndex=16,p=3>
      3    other    1     -     left   INT<tokenIndex=20>
    ");
}

#[test]
fn table_shows_alt_labels() {
    let grammar = analyze("e : e '^' e # Pow | INT # Lit ;");
    let table = render_table(&collect_reports(&grammar, None));
    assert!(table.contains("  # Pow\n"), "{table}");
    assert!(table.contains("  # Lit\n"), "{table}");
}

#[test]
fn only_selected_rule() {
    let grammar = analyze("a : a '+' a | A ; b : b '*' b | B ;");
    assert_eq!(collect_reports(&grammar, None).len(), 2);

    let reports = collect_reports(&grammar, Some("b"));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].rule, "b");
}

#[test]
fn plain_rules_have_no_report() {
    let grammar = analyze("s : A ; e : e '+' e | INT ;");
    assert!(collect_reports(&grammar, Some("s")).is_empty());
}

#[test]
fn json_shape() {
    let grammar = analyze("e : <assoc=right> e '^' e | '-' e | INT ;");
    let reports = collect_reports(&grammar, None);
    let json: serde_json::Value = serde_json::to_value(&reports).unwrap();

    let rule = &json[0];
    assert_eq!(rule["rule"], "e");
    assert_eq!(rule["flagged"], false);

    let alts = rule["alts"].as_array().unwrap();
    assert_eq!(alts.len(), 3);
    assert_eq!(alts[0]["alt"], 1);
    assert_eq!(alts[0]["kind"], "binary");
    assert_eq!(alts[0]["assoc"], "right");
    assert_eq!(alts[0]["precedence"], 3);
    assert_eq!(alts[0]["next_precedence"], 3);
    assert_eq!(alts[1]["kind"], "prefix");
    assert_eq!(alts[1]["next_precedence"], 2);
    assert_eq!(alts[2]["kind"], "other");
    assert!(alts[2]["next_precedence"].is_null());
    assert!(alts[0].get("original_alt").is_none());
}
