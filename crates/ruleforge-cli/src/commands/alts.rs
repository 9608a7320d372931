use std::fmt::Write;

use ruleforge_lib::Grammar;
use ruleforge_lib::leftrec::LeftRecursiveAltInfo;
use serde::Serialize;

use super::pipeline::{PipelineArgs, require_rule, run_valid_pipeline};

pub struct AltsArgs {
    pub pipeline: PipelineArgs,
    pub rule: Option<String>,
    pub json: bool,
}

/// Alternatives of one rewritten rule, in the order they were written.
#[derive(Debug, Serialize)]
pub struct RuleAlts<'g> {
    pub rule: &'g str,
    pub flagged: bool,
    pub alts: Vec<&'g LeftRecursiveAltInfo>,
}

pub fn run(args: AltsArgs) {
    let grammar = run_valid_pipeline(&args.pipeline);
    if let Some(name) = &args.rule {
        require_rule(&grammar, name);
    }

    let reports = collect_reports(&grammar, args.rule.as_deref());
    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    print!("{}", render_table(&reports));
}

pub fn collect_reports<'g>(grammar: &'g Grammar, only: Option<&str>) -> Vec<RuleAlts<'g>> {
    grammar
        .rules()
        .values()
        .filter(|rule| only.is_none_or(|name| rule.name == name))
        .filter_map(|rule| {
            let lr = rule.left_recursive.as_ref()?;
            Some(RuleAlts {
                rule: &rule.name,
                flagged: lr.flagged,
                alts: lr.alts_by_index(),
            })
        })
        .collect()
}

pub fn render_table(reports: &[RuleAlts<'_>]) -> String {
    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let note = if report.flagged {
            " (conflicting associativity)"
        } else {
            ""
        };
        writeln!(out, "{}{}", report.rule, note).expect("String write never fails");
        writeln!(
            out,
            "  {:<4} {:<8} {:<5} {:<5} {:<6} alternative",
            "alt", "kind", "prec", "next", "assoc"
        )
        .expect("String write never fails");
        for alt in &report.alts {
            let next = alt
                .next_precedence
                .map_or_else(|| "-".to_owned(), |p| p.to_string());
            write!(
                out,
                "  {:<4} {:<8} {:<5} {:<5} {:<6} {}",
                alt.alt,
                alt.kind.to_string(),
                alt.precedence,
                next,
                alt.assoc.to_string(),
                alt.alt_text
            )
            .expect("String write never fails");
            if let Some(label) = &alt.alt_label {
                write!(out, "  # {}", label).expect("String write never fails");
            }
            out.push('\n');
        }
    }
    out
}
