//! Shared front half of every command: load, parse, analyze.

use std::path::PathBuf;

use ruleforge_lib::{Grammar, GrammarBuilder, TransformConfig};

use super::grammar_loader::load_grammar_source;

pub struct PipelineArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub config: TransformConfig,
    pub color: bool,
}

/// Runs the rewrite pipeline, exiting on input errors.
///
/// The returned grammar may still carry error diagnostics.
pub fn run_pipeline(args: &PipelineArgs) -> Grammar {
    let source_map =
        match load_grammar_source(args.grammar_path.as_deref(), args.grammar_text.as_deref()) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        };

    if source_map.iter().all(|s| s.as_str().trim().is_empty()) {
        eprintln!("error: grammar cannot be empty");
        std::process::exit(1);
    }

    match GrammarBuilder::new(source_map)
        .with_config(args.config.clone())
        .parse()
    {
        Ok(parsed) => parsed.analyze(),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Like [`run_pipeline`], but prints diagnostics and exits unless the
/// grammar is valid. Warnings are printed and tolerated.
pub fn run_valid_pipeline(args: &PipelineArgs) -> Grammar {
    let grammar = run_pipeline(args);
    if !grammar.diagnostics().is_empty() {
        eprint!(
            "{}",
            grammar
                .diagnostics()
                .render_colored(grammar.source_map(), args.color)
        );
    }
    if !grammar.is_valid() {
        std::process::exit(1);
    }
    grammar
}

/// Exits with an error when `--rule` names no rule of the grammar.
pub fn require_rule(grammar: &Grammar, name: &str) {
    if grammar.rule(name).is_none() {
        eprintln!("error: no rule named `{}`", name);
        std::process::exit(1);
    }
}
