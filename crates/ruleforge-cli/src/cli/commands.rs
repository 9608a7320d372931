//! Command builders for the CLI.
//!
//! Every command reads a grammar the same way and runs the full rewrite
//! pipeline, so input, transform and logging flags are shared.

use clap::Command;

use super::args::*;

/// Grammar input, rewrite settings and logging.
fn with_pipeline_args(cmd: Command) -> Command {
    cmd.arg(grammar_path_arg())
        .arg(grammar_text_arg())
        .arg(precedence_option_arg())
        .arg(predicate_arg())
        .arg(fuel_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("ruleforge")
        .about("Left-recursion elimination for ANTLR-style grammars")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(rewrite_command())
        .subcommand(dump_command())
        .subcommand(alts_command())
}

/// Validate a grammar, including the rewritten rules.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Validate a grammar")
        .override_usage(
            "\
  ruleforge check <GRAMMAR>
  ruleforge check -g <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  ruleforge check Expr.g4                  # validate one file
  ruleforge check grammars/                # every .g4 file in a directory
  ruleforge check -g 'e : e '\''+'\'' e | INT ;'   # inline grammar
  cat Expr.g4 | ruleforge check -          # stdin"#,
        )
        .arg(strict_arg());

    with_pipeline_args(cmd)
}

/// Print rewritten left-recursive rules.
pub fn rewrite_command() -> Command {
    let cmd = Command::new("rewrite")
        .about("Print left-recursive rules in precedence-climbing form")
        .override_usage(
            "\
  ruleforge rewrite <GRAMMAR> [--rule <NAME>]
  ruleforge rewrite -g <TEXT> [--rule <NAME>]",
        )
        .after_help(
            r#"EXAMPLES:
  ruleforge rewrite Expr.g4                # all rewritten rules
  ruleforge rewrite Expr.g4 --rule expr    # a single rule
  ruleforge rewrite Expr.g4 --predicate 'precedence >= {prec}'"#,
        )
        .arg(rule_arg());

    with_pipeline_args(cmd)
}

/// Print the grammar tree after the rewrite.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show the grammar tree after the rewrite")
        .override_usage(
            "\
  ruleforge dump <GRAMMAR> [--rule <NAME>]
  ruleforge dump -g <TEXT> [--rule <NAME>]",
        )
        .after_help(
            r#"EXAMPLES:
  ruleforge dump Expr.g4                   # whole tree
  ruleforge dump Expr.g4 --rule expr       # one rule
  ruleforge dump Expr.g4 --options --spans # with options and positions"#,
        )
        .arg(rule_arg())
        .arg(options_arg())
        .arg(spans_arg());

    with_pipeline_args(cmd)
}

/// Print precedence and associativity of rewritten alternatives.
pub fn alts_command() -> Command {
    let cmd = Command::new("alts")
        .about("Show precedence and associativity of left-recursive alternatives")
        .override_usage(
            "\
  ruleforge alts <GRAMMAR> [--rule <NAME>] [--json]
  ruleforge alts -g <TEXT> [--rule <NAME>] [--json]",
        )
        .after_help(
            r#"EXAMPLES:
  ruleforge alts Expr.g4                   # table
  ruleforge alts Expr.g4 --json | jq .     # JSON"#,
        )
        .arg(rule_arg())
        .arg(json_arg());

    with_pipeline_args(cmd)
}
