//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be
//! composed into several commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file, directory of `.g4` files, or `-` for stdin (positional).
pub fn grammar_path_arg() -> Arg {
    Arg::new("grammar_path")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("grammar_text")
        .help("Grammar file, directory of .g4 files, or - for stdin")
}

/// Inline grammar text (-g/--grammar).
pub fn grammar_text_arg() -> Arg {
    Arg::new("grammar_text")
        .short('g')
        .long("grammar")
        .value_name("TEXT")
        .help("Inline grammar text")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Restrict output to one rule (--rule).
pub fn rule_arg() -> Arg {
    Arg::new("rule")
        .long("rule")
        .value_name("NAME")
        .help("Only show this rule")
}

/// Show element options inline (--options).
pub fn options_arg() -> Arg {
    Arg::new("options")
        .long("options")
        .action(ArgAction::SetTrue)
        .help("Show element options inline as <k=v>")
}

/// Show source positions (--spans).
pub fn spans_arg() -> Arg {
    Arg::new("spans")
        .long("spans")
        .action(ArgAction::SetTrue)
        .help("Show source positions")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

/// Element option carrying the precedence level (--precedence-option).
pub fn precedence_option_arg() -> Arg {
    Arg::new("precedence_option")
        .long("precedence-option")
        .value_name("NAME")
        .default_value("p")
        .help("Element option that carries the precedence level")
}

/// Operator predicate template (--predicate).
pub fn predicate_arg() -> Arg {
    Arg::new("predicate")
        .long("predicate")
        .value_name("TEMPLATE")
        .default_value("precpred(_ctx, {prec})")
        .help("Predicate guarding operator alternatives, {prec} is replaced by the level")
}

/// Parser fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .default_value("1000000")
        .value_parser(value_parser!(u32))
        .help("Parser execution fuel limit")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Log level (-v for debug, -vv for trace)")
}
