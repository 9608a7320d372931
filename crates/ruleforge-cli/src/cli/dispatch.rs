//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors pull the fields a command uses
//! - `Into<*Args>` impls bridge dispatch to the command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use ruleforge_lib::TransformConfig;

use super::ColorChoice;
use crate::commands::alts::AltsArgs;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::pipeline::PipelineArgs;
use crate::commands::rewrite::RewriteArgs;

/// Flags every command shares: grammar input and rewrite settings.
pub struct PipelineParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub precedence_option: String,
    pub predicate: String,
    pub fuel: u32,
    pub color: ColorChoice,
}

impl PipelineParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: m.get_one::<PathBuf>("grammar_path").cloned(),
            grammar_text: m.get_one::<String>("grammar_text").cloned(),
            precedence_option: m
                .get_one::<String>("precedence_option")
                .cloned()
                .unwrap_or_else(|| "p".to_owned()),
            predicate: m
                .get_one::<String>("predicate")
                .cloned()
                .unwrap_or_else(|| "precpred(_ctx, {prec})".to_owned()),
            fuel: m.get_one::<u32>("fuel").copied().unwrap_or(1_000_000),
            color: parse_color(m),
        }
    }
}

impl From<PipelineParams> for PipelineArgs {
    fn from(p: PipelineParams) -> Self {
        let config = TransformConfig::new()
            .with_precedence_option(p.precedence_option)
            .with_predicate_template(p.predicate)
            .with_exec_fuel(Some(p.fuel));
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            config,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub pipeline: PipelineParams,
    pub strict: bool,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pipeline: PipelineParams::from_matches(m),
            strict: m.get_flag("strict"),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            pipeline: p.pipeline.into(),
            strict: p.strict,
        }
    }
}

pub struct RewriteParams {
    pub pipeline: PipelineParams,
    pub rule: Option<String>,
}

impl RewriteParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pipeline: PipelineParams::from_matches(m),
            rule: m.get_one::<String>("rule").cloned(),
        }
    }
}

impl From<RewriteParams> for RewriteArgs {
    fn from(p: RewriteParams) -> Self {
        Self {
            pipeline: p.pipeline.into(),
            rule: p.rule,
        }
    }
}

pub struct DumpParams {
    pub pipeline: PipelineParams,
    pub rule: Option<String>,
    pub options: bool,
    pub spans: bool,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pipeline: PipelineParams::from_matches(m),
            rule: m.get_one::<String>("rule").cloned(),
            options: m.get_flag("options"),
            spans: m.get_flag("spans"),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            pipeline: p.pipeline.into(),
            rule: p.rule,
            options: p.options,
            spans: p.spans,
        }
    }
}

pub struct AltsParams {
    pub pipeline: PipelineParams,
    pub rule: Option<String>,
    pub json: bool,
}

impl AltsParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pipeline: PipelineParams::from_matches(m),
            rule: m.get_one::<String>("rule").cloned(),
            json: m.get_flag("json"),
        }
    }
}

impl From<AltsParams> for AltsArgs {
    fn from(p: AltsParams) -> Self {
        Self {
            pipeline: p.pipeline.into(),
            rule: p.rule,
            json: p.json,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(String::as_str) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
