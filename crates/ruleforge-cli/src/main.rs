mod cli;
mod commands;

use clap::ArgMatches;
use log::LevelFilter;

use cli::{AltsParams, CheckParams, DumpParams, RewriteParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("check", m)) => {
            init_logger(m);
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("rewrite", m)) => {
            init_logger(m);
            let params = RewriteParams::from_matches(m);
            commands::rewrite::run(params.into());
        }
        Some(("dump", m)) => {
            init_logger(m);
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("alts", m)) => {
            init_logger(m);
            let params = AltsParams::from_matches(m);
            commands::alts::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// `RUST_LOG` wins unless `-v`/`-vv` is given.
fn init_logger(m: &ArgMatches) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut logger = env_logger::Builder::from_env(env);
    match m.get_count("verbose") {
        0 => {}
        1 => {
            logger.filter(None, LevelFilter::Debug);
        }
        _ => {
            logger.filter(None, LevelFilter::Trace);
        }
    }
    logger.format_timestamp(None).init();
}
