use super::pipeline::{PipelineArgs, run_pipeline};

pub struct CheckArgs {
    pub pipeline: PipelineArgs,
    pub strict: bool,
}

pub fn run(args: CheckArgs) {
    let grammar = run_pipeline(&args.pipeline);
    let diagnostics = grammar.diagnostics();

    let is_valid = if args.strict {
        !diagnostics.has_errors() && !diagnostics.has_warnings()
    } else {
        grammar.is_valid()
    };

    if !diagnostics.is_empty() {
        eprint!(
            "{}",
            diagnostics.render_colored(grammar.source_map(), args.pipeline.color)
        );
    }
    if !is_valid {
        std::process::exit(1);
    }

    log::info!(
        "{} rule(s) rewritten",
        grammar.left_recursive_rules().len()
    );
}
