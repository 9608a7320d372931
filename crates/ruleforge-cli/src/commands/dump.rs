use ruleforge_lib::tree::TreePrinter;

use super::pipeline::{PipelineArgs, require_rule, run_pipeline};

pub struct DumpArgs {
    pub pipeline: PipelineArgs,
    pub rule: Option<String>,
    pub options: bool,
    pub spans: bool,
}

pub fn run(args: DumpArgs) {
    // Dumps are for debugging, so an invalid grammar is still printed.
    let grammar = run_pipeline(&args.pipeline);
    if !grammar.diagnostics().is_empty() {
        eprint!(
            "{}",
            grammar
                .diagnostics()
                .render_colored(grammar.source_map(), args.pipeline.color)
        );
    }

    let mut printer = TreePrinter::new(grammar.tree())
        .with_options(args.options)
        .with_spans(args.spans);
    if let Some(name) = &args.rule {
        require_rule(&grammar, name);
        if let Some(rule) = grammar.rule(name) {
            printer = printer.root(rule.ast);
        }
    }
    print!("{}", printer.dump());

    if !grammar.is_valid() {
        std::process::exit(1);
    }
}
