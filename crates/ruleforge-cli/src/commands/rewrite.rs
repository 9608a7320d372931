use super::pipeline::{PipelineArgs, require_rule, run_valid_pipeline};

pub struct RewriteArgs {
    pub pipeline: PipelineArgs,
    pub rule: Option<String>,
}

pub fn run(args: RewriteArgs) {
    let grammar = run_valid_pipeline(&args.pipeline);

    let names: Vec<&str> = match &args.rule {
        Some(name) => {
            require_rule(&grammar, name);
            if !grammar.summary().is_left_recursive(name) {
                eprintln!("error: rule `{}` is not left-recursive", name);
                std::process::exit(1);
            }
            vec![name.as_str()]
        }
        None => grammar
            .left_recursive_rules()
            .iter()
            .map(String::as_str)
            .collect(),
    };

    if names.is_empty() {
        log::info!("no left-recursive rules to rewrite");
        return;
    }

    let texts: Vec<&str> = names
        .iter()
        .filter_map(|name| grammar.rule_text(name))
        .collect();
    println!("{}", texts.join("\n\n"));
}
