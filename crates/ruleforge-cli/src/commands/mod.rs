pub mod alts;
pub mod check;
pub mod dump;
pub mod grammar_loader;
pub mod pipeline;
pub mod rewrite;

#[cfg(test)]
mod alts_tests;
#[cfg(test)]
mod grammar_loader_tests;
