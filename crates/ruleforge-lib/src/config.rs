//! Settings for parsing and for the left-recursion rewrite.

/// Default parser operation budget.
pub const DEFAULT_EXEC_FUEL: u32 = 1_000_000;
/// Default nesting depth budget.
pub const DEFAULT_RECURSION_FUEL: u32 = 4096;

/// Element option carrying the precedence threshold of a rule reference.
pub const PRECEDENCE_OPTION_NAME: &str = "p";
/// Element option pointing a synthesized element back at its source token.
pub const TOKEN_INDEX_OPTION_NAME: &str = "tokenIndex";
/// Placeholder in the predicate template that receives the precedence level.
pub const PRECEDENCE_PLACEHOLDER: &str = "{prec}";

/// Fuel limits for one parser run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub exec_fuel: Option<u32>,
    pub recursion_fuel: Option<u32>,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    precedence_option: String,
    predicate_template: String,
    limits: ParseLimits,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            precedence_option: PRECEDENCE_OPTION_NAME.to_owned(),
            predicate_template: "precpred(_ctx, {prec})".to_owned(),
            limits: ParseLimits::default(),
        }
    }
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the option that carries precedence on references and predicates.
    pub fn with_precedence_option(mut self, name: impl Into<String>) -> Self {
        self.precedence_option = name.into();
        self
    }

    /// Body of the guard predicate; `{prec}` is replaced by the alternative's precedence.
    pub fn with_predicate_template(mut self, template: impl Into<String>) -> Self {
        self.predicate_template = template.into();
        self
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.limits.exec_fuel = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.limits.recursion_fuel = limit;
        self
    }

    pub fn precedence_option(&self) -> &str {
        &self.precedence_option
    }

    pub fn predicate_template(&self) -> &str {
        &self.predicate_template
    }

    pub fn limits(&self) -> ParseLimits {
        self.limits
    }

    /// Guard predicate text for one precedence level, e.g. `{precpred(_ctx, 3)}?`.
    pub fn predicate(&self, precedence: u32) -> String {
        let body = self
            .predicate_template
            .replace(PRECEDENCE_PLACEHOLDER, &precedence.to_string());
        format!("{{{body}}}?")
    }
}
