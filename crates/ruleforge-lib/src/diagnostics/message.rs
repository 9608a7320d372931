use crate::source_map::Span;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics have overlapping spans, the higher-priority one
/// suppresses the lower-priority one. This prevents cascading error noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // These cause cascading errors throughout the rest of the file
    UnclosedBlock,
    UnclosedElementOptions,

    // User omitted something required - root cause errors
    ExpectedGrammarName,
    ExpectedRuleName,
    ExpectedColon,
    ExpectedSemicolon,
    ExpectedElement,
    ExpectedAttributes,
    ExpectedOptionName,
    ExpectedOptionValue,
    ExpectedAltLabel,

    // User wrote something that doesn't belong
    UnexpectedToken,

    // Valid syntax, invalid semantics
    DuplicateRule,
    NoNonLrAlts,
    IllegalOption,
    IllegalOptionValue,
    UnrecognizedAssocOption,

    // Labels and attribute references
    LabelTypeConflict,
    LabelConflictsWithRule,
    LabelConflictsWithToken,
    LabelConflictsWithArg,
    LabelConflictsWithRetval,
    LabelConflictsWithLocal,
    UnknownSimpleAttribute,
    UnknownAttributeInScope,
    UnknownRuleAttribute,

    // The rewrite itself went wrong
    ToolError,
}

impl DiagnosticKind {
    /// Default severity for this kind.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::IllegalOption | Self::UnrecognizedAssocOption => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this kind suppresses `other` when spans overlap.
    ///
    /// Uses enum discriminant ordering: lower position = higher priority.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// Structural errors are Unclosed* - they cause cascading errors but
    /// should be suppressed by root-cause errors at the same position.
    pub fn is_structural_error(&self) -> bool {
        matches!(self, Self::UnclosedBlock | Self::UnclosedElementOptions)
    }

    /// Root cause errors - user omitted something required.
    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedGrammarName
                | Self::ExpectedRuleName
                | Self::ExpectedColon
                | Self::ExpectedSemicolon
                | Self::ExpectedElement
                | Self::ExpectedAttributes
                | Self::ExpectedOptionName
                | Self::ExpectedOptionValue
                | Self::ExpectedAltLabel
        )
    }

    /// Internal failures of the rewrite, as opposed to mistakes in the grammar.
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Self::ToolError)
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoNonLrAlts => {
                Some("add an alternative that does not start with a reference to the rule itself")
            }
            Self::UnrecognizedAssocOption => {
                Some("associativity only affects alternatives of left-recursive rules")
            }
            Self::IllegalOptionValue => Some("`assoc` accepts `left` or `right`"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedBlock => "missing closing `)`",
            Self::UnclosedElementOptions => "missing closing `>`",

            Self::ExpectedGrammarName => "expected grammar name",
            Self::ExpectedRuleName => "expected rule name",
            Self::ExpectedColon => "expected `:`",
            Self::ExpectedSemicolon => "expected `;`",
            Self::ExpectedElement => "expected an element",
            Self::ExpectedAttributes => "expected `[...]` attribute list",
            Self::ExpectedOptionName => "expected option name",
            Self::ExpectedOptionValue => "expected option value",
            Self::ExpectedAltLabel => "expected alternative label after `#`",

            Self::UnexpectedToken => "unexpected token",

            Self::DuplicateRule => "rule redefinition",
            Self::NoNonLrAlts => "left-recursive rule has no non-left-recursive alternative",
            Self::IllegalOption => "unsupported option",
            Self::IllegalOptionValue => "unsupported option value",
            Self::UnrecognizedAssocOption => "`assoc` has no effect here",

            Self::LabelTypeConflict => "label type mismatch with previous definition",
            Self::LabelConflictsWithRule => "label conflicts with rule with same name",
            Self::LabelConflictsWithToken => "label conflicts with token with same name",
            Self::LabelConflictsWithArg => "label conflicts with parameter with same name",
            Self::LabelConflictsWithRetval => "label conflicts with return value with same name",
            Self::LabelConflictsWithLocal => "label conflicts with local with same name",
            Self::UnknownSimpleAttribute => "unknown attribute reference",
            Self::UnknownAttributeInScope => "unknown token attribute",
            Self::UnknownRuleAttribute => "unknown rule attribute",

            Self::ToolError => "internal error",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DuplicateRule => "rule `{}` is already defined".to_string(),
            Self::NoNonLrAlts => {
                "left-recursive rule `{}` must contain an alternative which is not left recursive"
                    .to_string()
            }
            Self::IllegalOption => "unsupported option `{}`".to_string(),
            Self::UnrecognizedAssocOption => {
                "rule `{}` is not left recursive; `assoc` has no effect".to_string()
            }
            Self::LabelTypeConflict => "label `{}` type mismatch with previous definition".to_string(),
            Self::LabelConflictsWithRule => "label `{}` conflicts with rule with same name".to_string(),
            Self::LabelConflictsWithToken => {
                "label `{}` conflicts with token with same name".to_string()
            }
            Self::LabelConflictsWithArg => {
                "label `{}` conflicts with parameter with same name".to_string()
            }
            Self::LabelConflictsWithRetval => {
                "label `{}` conflicts with return value with same name".to_string()
            }
            Self::LabelConflictsWithLocal => {
                "label `{}` conflicts with local with same name".to_string()
            }
            Self::UnknownSimpleAttribute => "unknown attribute reference `{}`".to_string(),
            Self::UnknownAttributeInScope => "unknown token attribute `{}`".to_string(),
            Self::UnknownRuleAttribute => "unknown rule attribute `{}`".to_string(),

            Self::UnclosedBlock | Self::UnclosedElementOptions => {
                format!("{}; {{}}", self.fallback_message())
            }

            // Standard pattern: fallback + context
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// The span shown to the user (underlined in output).
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            related: Vec::new(),
            hints: kind.default_hint().map(str::to_owned).into_iter().collect(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self::new(kind, span, kind.fallback_message())
    }

    pub(crate) fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub(crate) fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.span.range.start()),
            u32::from(self.span.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.span.range.start()),
                u32::from(related.span.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
