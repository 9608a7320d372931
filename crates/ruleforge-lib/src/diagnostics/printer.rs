//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::message::{DiagnosticMessage, Severity};
use crate::source_map::{SourceKind, SourceMap};

/// Renders diagnostics against the sources they point into.
///
/// Related spans in the same source are drawn as secondary annotations;
/// spans in another source (such as the generated text of a rewritten rule)
/// get their own note snippet.
pub struct DiagnosticsPrinter<'s> {
    diagnostics: Vec<DiagnosticMessage>,
    sources: &'s SourceMap,
    colored: bool,
}

impl<'s> DiagnosticsPrinter<'s> {
    pub(crate) fn new(diagnostics: Vec<DiagnosticMessage>, sources: &'s SourceMap) -> Self {
        Self {
            diagnostics,
            sources,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let source_id = diag.span.source;
            if source_id.index() >= self.sources.len() {
                if i > 0 {
                    w.write_char('\n')?;
                }
                writeln!(w, "{diag}")?;
                continue;
            }

            let source = self.sources.content(source_id);
            let kind = self.sources.kind(source_id);
            let range = adjust_range(diag.span.range, source.len());

            let mut snippet = Snippet::source(source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(range)
                    .label(&diag.message),
            );
            if let Some(path) = snippet_path(kind) {
                snippet = snippet.path(path);
            }

            let mut elsewhere = Vec::new();
            for related in &diag.related {
                if related.span.source == source_id {
                    snippet = snippet.annotation(
                        AnnotationKind::Context
                            .span(adjust_range(related.span.range, source.len()))
                            .label(&related.message),
                    );
                } else if related.span.source.index() < self.sources.len() {
                    elsewhere.push(related);
                }
            }

            let level = severity_to_level(diag.severity());
            let mut report: Vec<Group> = vec![level.primary_title(&diag.message).element(snippet)];

            for related in elsewhere {
                let other = self.sources.content(related.span.source);
                let mut note = Snippet::source(other).line_start(1).annotation(
                    AnnotationKind::Context.span(adjust_range(related.span.range, other.len())),
                );
                if let Some(path) = snippet_path(self.sources.kind(related.span.source)) {
                    note = note.path(path);
                }
                report.push(Level::NOTE.secondary_title(&related.message).element(note));
            }

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
            for hint in &diag.hints {
                write!(w, "\nhelp: {hint}")?;
            }
        }

        Ok(())
    }
}

fn snippet_path(kind: &SourceKind) -> Option<&str> {
    match kind {
        SourceKind::File(path) => Some(path),
        _ => None,
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}
