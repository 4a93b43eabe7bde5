use std::fmt;

use crate::span::Span;

/// A note attached to a diagnostic: a location plus an optional actionable
/// hint, e.g. "did you mean '=='?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub span: Span,
    pub hint: Option<String>,
}

impl Note {
    pub fn new(span: Span) -> Note {
        Note { span, hint: None }
    }

    pub fn with_hint(span: Span, hint: impl Into<String>) -> Note {
        Note { span, hint: Some(hint.into()) }
    }
}

/// A diagnostic raised anywhere in the front end: lexical, syntactic, or
/// emission-time. Carries `file:line:column:` location data and, where
/// possible, a fix hint — matching `spec.md` §7's user-visible failure
/// behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub notes: Vec<Note>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span) -> Diagnostic {
        Diagnostic { message: message.into(), notes: vec![Note::new(span)] }
    }

    pub fn with_hint(message: impl Into<String>, span: Span, hint: impl Into<String>) -> Diagnostic {
        Diagnostic { message: message.into(), notes: vec![Note::with_hint(span, hint)] }
    }

    pub fn without_note(message: impl Into<String>) -> Diagnostic {
        Diagnostic { message: message.into(), notes: vec![] }
    }

    pub fn add_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// A content hash used to suppress duplicate diagnostics (same
    /// location + message), per `spec.md` §4.2.3 and §7.
    pub fn dedup_key(&self) -> (String, Option<(usize, usize)>) {
        let loc = self.notes.first().map(|n| (n.span.start, n.span.end));
        (self.message.clone(), loc)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for note in &self.notes {
            let (line, col) = note.span.source.line_col(note.span.start);
            writeln!(f, "{}:{}:{}: error: {}", note.span.source.path.display(), line, col, self.message)?;

            let line_text = note.span.source.line_text(line - 1);
            let gutter = line.to_string();
            writeln!(f, "{:>width$} | {}", line, line_text, width = gutter.len())?;

            let underline_len = if note.span.is_multiline() {
                line_text.len().saturating_sub(col - 1).max(1)
            } else {
                (note.span.end - note.span.start).max(1)
            };
            writeln!(
                f,
                "{} | {}{}",
                " ".repeat(gutter.len()),
                " ".repeat(col - 1),
                "^".repeat(underline_len),
            )?;

            if let Some(hint) = &note.hint {
                writeln!(f, "{} = hint: {}", " ".repeat(gutter.len()), hint)?;
            }
        }
        if self.notes.is_empty() {
            write!(f, "error: {}", self.message)?;
        }
        Ok(())
    }
}
