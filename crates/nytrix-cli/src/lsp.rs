//! The LSP stub (`SPEC_FULL.md` §7): a thin I/O wrapper around the
//! parser, nothing more. Reads one JSON-RPC-shaped message per line from
//! stdin (no `Content-Length` framing — this is intentionally not a
//! conformant language server) and replies with a single
//! `textDocument/publishDiagnostics`-equivalent line built from
//! `ParseResult::diagnostics`.

use std::io::{self, BufRead, Write};

use nytrix_ast::Arena;
use nytrix_common::Source;

/// Pulls the value of a `"text":"..."` field out of a JSON-RPC
/// `didOpen`/`didChange` notification without a full JSON parser —
/// deliberately minimal, matching this module's stub scope.
fn extract_text(body: &str) -> Option<String> {
    let key = "\"text\":\"";
    let start = body.find(key)? + key.len();
    let rest = &body[start..];
    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Some(out),
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                other => out.push(other),
            },
            other => out.push(other),
        }
    }
    None
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Renders one diagnostic as an LSP-shaped (but not fully conformant)
/// `{line, character, message}` JSON object.
fn diagnostic_to_json(diag: &nytrix_common::Diagnostic) -> String {
    match diag.notes.first() {
        Some(note) => {
            let (line, col) = note.span.source.line_col(note.span.start);
            format!(
                "{{\"range\":{{\"start\":{{\"line\":{},\"character\":{}}}}},\"severity\":1,\"message\":\"{}\"}}",
                line.saturating_sub(1),
                col.saturating_sub(1),
                escape(&diag.message),
            )
        }
        None => format!("{{\"severity\":1,\"message\":\"{}\"}}", escape(&diag.message)),
    }
}

pub fn run() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some(text) = extract_text(&line) else { continue };

        let arena = Arena::new();
        let source = Source::anonymous(&text);
        let result = nytrix_parser::parse(source, &arena);

        let diagnostics = result
            .diagnostics
            .iter()
            .map(diagnostic_to_json)
            .collect::<Vec<_>>()
            .join(",");
        let response = format!(
            "{{\"method\":\"textDocument/publishDiagnostics\",\"params\":{{\"diagnostics\":[{diagnostics}]}}}}"
        );
        let _ = writeln!(stdout, "{response}");
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_field_with_escapes() {
        let body = r#"{"params":{"textDocument":{"text":"def x =\n  1;"}}}"#;
        assert_eq!(extract_text(body).unwrap(), "def x =\n  1;");
    }

    #[test]
    fn missing_text_field_returns_none() {
        assert!(extract_text(r#"{"params":{}}"#).is_none());
    }
}
