/// A reference to another module found by the lightweight `use` scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseRef {
    /// `use "./rel/path"` — a quoted local path, resolved relative to the
    /// importing file rather than looked up in the module table.
    Local(String),
    /// `use std.io`, `use mod as m`, `use mod (a, b)`, `use mod *` — a
    /// dotted name, resolved against the module table or treated as a
    /// package reference.
    Name(String),
}

/// Extracts the module names/paths named by `use` statements in `source`
/// without running the full parser — just enough lexical awareness to skip
/// strings and comments correctly (`spec.md` §4.3 step 4's "parse only
/// enough to extract its `use` statements").
pub fn extract_use_targets(source: &str) -> Vec<UseRef> {
    let mut out = Vec::new();
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b';' | b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'\'' | b'"' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            _ => {
                if source[i..].starts_with("use") && word_boundary(source, i, 3) {
                    let (target, next) = scan_use_target(source, i + 3);
                    if let Some(target) = target {
                        out.push(target);
                    }
                    i = next;
                    continue;
                }
                i += 1;
            }
        }
    }
    out
}

fn word_boundary(source: &str, start: usize, len: usize) -> bool {
    let before_ok = start == 0 || !source.as_bytes()[start - 1].is_ascii_alphanumeric();
    let after = start + len;
    let after_ok = after >= source.len() || !source.as_bytes()[after].is_ascii_alphanumeric();
    before_ok && after_ok
}

fn scan_use_target(source: &str, mut i: usize) -> (Option<UseRef>, usize) {
    let bytes = source.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() {
        return (None, i);
    }
    if bytes[i] == b'"' || bytes[i] == b'\'' {
        let quote = bytes[i];
        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && bytes[j] != quote {
            j += 1;
        }
        let path = source[start..j.min(bytes.len())].to_string();
        return (Some(UseRef::Local(path)), (j + 1).min(bytes.len()));
    }
    let start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.') {
        i += 1;
    }
    if i == start {
        return (None, i);
    }
    (Some(UseRef::Name(source[start..i].to_string())), i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_dotted_name() {
        let refs = extract_use_targets("use std.io;\ndef x = 1;");
        assert_eq!(refs, vec![UseRef::Name("std.io".to_string())]);
    }

    #[test]
    fn extracts_local_path() {
        let refs = extract_use_targets("use \"./util.ny\";");
        assert_eq!(refs, vec![UseRef::Local("./util.ny".to_string())]);
    }

    #[test]
    fn ignores_use_inside_comment_and_string() {
        let refs = extract_use_targets("; use std.io\ndef s = \"use std.io\";");
        assert!(refs.is_empty());
    }

    #[test]
    fn does_not_match_use_as_identifier_prefix() {
        let refs = extract_use_targets("def user = 1;");
        assert!(refs.is_empty());
    }
}
