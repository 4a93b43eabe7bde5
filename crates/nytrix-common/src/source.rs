use std::{fs::File, io::Read, path::{Path, PathBuf}, rc::Rc};

/// A piece of Nytrix source text together with its origin path.
///
/// `Source` also keeps a table of line-start byte offsets so that spans can
/// resolve `line:column` lazily, without re-scanning the whole buffer on
/// every diagnostic.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: PathBuf,
    line_starts: Vec<usize>,
}

impl Source {
    pub fn new(contents: &str, path: &Path) -> Rc<Source> {
        let line_starts = Self::compute_line_starts(contents);
        Rc::new(Source { contents: contents.to_string(), path: path.to_owned(), line_starts })
    }

    /// Builds a `Source` by reading a file from disk.
    pub fn path(path: &Path) -> std::io::Result<Rc<Source>> {
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        Ok(Source::new(&contents, path))
    }

    /// Builds an anonymous `Source`, e.g. for a REPL line or `-c` snippet.
    /// Points at `<repl>` rather than a real path.
    pub fn anonymous(contents: &str) -> Rc<Source> {
        Source::new(contents, &PathBuf::from("<repl>"))
    }

    fn compute_line_starts(contents: &str) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, b) in contents.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    /// Resolves a byte offset to a 1-indexed `(line, column)` pair.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[idx];
        let column = self.contents[line_start..offset.min(self.contents.len())].chars().count();
        (idx + 1, column + 1)
    }

    /// Returns the text of a single line (0-indexed), without its trailing newline.
    pub fn line_text(&self, line_index: usize) -> &str {
        let start = self.line_starts[line_index];
        let end = self
            .line_starts
            .get(line_index + 1)
            .map(|&e| e.saturating_sub(1))
            .unwrap_or(self.contents.len());
        &self.contents[start..end.max(start)]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
