use frost_core::{ContentHash, Dimension};

const INDENT: &str = "\t";

/// Line-oriented, indentation-aware text buffer. Cleared and reused across
/// generations.
#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
    buf: String,
    depth: usize,
}

impl SourceWriter {
    pub(crate) fn clear(&mut self, depth: usize) {
        self.buf.clear();
        self.depth = depth;
    }

    pub(crate) fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }
}

/// Output of one code generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// Function definitions followed by the entry point.
    pub source: String,
    /// Names of the emitted helper functions, in emission order.
    pub functions: Vec<String>,
    pub entry_point: String,
    pub dimension: Dimension,
    pub hash: ContentHash,
}

impl GeneratedSource {
    /// Number of helper functions emitted before the entry point.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

impl std::fmt::Display for GeneratedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
