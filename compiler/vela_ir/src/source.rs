//! Source files and the map that owns them.
//!
//! File contents are reference-counted so the lexer, the diagnostics
//! renderer, and the finished tree can all hold on to the same buffer
//! without copying.

use std::fmt;
use std::sync::Arc;

/// Identifier of a file registered in a [`SourceMap`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SourceId(u32);

impl SourceId {
    /// Id used by dummy locations before any file is registered.
    pub const UNKNOWN: SourceId = SourceId(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        SourceId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for SourceId {
    fn default() -> Self {
        SourceId::UNKNOWN
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src{}", self.0)
    }
}

/// One source file: its path, the directory it came from, and its text.
///
/// Cloning is cheap; the text is shared.
#[derive(Clone, Debug)]
pub struct Source {
    pub id: SourceId,
    /// Path the file was opened as.
    pub path: String,
    /// Directory containing the file; module-relative imports resolve
    /// against this.
    pub origin: String,
    pub text: Arc<str>,
}

impl Source {
    /// Slice of the text covered by a span, clamped to the buffer.
    pub fn slice(&self, range: std::ops::Range<usize>) -> &str {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        &self.text[start..end]
    }
}

/// Registry of every file seen by a parse, indexed by [`SourceId`].
#[derive(Default, Debug)]
pub struct SourceMap {
    files: Vec<Source>,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap { files: Vec::new() }
    }

    /// Register a file and return its handle.
    pub fn add(&mut self, path: impl Into<String>, origin: impl Into<String>, text: &str) -> Source {
        let id = SourceId(u32::try_from(self.files.len()).expect("source count exceeds u32"));
        let source = Source {
            id,
            path: path.into(),
            origin: origin.into(),
            text: Arc::from(text),
        };
        self.files.push(source.clone());
        source
    }

    pub fn get(&self, id: SourceId) -> Option<&Source> {
        self.files.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.files.iter()
    }
}
