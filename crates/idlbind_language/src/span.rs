//! Source location tracking.
//!
//! `Span` tracks the position of tokens and declarations in source text
//! for error reporting. `SourceMap` remembers which file each span came from.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies one registered source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceId(pub u32);

impl SourceId {
    /// The id used for text parsed without a registered name.
    pub const ANONYMOUS: SourceId = SourceId(0);
}

/// A span of source text.
///
/// Tracks byte offsets and line/column positions for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// The source text this span points into.
    pub source: SourceId,
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based line number where this span starts.
    pub line: u32,
    /// 1-based column number where this span starts.
    pub column: u32,
}

impl Span {
    /// Creates a new span in the anonymous source.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            source: SourceId::ANONYMOUS,
            start,
            end,
            line,
            column,
        }
    }

    /// Returns this span re-homed into `source`.
    #[must_use]
    pub const fn in_source(mut self, source: SourceId) -> Self {
        self.source = source;
        self
    }

    /// Creates a span covering the range from this span to another.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            source: self.source,
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
        }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the text this span covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// A registered source text.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Display name, usually the path it was read from.
    pub name: Arc<str>,
    /// The full text.
    pub text: Arc<str>,
}

/// Registry of source texts, indexed by [`SourceId`].
///
/// Slot 0 is reserved for anonymous input.
#[derive(Clone, Debug)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl Default for SourceMap {
    fn default() -> Self {
        Self {
            files: vec![SourceFile {
                name: Arc::from("<input>"),
                text: Arc::from(""),
            }],
        }
    }
}

impl SourceMap {
    /// Creates a map holding only the anonymous slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source text and returns its id.
    pub fn add(&mut self, name: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> SourceId {
        let id = SourceId(u32::try_from(self.files.len()).unwrap_or(u32::MAX));
        self.files.push(SourceFile {
            name: name.into(),
            text: text.into(),
        });
        id
    }

    /// Returns the file for an id.
    #[must_use]
    pub fn get(&self, id: SourceId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    /// Returns the display name for an id, or `<input>` if unknown.
    #[must_use]
    pub fn name(&self, id: SourceId) -> &str {
        self.get(id).map_or("<input>", |f| &f.name)
    }

    /// Iterates registered files, skipping the anonymous slot.
    pub fn files(&self) -> impl Iterator<Item = (SourceId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, f)| (SourceId(u32::try_from(i).unwrap_or(u32::MAX)), f))
    }
}
