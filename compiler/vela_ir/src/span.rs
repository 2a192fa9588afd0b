//! Source locations.
//!
//! A `Span` is a compact byte range; a `Loc` pairs a span with the source
//! file it came from. Every AST node and every token carries a `Loc`.

use std::fmt;

use crate::source::SourceId;

/// Byte range within a single source file.
///
/// Layout: 8 bytes (start and exclusive end as `u32`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for synthesised nodes with no better position.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A span tied to the file it belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Loc {
    pub source: SourceId,
    pub span: Span,
}

impl Loc {
    /// Location for synthesised nodes before a real one is known.
    pub const DUMMY: Loc = Loc {
        source: SourceId::UNKNOWN,
        span: Span::DUMMY,
    };

    #[inline]
    pub const fn new(source: SourceId, start: u32, end: u32) -> Self {
        Loc {
            source,
            span: Span::new(start, end),
        }
    }

    /// Grow this location to also cover `other`, keeping the start.
    ///
    /// Both locations must come from the same file; when they don't, the
    /// original location is returned unchanged.
    #[must_use]
    pub fn extend(self, other: Loc) -> Loc {
        if self.source != other.source {
            return self;
        }
        Loc {
            source: self.source,
            span: Span::new(self.span.start, self.span.end.max(other.span.end)),
        }
    }

    /// The location spanning from this one through `other`.
    #[must_use]
    pub fn range(self, other: Loc) -> Loc {
        if self.source != other.source {
            return self;
        }
        Loc {
            source: self.source,
            span: Span::new(
                self.span.start.min(other.span.start),
                self.span.end.max(other.span.end),
            ),
        }
    }
}

impl fmt::Debug for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.source, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert_eq!(span.to_range(), 10..20);
    }

    #[test]
    fn test_loc_extend() {
        let file = SourceId::new(1);
        let a = Loc::new(file, 10, 20);
        let b = Loc::new(file, 15, 30);
        let c = a.extend(b);
        assert_eq!(c.span, Span::new(10, 30));

        // extend never shrinks
        let d = a.extend(Loc::new(file, 0, 5));
        assert_eq!(d.span, a.span);
    }

    #[test]
    fn test_loc_range() {
        let file = SourceId::new(1);
        let a = Loc::new(file, 10, 12);
        let b = Loc::new(file, 18, 25);
        assert_eq!(a.range(b).span, Span::new(10, 25));
        assert_eq!(b.range(a).span, Span::new(10, 25));
    }

    #[test]
    fn test_loc_cross_file() {
        let a = Loc::new(SourceId::new(1), 10, 12);
        let b = Loc::new(SourceId::new(2), 0, 50);
        assert_eq!(a.extend(b), a);
        assert_eq!(a.range(b), a);
    }
}
