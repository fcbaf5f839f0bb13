//! Byte-offset source ranges

use std::ops::Range;

/// Half-open byte range `start..end` into a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the covered text out of `source`
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_order_independent() {
        let a = Span::new(4, 9);
        let b = Span::new(12, 15);
        assert_eq!(a.merge(b), Span::new(4, 15));
        assert_eq!(b.merge(a), Span::new(4, 15));
    }

    #[test]
    fn test_text() {
        let source = "let x: i32 = 1;";
        assert_eq!(Span::new(4, 5).text(source), "x");
        assert_eq!(Span::new(4, 5).len(), 1);
        assert!(Span::new(3, 3).is_empty());
    }
}
