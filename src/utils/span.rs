use chumsky::span::{SimpleSpan, Span as _};
use std::ops::Range;

/// 代表源代码中的一个位置范围，包含起始和结束的字节索引。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 覆盖 `self` 与 `other` 的最小范围。
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

// chumsky 的解析器内部使用 SimpleSpan，在 AST 边界处转换为我们自己的 Span
impl From<SimpleSpan> for Span {
    fn from(span: SimpleSpan) -> Self {
        Self {
            start: span.start(),
            end: span.end(),
        }
    }
}

impl From<Span> for SimpleSpan {
    fn from(span: Span) -> Self {
        SimpleSpan::from(span.start..span.end)
    }
}

/// 行号索引：预先记录每一行的起始字节偏移，之后用二分查找把偏移量换算成行号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(offset, _)| offset + 1),
        );
        Self { line_starts }
    }

    /// 返回字节偏移所在的行号（从 1 开始）。
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    pub fn line_of_span(&self, span: Span) -> usize {
        self.line_of(span.start)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
