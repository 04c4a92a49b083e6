use serde::Serialize;

/// A contiguous source-location range. Lines and columns are 1-based;
/// `last_column` points one past the final character of the range.
/// `last_token` is the text of the last token the range covers, kept
/// for diagnostics ("expected ENDIF near ...").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span<'src> {
    pub first_line: u32,
    pub first_column: u32,
    pub last_line: u32,
    pub last_column: u32,
    pub last_token: &'src str,
}

impl Default for Span<'_> {
    fn default() -> Self {
        Self {
            first_line: 1,
            first_column: 1,
            last_line: 1,
            last_column: 1,
            last_token: "",
        }
    }
}

impl<'src> Span<'src> {
    pub fn new(
        first_line: u32,
        first_column: u32,
        last_line: u32,
        last_column: u32,
        last_token: &'src str,
    ) -> Self {
        Self {
            first_line,
            first_column,
            last_line,
            last_column,
            last_token,
        }
    }

    /// Merge the spans of the first and last symbol of a reduction into
    /// the span of the reduced node.
    pub fn merge(first: Span<'src>, last: Span<'src>) -> Span<'src> {
        Span {
            first_line: first.first_line,
            first_column: first.first_column,
            last_line: last.last_line,
            last_column: last.last_column,
            last_token: last.last_token,
        }
    }

    /// Span of an empty production: zero-width, collapsed onto the end
    /// of whatever symbol preceded it in the parse.
    pub fn empty_at(prev: Span<'src>) -> Span<'src> {
        Span {
            first_line: prev.last_line,
            first_column: prev.last_column,
            last_line: prev.last_line,
            last_column: prev.last_column,
            last_token: prev.last_token,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_line == self.last_line && self.first_column == self.last_column
    }

    /// True if the position `(line, column)` falls inside this span.
    pub fn contains(&self, line: u32, column: u32) -> bool {
        if line < self.first_line || line > self.last_line {
            return false;
        }
        if line == self.first_line && column < self.first_column {
            return false;
        }
        if line == self.last_line && column >= self.last_column && !self.is_empty() {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_takes_first_start_and_last_end() {
        let a = Span::new(2, 5, 2, 8, "IF");
        let b = Span::new(4, 1, 4, 6, "ENDIF");
        let merged = Span::merge(a, b);
        assert_eq!(merged.first_line, 2);
        assert_eq!(merged.first_column, 5);
        assert_eq!(merged.last_line, 4);
        assert_eq!(merged.last_column, 6);
        assert_eq!(merged.last_token, "ENDIF");
    }

    #[test]
    fn empty_production_collapses_to_preceding_end() {
        let prev = Span::new(3, 1, 3, 6, "CRAFT");
        let empty = Span::empty_at(prev);
        assert!(empty.is_empty());
        assert_eq!(empty.first_line, 3);
        assert_eq!(empty.first_column, 6);
        assert_eq!(empty.last_line, 3);
        assert_eq!(empty.last_column, 6);
        assert_eq!(empty.last_token, "CRAFT");
    }

    #[test]
    fn contains_position() {
        let s = Span::new(2, 3, 2, 7, "x");
        assert!(s.contains(2, 3));
        assert!(s.contains(2, 6));
        assert!(!s.contains(2, 7));
        assert!(!s.contains(1, 5));
        assert!(!s.contains(3, 1));
    }
}
