//! Pure per-line classification for the code panel.

use crate::registry::HighlightRange;
use crate::script::ReferenceText;

/// Display attributes for one visible line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEmphasis {
    pub emphasized: bool,
}

/// `emphasized` iff `line_number` falls inside `range` (1-indexed, inclusive).
pub fn classify(line_number: usize, range: HighlightRange) -> LineEmphasis {
    LineEmphasis {
        emphasized: range.contains(line_number),
    }
}

/// Attributes for every line of the script, in display order.
pub fn line_attributes(script: &ReferenceText, range: HighlightRange) -> Vec<LineEmphasis> {
    (1..=script.line_count())
        .map(|line_number| classify(line_number, range))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_inclusive_interval() {
        let range = HighlightRange::new(14, 28);
        for line in 1..=60 {
            assert_eq!(
                classify(line, range).emphasized,
                line >= 14 && line <= 28,
                "line {line}"
            );
        }
    }

    #[test]
    fn single_line_range() {
        let range = HighlightRange::new(7, 7);
        assert!(classify(7, range).emphasized);
        assert!(!classify(6, range).emphasized);
        assert!(!classify(8, range).emphasized);
    }

    #[test]
    fn attributes_cover_every_line() {
        let script = ReferenceText::from_source("a\nb\nc\nd");
        let attrs = line_attributes(&script, HighlightRange::new(2, 3));
        assert_eq!(attrs.len(), 4);
        assert_eq!(
            attrs.iter().map(|a| a.emphasized).collect::<Vec<_>>(),
            vec![false, true, true, false]
        );
    }
}
