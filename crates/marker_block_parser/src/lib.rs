// crates/marker_block_parser/src/lib.rs

//! Scans source text for marker-delimited blocks.
//!
//! The scanner has two states. While `Searching`, a line equal to the start
//! marker (after trimming) opens a block; every other line is skipped. While
//! `Capturing`, a line equal to the end marker closes the block and every
//! other line, a repeated start marker included, becomes block content.
//! Marker lines are never part of the captured content.

use std::str::Lines;

use snippet_marker::MarkerPair;
use thiserror::Error;

/// One captured block. Line numbers are 1-based and point at the marker lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnippetBlock {
    pub content: Vec<String>,
    pub start_line: usize,
    pub end_line: usize,
}

impl SnippetBlock {
    /// The captured lines joined with `\n`.
    pub fn text(&self) -> String {
        self.content.join("\n")
    }
}

/// End of input was reached while a block was still open.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("block opened at line {start_line} is never closed")]
pub struct UnterminatedBlock {
    pub start_line: usize,
}

/// Holds the text of one file and the markers to look for.
///
/// Every call to [`MarkerParser::blocks`] scans again from the first line, so
/// the parser can be iterated any number of times.
#[derive(Clone, Copy, Debug)]
pub struct MarkerParser<'a> {
    text: &'a str,
    markers: &'a MarkerPair,
}

impl<'a> MarkerParser<'a> {
    /// A leading UTF-8 byte order mark is dropped so a marker on the first
    /// line still matches.
    pub fn new(text: &'a str, markers: &'a MarkerPair) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self { text, markers }
    }

    /// Lazily yields the blocks of the file in source order.
    ///
    /// Yields `Err(UnterminatedBlock)` once, as its final item, if the file
    /// ends inside a block. The partially captured block is dropped.
    pub fn blocks(&self) -> Blocks<'a> {
        Blocks {
            lines: self.text.lines(),
            markers: self.markers,
            line_no: 0,
            state: ScanState::Searching,
            done: false,
        }
    }

    /// Collects every block, failing if any block is left open.
    pub fn parse_all(&self) -> Result<Vec<SnippetBlock>, UnterminatedBlock> {
        self.blocks().collect()
    }
}

impl<'a> IntoIterator for &MarkerParser<'a> {
    type Item = Result<SnippetBlock, UnterminatedBlock>;
    type IntoIter = Blocks<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks()
    }
}

#[derive(Debug)]
enum ScanState {
    Searching,
    Capturing { start_line: usize, content: Vec<String> },
}

/// Iterator returned by [`MarkerParser::blocks`].
#[derive(Debug)]
pub struct Blocks<'a> {
    lines: Lines<'a>,
    markers: &'a MarkerPair,
    line_no: usize,
    state: ScanState,
    done: bool,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<SnippetBlock, UnterminatedBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for line in self.lines.by_ref() {
            self.line_no += 1;
            match &mut self.state {
                ScanState::Searching => {
                    if self.markers.is_start(line) {
                        self.state = ScanState::Capturing {
                            start_line: self.line_no,
                            content: Vec::new(),
                        };
                    }
                }
                ScanState::Capturing { start_line, content } => {
                    if self.markers.is_end(line) {
                        let block = SnippetBlock {
                            content: std::mem::take(content),
                            start_line: *start_line,
                            end_line: self.line_no,
                        };
                        self.state = ScanState::Searching;
                        return Some(Ok(block));
                    }
                    content.push(line.to_string());
                }
            }
        }

        self.done = true;
        match std::mem::replace(&mut self.state, ScanState::Searching) {
            ScanState::Capturing { start_line, .. } => Some(Err(UnterminatedBlock { start_line })),
            ScanState::Searching => None,
        }
    }
}

impl std::iter::FusedIterator for Blocks<'_> {}

/// Convenience wrapper around [`MarkerParser::parse_all`].
pub fn parse_blocks(text: &str, markers: &MarkerPair) -> Result<Vec<SnippetBlock>, UnterminatedBlock> {
    MarkerParser::new(text, markers).parse_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slash_markers() -> MarkerPair {
        MarkerPair::new("// v", "// ^").unwrap()
    }

    #[test]
    fn test_single_default_block() {
        let input = "\
/* obsi-snip-coll start */
body { font-size: 1.2rem; }
/* obsi-snip-coll end */";
        let blocks = parse_blocks(input, &MarkerPair::default()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "body { font-size: 1.2rem; }");
        assert_eq!(blocks[0].start_line, 1);
        assert_eq!(blocks[0].end_line, 3);
    }

    #[test]
    fn test_text_outside_blocks_is_skipped() {
        let input = "\
Line before
// v
content line 1
  content line 2
// ^
Line after";
        let blocks = parse_blocks(input, &slash_markers()).unwrap();
        assert_eq!(blocks.len(), 1);
        // Indentation inside the block is preserved.
        assert_eq!(blocks[0].content, vec!["content line 1", "  content line 2"]);
        assert_eq!((blocks[0].start_line, blocks[0].end_line), (2, 5));
    }

    #[test]
    fn test_nested_start_marker_is_content() {
        let input = "\
// v
outer
  // v
inner
// ^
// ^";
        let blocks = parse_blocks(input, &slash_markers()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, vec!["outer", "  // v", "inner"]);
        assert_eq!(blocks[0].end_line, 5);
    }

    #[test]
    fn test_stray_end_marker_is_ignored() {
        let input = "// ^\nfree text\n// v\nkept\n// ^";
        let blocks = parse_blocks(input, &slash_markers()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, vec!["kept"]);
    }

    #[test]
    fn test_empty_block() {
        let blocks = parse_blocks("// v\n// ^\n", &slash_markers()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].content.is_empty());
        assert_eq!(blocks[0].text(), "");
    }

    #[test]
    fn test_unterminated_block_reports_opening_line() {
        let input = "// v\nclosed\n// ^\nfiller\n// v\nopen forever";
        let err = parse_blocks(input, &slash_markers()).unwrap_err();
        assert_eq!(err, UnterminatedBlock { start_line: 5 });
        assert_eq!(err.to_string(), "block opened at line 5 is never closed");
    }

    #[test]
    fn test_iterator_yields_error_last_then_stops() {
        let markers = slash_markers();
        let parser = MarkerParser::new("// v\na\n// ^\n// v\nb", &markers);
        let mut blocks = parser.blocks();
        assert!(matches!(blocks.next(), Some(Ok(_))));
        assert_eq!(blocks.next(), Some(Err(UnterminatedBlock { start_line: 4 })));
        assert_eq!(blocks.next(), None);
        assert_eq!(blocks.next(), None);
    }

    #[test]
    fn test_parser_is_restartable() {
        let markers = slash_markers();
        let parser = MarkerParser::new("// v\none\n// ^\n// v\ntwo\n// ^", &markers);
        let first: Vec<_> = parser.blocks().collect();
        let second: Vec<_> = (&parser).into_iter().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "/* obsi-snip-coll start */\r\na { }\r\n/* obsi-snip-coll end */\r\n";
        let blocks = parse_blocks(input, &MarkerPair::default()).unwrap();
        assert_eq!(blocks[0].content, vec!["a { }"]);
    }

    #[test]
    fn test_byte_order_mark_before_first_marker() {
        let input = "\u{feff}/* obsi-snip-coll start */\na { }\n/* obsi-snip-coll end */\n";
        let blocks = parse_blocks(input, &MarkerPair::default()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, vec!["a { }"]);
        assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 3));
    }

    #[test]
    fn test_no_markers_yields_nothing() {
        let blocks = parse_blocks("This is a file with no markers.\nAnother line.", &slash_markers()).unwrap();
        assert!(blocks.is_empty());
    }
}
