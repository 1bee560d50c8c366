use std::sync::LazyLock;

use regex::Regex;

use super::{Piece, PieceKind, interleave};

/// Code spans are matched first so that brackets inside them stay part of one token.
static MARKUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<code\s?[^>]*?>.+?</code>|</?[^>]+?/?>").expect("markup pattern is valid")
});

/// A message split into segments and tokens, borrowing from the original text.
///
/// When `leading` is `Segment` there is one more segment than tokens.
/// When it is `Token` the counts are equal and the last piece is a (possibly empty) segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pieces<'a> {
    pub tokens: Vec<&'a str>,
    pub segments: Vec<&'a str>,
    pub leading: PieceKind,
}

impl<'a> Pieces<'a> {
    /// True when the message contains no markup at all
    pub fn is_plain(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Total number of pieces
    pub fn len(&self) -> usize {
        self.tokens.len() + self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pieces in original left-to-right order
    pub fn iter(&self) -> impl Iterator<Item = Piece<'_>> + '_ {
        interleave(&self.segments, &self.tokens, self.leading)
    }

    /// Number of segments that would be sent to a translator
    pub fn translatable_segments(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| !super::is_passthrough(s))
            .count()
    }
}

/// Split a message into markup tokens and the text segments around them.
pub fn tokenize(message: &str) -> Pieces<'_> {
    let mut tokens = Vec::new();
    let mut segments = Vec::new();
    let mut leading = PieceKind::Segment;
    let mut cursor = 0;

    for found in MARKUP_PATTERN.find_iter(message) {
        if found.start() == 0 {
            leading = PieceKind::Token;
        } else {
            segments.push(&message[cursor..found.start()]);
        }
        tokens.push(found.as_str());
        cursor = found.end();
    }
    segments.push(&message[cursor..]);

    Pieces {
        tokens,
        segments,
        leading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::reassemble;

    fn round_trip(message: &str) -> String {
        let pieces = tokenize(message);
        reassemble(&pieces.segments, &pieces.tokens, pieces.leading)
    }

    #[test]
    fn test_plain_message_is_single_segment() {
        let pieces = tokenize("Hello world");
        assert!(pieces.is_plain());
        assert_eq!(pieces.segments, vec!["Hello world"]);
        assert_eq!(pieces.leading, PieceKind::Segment);
    }

    #[test]
    fn test_empty_message() {
        let pieces = tokenize("");
        assert_eq!(pieces.segments, vec![""]);
        assert_eq!(pieces.len(), 1);
        assert_eq!(round_trip(""), "");
    }

    #[test]
    fn test_leading_token() {
        let pieces = tokenize("<b>Hello</b> world");
        assert_eq!(pieces.leading, PieceKind::Token);
        assert_eq!(pieces.tokens, vec!["<b>", "</b>"]);
        assert_eq!(pieces.segments, vec!["Hello", " world"]);
    }

    #[test]
    fn test_leading_segment() {
        let pieces = tokenize("Hello <b>world</b>");
        assert_eq!(pieces.leading, PieceKind::Segment);
        assert_eq!(pieces.tokens, vec!["<b>", "</b>"]);
        assert_eq!(pieces.segments, vec!["Hello ", "world", ""]);
    }

    #[test]
    fn test_code_span_is_one_token() {
        let pieces = tokenize("Run <code>a <b> c</code> now");
        assert_eq!(pieces.tokens, vec!["<code>a <b> c</code>"]);
        assert_eq!(pieces.segments, vec!["Run ", " now"]);
    }

    #[test]
    fn test_code_span_spans_lines() {
        let message = "See <code class=\"x\">line1\n<i>line2</i></code>.";
        let pieces = tokenize(message);
        assert_eq!(pieces.tokens, vec!["<code class=\"x\">line1\n<i>line2</i></code>"]);
        assert_eq!(pieces.segments, vec!["See ", "."]);
    }

    #[test]
    fn test_self_closing_and_adjacent_tags() {
        let pieces = tokenize("<b><i>Hi</i></b><br/>");
        assert_eq!(pieces.leading, PieceKind::Token);
        assert_eq!(pieces.tokens, vec!["<b>", "<i>", "</i>", "</b>", "<br/>"]);
        assert_eq!(pieces.segments, vec!["", "Hi", "", "", ""]);
        assert_eq!(pieces.translatable_segments(), 1);
    }

    #[test]
    fn test_unclosed_bracket_is_text() {
        let pieces = tokenize("a < b and <b");
        assert!(pieces.is_plain());
        assert_eq!(pieces.segments, vec!["a < b and <b"]);
    }

    #[test]
    fn test_segment_that_looks_like_a_pattern() {
        // Segment text must never be interpreted as a pattern when deciding the order.
        let message = "(a+ <b>x</b>";
        let pieces = tokenize(message);
        assert_eq!(pieces.leading, PieceKind::Segment);
        assert_eq!(round_trip(message), message);
    }

    #[test]
    fn test_round_trip_identity() {
        let messages = [
            "Hello <b>World</b>!",
            "<a href=\"https://example.com\">link</a>",
            "  <br/>  ",
            "Press <code>Ctrl+<kbd>C</kbd></code> to copy",
            "日本語の<em>テキスト</em>です",
            "<p>one</p>\n<p>two</p>\n",
            "<b>",
            "text only",
        ];
        for message in messages {
            assert_eq!(round_trip(message), message, "round trip of {:?}", message);
        }
    }

    #[test]
    fn test_iter_preserves_order() {
        let pieces = tokenize("<b>Hello</b> world");
        let collected: Vec<Piece> = pieces.iter().collect();
        assert_eq!(
            collected,
            vec![
                Piece::Token("<b>"),
                Piece::Segment("Hello"),
                Piece::Token("</b>"),
                Piece::Segment(" world"),
            ]
        );
    }
}
