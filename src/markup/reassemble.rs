use super::{Piece, PieceKind};

/// Walk segments and tokens in original order, alternating by index parity from `leading`.
///
/// Lengths are fixed by the tokenizer (equal counts, or one extra piece of the leading
/// kind), so no exhaustion tracking is needed.
pub fn interleave<'s, S, T>(
    segments: &'s [S],
    tokens: &'s [T],
    leading: PieceKind,
) -> impl Iterator<Item = Piece<'s>> + 's
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let total = segments.len() + tokens.len();
    (0..total).filter_map(move |index| {
        let kind = if index % 2 == 0 { leading } else { leading.other() };
        match kind {
            PieceKind::Segment => segments.get(index / 2).map(|s| Piece::Segment(s.as_ref())),
            PieceKind::Token => tokens.get(index / 2).map(|t| Piece::Token(t.as_ref())),
        }
    })
}

/// Join translated segments and untouched tokens back into one message.
pub fn reassemble<S, T>(segments: &[S], tokens: &[T], leading: PieceKind) -> String
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    interleave(segments, tokens, leading)
        .map(|piece| piece.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::tokenize;

    #[test]
    fn test_reassemble_segment_first() {
        let segments = vec!["BONJOUR ".to_string(), "MONDE".to_string(), String::new()];
        let tokens = vec!["<b>", "</b>"];
        assert_eq!(
            reassemble(&segments, &tokens, PieceKind::Segment),
            "BONJOUR <b>MONDE</b>"
        );
    }

    #[test]
    fn test_reassemble_token_first() {
        let segments = vec!["Salut", " monde"];
        let tokens = vec!["<b>", "</b>"];
        assert_eq!(
            reassemble(&segments, &tokens, PieceKind::Token),
            "<b>Salut</b> monde"
        );
    }

    #[test]
    fn test_every_piece_is_emitted() {
        let pieces = tokenize("<i>a</i>b<i>c</i>");
        let count = interleave(&pieces.segments, &pieces.tokens, pieces.leading).count();
        assert_eq!(count, pieces.len());
    }

    #[test]
    fn test_tokens_survive_translation_in_order() {
        let message = "Click <a href=\"#\">here</a> or <code>x<y</code> then <br/>done";
        let pieces = tokenize(message);
        let translated: Vec<String> = pieces.segments.iter().map(|s| s.to_uppercase()).collect();
        let output = reassemble(&translated, &pieces.tokens, pieces.leading);

        let mut from = 0;
        for token in &pieces.tokens {
            let at = output[from..].find(token).map(|i| i + from);
            assert!(at.is_some(), "token {:?} missing from {:?}", token, output);
            from = at.unwrap_or(from) + token.len();
        }
        assert!(output.starts_with("CLICK "));
        assert!(output.ends_with("DONE"));
    }
}
