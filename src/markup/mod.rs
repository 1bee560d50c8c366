// Markup-preserving message splitting
//
// A message is an interleaving of translatable text segments and markup tokens:
// - Tokenizer: finds tags and code spans and cuts the text around them
// - Reassemble: puts translated segments back between the untouched tokens

pub mod tokenizer;
pub mod reassemble;

pub use reassemble::*;
pub use tokenizer::*;

/// Which kind of piece a message starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Segment,
    Token,
}

impl PieceKind {
    pub fn other(self) -> Self {
        match self {
            Self::Segment => Self::Token,
            Self::Token => Self::Segment,
        }
    }
}

/// A single borrowed piece of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Segment(&'a str),
    Token(&'a str),
}

impl<'a> Piece<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Segment(s) | Self::Token(s) => s,
        }
    }
}

/// Segments that are empty or whitespace only carry layout between tags and are never translated.
pub fn is_passthrough(segment: &str) -> bool {
    segment.trim().is_empty()
}
