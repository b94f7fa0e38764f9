//
// parser/scanner.rs
//
// Structural scanner: delimiter and comment balance tracking
//

use tower_lsp::lsp_types::Position;

use crate::position::offset_to_position;

/// The four delimiter families whose balance is checked at end of scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Curly,
    Bracket,
    Paren,
    BlockComment,
}

impl Delimiter {
    /// Families in the order they are checked; only the first unbalanced one is reported.
    pub const ALL: [Delimiter; 4] = [
        Delimiter::Curly,
        Delimiter::Bracket,
        Delimiter::Paren,
        Delimiter::BlockComment,
    ];

    pub fn opener(self) -> &'static str {
        match self {
            Delimiter::Curly => "{",
            Delimiter::Bracket => "[",
            Delimiter::Paren => "(",
            Delimiter::BlockComment => "/*",
        }
    }

    pub fn closer(self) -> &'static str {
        match self {
            Delimiter::Curly => "}",
            Delimiter::Bracket => "]",
            Delimiter::Paren => ")",
            Delimiter::BlockComment => "*/",
        }
    }

    fn index(self) -> usize {
        match self {
            Delimiter::Curly => 0,
            Delimiter::Bracket => 1,
            Delimiter::Paren => 2,
            Delimiter::BlockComment => 3,
        }
    }
}

/// An unbalanced delimiter family found at the end of a scan.
///
/// Fatal to the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{file}:{}:{}: Expected '{}' got '{}'.",
    .start.character,
    .start.line,
    .delimiter.closer(),
    .delimiter.opener()
)]
pub struct StructuralError {
    pub delimiter: Delimiter,
    /// Path (or URI when the document has no path) of the scanned file
    pub file: String,
    pub start: Position,
    pub end: Position,
}

impl StructuralError {
    fn at(file: &str, text: &str, delimiter: Delimiter, offset: usize) -> Self {
        let width = text[offset..].chars().next().map(char::len_utf8).unwrap_or(0);
        Self {
            delimiter,
            file: file.to_string(),
            start: offset_to_position(text, offset),
            end: offset_to_position(text, offset + width),
        }
    }

    pub fn expected_closer(&self) -> &'static str {
        self.delimiter.closer()
    }

    pub fn found_instead(&self) -> &'static str {
        self.delimiter.opener()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Synthetic token at offset 0
    Start,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    BlockCommentStart,
    BlockCommentEnd,
    LineComment,
    Newline,
    /// Sits on the last character when no other token ended there
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Forward-only tokenizer over the structural token alphabet.
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
    started: bool,
    done: bool,
    last_token_end: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            started: false,
            done: false,
            last_token_end: 0,
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if !self.started {
            self.started = true;
            return Some(Token {
                kind: TokenKind::Start,
                offset: 0,
            });
        }
        if self.done {
            return None;
        }

        // Every token is ASCII, so byte-wise matching never splits a character.
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let offset = self.pos;
            let next = bytes.get(offset + 1).copied();
            let (kind, width) = match (bytes[offset], next) {
                (b'{', _) => (TokenKind::OpenCurly, 1),
                (b'}', _) => (TokenKind::CloseCurly, 1),
                (b'[', _) => (TokenKind::OpenBracket, 1),
                (b']', _) => (TokenKind::CloseBracket, 1),
                (b'(', _) => (TokenKind::OpenParen, 1),
                (b')', _) => (TokenKind::CloseParen, 1),
                (b'/', Some(b'*')) => (TokenKind::BlockCommentStart, 2),
                (b'*', Some(b'/')) => (TokenKind::BlockCommentEnd, 2),
                (b'/', Some(b'/')) => (TokenKind::LineComment, 2),
                (b'\n', _) => (TokenKind::Newline, 1),
                _ => {
                    self.pos += 1;
                    continue;
                }
            };
            self.pos += width;
            self.last_token_end = self.pos;
            return Some(Token { kind, offset });
        }

        self.done = true;
        if self.last_token_end < self.text.len() {
            let (offset, _) = self.text.char_indices().next_back()?;
            return Some(Token {
                kind: TokenKind::Eof,
                offset,
            });
        }
        None
    }
}

#[derive(Debug, Default)]
struct Depths {
    curly: i64,
    bracket: i64,
    paren: i64,
    line_comment: i64,
    block_comment: i64,
}

impl Depths {
    fn in_comment(&self) -> bool {
        self.line_comment + self.block_comment != 0
    }

    fn of(&self, delimiter: Delimiter) -> i64 {
        match delimiter {
            Delimiter::Curly => self.curly,
            Delimiter::Bracket => self.bracket,
            Delimiter::Paren => self.paren,
            Delimiter::BlockComment => self.block_comment,
        }
    }

    fn apply(&mut self, kind: TokenKind) {
        let in_comment = self.in_comment();
        match kind {
            TokenKind::OpenCurly if !in_comment => self.curly += 1,
            TokenKind::CloseCurly if !in_comment => self.curly -= 1,
            TokenKind::OpenBracket if !in_comment => self.bracket += 1,
            TokenKind::CloseBracket if !in_comment => self.bracket -= 1,
            TokenKind::OpenParen if !in_comment => self.paren += 1,
            TokenKind::CloseParen if !in_comment => self.paren -= 1,
            TokenKind::BlockCommentStart => self.block_comment += 1,
            TokenKind::BlockCommentEnd => self.block_comment = 0,
            TokenKind::LineComment => self.line_comment += 1,
            TokenKind::Newline | TokenKind::Eof => self.line_comment = 0,
            _ => {}
        }
    }
}

/// Scan `text` in one forward pass.
///
/// `on_code_token` receives the offset of every token seen outside comments;
/// the symbol extractor hangs its zones off these offsets. Returns the first
/// unbalanced family (curly, bracket, paren, block comment) as an error.
pub fn scan<F>(file: &str, text: &str, mut on_code_token: F) -> Result<(), StructuralError>
where
    F: FnMut(usize),
{
    let mut depths = Depths::default();
    let mut last_unresolved: [Option<usize>; 4] = [None; 4];

    for token in Tokens::new(text) {
        depths.apply(token.kind);

        if !depths.in_comment() {
            on_code_token(token.offset);
        }

        for delimiter in Delimiter::ALL {
            if depths.of(delimiter) > 0 {
                last_unresolved[delimiter.index()] = Some(token.offset);
            }
        }

        if token.kind == TokenKind::Eof {
            break;
        }
    }

    for delimiter in Delimiter::ALL {
        if depths.of(delimiter) > 0 {
            let offset = last_unresolved[delimiter.index()].unwrap_or(0);
            log::trace!(
                "Unbalanced '{}' in {} (last unresolved offset {})",
                delimiter.opener(),
                file,
                offset
            );
            return Err(StructuralError::at(file, text, delimiter, offset));
        }
    }

    Ok(())
}
