//! Lexer: EBNF source text to a flat token stream.
//!
//! Lexing is total. Every byte of the input lands in exactly one token,
//! unknown characters become [`TokenKind::BadCharacter`], and an
//! unterminated string or comment simply runs to the end of input. The
//! parser decides which of these are errors.

use crate::source::Span;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Letter followed by letters, digits or underscores
    Identifier,
    /// Single- or double-quoted terminal, quotes included
    StringLiteral,
    /// Run of ASCII digits
    Number,
    /// `(*`
    CommentStart,
    /// Comment body between `(*` and `*)`
    Comment,
    /// `*)`
    CommentEnd,
    Equals,
    Semicolon,
    Comma,
    VerticalBar,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    /// `*`
    RepetitionSymbol,
    /// `-`
    ExceptionSymbol,
    Whitespace,
    BadCharacter,
    EndOfInput,
}

impl TokenKind {
    /// Whitespace and comments: everything the parser skips.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::CommentStart
                | TokenKind::Comment
                | TokenKind::CommentEnd
        )
    }

    /// Human-readable name used in "expected ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Identifier => "rule name",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Number => "number",
            TokenKind::CommentStart => "`(*`",
            TokenKind::Comment => "comment",
            TokenKind::CommentEnd => "`*)`",
            TokenKind::Equals => "`=`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Comma => "`,`",
            TokenKind::VerticalBar => "`|`",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::RepetitionSymbol => "`*`",
            TokenKind::ExceptionSymbol => "`-`",
            TokenKind::Whitespace => "whitespace",
            TokenKind::BadCharacter => "unexpected character",
            TokenKind::EndOfInput => "end of input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// The exact source text of the token.
    pub text: String,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    in_comment: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            pos: 0,
            in_comment: false,
            finished: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start, self.pos),
            text: self.src[start..self.pos].to_owned(),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let start = self.pos;

        if self.in_comment {
            if self.rest().starts_with("*)") {
                self.pos += 2;
                self.in_comment = false;
                return Some(self.token(TokenKind::CommentEnd, start));
            }
            if !self.rest().is_empty() {
                self.pos = match self.rest().find("*)") {
                    Some(i) => start + i,
                    None => self.src.len(),
                };
                return Some(self.token(TokenKind::Comment, start));
            }
        }

        let c = match self.peek() {
            Some(c) => c,
            None => {
                self.finished = true;
                return Some(self.token(TokenKind::EndOfInput, start));
            }
        };

        if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            return Some(self.token(TokenKind::Whitespace, start));
        }

        if c.is_alphabetic() {
            self.eat_while(|c| c.is_alphanumeric() || c == '_');
            return Some(self.token(TokenKind::Identifier, start));
        }

        if c.is_ascii_digit() {
            self.eat_while(|c| c.is_ascii_digit());
            return Some(self.token(TokenKind::Number, start));
        }

        if c == '"' || c == '\'' {
            self.bump();
            while let Some(sc) = self.bump() {
                if sc == '\\' {
                    self.bump();
                } else if sc == c {
                    break;
                }
            }
            return Some(self.token(TokenKind::StringLiteral, start));
        }

        if self.rest().starts_with("(*") {
            self.pos += 2;
            self.in_comment = true;
            return Some(self.token(TokenKind::CommentStart, start));
        }

        self.bump();
        let kind = match c {
            '=' => TokenKind::Equals,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '|' => TokenKind::VerticalBar,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '*' => TokenKind::RepetitionSymbol,
            '-' => TokenKind::ExceptionSymbol,
            _ => TokenKind::BadCharacter,
        };
        Some(self.token(kind, start))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Split `src` into tokens. The result always ends with exactly one
/// [`TokenKind::EndOfInput`] token, and the concatenated token texts equal
/// `src`.
pub fn tokenize(src: &str) -> Vec<Token> {
    let tokens: Vec<Token> = Lexer::new(src).collect();
    log::debug!("lexed {} bytes into {} token(s)", src.len(), tokens.len());
    tokens
}
