//! Recursive-descent parser: token stream to [`Grammar`].
//!
//! One method per nonterminal of the EBNF-of-EBNF:
//!
//! ```text
//! File       = { Rule } ;
//! Rule       = Identifier "=" Expression ";" ;
//! Expression = Term { "|" Term } ;
//! Term       = Factor { "," Factor } ;
//! Factor     = [ Number "*" ] Primary [ "-" Primary ] ;
//! Primary    = Identifier | StringLiteral | "(" Expression ")"
//!            | "[" Expression "]" | "{" Expression "}" ;
//! ```
//!
//! Parsing never fails. A rule that does not parse becomes a syntax
//! diagnostic, the parser skips to the next rule boundary, and parsing
//! resumes there.

use crate::ast::{Grammar, Rule};
use crate::diagnostic::{sort_diagnostics, Diagnostic};
use crate::lexer::{self, Token, TokenKind};
use crate::source::Span;
use std::collections::BTreeMap;

mod expressions;

/// Deepest bracket nesting the parser descends into. Anything deeper is a
/// syntax error, which keeps every recursive walk over the AST bounded.
pub const MAX_NESTING: usize = 128;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser {
    /// Structural tokens only, always ending in `EndOfInput`.
    tokens: Vec<Token>,
    pos: usize,
    /// Problems that do not abandon the current rule.
    diagnostics: Vec<Diagnostic>,
    /// Brackets currently open.
    depth: usize,
}

impl Parser {
    fn new(all: &[Token]) -> Self {
        let mut tokens: Vec<Token> = all.iter().filter(|t| !t.kind.is_trivia()).cloned().collect();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfInput) {
            let end = all.last().map_or(0, |t| t.span.end);
            tokens.retain(|t| t.kind != TokenKind::EndOfInput);
            tokens.push(Token {
                kind: TokenKind::EndOfInput,
                span: Span::point(end),
                text: String::new(),
            });
        }
        Parser {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> TokenKind {
        self.cur().kind
    }

    fn peek_nth(&self, n: usize) -> TokenKind {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn advance(&mut self) -> Token {
        let t = self.cur().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// "expected X, found Y" at the current token.
    fn unexpected(&self, expected: &str) -> Diagnostic {
        let found = self.cur();
        let what = match found.kind {
            TokenKind::Identifier => format!("rule name `{}`", found.text),
            TokenKind::StringLiteral => format!("string literal {}", found.text),
            TokenKind::Number => format!("number `{}`", found.text),
            TokenKind::BadCharacter => format!("unexpected character `{}`", found.text.escape_debug()),
            TokenKind::EndOfInput => "end of input".to_owned(),
            other => other.describe().to_owned(),
        };
        Diagnostic::syntax(found.span, format!("expected {}, found {}", expected, what))
    }

    // -- File and rule ---------------------------------------------

    fn parse_rule(&mut self) -> Result<Rule, Diagnostic> {
        self.depth = 0;
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Equals)?;
        let body = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Rule {
            name: name.text,
            name_span: name.span,
            body,
            span: name.span.join(semi.span),
        })
    }

    /// Skip past the broken rule: through the next `;`, or up to the next
    /// `name =` that starts a rule. Always consumes at least one token.
    /// Bad characters skipped on the way are reported, except the one
    /// `reported` already points at.
    fn recover_to_next_rule(&mut self, rule_start: usize, reported: Span) {
        if self.pos == rule_start {
            self.skip(reported);
        }
        loop {
            match self.peek() {
                TokenKind::EndOfInput => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::Identifier if self.peek_nth(1) == TokenKind::Equals => break,
                _ => self.skip(reported),
            }
        }
        log::trace!(
            "recovered from rule at token {} to token {}",
            rule_start,
            self.pos
        );
    }

    fn skip(&mut self, reported: Span) {
        let t = self.advance();
        if t.kind == TokenKind::BadCharacter && t.span != reported {
            self.diagnostics.push(Diagnostic::syntax(
                t.span,
                format!("unexpected character `{}`", t.text.escape_debug()),
            ));
        }
    }

    fn parse_file(&mut self) -> (Vec<Rule>, Vec<Diagnostic>) {
        let mut rules = Vec::new();
        let mut errors = Vec::new();

        while !self.at(TokenKind::EndOfInput) {
            let start = self.pos;
            match self.parse_rule() {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    self.recover_to_next_rule(start, e.span);
                    errors.push(e);
                }
            }
        }

        (rules, errors)
    }
}

/// Unterminated comments, which the structural parser never sees.
fn comment_diagnostics(tokens: &[Token]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (i, t) in tokens.iter().enumerate() {
        if t.kind != TokenKind::CommentStart {
            continue;
        }
        let mut end = t.span.end;
        let mut closed = false;
        for next in &tokens[i + 1..] {
            match next.kind {
                TokenKind::Comment => end = next.span.end,
                TokenKind::CommentEnd => {
                    closed = true;
                    break;
                }
                _ => break,
            }
        }
        if !closed {
            diagnostics.push(Diagnostic::syntax(
                Span::new(t.span.start, end),
                "unterminated comment: expected `*)` before end of input",
            ));
        }
    }
    diagnostics
}

/// The comment directly above each rule, keyed by rule start. Whitespace
/// between comment and rule is allowed, a blank line is not.
fn leading_comments(tokens: &[Token], rules: &[Rule]) -> BTreeMap<usize, String> {
    let mut comments = BTreeMap::new();
    for rule in rules {
        let Ok(idx) = tokens.binary_search_by_key(&rule.span.start, |t| t.span.start) else {
            continue;
        };
        let mut j = idx;
        while j > 0 && tokens[j - 1].kind == TokenKind::Whitespace {
            if tokens[j - 1].text.matches('\n').count() > 1 {
                break;
            }
            j -= 1;
        }
        if j > 0 && tokens[j - 1].kind == TokenKind::Whitespace {
            continue;
        }
        if j < 2 || tokens[j - 1].kind != TokenKind::CommentEnd {
            continue;
        }
        let text = match tokens[j - 2].kind {
            TokenKind::Comment => tokens[j - 2].text.trim(),
            _ => "",
        };
        comments.insert(rule.span.start, text.to_owned());
    }
    comments
}

/// Parse a token stream (as produced by [`lexer::tokenize`]) into a
/// grammar. Never fails: syntax problems are attached to the result.
pub fn parse(tokens: &[Token]) -> Grammar {
    let mut p = Parser::new(tokens);
    let (rules, errors) = p.parse_file();

    let mut diagnostics = comment_diagnostics(tokens);
    diagnostics.extend(p.diagnostics);
    diagnostics.extend(errors);
    sort_diagnostics(&mut diagnostics);

    let source_text: String = tokens.iter().map(|t| t.text.as_str()).collect();
    let comments = leading_comments(tokens, &rules);

    log::debug!(
        "parsed {} rule(s) with {} syntax diagnostic(s)",
        rules.len(),
        diagnostics.len()
    );
    Grammar::new(rules, source_text, diagnostics, comments)
}

/// [`lexer::tokenize`] followed by [`parse`].
pub fn parse_source(src: &str) -> Grammar {
    parse(&lexer::tokenize(src))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
