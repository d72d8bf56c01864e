use super::{Parser, MAX_NESTING};
use crate::ast::{Expression, Factor, Primary, PrimaryKind, Term};
use crate::diagnostic::Diagnostic;
use crate::lexer::TokenKind;
use crate::source::Span;

impl Parser {
    // -- Alternation and concatenation -----------------------------

    pub(super) fn parse_expression(&mut self) -> Result<Expression, Diagnostic> {
        let mut alternatives = vec![self.parse_term()?];
        while self.at(TokenKind::VerticalBar) {
            self.advance();
            alternatives.push(self.parse_term()?);
        }
        let span = alternatives[0]
            .span
            .join(alternatives[alternatives.len() - 1].span);
        Ok(Expression { alternatives, span })
    }

    fn parse_term(&mut self) -> Result<Term, Diagnostic> {
        let mut factors = vec![self.parse_factor()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            factors.push(self.parse_factor()?);
        }
        let span = factors[0].span.join(factors[factors.len() - 1].span);
        Ok(Term { factors, span })
    }

    // -- Factor ----------------------------------------------------

    fn parse_factor(&mut self) -> Result<Factor, Diagnostic> {
        let start = self.cur().span.start;

        let count = if self.at(TokenKind::Number) {
            let n = self.advance();
            let count = n.text.parse::<u32>().map_err(|_| {
                Diagnostic::syntax(
                    n.span,
                    format!("repetition count `{}` is out of range", n.text),
                )
            })?;
            self.expect(TokenKind::RepetitionSymbol)?;
            Some(count)
        } else {
            None
        };

        let primary = self.parse_primary()?;
        let exception = if self.at(TokenKind::ExceptionSymbol) {
            self.advance();
            Some(self.parse_primary()?)
        } else {
            None
        };

        let end = exception.as_ref().unwrap_or(&primary).span.end;
        Ok(Factor {
            count,
            primary,
            exception,
            span: Span::new(start, end),
        })
    }

    // -- Primary ---------------------------------------------------

    fn parse_primary(&mut self) -> Result<Primary, Diagnostic> {
        match self.peek() {
            TokenKind::Identifier => {
                let t = self.advance();
                Ok(Primary {
                    kind: PrimaryKind::Reference { name: t.text },
                    span: t.span,
                })
            }
            TokenKind::StringLiteral => {
                let t = self.advance();
                let (quote, text, terminated) = split_literal(&t.text);
                if !terminated {
                    self.diagnostics.push(Diagnostic::syntax(
                        t.span,
                        format!("unterminated string literal: expected closing `{}`", quote),
                    ));
                }
                Ok(Primary {
                    kind: PrimaryKind::Literal {
                        text: text.to_owned(),
                        quote,
                    },
                    span: t.span,
                })
            }
            TokenKind::LeftParen => {
                let (inner, span) = self.parse_bracketed(TokenKind::RightParen)?;
                Ok(Primary {
                    kind: PrimaryKind::Group { inner },
                    span,
                })
            }
            TokenKind::LeftBracket => {
                let (inner, span) = self.parse_bracketed(TokenKind::RightBracket)?;
                Ok(Primary {
                    kind: PrimaryKind::Optional { inner },
                    span,
                })
            }
            TokenKind::LeftBrace => {
                let (inner, span) = self.parse_bracketed(TokenKind::RightBrace)?;
                Ok(Primary {
                    kind: PrimaryKind::Repetition { inner },
                    span,
                })
            }
            _ => Err(self.unexpected("rule name, string literal, `(`, `[` or `{`")),
        }
    }

    /// Opening bracket, expression, `close`. The span covers both brackets.
    fn parse_bracketed(&mut self, close: TokenKind) -> Result<(Expression, Span), Diagnostic> {
        let open = self.advance();
        if self.depth >= MAX_NESTING {
            return Err(Diagnostic::syntax(
                open.span,
                format!("nesting too deep: more than {} levels of brackets", MAX_NESTING),
            ));
        }
        self.depth += 1;
        let inner = self.parse_expression();
        self.depth -= 1;
        let inner = inner?;
        let end = self.expect(close)?;
        Ok((inner, open.span.join(end.span)))
    }
}

/// Split a string-literal lexeme into its quote character, its content and
/// whether the closing quote is present.
fn split_literal(lexeme: &str) -> (char, &str, bool) {
    let mut chars = lexeme.chars();
    let quote = chars.next().unwrap_or('"');
    let body = chars.as_str();
    if let Some(content) = body.strip_suffix(quote) {
        let trailing_backslashes = content.chars().rev().take_while(|&c| c == '\\').count();
        if trailing_backslashes % 2 == 0 {
            return (quote, content, true);
        }
    }
    (quote, body, false)
}
