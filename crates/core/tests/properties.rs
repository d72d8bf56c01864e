//! Property tests for the lexer and parser.
//!
//! Covers total lexing, parse idempotence, forward progress on malformed
//! input, bounded nesting, and the render/re-parse round trip.

use ebnf_core::parser::MAX_NESTING;
use ebnf_core::{parse_source, render, tokenize, DiagnosticKind, TokenKind};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9 +*]{0,4}".prop_map(|s| format!("\"{}\"", s)),
        "[a-z0-9 ]{0,4}".prop_map(|s| format!("'{}'", s)),
    ]
}

/// Syntactically valid EBNF expressions.
fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        identifier(),
        literal(),
        (1u32..5, identifier()).prop_map(|(n, id)| format!("{} * {}", n, id)),
        (identifier(), literal()).prop_map(|(id, lit)| format!("{} - {}", id, lit)),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(|v| v.join(", ")),
            prop::collection::vec(inner.clone(), 2..4).prop_map(|v| v.join(" | ")),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.clone().prop_map(|e| format!("[ {} ]", e)),
            inner.prop_map(|e| format!("{{{}}}", e)),
        ]
    })
}

fn rule() -> impl Strategy<Value = String> {
    (identifier(), expression()).prop_map(|(name, body)| format!("{} = {} ;", name, body))
}

proptest! {
    #[test]
    fn lexing_is_total_and_lossless(src in any::<String>()) {
        let tokens = tokenize(&src);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(rebuilt, src);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
        prop_assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::EndOfInput).count(),
            1
        );
    }

    #[test]
    fn token_spans_are_contiguous(src in any::<String>()) {
        let tokens = tokenize(&src);
        let mut offset = 0;
        for t in &tokens {
            prop_assert_eq!(t.span.start, offset);
            offset = t.span.end;
        }
        prop_assert_eq!(offset, src.len());
    }

    #[test]
    fn parsing_is_idempotent(src in any::<String>()) {
        prop_assert_eq!(parse_source(&src), parse_source(&src));
    }

    #[test]
    fn parsing_arbitrary_token_soup_terminates(
        parts in prop::collection::vec(
            prop_oneof![
                Just("a"), Just("="), Just(";"), Just("|"), Just(","), Just("("),
                Just(")"), Just("["), Just("]"), Just("{"), Just("}"), Just("-"),
                Just("*"), Just("3"), Just("\"x\""), Just("@"), Just(" "),
            ],
            0..40,
        )
    ) {
        let src = parts.concat();
        let g = parse_source(&src);
        prop_assert_eq!(g.source_text, src);
    }

    #[test]
    fn malformed_rules_always_report_a_syntax_error(
        rule in rule(),
        tail in prop_oneof![Just(")"), Just("]"), Just("}"), Just("="), Just("|"), Just(",")],
    ) {
        // Drop the terminating `;` and append a token that cannot follow.
        let src = format!("{} {}", rule.trim_end_matches(';').trim_end(), tail);
        let g = parse_source(&src);
        prop_assert!(
            g.diagnostics.iter().any(|d| d.code == DiagnosticKind::SyntaxError),
            "no syntax error for {:?}", src
        );
    }

    #[test]
    fn valid_rules_parse_cleanly(rule in rule()) {
        let g = parse_source(&rule);
        prop_assert!(g.diagnostics.is_empty(), "{:?}: {:?}", rule, g.diagnostics);
        prop_assert_eq!(g.rules.len(), 1);
    }

    #[test]
    fn render_round_trips(rule in rule()) {
        let g = parse_source(&rule);
        let body = render(&g.rules[0].body);
        let again = parse_source(&format!("r = {} ;", body));
        prop_assert!(again.diagnostics.is_empty(), "{:?}", again.diagnostics);
        prop_assert_eq!(render(&again.rules[0].body), body);
    }

    #[test]
    fn node_spans_are_non_empty_and_nested(rule in rule()) {
        let g = parse_source(&rule);
        let r = &g.rules[0];
        prop_assert!(!r.span.is_empty());
        prop_assert!(r.span.contains(r.body.span));
        for term in &r.body.alternatives {
            prop_assert!(!term.span.is_empty());
            prop_assert!(r.body.span.contains(term.span));
            for factor in &term.factors {
                prop_assert!(!factor.span.is_empty());
                prop_assert!(term.span.contains(factor.span));
                prop_assert!(factor.span.contains(factor.primary.span));
            }
        }
    }

    #[test]
    fn nesting_depth_is_bounded(
        brackets in prop::collection::vec(0usize..3, 1..2000),
    ) {
        let open: String = brackets.iter().map(|&b| ['(', '[', '{'][b]).collect();
        let close: String = brackets.iter().rev().map(|&b| [')', ']', '}'][b]).collect();
        let src = format!("a = {}\"x\"{} ;\nb = \"y\" ;", open, close);
        let g = parse_source(&src);
        prop_assert_eq!(g.rules.last().map(|r| r.name.as_str()), Some("b"));
        if brackets.len() <= MAX_NESTING {
            prop_assert!(g.diagnostics.is_empty());
            prop_assert_eq!(g.rules.len(), 2);
            let again = parse_source(&render(&g.rules[0]));
            prop_assert!(again.diagnostics.is_empty());
        } else {
            prop_assert_eq!(g.diagnostics.len(), 1);
            prop_assert!(g.diagnostics[0].message.starts_with("nesting too deep"));
            prop_assert_eq!(g.rules.len(), 1);
        }
    }
}
