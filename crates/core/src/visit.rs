//! Read-only AST traversal.
//!
//! Override the `visit_*` methods you care about and call the matching
//! `walk_*` function to keep descending.

use crate::ast::{Expression, Factor, Primary, Rule, Term};

pub trait Visitor<'ast> {
    fn visit_rule(&mut self, rule: &'ast Rule) {
        walk_rule(self, rule)
    }

    fn visit_expression(&mut self, expr: &'ast Expression) {
        walk_expression(self, expr)
    }

    fn visit_term(&mut self, term: &'ast Term) {
        walk_term(self, term)
    }

    fn visit_factor(&mut self, factor: &'ast Factor) {
        walk_factor(self, factor)
    }

    fn visit_primary(&mut self, primary: &'ast Primary) {
        walk_primary(self, primary)
    }
}

pub fn walk_rule<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, rule: &'ast Rule) {
    v.visit_expression(&rule.body);
}

pub fn walk_expression<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expression) {
    for term in &expr.alternatives {
        v.visit_term(term);
    }
}

pub fn walk_term<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, term: &'ast Term) {
    for factor in &term.factors {
        v.visit_factor(factor);
    }
}

pub fn walk_factor<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, factor: &'ast Factor) {
    v.visit_primary(&factor.primary);
    if let Some(exception) = &factor.exception {
        v.visit_primary(exception);
    }
}

pub fn walk_primary<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, primary: &'ast Primary) {
    if let Some(inner) = primary.inner() {
        v.visit_expression(inner);
    }
}
