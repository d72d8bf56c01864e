//! Reference index: rule name -> definition, rule name -> uses.
//!
//! Built in one linear pass over a parsed [`Grammar`]. The index borrows
//! the grammar it was built from and is rebuilt, not updated, when the
//! grammar changes.

use crate::ast::{Grammar, Primary, Rule};
use crate::source::Span;
use crate::visit::{self, Visitor};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// One use of a rule name inside some rule body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSite<'g> {
    pub name: &'g str,
    pub span: Span,
    /// Position in `grammar.rules` of the rule whose body holds the use.
    pub rule: usize,
}

/// A rule name defined more than once.
#[derive(Debug, Clone, Copy)]
pub struct Duplicate<'g> {
    pub name: &'g str,
    pub first: &'g Rule,
    pub duplicate: &'g Rule,
}

#[derive(Debug)]
pub struct ReferenceIndex<'g> {
    grammar: &'g Grammar,
    /// First definition of each name.
    pub definitions: BTreeMap<&'g str, &'g Rule>,
    /// Every use of each name, in source order.
    pub references: BTreeMap<&'g str, Vec<ReferenceSite<'g>>>,
    /// Every definition after the first of a name, in source order.
    pub duplicates: Vec<Duplicate<'g>>,
}

impl<'g> ReferenceIndex<'g> {
    pub fn definition(&self, name: &str) -> Option<&'g Rule> {
        self.definitions.get(name).copied()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn references_to(&self, name: &str) -> &[ReferenceSite<'g>] {
        self.references.get(name).map_or(&[], Vec::as_slice)
    }

    /// Names referenced from the body of `rule`, deduplicated, in first-use
    /// order.
    pub fn dependencies_of(&self, rule: &'g Rule) -> Vec<&'g str> {
        let mut seen = Vec::new();
        for name_use in rule.body.references() {
            if !seen.contains(&name_use.name) {
                seen.push(name_use.name);
            }
        }
        seen
    }

    /// Was this index built from `grammar`?
    pub fn belongs_to(&self, grammar: &Grammar) -> bool {
        std::ptr::eq(self.grammar, grammar)
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }
}

struct SiteCollector<'g> {
    rule: usize,
    references: BTreeMap<&'g str, Vec<ReferenceSite<'g>>>,
}

impl<'g> Visitor<'g> for SiteCollector<'g> {
    fn visit_primary(&mut self, primary: &'g Primary) {
        if let Some(name) = primary.reference_name() {
            self.references.entry(name).or_default().push(ReferenceSite {
                name,
                span: primary.span,
                rule: self.rule,
            });
        }
        visit::walk_primary(self, primary);
    }
}

pub fn build_index(grammar: &Grammar) -> ReferenceIndex<'_> {
    let mut definitions: BTreeMap<&str, &Rule> = BTreeMap::new();
    let mut duplicates = Vec::new();

    for rule in &grammar.rules {
        match definitions.entry(rule.name.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(rule);
            }
            Entry::Occupied(first) => duplicates.push(Duplicate {
                name: rule.name.as_str(),
                first: *first.get(),
                duplicate: rule,
            }),
        }
    }

    let mut collector = SiteCollector {
        rule: 0,
        references: BTreeMap::new(),
    };
    for (i, rule) in grammar.rules.iter().enumerate() {
        collector.rule = i;
        collector.visit_rule(rule);
    }

    log::debug!(
        "indexed {} definition(s), {} referenced name(s), {} duplicate(s)",
        definitions.len(),
        collector.references.len(),
        duplicates.len()
    );

    ReferenceIndex {
        grammar,
        definitions,
        references: collector.references,
        duplicates,
    }
}
