/*
    This module is for storing and querying grammars
*/

mod linearity;
mod verifier;

use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;

pub use linearity::Linearity;

// The nonterminal every derivation starts from
pub const START_SYMBOL: &str = "S";

// Text of the empty string terminal. The lexer never produces it.
const EPSILON: &str = "ε";

#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub struct Nonterminal(String);

impl Nonterminal {
    pub fn new(name: impl Into<String>) -> Self {
        Nonterminal(name.into())
    }

    pub fn start() -> Self {
        Nonterminal::new(START_SYMBOL)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Nonterminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub struct Terminal(String);

impl Terminal {
    pub fn new(text: impl Into<String>) -> Self {
        Terminal(text.into())
    }

    // The terminal standing for the empty string.
    pub fn epsilon() -> Self {
        Terminal::new(EPSILON)
    }

    pub fn is_epsilon(&self) -> bool {
        self.text() == EPSILON
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

// The base unit in a grammar rule
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
}

impl Symbol {
    pub fn terminal(text: impl Into<String>) -> Self {
        Symbol::Terminal(Terminal::new(text))
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::Nonterminal(Nonterminal::new(name))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(t) => Display::fmt(t, f),
            Symbol::Nonterminal(n) => Display::fmt(n, f),
        }
    }
}

// One alternative right hand side for `from`.
//
// The parser never builds a rule without symbols; an empty production is
// written with `Terminal::epsilon()` instead.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Rule {
    pub from: Nonterminal,
    pub symbols: Vec<Symbol>
}

impl Rule {
    pub fn new(from: Nonterminal, symbols: Vec<Symbol>) -> Self {
        Rule { from, symbols }
    }

    pub fn push(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }
}

// Symbols are written back to back, `aB`
impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.symbols.iter().try_for_each(|symbol| Display::fmt(symbol, f))
    }
}

// Productions keyed by their left hand side.
//
// `ordering` remembers the order left hand sides were first seen so that
// rendering and the analyses walk the grammar deterministically. It has no
// other meaning.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Grammar {
    rules: HashMap<Nonterminal, Vec<Rule>>,
    ordering: Vec<Nonterminal>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    // Identical rules are kept as separate alternatives
    pub fn add_rule(&mut self, rule: Rule) {
        tracing::trace!(from = %rule.from, rule = %rule, "adding rule");

        if !self.rules.contains_key(&rule.from) {
            self.ordering.push(rule.from.clone());
        }
        self.rules.entry(rule.from.clone()).or_default().push(rule);
    }

    pub fn start_symbol(&self) -> Nonterminal {
        Nonterminal::start()
    }

    pub fn contains(&self, nonterminal: &Nonterminal) -> bool {
        self.rules.contains_key(nonterminal)
    }

    pub fn rules_for(&self, nonterminal: &Nonterminal) -> Option<&[Rule]> {
        self.rules.get(nonterminal).map(Vec::as_slice)
    }

    // Left hand sides in the order they were first seen
    pub fn nonterminals(&self) -> impl Iterator<Item = &Nonterminal> {
        self.ordering.iter()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.ordering.iter()
            .flat_map(move |from| self.rules_for(from).unwrap_or_default())
    }

    // Number of rules, counting every alternative
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    // Every rule here has a single nonterminal on its left hand side, so any
    // grammar this type can hold is context free.
    pub fn is_context_free(&self) -> bool {
        true
    }
}

impl FromIterator<Rule> for Grammar {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut grammar = Grammar::new();
        iter.into_iter().for_each(|rule| grammar.add_rule(rule));
        grammar
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for from in &self.ordering {
            let alternatives = self.rules_for(from).unwrap_or_default();
            writeln!(f, "{} -> {}", from, alternatives.iter().join(" | "))?;
        }
        Ok(())
    }
}
