use itertools::Itertools;

use super::{Grammar, Nonterminal, Rule, Symbol};
use crate::error_handling::{VerifyError, VerifyErrors};

// Nonterminals used by `rule` that have no production of their own
fn rule_undefined_symbols<'g>(rule: &'g Rule, grammar: &'g Grammar) -> impl Iterator<Item = &'g Nonterminal> + 'g {
    rule.symbols.iter()
        .filter_map(|symbol| match symbol {
            Symbol::Nonterminal(nonterminal) => Some(nonterminal),
            Symbol::Terminal(_) => None
        })
        .filter(move |nonterminal| !grammar.contains(nonterminal))
}

// Each undefined nonterminal once, blamed on the first rule that uses it
fn get_undefined_symbols(grammar: &Grammar) -> VerifyErrors {
    grammar.rules()
        .flat_map(|rule| rule_undefined_symbols(rule, grammar).map(move |name| (name, &rule.from)))
        .unique_by(|(name, _)| *name)
        .map(|(name, used_by)| VerifyError::UndefinedNonterminal {
            name: name.clone(),
            used_by: used_by.clone()
        })
        .collect()
}

impl Grammar {
    // Checks that the start symbol has a production and that every
    // nonterminal on a right hand side is defined. All failures are listed.
    pub fn verify(&self) -> Result<(), VerifyErrors> {
        let mut errors = Vec::new();

        let start = self.start_symbol();
        if !self.contains(&start) {
            errors.push(VerifyError::MissingStartSymbol(start));
        }
        errors.extend(get_undefined_symbols(self));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        let valid = self.verify().is_ok();
        tracing::debug!(valid, "checked grammar validity");
        valid
    }
}
