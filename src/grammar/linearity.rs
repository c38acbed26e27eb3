use super::{Grammar, Symbol};

// Which regular form the rules of a grammar share.
//
// `Left` rules look like `Ba` or `a`, `Right` rules look like `aB` or `a`.
// A grammar whose rules are all single terminals is `Both`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Linearity {
    Left,
    Right,
    Both,
    Neither,
}

impl Linearity {
    pub fn is_regular(self) -> bool {
        self != Linearity::Neither
    }
}

impl Grammar {
    pub fn linearity(&self) -> Linearity {
        use Symbol::{Nonterminal as N, Terminal as T};

        let (mut all_left, mut all_right) = (true, true);

        for rule in self.rules() {
            match rule.symbols.as_slice() {
                [_, _, _, ..] | [N(_)] | [N(_), N(_)] | [T(_), T(_)] => {
                    // One bad rule rules out both forms for the whole grammar
                    tracing::debug!(rule = %rule, from = %rule.from, "rule is not linear");
                    return Linearity::Neither;
                }
                [N(_), T(_)] => all_right = false,
                [T(_), N(_)] => all_left = false,
                [T(_)] | [] => {}
            }
        }

        match (all_left, all_right) {
            (true, true) => Linearity::Both,
            (true, false) => Linearity::Left,
            (false, true) => Linearity::Right,
            (false, false) => Linearity::Neither,
        }
    }

    pub fn is_regular(&self) -> bool {
        let linearity = self.linearity();
        tracing::debug!(?linearity, "classified grammar");
        linearity.is_regular()
    }
}
