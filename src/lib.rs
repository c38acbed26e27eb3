/*
    Reads grammars written as `S -> aB | b` and answers structural questions
    about them: whether every nonterminal is defined and whether the grammar
    is regular.
*/

pub mod error_handling;
pub mod grammar;
pub mod parser;
pub mod position;

pub use error_handling::{Diagnostic, GrammarError, TooManyErrors, VerifyError};
pub use grammar::{Grammar, Linearity, Nonterminal, Rule, Symbol, Terminal, START_SYMBOL};
pub use parser::{parse, parse_file, parse_with, ParserConfig};
pub use position::Position;
