/*
    This module parses grammar source into a `Grammar`
*/

pub mod lexer;

use std::path::Path;

use crate::error_handling::*;
use crate::grammar::*;
use lexer::{Scanner, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserConfig {
    // Lex and parse errors tolerated before giving up
    pub max_errors: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { max_errors: DEFAULT_MAX_ERRORS }
    }
}

// Walks the token stream one production at a time:
//
//     production = Identifier Space? Arrow Space? rhs (Pipe rhs)*
//     rhs        = (Identifier | Literal)+
//
// Errors never stop the walk. A mismatched token is reported and consumed as
// if it had matched, so every step makes progress.
struct Parser<'src, 'h> {
    scanner: Scanner<'src, 'h>,
    token: Token,
    grammar: Grammar,
}

impl<'src, 'h> Parser<'src, 'h> {
    fn new(src: &'src [u8], reporter: Reporter<'h>) -> Result<Self, TooManyErrors> {
        let mut scanner = Scanner::new(src, reporter)?;
        let token = scanner.next_token()?;

        Ok(Parser {
            scanner,
            token,
            grammar: Grammar::new(),
        })
    }

    fn advance(&mut self) -> Result<(), TooManyErrors> {
        self.token = self.scanner.next_token()?;
        Ok(())
    }

    fn error(&mut self, error: ParseErrorType) -> Result<(), TooManyErrors> {
        let location = self.token.position;
        self.scanner.report(location, error)
    }

    // Consumes the current token and hands back its lexeme, complaining first
    // if it is not a `kind`
    fn expect(&mut self, kind: TokenKind) -> Result<String, TooManyErrors> {
        if self.token.kind != kind {
            self.error(ParseErrorType::Expected { expected: kind, found: self.token.kind })?;
        }
        let lexeme = std::mem::take(&mut self.token.lexeme);
        self.advance()?;
        Ok(lexeme)
    }

    fn skip_space(&mut self) -> Result<(), TooManyErrors> {
        while self.token.kind == TokenKind::Space {
            self.advance()?;
        }
        Ok(())
    }

    fn parse_grammar(mut self) -> Result<Grammar, TooManyErrors> {
        loop {
            self.skip_space()?;
            if self.token.kind == TokenKind::Eof {
                break;
            }

            let from = self.parse_lhs()?;
            self.parse_rhs(&from)?;
            while self.token.kind == TokenKind::Pipe {
                self.advance()?;
                self.parse_rhs(&from)?;
            }
        }

        tracing::debug!(
            nonterminals = self.grammar.nonterminals().count(),
            rules = self.grammar.len(),
            errors = self.scanner.error_count(),
            "parsed grammar"
        );
        Ok(self.grammar)
    }

    fn parse_lhs(&mut self) -> Result<Nonterminal, TooManyErrors> {
        let from = Nonterminal::new(self.expect(TokenKind::Identifier)?);
        self.skip_space()?;
        self.expect(TokenKind::Arrow)?;
        Ok(from)
    }

    // One alternative, ended by whitespace, `|` or the end of input
    fn parse_rhs(&mut self, from: &Nonterminal) -> Result<(), TooManyErrors> {
        self.skip_space()?;
        let start = self.token.position;
        let mut rule = Rule::new(from.clone(), Vec::new());

        loop {
            match self.token.kind {
                TokenKind::Space | TokenKind::Pipe | TokenKind::Eof => break,
                TokenKind::Identifier => {
                    rule.push(Symbol::nonterminal(std::mem::take(&mut self.token.lexeme)));
                    self.advance()?;
                }
                TokenKind::Literal => {
                    rule.push(Symbol::terminal(std::mem::take(&mut self.token.lexeme)));
                    self.advance()?;
                }
                TokenKind::Arrow => {
                    self.error(ParseErrorType::ExpectedSymbol(TokenKind::Arrow))?;
                    self.advance()?;
                }
            }
        }
        self.skip_space()?;

        if rule.symbols.is_empty() {
            self.scanner.report(start, ParseErrorType::EmptyAlternative)?;
        } else {
            self.grammar.add_rule(rule);
        }
        Ok(())
    }
}

// Parses `src`, logging every diagnostic through `tracing`.
pub fn parse(src: &[u8]) -> Result<Grammar, TooManyErrors> {
    parse_with(src, ParserConfig::default(), log_diagnostic)
}

// Parses `src`, handing every lex and parse error to `handler`.
//
// Errors do not stop the parse; the grammar built from whatever could be
// read is returned. Only going over `config.max_errors` fails the run.
#[tracing::instrument(level = "debug", skip_all, fields(len = src.len()))]
pub fn parse_with<'h>(
    src: &[u8],
    config: ParserConfig,
    handler: impl FnMut(&Diagnostic) + 'h
) -> Result<Grammar, TooManyErrors> {
    let reporter = Reporter::new(handler, config.max_errors);
    Parser::new(src, reporter)?.parse_grammar()
}

pub fn parse_file<'h>(
    path: &Path,
    config: ParserConfig,
    handler: impl FnMut(&Diagnostic) + 'h
) -> Result<Grammar, GrammarError> {
    let src = std::fs::read(path).map_err(|source| GrammarError::File {
        path: path.to_path_buf(),
        source
    })?;

    Ok(parse_with(&src, config, handler)?)
}
