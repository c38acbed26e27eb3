use std::fmt::Display;
use std::path::PathBuf;

use crate::grammar::Nonterminal;
use crate::parser::lexer::TokenKind;
use crate::position::Position;

// Number of diagnostics tolerated before a run is abandoned.
pub const DEFAULT_MAX_ERRORS: usize = 5;

pub trait ErrorType: Display + PartialEq {}

#[derive(Debug, PartialEq, Clone)]
pub struct Error<T: ErrorType> {
    pub location: Position,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum LexErrorType {
    #[error("illegal character NUL")]
    IllegalNul,
    #[error("illegal UTF-8 encoding")]
    IllegalUtf8,
    #[error("illegal byte order mark")]
    IllegalByteOrderMark,
    // `-` followed by something other than `>`
    #[error("expected `->` found `-{}`", .0.map(String::from).unwrap_or_default())]
    MalformedArrow(Option<char>),
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
}

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ParseErrorType {
    #[error("expected {expected} found {found}")]
    Expected { expected: TokenKind, found: TokenKind },
    #[error("expected Identifier or Literal found {0}")]
    ExpectedSymbol(TokenKind),
    // A right hand side with no symbols in it
    #[error("empty alternative")]
    EmptyAlternative,
}

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum DiagnosticType {
    #[error(transparent)]
    Lex(#[from] LexErrorType),
    #[error(transparent)]
    Parse(#[from] ParseErrorType),
}

impl ErrorType for DiagnosticType {}

pub type Diagnostic = Error<DiagnosticType>;
pub type Diagnostics = Errors<DiagnosticType>;

// The run went over its error budget. Nothing built so far is returned.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
#[error("too many errors ({count}), last at {location}")]
pub struct TooManyErrors {
    pub count: usize,
    pub location: Position,
}

// Reasons a grammar fails `Grammar::verify`.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum VerifyError {
    #[error("no production for the start symbol `{0}`")]
    MissingStartSymbol(Nonterminal),
    #[error("could not find definition for `{name}` (used by `{used_by}`)")]
    UndefinedNonterminal { name: Nonterminal, used_by: Nonterminal },
}

pub type VerifyErrors = Vec<VerifyError>;

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("could not read `{}`: {source}", .path.display())]
    File { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    TooManyErrors(#[from] TooManyErrors),
}

pub type ErrorHandler<'h> = Box<dyn FnMut(&Diagnostic) + 'h>;

// Handler used when the caller does not supply one
pub fn log_diagnostic(diagnostic: &Diagnostic) {
    tracing::warn!(position = %diagnostic.location, "{}", diagnostic.error);
}

// Hands every lex and parse error to the error handler and keeps the shared
// count. Going over `max_errors` turns into `TooManyErrors`.
pub struct Reporter<'h> {
    handler: ErrorHandler<'h>,
    max_errors: usize,
    error_count: usize,
}

impl<'h> Reporter<'h> {
    pub fn new(handler: impl FnMut(&Diagnostic) + 'h, max_errors: usize) -> Self {
        Reporter {
            handler: Box::new(handler),
            max_errors,
            error_count: 0,
        }
    }

    pub fn report(&mut self, location: Position, error: impl Into<DiagnosticType>) -> Result<(), TooManyErrors> {
        self.error_count += 1;
        let diagnostic = Diagnostic { location, error: error.into() };
        (self.handler)(&diagnostic);

        if self.error_count > self.max_errors {
            tracing::debug!(count = self.error_count, "error budget exhausted");
            return Err(TooManyErrors { count: self.error_count, location });
        }
        Ok(())
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }
}

impl Default for Reporter<'_> {
    fn default() -> Self {
        Reporter::new(log_diagnostic, DEFAULT_MAX_ERRORS)
    }
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("max_errors", &self.max_errors)
            .field("error_count", &self.error_count)
            .finish_non_exhaustive()
    }
}
