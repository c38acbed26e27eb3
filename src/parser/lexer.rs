use std::fmt::Display;

use crate::error_handling::{DiagnosticType, LexErrorType, Reporter, TooManyErrors};
use crate::position::{LineTracker, Position};

// Byte order mark, only permitted as the very first character
const BOM: char = '\u{FEFF}';

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenKind {
    Identifier,
    Literal,
    Arrow,
    Pipe,
    Space,
    Eof
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "Identifier"),
            TokenKind::Literal => write!(f, "Literal"),
            TokenKind::Arrow => write!(f, "`->`"),
            TokenKind::Pipe => write!(f, "`|`"),
            TokenKind::Space => write!(f, "whitespace"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Token {
    pub position: Position,
    pub kind: TokenKind,
    pub lexeme: String
}

impl Token {
    pub fn new(position: Position, kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Token { position, kind, lexeme: lexeme.into() }
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

// Decodes the rune at the start of `bytes`. Invalid sequences decode to
// `None` with a width of one byte so the scan can step over them.
fn decode_rune(bytes: &[u8]) -> (Option<char>, usize) {
    let width = match bytes[0] {
        0x00..=0x7F => return (Some(char::from(bytes[0])), 1),
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return (None, 1),
    };

    bytes.get(..width)
        .and_then(|encoded| std::str::from_utf8(encoded).ok())
        .and_then(|text| text.chars().next())
        .map_or((None, 1), |ch| (Some(ch), width))
}

// Turns raw grammar source into tokens, one `next_token` at a time.
//
// The scanner only moves forward. Once the input is used up every further
// `next_token` returns another `Eof` token. Lexical errors go to the `Reporter`
// and the scan carries on past the offending bytes; only running out of
// error budget stops it.
//
// As an `Iterator` the scanner yields every token before the first `Eof`.
#[derive(Debug)]
pub struct Scanner<'src, 'h> {
    src: &'src [u8],
    reporter: Reporter<'h>,
    tracker: LineTracker,

    // Current rune, `None` once the input is used up
    ch: Option<char>,
    // Offset of `ch`
    offset: usize,
    // Offset of the rune after `ch`
    rd_offset: usize,
    // An error has already been reported for `ch`
    ch_reported: bool,

    finished: bool,
}

impl<'src, 'h> Scanner<'src, 'h> {
    pub fn new(src: &'src [u8], reporter: Reporter<'h>) -> Result<Self, TooManyErrors> {
        let mut scanner = Scanner {
            src,
            reporter,
            tracker: LineTracker::new(),
            ch: None,
            offset: 0,
            rd_offset: 0,
            ch_reported: false,
            finished: false,
        };

        scanner.bump()?;
        if scanner.ch == Some(BOM) {
            scanner.bump()?;
        }
        Ok(scanner)
    }

    pub fn current_position(&self) -> Position {
        self.tracker.position(self.offset)
    }

    pub fn at_eof(&self) -> bool {
        self.ch.is_none()
    }

    pub fn error_count(&self) -> usize {
        self.reporter.error_count()
    }

    pub(crate) fn report(&mut self, location: Position, error: impl Into<DiagnosticType>) -> Result<(), TooManyErrors> {
        self.reporter.report(location, error)
    }

    fn error(&mut self, error: LexErrorType) -> Result<(), TooManyErrors> {
        self.ch_reported = true;
        let location = self.current_position();
        self.reporter.report(location, error)
    }

    // Moves on to the next rune
    fn bump(&mut self) -> Result<(), TooManyErrors> {
        if let Some(previous) = self.ch {
            self.tracker.advance(previous, self.rd_offset);
        }
        self.offset = self.rd_offset;
        self.ch_reported = false;

        let rest = &self.src[self.rd_offset..];
        if rest.is_empty() {
            self.ch = None;
            return Ok(());
        }

        let (decoded, width) = decode_rune(rest);
        self.rd_offset += width;
        self.ch = Some(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));

        match decoded {
            None => self.error(LexErrorType::IllegalUtf8),
            Some('\0') => self.error(LexErrorType::IllegalNul),
            Some(BOM) if self.offset > 0 => self.error(LexErrorType::IllegalByteOrderMark),
            Some(_) => Ok(()),
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), TooManyErrors> {
        while self.ch.is_some_and(is_whitespace) {
            self.bump()?;
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<Token, TooManyErrors> {
        loop {
            let position = self.current_position();
            let Some(ch) = self.ch else {
                return Ok(Token::new(position, TokenKind::Eof, ""));
            };

            match ch {
                c if is_whitespace(c) => {
                    self.skip_whitespace()?;
                    return Ok(Token::new(position, TokenKind::Space, ""));
                }
                'a'..='z' => {
                    self.bump()?;
                    return Ok(Token::new(position, TokenKind::Literal, ch));
                }
                'A'..='Z' => {
                    let mut lexeme = String::from(ch);
                    self.bump()?;
                    while let Some(digit @ '0'..='9') = self.ch {
                        lexeme.push(digit);
                        self.bump()?;
                    }
                    return Ok(Token::new(position, TokenKind::Identifier, lexeme));
                }
                '-' => {
                    self.bump()?;
                    // a byte that already failed to decode is not blamed twice
                    if self.ch != Some('>') && !self.ch_reported {
                        self.error(LexErrorType::MalformedArrow(self.ch))?;
                    }
                    self.bump()?;
                    return Ok(Token::new(position, TokenKind::Arrow, "->"));
                }
                '|' => {
                    self.bump()?;
                    return Ok(Token::new(position, TokenKind::Pipe, "|"));
                }
                '#' => {
                    while !matches!(self.ch, None | Some('\n')) {
                        self.bump()?;
                    }
                    self.skip_whitespace()?;
                }
                _ => {
                    if !self.ch_reported {
                        self.error(LexErrorType::UnexpectedCharacter(ch))?;
                    }
                    self.bump()?;
                }
            }
        }
    }
}

impl Iterator for Scanner<'_, '_> {
    type Item = Result<Token, TooManyErrors>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

// Every token in `src` up to (not including) the end of input.
pub fn tokenize(src: &[u8], reporter: Reporter<'_>) -> Result<Vec<Token>, TooManyErrors> {
    Scanner::new(src, reporter)?.collect()
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error_handling::{Diagnostic, Diagnostics};
    use TokenKind::*;

    fn lex(src: &[u8]) -> (Vec<Token>, Diagnostics) {
        let mut errors: Diagnostics = Vec::new();
        let reporter = Reporter::new(|d: &Diagnostic| errors.push(d.clone()), 100);
        let tokens = tokenize(src, reporter).unwrap();
        (tokens, errors)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_normal_programs() {
        let programs = vec![
            "S -> ab",
            "S -> aB\n\t\t # comment\n\t\t B -> b",
            "S -> aB | Ba\n\t\t B -> b",
        ];
        let answers = vec![
            vec![Identifier, Space, Arrow, Space, Literal, Literal],
            vec![
                Identifier, Space, Arrow, Space, Literal, Identifier, Space,
                Identifier, Space, Arrow, Space, Literal
            ],
            vec![
                Identifier, Space, Arrow, Space, Literal, Identifier, Space, Pipe, Space,
                Identifier, Literal, Space, Identifier, Space, Arrow, Space, Literal
            ],
        ];

        for (program, answer) in zip(programs, answers) {
            let (tokens, errors) = lex(program.as_bytes());
            assert_eq!(kinds(&tokens), answer, "program: {:?}", program);
            assert!(errors.is_empty());
        }
    }

    #[test]
    fn lex_lexemes_and_positions() {
        let (tokens, _) = lex(b"S -> aB12\nC3 -> c");

        assert_eq!(tokens, vec![
            Token::new(Position::new(0, 1, 1), Identifier, "S"),
            Token::new(Position::new(1, 1, 2), Space, ""),
            Token::new(Position::new(2, 1, 3), Arrow, "->"),
            Token::new(Position::new(4, 1, 5), Space, ""),
            Token::new(Position::new(5, 1, 6), Literal, "a"),
            Token::new(Position::new(6, 1, 7), Identifier, "B12"),
            Token::new(Position::new(9, 1, 10), Space, ""),
            Token::new(Position::new(10, 2, 1), Identifier, "C3"),
            Token::new(Position::new(12, 2, 3), Space, ""),
            Token::new(Position::new(13, 2, 4), Arrow, "->"),
            Token::new(Position::new(15, 2, 6), Space, ""),
            Token::new(Position::new(16, 2, 7), Literal, "c"),
        ]);
    }

    #[test]
    fn eof_repeats() {
        let mut scanner = Scanner::new(b"a\n", Reporter::default()).unwrap();

        assert_eq!(scanner.next_token().unwrap().kind, Literal);
        assert_eq!(scanner.next_token().unwrap().kind, Space);
        for _ in 0..3 {
            assert_eq!(scanner.next_token().unwrap(), Token::new(Position::new(2, 2, 1), Eof, ""));
        }
        assert!(scanner.at_eof());
        assert_eq!(scanner.next(), None);
    }

    #[test]
    fn comments_are_transparent() {
        let (tokens, errors) = lex(b"# leading\nS -> a # trailing");
        assert_eq!(kinds(&tokens), vec![Identifier, Space, Arrow, Space, Literal, Space]);
        assert!(errors.is_empty());

        let (tokens, _) = lex(b"#only a comment");
        assert!(tokens.is_empty());
    }

    #[test]
    fn lex_malformed_arrow() {
        let (tokens, errors) = lex(b"S -a b");

        assert_eq!(kinds(&tokens), vec![Identifier, Space, Arrow, Space, Literal]);
        assert_eq!(errors, vec![Diagnostic {
            location: Position::new(3, 1, 4),
            error: LexErrorType::MalformedArrow(Some('a')).into()
        }]);

        let (tokens, errors) = lex(b"S -");
        assert_eq!(kinds(&tokens), vec![Identifier, Space, Arrow]);
        assert_eq!(errors[0].error, DiagnosticType::from(LexErrorType::MalformedArrow(None)));
    }

    #[test]
    fn lex_illegal_bytes() {
        let sources: Vec<&[u8]> = vec![
            b"S\0a",
            b"S\xffa",
            b"S\xc0a",
            b"S\xef\xbb\xbfa",
            b"S!a",
        ];
        let answers = vec![
            LexErrorType::IllegalNul,
            LexErrorType::IllegalUtf8,
            LexErrorType::IllegalUtf8,
            LexErrorType::IllegalByteOrderMark,
            LexErrorType::UnexpectedCharacter('!'),
        ];

        for (src, answer) in zip(sources, answers) {
            let (tokens, errors) = lex(src);
            assert_eq!(kinds(&tokens), vec![Identifier, Literal], "source: {:?}", src);
            assert_eq!(errors.len(), 1, "source: {:?}", src);
            assert_eq!(errors[0].location, Position::new(1, 1, 2));
            assert_eq!(errors[0].error, DiagnosticType::from(answer));
        }
    }

    #[test]
    fn leading_bom_is_skipped() {
        let (tokens, errors) = lex(b"\xef\xbb\xbfS -> a");

        assert!(errors.is_empty());
        assert_eq!(tokens[0], Token::new(Position::new(3, 1, 4), Identifier, "S"));
    }

    #[test]
    fn multibyte_rune_widths() {
        let (tokens, errors) = lex("é a".as_bytes());

        assert_eq!(errors[0].error, DiagnosticType::from(LexErrorType::UnexpectedCharacter('é')));
        assert_eq!(tokens, vec![
            Token::new(Position::new(2, 1, 3), Space, ""),
            Token::new(Position::new(3, 1, 4), Literal, "a"),
        ]);
    }

    #[test]
    fn too_many_lex_errors() {
        let result = tokenize(b"S -> !!!!!!!!", Reporter::new(|_: &Diagnostic| {}, 5));

        assert_eq!(result, Err(TooManyErrors {
            count: 6,
            location: Position::new(10, 1, 11)
        }));
    }

    #[test]
    fn step_by_hand_then_iterate() {
        let mut scanner = Scanner::new(b"S -> aB", Reporter::default()).unwrap();

        assert_eq!(scanner.next_token().unwrap(), Token::new(Position::new(0, 1, 1), Identifier, "S"));
        assert_eq!(scanner.current_position(), Position::new(1, 1, 2));

        let rest: Vec<Token> = scanner.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(kinds(&rest), vec![Space, Arrow, Space, Literal, Identifier]);
        assert_eq!(scanner.next_token().unwrap().kind, Eof);
    }

    #[test]
    fn bad_byte_after_dash_is_reported_once() {
        let sources: Vec<&[u8]> = vec![b"S -\xffa", b"S -\0a"];
        let answers = vec![LexErrorType::IllegalUtf8, LexErrorType::IllegalNul];

        for (src, answer) in zip(sources, answers) {
            let (tokens, errors) = lex(src);
            assert_eq!(kinds(&tokens), vec![Identifier, Space, Arrow, Literal], "source: {:?}", src);
            assert_eq!(errors.len(), 1, "source: {:?}", src);
            assert_eq!(errors[0].location, Position::new(3, 1, 4));
            assert_eq!(errors[0].error, DiagnosticType::from(answer));
        }
    }
}
