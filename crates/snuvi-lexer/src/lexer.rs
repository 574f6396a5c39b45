//! Lexer for a single source file
//!
//! Converts raw script text into a flat [`Token`] list. Import statements are
//! left in the stream as `import "name" ;` and spliced by the
//! [`Tokenizer`](crate::source::Tokenizer).

use crate::error::{LexError, LexErrorKind};
use crate::line::SourceLine;
use crate::token::{Literal, Token, TokenKind, OPERATORS};

pub struct Lexer<'a> {
    file: &'a str,
    file_id: u32,
    chars: Vec<char>,
    pos: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    /// `file` is only used for error messages; `file_id` is packed into every line.
    pub fn new(file: &'a str, file_id: u32, source: &str) -> Self {
        Self {
            file,
            file_id,
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// Tokenize the whole input. The result does not contain an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Line of the next unread character
    pub fn current_line(&self) -> SourceLine {
        SourceLine::new(self.file_id, self.line)
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;

        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let line = self.current_line();

        if c.is_ascii_alphabetic() {
            let word = self.read_word();
            let token = match TokenKind::keyword(&word) {
                Some(kind) => Token::new(kind, line),
                None => Token::with_payload(TokenKind::Name, line, Literal::Text(word)),
            };
            return Ok(Some(token));
        }

        if c.is_ascii_digit() {
            return self.read_number().map(Some);
        }

        match c {
            '"' => self.read_string().map(Some),
            '$' | '@' => {
                self.pos += 1;
                match self.peek() {
                    Some(next) if next.is_ascii_alphabetic() || next == '_' => {
                        let name = self.read_word();
                        let kind = if c == '$' {
                            TokenKind::GlobalName
                        } else {
                            TokenKind::Label
                        };
                        Ok(Some(Token::with_payload(kind, line, Literal::Text(name))))
                    }
                    _ => Err(self.error(line, LexErrorKind::UnexpectedCharacter(c))),
                }
            }
            _ => self.read_operator(line).map(Some),
        }
    }

    /// Skip whitespace, line comments and block comments
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('\n'), _) => {
                    self.line += 1;
                    self.pos += 1;
                }
                (Some(c), _) if c.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.current_line();
                    self.pos += 2;
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some('\n'), _) => {
                                self.line += 1;
                                self.pos += 1;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => {
                                return Err(self.error(start, LexErrorKind::UnterminatedComment))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Letters, digits, underscores and dots
    fn read_word(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let line = self.current_line();
        let start = self.pos;

        self.skip_digits();
        if self.peek() == Some('.') {
            self.pos += 1;
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.malformed_number(start, line));
            }
            self.skip_digits();
        }

        // `1.2.3`, `12abc` and `3_000` are all rejected
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(self.malformed_number(start, line));
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        let value = text
            .parse::<f64>()
            .map_err(|_| self.error(line, LexErrorKind::MalformedNumber(text.clone())))?;
        Ok(Token::with_payload(
            TokenKind::Number,
            line,
            Literal::Number(value),
        ))
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn malformed_number(&mut self, start: usize, line: SourceLine) -> LexError {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.error(line, LexErrorKind::MalformedNumber(text))
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let line = self.current_line();
        self.pos += 1; // opening quote

        let mut text = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(self.error(line, LexErrorKind::UnterminatedString));
                }
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(other) if other != '\n' => {
                            return Err(self.error(line, LexErrorKind::UnknownEscape(other)));
                        }
                        _ => return Err(self.error(line, LexErrorKind::UnterminatedString)),
                    };
                    text.push(escaped);
                    self.pos += 1;
                }
                Some(c) => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }

        Ok(Token::with_payload(
            TokenKind::String,
            line,
            Literal::Text(text),
        ))
    }

    fn read_operator(&mut self, line: SourceLine) -> Result<Token, LexError> {
        for (spelling, kind) in OPERATORS {
            if self.matches(spelling) {
                self.pos += spelling.chars().count();
                return Ok(Token::new(*kind, line));
            }
        }
        let c = self.peek().unwrap_or('\0');
        Err(self.error(line, LexErrorKind::UnexpectedCharacter(c)))
    }

    fn matches(&self, spelling: &str) -> bool {
        spelling
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn error(&self, line: SourceLine, kind: LexErrorKind) -> LexError {
        LexError::new(self.file, line, kind)
    }
}
