//! Lexer errors

use crate::line::SourceLine;
use thiserror::Error;

/// What went wrong while tokenizing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("malformed number literal '{0}'")]
    MalformedNumber(String),

    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("expected a file name string and ';' after import")]
    MalformedImport,

    #[error("cannot import '{name}': {reason}")]
    ImportFailed { name: String, reason: String },

    #[error("import cycle through '{0}'")]
    ImportCycle(String),

    #[error("too many source files (max {})", SourceLine::MAX_FILE_ID + 1)]
    TooManyFiles,
}

/// A tokenizer failure tied to the line where it started
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{file}:{}: {kind}", line.line())]
pub struct LexError {
    pub file: String,
    pub line: SourceLine,
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(file: impl Into<String>, line: SourceLine, kind: LexErrorKind) -> Self {
        Self {
            file: file.into(),
            line,
            kind,
        }
    }
}
