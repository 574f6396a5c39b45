//! Token model produced by the lexer

use crate::line::SourceLine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    Number,
    String,
    /// Plain identifier (`a`, `event.load`, `x_1`)
    Name,
    /// Explicit global reference (`$name`)
    GlobalName,
    /// Label (`@name`)
    Label,

    // Keywords
    If,
    Else,
    ElseIf,
    While,
    For,
    Function,
    Break,
    Continue,
    Return,
    Try,
    Catch,
    Import,
    True,
    False,
    Null,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    Shl,   // <<
    Shr,   // >>

    // Assignment
    Assign,        // =
    PlusAssign,    // +=
    MinusAssign,   // -=
    StarAssign,    // *=
    SlashAssign,   // /=
    PercentAssign, // %=
    ShlAssign,     // <<=
    ShrAssign,     // >>=
    AmpAssign,     // &=
    CaretAssign,   // ^=
    PipeAssign,    // |=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ;

    Eof,
}

/// Operator spellings, longest first so a prefix scan is a greedy match.
pub(crate) const OPERATORS: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::ShlAssign),
    (">>=", TokenKind::ShrAssign),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("+=", TokenKind::PlusAssign),
    ("-=", TokenKind::MinusAssign),
    ("*=", TokenKind::StarAssign),
    ("/=", TokenKind::SlashAssign),
    ("%=", TokenKind::PercentAssign),
    ("&=", TokenKind::AmpAssign),
    ("^=", TokenKind::CaretAssign),
    ("|=", TokenKind::PipeAssign),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("!", TokenKind::Bang),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("=", TokenKind::Assign),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
];

impl TokenKind {
    /// Keyword lookup for an identifier run
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::ElseIf,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "return" => TokenKind::Return,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "import" => TokenKind::Import,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => return None,
        };
        Some(kind)
    }

    /// Source spelling of operator, bracket and keyword tokens
    pub fn spelling(self) -> &'static str {
        if let Some((text, _)) = OPERATORS.iter().find(|(_, kind)| *kind == self) {
            return text;
        }
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Name => "name",
            TokenKind::GlobalName => "global name",
            TokenKind::Label => "label",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::ElseIf => "elseif",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Import => "import",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Eof => "end of file",
            _ => "operator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// Literal payload attached to number, string, name and label tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(f64),
    Text(String),
}

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub line: SourceLine,
    pub payload: Option<Literal>,
}

impl Token {
    pub fn new(kind: TokenKind, line: SourceLine) -> Self {
        Self {
            kind,
            line,
            payload: None,
        }
    }

    pub fn with_payload(kind: TokenKind, line: SourceLine, payload: Literal) -> Self {
        Self {
            kind,
            line,
            payload: Some(payload),
        }
    }

    /// Text payload of string, name and label tokens
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Some(Literal::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Numeric payload of number tokens
    pub fn number(&self) -> Option<f64> {
        match self.payload {
            Some(Literal::Number(n)) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.payload) {
            (TokenKind::String, Some(Literal::Text(s))) => write!(f, "\"{}\"", s),
            (TokenKind::GlobalName, Some(Literal::Text(s))) => write!(f, "${}", s),
            (TokenKind::Label, Some(Literal::Text(s))) => write!(f, "@{}", s),
            (_, Some(Literal::Text(s))) => f.write_str(s),
            (_, Some(Literal::Number(n))) => write!(f, "{}", n),
            (kind, None) => write!(f, "{}", kind),
        }
    }
}
