//! Snuvi Lexer
//!
//! Turns script text into a flat token stream for the one-pass compiler in
//! `snuvi-vm`.
//!
//! # Modules
//!
//! - `token`: Token kinds, operator table and literal payloads
//! - `lexer`: Single-file tokenizer
//! - `source`: Multi-file streams, `import` splicing and source loaders
//! - `line`: Packed `(file id, line)` locations
//! - `error`: Lexer errors

pub mod error;
pub mod lexer;
pub mod line;
pub mod source;
pub mod token;

// Re-export commonly used items
pub use error::{LexError, LexErrorKind};
pub use lexer::Lexer;
pub use line::SourceLine;
pub use source::{
    tokenize, tokenize_with, DirectoryLoader, MemoryLoader, NoImports, SourceLoader,
    TokenStream, Tokenizer,
};
pub use token::{Literal, Token, TokenKind};
