//! Multi-file token streams
//!
//! A script may consist of several sources: the host can hand in more than one
//! file, and `import "name";` splices another file's tokens in place. Every
//! file gets its own id, which is packed into the line of each token.

use crate::error::{LexError, LexErrorKind};
use crate::lexer::Lexer;
use crate::line::SourceLine;
use crate::token::{Token, TokenKind};
use std::collections::HashMap;
use std::path::PathBuf;

/// Supplies the text of imported files
pub trait SourceLoader {
    fn load(&self, name: &str) -> std::io::Result<String>;
}

/// Loader that rejects every import
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImports;

impl SourceLoader for NoImports {
    fn load(&self, name: &str) -> std::io::Result<String> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("imports are disabled ({})", name),
        ))
    }
}

/// In-memory loader, mostly for embedding hosts and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(name.into(), text.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, name: &str) -> std::io::Result<String> {
        self.files.get(name).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such source")
        })
    }
}

/// Loads `<root>/<name>.snuvi` from disk
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceLoader for DirectoryLoader {
    fn load(&self, name: &str) -> std::io::Result<String> {
        let mut path = self.root.join(name);
        if path.extension().is_none() {
            path.set_extension("snuvi");
        }
        std::fs::read_to_string(path)
    }
}

/// Tokens of all files of one script, terminated by `Eof`
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    /// File names indexed by file id
    pub files: Vec<String>,
}

impl TokenStream {
    /// Name of the file a line belongs to
    pub fn file_name(&self, line: SourceLine) -> &str {
        self.files
            .get(line.file_id() as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }
}

/// Builds a [`TokenStream`] from one or more sources
pub struct Tokenizer<'l> {
    loader: &'l dyn SourceLoader,
    files: Vec<String>,
    /// Files currently being spliced, for cycle detection
    active: Vec<String>,
    tokens: Vec<Token>,
}

impl<'l> Tokenizer<'l> {
    pub fn new(loader: &'l dyn SourceLoader) -> Self {
        Self {
            loader,
            files: Vec::new(),
            active: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// Append a source; its tokens follow those of earlier sources.
    pub fn push_source(&mut self, name: &str, text: &str) -> Result<(), LexError> {
        let file_id = self.files.len() as u32;
        if file_id > SourceLine::MAX_FILE_ID {
            let line = self
                .tokens
                .last()
                .map(|t| t.line)
                .unwrap_or_default();
            return Err(LexError::new(name, line, LexErrorKind::TooManyFiles));
        }
        self.files.push(name.to_string());
        self.active.push(name.to_string());

        let tokens = Lexer::new(name, file_id, text).tokenize()?;
        let mut iter = tokens.into_iter();
        while let Some(token) = iter.next() {
            if token.kind != TokenKind::Import {
                self.tokens.push(token);
                continue;
            }

            let target = match iter.next() {
                Some(t) if t.kind == TokenKind::String => t,
                _ => return Err(LexError::new(name, token.line, LexErrorKind::MalformedImport)),
            };
            if !matches!(iter.next(), Some(t) if t.kind == TokenKind::Semicolon) {
                return Err(LexError::new(name, token.line, LexErrorKind::MalformedImport));
            }
            let import = target.text().unwrap_or_default().to_string();
            self.import(name, token.line, import)?;
        }

        self.active.pop();
        Ok(())
    }

    fn import(&mut self, from: &str, line: SourceLine, name: String) -> Result<(), LexError> {
        if self.active.contains(&name) {
            return Err(LexError::new(from, line, LexErrorKind::ImportCycle(name)));
        }
        if self.files.contains(&name) {
            return Ok(());
        }
        let text = self.loader.load(&name).map_err(|e| {
            LexError::new(
                from,
                line,
                LexErrorKind::ImportFailed {
                    name: name.clone(),
                    reason: e.to_string(),
                },
            )
        })?;
        self.push_source(&name, &text)
    }

    /// Terminate the stream with an `Eof` token
    pub fn finish(mut self) -> TokenStream {
        let line = self
            .tokens
            .last()
            .map(|t| t.line)
            .unwrap_or_else(|| SourceLine::new(0, 1));
        self.tokens.push(Token::new(TokenKind::Eof, line));
        TokenStream {
            tokens: self.tokens,
            files: self.files,
        }
    }
}

/// Tokenize a single self-contained source
pub fn tokenize(name: &str, text: &str) -> Result<TokenStream, LexError> {
    tokenize_with(name, text, &NoImports)
}

/// Tokenize a source, resolving imports through `loader`
pub fn tokenize_with(
    name: &str,
    text: &str,
    loader: &dyn SourceLoader,
) -> Result<TokenStream, LexError> {
    let mut tokenizer = Tokenizer::new(loader);
    tokenizer.push_source(name, text)?;
    Ok(tokenizer.finish())
}
