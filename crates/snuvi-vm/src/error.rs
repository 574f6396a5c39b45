//! Error types for the compiler and the execution engine

use snuvi_lexer::{LexError, LexErrorKind, SourceLine};
use snuvi_types::{ArithmeticError, ArrayError};
use thiserror::Error;

/// What went wrong while compiling
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileErrorKind {
    /// Tokenizer failure
    #[error("{0}")]
    Lex(LexErrorKind),

    #[error("expected {expected}, found '{found}'")]
    Expected { expected: String, found: String },

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("break statement outside loop")]
    BreakOutsideLoop,

    #[error("continue statement outside loop")]
    ContinueOutsideLoop,

    #[error("catch without try")]
    CatchWithoutTry,

    #[error("try block must be followed by catch")]
    TryWithoutCatch,

    #[error("duplicate label '@{0}'")]
    DuplicateLabel(String),

    #[error("function '{0}' is already defined")]
    DuplicateFunction(String),

    #[error("functions cannot be defined inside functions")]
    NestedFunction,

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("for loop variable must be a plain variable")]
    InvalidLoopVariable,

    #[error("function '{function}' takes {expected} argument(s), got {got}")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("too many arguments (max 255)")]
    TooManyArguments,

    #[error("expression or block nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(String),

    #[error("number literal {0} is out of range")]
    NumberOutOfRange(f64),
}

/// A compilation failure tied to a source location
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{file}:{}: {kind}", line.line())]
pub struct CompileError {
    pub file: String,
    pub line: SourceLine,
    pub kind: CompileErrorKind,
}

impl CompileError {
    pub fn new(file: impl Into<String>, line: SourceLine, kind: CompileErrorKind) -> Self {
        Self {
            file: file.into(),
            line,
            kind,
        }
    }
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        Self {
            file: e.file,
            line: e.line,
            kind: CompileErrorKind::Lex(e.kind),
        }
    }
}

/// Runtime failures
///
/// All of these are catchable by an enclosing `try`; without one they are
/// logged and terminate the script.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VmError {
    #[error("undefined function '{0}'")]
    UndefinedFunction(String),

    #[error("type error in {operation}: expected {expected}, got {got}")]
    TypeMismatch {
        operation: String,
        expected: &'static str,
        got: String,
    },

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error(transparent)]
    Array(#[from] ArrayError),

    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("{0} cannot be used as a map key or set element")]
    InvalidKey(String),

    #[error("unknown label '@{0}'")]
    UnknownLabel(String),

    #[error("'{function}' takes {expected} argument(s), got {got}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("for loop step must not be zero")]
    ZeroStep,

    #[error("call depth limit of {0} exceeded")]
    StackOverflow(usize),

    /// Malformed instruction stream; never caused by user code
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// Raised by `throw`
    #[error("{0}")]
    Thrown(String),
}

impl VmError {
    pub(crate) fn type_mismatch(
        operation: impl Into<String>,
        expected: &'static str,
        got: &snuvi_types::Value,
    ) -> Self {
        VmError::TypeMismatch {
            operation: operation.into(),
            expected,
            got: got.type_name().to_string(),
        }
    }
}
