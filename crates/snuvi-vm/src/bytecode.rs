//! Instruction array format
//!
//! A compiled [`Program`] is a flat list of [`Instruction`]s. Jumps are stored
//! as offsets relative to the jumping instruction (`target - origin - 1`), so
//! the array is position independent and serializable as is.

use serde::{Deserialize, Serialize};
use snuvi_lexer::SourceLine;
use snuvi_types::{Rational, Value};
use std::collections::HashMap;
use std::fmt;

/// Literal folded at compile time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(Rational),
    Str(String),
}

impl Constant {
    pub fn to_value(&self) -> Value {
        match self {
            Constant::Null => Value::Null,
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Number(n) => Value::Number(*n),
            Constant::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Str(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other.to_value()),
        }
    }
}

/// Variable cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Index into the script's global table
    Global(u32),
    /// Index into the current call frame's locals
    Local(u32),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Global(i) => write!(f, "g{}", i),
            Slot::Local(i) => write!(f, "l{}", i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    BitNot,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitXor,
    BitOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// Calls handled by the engine itself rather than the native catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intrinsic {
    Goto,
    Gosub,
    Wait,
    Sleep,
    Term,
    EventLoad,
    EventUnload,
    EventIsLoaded,
}

impl Intrinsic {
    pub fn from_name(name: &str) -> Option<Intrinsic> {
        match name {
            "goto" => Some(Intrinsic::Goto),
            "gosub" => Some(Intrinsic::Gosub),
            "wait" => Some(Intrinsic::Wait),
            "sleep" => Some(Intrinsic::Sleep),
            "term" => Some(Intrinsic::Term),
            "event.load" => Some(Intrinsic::EventLoad),
            "event.unload" => Some(Intrinsic::EventUnload),
            "event.isloaded" => Some(Intrinsic::EventIsLoaded),
            _ => None,
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Intrinsic::Wait | Intrinsic::Term => 0,
            _ => 1,
        }
    }
}

/// How a call instruction reaches its implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallTarget {
    /// Index into [`Program::functions`]
    User(u32),
    /// Id in the builtin registry
    Native(u16),
    Intrinsic(Intrinsic),
    /// No such function at compile time; raises when executed
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    // ===== Values =====
    Push(Constant),
    Load(Slot),
    /// Push an assignable handle to a variable
    Ref(Slot),
    /// `base[i, ...]`; arity is 1 + number of indices
    Index,
    /// Like `Index`, but pushes an assignable element handle
    IndexRef,
    Unary(UnaryOp),
    Binary(BinaryOp),
    /// Pops (handle, value); `op` is set for compound assignment
    Assign { op: Option<BinaryOp>, keep: bool },
    /// `++`/`--` on a handle
    Step { delta: i8, postfix: bool, keep: bool },
    /// Short-circuit: a false left side pushes `false` and jumps
    And(i32),
    /// Short-circuit: a true left side pushes `true` and jumps
    Or(i32),
    /// Checks that the right side of `&&`/`||` is a boolean
    Truthy,
    Call {
        name: String,
        target: CallTarget,
        keep: bool,
    },
    Pop,

    // ===== Control flow =====
    Jump(i32),
    /// Pops the condition; false clears the branch flag and jumps past `EndIf`
    If(i32),
    /// Skips the whole `elseif` (condition included) if a branch was taken
    ElseIf(i32),
    Else(i32),
    /// Marks the end of a branch body; sets the branch flag
    EndIf,
    /// Pops the condition; false jumps past `Wend`
    While(i32),
    /// Jumps back to the loop condition
    Wend(i32),
    /// Pops (end, step) into hidden slots and tests the loop variable
    For {
        exit: i32,
        var: Slot,
        end: Slot,
        step: Slot,
    },
    /// Adds the step and jumps back into the body while the bound holds
    Next {
        body: i32,
        var: Slot,
        end: Slot,
        step: Slot,
    },
    /// Leaves a loop, dropping the handlers of `try` blocks it crosses
    Break { offset: i32, handlers: u32 },
    Continue { offset: i32, handlers: u32 },
    /// Function entry marker; normal flow jumps over the body
    Function { skip: i32, index: u32 },
    /// Pushes an error handler; `error_var` receives the message
    Try {
        catch: i32,
        error_var: Option<Slot>,
    },
    /// End of a protected block: pops the handler and skips the catch body
    Catch(i32),
    /// Returns from a call or a `gosub`; terminates at top level
    Return { value: bool },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Push(_) => "PUSH",
            Op::Load(_) => "LOAD",
            Op::Ref(_) => "REF",
            Op::Index => "INDEX",
            Op::IndexRef => "INDEX_REF",
            Op::Unary(_) => "UNARY",
            Op::Binary(_) => "BINARY",
            Op::Assign { .. } => "ASSIGN",
            Op::Step { .. } => "STEP",
            Op::And(_) => "AND",
            Op::Or(_) => "OR",
            Op::Truthy => "TRUTHY",
            Op::Call { .. } => "CALL",
            Op::Pop => "POP",
            Op::Jump(_) => "JUMP",
            Op::If(_) => "IF",
            Op::ElseIf(_) => "ELSEIF",
            Op::Else(_) => "ELSE",
            Op::EndIf => "ENDIF",
            Op::While(_) => "WHILE",
            Op::Wend(_) => "WEND",
            Op::For { .. } => "FOR",
            Op::Next { .. } => "NEXT",
            Op::Break { .. } => "BREAK",
            Op::Continue { .. } => "CONTINUE",
            Op::Function { .. } => "FUNCTION",
            Op::Try { .. } => "TRY",
            Op::Catch(_) => "CATCH",
            Op::Return { .. } => "RETURN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub line: SourceLine,
    /// Operands popped from the value stack before execution
    pub arity: u8,
    pub op: Op,
}

impl Instruction {
    pub fn new(line: SourceLine, arity: u8, op: Op) -> Self {
        Self { line, arity, op }
    }
}

/// Absolute target of a relative jump stored at `origin`
#[inline]
pub fn jump_target(origin: usize, offset: i32) -> usize {
    (origin as i64 + 1 + offset as i64) as usize
}

/// Relative offset from `origin` to `target`
#[inline]
pub fn jump_offset(origin: usize, target: usize) -> i32 {
    (target as i64 - origin as i64 - 1) as i32
}

/// A compiled user function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// First instruction of the body
    pub entry: usize,
    /// Parameters occupy the first local slots
    pub params: usize,
    /// Local variable names by slot
    pub locals: Vec<String>,
    /// Labels defined inside the body
    pub labels: HashMap<String, usize>,
}

/// Output of the compiler; shared by every script started from it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub code: Vec<Instruction>,
    /// Global variable names by slot
    pub globals: Vec<String>,
    /// Top-level labels
    pub labels: HashMap<String, usize>,
    pub functions: Vec<FunctionInfo>,
    /// Source file names by file id
    pub files: Vec<String>,
}

impl Program {
    pub fn global_slot(&self, name: &str) -> Option<usize> {
        self.globals.iter().position(|g| g == name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// `file:line` for diagnostics
    pub fn location(&self, line: SourceLine) -> String {
        let file = self
            .files
            .get(line.file_id() as usize)
            .map(String::as_str)
            .unwrap_or("?");
        format!("{}:{}", file, line.line())
    }
}
