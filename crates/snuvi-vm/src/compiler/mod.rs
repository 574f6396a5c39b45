//! One-pass compiler (tokens to instruction array)
//!
//! Recursive descent with one method per precedence level. Instructions are
//! emitted directly while parsing; forward jumps are emitted with a zero
//! offset and patched in place once the target is known. Calls are resolved
//! in a final pass so functions may be used before they are defined.

use crate::builtins::registry::BuiltinRegistry;
use crate::bytecode::{
    jump_offset, CallTarget, FunctionInfo, Instruction, Intrinsic, Op, Program, Slot,
};
use crate::error::{CompileError, CompileErrorKind};
use snuvi_lexer::{SourceLine, SourceLoader, Token, TokenKind, TokenStream};
use std::collections::HashMap;

// Module structure
mod constants;
mod context;
mod expressions;
mod statements;
pub(crate) mod symbols;

// Internal imports
use context::{FunctionScope, LoopContext};
use symbols::SymbolTable;

type CompileResult<T = ()> = Result<T, CompileError>;

/// Deepest expression or block nesting accepted
pub const MAX_NESTING: usize = 128;

/// Bytecode compiler
pub struct Compiler<'r> {
    /// Native functions visible to call resolution
    registry: &'r BuiltinRegistry,

    tokens: Vec<Token>,
    files: Vec<String>,
    pos: usize,

    code: Vec<Instruction>,
    globals: SymbolTable,
    labels: HashMap<String, usize>,
    functions: Vec<FunctionInfo>,
    function_ids: HashMap<String, u32>,

    /// Function body being compiled, if any
    pub(crate) current: Option<FunctionScope>,

    /// Loop context stack
    pub(crate) loops: Vec<LoopContext>,

    /// Number of enclosing `try` blocks
    pub(crate) try_depth: u32,

    /// Call instructions awaiting resolution
    calls: Vec<usize>,

    /// Open expressions, prefix operators and blocks
    nesting: usize,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r BuiltinRegistry) -> Self {
        Self {
            registry,
            tokens: Vec::new(),
            files: Vec::new(),
            pos: 0,
            code: Vec::new(),
            globals: SymbolTable::new(),
            labels: HashMap::new(),
            functions: Vec::new(),
            function_ids: HashMap::new(),
            current: None,
            loops: Vec::new(),
            try_depth: 0,
            calls: Vec::new(),
            nesting: 0,
        }
    }

    /// Compile a complete token stream
    pub fn compile(mut self, stream: TokenStream) -> CompileResult<Program> {
        self.tokens = stream.tokens;
        self.files = stream.files;
        if self.tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = self.tokens.last().map(|t| t.line).unwrap_or_default();
            self.tokens.push(Token::new(TokenKind::Eof, line));
        }

        while !self.check(TokenKind::Eof) {
            self.statement()?;
        }
        self.resolve_calls()?;

        tracing::debug!(
            instructions = self.code.len(),
            globals = self.globals.len(),
            functions = self.functions.len(),
            "compiled program"
        );

        Ok(Program {
            code: self.code,
            globals: self.globals.into_names(),
            labels: self.labels,
            functions: self.functions,
            files: self.files,
        })
    }

    // ===== Call resolution =====

    /// Bind every call to a user function, an intrinsic or a native.
    ///
    /// User functions shadow natives of the same name. Names nothing knows
    /// about stay unresolved and fail when executed.
    fn resolve_calls(&mut self) -> CompileResult {
        for pos in std::mem::take(&mut self.calls) {
            let instruction = &self.code[pos];
            let (line, argc) = (instruction.line, instruction.arity as usize);
            let Op::Call { name, .. } = &instruction.op else {
                continue;
            };
            let name = name.clone();

            let (resolved, expected) = if let Some(&index) = self.function_ids.get(&name) {
                (CallTarget::User(index), Some(self.functions[index as usize].params))
            } else if let Some(intrinsic) = Intrinsic::from_name(&name) {
                (CallTarget::Intrinsic(intrinsic), Some(intrinsic.arity()))
            } else if let Some(id) = self.registry.get_id(&name) {
                let arity = self.registry.get_metadata(id).map(|m| m.arity).unwrap_or(-1);
                (CallTarget::Native(id), usize::try_from(arity).ok())
            } else {
                (CallTarget::Unresolved, None)
            };

            if let Some(expected) = expected {
                if expected != argc {
                    return Err(self.error_at(
                        line,
                        CompileErrorKind::ArityMismatch {
                            function: name,
                            expected,
                            got: argc,
                        },
                    ));
                }
            }

            if let Op::Call { target, .. } = &mut self.code[pos].op {
                *target = resolved;
            }
        }
        Ok(())
    }

    // ===== Token cursor =====

    pub(crate) fn peek(&self) -> &Token {
        // The stream always ends with Eof and the cursor never passes it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume the next token if it has the given kind
    pub(crate) fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(format!("'{}'", kind)))
        }
    }

    /// Line of the most recently consumed token
    pub(crate) fn line(&self) -> SourceLine {
        let index = self.pos.saturating_sub(1).min(self.tokens.len() - 1);
        self.tokens[index].line
    }

    // ===== Errors =====

    pub(crate) fn error_at(&self, line: SourceLine, kind: CompileErrorKind) -> CompileError {
        let file = self
            .files
            .get(line.file_id() as usize)
            .cloned()
            .unwrap_or_default();
        CompileError::new(file, line, kind)
    }

    /// Error at the next unread token
    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`]
    pub(crate) fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> CompileResult,
    ) -> CompileResult {
        if self.nesting >= MAX_NESTING {
            return Err(self.error(CompileErrorKind::NestingTooDeep(MAX_NESTING)));
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    pub(crate) fn error(&self, kind: CompileErrorKind) -> CompileError {
        self.error_at(self.peek().line, kind)
    }

    pub(crate) fn expected(&self, what: impl Into<String>) -> CompileError {
        self.error(CompileErrorKind::Expected {
            expected: what.into(),
            found: self.peek().to_string(),
        })
    }

    // ===== Emission =====

    /// Emit an instruction on the line of the last consumed token
    pub(crate) fn emit(&mut self, arity: u8, op: Op) -> usize {
        let line = self.line();
        self.emit_at(line, arity, op)
    }

    pub(crate) fn emit_at(&mut self, line: SourceLine, arity: u8, op: Op) -> usize {
        self.code.push(Instruction::new(line, arity, op));
        self.code.len() - 1
    }

    pub(crate) fn code_len(&self) -> usize {
        self.code.len()
    }

    pub(crate) fn last_op_mut(&mut self) -> Option<&mut Op> {
        self.code.last_mut().map(|i| &mut i.op)
    }

    /// Point the jump at `pos` to the next instruction to be emitted
    pub(crate) fn patch_jump(&mut self, pos: usize) {
        let target = self.code.len();
        self.patch_jump_to(pos, target);
    }

    pub(crate) fn patch_jump_to(&mut self, pos: usize, target: usize) {
        let offset = jump_offset(pos, target);
        match &mut self.code[pos].op {
            Op::Jump(o)
            | Op::And(o)
            | Op::Or(o)
            | Op::If(o)
            | Op::ElseIf(o)
            | Op::Else(o)
            | Op::While(o)
            | Op::Wend(o)
            | Op::Catch(o) => *o = offset,
            Op::For { exit, .. } => *exit = offset,
            Op::Next { body, .. } => *body = offset,
            Op::Break { offset: o, .. } | Op::Continue { offset: o, .. } => *o = offset,
            Op::Function { skip, .. } => *skip = offset,
            Op::Try { catch, .. } => *catch = offset,
            _ => {}
        }
    }

    // ===== Scopes =====

    /// Slot for a variable name. Inside a function plain names are local and
    /// `$name` (`global == true`) reaches the global table.
    pub(crate) fn variable_slot(&mut self, name: &str, global: bool) -> Slot {
        match &mut self.current {
            Some(scope) if !global => Slot::Local(scope.locals.resolve(name)),
            _ => Slot::Global(self.globals.resolve(name)),
        }
    }

    pub(crate) fn define_label(&mut self, name: String, line: SourceLine) -> CompileResult {
        let target = self.code.len();
        let labels = match &mut self.current {
            Some(scope) => &mut scope.labels,
            None => &mut self.labels,
        };
        if labels.contains_key(&name) {
            return Err(self.error_at(line, CompileErrorKind::DuplicateLabel(name)));
        }
        labels.insert(name, target);
        Ok(())
    }

    pub(crate) fn declare_function(
        &mut self,
        name: String,
        params: usize,
        entry: usize,
        line: SourceLine,
    ) -> CompileResult<u32> {
        if self.function_ids.contains_key(&name) {
            return Err(self.error_at(line, CompileErrorKind::DuplicateFunction(name)));
        }
        let index = self.functions.len() as u32;
        self.function_ids.insert(name.clone(), index);
        self.functions.push(FunctionInfo {
            name,
            entry,
            params,
            locals: Vec::new(),
            labels: HashMap::new(),
        });
        Ok(index)
    }

    pub(crate) fn finish_function(&mut self, scope: FunctionScope) {
        if let Some(info) = self.functions.get_mut(scope.index as usize) {
            info.locals = scope.locals.into_names();
            info.labels = scope.labels;
        }
    }

    pub(crate) fn record_call(&mut self, pos: usize) {
        self.calls.push(pos);
    }
}

/// Tokenize and compile a self-contained source
pub fn compile(name: &str, source: &str, registry: &BuiltinRegistry) -> Result<Program, CompileError> {
    let stream = snuvi_lexer::tokenize(name, source)?;
    Compiler::new(registry).compile(stream)
}

/// Tokenize and compile a source whose imports are served by `loader`
pub fn compile_with(
    name: &str,
    source: &str,
    loader: &dyn SourceLoader,
    registry: &BuiltinRegistry,
) -> Result<Program, CompileError> {
    let stream = snuvi_lexer::tokenize_with(name, source, loader)?;
    Compiler::new(registry).compile(stream)
}
