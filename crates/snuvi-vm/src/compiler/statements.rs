//! Statement compilation
//!
//! Control-flow statements emit their body inline and patch the pending
//! jumps once the closing brace has been compiled.

use super::context::{FunctionScope, LoopContext};
use super::{CompileResult, Compiler};
use crate::bytecode::{jump_offset, Constant, Op, Slot};
use crate::error::CompileErrorKind;
use snuvi_lexer::TokenKind;
use snuvi_types::Rational;

impl<'r> Compiler<'r> {
    pub(crate) fn statement(&mut self) -> CompileResult {
        match self.peek_kind() {
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Function => self.function_definition(),
            TokenKind::Break => self.loop_jump(true),
            TokenKind::Continue => self.loop_jump(false),
            TokenKind::Return => self.return_statement(),
            TokenKind::Try => self.try_statement(),
            TokenKind::Catch => Err(self.error(CompileErrorKind::CatchWithoutTry)),
            TokenKind::Label => self.label_definition(),
            TokenKind::LBrace => self.block(),
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Else
            | TokenKind::ElseIf
            | TokenKind::Import
            | TokenKind::RBrace
            | TokenKind::Eof => {
                Err(self.error(CompileErrorKind::UnexpectedToken(self.peek().to_string())))
            }
            _ => self.expression_statement(),
        }
    }

    /// `{ statement* }`
    pub(crate) fn block(&mut self) -> CompileResult {
        self.expect(TokenKind::LBrace)?;
        self.nested(|c| {
            while !c.check(TokenKind::RBrace) {
                if c.check(TokenKind::Eof) {
                    return Err(c.expected("'}'"));
                }
                c.statement()?;
            }
            c.advance();
            Ok(())
        })
    }

    /// An expression whose value is discarded
    fn expression_statement(&mut self) -> CompileResult {
        self.expression()?;
        self.expect(TokenKind::Semicolon)?;

        match self.last_op_mut() {
            Some(Op::Call { keep, .. }) | Some(Op::Assign { keep, .. }) | Some(Op::Step { keep, .. }) => {
                *keep = false;
            }
            _ => {
                self.emit(1, Op::Pop);
            }
        }
        Ok(())
    }

    /// `( expression )`
    fn condition(&mut self) -> CompileResult {
        self.expect(TokenKind::LParen)?;
        self.expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(())
    }

    // ===== if / elseif / else =====

    fn if_statement(&mut self) -> CompileResult {
        self.expect(TokenKind::If)?;
        self.guarded_branch()?;

        loop {
            if self.matches(TokenKind::ElseIf) {
                let guard = self.emit(0, Op::ElseIf(0));
                self.guarded_branch()?;
                self.patch_jump(guard);
            } else if self.matches(TokenKind::Else) {
                let guard = self.emit(0, Op::Else(0));
                if self.check(TokenKind::If) {
                    self.if_statement()?;
                } else {
                    self.block()?;
                }
                self.emit(0, Op::EndIf);
                self.patch_jump(guard);
                return Ok(());
            } else {
                return Ok(());
            }
        }
    }

    /// `(cond) { body }` followed by the branch-taken marker
    fn guarded_branch(&mut self) -> CompileResult {
        self.condition()?;
        let jump = self.emit(1, Op::If(0));
        self.block()?;
        self.emit(0, Op::EndIf);
        self.patch_jump(jump);
        Ok(())
    }

    // ===== Loops =====

    fn while_statement(&mut self) -> CompileResult {
        self.expect(TokenKind::While)?;
        let start = self.code_len();
        self.condition()?;
        let exit = self.emit(1, Op::While(0));

        self.loops.push(LoopContext::new(self.try_depth));
        self.block()?;

        let step = self.code_len();
        self.emit(0, Op::Wend(jump_offset(step, start)));
        self.close_loop(step);
        self.patch_jump(exit);
        Ok(())
    }

    /// `for (var, start, end[, step]) { body }`
    fn for_statement(&mut self) -> CompileResult {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let token = self.advance();
        let var = match token.kind {
            TokenKind::Name | TokenKind::GlobalName => {
                let global = token.kind == TokenKind::GlobalName;
                self.variable_slot(token.text().unwrap_or_default(), global)
            }
            _ => return Err(self.error_at(token.line, CompileErrorKind::InvalidLoopVariable)),
        };

        // var = start
        self.emit_at(token.line, 0, Op::Ref(var));
        self.expect(TokenKind::Comma)?;
        self.expression()?;
        self.emit(
            2,
            Op::Assign {
                op: None,
                keep: false,
            },
        );

        self.expect(TokenKind::Comma)?;
        self.expression()?;
        if self.matches(TokenKind::Comma) {
            self.expression()?;
        } else {
            self.emit(0, Op::Push(Constant::Number(Rational::ONE)));
        }
        self.expect(TokenKind::RParen)?;

        let head = self.code_len();
        let end = self.hidden_slot(format!("#end{}", head));
        let step = self.hidden_slot(format!("#step{}", head));
        self.emit(
            2,
            Op::For {
                exit: 0,
                var,
                end,
                step,
            },
        );

        self.loops.push(LoopContext::new(self.try_depth));
        self.block()?;

        let next = self.code_len();
        self.emit(
            0,
            Op::Next {
                body: jump_offset(next, head + 1),
                var,
                end,
                step,
            },
        );
        self.close_loop(next);
        self.patch_jump(head);
        Ok(())
    }

    /// Slot that user code cannot name
    fn hidden_slot(&mut self, name: String) -> Slot {
        self.variable_slot(&name, false)
    }

    /// Pop the innermost loop, sending breaks past the code emitted so far
    /// and continues to `step`.
    fn close_loop(&mut self, step: usize) {
        if let Some(context) = self.loops.pop() {
            for pos in context.breaks {
                self.patch_jump(pos);
            }
            for pos in context.continues {
                self.patch_jump_to(pos, step);
            }
        }
    }

    fn loop_jump(&mut self, is_break: bool) -> CompileResult {
        let token = self.advance();
        self.expect(TokenKind::Semicolon)?;

        let Some(context) = self.loops.last() else {
            let kind = if is_break {
                CompileErrorKind::BreakOutsideLoop
            } else {
                CompileErrorKind::ContinueOutsideLoop
            };
            return Err(self.error_at(token.line, kind));
        };

        let handlers = self.try_depth - context.try_depth;
        let op = if is_break {
            Op::Break {
                offset: 0,
                handlers,
            }
        } else {
            Op::Continue {
                offset: 0,
                handlers,
            }
        };
        let pos = self.emit_at(token.line, 0, op);

        if let Some(context) = self.loops.last_mut() {
            if is_break {
                context.breaks.push(pos);
            } else {
                context.continues.push(pos);
            }
        }
        Ok(())
    }

    // ===== Functions =====

    /// `function name(a, b) { body }`
    fn function_definition(&mut self) -> CompileResult {
        let token = self.advance();
        if self.current.is_some() {
            return Err(self.error_at(token.line, CompileErrorKind::NestedFunction));
        }

        let name_token = self.expect(TokenKind::Name)?;
        let name = name_token.text().unwrap_or_default().to_string();

        self.expect(TokenKind::LParen)?;
        let mut params: Vec<String> = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param = self.expect(TokenKind::Name)?;
                let param_name = param.text().unwrap_or_default().to_string();
                if params.contains(&param_name) {
                    return Err(
                        self.error_at(param.line, CompileErrorKind::DuplicateParameter(param_name))
                    );
                }
                params.push(param_name);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let marker = self.emit_at(token.line, 0, Op::Function { skip: 0, index: 0 });
        let index = self.declare_function(name, params.len(), marker + 1, name_token.line)?;
        if let Some(Op::Function { index: i, .. }) = self.last_op_mut() {
            *i = index;
        }

        let mut scope = FunctionScope::new(index);
        for param in &params {
            scope.locals.resolve(param);
        }

        self.current = Some(scope);
        let outer_loops = std::mem::take(&mut self.loops);
        let outer_try = std::mem::replace(&mut self.try_depth, 0);

        let body = self.block();

        self.loops = outer_loops;
        self.try_depth = outer_try;
        let scope = self.current.take();
        body?;

        self.emit(0, Op::Return { value: false });
        if let Some(scope) = scope {
            self.finish_function(scope);
        }
        self.patch_jump(marker);
        Ok(())
    }

    fn return_statement(&mut self) -> CompileResult {
        let token = self.advance();
        if self.matches(TokenKind::Semicolon) {
            self.emit_at(token.line, 0, Op::Return { value: false });
            return Ok(());
        }
        self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        self.emit_at(token.line, 1, Op::Return { value: true });
        Ok(())
    }

    // ===== try / catch =====

    /// `try { } catch [(name)] { }`
    fn try_statement(&mut self) -> CompileResult {
        self.advance();
        let handler = self.emit(
            0,
            Op::Try {
                catch: 0,
                error_var: None,
            },
        );

        self.try_depth += 1;
        let body = self.block();
        self.try_depth -= 1;
        body?;

        if !self.matches(TokenKind::Catch) {
            return Err(self.error(CompileErrorKind::TryWithoutCatch));
        }

        if self.matches(TokenKind::LParen) {
            let token = self.advance();
            let slot = match token.kind {
                TokenKind::Name | TokenKind::GlobalName => {
                    let global = token.kind == TokenKind::GlobalName;
                    self.variable_slot(token.text().unwrap_or_default(), global)
                }
                _ => {
                    return Err(self.error_at(
                        token.line,
                        CompileErrorKind::Expected {
                            expected: "a variable name".into(),
                            found: token.to_string(),
                        },
                    ))
                }
            };
            self.expect(TokenKind::RParen)?;
            if let Op::Try { error_var, .. } = &mut self.code[handler].op {
                *error_var = Some(slot);
            }
        }

        let skip = self.emit(0, Op::Catch(0));
        self.patch_jump(handler);
        self.block()?;
        self.patch_jump(skip);
        Ok(())
    }

    // ===== Labels =====

    /// `@name` as a statement marks a goto/gosub target
    fn label_definition(&mut self) -> CompileResult {
        let token = self.advance();
        let name = token.text().unwrap_or_default().to_string();
        self.matches(TokenKind::Semicolon);
        self.define_label(name, token.line)
    }
}
