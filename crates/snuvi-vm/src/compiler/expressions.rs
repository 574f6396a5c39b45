//! Expression compilation
//!
//! Precedence from loosest to tightest: assignment, `||`, `&&`, `|`, `^`, `&`,
//! equality, relational, shift, additive, multiplicative, prefix unary,
//! postfix. Binary operators are left associative, assignment is right
//! associative.

use super::constants::get_constant;
use super::{CompileResult, Compiler};
use crate::bytecode::{BinaryOp, CallTarget, Constant, Op, UnaryOp};
use crate::error::CompileErrorKind;
use snuvi_lexer::{SourceLine, TokenKind};
use snuvi_types::Rational;

type Level<'r> = fn(&mut Compiler<'r>) -> CompileResult;

fn assignment_op(kind: TokenKind) -> Option<Option<BinaryOp>> {
    let op = match kind {
        TokenKind::Assign => None,
        TokenKind::PlusAssign => Some(BinaryOp::Add),
        TokenKind::MinusAssign => Some(BinaryOp::Sub),
        TokenKind::StarAssign => Some(BinaryOp::Mul),
        TokenKind::SlashAssign => Some(BinaryOp::Div),
        TokenKind::PercentAssign => Some(BinaryOp::Rem),
        TokenKind::ShlAssign => Some(BinaryOp::Shl),
        TokenKind::ShrAssign => Some(BinaryOp::Shr),
        TokenKind::AmpAssign => Some(BinaryOp::BitAnd),
        TokenKind::CaretAssign => Some(BinaryOp::BitXor),
        TokenKind::PipeAssign => Some(BinaryOp::BitOr),
        _ => return None,
    };
    Some(op)
}

impl<'r> Compiler<'r> {
    /// Compile one full expression; leaves exactly one value on the stack.
    pub(crate) fn expression(&mut self) -> CompileResult {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> CompileResult {
        let start = self.code_len();
        self.logical_or()?;

        if let Some(op) = assignment_op(self.peek_kind()) {
            let line = self.advance().line;
            self.make_assignable(start, line)?;
            self.assignment()?;
            self.emit_at(line, 2, Op::Assign { op, keep: true });
        }
        Ok(())
    }

    /// Turn the value load that ends at the top of the code into a handle.
    ///
    /// `start` is where the target expression began; the target must have
    /// emitted at least one instruction and end in a variable load or index.
    pub(crate) fn make_assignable(&mut self, start: usize, line: SourceLine) -> CompileResult {
        let patched = self.code_len() > start
            && match self.last_op_mut() {
                Some(op) => match *op {
                    Op::Load(slot) => {
                        *op = Op::Ref(slot);
                        true
                    }
                    Op::Index => {
                        *op = Op::IndexRef;
                        true
                    }
                    _ => false,
                },
                None => false,
            };

        if patched {
            Ok(())
        } else {
            Err(self.error_at(line, CompileErrorKind::InvalidAssignmentTarget))
        }
    }

    fn logical_or(&mut self) -> CompileResult {
        self.logical_and()?;
        while self.matches(TokenKind::OrOr) {
            let jump = self.emit(1, Op::Or(0));
            self.logical_and()?;
            self.emit(1, Op::Truthy);
            self.patch_jump(jump);
        }
        Ok(())
    }

    fn logical_and(&mut self) -> CompileResult {
        self.bit_or()?;
        while self.matches(TokenKind::AndAnd) {
            let jump = self.emit(1, Op::And(0));
            self.bit_or()?;
            self.emit(1, Op::Truthy);
            self.patch_jump(jump);
        }
        Ok(())
    }

    /// Left-associative binary level over `next`
    fn binary_level(&mut self, next: Level<'r>, ops: &[(TokenKind, BinaryOp)]) -> CompileResult {
        next(self)?;
        loop {
            let kind = self.peek_kind();
            let Some(&(_, op)) = ops.iter().find(|(k, _)| *k == kind) else {
                return Ok(());
            };
            let line = self.advance().line;
            next(self)?;
            self.emit_at(line, 2, Op::Binary(op));
        }
    }

    fn bit_or(&mut self) -> CompileResult {
        self.binary_level(Self::bit_xor, &[(TokenKind::Pipe, BinaryOp::BitOr)])
    }

    fn bit_xor(&mut self) -> CompileResult {
        self.binary_level(Self::bit_and, &[(TokenKind::Caret, BinaryOp::BitXor)])
    }

    fn bit_and(&mut self) -> CompileResult {
        self.binary_level(Self::equality, &[(TokenKind::Amp, BinaryOp::BitAnd)])
    }

    fn equality(&mut self) -> CompileResult {
        self.binary_level(
            Self::relational,
            &[
                (TokenKind::EqEq, BinaryOp::Eq),
                (TokenKind::NotEq, BinaryOp::Ne),
            ],
        )
    }

    fn relational(&mut self) -> CompileResult {
        self.binary_level(
            Self::shift,
            &[
                (TokenKind::Lt, BinaryOp::Lt),
                (TokenKind::Le, BinaryOp::Le),
                (TokenKind::Gt, BinaryOp::Gt),
                (TokenKind::Ge, BinaryOp::Ge),
            ],
        )
    }

    fn shift(&mut self) -> CompileResult {
        self.binary_level(
            Self::additive,
            &[
                (TokenKind::Shl, BinaryOp::Shl),
                (TokenKind::Shr, BinaryOp::Shr),
            ],
        )
    }

    fn additive(&mut self) -> CompileResult {
        self.binary_level(
            Self::multiplicative,
            &[
                (TokenKind::Plus, BinaryOp::Add),
                (TokenKind::Minus, BinaryOp::Sub),
            ],
        )
    }

    fn multiplicative(&mut self) -> CompileResult {
        self.binary_level(
            Self::unary,
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Rem),
            ],
        )
    }

    fn unary(&mut self) -> CompileResult {
        let op = match self.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::PlusPlus | TokenKind::MinusMinus => return self.prefix_step(),
            _ => return self.postfix(),
        };
        let line = self.advance().line;
        let start = self.code_len();
        self.nested(Self::unary)?;

        // Fold `-<number literal>` into a single constant
        if op == UnaryOp::Neg && self.code_len() == start + 1 {
            if let Some(Op::Push(Constant::Number(n))) = self.last_op_mut() {
                if let Ok(negated) = n.checked_neg() {
                    *n = negated;
                    return Ok(());
                }
            }
        }

        self.emit_at(line, 1, Op::Unary(op));
        Ok(())
    }

    fn prefix_step(&mut self) -> CompileResult {
        let token = self.advance();
        let delta = if token.kind == TokenKind::PlusPlus { 1 } else { -1 };
        let start = self.code_len();
        self.nested(Self::unary)?;
        self.make_assignable(start, token.line)?;
        self.emit_at(
            token.line,
            1,
            Op::Step {
                delta,
                postfix: false,
                keep: true,
            },
        );
        Ok(())
    }

    fn postfix(&mut self) -> CompileResult {
        let start = self.code_len();
        self.primary()?;

        while self.check(TokenKind::LBracket) {
            let line = self.advance().line;
            let mut count: usize = 0;
            loop {
                self.expression()?;
                count += 1;
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBracket)?;
            let arity = u8::try_from(count + 1)
                .map_err(|_| self.error_at(line, CompileErrorKind::TooManyArguments))?;
            self.emit_at(line, arity, Op::Index);
        }

        if matches!(self.peek_kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let token = self.advance();
            let delta = if token.kind == TokenKind::PlusPlus { 1 } else { -1 };
            self.make_assignable(start, token.line)?;
            self.emit_at(
                token.line,
                1,
                Op::Step {
                    delta,
                    postfix: true,
                    keep: true,
                },
            );
        }
        Ok(())
    }

    fn primary(&mut self) -> CompileResult {
        let token = self.advance();
        let line = token.line;

        match token.kind {
            TokenKind::Number => {
                let value = token.number().unwrap_or_default();
                let number = Rational::from_f64(value)
                    .map_err(|_| self.error_at(line, CompileErrorKind::NumberOutOfRange(value)))?;
                self.emit_at(line, 0, Op::Push(Constant::Number(number)));
            }
            TokenKind::String => {
                let text = token.text().unwrap_or_default().to_string();
                self.emit_at(line, 0, Op::Push(Constant::Str(text)));
            }
            TokenKind::True => {
                self.emit_at(line, 0, Op::Push(Constant::Bool(true)));
            }
            TokenKind::False => {
                self.emit_at(line, 0, Op::Push(Constant::Bool(false)));
            }
            TokenKind::Null => {
                self.emit_at(line, 0, Op::Push(Constant::Null));
            }
            TokenKind::Label => {
                let name = token.text().unwrap_or_default().to_string();
                self.emit_at(line, 0, Op::Push(Constant::Str(name)));
            }
            TokenKind::GlobalName => {
                let slot = self.variable_slot(token.text().unwrap_or_default(), true);
                self.emit_at(line, 0, Op::Load(slot));
            }
            TokenKind::Name => {
                let name = token.text().unwrap_or_default().to_string();
                if self.check(TokenKind::LParen) {
                    return self.call(name, line);
                }
                match get_constant(&name) {
                    Some(constant) => {
                        self.emit_at(line, 0, Op::Push(constant));
                    }
                    None => {
                        let slot = self.variable_slot(&name, false);
                        self.emit_at(line, 0, Op::Load(slot));
                    }
                }
            }
            TokenKind::LParen => {
                self.expression()?;
                self.expect(TokenKind::RParen)?;
            }
            _ => {
                // Report at the offending token
                self.pos -= usize::from(token.kind != TokenKind::Eof);
                return Err(self.expected("an expression"));
            }
        }
        Ok(())
    }

    fn call(&mut self, name: String, line: SourceLine) -> CompileResult {
        self.expect(TokenKind::LParen)?;

        let mut argc: usize = 0;
        if !self.check(TokenKind::RParen) {
            loop {
                self.expression()?;
                argc += 1;
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let arity =
            u8::try_from(argc).map_err(|_| self.error_at(line, CompileErrorKind::TooManyArguments))?;
        let pos = self.emit_at(
            line,
            arity,
            Op::Call {
                name,
                target: CallTarget::Unresolved,
                keep: true,
            },
        );
        self.record_call(pos);
        Ok(())
    }
}
