//! Human-readable listing of compiled programs

use crate::bytecode::{jump_target, CallTarget, Instruction, Op, Program};
use std::fmt::Write;

/// Disassemble a whole program, one instruction per line
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "; {} instruction(s), {} global(s), {} function(s)",
        program.code.len(),
        program.globals.len(),
        program.functions.len()
    );

    for (pc, instruction) in program.code.iter().enumerate() {
        for (label, _) in program.labels.iter().filter(|&(_, &target)| target == pc) {
            let _ = writeln!(out, "@{}:", label);
        }
        if let Some(function) = program.functions.iter().find(|f| f.entry == pc) {
            let _ = writeln!(out, "{}({}):", function.name, function.params);
        }
        let _ = writeln!(
            out,
            "{:5} {:>4}  {}",
            pc,
            instruction.line.line(),
            disassemble_instruction(pc, instruction)
        );
    }
    out
}

/// One instruction with its operands and resolved jump targets
pub fn disassemble_instruction(pc: usize, instruction: &Instruction) -> String {
    let name = instruction.op.name();
    let arity = instruction.arity;
    let to = |offset: i32| jump_target(pc, offset);

    match &instruction.op {
        Op::Push(constant) => format!("{:<10} {}", name, constant),
        Op::Load(slot) | Op::Ref(slot) => format!("{:<10} {}", name, slot),
        Op::Index | Op::IndexRef => format!("{:<10} /{}", name, arity),
        Op::Unary(op) => format!("{:<10} {:?}", name, op),
        Op::Binary(op) => format!("{:<10} {}", name, op.symbol()),
        Op::Assign { op, keep } => format!(
            "{:<10} {}{}",
            name,
            op.map(|o| o.symbol()).unwrap_or("="),
            if *keep { " keep" } else { "" }
        ),
        Op::Step {
            delta,
            postfix,
            keep,
        } => format!(
            "{:<10} {:+}{}{}",
            name,
            delta,
            if *postfix { " postfix" } else { "" },
            if *keep { " keep" } else { "" }
        ),
        Op::Call { name: callee, target, keep } => {
            let target = match target {
                CallTarget::User(i) => format!("user#{}", i),
                CallTarget::Native(id) => format!("native#{}", id),
                CallTarget::Intrinsic(i) => format!("{:?}", i).to_lowercase(),
                CallTarget::Unresolved => "unresolved".to_string(),
            };
            format!(
                "{:<10} {}/{} -> {}{}",
                name,
                callee,
                arity,
                target,
                if *keep { " keep" } else { "" }
            )
        }
        Op::And(o)
        | Op::Or(o)
        | Op::Jump(o)
        | Op::If(o)
        | Op::ElseIf(o)
        | Op::Else(o)
        | Op::While(o)
        | Op::Wend(o)
        | Op::Catch(o) => format!("{:<10} -> {}", name, to(*o)),
        Op::For {
            exit,
            var,
            end,
            step,
        } => format!("{:<10} {} to {} by {} else -> {}", name, var, end, step, to(*exit)),
        Op::Next {
            body,
            var,
            end,
            step,
        } => format!("{:<10} {} to {} by {} loop -> {}", name, var, end, step, to(*body)),
        Op::Break { offset, handlers } | Op::Continue { offset, handlers } => {
            format!("{:<10} -> {} drop {}", name, to(*offset), handlers)
        }
        Op::Function { skip, index } => format!("{:<10} #{} skip -> {}", name, index, to(*skip)),
        Op::Try { catch, error_var } => match error_var {
            Some(slot) => format!("{:<10} -> {} bind {}", name, to(*catch), slot),
            None => format!("{:<10} -> {}", name, to(*catch)),
        },
        Op::Return { value } => format!("{:<10}{}", name, if *value { " value" } else { "" }),
        Op::Truthy | Op::Pop | Op::EndIf => name.to_string(),
    }
}
