//! Rendering of programs as listings and as expressions.
//!
//! Input operands print as `@name` (or `@A`..`@F` when unnamed); instruction
//! results print as `%0`..`%9`, `%a`..`%z`, `%A`..`%Z` and `%t<n>` beyond
//! those. Operations print through their display hints: a base word, an
//! optional operand swap, an optional `~` on the first operand, and an
//! optional complement around the whole form.

use std::fmt;

use crate::program::{Instruction, Program, VARIABLE_LIMIT};

/// Fallback single-letter names for unnamed inputs.
const FALLBACK_SYMBOLS: [&str; VARIABLE_LIMIT] = ["A", "B", "C", "D", "E", "F"];

/// The display name of an operand in the combined namespace.
///
/// `input_prefix` selects the `@` marker on inputs; expression rendering
/// drops it.
pub fn operand_symbol(program: &Program, operand: usize, input_prefix: bool) -> String {
    if operand < VARIABLE_LIMIT {
        let name = if program.symbols[operand].is_empty() {
            FALLBACK_SYMBOLS[operand]
        } else {
            &program.symbols[operand]
        };
        let prefix = if input_prefix { "@" } else { "" };
        return format!("{prefix}{name}");
    }

    let index = operand - VARIABLE_LIMIT;
    if index < 10 {
        format!("%{}", index)
    } else if index < 36 {
        format!("%{}", (b'a' + (index - 10) as u8) as char)
    } else if index < 62 {
        format!("%{}", (b'A' + (index - 36) as u8) as char)
    } else {
        format!("%t{}", index - 62)
    }
}

/// Formats a single instruction the way program listings show it.
pub fn format_instruction(program: &Program, ins: Instruction) -> String {
    let op = ins.operation();
    if op.is_trivial() {
        return op.display_label().to_string();
    }

    let (a, b) = display_operands(ins);
    if op.is_unary() {
        return format!(
            "{}{}",
            op.display_label(),
            operand_symbol(program, a, true)
        );
    }

    let a = operand_symbol(program, a, true);
    let b = operand_symbol(program, b, true);
    let label = op.display_label();
    if op.display_complement() {
        format!("~({a} {label} {b})")
    } else if op.display_operand_negated() {
        format!("~{a} {label} {b}")
    } else {
        format!("{a} {label} {b}")
    }
}

fn display_operands(ins: Instruction) -> (usize, usize) {
    if ins.operation().display_reversed() {
        (ins.b as usize, ins.a as usize)
    } else {
        (ins.a as usize, ins.b as usize)
    }
}

impl fmt::Display for Program {
    /// The assembly-style listing, one `<dest> = <op>` line per instruction.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &ins) in self.instructions().iter().enumerate() {
            writeln!(
                f,
                "{} = {}",
                operand_symbol(self, VARIABLE_LIMIT + i, true),
                format_instruction(self, ins)
            )?;
        }
        Ok(())
    }
}

/// Renders the program's final value as a parenthesized expression.
pub fn format_expression(program: &Program) -> String {
    let mut out = String::new();
    write_expression(&mut out, program, program.len() - 1);
    out
}

fn write_expression(out: &mut String, program: &Program, index: usize) {
    let ins = program.instructions()[index];
    let op = ins.operation();
    if op.is_trivial() {
        out.push_str(op.display_label());
        return;
    }

    let (a, b) = display_operands(ins);
    if op.display_complement() {
        out.push('~');
    }
    if op.is_unary() {
        // Unary negation was covered by the complement marker; identities
        // are transparent.
        write_expression_operand(out, program, a);
        return;
    }

    out.push('(');
    if op.display_operand_negated() {
        out.push('~');
        // A negated subexpression needs its own parentheses to keep the
        // negation from binding to the operator word.
        if a >= VARIABLE_LIMIT {
            out.push('(');
            write_expression_operand(out, program, a);
            out.push(')');
        } else {
            write_expression_operand(out, program, a);
        }
    } else {
        write_expression_operand(out, program, a);
    }
    out.push(' ');
    out.push_str(op.display_label());
    out.push(' ');
    write_expression_operand(out, program, b);
    out.push(')');
}

fn write_expression_operand(out: &mut String, program: &Program, operand: usize) {
    if operand < VARIABLE_LIMIT {
        out.push_str(&operand_symbol(program, operand, false));
    } else {
        write_expression(out, program, operand - VARIABLE_LIMIT);
    }
}
