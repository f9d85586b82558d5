//! Iterative-deepening search for the shortest equivalent programs.
//!
//! The finder walks every canonical instruction sequence of length 1, then
//! 2, and so on, testing each complete candidate against the target table
//! with the bit-parallel emulator. The first length with a match is the
//! minimum by construction; greedy mode reports every match of that length
//! instead of stopping at the first.
//!
//! Matches are reported through a sink callback. The instruction slice
//! handed to the sink lives in a buffer owned by the finder and is only
//! valid for the duration of the call; sinks that retain programs must copy.

use log::{debug, trace};

use crate::canonical::{CanonicalInstruction, CanonicalProgram, MAX_CANONICAL_LENGTH};
use crate::op::{InstructionSet, Op};
use crate::program::{
    test_program, Instruction, FALSE_INSTRUCTION, TRUE_INSTRUCTION, VARIABLE_LIMIT,
};
use crate::table::TruthTable;

/// Emits every shortest program over `set` that realizes `table` on all of
/// its required rows.
///
/// With `greedy` unset the search stops after the first match; otherwise it
/// finishes the minimal length and reports each match once, in canonical
/// enumeration order. For a fixed `(table, variables, set, greedy)` the
/// emitted sequence is deterministic.
///
/// # Panics
///
/// Panics unless `variables` is in `1..=6` and `table` has no bits beyond
/// `2^variables`.
pub fn find_equivalent_programs<F>(
    sink: F,
    table: TruthTable,
    set: InstructionSet,
    variables: usize,
    greedy: bool,
) where
    F: FnMut(&[Instruction]),
{
    assert!(
        (1..=VARIABLE_LIMIT).contains(&variables),
        "searches take 1 to {VARIABLE_LIMIT} variables, got {variables}"
    );
    let mut sink = sink;
    let mut finder = Finder {
        sink: &mut sink,
        program: CanonicalProgram::new(0, table.relevancy(variables)),
        table,
        set,
        variables,
        greedy,
        found: false,
        buffer: [FALSE_INSTRUCTION; MAX_CANONICAL_LENGTH],
    };
    finder.run();
}

enum Decision {
    Abort,
    KeepSearching,
}

struct Finder<'a, F: FnMut(&[Instruction])> {
    sink: &'a mut F,
    program: CanonicalProgram,
    table: TruthTable,
    set: InstructionSet,
    variables: usize,
    greedy: bool,
    found: bool,
    buffer: [Instruction; MAX_CANONICAL_LENGTH],
}

impl<F: FnMut(&[Instruction])> Finder<'_, F> {
    fn run(&mut self) {
        if self.emit_trivial() || self.emit_identity() {
            return;
        }
        for target_length in 1.. {
            debug!("searching programs of length {target_length}");
            self.program.reset(target_length);
            self.search();
            if self.found {
                return;
            }
        }
    }

    /// Constant tables have one-instruction solutions; checking them first
    /// keeps the enumerator free of trivial operations.
    fn emit_trivial(&mut self) -> bool {
        if self.table.f == 0 {
            trace!("no required-true rows, the constant false suffices");
            self.report(&[FALSE_INSTRUCTION]);
            return true;
        }
        let full = if self.variables == VARIABLE_LIMIT {
            u64::MAX
        } else {
            (1u64 << (1u64 << self.variables)) - 1
        };
        if self.table.t == full {
            trace!("every row may be true, the constant true suffices");
            self.report(&[TRUE_INSTRUCTION]);
            return true;
        }
        false
    }

    /// Probes the single-instruction identity programs `A v` for each input.
    fn emit_identity(&mut self) -> bool {
        for input in 0..self.variables {
            self.program.clear();
            self.program.push(CanonicalInstruction {
                op: Op::A.tag(),
                a: input as u8,
                b: 0,
                distance: 1,
            });
            if test_program(self.program.instructions(), self.variables, self.table) {
                trace!("input {input} realizes the table by itself");
                self.emit_match();
            }
            self.program.clear();
            if self.found {
                return true;
            }
        }
        false
    }

    fn search(&mut self) -> Decision {
        if self.program.len() == self.program.target_length() {
            if test_program(self.program.instructions(), self.variables, self.table) {
                self.emit_match();
                if !self.greedy {
                    return Decision::Abort;
                }
            }
            return Decision::KeepSearching;
        }

        let operand_limit = self.program.len() + self.variables;
        for op in self.set.ops() {
            let unary = op.is_unary();
            let commutative = op.is_commutative();
            for a in 0..operand_limit {
                let a_fixed = self.fix_operand(a);
                if unary {
                    if self.program.try_push_unary(op, a_fixed) {
                        if let Decision::Abort = self.search() {
                            return Decision::Abort;
                        }
                        self.program.pop();
                    }
                    continue;
                }
                // The commutative cutoff applies in the compact numbering,
                // before the display remap widens the operand gap.
                let b_start = if commutative { a + 1 } else { 0 };
                for b in b_start..operand_limit {
                    let b_fixed = self.fix_operand(b);
                    if self.program.try_push_binary(op, a_fixed, b_fixed) {
                        if let Decision::Abort = self.search() {
                            return Decision::Abort;
                        }
                        self.program.pop();
                    }
                }
            }
        }
        Decision::KeepSearching
    }

    /// Maps a compact operand in `[0, size + variables)` to the display
    /// numbering, where inputs keep 0..5 and results start at 6.
    #[inline]
    fn fix_operand(&self, operand: usize) -> u8 {
        (operand + usize::from(operand >= self.variables) * (VARIABLE_LIMIT - self.variables)) as u8
    }

    fn emit_match(&mut self) {
        let length = self.program.len();
        for (slot, &ins) in self.buffer[..length]
            .iter_mut()
            .zip(self.program.instructions())
        {
            *slot = Instruction::from(ins);
        }
        debug!("found a matching program of length {length}");
        self.found = true;
        (self.sink)(&self.buffer[..length]);
    }

    fn report(&mut self, instructions: &[Instruction]) {
        self.found = true;
        (self.sink)(instructions);
    }
}
