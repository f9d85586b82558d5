//! Straight-line boolean programs and their emulator.
//!
//! A program is an ordered sequence of three-address instructions over a
//! combined operand namespace: operands 0..5 always name the (up to six)
//! program inputs, operand `6 + i` names the result of the `i`-th
//! instruction. The gap below 6 is reserved for inputs even when fewer
//! variables are in use, so instruction operands never shift when programs
//! are rendered.

use crate::bitset::{Bitvec256, Registers};
use crate::op::Op;
use crate::table::TruthTable;

/// Maximum number of program inputs.
pub const VARIABLE_LIMIT: usize = 6;

/// Maximum number of instructions in a [`Program`].
pub const MAX_PROGRAM_LENGTH: usize = 250;

/// A single three-address instruction.
///
/// `op` is the four-bit truth table of the operation (see [`Op`]); `a` and
/// `b` index the combined operand namespace. Unary operations keep `b` at
/// zero as a placeholder.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Instruction {
    pub op: u8,
    pub a: u8,
    pub b: u8,
}

/// The one-instruction program computing constant false.
pub const FALSE_INSTRUCTION: Instruction = Instruction {
    op: Op::False as u8,
    a: 0,
    b: 0,
};

/// The one-instruction program computing constant true.
pub const TRUE_INSTRUCTION: Instruction = Instruction {
    op: Op::True as u8,
    a: 0,
    b: 0,
};

impl Instruction {
    pub fn new(op: Op, a: u8, b: u8) -> Self {
        Self {
            op: op.tag(),
            a,
            b,
        }
    }

    /// The decoded operation of this instruction.
    #[inline]
    pub fn operation(self) -> Op {
        Op::from_tag(self.op)
    }
}

/// An ordered instruction sequence with its input arity and symbol names.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    instructions: [Instruction; MAX_PROGRAM_LENGTH],
    length: usize,
    /// Number of inputs, in `1..=6`.
    pub variables: usize,
    /// Optional user-facing names for the inputs; empty entries fall back to
    /// `A`..`F` when rendered.
    pub symbols: [String; VARIABLE_LIMIT],
}

impl Program {
    pub fn new(variables: usize) -> Self {
        assert!(
            (1..=VARIABLE_LIMIT).contains(&variables),
            "programs take 1 to {VARIABLE_LIMIT} inputs, got {variables}"
        );
        Self {
            instructions: [FALSE_INSTRUCTION; MAX_PROGRAM_LENGTH],
            length: 0,
            variables,
            symbols: Default::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The live instruction slice.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions[..self.length]
    }

    pub fn push(&mut self, instruction: Instruction) {
        assert!(self.length < MAX_PROGRAM_LENGTH, "program buffer overflow");
        self.instructions[self.length] = instruction;
        self.length += 1;
    }

    pub fn clear(&mut self) {
        self.length = 0;
    }

    /// True if this program realizes `table` on every required row.
    pub fn is_equivalent(&self, table: TruthTable) -> bool {
        test_program(self.instructions(), self.variables, table)
    }

    /// The exact truth table this program computes (no don't-cares).
    pub fn compute_truth_table(&self) -> TruthTable {
        let bits = evaluate_program(self.instructions(), self.variables);
        TruthTable {
            f: bits,
            t: bits,
        }
    }
}

/// Runs `instructions` on a single seeded register file and returns the value
/// of the last instruction.
#[inline]
fn emulate_once<R, I>(instructions: &[I], mut state: R) -> bool
where
    R: Registers,
    I: Copy + Into<Instruction>,
{
    let mut result = false;
    for (i, ins) in instructions.iter().enumerate() {
        let ins: Instruction = (*ins).into();
        let a = state.get(ins.a as usize);
        let b = state.get(ins.b as usize);
        result = ins.op >> (((a as u8) << 1) | b as u8) & 1 != 0;
        state.set_if(VARIABLE_LIMIT + i, result);
    }
    result
}

fn test_rows<R, I>(instructions: &[I], variables: usize, table: TruthTable) -> bool
where
    R: Registers,
    I: Copy + Into<Instruction>,
{
    for row in 0..1u64 << variables {
        let result = emulate_once::<R, I>(instructions, R::from_inputs(row));
        // A true result needs the row to be allowed true; a false result
        // needs it to not be required true. Don't-cares pass either way.
        let allowed = if result { table.t } else { !table.f };
        if allowed >> row & 1 == 0 {
            return false;
        }
    }
    true
}

fn evaluate_rows<R, I>(instructions: &[I], variables: usize) -> u64
where
    R: Registers,
    I: Copy + Into<Instruction>,
{
    let mut result = 0;
    for row in 0..1u64 << variables {
        let value = emulate_once::<R, I>(instructions, R::from_inputs(row));
        result |= u64::from(value) << row;
    }
    result
}

/// Whether every required row of `table` is realized by `instructions`.
///
/// Register width is picked from the program length: up to 58 instructions
/// fit a single word together with the six input slots.
pub fn test_program<I>(instructions: &[I], variables: usize, table: TruthTable) -> bool
where
    I: Copy + Into<Instruction>,
{
    assert!(variables <= VARIABLE_LIMIT);
    assert!(instructions.len() <= MAX_PROGRAM_LENGTH);
    if instructions.len() + VARIABLE_LIMIT <= 64 {
        test_rows::<u64, I>(instructions, variables, table)
    } else {
        test_rows::<Bitvec256, I>(instructions, variables, table)
    }
}

/// The truth table computed by `instructions`, as a bitmask over `2^variables`
/// rows.
pub fn evaluate_program<I>(instructions: &[I], variables: usize) -> u64
where
    I: Copy + Into<Instruction>,
{
    assert!(variables <= VARIABLE_LIMIT);
    assert!(instructions.len() <= MAX_PROGRAM_LENGTH);
    if instructions.len() + VARIABLE_LIMIT <= 64 {
        evaluate_rows::<u64, I>(instructions, variables)
    } else {
        evaluate_rows::<Bitvec256, I>(instructions, variables)
    }
}
