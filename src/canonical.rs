//! Canonically ordered partial programs for the exhaustive search.
//!
//! The search space of instruction sequences is riddled with equivalent
//! permutations: independent chains commute, commutative operands swap,
//! double negations cancel. [`CanonicalProgram::try_push`] admits a candidate
//! instruction only when the resulting sequence is the unique representative
//! of its equivalence class, so each class is enumerated exactly once.
//!
//! Canonical order is defined over `(distance, key)`, where *distance* is the
//! longest path from an instruction to the inputs (inputs have distance 0)
//! and *key* is the instruction packed into 32 bits. A sequence is canonical
//! when this pair is non-decreasing along it and none of the structural
//! filters below rejects an instruction:
//!
//! - no negation of a negation;
//! - no binary operation on `x` and `!x` (always a constant or an operand);
//! - commutative trees of equidistant operands keep their smallest operand
//!   on the outside;
//! - no AND/OR whose first operand already occurs inside its second operand's
//!   subexpression (absorption: `x & (x & y) == x & y`);
//! - no instruction that duplicates an earlier one;
//! - no *unrevivable* prefix, i.e. one whose remaining instruction budget
//!   provably cannot reference every instruction and every relevant input.

use crate::op::Op;
use crate::program::{Instruction, VARIABLE_LIMIT};

/// Maximum length of a searched program: 58 results and 6 inputs fill the
/// single-word register file.
pub const MAX_CANONICAL_LENGTH: usize = 58;

/// An [`Instruction`] annotated with its DAG distance from the inputs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CanonicalInstruction {
    pub op: u8,
    pub a: u8,
    pub b: u8,
    /// `1 + max(distance(a), distance(b))`; operands below 6 (inputs) have
    /// distance 0.
    pub distance: u8,
}

impl CanonicalInstruction {
    /// The instruction packed as a single integer, ordering instructions of
    /// equal distance.
    #[inline]
    pub const fn key(self) -> u32 {
        self.op as u32 | (self.a as u32) << 8 | (self.b as u32) << 16 | (self.distance as u32) << 24
    }
}

impl From<CanonicalInstruction> for Instruction {
    fn from(ins: CanonicalInstruction) -> Self {
        Instruction {
            op: ins.op,
            a: ins.a,
            b: ins.b,
        }
    }
}

/// A partial program under construction by the finder.
///
/// Besides the instructions themselves this tracks the search's target
/// length, the relevancy mask of the table being matched, and a bitset of
/// every operand referenced so far. The buffer is reused across the whole
/// search; nothing is allocated per candidate.
#[derive(Debug, Clone)]
pub struct CanonicalProgram {
    instructions: [CanonicalInstruction; MAX_CANONICAL_LENGTH],
    length: usize,
    target_length: usize,
    /// Variables the target function depends on, as a bitmask.
    relevancy: u64,
    /// Bit `k` set iff some instruction references operand `k`.
    used: u64,
}

const FILLER: CanonicalInstruction = CanonicalInstruction {
    op: 0,
    a: 0,
    b: 0,
    distance: 0,
};

impl CanonicalProgram {
    pub fn new(target_length: usize, relevancy: u64) -> Self {
        assert!(target_length <= MAX_CANONICAL_LENGTH);
        Self {
            instructions: [FILLER; MAX_CANONICAL_LENGTH],
            length: 0,
            target_length,
            relevancy,
            used: 0,
        }
    }

    /// Empties the program and retargets it to a new length.
    pub fn reset(&mut self, target_length: usize) {
        assert!(target_length <= MAX_CANONICAL_LENGTH);
        self.length = 0;
        self.target_length = target_length;
        self.used = 0;
    }

    pub fn clear(&mut self) {
        self.length = 0;
        self.used = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// The live instruction slice.
    pub fn instructions(&self) -> &[CanonicalInstruction] {
        &self.instructions[..self.length]
    }

    #[inline]
    fn top(&self) -> CanonicalInstruction {
        self.instructions[self.length - 1]
    }

    /// DAG distance of an operand: 0 for inputs, the recorded distance for
    /// instruction results.
    #[inline]
    fn distance_of(&self, operand: u8) -> u8 {
        if (operand as usize) < VARIABLE_LIMIT {
            0
        } else {
            self.instructions[operand as usize - VARIABLE_LIMIT].distance
        }
    }

    /// Attempts to append a unary instruction, in display operand numbering.
    /// Returns whether the instruction was admitted.
    pub fn try_push_unary(&mut self, op: Op, a: u8) -> bool {
        let ins = CanonicalInstruction {
            op: op.tag(),
            a,
            b: 0,
            distance: self.distance_of(a) + 1,
        };
        if !self.admits(ins, true) {
            return false;
        }
        self.push(ins);
        true
    }

    /// Attempts to append a binary instruction, in display operand numbering.
    /// Returns whether the instruction was admitted.
    pub fn try_push_binary(&mut self, op: Op, a: u8, b: u8) -> bool {
        let ins = CanonicalInstruction {
            op: op.tag(),
            a,
            b,
            distance: self.distance_of(a).max(self.distance_of(b)) + 1,
        };
        if !self.admits(ins, false) {
            return false;
        }
        self.push(ins);
        true
    }

    fn admits(&self, ins: CanonicalInstruction, unary: bool) -> bool {
        // The first instruction of a program is always canonical.
        if self.is_empty() {
            return true;
        }

        // Ascending (distance, key): of all interleavings of independent
        // chains, only the sorted one survives.
        let top = self.top();
        if ins.distance < top.distance {
            return false;
        }
        if ins.distance == top.distance && ins.key() < top.key() {
            return false;
        }

        // !!x == x
        if ins.op == Op::NotA.tag()
            && ins.a as usize >= VARIABLE_LIMIT
            && self.instructions[ins.a as usize - VARIABLE_LIMIT].op == ins.op
        {
            return false;
        }

        if !unary {
            // Any binary operation on x and !x collapses to a constant or an
            // operand.
            if self.operands_complementary(ins.a, ins.b) {
                return false;
            }

            let op = Op::from_tag(ins.op);
            // c . (b . a) with all three operands equidistant reshapes to
            // a . (b . c); only the latter is canonical. Unequal distances
            // may make the reshaped inner instruction unreachable, so the
            // rule does not apply there.
            if op.is_commutative() && !self.commutative_tree_is_canonical(ins.op, ins.a, ins.b) {
                return false;
            }

            // x & (x & y) == x & y, likewise for OR: the shorter program
            // already exists.
            if matches!(op, Op::And | Op::Or) && self.references(ins.b, ins.a) {
                return false;
            }
        }

        // A value computed twice is a value wasted.
        if self.instructions().contains(&ins) {
            return false;
        }

        // Unrevivable: every instruction except the final one must be
        // referenced later, and every relevant input must be referenced at
        // least once. If the remaining budget cannot close the gap, no
        // extension of this prefix can succeed.
        let used = self.used | self.operand_bits(ins);
        let used_count = used.count_ones() as usize;
        let relevant = self.relevancy.count_ones() as usize;
        let size = self.length;
        let budget = self.target_length.saturating_sub(size);
        if relevant + size + 1 > budget + used_count {
            return false;
        }

        true
    }

    /// True if one of `a`, `b` is the negation of the other.
    fn operands_complementary(&self, a: u8, b: u8) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if (hi as usize) < VARIABLE_LIMIT {
            return false;
        }
        let ins = self.instructions[hi as usize - VARIABLE_LIMIT];
        ins.op == Op::NotA.tag() && ins.a == lo
    }

    fn commutative_tree_is_canonical(&self, op: u8, a: u8, b: u8) -> bool {
        if (b as usize) < VARIABLE_LIMIT {
            return true;
        }
        let inner = self.instructions[b as usize - VARIABLE_LIMIT];
        if inner.op != op {
            return true;
        }
        let distance = self.distance_of(a);
        if distance != self.distance_of(inner.a) || distance != self.distance_of(inner.b) {
            return true;
        }
        a < inner.a
    }

    /// True if `target` occurs in the subexpression rooted at operand `root`.
    fn references(&self, root: u8, target: u8) -> bool {
        if root == target {
            return true;
        }
        if (root as usize) < VARIABLE_LIMIT {
            return false;
        }
        let ins = self.instructions[root as usize - VARIABLE_LIMIT];
        if self.references(ins.a, target) {
            return true;
        }
        !Op::from_tag(ins.op).is_unary() && self.references(ins.b, target)
    }

    /// The operand bits an instruction contributes to `used`. Unary
    /// instructions only reference `a`; their `b` is a placeholder and must
    /// not mark input 0.
    #[inline]
    fn operand_bits(&self, ins: CanonicalInstruction) -> u64 {
        if Op::from_tag(ins.op).is_unary() {
            1 << ins.a
        } else {
            1 << ins.a | 1 << ins.b
        }
    }

    /// Appends without canonicality checks. Used by the finder's shortcut
    /// probes; the enumeration itself goes through the `try_push` pair.
    pub fn push(&mut self, ins: CanonicalInstruction) {
        assert!(self.length < MAX_CANONICAL_LENGTH, "program buffer overflow");
        self.used |= self.operand_bits(ins);
        self.instructions[self.length] = ins;
        self.length += 1;
    }

    /// Removes the last instruction, rebuilding `used` from the survivors.
    pub fn pop(&mut self) {
        let new_length = self.length - 1;
        self.length = 0;
        self.used = 0;
        for i in 0..new_length {
            let ins = self.instructions[i];
            self.push(ins);
        }
    }
}
