//! The catalog of two-input boolean operations.
//!
//! An operation's tag *is* its truth table: for operands `a` and `b`, the
//! result is bit `(a << 1) | b` of the tag. All predicates on operations are
//! lookups into small constant bitmasks indexed by the tag, so the emulator
//! never branches on the particular operation.

/// One of the sixteen two-input boolean functions.
///
/// The discriminant of each variant is the four-bit truth table of the
/// function, with bit `(a << 1) | b` holding the result for operands `a`, `b`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Op {
    /// Constant `0`.
    False = 0,
    /// `!(a | b)`
    Nor = 1,
    /// `!a & b`
    AndnBa = 2,
    /// `!a`
    NotA = 3,
    /// `a & !b`
    AndnAb = 4,
    /// `!b`
    NotB = 5,
    /// `a ^ b`
    Xor = 6,
    /// `!(a & b)`
    Nand = 7,
    /// `a & b`
    And = 8,
    /// `!(a ^ b)`
    Nxor = 9,
    /// `b`
    B = 10,
    /// `!a | b` (material implication `a => b`)
    ConsAb = 11,
    /// `a`
    A = 12,
    /// `!b | a` (material implication `b => a`)
    ConsBa = 13,
    /// `a | b`
    Or = 14,
    /// Constant `1`.
    True = 15,
}

/// Operations that compute a constant regardless of their operands.
const TRIVIAL: u16 = 0b1000_0000_0000_0001;
/// Operations that ignore (at least) one operand.
const UNARY: u16 = 0b1001_0100_0010_1001;
/// Operations invariant under swapping their operands.
const COMMUTATIVE: u16 = 0b1100_0011_1100_0011;
/// Display hint: render as the complement of the base word, `~(a . b)`.
const COMPLEMENT: u16 = 0b0000_0010_1010_1010;
/// Display hint: render with `~` on the first displayed operand.
const OPERAND_NEGATED: u16 = 0b0010_1000_0001_0100;
/// Display hint: swap the operands before rendering.
const REVERSED: u16 = 0b0010_0100_0011_0000;

impl Op {
    /// Reconstructs an operation from its four-bit truth table tag.
    ///
    /// # Panics
    ///
    /// Panics if `tag >= 16`.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Op::False,
            1 => Op::Nor,
            2 => Op::AndnBa,
            3 => Op::NotA,
            4 => Op::AndnAb,
            5 => Op::NotB,
            6 => Op::Xor,
            7 => Op::Nand,
            8 => Op::And,
            9 => Op::Nxor,
            10 => Op::B,
            11 => Op::ConsAb,
            12 => Op::A,
            13 => Op::ConsBa,
            14 => Op::Or,
            15 => Op::True,
            _ => panic!("invalid operation tag {tag}"),
        }
    }

    /// The four-bit truth table of this operation.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Applies the operation to a pair of boolean operands.
    #[inline]
    pub const fn eval(self, a: bool, b: bool) -> bool {
        self.tag() >> (((a as u8) << 1) | b as u8) & 1 != 0
    }

    #[inline]
    pub const fn is_trivial(self) -> bool {
        TRIVIAL >> self.tag() & 1 != 0
    }

    #[inline]
    pub const fn is_unary(self) -> bool {
        UNARY >> self.tag() & 1 != 0
    }

    #[inline]
    pub const fn is_commutative(self) -> bool {
        COMMUTATIVE >> self.tag() & 1 != 0
    }

    /// True if this operation renders as `~(...)` around its base word.
    #[inline]
    pub const fn display_complement(self) -> bool {
        COMPLEMENT >> self.tag() & 1 != 0
    }

    /// True if this operation renders with `~` on its first displayed operand.
    #[inline]
    pub const fn display_operand_negated(self) -> bool {
        OPERAND_NEGATED >> self.tag() & 1 != 0
    }

    /// True if this operation renders with its operands swapped.
    #[inline]
    pub const fn display_reversed(self) -> bool {
        REVERSED >> self.tag() & 1 != 0
    }

    /// The operator word used when rendering this operation.
    ///
    /// Identity operations have an empty label; negations label themselves
    /// with the `~` prefix. The remaining labels name the base operation the
    /// display hints decorate.
    pub const fn display_label(self) -> &'static str {
        match self {
            Op::False => "false",
            Op::Nor => "or",
            Op::AndnBa => "and",
            Op::NotA => "~",
            Op::AndnAb => "and",
            Op::NotB => "~",
            Op::Xor => "xor",
            Op::Nand => "and",
            Op::And => "and",
            Op::Nxor => "xor",
            Op::B => "",
            Op::ConsAb => "or",
            Op::A => "",
            Op::ConsBa => "or",
            Op::Or => "or",
            Op::True => "true",
        }
    }

    /// All sixteen operations in tag order.
    pub fn all() -> impl Iterator<Item = Op> {
        (0..16).map(Op::from_tag)
    }
}

/// A bag of up to four operations, packed as 4-bit tags in a single word and
/// iterated by right-shifting. [`Op::False`] (tag 0) cannot be a member; its
/// tag doubles as the terminator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InstructionSet {
    /// `{NOT, NAND}`
    Nand,
    /// `{NOT, NOR}`
    Nor,
    /// `{NOT, AND, OR}`
    Basic,
    /// `{NOT, AND, OR, XOR}` — the default palette.
    C,
    /// `{NOT, AND, OR, XOR, ANDN}`
    X64,
}

impl InstructionSet {
    const fn packed(self) -> u64 {
        const NOT: u64 = Op::NotA as u64;
        const BASIC: u64 = NOT | (Op::And as u64) << 4 | (Op::Or as u64) << 8;
        const C: u64 = BASIC | (Op::Xor as u64) << 12;
        match self {
            InstructionSet::Nand => NOT | (Op::Nand as u64) << 4,
            InstructionSet::Nor => NOT | (Op::Nor as u64) << 4,
            InstructionSet::Basic => BASIC,
            InstructionSet::C => C,
            InstructionSet::X64 => C | (Op::AndnAb as u64) << 16,
        }
    }

    /// Iterates the member operations in packing order.
    pub fn ops(self) -> OpSetIter {
        OpSetIter {
            word: self.packed(),
        }
    }
}

/// Iterator over the operations of an [`InstructionSet`].
pub struct OpSetIter {
    word: u64,
}

impl Iterator for OpSetIter {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        if self.word == 0 {
            return None;
        }
        let op = Op::from_tag((self.word & 0xf) as u8);
        self.word >>= 4;
        Some(op)
    }
}
