//! # boolmin: shortest boolean programs by exhaustive search
//!
//! **`boolmin`** synthesizes the shortest straight-line boolean program that
//! realizes a given truth table over up to six input variables. Inputs are
//! either a textual expression or a truth-table literal with optional
//! don't-care rows; the result is one (or, greedily, every) minimum-length
//! sequence of two-input instructions.
//!
//! ## How it works
//!
//! The search is an *iterative-deepening superoptimizer*: for growing target
//! lengths it enumerates instruction sequences, prunes everything that is not
//! the canonical representative of its equivalence class (commuted operands,
//! reordered independent chains, double negations, dead subexpressions), and
//! tests each surviving candidate against the table with a bit-parallel
//! emulator. The first length that yields a match is the minimum by
//! construction.
//!
//! ## Quick start
//!
//! ```rust
//! use boolmin::finder::find_equivalent_programs;
//! use boolmin::op::InstructionSet;
//! use boolmin::table::TruthTable;
//!
//! // Row i of the literal is the output for input assignment i.
//! let (table, variables) = TruthTable::parse("0110").unwrap();
//!
//! let mut programs = Vec::new();
//! find_equivalent_programs(
//!     |instructions| programs.push(instructions.to_vec()),
//!     table,
//!     InstructionSet::C,
//!     variables,
//!     false,
//! );
//!
//! // Exclusive-or is a single instruction.
//! assert_eq!(programs.len(), 1);
//! assert_eq!(programs[0].len(), 1);
//! ```
//!
//! ## Core components
//!
//! - **[`op`]**: the sixteen two-input operations; a tag doubles as its truth
//!   table.
//! - **[`table`]**: truth tables as required-true/allowed-true mask pairs.
//! - **[`program`]**: instruction sequences and the emulator.
//! - **[`canonical`]**: the canonical-order filter driving the search.
//! - **[`finder`]**: the iterative-deepening enumerator.
//! - **[`lexer`]**, **[`compiler`]**, **[`display`]**: the expression
//!   frontend and renderers.

pub mod bitset;
pub mod canonical;
pub mod compiler;
pub mod display;
pub mod finder;
pub mod lexer;
pub mod op;
pub mod program;
pub mod table;
