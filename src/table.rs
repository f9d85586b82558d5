//! Truth tables with don't-care rows.
//!
//! A table over `V` variables is a pair of 64-bit masks: `f` marks the rows
//! that are required to be true, `t` marks the rows that are *allowed* to be
//! true (required-true plus don't-care). Row `v` is the assignment where
//! input `i` takes bit `i` of `v`.

use thiserror::Error;

use crate::program::VARIABLE_LIMIT;

/// Character marking an unconstrained row in the textual table form.
pub const DONT_CARE: char = 'x';

/// A boolean function specification over up to six variables.
///
/// Invariant: `f` is a subset of `t`. Rows in `t \ f` are don't-cares, rows
/// beyond `2^V` are clear in both masks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct TruthTable {
    /// Table with all don't-cares resolved to false.
    pub f: u64,
    /// Table with all don't-cares resolved to true.
    pub t: u64,
}

/// Reasons a textual truth table is rejected.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TableParseError {
    #[error("truth table is too long ({0} entries, at most 64 supported)")]
    TooLong(usize),
    #[error("truth table needs at least two entries (one variable), got {0}")]
    TooShort(usize),
    #[error("length of truth table has to be a power of two, is {0}")]
    NotPowerOfTwo(usize),
    #[error("truth table must consist of only '0', '1' and '{DONT_CARE}', found {0:?}")]
    InvalidEntry(char),
}

impl TruthTable {
    /// Parses a table literal over the alphabet `{'0', '1', 'x'}`, with `'.'`
    /// accepted (and ignored) as a visual separator. Position `i` of the
    /// stripped string describes row `i`.
    ///
    /// Returns the table together with its variable count.
    pub fn parse(input: &str) -> Result<(Self, usize), TableParseError> {
        let entries: Vec<char> = input.chars().filter(|&c| c != '.').collect();
        if entries.len() > 64 {
            return Err(TableParseError::TooLong(entries.len()));
        }
        if entries.len() < 2 {
            return Err(TableParseError::TooShort(entries.len()));
        }
        if !entries.len().is_power_of_two() {
            return Err(TableParseError::NotPowerOfTwo(entries.len()));
        }

        let mut f = 0u64;
        let mut t = 0u64;
        for (row, &entry) in entries.iter().enumerate() {
            match entry {
                '0' => {}
                '1' => {
                    f |= 1 << row;
                    t |= 1 << row;
                }
                DONT_CARE => t |= 1 << row,
                other => return Err(TableParseError::InvalidEntry(other)),
            }
        }

        let variables = entries.len().trailing_zeros() as usize;
        Ok((Self { f, t }, variables))
    }

    /// Renders the table back to its literal form, a `'.'` every four rows.
    /// Inverse of [`TruthTable::parse`].
    pub fn render(&self, variables: usize) -> String {
        let mut out = String::new();
        for row in 0..1u64 << variables {
            if row != 0 && row % 4 == 0 {
                out.push('.');
            }
            out.push(match (self.f >> row & 1 != 0, self.t >> row & 1 != 0) {
                (true, _) => '1',
                (false, true) => DONT_CARE,
                (false, false) => '0',
            });
        }
        out
    }

    /// Rows whose value is unconstrained.
    #[inline]
    pub const fn dont_care(&self) -> u64 {
        self.f ^ self.t
    }

    /// Rows with a fixed required value, resolved to that value.
    #[inline]
    pub const fn mandatory(&self) -> u64 {
        self.f & self.t
    }

    /// The set of variables the required rows actually depend on, as a
    /// `variables`-bit mask.
    ///
    /// Variable `v` is relevant iff some pair of rows differing only in bit
    /// `v` disagrees in the mandatory table. Don't-care rows count as false
    /// here, matching [`TruthTable::mandatory`].
    pub fn relevancy(&self, variables: usize) -> u64 {
        debug_assert!(variables <= VARIABLE_LIMIT);
        let mandatory = self.mandatory();
        let mut result = 0;
        for v in 0..variables {
            let (lo, hi) = split_bits_alternating(mandatory, v);
            result |= u64::from(lo != hi) << v;
        }
        result
    }
}

/// Splits `bits` into two compacted halves by bit `magnitude` of each bit's
/// index: bit `i` goes to the first half when `i >> magnitude & 1 == 0`, to
/// the second otherwise, preserving order within each half.
///
/// The `k`-th bit of one half and the `k`-th bit of the other then describe a
/// pair of rows differing only in variable `magnitude`.
fn split_bits_alternating(bits: u64, magnitude: usize) -> (u64, u64) {
    let mut result = [0u64; 2];
    let mut count = [0u32; 2];
    for i in 0..64 {
        let bit = bits >> i & 1;
        let choice = (i >> magnitude & 1) as usize;
        result[choice] |= bit << count[choice];
        count[choice] += 1;
    }
    (result[0], result[1])
}
