use thiserror::Error;

pub mod parser;

/// The largest run a single counted node can carry; longer runs roll
/// over into additional nodes rather than wrapping the count.
pub const MAX_RUN: u8 = u8::MAX;

#[derive(Debug, Clone, PartialEq)]
pub enum AstKind {
    /// Increment the byte at the data pointer by `count`
    Add(u8),
    /// Decrement the byte at the data pointer by `count`
    Subtract(u8),

    /// Advance the data pointer by `count` cells
    MoveRight(u8),
    /// Retreat the data pointer by `count` cells
    MoveLeft(u8),

    /// Repeat the body while the byte at the data pointer is non-zero.
    /// Nesting is structural: the body is a fully parsed, balanced
    /// program of its own, there are no jump offsets anywhere.
    Loop(Vec<AstKind>),

    /// Write the byte at the data pointer to the output device.
    /// Never run-length merged; each `.` is its own side effect.
    Write,
    /// Read a byte from the input device into the current cell.
    /// Never run-length merged either.
    Read,
}

pub type Program = Vec<AstKind>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unbalanced loop: can't find matching `{other:}` for `{symbol:}`")]
    UnbalancedLoop { symbol: char, other: char },
}
