use crate::lexer::LexerTokenKind;

use super::{Execute, Runtime, RuntimeError};

/// Executes the normalized opcode stream directly, no AST: an
/// instruction cursor plus on-the-fly bracket scanning for loop jumps.
/// The simplest design point over the language, kept as an alternative
/// to the AST machinery.
pub struct StreamInterpreter<'a> {
    tokens: &'a [LexerTokenKind],
    cursor: usize,
}

impl<'a> StreamInterpreter<'a> {
    pub fn new(tokens: &'a [LexerTokenKind]) -> Self {
        Self { tokens, cursor: 0 }
    }

    pub fn run(&mut self, runtime: &mut Runtime) -> Result<(), RuntimeError> {
        while self.cursor < self.tokens.len() {
            self.step(runtime)?;
        }
        Ok(())
    }

    fn step(&mut self, runtime: &mut Runtime) -> Result<(), RuntimeError> {
        match &self.tokens[self.cursor] {
            LexerTokenKind::Increment => runtime.move_pointer_right(1),
            LexerTokenKind::Decrement => runtime.move_pointer_left(1),
            LexerTokenKind::DerefIncrement => runtime.deref_and_add_value(1),
            LexerTokenKind::DerefDecrement => runtime.deref_and_sub_value(1),
            LexerTokenKind::Write => runtime.write()?,
            LexerTokenKind::Read => runtime.read()?,
            LexerTokenKind::JumpStart => {
                if runtime.value_is_zero() {
                    self.skip_loop()?;
                    return Ok(());
                }
            }
            LexerTokenKind::JumpEnd => {
                if !runtime.value_is_zero() {
                    self.rewind_loop()?;
                    return Ok(());
                }
            }
            // comments never appear in a normalized stream; skip if fed one
            LexerTokenKind::EOF | LexerTokenKind::Comment(_) => {}
        }
        self.cursor += 1;
        Ok(())
    }

    /// The cell is zero at a `[`: scan forward for the matching `]` and
    /// leave the cursor just past it.  Running off the end of the stream
    /// means the `[` was never closed.
    fn skip_loop(&mut self) -> Result<(), RuntimeError> {
        let mut depth = 1;
        while depth > 0 {
            self.cursor += 1;
            match self.tokens.get(self.cursor) {
                Some(LexerTokenKind::JumpStart) => depth += 1,
                Some(LexerTokenKind::JumpEnd) => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(RuntimeError::UnbalancedLoop {
                        symbol: '[',
                        other: ']',
                    })
                }
            }
        }
        self.cursor += 1;
        Ok(())
    }

    /// The cell is non-zero at a `]`: scan backward for the matching `[`
    /// and leave the cursor just past it, re-entering the loop body.
    fn rewind_loop(&mut self) -> Result<(), RuntimeError> {
        let mut depth = 1;
        while depth > 0 {
            if self.cursor == 0 {
                return Err(RuntimeError::UnbalancedLoop {
                    symbol: ']',
                    other: '[',
                });
            }
            self.cursor -= 1;
            match &self.tokens[self.cursor] {
                LexerTokenKind::JumpEnd => depth += 1,
                LexerTokenKind::JumpStart => depth -= 1,
                _ => {}
            }
        }
        self.cursor += 1;
        Ok(())
    }
}

impl<'a> Execute for StreamInterpreter<'a> {
    fn execute(&mut self, runtime: &mut Runtime) -> Result<(), RuntimeError> {
        self.run(runtime)
    }
}
