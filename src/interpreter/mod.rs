pub mod ast_interpreter;
pub mod stream_interpreter;

use std::io::{ErrorKind, Read, Write};

use thiserror::Error;

/// One canonical memory size shared by every backend: the interpreters
/// run against a tape of this many cells and the code generator and
/// transpiler bake the same constant into their output.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("unbalanced loop: can't find matching `{other:}` for `{symbol:}`")]
    UnbalancedLoop { symbol: char, other: char },

    #[error("input exhausted: `,` executed with no bytes left to read")]
    InputExhausted,

    #[error("IO Error")]
    Io(#[from] std::io::Error),
}

/// "Run a program, given byte I/O": both execution strategies (the raw
/// stream walker and the AST walker) implement this, the caller picks one.
pub trait Execute {
    fn execute(&mut self, runtime: &mut Runtime) -> Result<(), RuntimeError>;
}

pub struct Runtime {
    /// Pointer into the tape
    data_pointer: usize,

    /// Our statically allocated tape of byte cells
    tape: Vec<u8>,

    in_stream: Box<dyn Read>,
    out_stream: Box<dyn Write>,
}

impl Runtime {
    /// `tape_size` must be at least one cell, there is no current cell
    /// otherwise; the constructor panics on zero.
    pub fn new(tape_size: usize, in_stream: Box<dyn Read>, out_stream: Box<dyn Write>) -> Self {
        assert!(tape_size > 0, "tape must have at least one cell");
        Self {
            data_pointer: 0,
            tape: vec![0; tape_size],
            in_stream,
            out_stream,
        }
    }

    pub fn reset(&mut self) {
        self.tape = vec![0; self.tape.len()];
        self.data_pointer = 0;
    }

    /// Read one byte from the input stream into the current cell.  An
    /// exhausted stream is an error; we never substitute a default byte.
    pub fn read(&mut self) -> Result<(), RuntimeError> {
        let mut buf = [0u8; 1];
        self.in_stream.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                RuntimeError::InputExhausted
            } else {
                RuntimeError::Io(e)
            }
        })?;
        self.tape[self.data_pointer] = buf[0];
        Ok(())
    }

    /// Write the current cell to the output stream.
    pub fn write(&mut self) -> Result<(), RuntimeError> {
        self.out_stream
            .write_all(&self.tape[self.data_pointer..self.data_pointer + 1])?;
        Ok(())
    }

    /// Cell arithmetic wraps modulo 256, it never traps.
    pub fn deref_and_add_value(&mut self, by: u8) {
        self.tape[self.data_pointer] = self.tape[self.data_pointer].wrapping_add(by);
    }

    pub fn deref_and_sub_value(&mut self, by: u8) {
        self.tape[self.data_pointer] = self.tape[self.data_pointer].wrapping_sub(by);
    }

    /// Pointer arithmetic wraps modulo the tape size in both directions,
    /// so the pointer is always in bounds.
    pub fn move_pointer_right(&mut self, by: u8) {
        self.data_pointer = (self.data_pointer + by as usize) % self.tape.len();
    }

    pub fn move_pointer_left(&mut self, by: u8) {
        let len = self.tape.len();
        self.data_pointer = (self.data_pointer + len - by as usize % len) % len;
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> bool {
        self.tape[self.data_pointer] == 0
    }

    pub fn current_value(&self) -> u8 {
        self.tape[self.data_pointer]
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }
}
