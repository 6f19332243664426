use crate::parser::{AstKind, Program};

/// Emits a standalone Rust program equivalent to the parsed tree: one
/// statement per counted node, a `while` per loop.  The text is the
/// whole contract; where it ends up is the caller's business.
pub struct Transpiler {
    output: String,
    indent_level: usize,
    tape_size: usize,
}

impl Transpiler {
    pub fn new(tape_size: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            tape_size,
        }
    }

    pub fn transpile(mut self, program: &Program) -> String {
        self.push_line("use std::io::{Read, Write};");
        self.push_line("");
        self.push_line("fn main() -> std::io::Result<()> {");
        self.indent_level += 1;
        self.push_line(&format!("let mut cells = vec![0u8; {}];", self.tape_size));
        self.push_line("let mut data_pointer: usize = 0;");
        self.push_line("let mut stdin = std::io::stdin();");
        self.push_line("let mut stdout = std::io::stdout();");
        self.push_line("let mut buf = [0u8; 1];");
        self.push_line("");

        self.emit_block(program);

        self.push_line("stdout.flush()?;");
        self.push_line("Ok(())");
        self.indent_level -= 1;
        self.push_line("}");
        self.output
    }

    fn emit_block(&mut self, nodes: &[AstKind]) {
        for node in nodes.iter() {
            self.emit(node);
        }
    }

    fn emit(&mut self, node: &AstKind) {
        match node {
            AstKind::Add(i) => self.push_line(&format!(
                "cells[data_pointer] = cells[data_pointer].wrapping_add({});",
                i
            )),
            AstKind::Subtract(i) => self.push_line(&format!(
                "cells[data_pointer] = cells[data_pointer].wrapping_sub({});",
                i
            )),
            AstKind::MoveRight(i) => self.push_line(&format!(
                "data_pointer = (data_pointer + {}) % {};",
                i, self.tape_size
            )),
            // a left move is a right move by the complement; the count is
            // reduced mod the tape first so it works on tapes under 255
            AstKind::MoveLeft(i) => self.push_line(&format!(
                "data_pointer = (data_pointer + {}) % {};",
                self.tape_size - *i as usize % self.tape_size,
                self.tape_size
            )),
            AstKind::Loop(body) => {
                self.push_line("while cells[data_pointer] != 0 {");
                self.indent_level += 1;
                self.emit_block(body);
                self.indent_level -= 1;
                self.push_line("}");
            }
            AstKind::Write => self.push_line(
                "stdout.write_all(&cells[data_pointer..data_pointer + 1])?;",
            ),
            AstKind::Read => {
                self.push_line("stdin.read_exact(&mut buf)?;");
                self.push_line("cells[data_pointer] = buf[0];");
            }
        }
    }

    fn push_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent_level {
                self.output.push_str("    ");
            }
            self.output.push_str(line);
        }
        self.output.push('\n');
    }
}
