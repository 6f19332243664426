use crate::parser::{AstKind, Program};

use super::{Execute, Runtime, RuntimeError};

/// Walks the parsed tree directly; loops are just Rust `while` loops
/// over the owned body, so there is no bracket scanning at all.
pub struct AstInterpreter<'a> {
    program: &'a Program,
}

impl<'a> AstInterpreter<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self { program }
    }

    pub fn interpret(&self, runtime: &mut Runtime) -> Result<(), RuntimeError> {
        self.interpret_block(runtime, self.program)
    }

    // written this way since the upper-most block (program) doesn't repeat
    fn interpret_block(&self, runtime: &mut Runtime, block: &[AstKind]) -> Result<(), RuntimeError> {
        for instruction in block.iter() {
            match instruction {
                AstKind::Add(i) => runtime.deref_and_add_value(*i),
                AstKind::Subtract(i) => runtime.deref_and_sub_value(*i),
                AstKind::MoveRight(i) => runtime.move_pointer_right(*i),
                AstKind::MoveLeft(i) => runtime.move_pointer_left(*i),
                AstKind::Write => runtime.write()?,
                AstKind::Read => runtime.read()?,
                AstKind::Loop(body) => {
                    while !runtime.value_is_zero() {
                        self.interpret_block(runtime, body)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<'a> Execute for AstInterpreter<'a> {
    fn execute(&mut self, runtime: &mut Runtime) -> Result<(), RuntimeError> {
        self.interpret(runtime)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::interpreter::stream_interpreter::StreamInterpreter;
    use crate::interpreter::test_io::SharedBuf;
    use crate::lexer::lexer::Lexer;
    use crate::parser::parser::Parser;

    fn interpret(source: &str, input: &[u8]) -> Result<(Vec<u8>, Runtime), RuntimeError> {
        let tokens = Lexer::new(source).normalize();
        let program = Parser::new(&tokens).parse_program().unwrap();
        let out = SharedBuf::default();
        let mut runtime = Runtime::new(
            64,
            Box::new(Cursor::new(input.to_vec())),
            Box::new(out.clone()),
        );
        AstInterpreter::new(&program).interpret(&mut runtime)?;
        Ok((out.contents(), runtime))
    }

    fn stream_output(source: &str, input: &[u8]) -> Vec<u8> {
        let tokens = Lexer::new(source).normalize();
        let out = SharedBuf::default();
        let mut runtime = Runtime::new(
            64,
            Box::new(Cursor::new(input.to_vec())),
            Box::new(out.clone()),
        );
        StreamInterpreter::new(&tokens).run(&mut runtime).unwrap();
        out.contents()
    }

    #[test]
    fn outputs_cell_values_in_program_order() {
        let (output, _) = interpret("++.--.", &[]).unwrap();
        assert_eq!(output, vec![0x02, 0x00]);
    }

    #[test]
    fn clear_loop_zeroes_the_cell() {
        let (output, runtime) = interpret("++++[-]", &[]).unwrap();
        assert!(output.is_empty());
        assert_eq!(runtime.current_value(), 0);
    }

    #[test]
    fn counted_nodes_match_one_opcode_at_a_time_execution() {
        // 300 increments crosses the 255 roll-over, so the merged tree is
        // [Add(255), Add(45)]; the raw stream applies them one at a time
        let source = format!("{}.", "+".repeat(300));
        let (merged, _) = interpret(&source, &[]).unwrap();
        assert_eq!(merged, vec![(300 % 256) as u8]);
        assert_eq!(merged, stream_output(&source, &[]));
    }

    #[test]
    fn stream_and_ast_execution_agree_on_loops_and_io() {
        let source = ",[>++<-]>.";
        let (ast_out, _) = interpret(source, &[5]).unwrap();
        assert_eq!(ast_out, vec![10]);
        assert_eq!(ast_out, stream_output(source, &[5]));
    }

    #[test]
    fn reading_past_end_of_input_is_reported() {
        let err = interpret(",,", b"x").map(|_| ()).unwrap_err();
        assert!(matches!(err, RuntimeError::InputExhausted));
    }
}
