use crate::parser::{AstKind, Program};

use super::{Allocation, BasicBlock, BlockId, Instruction, Module, Terminator};

/// Lower a parsed program into the basic-block module.  Every loop
/// becomes three blocks: a header that re-evaluates the condition, a
/// body chain that branches back to the header, and an exit block that
/// lowering continues into.
pub fn lower(program: &Program, tape_size: usize) -> Module {
    let mut lowering = Lowering {
        blocks: vec![],
        next_id: 0,
    };

    let entry = lowering.new_block();
    let mut last = lowering.lower_sequence(program, entry);
    last.terminator = Terminator::Return;
    lowering.blocks.push(last);

    Module {
        cells: Allocation {
            name: "cells".to_string(),
            bytes: tape_size,
        },
        pointer: Allocation {
            name: "data_pointer".to_string(),
            bytes: std::mem::size_of::<usize>(),
        },
        blocks: lowering.blocks,
    }
}

struct Lowering {
    blocks: Vec<BasicBlock>,
    next_id: BlockId,
}

impl Lowering {
    fn new_block(&mut self) -> BasicBlock {
        let id = self.next_id;
        self.next_id += 1;
        BasicBlock::new(id)
    }

    /// Appends instructions to `current` until a loop forces a block
    /// split; returns the block that control ends up in, unterminated,
    /// for the caller to seal.
    fn lower_sequence(&mut self, nodes: &[AstKind], mut current: BasicBlock) -> BasicBlock {
        for node in nodes.iter() {
            match node {
                AstKind::Add(i) => current.instructions.extend([
                    Instruction::LoadCell,
                    Instruction::AddImmediate(*i),
                    Instruction::StoreCell,
                ]),
                AstKind::Subtract(i) => current.instructions.extend([
                    Instruction::LoadCell,
                    Instruction::SubImmediate(*i),
                    Instruction::StoreCell,
                ]),
                AstKind::MoveRight(i) => current.instructions.extend([
                    Instruction::LoadPointer,
                    Instruction::AddImmediate(*i),
                    Instruction::WrapTape,
                    Instruction::StorePointer,
                ]),
                AstKind::MoveLeft(i) => current.instructions.extend([
                    Instruction::LoadPointer,
                    Instruction::SubImmediate(*i),
                    Instruction::WrapTape,
                    Instruction::StorePointer,
                ]),
                AstKind::Write => current
                    .instructions
                    .extend([Instruction::LoadCell, Instruction::CallEmit]),
                AstKind::Read => current
                    .instructions
                    .extend([Instruction::CallRead, Instruction::StoreCell]),
                AstKind::Loop(body) => {
                    let mut header = self.new_block();
                    let body_entry = self.new_block();
                    let exit = self.new_block();

                    let mut sealed = std::mem::replace(&mut current, exit);
                    sealed.terminator = Terminator::Branch(header.id);

                    header.instructions.extend([Instruction::LoadCell, Instruction::CompareZero]);
                    header.terminator = Terminator::CondBranch {
                        on_zero: current.id,
                        on_nonzero: body_entry.id,
                    };
                    let header_id = header.id;

                    self.blocks.push(sealed);
                    self.blocks.push(header);

                    let mut body_last = self.lower_sequence(body, body_entry);
                    body_last.terminator = Terminator::Branch(header_id);
                    self.blocks.push(body_last);
                }
            }
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::codegen::Instruction::*;
    use crate::lexer::lexer::Lexer;
    use crate::parser::parser::Parser;

    fn lower_source(source: &str) -> Module {
        let tokens = Lexer::new(source).normalize();
        let program = Parser::new(&tokens).parse_program().unwrap();
        lower(&program, 30_000)
    }

    fn loop_headers(module: &Module) -> Vec<&BasicBlock> {
        module
            .blocks
            .iter()
            .filter(|b| matches!(b.terminator, Terminator::CondBranch { .. }))
            .collect()
    }

    #[test]
    fn straight_line_code_is_one_block() {
        let module = lower_source("+>.");
        assert_eq!(module.blocks.len(), 1);
        assert_eq!(
            module.blocks[0].instructions,
            vec![
                LoadCell,
                AddImmediate(1),
                StoreCell,
                LoadPointer,
                AddImmediate(1),
                WrapTape,
                StorePointer,
                LoadCell,
                CallEmit,
            ]
        );
        assert_eq!(module.blocks[0].terminator, Terminator::Return);
    }

    #[test]
    fn counted_nodes_become_immediates() {
        let module = lower_source("+++++");
        assert_eq!(
            module.blocks[0].instructions,
            vec![LoadCell, AddImmediate(5), StoreCell]
        );
    }

    #[test]
    fn every_pointer_update_carries_the_tape_wrap() {
        // `<` at pointer 0 must come back as the last cell index, so the
        // module has to spell the modulo out for the backend
        let module = lower_source("<>");
        assert_eq!(
            module.blocks[0].instructions,
            vec![
                LoadPointer,
                SubImmediate(1),
                WrapTape,
                StorePointer,
                LoadPointer,
                AddImmediate(1),
                WrapTape,
                StorePointer,
            ]
        );
    }

    #[test]
    fn read_calls_primitive_then_stores() {
        let module = lower_source(",");
        assert_eq!(module.blocks[0].instructions, vec![CallRead, StoreCell]);
    }

    #[test]
    fn loop_lowers_to_header_body_exit() {
        let module = lower_source("[-]");
        // entry, header, body, exit
        assert_eq!(module.blocks.len(), 4);

        let entry = module.block(0).unwrap();
        let header_id = match entry.terminator {
            Terminator::Branch(id) => id,
            ref t => panic!("entry should branch to the loop header, got {:?}", t),
        };

        let header = module.block(header_id).unwrap();
        assert_eq!(header.instructions, vec![LoadCell, CompareZero]);
        let (body_id, exit_id) = match header.terminator {
            Terminator::CondBranch { on_zero, on_nonzero } => (on_nonzero, on_zero),
            ref t => panic!("header should be conditional, got {:?}", t),
        };

        let body = module.block(body_id).unwrap();
        assert_eq!(body.instructions, vec![LoadCell, SubImmediate(1), StoreCell]);
        assert_eq!(body.terminator, Terminator::Branch(header_id));

        assert_eq!(module.block(exit_id).unwrap().terminator, Terminator::Return);
    }

    #[test]
    fn nested_loops_get_distinct_block_id_groups() {
        let module = lower_source("[[-]]");
        let headers = loop_headers(&module);
        assert_eq!(headers.len(), 2);
        assert_ne!(headers[0].id, headers[1].id);
    }

    #[test]
    fn sibling_loops_never_reuse_ids() {
        let module = lower_source("[-][-][-]");
        let mut seen = HashSet::new();
        for block in module.blocks.iter() {
            assert!(seen.insert(block.id), "duplicate block id {}", block.id);
        }
        assert_eq!(loop_headers(&module).len(), 3);
    }

    #[test]
    fn module_carries_the_two_allocations() {
        let module = lower_source("+");
        assert_eq!(module.cells.bytes, 30_000);
        assert_eq!(module.pointer.bytes, std::mem::size_of::<usize>());
    }
}
