use thiserror::Error;

pub mod lower;

/// Identifies a basic block.  Ids come from one counter threaded through
/// the whole lowering pass, so they are unique across sibling and nested
/// loops alike.
pub type BlockId = usize;

/// A named storage slot the blocks operate on.  A lowered module has
/// exactly two: the cell array and the data pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub name: String,
    pub bytes: usize,
}

/// The instruction set is a small load/op/store vocabulary over an
/// implicit scratch register, which is all the language needs; the
/// external backend does instruction selection from here.  The register
/// is word wide and signed, so a pointer decrement below zero holds a
/// negative value until `WrapTape` brings it back in range.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Load the byte at the data pointer into the scratch register
    LoadCell,
    /// Load the data pointer itself
    LoadPointer,

    /// Add an immediate to the scratch register
    AddImmediate(u8),
    /// Subtract an immediate from the scratch register
    SubImmediate(u8),

    /// Store the scratch register back to the byte at the data pointer
    StoreCell,
    /// Store the scratch register back to the data pointer
    StorePointer,

    /// Euclidean-remainder the scratch register by the cell allocation
    /// size.  Pointer arithmetic wraps modulo the tape in both
    /// directions, and with a word-wide pointer slot that wrap has to be
    /// spelled out for the backend: it follows every pointer update, so
    /// `0 - 1` comes back as the last cell index, not a trap or 2^64-1.
    WrapTape,

    /// Compare the scratch register to zero, setting the flag that a
    /// conditional branch terminator tests
    CompareZero,

    /// Call the externally resolved emit-byte primitive with the scratch register
    CallEmit,
    /// Call the externally resolved read-byte primitive, result in the scratch register
    CallRead,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    /// Unconditional jump
    Branch(BlockId),
    /// Jump taken on the `CompareZero` flag
    CondBranch {
        on_zero: BlockId,
        on_nonzero: BlockId,
    },
    /// End of the program
    Return,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub id: BlockId,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

impl BasicBlock {
    fn new(id: BlockId) -> Self {
        Self {
            id,
            instructions: vec![],
            terminator: Terminator::Return,
        }
    }
}

/// The structured program handed to the external backend: two
/// allocations plus the block list, entry at `blocks[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub cells: Allocation,
    pub pointer: Allocation,
    pub blocks: Vec<BasicBlock>,
}

impl Module {
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

/// The primitive symbols the backend must resolve for us; read-byte is
/// optional for programs with no `,` in them.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitives<'a> {
    pub emit_byte: &'a str,
    pub read_byte: Option<&'a str>,
}

impl Default for Primitives<'static> {
    fn default() -> Self {
        Self {
            emit_byte: "putchar",
            read_byte: Some("getchar"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("code generation backend failed: {0}")]
    Backend(String),

    #[error("failed to emit artifact")]
    Emit(#[from] std::io::Error),
}

/// Instruction selection, optimization and artifact emission all live
/// behind this seam; the core only produces the `Module`.
pub trait Backend {
    fn emit(&mut self, module: &Module, primitives: &Primitives) -> Result<(), CodegenError>;
}

/// Writes the module as a readable listing.  Not a real backend, but it
/// exercises the same seam and is what the `codegen-ir` command prints.
pub struct IrPrinter<W: std::io::Write> {
    out: W,
}

impl<W: std::io::Write> IrPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: std::io::Write> Backend for IrPrinter<W> {
    fn emit(&mut self, module: &Module, primitives: &Primitives) -> Result<(), CodegenError> {
        writeln!(self.out, "alloc {} [{} bytes]", module.cells.name, module.cells.bytes)?;
        writeln!(
            self.out,
            "alloc {} [{} bytes]",
            module.pointer.name, module.pointer.bytes
        )?;

        for block in module.blocks.iter() {
            writeln!(self.out, "block{}:", block.id)?;
            for instruction in block.instructions.iter() {
                match instruction {
                    Instruction::LoadCell => writeln!(self.out, "  load {}", module.cells.name)?,
                    Instruction::LoadPointer => {
                        writeln!(self.out, "  load {}", module.pointer.name)?
                    }
                    Instruction::AddImmediate(i) => writeln!(self.out, "  add {}", i)?,
                    Instruction::SubImmediate(i) => writeln!(self.out, "  sub {}", i)?,
                    Instruction::StoreCell => writeln!(self.out, "  store {}", module.cells.name)?,
                    Instruction::StorePointer => {
                        writeln!(self.out, "  store {}", module.pointer.name)?
                    }
                    Instruction::WrapTape => {
                        writeln!(self.out, "  wrap {}", module.cells.bytes)?
                    }
                    Instruction::CompareZero => writeln!(self.out, "  cmp 0")?,
                    Instruction::CallEmit => writeln!(self.out, "  call {}", primitives.emit_byte)?,
                    Instruction::CallRead => {
                        let read = primitives.read_byte.ok_or_else(|| {
                            CodegenError::Backend(
                                "program reads input but no read-byte primitive was given"
                                    .to_string(),
                            )
                        })?;
                        writeln!(self.out, "  call {}", read)?
                    }
                }
            }
            match &block.terminator {
                Terminator::Branch(id) => writeln!(self.out, "  br block{}", id)?,
                Terminator::CondBranch { on_zero, on_nonzero } => writeln!(
                    self.out,
                    "  brz block{} block{}",
                    on_zero, on_nonzero
                )?,
                Terminator::Return => writeln!(self.out, "  ret")?,
            }
        }

        Ok(())
    }
}
