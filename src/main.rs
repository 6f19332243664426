extern crate clap;
extern crate thiserror;

pub mod codegen;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod transpiler;

use std::{collections::HashSet, error::Error, io, time::Instant};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use lexer::lexer::Lexer;

use crate::{
    codegen::{lower::lower, Backend, IrPrinter, Primitives},
    interpreter::{
        ast_interpreter::AstInterpreter, stream_interpreter::StreamInterpreter, Execute, Runtime,
        DEFAULT_TAPE_SIZE,
    },
    transpiler::Transpiler,
};

/// Brainf**k toolchain: parser/interpreter/codegen/transpiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to operate on
    #[arg()]
    file: String,

    #[arg(value_enum)]
    commands: Vec<Commands>,

    #[arg(short, long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Commands {
    /// Output the lexer
    Tokens,
    /// Output the ast
    Ast,
    /// Output the lowered basic-block module
    CodegenIr,
    /// Output the transpiled Rust source
    Transpile,

    /// Run the raw opcode stream directly (no AST)
    Run,
    /// Run the parsed AST
    Interpret,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let commands: HashSet<Commands> = HashSet::from_iter(args.commands.into_iter());

    println!("Running {}", args.file);

    let text = std::fs::read_to_string(&args.file)?;

    println!("{}", "Starting lexing".blue());
    let mut now = Instant::now();
    let tokens = Lexer::new(&text).normalize();
    println!("{} {:.2?}", "Finished lexing in".green(), now.elapsed());

    if commands.contains(&Commands::Tokens) {
        for token in tokens.iter() {
            if let Some(c) = token.as_char() {
                print!("{}", c);
            }
        }
        println!();
    }

    if commands.contains(&Commands::Run) {
        println!("{}", "Starting stream-interpreter".blue());
        now = Instant::now();
        let mut runtime = runtime(args.tape_size);
        StreamInterpreter::new(&tokens).execute(&mut runtime)?;
        println!();
        println!(
            "{} {:.2?}",
            "Finished stream-interpreter in".green(),
            now.elapsed()
        );
    }

    println!("{}", "Starting parsing".blue());
    now = Instant::now();
    let program = parser::parser::Parser::new(&tokens).parse_program()?;
    println!("{} {:.2?}", "Finished parsing in".green(), now.elapsed());

    if commands.contains(&Commands::Ast) {
        println!("{:#?}", program);
    }

    if commands.contains(&Commands::Interpret) {
        println!("{}", "Starting ast-interpreter".blue());
        now = Instant::now();
        let mut runtime = runtime(args.tape_size);
        AstInterpreter::new(&program).execute(&mut runtime)?;
        println!();
        println!(
            "{} {:.2?}",
            "Finished ast-interpreter in".green(),
            now.elapsed()
        );
    }

    if commands.contains(&Commands::CodegenIr) {
        println!("{}", "Starting lowering".blue());
        now = Instant::now();
        let module = lower(&program, args.tape_size);
        println!(
            "{} {} {} {:.2?}",
            "Finished lowering".green(),
            module.blocks.len(),
            "blocks in".green(),
            now.elapsed()
        );
        IrPrinter::new(io::stdout()).emit(&module, &Primitives::default())?;
    }

    if commands.contains(&Commands::Transpile) {
        println!("{}", "Starting transpile".blue());
        now = Instant::now();
        let source = Transpiler::new(args.tape_size).transpile(&program);
        println!("{} {:.2?}", "Finished transpile in".green(), now.elapsed());
        println!("{}", source);
    }

    Ok(())
}

fn runtime(tape_size: usize) -> Runtime {
    Runtime::new(tape_size, Box::new(io::stdin()), Box::new(io::stdout()))
}
