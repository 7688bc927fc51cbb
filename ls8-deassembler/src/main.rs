use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use libls8deassembler::Deassembler;
use libls8isa::{program::parse_program, Architecture};

#[derive(Parser, Debug)]
#[command(version, about = "Lists the operations of an LS-8 program file")]
pub struct Args {
    program: PathBuf,

    #[arg(long, default_value_t = libls8isa::DEFAULT_BIT_COUNT)]
    bit_count: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let source = fs::read_to_string(&args.program)
        .with_context(|| format!("Error reading program file {}", args.program.display()))?;
    let program = parse_program(&source, args.bit_count)?;

    let arch = Architecture::new(args.bit_count)?;
    let deassembler = Deassembler::new(&arch.operations, program.iter());

    println!("{}", deassembler.deassemble_text());
    Ok(())
}
