use std::{
    fs,
    path::{Path, PathBuf},
    process::exit,
    time::Instant,
};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use command::{Command, CommandError};
use libls8deassembler::Deassembler;
use libls8emu::{output::StdoutOutput, HaltReason, Processor};
use libls8isa::{
    format::{format_word, Radix},
    program::parse_program,
    Architecture,
};

mod command;

const DEFAULT_EXAMPLES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/programs");
const EXAMPLE_EXTENSION: &str = "ls8";

const DEFAULT_RUN_LIMIT: u64 = 1_000_000;

#[derive(Parser, Debug)]
#[command(version, about = "Runs LS-8 programs")]
pub struct Args {
    /// Program file, one binary word per line.
    #[arg(required_unless_present = "example")]
    program: Option<PathBuf>,

    /// Program name inside the examples directory, with or without the extension.
    #[arg(short, long, conflicts_with = "program")]
    example: Option<String>,

    #[arg(long, default_value = DEFAULT_EXAMPLES_DIR)]
    examples_dir: PathBuf,

    #[arg(long, default_value_t = libls8isa::DEFAULT_BIT_COUNT)]
    bit_count: u32,

    /// Give up after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Print a trace line to stderr before every cycle.
    #[arg(short, long)]
    trace: bool,

    /// Print registers, flags and pointers once the processor stops.
    #[arg(long)]
    dump: bool,

    /// Step through the program with a command prompt.
    #[arg(short, long)]
    interactive: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let path = program_path(args)?;
    log::info!("Loading {}", path.display());

    let source = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read program {}", path.display()))?;
    let program = parse_program(&source, args.bit_count).context("Failed to parse program")?;

    let arch = Architecture::new(args.bit_count)?.shared();
    let mut processor = Processor::with_stdout(arch);
    processor.load(&program)?;

    let result = if args.interactive {
        interact(&mut processor)
    } else {
        emulate(&mut processor, args)
    };

    if args.dump {
        eprintln!("{}", processor.trace_line());
        eprintln!("{}", processor.status_line());
    }

    result
}

fn program_path(args: &Args) -> anyhow::Result<PathBuf> {
    match (&args.program, &args.example) {
        (_, Some(example)) => {
            let name = example
                .strip_suffix(&format!(".{}", EXAMPLE_EXTENSION))
                .unwrap_or(example);

            Ok(example_path(&args.examples_dir, name))
        }
        (Some(program), None) => Ok(program.clone()),
        (None, None) => Err(anyhow!("No program specified")),
    }
}

fn example_path(examples_dir: &Path, name: &str) -> PathBuf {
    examples_dir.join(name).with_extension(EXAMPLE_EXTENSION)
}

fn emulate(processor: &mut Processor<StdoutOutput>, args: &Args) -> anyhow::Result<()> {
    let start_time = Instant::now();
    processor.start();

    while processor.is_running() {
        if let Some(max_cycles) = args.max_cycles {
            if processor.cycles() >= max_cycles {
                processor.stop();
                bail!("Still running after {} cycles", max_cycles);
            }
        }

        if args.trace {
            eprintln!("{}", processor.trace_line());
        }

        processor.step().context("Processor fault")?;
    }

    log::info!(
        "Halted after {} cycles ({} µs)",
        processor.cycles(),
        start_time.elapsed().as_micros()
    );

    Ok(())
}

fn interact(processor: &mut Processor<StdoutOutput>) -> anyhow::Result<()> {
    loop {
        eprintln!("{}", processor.trace_line());

        let Some(command) = Command::prompt()? else {
            return Ok(());
        };

        match execute_command(&command, processor) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => eprintln!("!> {:#}", e),
        }
    }
}

/// Runs one prompt command. Returns whether the session should end.
fn execute_command(
    command: &Command,
    processor: &mut Processor<StdoutOutput>,
) -> anyhow::Result<bool> {
    let mut args = command.args();
    let bit_count = processor.arch().params.bit_count;

    match args.next()? {
        "s" => {
            let count = args.optional_parsed::<u64>()?.unwrap_or(1);
            resume(processor);

            for _ in 0..count {
                processor.step()?;
                if !processor.is_running() {
                    break;
                }
            }
        }
        "r" => {
            let limit = args.optional_parsed()?.unwrap_or(DEFAULT_RUN_LIMIT);
            resume(processor);

            processor.run_cycles(limit)?;
            if processor.is_running() {
                eprintln!("Still running after {} cycles", limit);
            }
        }
        "d" => {
            let begin = args.optional_parsed()?.unwrap_or(0);
            let length = args.optional_parsed()?.unwrap_or(16);
            let mode = args.next().unwrap_or("h");

            let words = processor.memory.slice(begin, length);

            let dump = match mode {
                "h" => words
                    .iter()
                    .map(|word| format_word(*word, Radix::Hexadecimal, bit_count))
                    .collect::<Vec<_>>()
                    .join(" "),
                "b" => words
                    .iter()
                    .map(|word| format_word(*word, Radix::Binary, bit_count))
                    .collect::<Vec<_>>()
                    .join(" "),
                "a" => words
                    .iter()
                    .map(|word| libls8emu::output::alpha(*word))
                    .collect::<String>(),
                _ => bail!("Unrecognized dump mode {:?}", mode),
            };

            println!("{}", dump);
        }
        "l" => {
            let count = args.optional_parsed::<usize>()?.unwrap_or(8);

            let program_pointer = processor.program_pointer as usize;
            let words = processor.memory.slice(program_pointer, processor.memory.len());
            let mut deassembler = Deassembler::new(&processor.arch().operations, words.iter());

            for _ in 0..count {
                println!("{}", deassembler.deassemble_operation_text());
            }
        }
        "pp" => {
            processor.program_pointer = args.next_parsed()?;
        }
        "halt" => {
            println!("{}", processor.status_line());
        }
        "q" => return Ok(true),
        other => return Err(CommandError::UnknownCommand(other.to_string()).into()),
    }

    args.finish()?;
    Ok(false)
}

/// Restarts a processor stopped by the caller or never started. Faults and HLT stay stopped.
fn resume(processor: &mut Processor<StdoutOutput>) {
    if matches!(processor.halt_reason(), None | Some(HaltReason::Stopped)) {
        processor.start();
    }
}
