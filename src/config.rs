//! Command line parsing for the simulator.
//!
//! ```text
//! credit-scheduler-simulator [--programs DIR] [--priorities FILE] [--log-dir DIR]
//!                            [--quantum N | --quantum-file FILE | --sweep LO..HI]
//!                            [--credit-policy per-dispatch|per-instruction]
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::io::loader::PRIORITIES_FILE_NAME;
use crate::kernel::CreditPolicy;

const DEFAULT_PROGRAMS_DIR: &str = "programs";
const DEFAULT_SWEEP: (usize, usize) = (1, 21);

/// Where the quantum (or quanta) of a session come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuantumSource {
    Fixed(NonZeroUsize),
    File(PathBuf),
    /// Every quantum from `first` to `last`, inclusive.
    Sweep { first: NonZeroUsize, last: NonZeroUsize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub programs_dir: PathBuf,
    pub priorities_file: PathBuf,
    pub log_dir: PathBuf,
    pub quantum: QuantumSource,
    pub credit_policy: CreditPolicy,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

pub const USAGE: &str = "\
Usage: credit-scheduler-simulator [OPTIONS]

Options:
  --programs DIR          directory holding 01.txt, 02.txt, ... (default: programs)
  --priorities FILE       one priority per line (default: <programs>/priorities.txt)
  --log-dir DIR           where logNN.txt files are appended (default: .)
  --quantum N             run once with quantum N
  --quantum-file FILE     run once with the quantum stored in FILE
  --sweep LO..HI          run once per quantum from LO to HI (default: 1..21)
  --credit-policy POLICY  per-dispatch (default) or per-instruction
  -h, --help              print this help";

/// Parses the arguments that follow the program name.
pub fn parse_args<I>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let mut programs_dir = PathBuf::from(DEFAULT_PROGRAMS_DIR);
    let mut priorities_file = None;
    let mut log_dir = PathBuf::from(".");
    let mut quantum = None;
    let mut credit_policy = CreditPolicy::default();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--programs" => programs_dir = PathBuf::from(value_for(&flag, &mut args)?),
            "--priorities" => priorities_file = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "--log-dir" => log_dir = PathBuf::from(value_for(&flag, &mut args)?),
            "--quantum" => {
                let value = value_for(&flag, &mut args)?;
                set_quantum(&mut quantum, QuantumSource::Fixed(parse_quantum(&value)?))?;
            }
            "--quantum-file" => {
                let value = value_for(&flag, &mut args)?;
                set_quantum(&mut quantum, QuantumSource::File(PathBuf::from(value)))?;
            }
            "--sweep" => {
                let value = value_for(&flag, &mut args)?;
                set_quantum(&mut quantum, parse_sweep(&value)?)?;
            }
            "--credit-policy" => {
                credit_policy = match value_for(&flag, &mut args)?.as_str() {
                    "per-dispatch" => CreditPolicy::PerDispatch,
                    "per-instruction" => CreditPolicy::PerInstruction,
                    other => return Err(ConfigError(format!("unknown credit policy '{}'", other))),
                };
            }
            other => return Err(ConfigError(format!("unknown argument '{}'", other))),
        }
    }

    let priorities_file =
        priorities_file.unwrap_or_else(|| programs_dir.join(PRIORITIES_FILE_NAME));
    let quantum = match quantum {
        Some(quantum) => quantum,
        None => default_sweep()?,
    };

    Ok(Command::Run(Config {
        programs_dir,
        priorities_file,
        log_dir,
        quantum,
        credit_policy,
    }))
}

fn value_for(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String, ConfigError> {
    args.next()
        .ok_or_else(|| ConfigError(format!("{} requires a value", flag)))
}

fn set_quantum(slot: &mut Option<QuantumSource>, source: QuantumSource) -> Result<(), ConfigError> {
    if slot.is_some() {
        return Err(ConfigError(
            "--quantum, --quantum-file and --sweep are mutually exclusive".to_string(),
        ));
    }
    *slot = Some(source);
    Ok(())
}

fn parse_quantum(value: &str) -> Result<NonZeroUsize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| ConfigError(format!("quantum must be a positive integer, got '{}'", value)))
}

fn parse_sweep(value: &str) -> Result<QuantumSource, ConfigError> {
    let (first, last) = value
        .split_once("..")
        .ok_or_else(|| ConfigError(format!("sweep must look like LO..HI, got '{}'", value)))?;
    let first = parse_quantum(first)?;
    let last = parse_quantum(last)?;

    if first > last {
        return Err(ConfigError(format!("sweep range {} is empty", value)));
    }

    Ok(QuantumSource::Sweep { first, last })
}

fn default_sweep() -> Result<QuantumSource, ConfigError> {
    let (first, last) = DEFAULT_SWEEP;
    parse_sweep(&format!("{}..{}", first, last))
}
