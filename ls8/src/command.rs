use std::{
    error::Error,
    io::{self, Write},
    str::FromStr,
};

use anyhow::anyhow;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    // Not thrown directly by the arg reader
    #[error("Unknown command {0:?}")]
    UnknownCommand(String),

    #[error("Missing argument {0}")]
    MissingArgument(usize),

    #[error("Bad argument {0} ({1})")]
    ParseError(usize, String),

    #[error("{0} unused arguments")]
    UnusedArguments(usize),
}

pub struct Command(String);

impl Command {
    /// Reads one line from stdin, `None` at end of input.
    pub fn prompt() -> anyhow::Result<Option<Self>> {
        print!("> ");
        io::stdout().flush()?;

        io::stdin()
            .lines()
            .next()
            .transpose()
            .map(|line| line.map(Self))
            .map_err(|e| anyhow!("Couldn't read command from stdin: {}", e))
    }

    pub fn args(&self) -> CommandArgs<impl Iterator<Item = &str>> {
        CommandArgs {
            iter: self.0.split_whitespace(),
            index: 0,
        }
    }
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        Self(line.to_string())
    }
}

pub struct CommandArgs<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    iter: I,
    index: usize,
}

impl<'a, I> CommandArgs<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    pub fn next(&mut self) -> Result<&'a str, CommandError> {
        self.index += 1;

        self.iter
            .next()
            .ok_or(CommandError::MissingArgument(self.index))
    }

    pub fn next_parsed<T>(&mut self) -> Result<T, CommandError>
    where
        T: FromStr,
        <T as FromStr>::Err: Error + 'static,
    {
        let arg_str = self.next()?;

        T::from_str(arg_str).map_err(|e| CommandError::ParseError(self.index, e.to_string()))
    }

    /// Parses the next argument if there is one.
    pub fn optional_parsed<T>(&mut self) -> Result<Option<T>, CommandError>
    where
        T: FromStr,
        <T as FromStr>::Err: Error + 'static,
    {
        match self.next_parsed() {
            Ok(value) => Ok(Some(value)),
            Err(CommandError::MissingArgument(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn finish(self) -> Result<(), CommandError> {
        match self.iter.count() {
            0 => Ok(()),
            unused => Err(CommandError::UnusedArguments(unused)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_arguments_in_order() {
        let command = Command::from("d 16 4");
        let mut args = command.args();

        assert_eq!(args.next(), Ok("d"));
        assert_eq!(args.next_parsed::<usize>(), Ok(16));
        assert_eq!(args.optional_parsed::<usize>(), Ok(Some(4)));
        assert_eq!(args.optional_parsed::<usize>(), Ok(None));
    }

    #[test]
    fn reports_bad_and_missing_arguments() {
        let command = Command::from("pp x");
        let mut args = command.args();

        args.next().unwrap();
        assert!(matches!(
            args.next_parsed::<u16>(),
            Err(CommandError::ParseError(2, _))
        ));
        assert_eq!(args.next(), Err(CommandError::MissingArgument(3)));
    }

    #[test]
    fn rejects_unused_arguments() {
        let command = Command::from("q now please");
        let mut args = command.args();

        args.next().unwrap();
        assert_eq!(args.finish(), Err(CommandError::UnusedArguments(2)));
    }
}
