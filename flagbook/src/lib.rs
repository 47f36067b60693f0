//! flagbook, a declare-then-parse command line option registry with grouped help.
//!
//! Arguments are declared in a [`Registry`], then an [`ArgParser`] assigns their values from the
//! command line. This crate binds the `no_std` parser to the process: it reads the arguments,
//! prints the help and exits when asked to.
#![deny(missing_docs)]

use std::io::{self, Write};

pub use flagbook_parser as parser;

pub use parser::{
    ArgParser, DeclarationError, Descriptor, Help, Kind, Outcome, ParseError, Registry, Value,
};

/// Defines the possible errors that may occur during usage of the crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An error comes from the declaration of arguments.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// Some arguments could not be assigned. Other arguments have been assigned anyway.
    #[error("{} argument(s) rejected, first: {}", .0.len(), first(.0))]
    Rejected(Vec<ParseError>),

    /// The help text could not be written.
    #[error("cannot write help text")]
    Io(#[from] io::Error),
}

fn first(errors: &[ParseError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

/// What the caller should do once the arguments have been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Proceed with the parsed values.
    Continue,

    /// Terminate the process with the given status.
    Exit(i32),
}

/// Parse the given arguments, without the program name, and write the help to `out` if it is
/// requested.
pub fn run<S, W>(parser: &mut ArgParser, argv: &[S], out: &mut W) -> Result<Action, Error>
where
    S: AsRef<str>,
    W: Write,
{
    match parser.parse(argv) {
        Outcome::HelpRequested(help) => {
            write!(out, "{help}")?;
            out.flush()?;
            Ok(Action::Exit(0))
        }

        Outcome::Parsed(errors) if !errors.is_empty() => Err(Error::Rejected(errors)),

        Outcome::Parsed(_) => Ok(Action::Continue),

        Outcome::AlreadyParsed => {
            tracing::debug!("arguments already parsed");
            Ok(Action::Continue)
        }
    }
}

/// Parse the arguments of the current process.
///
/// When the help is requested, it is printed on the standard output and the process exits with
/// status 0. Arguments that are not valid UTF-8 are converted lossily.
pub fn parse_env(parser: &mut ArgParser) -> Result<(), Error> {
    let argv: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let stdout = io::stdout();
    match run(parser, argv.as_slice(), &mut stdout.lock())? {
        Action::Continue => Ok(()),
        Action::Exit(code) => {
            tracing::debug!(code, "exiting after help");
            std::process::exit(code)
        }
    }
}
