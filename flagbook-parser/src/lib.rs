//! Declaration registry, command line scanner and help renderer of flagbook.
#![no_std]

extern crate alloc;

pub mod arg;
pub mod help;
pub mod lexer;
pub mod parser;
pub mod registry;

pub use arg::{DEFAULT_GROUP, Descriptor, Kind, Value};
pub use help::Help;
pub use lexer::{Token, Tokens};
pub use parser::{ArgParser, Outcome, ParseError, Settings};
pub use registry::{DeclarationError, Registry};
