//! A parser for assigning argument values from a command line.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use crate::arg::{Kind, Value};
use crate::help::Help;
use crate::lexer::{Token, Tokens};
use crate::registry::Registry;

/// Name of the help flag declared by the parser.
pub const HELP_NAME: &str = "help";

/// Alias of the help flag declared by the parser.
pub const HELP_ALIAS: &str = "h";

/// Default description of the help flag.
pub const DEFAULT_HELP_TEXT: &str = "Displays this help text";

/// Defines the possible errors that may occur during parsing of arguments. None of them stops
/// the scan: every offending token is reported and other arguments are still assigned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum ParseError {
    /// The value of an integer argument is not a base-10 integer.
    #[error("invalid integer value `{value}` for argument `{name}`")]
    InvalidIntegerLiteral {
        /// Argument name.
        name: String,

        /// Rejected value.
        value: String,
    },

    /// The value of a floating-point argument is not a number.
    #[error("invalid float value `{value}` for argument `{name}`")]
    InvalidFloatLiteral {
        /// Argument name.
        name: String,

        /// Rejected value.
        value: String,
    },

    /// The argument expects a value but is the last one of the command line.
    #[error("missing value for argument `{0}`")]
    MissingValue(String),

    /// The stored value does not have the declared kind of the argument.
    #[error("cannot assign a {expected} to argument `{name}` holding a {found}")]
    UnsupportedAssignmentType {
        /// Argument name.
        name: String,

        /// Declared kind.
        expected: Kind,

        /// Kind of the stored value.
        found: Kind,
    },

    /// No argument owns this short alias. Only reported in strict mode.
    #[error("unknown argument `-{0}`")]
    UnknownAlias(char),

    /// No argument has this name. Only reported in strict mode.
    #[error("unknown argument `--{0}`")]
    UnknownName(String),
}

/// Defines the result of a call to [`ArgParser::parse`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Outcome {
    /// The command line has been scanned. Contains the errors of the offending tokens, if any.
    Parsed(Vec<ParseError>),

    /// A help token was found. No value has been assigned, the caller is expected to display
    /// the help and terminate.
    HelpRequested(Help),

    /// The parser already ran, the input has been ignored.
    AlreadyParsed,
}

impl Outcome {
    /// Get the errors reported by the scan.
    pub fn errors(&self) -> &[ParseError] {
        match self {
            Outcome::Parsed(errors) => errors.as_slice(),
            _ => &[],
        }
    }

    /// Check if the help was requested.
    #[inline(always)]
    pub fn is_help(&self) -> bool {
        matches!(self, Outcome::HelpRequested(_))
    }
}

/// Parser settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Report unknown names and aliases instead of ignoring them.
    pub strict: bool,

    /// Description of the help flag declared by the parser.
    pub help_text: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            strict: false,
            help_text: DEFAULT_HELP_TEXT.to_owned(),
        }
    }
}

/// Defines a parser that assigns the values of the arguments declared in a [`Registry`].
///
/// Parsing happens at most once; later calls are no-ops.
#[derive(Clone, Debug, Default)]
pub struct ArgParser {
    registry: Registry,
    settings: Settings,
    parsed: bool,
}

impl ArgParser {
    /// Create a parser over the given registry.
    pub fn new(registry: Registry) -> Self {
        ArgParser {
            registry,
            settings: Settings::default(),
            parsed: false,
        }
    }

    /// Report unknown names and aliases as errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.settings.strict = strict;
        self
    }

    /// Set the description of the help flag declared by the parser.
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.settings.help_text = text.into();
        self
    }

    /// Get the settings.
    #[inline(always)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the registry holding the declared arguments and their values.
    #[inline(always)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the registry for further declarations.
    #[inline(always)]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Take back the registry.
    pub fn into_registry(self) -> Registry {
        self.registry
    }

    /// Check if the parser already ran.
    #[inline(always)]
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Parse the command line input, without the program name, and assign the values of the
    /// declared arguments.
    ///
    /// Arguments are matched as `--name`, `-x` or clusters of flags like `-abc`. The value of an
    /// argument is the raw argument that follows it; flags ignore it. Anything that does not
    /// start with a hyphen is skipped. If `--help` or `-h` appears anywhere, nothing is
    /// assigned and the rendered help is returned instead.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &[S]) -> Outcome {
        if self.parsed {
            tracing::debug!("arguments already parsed, ignoring input");
            return Outcome::AlreadyParsed;
        }

        self.ensure_help();
        self.parsed = true;

        if argv.iter().any(|arg| Token::is_help(arg.as_ref())) {
            tracing::debug!("help requested");
            return Outcome::HelpRequested(self.registry.help());
        }

        let mut errors = Vec::new();
        let mut tokens = Tokens::new(argv);

        while let Some(token) = tokens.next() {
            let value = tokens.value();

            match token {
                Token::Value(arg) => {
                    tracing::trace!(arg, "skipping non-option argument");
                }

                Token::Long(name) => {
                    if self.registry.contains(name) {
                        let res = self.assign(name, value);
                        record(res, &mut errors);
                    } else {
                        self.unknown(ParseError::UnknownName(name.to_owned()), &mut errors);
                    }
                }

                Token::Short(short) => self.assign_short(short, value, &mut errors),

                // Every flag of the cluster sees the same value candidate.
                Token::Cluster(shorts) => {
                    for short in shorts.chars() {
                        self.assign_short(short, value, &mut errors);
                    }
                }
            }
        }

        Outcome::Parsed(errors)
    }

    fn ensure_help(&mut self) {
        if self.registry.contains(HELP_NAME) {
            return;
        }

        if let Some(owner) = self.registry.resolve_short(HELP_ALIAS) {
            tracing::debug!(owner, "help alias taken, not declaring help flag");
            return;
        }

        // Neither the name nor the alias is taken at this point.
        if let Err(err) =
            self.registry
                .declare_flag(HELP_NAME, HELP_ALIAS, &self.settings.help_text, None)
        {
            tracing::warn!(%err, "cannot declare help flag");
        }
    }

    fn assign_short(&mut self, short: char, value: Option<&str>, errors: &mut Vec<ParseError>) {
        let mut buf = [0u8; 4];
        let alias = short.encode_utf8(&mut buf);

        match self.registry.resolve_short(alias).map(ToOwned::to_owned) {
            Some(name) => {
                let res = self.assign(&name, value);
                record(res, errors);
            }
            None => self.unknown(ParseError::UnknownAlias(short), errors),
        }
    }

    fn assign(&mut self, name: &str, value: Option<&str>) -> Result<(), ParseError> {
        let Some(expected) = self.registry.descriptor(name).map(|d| d.kind()) else {
            return Err(ParseError::UnknownName(name.to_owned()));
        };

        let Some(slot) = self.registry.value_mut(name) else {
            return Err(ParseError::UnknownName(name.to_owned()));
        };

        if slot.kind() != expected {
            return Err(ParseError::UnsupportedAssignmentType {
                name: name.to_owned(),
                expected,
                found: slot.kind(),
            });
        }

        let new = match expected {
            Kind::Flag => Value::Flag(true),

            Kind::String => Value::String(require(name, value)?.to_owned()),

            Kind::Integer => {
                let raw = require(name, value)?;
                let n = raw
                    .parse::<i64>()
                    .map_err(|_| ParseError::InvalidIntegerLiteral {
                        name: name.to_owned(),
                        value: raw.to_owned(),
                    })?;

                Value::Integer(n)
            }

            Kind::Float => {
                let raw = require(name, value)?;
                let x = raw
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidFloatLiteral {
                        name: name.to_owned(),
                        value: raw.to_owned(),
                    })?;

                Value::Float(x)
            }
        };

        tracing::trace!(arg = name, value = %new, "assigned argument");
        *slot = new;

        Ok(())
    }

    fn unknown(&self, err: ParseError, errors: &mut Vec<ParseError>) {
        if self.settings.strict {
            tracing::warn!(%err, "rejected argument");
            errors.push(err);
        } else {
            tracing::debug!(%err, "ignoring argument");
        }
    }
}

impl From<Registry> for ArgParser {
    fn from(registry: Registry) -> Self {
        ArgParser::new(registry)
    }
}

fn record(res: Result<(), ParseError>, errors: &mut Vec<ParseError>) {
    if let Err(err) = res {
        tracing::warn!(%err, "rejected argument");
        errors.push(err);
    }
}

fn require<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ParseError> {
    value.ok_or_else(|| ParseError::MissingValue(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use googletest::prelude::*;

    use super::*;

    fn parser() -> ArgParser {
        let mut reg = Registry::new();
        reg.declare_string("host", "h2", "localhost", "host help", None)
            .unwrap();
        reg.declare_int("port", "p", 8080, "port help", None)
            .unwrap();
        reg.declare_float("ratio", "r", 0.5, "ratio help", Some("Tuning"))
            .unwrap();
        reg.declare_flag("verbose", "v", "verbose help", Some("Output"))
            .unwrap();
        reg.declare_flag("all", "a", "all help", Some("Output"))
            .unwrap();
        reg.declare_flag("bare", "b", "bare help", Some("Output"))
            .unwrap();
        ArgParser::new(reg)
    }

    #[test]
    fn it_should_assign_string_by_name() {
        let mut parser = parser();

        let outcome = parser.parse(&["--host", "example.com"]);

        assert_that!(outcome, eq(&Outcome::Parsed(Vec::new())));
        assert_that!(parser.registry().get_str("host"), eq(Some("example.com")));
    }

    #[test]
    fn it_should_assign_integer_by_alias() {
        let mut parser = parser();

        let outcome = parser.parse(&["-p", "9090"]);

        assert_that!(outcome.errors().is_empty(), eq(true));
        assert_that!(parser.registry().get_int("port"), eq(Some(9090)));
    }

    #[test]
    fn it_should_keep_integer_on_invalid_literal() {
        let mut parser = parser();

        let outcome = parser.parse(&["-p", "abc", "-v"]);

        assert_that!(
            outcome.errors(),
            eq(&[ParseError::InvalidIntegerLiteral {
                name: "port".into(),
                value: "abc".into(),
            }])
        );
        assert_that!(parser.registry().get_int("port"), eq(Some(8080)));
        assert_that!(parser.registry().get_flag("verbose"), eq(Some(true)));
    }

    #[test]
    fn it_should_assign_float() {
        let mut parser = parser();

        let outcome = parser.parse(&["--ratio", "0.25"]);

        assert_that!(outcome.errors().is_empty(), eq(true));
        assert_that!(parser.registry().get_float("ratio"), eq(Some(0.25)));
    }

    #[test]
    fn it_should_keep_float_on_invalid_literal() {
        let mut parser = parser();

        let outcome = parser.parse(&["-r", "half"]);

        assert_that!(
            outcome.errors(),
            eq(&[ParseError::InvalidFloatLiteral {
                name: "ratio".into(),
                value: "half".into(),
            }])
        );
        assert_that!(parser.registry().get_float("ratio"), eq(Some(0.5)));
    }

    #[test]
    fn it_should_set_flag() {
        let mut parser = parser();

        let _ = parser.parse(&["-v"]);

        assert_that!(parser.registry().get_flag("verbose"), eq(Some(true)));
        assert_that!(parser.registry().get_flag("all"), eq(Some(false)));
    }

    #[test]
    fn it_should_ignore_the_value_candidate_of_a_flag() {
        let mut parser = parser();

        let outcome = parser.parse(&["--verbose", "--port", "1"]);

        assert_that!(outcome.errors().is_empty(), eq(true));
        assert_that!(parser.registry().get_flag("verbose"), eq(Some(true)));
        assert_that!(parser.registry().get_int("port"), eq(Some(1)));
    }

    #[test]
    fn it_should_set_every_flag_of_a_cluster() {
        let mut parser = parser();

        let _ = parser.parse(&["-ab"]);

        assert_that!(parser.registry().get_flag("all"), eq(Some(true)));
        assert_that!(parser.registry().get_flag("bare"), eq(Some(true)));
        assert_that!(parser.registry().get_flag("verbose"), eq(Some(false)));
    }

    #[test]
    fn it_should_share_the_value_candidate_inside_a_cluster() {
        let mut parser = parser();

        let _ = parser.parse(&["-vp", "7"]);

        assert_that!(parser.registry().get_flag("verbose"), eq(Some(true)));
        assert_that!(parser.registry().get_int("port"), eq(Some(7)));
    }

    #[test]
    fn it_should_report_missing_value() {
        let mut parser = parser();

        let outcome = parser.parse(&["-v", "-p"]);

        assert_that!(
            outcome.errors(),
            eq(&[ParseError::MissingValue("port".into())])
        );
        assert_that!(parser.registry().get_int("port"), eq(Some(8080)));
        assert_that!(parser.registry().get_flag("verbose"), eq(Some(true)));
    }

    #[test]
    fn it_should_skip_non_option_arguments() {
        let mut parser = parser();

        let outcome = parser.parse(&["file.txt", "--port", "1", "other"]);

        assert_that!(outcome.errors().is_empty(), eq(true));
        assert_that!(parser.registry().get_int("port"), eq(Some(1)));
    }

    #[test]
    fn it_should_accept_negative_numbers_as_values() {
        let mut parser = parser();

        let outcome = parser.parse(&["--port", "-42"]);

        assert_that!(outcome.errors().is_empty(), eq(true));
        assert_that!(parser.registry().get_int("port"), eq(Some(-42)));
    }

    #[test]
    fn it_should_ignore_unknown_arguments_by_default() {
        let mut parser = parser();

        let outcome = parser.parse(&["-x", "--nope", "-vx"]);

        assert_that!(outcome.errors().is_empty(), eq(true));
        assert_that!(parser.registry().get_flag("verbose"), eq(Some(true)));
        assert_that!(parser.registry().contains("nope"), eq(false));
    }

    #[test]
    fn it_should_report_unknown_arguments_in_strict_mode() {
        let mut parser = parser().strict(true);

        let outcome = parser.parse(&["-x", "--nope"]);

        assert_that!(
            outcome.errors(),
            eq(&[
                ParseError::UnknownAlias('x'),
                ParseError::UnknownName("nope".into()),
            ])
        );
    }

    #[test]
    fn it_should_parse_only_once() {
        let mut parser = parser();

        let _ = parser.parse(&["-p", "1"]);
        let outcome = parser.parse(&["-p", "2", "-v"]);

        assert_that!(outcome, eq(&Outcome::AlreadyParsed));
        assert_that!(parser.is_parsed(), eq(true));
        assert_that!(parser.registry().get_int("port"), eq(Some(1)));
        assert_that!(parser.registry().get_flag("verbose"), eq(Some(false)));
    }

    #[test]
    fn it_should_declare_help_flag() {
        let mut parser = parser();

        let _ = parser.parse(&[] as &[&str]);

        assert_that!(parser.registry().resolve_short("h"), eq(Some("help")));
        assert_that!(parser.registry().get_flag("help"), eq(Some(false)));
    }

    #[test]
    fn it_should_not_declare_help_when_alias_taken() {
        let mut reg = Registry::new();
        reg.declare_string("hostname", "h", "", "", None).unwrap();
        let mut parser = ArgParser::new(reg);

        let outcome = parser.parse(&["-h"]);

        assert_that!(outcome.is_help(), eq(true));
        assert_that!(parser.registry().contains("help"), eq(false));
        assert_that!(parser.registry().descriptors().len(), eq(1));
        assert_that!(parser.registry().resolve_short("h"), eq(Some("hostname")));
    }

    #[test]
    fn it_should_report_contract_violation() {
        let mut parser = parser();
        if let Some(slot) = parser.registry_mut().value_mut("port") {
            *slot = Value::Flag(false);
        }

        let outcome = parser.parse(&["-p", "2"]);

        assert_that!(
            outcome.errors(),
            eq(&[ParseError::UnsupportedAssignmentType {
                name: "port".into(),
                expected: Kind::Integer,
                found: Kind::Flag,
            }])
        );
        assert_that!(parser.registry().value("port"), eq(Some(&Value::Flag(false))));
    }

    #[test]
    fn it_should_keep_user_declared_help() {
        let mut reg = Registry::new();
        reg.declare_flag("help", "?", "Show usage", None).unwrap();
        let mut parser = ArgParser::new(reg);

        let _ = parser.parse(&["-v"]);

        assert_that!(parser.registry().descriptors().len(), eq(1));
        assert_that!(parser.registry().resolve_short("h"), eq(None));
    }

    #[test]
    fn it_should_request_help_without_assigning() {
        let mut parser = parser().help_text("Show this text");

        let outcome = parser.parse(&["-p", "1", "-v", "--help"]);

        let Outcome::HelpRequested(help) = outcome else {
            panic!("help not requested");
        };

        let text = help.to_string();
        for name in ["host", "-h2", "port", "-p", "ratio", "-r", "verbose", "-v", "all", "bare"] {
            assert_that!(text.as_str(), contains_substring(name));
        }
        assert_that!(text.as_str(), contains_substring("Show this text"));

        assert_that!(parser.registry().get_int("port"), eq(Some(8080)));
        assert_that!(parser.registry().get_flag("verbose"), eq(Some(false)));
        assert_that!(parser.registry().get_flag("help"), eq(Some(false)));
    }

    #[test]
    fn it_should_request_help_on_short_trigger() {
        let mut parser = parser();

        let outcome = parser.parse(&["file", "-h"]);

        assert_that!(outcome, matches_pattern!(&Outcome::HelpRequested(_)));
    }

    #[test]
    fn it_should_render_groups_in_declaration_order() {
        let mut parser = parser();

        let Outcome::HelpRequested(help) = parser.parse(&["--help"]) else {
            panic!("help not requested");
        };

        let headers: Vec<&str> = help
            .lines()
            .iter()
            .map(String::as_str)
            .filter(|l| !l.is_empty() && !l.starts_with(' '))
            .collect();

        assert_that!(headers, eq(&alloc::vec!["Usage", "Tuning", "Output"]));
    }
}
