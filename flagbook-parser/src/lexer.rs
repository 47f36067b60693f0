//! A lexer for classifying tokens from a command line.

/// Long form of the help trigger.
pub const HELP_LONG: &str = "--help";

/// Short form of the help trigger.
pub const HELP_SHORT: &str = "-h";

/// Defines a `Token` that has been read from the command line. Only the identifier is stored,
/// not the hyphens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token<'a> {
    /// A long option (e.g. --verbose).
    Long(&'a str),

    /// A short option (e.g. -v).
    Short(char),

    /// Several short options in a single token (e.g. -abc).
    Cluster(&'a str),

    /// Everything else. Values are not collected by the parser.
    Value(&'a str),
}

impl<'a> Token<'a> {
    /// Classify a single command line argument.
    pub fn classify(input: &'a str) -> Self {
        if let Some(name) = input.strip_prefix("--") {
            return Token::Long(name);
        }

        let Some(shorts) = input.strip_prefix('-') else {
            return Token::Value(input);
        };

        let mut chars = shorts.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Token::Value(input),
            (Some(c), None) => Token::Short(c),
            (Some(_), Some(_)) => Token::Cluster(shorts),
        }
    }

    /// Evaluate if the token string triggers the help.
    #[inline(always)]
    pub fn is_help(input: &str) -> bool {
        input == HELP_LONG || input == HELP_SHORT
    }
}

/// Defines a `Tokens` stream that classifies the command line input one argument at a time.
///
/// It acts like a forward iterator, and keeps access to the raw argument that follows the last
/// returned token.
#[derive(Clone, Debug)]
pub struct Tokens<'a, S> {
    argv: &'a [S],
    cursor: usize,
}

impl<'a, S: AsRef<str>> Tokens<'a, S> {
    /// Create a new lexer from the command line input.
    pub fn new(argv: &'a [S]) -> Self {
        Tokens { argv, cursor: 0 }
    }

    /// Retrieve the raw argument following the last returned token, if any. This is the value
    /// candidate of that token.
    #[inline(always)]
    pub fn value(&self) -> Option<&'a str> {
        self.argv.get(self.cursor).map(AsRef::as_ref)
    }
}

impl<'a, S: AsRef<str>> Iterator for Tokens<'a, S> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let arg = self.argv.get(self.cursor)?.as_ref();
        self.cursor += 1;

        Some(Token::classify(arg))
    }
}
