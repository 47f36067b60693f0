//! Declared arguments and their typed values.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::any::Any;
use core::fmt;

/// Group under which arguments are listed when none is given.
pub const DEFAULT_GROUP: &str = "Usage";

/// Defines the type of an argument. It is fixed at declaration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Kind {
    /// Free text, stored verbatim.
    String,

    /// Base-10 signed integer.
    Integer,

    /// Floating-point number.
    Float,

    /// Boolean switch, set to `true` when present.
    Flag,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Flag => "flag",
        };

        f.write_str(name)
    }
}

/// Current value of an argument.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    /// A string value.
    String(String),

    /// An integer value.
    Integer(i64),

    /// A floating-point value.
    Float(f64),

    /// A boolean flag.
    Flag(bool),
}

impl Value {
    /// Get the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Flag(_) => Kind::Flag,
        }
    }

    /// Get the string if this is a string value.
    #[inline(always)]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the integer if this is an integer value.
    #[inline(always)]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the number if this is a floating-point value.
    #[inline(always)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Get the state if this is a flag.
    #[inline(always)]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Build a value from a dynamically typed default.
    ///
    /// Supported types are `bool`, `i64`, `i32`, `isize`, `f64`, `f32`, `String` and
    /// `&'static str`. Any other type yields `None`.
    pub fn from_any(value: &dyn Any) -> Option<Self> {
        if let Some(b) = value.downcast_ref::<bool>() {
            return Some(Value::Flag(*b));
        }

        if let Some(n) = value.downcast_ref::<i64>() {
            return Some(Value::Integer(*n));
        }

        if let Some(n) = value.downcast_ref::<i32>() {
            return Some(Value::Integer(i64::from(*n)));
        }

        if let Some(n) = value.downcast_ref::<isize>() {
            return i64::try_from(*n).ok().map(Value::Integer);
        }

        if let Some(x) = value.downcast_ref::<f64>() {
            return Some(Value::Float(*x));
        }

        if let Some(x) = value.downcast_ref::<f32>() {
            return Some(Value::Float(f64::from(*x)));
        }

        if let Some(s) = value.downcast_ref::<String>() {
            return Some(Value::String(s.clone()));
        }

        if let Some(s) = value.downcast_ref::<&'static str>() {
            return Some(Value::String((*s).to_owned()));
        }

        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Flag(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

/// Describes one declared argument.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Descriptor {
    name: String,
    short: Option<String>,
    help: String,
    group: String,
    default: Value,
}

impl Descriptor {
    /// Create a new descriptor. An empty `short` means no alias, an empty or missing `group`
    /// means [`DEFAULT_GROUP`].
    pub fn new(name: &str, short: &str, help: &str, group: Option<&str>, default: Value) -> Self {
        let short = (!short.is_empty()).then(|| short.to_owned());

        let group = match group {
            Some(group) if !group.is_empty() => group,
            _ => DEFAULT_GROUP,
        };

        Descriptor {
            name: name.to_owned(),
            short,
            help: help.to_owned(),
            group: group.to_owned(),
            default,
        }
    }

    /// Full name, used as `--name`.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short alias, used as `-x`.
    #[inline(always)]
    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// Help text.
    #[inline(always)]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Help group.
    #[inline(always)]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Kind, derived from the default value.
    #[inline(always)]
    pub fn kind(&self) -> Kind {
        self.default.kind()
    }

    /// Default value.
    #[inline(always)]
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}
