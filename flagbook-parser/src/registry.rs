//! A registry of declared arguments and their current values.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::arg::{Descriptor, Value};
use crate::help::{self, Groups, Help};

/// Defines the possible errors that may occur when declaring an argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum DeclarationError {
    /// The argument name is empty.
    #[error("argument name cannot be empty")]
    EmptyName,

    /// Another argument already uses this name.
    #[error("argument `{0}` already exists")]
    DuplicateName(String),

    /// Another argument already uses this short alias.
    #[error("short `-{short}` already in use by `{owner}`")]
    DuplicateShort {
        /// The rejected alias.
        short: String,

        /// The argument owning the alias.
        owner: String,
    },

    /// The default value does not map to any supported kind.
    #[error("unsupported default value type for argument `{0}`")]
    UnsupportedKind(String),
}

/// Defines the set of declared arguments, the alias table and the value store.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    about: Option<String>,
    descriptors: Vec<Descriptor>,
    values: BTreeMap<String, Value>,
    aliases: BTreeMap<String, String>,
    groups: Groups,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message printed above the help text.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.set_about(about);
        self
    }

    /// Set the message printed above the help text.
    pub fn set_about(&mut self, about: impl Into<String>) {
        self.about = Some(about.into());
    }

    /// Get the message printed above the help text.
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Declare an argument.
    ///
    /// On success the default value is stored, the alias registered and the help line appended
    /// to the argument group. On error the registry is left untouched.
    pub fn declare(&mut self, desc: Descriptor) -> Result<(), DeclarationError> {
        if desc.name().is_empty() {
            return Err(DeclarationError::EmptyName);
        }

        if self.values.contains_key(desc.name()) {
            return Err(DeclarationError::DuplicateName(desc.name().to_owned()));
        }

        if let Some(short) = desc.short() {
            if let Some(owner) = self.aliases.get(short) {
                return Err(DeclarationError::DuplicateShort {
                    short: short.to_owned(),
                    owner: owner.clone(),
                });
            }

            self.aliases.insert(short.to_owned(), desc.name().to_owned());
        }

        tracing::trace!(arg = desc.name(), kind = %desc.kind(), "declared argument");

        self.values
            .insert(desc.name().to_owned(), desc.default_value().clone());
        self.groups.push(desc.group(), help::format_line(&desc));
        self.descriptors.push(desc);

        Ok(())
    }

    /// Declare a boolean flag, `false` by default.
    pub fn declare_flag(
        &mut self,
        name: &str,
        short: &str,
        help: &str,
        group: Option<&str>,
    ) -> Result<(), DeclarationError> {
        self.declare(Descriptor::new(name, short, help, group, Value::Flag(false)))
    }

    /// Declare a string argument.
    pub fn declare_string(
        &mut self,
        name: &str,
        short: &str,
        default: impl Into<String>,
        help: &str,
        group: Option<&str>,
    ) -> Result<(), DeclarationError> {
        let default = Value::String(default.into());
        self.declare(Descriptor::new(name, short, help, group, default))
    }

    /// Declare an integer argument.
    pub fn declare_int(
        &mut self,
        name: &str,
        short: &str,
        default: i64,
        help: &str,
        group: Option<&str>,
    ) -> Result<(), DeclarationError> {
        self.declare(Descriptor::new(name, short, help, group, Value::Integer(default)))
    }

    /// Declare a floating-point argument.
    pub fn declare_float(
        &mut self,
        name: &str,
        short: &str,
        default: f64,
        help: &str,
        group: Option<&str>,
    ) -> Result<(), DeclarationError> {
        self.declare(Descriptor::new(name, short, help, group, Value::Float(default)))
    }

    /// Declare an argument whose kind is inferred from the type of its default value.
    ///
    /// See [`Value::from_any`] for the supported types.
    pub fn declare_any(
        &mut self,
        name: &str,
        short: &str,
        default: &dyn Any,
        help: &str,
        group: Option<&str>,
    ) -> Result<(), DeclarationError> {
        let Some(default) = Value::from_any(default) else {
            return Err(DeclarationError::UnsupportedKind(name.to_owned()));
        };

        self.declare(Descriptor::new(name, short, help, group, default))
    }

    /// Get the full name owning the given short alias.
    #[inline(always)]
    pub fn resolve_short(&self, short: &str) -> Option<&str> {
        self.aliases.get(short).map(String::as_str)
    }

    /// Check if an argument with the given name exists.
    #[inline(always)]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Get the descriptor of an argument.
    pub fn descriptor(&self, name: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    /// Get all descriptors, in declaration order.
    #[inline(always)]
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Get the current value of an argument.
    #[inline(always)]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Iterate over all values, sorted by name.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get the value of a string argument.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Get the value of an integer argument.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_integer)
    }

    /// Get the value of a floating-point argument.
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(Value::as_float)
    }

    /// Get the state of a flag.
    pub fn get_flag(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_flag)
    }

    /// Get the help listings.
    #[inline(always)]
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Render the help text.
    pub fn help(&self) -> Help {
        help::render(&self.groups, self.about())
    }

    pub(crate) fn value_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }
}
