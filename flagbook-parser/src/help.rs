//! Help text grouped by category.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::arg::{DEFAULT_GROUP, Descriptor};

/// Width of the name column.
pub const NAME_WIDTH: usize = 25;

/// Width of the short alias column.
pub const SHORT_WIDTH: usize = 4;

/// Format the help line of a single argument.
pub fn format_line(desc: &Descriptor) -> String {
    let short = desc.short().map(|s| format!("-{s}")).unwrap_or_default();

    format!(
        "    {:<name_width$} {:<short_width$} {}",
        desc.name(),
        short,
        desc.help(),
        name_width = NAME_WIDTH,
        short_width = SHORT_WIDTH,
    )
}

/// A named list of help lines.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Group {
    name: String,
    lines: Vec<String>,
}

impl Group {
    /// Group name, printed as header.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Formatted lines, in declaration order.
    #[inline(always)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Help listings of all groups, in the order groups were first used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Groups {
    groups: Vec<Group>,
}

impl Groups {
    /// Append a line to the given group, creating it if needed.
    pub fn push(&mut self, name: &str, line: String) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.name == name) {
            group.lines.push(line);
            return;
        }

        self.groups.push(Group {
            name: name.to_owned(),
            lines: alloc::vec![line],
        });
    }

    /// Look up a group by name.
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Iterate over groups.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }
}

/// Rendered help text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Help {
    lines: Vec<String>,
}

impl Help {
    /// Rendered lines, without line terminators.
    #[inline(always)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take the rendered lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for Help {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

/// Render the help text.
///
/// The about message comes first when set. The `Usage` group is always rendered, even if empty,
/// and other groups follow in the order they were first declared. Every group ends with a blank
/// line.
pub fn render(groups: &Groups, about: Option<&str>) -> Help {
    let mut lines = Vec::new();

    if let Some(about) = about.filter(|s| !s.is_empty()) {
        lines.push(about.to_owned());
        lines.push(String::new());
    }

    lines.push(DEFAULT_GROUP.to_owned());
    if let Some(usage) = groups.get(DEFAULT_GROUP) {
        lines.extend(usage.lines.iter().cloned());
    }
    lines.push(String::new());

    for group in groups.iter().filter(|g| g.name != DEFAULT_GROUP) {
        lines.push(group.name.clone());
        lines.extend(group.lines.iter().cloned());
        lines.push(String::new());
    }

    Help { lines }
}
