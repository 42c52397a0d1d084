//! Flag signatures and argument templates
//!
//! Renders schema descriptors into the usage notation shown in help text
//! (`<name>`, `[name]`, `-s, --long <value...>`) and derives how many values
//! clap should accept for each shape.

use crate::schema::{CommandArgument, CommandOption};
use clap::builder::ValueRange;
use std::fmt;

/// Usage template of a positional argument
pub fn argument_template(arg: &CommandArgument) -> String {
    if arg.required {
        format!("<{}>", arg.name)
    } else {
        format!("[{}]", arg.name)
    }
}

/// Value placeholder of a flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePlaceholder {
    /// Display name
    pub name: String,
    /// Flag requires its value
    pub required: bool,
    /// Flag collects multiple values
    pub variadic: bool,
}

impl fmt::Display for ValuePlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.variadic { "..." } else { "" };
        if self.required {
            write!(f, "<{}{}>", self.name, suffix)
        } else {
            write!(f, "[{}{}]", self.name, suffix)
        }
    }
}

/// Structured form of a flag signature such as `-o, --out [path...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSignature {
    /// Single letter form
    pub short: Option<char>,
    /// Long form, without dashes
    pub long: String,
    /// Value slot, `None` for boolean flags
    pub value: Option<ValuePlaceholder>,
}

impl FlagSignature {
    /// Signature of a declared option
    pub fn from_option(option: &CommandOption) -> Self {
        Self {
            short: option.short_name,
            long: option.name.clone(),
            value: option.param.as_ref().map(|param| ValuePlaceholder {
                name: param.name.clone(),
                required: param.required,
                variadic: param.variadic,
            }),
        }
    }

    /// Whether the flag takes no value
    pub fn is_boolean(&self) -> bool {
        self.value.is_none()
    }

    /// Whether the flag collects multiple values
    pub fn is_variadic(&self) -> bool {
        self.value.as_ref().is_some_and(|value| value.variadic)
    }

    /// Number of values accepted per occurrence
    pub fn value_range(&self) -> ValueRange {
        match &self.value {
            None => ValueRange::EMPTY,
            Some(ValuePlaceholder { required: true, variadic: false, .. }) => ValueRange::SINGLE,
            Some(ValuePlaceholder { required: false, variadic: false, .. }) => ValueRange::new(0..=1),
            Some(ValuePlaceholder { required: true, variadic: true, .. }) => ValueRange::new(1..),
            Some(ValuePlaceholder { required: false, variadic: true, .. }) => ValueRange::new(0..),
        }
    }
}

impl fmt::Display for FlagSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(short) = self.short {
            write!(f, "-{}, ", short)?;
        }
        write!(f, "--{}", self.long)?;
        if let Some(value) = &self.value {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}
