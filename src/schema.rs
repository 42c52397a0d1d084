//! Declarative command schema
//!
//! Pure data describing a command tree. Constructors encode the defaults
//! explicitly: positional arguments and option parameters are required unless
//! marked optional, options themselves are optional unless marked required.

use crate::action::Action;

#[cfg(feature = "manifest")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "manifest")]
fn default_true() -> bool {
    true
}

/// A single positional parameter
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub struct CommandArgument {
    /// Argument name, unique within its command
    pub name: String,

    /// Whether the argument must be given
    #[cfg_attr(feature = "manifest", serde(default = "default_true"))]
    pub required: bool,

    /// Help text
    #[cfg_attr(feature = "manifest", serde(default))]
    pub description: Option<String>,
}

impl CommandArgument {
    /// Required argument named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            description: None,
        }
    }

    /// Make the argument optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the help text
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// How a sub-command is attached to its parent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub struct NestedOptions {
    /// Leave the sub-command out of the parent's help listing
    #[cfg_attr(feature = "manifest", serde(default))]
    pub hidden: bool,
}

/// Identity and shape of one command node
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub struct CommandSetting {
    /// Command name, unique among its siblings
    pub name: String,

    /// Alternate name the command also matches
    #[cfg_attr(feature = "manifest", serde(default))]
    pub alias: Option<String>,

    /// Positional arguments in binding order
    #[cfg_attr(feature = "manifest", serde(default))]
    pub args: Vec<CommandArgument>,

    /// Attachment options, used when this command is a sub-command
    #[cfg_attr(feature = "manifest", serde(default))]
    pub nested: NestedOptions,
}

impl CommandSetting {
    /// Command named `name` with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            args: Vec::new(),
            nested: NestedOptions::default(),
        }
    }

    /// Set the alias
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Append a positional argument
    pub fn arg(mut self, arg: CommandArgument) -> Self {
        self.args.push(arg);
        self
    }

    /// Set the attachment options
    pub fn nested(mut self, nested: NestedOptions) -> Self {
        self.nested = nested;
        self
    }
}

/// Value slot of a flag
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub struct OptionArgument {
    /// Placeholder shown in help
    pub name: String,

    /// `<name>` when true, `[name]` otherwise
    #[cfg_attr(feature = "manifest", serde(default = "default_true"))]
    pub required: bool,

    /// Collect multiple values
    #[cfg_attr(feature = "manifest", serde(default))]
    pub variadic: bool,
}

impl OptionArgument {
    /// Required single value named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            variadic: false,
        }
    }

    /// Allow the flag without a value
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Collect multiple values
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// A flag definition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub struct CommandOption {
    /// Long form, without dashes
    pub name: String,

    /// Single letter form
    #[cfg_attr(feature = "manifest", serde(default))]
    pub short_name: Option<char>,

    /// Value slot; a boolean flag when absent
    #[cfg_attr(feature = "manifest", serde(default))]
    pub param: Option<OptionArgument>,

    /// Fail parsing when the flag is absent and has no default
    #[cfg_attr(feature = "manifest", serde(default))]
    pub required: bool,

    /// Help text
    #[cfg_attr(feature = "manifest", serde(default))]
    pub description: Option<String>,

    /// Value used when the flag is absent
    #[cfg_attr(feature = "manifest", serde(default))]
    pub default_value: Option<String>,
}

impl CommandOption {
    /// Optional boolean flag `--name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            param: None,
            required: false,
            description: None,
            default_value: None,
        }
    }

    /// Set the single letter form
    pub fn short(mut self, short: char) -> Self {
        self.short_name = Some(short);
        self
    }

    /// Give the flag a value slot
    pub fn param(mut self, param: OptionArgument) -> Self {
        self.param = Some(param);
        self
    }

    /// Make the flag mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the help text
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the value used when the flag is absent
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A command, its handler and its sub-commands
#[derive(Debug, Clone)]
pub struct CommandSchema {
    /// Identity and positional arguments
    pub command: CommandSetting,

    /// Help text
    pub description: Option<String>,

    /// Flags, in help order
    pub options: Vec<CommandOption>,

    /// Handler run when this command is the deepest match
    pub action: Action,

    /// Sub-commands, in help order
    pub sub_commands: Vec<CommandSchema>,
}

impl CommandSchema {
    /// Schema for `command` handled by `action`
    pub fn new(command: CommandSetting, action: Action) -> Self {
        Self {
            command,
            description: None,
            options: Vec::new(),
            action,
            sub_commands: Vec::new(),
        }
    }

    /// Set the help text
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a flag
    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Append a sub-command
    pub fn sub_command(mut self, schema: CommandSchema) -> Self {
        self.sub_commands.push(schema);
        self
    }
}
