//! Command builder - converts a CommandSchema tree into clap commands

use crate::error::{CommandError, CommandResult};
use crate::node::{ArgumentBinding, CommandNode, OptionBinding};
use crate::schema::{CommandArgument, CommandOption, CommandSchema};
use crate::signature::{argument_template, FlagSignature};
use clap::{Arg, ArgAction, Command};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Customization hook run once per built node
///
/// Receives the node's name and its fully wired command, and returns the
/// command to keep. It runs after all declarative wiring and before
/// sub-commands are attached, so anything the schema cannot express (value
/// parsers, groups, extra flags) can be added here.
pub type CommandHook<'h> = dyn Fn(&str, Command) -> Command + 'h;

/// Build a command tree from `schema`, running `hook` on every node
pub fn build<'h>(schema: &CommandSchema, hook: Option<&'h CommandHook<'h>>) -> CommandResult<CommandNode> {
    CommandBuilder { hook }.build(schema)
}

/// Builds [`CommandNode`] trees from declarative schemas
#[derive(Clone, Copy, Default)]
pub struct CommandBuilder<'h> {
    hook: Option<&'h CommandHook<'h>>,
}

impl<'h> CommandBuilder<'h> {
    /// Builder without a customization hook
    pub fn new() -> Self {
        Self { hook: None }
    }

    /// Builder running `hook` on every node
    pub fn with_hook(hook: &'h CommandHook<'h>) -> Self {
        Self { hook: Some(hook) }
    }

    /// Build the node for `schema` and, recursively, its sub-commands
    pub fn build(&self, schema: &CommandSchema) -> CommandResult<CommandNode> {
        let name = schema.command.name.as_str();
        validate_command_name(name)?;
        validate_arguments(name, &schema.command.args, &schema.options)?;

        let mut command = Command::new(name.to_string());
        if let Some(alias) = &schema.command.alias {
            validate_command_name(alias)?;
            command = command.alias(alias.clone());
        }

        // Declared arguments are never global: a flag belongs to the command
        // that declares it and is only recognised after that command is
        // selected. Unexpected positional tokens stay a parse error.

        let mut arguments = Vec::with_capacity(schema.command.args.len());
        for arg in &schema.command.args {
            command = command.arg(Self::build_positional(arg));
            arguments.push(ArgumentBinding {
                id: arg.name.clone(),
                template: argument_template(arg),
            });
        }

        if let Some(description) = &schema.description {
            command = command.about(description.clone());
        }

        let mut options = Vec::with_capacity(schema.options.len());
        for option in &schema.options {
            let signature = FlagSignature::from_option(option);
            trace!(command = %name, signature = %signature, "adding option");
            command = command.arg(Self::build_option(option, &signature));
            options.push(OptionBinding {
                required: option.required && !has_default(option),
                signature,
                default_value: option.default_value.clone(),
            });
        }

        if let Some(hook) = self.hook {
            command = hook(name, command);
        }

        debug!(
            command = %name,
            args = arguments.len(),
            options = options.len(),
            sub_commands = schema.sub_commands.len(),
            "built command node"
        );

        let mut node = CommandNode {
            command,
            action: Some(schema.action.clone()),
            arguments,
            options,
            children: Vec::new(),
        };

        for sub_schema in &schema.sub_commands {
            let child = self.build(sub_schema)?;
            node = node.add_command(child, sub_schema.command.nested.clone())?;
        }

        Ok(node)
    }

    /// Build a positional argument
    fn build_positional(arg: &CommandArgument) -> Arg {
        let mut positional = Arg::new(arg.name.clone())
            .value_name(arg.name.clone())
            .action(ArgAction::Set)
            .required(arg.required);

        if let Some(description) = &arg.description {
            positional = positional.help(description.clone());
        }

        positional
    }

    /// Build a flag from its option and rendered signature
    fn build_option(option: &CommandOption, signature: &FlagSignature) -> Arg {
        let mut flag = Arg::new(option.name.clone()).long(option.name.clone());

        if let Some(short) = option.short_name {
            flag = flag.short(short);
        }

        if let Some(description) = &option.description {
            flag = flag.help(description.clone());
        }

        match &signature.value {
            None => {
                flag = flag
                    .action(ArgAction::SetTrue)
                    .overrides_with(option.name.clone());
            }
            Some(value) => {
                if value.variadic {
                    flag = flag.action(ArgAction::Append);
                } else {
                    // Repeating a single-valued flag keeps the last value
                    flag = flag
                        .action(ArgAction::Set)
                        .overrides_with(option.name.clone());
                }
                flag = flag
                    .num_args(signature.value_range())
                    .value_name(value.name.clone());

                if let Some(default) = &option.default_value {
                    flag = flag.default_value(default.clone());
                }
            }
        }

        if option.required && !has_default(option) {
            flag = flag.required(true);
        }

        flag
    }
}

/// A default satisfies a required option, but only a valued one can take it
fn has_default(option: &CommandOption) -> bool {
    option.param.is_some() && option.default_value.is_some()
}

fn validate_command_name(name: &str) -> CommandResult<()> {
    if name.is_empty() {
        return Err(CommandError::invalid_name(name, "name must not be empty"));
    }
    if name.starts_with('-') {
        return Err(CommandError::invalid_name(name, "name must not start with '-'"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CommandError::invalid_name(name, "name must not contain whitespace"));
    }
    Ok(())
}

/// Check positional arguments and options of one command before registering them
fn validate_arguments(
    command: &str,
    args: &[CommandArgument],
    options: &[CommandOption],
) -> CommandResult<()> {
    let mut ids = HashSet::new();
    let mut shorts = HashSet::new();
    let mut seen_optional = false;

    for arg in args {
        if arg.name.is_empty() {
            return Err(CommandError::invalid_name(
                &arg.name,
                format!("argument of command '{}' has an empty name", command),
            ));
        }
        if arg.name == "help" {
            return Err(CommandError::ReservedName {
                command: command.to_string(),
                name: arg.name.clone(),
            });
        }
        if !ids.insert(arg.name.as_str()) {
            return Err(CommandError::DuplicateArgument {
                command: command.to_string(),
                name: arg.name.clone(),
            });
        }
        if arg.required && seen_optional {
            return Err(CommandError::ArgumentOrder {
                command: command.to_string(),
                argument: arg.name.clone(),
            });
        }
        seen_optional |= !arg.required;
    }

    for option in options {
        let invalid = |reason: &str| CommandError::InvalidFlag {
            command: command.to_string(),
            flag: format!("--{}", option.name),
            reason: reason.to_string(),
        };

        if option.name.is_empty() {
            return Err(invalid("long name must not be empty"));
        }
        if option.name.starts_with('-') {
            return Err(invalid("long name is given without leading dashes"));
        }
        if option.name.chars().any(|c| c.is_whitespace() || c == '=') {
            return Err(invalid("long name must not contain whitespace or '='"));
        }
        if option.name == "help" {
            return Err(CommandError::ReservedName {
                command: command.to_string(),
                name: format!("--{}", option.name),
            });
        }
        if !ids.insert(option.name.as_str()) {
            return Err(CommandError::DuplicateArgument {
                command: command.to_string(),
                name: option.name.clone(),
            });
        }

        if let Some(short) = option.short_name {
            if !short.is_ascii_alphanumeric() {
                return Err(invalid("short name must be a letter or digit"));
            }
            if short == 'h' {
                return Err(CommandError::ReservedName {
                    command: command.to_string(),
                    name: "-h".to_string(),
                });
            }
            if !shorts.insert(short) {
                return Err(CommandError::DuplicateArgument {
                    command: command.to_string(),
                    name: format!("-{}", short),
                });
            }
        }

        if let Some(param) = &option.param {
            if param.name.is_empty() {
                return Err(CommandError::EmptyValueName {
                    command: command.to_string(),
                    option: option.name.clone(),
                });
            }
        }
    }

    Ok(())
}
