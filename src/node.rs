//! Built command nodes
//!
//! A [`CommandNode`] owns the `clap::Command` for one level of the tree, the
//! action to run when that level is the deepest match, and its children. The
//! full clap tree is assembled on demand, so every parse works on a fresh copy
//! and nodes stay immutable once built.

use crate::action::{Action, ActionMetaData, OptionValue};
use crate::error::{CommandError, CommandResult};
use crate::schema::NestedOptions;
use crate::signature::FlagSignature;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, Command};
use std::collections::BTreeMap;
use std::ffi::OsString;
use tracing::debug;

/// Positional argument as declared
#[derive(Debug, Clone)]
pub(crate) struct ArgumentBinding {
    pub(crate) id: String,
    pub(crate) template: String,
}

/// Option as declared
#[derive(Debug, Clone)]
pub(crate) struct OptionBinding {
    pub(crate) signature: FlagSignature,
    pub(crate) default_value: Option<String>,
    /// Required and not satisfied by a default
    pub(crate) required: bool,
}

/// One built command and its sub-commands
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub(crate) command: Command,
    pub(crate) action: Option<Action>,
    pub(crate) arguments: Vec<ArgumentBinding>,
    pub(crate) options: Vec<OptionBinding>,
    pub(crate) children: Vec<CommandNode>,
}

impl CommandNode {
    /// Node without declared arguments or action, wrapping `command` as-is
    pub(crate) fn bare(command: Command) -> Self {
        Self {
            command,
            action: None,
            arguments: Vec::new(),
            options: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name the node matches on
    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// This node's own clap command, without its sub-commands
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Attached sub-commands, in attachment order
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// Attached sub-command matching `name` or one of its aliases
    pub fn find_child(&self, name: &str) -> Option<&CommandNode> {
        self.children
            .iter()
            .find(|child| child.matches_name(name))
    }

    /// Handler run when this node is the deepest match
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Usage templates of the declared positional arguments, in binding order
    pub fn argument_templates(&self) -> Vec<&str> {
        self.arguments
            .iter()
            .map(|binding| binding.template.as_str())
            .collect()
    }

    /// Rendered signatures of the declared options, in declaration order
    pub fn option_signatures(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|binding| binding.signature.to_string())
            .collect()
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name() == name || self.command.get_all_aliases().any(|alias| alias == name)
    }

    /// Attach `child` as a sub-command
    ///
    /// Sibling names and aliases must be unique, and `help` is taken by the
    /// help sub-command clap generates.
    pub fn add_command(mut self, mut child: CommandNode, options: NestedOptions) -> CommandResult<Self> {
        let names: Vec<String> = std::iter::once(child.name().to_string())
            .chain(child.command.get_all_aliases().map(str::to_string))
            .collect();

        for name in &names {
            if name == "help" {
                return Err(CommandError::ReservedName {
                    command: self.name().to_string(),
                    name: name.clone(),
                });
            }
            if self.find_child(name).is_some() {
                return Err(CommandError::DuplicateCommand {
                    parent: self.name().to_string(),
                    name: name.clone(),
                });
            }
        }

        if options.hidden {
            child.command = child.command.hide(true);
        }

        debug!(parent = %self.name(), child = %child.name(), hidden = options.hidden, "attached sub-command");
        self.children.push(child);
        Ok(self)
    }

    /// Assemble the full clap command tree rooted at this node
    pub fn to_command(&self) -> Command {
        let command = self
            .children
            .iter()
            .fold(self.command.clone(), |command, child| command.subcommand(child.to_command()));

        if self.children.is_empty() {
            command
        } else {
            // A matched sub-command lifts the parent's required positionals.
            // Required parent options are checked in `resolve`.
            command.subcommand_negates_reqs(true)
        }
    }

    /// Parse `argv` and resolve the deepest matched node
    ///
    /// The first element of `argv` is the name the node was invoked as.
    pub fn try_match_from<I, T>(&self, argv: I) -> CommandResult<Invocation>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.to_command().try_get_matches_from(argv)?;
        self.resolve(&matches)
    }

    /// Parse `argv` and run the deepest matched node's action
    pub async fn run_from<I, T>(&self, argv: I) -> CommandResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.try_match_from(argv)?.run().await
    }

    pub(crate) fn resolve(&self, matches: &ArgMatches) -> CommandResult<Invocation> {
        let mut node = self;
        let mut matches = matches;
        let mut path = vec![self.name().to_string()];

        while let Some((name, sub_matches)) = matches.subcommand() {
            node.check_required_options(matches)?;
            path.push(name.to_string());
            node = node
                .find_child(name)
                .ok_or_else(|| CommandError::UnhandledCommand(path.join(" ")))?;
            matches = sub_matches;
        }

        Ok(Invocation {
            metadata: node.metadata(matches),
            action: node.action.clone(),
            path,
        })
    }

    /// Reject required options of an ancestor that were not given
    fn check_required_options(&self, matches: &ArgMatches) -> CommandResult<()> {
        let missing: Vec<String> = self
            .options
            .iter()
            .filter(|binding| binding.required)
            .filter(|binding| {
                !matches!(
                    matches.value_source(&binding.signature.long),
                    Some(ValueSource::CommandLine | ValueSource::EnvVariable)
                )
            })
            .map(|binding| binding.signature.to_string())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        let mut command = self.command.clone();
        Err(command
            .error(
                ErrorKind::MissingRequiredArgument,
                format!(
                    "the following required arguments were not provided:\n  {}",
                    missing.join("\n  ")
                ),
            )
            .into())
    }

    fn metadata(&self, matches: &ArgMatches) -> ActionMetaData {
        let args = self
            .arguments
            .iter()
            .map(|binding| raw_values(matches, &binding.id).into_iter().next())
            .collect();

        let mut options = BTreeMap::new();
        for binding in &self.options {
            if let Some(value) = resolve_declared(matches, binding) {
                options.insert(binding.signature.long.clone(), value);
            }
        }

        // Flags added by a customization hook
        for arg in self.command.get_arguments() {
            let id = arg.get_id().as_str();
            if arg.is_positional() || id == "help" || id == "version" {
                continue;
            }
            let key = arg.get_long().unwrap_or(id).to_string();
            if options.contains_key(&key) {
                continue;
            }
            if let Some(value) = resolve_added(matches, id, arg.get_action()) {
                options.insert(key, value);
            }
        }

        ActionMetaData { args, options }
    }
}

fn raw_values(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .try_get_raw(id)
        .ok()
        .flatten()
        .map(|values| {
            values
                .map(|value| value.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_declared(matches: &ArgMatches, binding: &OptionBinding) -> Option<OptionValue> {
    let id = binding.signature.long.as_str();

    if binding.signature.is_boolean() {
        let set = matches.try_get_one::<bool>(id).ok().flatten().copied().unwrap_or(false);
        return Some(OptionValue::Flag(set));
    }

    let source = matches.value_source(id)?;
    if source == ValueSource::DefaultValue {
        return binding.default_value.clone().map(OptionValue::Value);
    }

    let mut values = raw_values(matches, id);
    if values.is_empty() {
        // `--out` given without its optional value
        Some(OptionValue::Flag(true))
    } else if binding.signature.is_variadic() {
        Some(OptionValue::Values(values))
    } else {
        values.pop().map(OptionValue::Value)
    }
}

fn resolve_added(matches: &ArgMatches, id: &str, action: &ArgAction) -> Option<OptionValue> {
    match action {
        ArgAction::SetTrue | ArgAction::SetFalse => matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .map(|set| OptionValue::Flag(*set)),
        ArgAction::Count => matches
            .try_get_one::<u8>(id)
            .ok()
            .flatten()
            .map(|count| OptionValue::Count(*count)),
        _ => {
            matches.value_source(id)?;
            let mut values = raw_values(matches, id);
            match values.len() {
                0 => Some(OptionValue::Flag(true)),
                1 => values.pop().map(OptionValue::Value),
                _ => Some(OptionValue::Values(values)),
            }
        }
    }
}

/// The deepest matched node of a parse, ready to run
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Names of the matched commands from the root down
    pub path: Vec<String>,

    /// Resolved positional and option values
    pub metadata: ActionMetaData,

    action: Option<Action>,
}

impl Invocation {
    /// Name of the deepest matched command
    pub fn command_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Action that [`Invocation::run`] will call
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Run the matched action once
    pub async fn run(self) -> CommandResult<()> {
        let action = self
            .action
            .ok_or_else(|| CommandError::UnhandledCommand(self.path.join(" ")))?;

        debug!(command = %self.path.join(" "), "running action");
        action.call(self.metadata).await.map_err(CommandError::Action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn leaf(name: &str) -> CommandNode {
        let mut node = CommandNode::bare(Command::new(name.to_string()));
        node.action = Some(Action::new(|_| Ok(())));
        node
    }

    #[test]
    fn test_add_command_preserves_order() {
        let root = CommandNode::bare(Command::new("root"))
            .add_command(leaf("b"), NestedOptions::default())
            .unwrap()
            .add_command(leaf("a"), NestedOptions::default())
            .unwrap();

        let names: Vec<&str> = root.children().iter().map(CommandNode::name).collect();
        assert_eq!(names, vec!["b", "a"]);

        let command = root.to_command();
        let names: Vec<&str> = command.get_subcommands().map(Command::get_name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_add_command_rejects_duplicates() {
        let mut aliased = leaf("remove");
        aliased.command = aliased.command.alias("rm");

        let root = CommandNode::bare(Command::new("root"))
            .add_command(aliased, NestedOptions::default())
            .unwrap();

        let err = root
            .clone()
            .add_command(leaf("remove"), NestedOptions::default())
            .unwrap_err();
        assert!(matches!(err, CommandError::DuplicateCommand { ref name, .. } if name == "remove"));

        let err = root
            .add_command(leaf("rm"), NestedOptions::default())
            .unwrap_err();
        assert!(matches!(err, CommandError::DuplicateCommand { ref name, .. } if name == "rm"));
    }

    #[test]
    fn test_add_command_rejects_help() {
        let err = CommandNode::bare(Command::new("root"))
            .add_command(leaf("help"), NestedOptions::default())
            .unwrap_err();
        assert!(matches!(err, CommandError::ReservedName { .. }));
    }

    #[test]
    fn test_hidden_child_still_matches() {
        let root = CommandNode::bare(Command::new("root"))
            .add_command(leaf("secret"), NestedOptions { hidden: true })
            .unwrap();

        assert!(root.children()[0].command().is_hide_set());
        let invocation = root.try_match_from(["root", "secret"]).unwrap();
        assert_eq!(invocation.path, vec!["root", "secret"]);
    }

    #[test]
    fn test_match_by_alias_resolves_canonical_child() {
        let mut child = leaf("remove");
        child.command = child.command.alias("rm");
        let root = CommandNode::bare(Command::new("root"))
            .add_command(child, NestedOptions::default())
            .unwrap();

        let invocation = root.try_match_from(["root", "rm"]).unwrap();
        assert_eq!(invocation.command_name(), "remove");
        assert!(invocation.action().is_some());
    }

    #[test]
    fn test_hook_added_flags_are_resolved() {
        let mut node = leaf("tool");
        node.command = node
            .command
            .arg(Arg::new("verbose").short('v').long("verbose").action(ArgAction::Count))
            .arg(Arg::new("dry-run").long("dry-run").action(ArgAction::SetTrue))
            .arg(Arg::new("tag").long("tag").action(ArgAction::Append));

        let invocation = node
            .try_match_from(["tool", "-vv", "--tag", "a", "--tag", "b"])
            .unwrap();
        let options = &invocation.metadata.options;
        assert_eq!(options.get("verbose"), Some(&OptionValue::Count(2)));
        assert_eq!(options.get("dry-run"), Some(&OptionValue::Flag(false)));
        assert_eq!(
            options.get("tag"),
            Some(&OptionValue::Values(vec!["a".to_string(), "b".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_run_without_action_is_unhandled() {
        let node = CommandNode::bare(Command::new("bare"));
        let err = node.run_from(["bare"]).await.unwrap_err();
        assert!(matches!(err, CommandError::UnhandledCommand(ref path) if path == "bare"));
    }
}
