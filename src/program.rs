//! Top-level program
//!
//! Built command nodes are attached to a [`Program`], which parses the real
//! process arguments and runs the matched node's action.
//!
//! ```rust,no_run
//! use cmd_schema::{build, Action, CommandArgument, CommandSchema, CommandSetting, Program};
//!
//! # async fn example() -> cmd_schema::CommandResult<()> {
//! let greet = CommandSchema::new(
//!     CommandSetting::new("greet").arg(CommandArgument::new("person")),
//!     Action::new(|input| {
//!         println!("Hello, {}", input.arg(0).unwrap_or_default());
//!         Ok(())
//!     }),
//! );
//!
//! Program::new("app")
//!     .add_command(build(&greet, None)?, Default::default())?
//!     .run()
//!     .await
//! # }
//! ```

use crate::error::CommandResult;
use crate::node::{CommandNode, Invocation};
use crate::schema::NestedOptions;
use clap::Command;
use std::ffi::OsString;

/// Root container for built commands
#[derive(Debug, Clone)]
pub struct Program {
    root: CommandNode,
}

impl Program {
    /// Program named `name` that requires one of its commands to be invoked
    pub fn new(name: impl Into<String>) -> Self {
        let command = Command::new(name.into()).subcommand_required(true);
        Self {
            root: CommandNode::bare(command),
        }
    }

    /// Set the version shown by `--version`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.root.command = self.root.command.version(version.into());
        self
    }

    /// Set the help text
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.root.command = self.root.command.about(about.into());
        self
    }

    /// Attach a built command
    pub fn add_command(mut self, node: CommandNode, options: NestedOptions) -> CommandResult<Self> {
        self.root = self.root.add_command(node, options)?;
        Ok(self)
    }

    /// Attached commands
    pub fn commands(&self) -> &[CommandNode] {
        self.root.children()
    }

    /// Assemble the full clap command
    pub fn command(&self) -> Command {
        self.root.to_command()
    }

    /// Parse `argv` and resolve the matched command
    pub fn try_match_from<I, T>(&self, argv: I) -> CommandResult<Invocation>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.root.try_match_from(argv)
    }

    /// Parse `argv` and run the matched command's action
    pub async fn run_from<I, T>(&self, argv: I) -> CommandResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.root.run_from(argv).await
    }

    /// Parse the process arguments and run the matched command's action
    pub async fn run(&self) -> CommandResult<()> {
        self.run_from(std::env::args_os()).await
    }
}
