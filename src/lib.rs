//! cmd-schema - declarative command definitions for clap
//!
//! Describe a command tree as data (name, positional arguments, options,
//! description, handler, sub-commands) and turn it into a wired
//! `clap::Command` tree whose handlers run when their command is matched.
//!
//! - **`schema`** - the declarative data model
//! - **`builder`** - schema to command tree translation, with an optional
//!   customization hook per node
//! - **`node`** - built nodes, argument resolution and dispatch
//! - **`program`** - top-level container for built commands
//! - **`router`** - handler registry for manifests
//! - **`manifest`** - TOML/JSON command manifests (`manifest` feature)
//!
//! # Example
//!
//! ```
//! use cmd_schema::{
//!     build, Action, CommandArgument, CommandOption, CommandSchema, CommandSetting, OptionValue,
//! };
//!
//! let schema = CommandSchema::new(
//!     CommandSetting::new("greet").arg(CommandArgument::new("person")),
//!     Action::new(|_| Ok(())),
//! )
//! .option(CommandOption::new("loud").short('l'));
//!
//! let node = build(&schema, None).unwrap();
//! let invocation = node.try_match_from(["greet", "Ada", "--loud"]).unwrap();
//!
//! assert_eq!(invocation.metadata.arg(0), Some("Ada"));
//! assert_eq!(invocation.metadata.option("loud"), Some(&OptionValue::Flag(true)));
//! ```
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! cmd-schema = { version = "0.1", default-features = false }
//! # Or with manifest loading (default):
//! cmd-schema = { version = "0.1", features = ["manifest"] }
//! ```

#![warn(missing_docs)]

pub mod action;
pub mod builder;
pub mod error;
pub mod node;
pub mod program;
pub mod router;
pub mod schema;
pub mod signature;

/// Command manifests (enabled with the `manifest` feature)
#[cfg(feature = "manifest")]
pub mod manifest;

pub use action::{Action, ActionMetaData, OptionValue};
pub use builder::{build, CommandBuilder, CommandHook};
pub use error::{CommandError, CommandResult};
pub use node::{CommandNode, Invocation};
pub use program::Program;
pub use router::HandlerRegistry;
pub use schema::{
    CommandArgument, CommandOption, CommandSchema, CommandSetting, NestedOptions, OptionArgument,
};
pub use signature::{argument_template, FlagSignature};

#[cfg(feature = "manifest")]
pub use manifest::CommandManifest;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build, Action, ActionMetaData, CommandArgument, CommandBuilder, CommandError,
        CommandNode, CommandOption, CommandResult, CommandSchema, CommandSetting, HandlerRegistry,
        NestedOptions, OptionArgument, OptionValue, Program,
    };

    #[cfg(feature = "manifest")]
    pub use crate::CommandManifest;
}
