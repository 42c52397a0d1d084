//! Error types for building and running declarative command trees

use thiserror::Error;

/// Result type for command tree operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur while building, parsing or dispatching a command tree
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command, argument or option name that clap cannot register
    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        /// Offending name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Malformed option flag
    #[error("Invalid flag '{flag}' on command '{command}': {reason}")]
    InvalidFlag {
        /// Command declaring the option
        command: String,
        /// Offending flag as written
        flag: String,
        /// What is wrong with it
        reason: String,
    },

    /// Name or flag reserved by the parsing engine
    #[error("'{name}' is reserved and cannot be declared on command '{command}'")]
    ReservedName {
        /// Command declaring the construct
        command: String,
        /// Reserved name
        name: String,
    },

    /// Two sibling sub-commands share a name or alias
    #[error("Command '{parent}' already has a sub-command named '{name}'")]
    DuplicateCommand {
        /// Parent command
        parent: String,
        /// Duplicated name or alias
        name: String,
    },

    /// Two arguments or options of one command share an identifier
    #[error("Command '{command}' declares '{name}' more than once")]
    DuplicateArgument {
        /// Command declaring the arguments
        command: String,
        /// Duplicated identifier
        name: String,
    },

    /// A required positional argument follows an optional one
    #[error("Command '{command}': required argument '{argument}' cannot follow an optional argument")]
    ArgumentOrder {
        /// Command declaring the arguments
        command: String,
        /// First required argument found after an optional one
        argument: String,
    },

    /// Option parameter without a value name
    #[error("Option '--{option}' on command '{command}' has a parameter without a name")]
    EmptyValueName {
        /// Command declaring the option
        command: String,
        /// Option long name
        option: String,
    },

    /// Argument parsing failed (includes help and version display requests)
    #[error(transparent)]
    Parse(#[from] clap::Error),

    /// The matched command has no action to run
    #[error("No action registered for command: {0}")]
    UnhandledCommand(String),

    /// Failure returned by a command action
    #[error(transparent)]
    Action(anyhow::Error),

    /// Handler name referenced by a manifest is not registered
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    /// Manifest loading or parsing errors
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Create an invalid name error
    pub fn invalid_name<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a manifest error with context
    pub fn manifest<S: Into<String>>(msg: S) -> Self {
        Self::Manifest(msg.into())
    }

    /// Whether this error is clap asking to print help or version text
    pub fn is_display_request(&self) -> bool {
        match self {
            Self::Parse(err) => matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp
                    | clap::error::ErrorKind::DisplayVersion
                    | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CommandError::DuplicateCommand {
            parent: "git".to_string(),
            name: "commit".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command 'git' already has a sub-command named 'commit'"
        );

        let err = CommandError::invalid_name("", "name must not be empty");
        assert_eq!(err.to_string(), "Invalid name '': name must not be empty");
    }

    #[test]
    fn test_action_error_is_transparent() {
        let err = CommandError::Action(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert!(!err.is_display_request());
    }
}
