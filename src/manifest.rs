//! Command manifests
//!
//! A [`CommandManifest`] is the file form of a [`crate::CommandSchema`]: the
//! same tree, with each action replaced by the name of a handler that a
//! [`crate::HandlerRegistry`] resolves at load time.

use crate::error::{CommandError, CommandResult};
use crate::schema::{CommandOption, CommandSetting};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Command tree as written in a TOML or JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandManifest {
    /// Identity and positional arguments
    pub command: CommandSetting,

    /// Help text
    #[serde(default)]
    pub description: Option<String>,

    /// Flags, in help order
    #[serde(default)]
    pub options: Vec<CommandOption>,

    /// Registered handler run when this command is the deepest match
    pub handler: String,

    /// Sub-commands, in help order
    #[serde(default)]
    pub sub_commands: Vec<CommandManifest>,
}

impl CommandManifest {
    /// Parse a manifest from TOML text
    pub fn from_toml_str(content: &str) -> CommandResult<Self> {
        toml::from_str(content)
            .map_err(|e| CommandError::manifest(format!("Failed to parse TOML: {}", e)))
    }

    /// Parse a manifest from JSON text
    pub fn from_json_str(content: &str) -> CommandResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CommandError::manifest(format!("Failed to parse JSON: {}", e)))
    }

    /// Load a manifest from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> CommandResult<Self> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    /// Load a manifest from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> CommandResult<Self> {
        Self::from_json_str(&read(path.as_ref())?)
    }

    /// Load a manifest, picking the format from the file extension
    ///
    /// Files without a known extension are tried as TOML, then JSON.
    pub fn from_file(path: impl AsRef<Path>) -> CommandResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => {
                let content = read(path)?;
                Self::from_toml_str(&content).or_else(|_| Self::from_json_str(&content))
            }
        }
    }

    /// Names of every handler referenced in the tree, in pre-order
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names = vec![self.handler.as_str()];
        for sub in &self.sub_commands {
            names.extend(sub.handler_names());
        }
        names
    }
}

fn read(path: &Path) -> CommandResult<String> {
    debug!(path = %path.display(), "reading manifest");
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIT_TOML: &str = r#"
        handler = "git"
        description = "My own git"

        [command]
        name = "my-git"

        [[command.args]]
        name = "commit"
        description = "Commit changes"

        [[options]]
        name = "message"
        short_name = "m"
        description = "Commit message"
        param = { name = "msg-input" }

        [[sub_commands]]
        handler = "git::remote"

        [sub_commands.command]
        name = "remote"
        alias = "r"
        nested = { hidden = true }
    "#;

    #[test]
    fn test_parse_toml_manifest() {
        let manifest = CommandManifest::from_toml_str(GIT_TOML).unwrap();

        assert_eq!(manifest.command.name, "my-git");
        assert_eq!(manifest.description.as_deref(), Some("My own git"));
        assert!(manifest.command.args[0].required);

        let message = &manifest.options[0];
        assert_eq!(message.short_name, Some('m'));
        assert!(!message.required);
        assert!(message.param.as_ref().unwrap().required);

        let remote = &manifest.sub_commands[0];
        assert_eq!(remote.command.alias.as_deref(), Some("r"));
        assert!(remote.command.nested.hidden);
        assert_eq!(manifest.handler_names(), vec!["git", "git::remote"]);
    }

    #[test]
    fn test_parse_json_manifest() {
        let manifest = CommandManifest::from_json_str(
            r#"{
                "command": {"name": "greet", "args": [{"name": "person", "required": false}]},
                "options": [{"name": "loud", "short_name": "l"}],
                "handler": "greet"
            }"#,
        )
        .unwrap();

        assert!(!manifest.command.args[0].required);
        assert!(manifest.options[0].param.is_none());
        assert!(manifest.sub_commands.is_empty());
    }

    #[test]
    fn test_missing_handler_is_rejected() {
        let err = CommandManifest::from_json_str(r#"{"command": {"name": "x"}}"#).unwrap_err();
        assert!(matches!(err, CommandError::Manifest(_)));
    }

    #[test]
    fn test_from_file_detects_format() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("git.toml");
        std::fs::write(&toml_path, GIT_TOML).unwrap();
        assert_eq!(CommandManifest::from_file(&toml_path).unwrap().command.name, "my-git");

        let json_path = dir.path().join("cli.manifest");
        std::fs::write(&json_path, r#"{"command": {"name": "x"}, "handler": "x"}"#).unwrap();
        assert_eq!(CommandManifest::from_file(&json_path).unwrap().handler, "x");

        let err = CommandManifest::from_file(dir.path().join("missing.toml")).unwrap_err();
        match err {
            CommandError::Io(err) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected IO error, got {:?}", other),
        }
    }
}
