/*!
Tool descriptor types: the extension contract plugin packages fulfill.

A plugin exposes one or more tools, each described by `{name, description,
entry}`. The entry is either an in-process function (registration-list tools)
or an external command line (manifest-backed tools). Descriptors are immutable
once constructed; `Tool::new` validates shape up front so the registry only
ever holds well-formed descriptors.
*/

use std::fmt;
use std::process::Command;

use anyhow::{Context, Result};
use thiserror::Error;

/// Signature every in-process tool entry implements: argv in, status code out.
pub type EntryFn = fn(&[String]) -> i32;

/// Descriptor validation failures, raised at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("tool name must be non-empty")]
    EmptyName,
    #[error("tool '{0}': entry command must be non-empty")]
    EmptyEntry(String),
}

/// How a tool is invoked.
#[derive(Clone)]
pub enum ToolEntry {
    /// In-process function registered at startup.
    Function(EntryFn),
    /// External program shipped by a plugin package. The user argv is
    /// appended after the manifest-declared arguments.
    Command { program: String, args: Vec<String> },
}

impl fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolEntry::Function(_) => f.write_str("Function(..)"),
            ToolEntry::Command { program, args } => f
                .debug_struct("Command")
                .field("program", program)
                .field("args", args)
                .finish(),
        }
    }
}

/// Immutable tool descriptor: lookup key for dispatch, display key for `list`.
#[derive(Clone, Debug)]
pub struct Tool {
    name: String,
    description: String,
    entry: ToolEntry,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        entry: ToolEntry,
    ) -> Result<Self, PluginError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PluginError::EmptyName);
        }
        if let ToolEntry::Command { program, .. } = &entry
            && program.trim().is_empty()
        {
            return Err(PluginError::EmptyEntry(name));
        }
        Ok(Tool {
            name,
            description: description.into(),
            entry,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Invoke the entry synchronously in the current process and return its
    /// status code. Command entries block on the child; a child killed by a
    /// signal maps to status 1.
    pub fn invoke(&self, argv: &[String]) -> Result<i32> {
        match &self.entry {
            ToolEntry::Function(f) => Ok(f(argv)),
            ToolEntry::Command { program, args } => {
                let status = Command::new(program)
                    .args(args)
                    .args(argv)
                    .status()
                    .with_context(|| format!("failed to spawn entry command '{program}'"))?;
                Ok(status.code().unwrap_or(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argc_entry(argv: &[String]) -> i32 {
        argv.len() as i32
    }

    #[test]
    fn rejects_empty_name() {
        let err = Tool::new("  ", "desc", ToolEntry::Function(argc_entry)).unwrap_err();
        assert_eq!(err, PluginError::EmptyName);
    }

    #[test]
    fn rejects_empty_entry_command() {
        let entry = ToolEntry::Command {
            program: "".into(),
            args: vec![],
        };
        let err = Tool::new("echo", "desc", entry).unwrap_err();
        assert_eq!(err, PluginError::EmptyEntry("echo".into()));
    }

    #[test]
    fn function_entry_returns_status() {
        let tool = Tool::new("argc", "count args", ToolEntry::Function(argc_entry)).unwrap();
        let argv: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tool.invoke(&argv).unwrap(), 3);
        assert_eq!(tool.invoke(&[]).unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn command_entry_propagates_exit_status() {
        let entry = ToolEntry::Command {
            program: "sh".into(),
            args: vec!["-c".into(), "exit 7".into()],
        };
        let tool = Tool::new("exit7", "always exits 7", entry).unwrap();
        assert_eq!(tool.invoke(&[]).unwrap(), 7);
    }

    #[test]
    fn command_entry_spawn_failure_is_an_error() {
        let entry = ToolEntry::Command {
            program: "firm-ai-no-such-binary".into(),
            args: vec![],
        };
        let tool = Tool::new("ghost", "missing binary", entry).unwrap();
        assert!(tool.invoke(&[]).is_err());
    }
}
