/*!
Dispatcher: routes a `(tool, argv)` pair to a descriptor in the snapshot and
turns the outcome into a process exit code.

Isolation contract: whatever a tool entry does — return, fail, or panic —
the wrapper reports it and exits with a code. A broken tool never takes the
wrapper down with it.
*/

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::registry::Snapshot;

/// Exit code for wrapper-level dispatch failures.
pub const FAILURE_CODE: i32 = 1;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown tool '{name}'. Available: {}", known_display(.known))]
    NotFound { name: String, known: Vec<String> },

    #[error("tool '{name}' failed: {reason}")]
    ExecutionFailed { name: String, reason: String },
}

fn known_display(known: &[String]) -> String {
    if known.is_empty() {
        "<none>".to_string()
    } else {
        known.join(", ")
    }
}

/// Look up `name` and invoke its entry with `argv`. The entry's return value
/// becomes the exit code; a panicking or failing entry maps to
/// `ExecutionFailed`.
pub fn run(name: &str, argv: &[String], snapshot: &Snapshot) -> Result<i32, DispatchError> {
    let Some(tool) = snapshot.get(name) else {
        return Err(DispatchError::NotFound {
            name: name.to_string(),
            known: snapshot.names(),
        });
    };

    match panic::catch_unwind(AssertUnwindSafe(|| tool.invoke(argv))) {
        Ok(Ok(code)) => Ok(code),
        Ok(Err(err)) => Err(DispatchError::ExecutionFailed {
            name: name.to_string(),
            reason: format!("{err:#}"),
        }),
        Err(payload) => Err(DispatchError::ExecutionFailed {
            name: name.to_string(),
            reason: panic_message(payload),
        }),
    }
}

/// `(name, description)` pairs in sorted name order, stable across runs for
/// the same installed set.
pub fn list(snapshot: &Snapshot) -> Vec<(&str, &str)> {
    snapshot
        .tools()
        .map(|t| (t.name(), t.description()))
        .collect()
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "tool panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Paths;
    use crate::plugin::{Tool, ToolEntry};
    use crate::registry::{Registration, discover};

    fn argc_entry(argv: &[String]) -> i32 {
        argv.len() as i32
    }

    fn panicking_entry(_argv: &[String]) -> i32 {
        panic!("entry blew up");
    }

    fn fixture_snapshot() -> crate::registry::Snapshot {
        let regs = [
            Registration {
                package: "firm-ai-echo",
                load: || Ok(Tool::new("echo", "count args", ToolEntry::Function(argc_entry))?),
            },
            Registration {
                package: "firm-ai-crash",
                load: || {
                    Ok(Tool::new(
                        "crash",
                        "always panics",
                        ToolEntry::Function(panicking_entry),
                    )?)
                },
            },
        ];
        discover(&Paths::at("/nonexistent/firm-ai-test-home"), &regs)
    }

    #[test]
    fn entry_return_value_is_the_exit_code() {
        let snapshot = fixture_snapshot();
        let argv: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(run("echo", &argv, &snapshot).unwrap(), 3);
        assert_eq!(run("echo", &[], &snapshot).unwrap(), 0);
    }

    #[test]
    fn unknown_tool_reports_known_names() {
        let snapshot = fixture_snapshot();
        let err = run("missing-tool", &[], &snapshot).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("missing-tool"));
        assert!(rendered.contains("crash") && rendered.contains("echo"));
    }

    #[test]
    fn unknown_tool_with_empty_registry() {
        let snapshot = discover(&Paths::at("/nonexistent/firm-ai-test-home"), &[]);
        let err = run("anything", &[], &snapshot).unwrap_err();
        assert!(err.to_string().contains("<none>"));
    }

    #[test]
    fn panicking_entry_is_caught() {
        let snapshot = fixture_snapshot();
        let err = run("crash", &[], &snapshot).unwrap_err();
        match err {
            DispatchError::ExecutionFailed { name, reason } => {
                assert_eq!(name, "crash");
                assert!(reason.contains("entry blew up"));
            }
            other => panic!("expected ExecutionFailed, got {other:?}"),
        }
    }

    #[test]
    fn list_is_sorted_and_complete() {
        let snapshot = fixture_snapshot();
        let pairs = list(&snapshot);
        assert_eq!(
            pairs,
            vec![("crash", "always panics"), ("echo", "count args")]
        );
    }
}
