/*!
`run` subcommand: dispatch an argument vector to a named tool.

Exit code contract:
  - the tool's own returned status on success
  - 1 when the tool is unknown or its entry fails / panics

Trailing arguments are captured verbatim (hyphen values included). A single
leading `--` separator is stripped before dispatch whether clap consumed it
or passed it through; arguments without a `--` still reach the tool.
*/

use anyhow::Result;
use clap::Args;

use crate::config::Paths;
use crate::log_error;
use crate::{dispatch, registry};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tool name
    pub tool: String,

    /// Arguments passed through to the tool
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ARGS"
    )]
    pub tool_args: Vec<String>,
}

pub fn execute_run(mut args: RunArgs, paths: &Paths) -> Result<i32> {
    strip_separator(&mut args.tool_args);

    let snapshot = registry::discover(paths, registry::BUILTIN);
    for diag in snapshot.diagnostics() {
        log_error!("tool load error: {diag}");
    }

    match dispatch::run(&args.tool, &args.tool_args, &snapshot) {
        Ok(code) => Ok(code),
        Err(err) => {
            log_error!("{err}");
            Ok(dispatch::FAILURE_CODE)
        }
    }
}

/// Drop a single leading `--` left over from the CLI invocation.
fn strip_separator(tool_args: &mut Vec<String>) {
    if tool_args.first().map(String::as_str) == Some("--") {
        tool_args.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        Run(RunArgs),
    }

    fn parse(argv: &[&str]) -> RunArgs {
        let mut full = vec!["t", "run"];
        full.extend_from_slice(argv);
        let TestSub::Run(args) = TestCli::try_parse_from(full).unwrap().cmd;
        args
    }

    #[test]
    fn trailing_args_without_separator() {
        let args = parse(&["echo", "a", "b", "c"]);
        assert_eq!(args.tool, "echo");
        assert_eq!(args.tool_args, vec!["a", "b", "c"]);
    }

    #[test]
    fn hyphen_values_pass_through() {
        let args = parse(&["lint", "--fix", "-v", "src/"]);
        assert_eq!(args.tool, "lint");
        assert_eq!(args.tool_args, vec!["--fix", "-v", "src/"]);
    }

    #[test]
    fn separator_reaches_the_tool_argv_exactly_once_at_most() {
        // Whether clap consumed the first `--` or passed it through, the
        // argv delivered to the tool must not start with the separator.
        let mut args = parse(&["echo", "--", "a", "b"]);
        strip_separator(&mut args.tool_args);
        assert_eq!(args.tool_args, vec!["a", "b"]);

        // A literal `--` later in the vector belongs to the tool.
        let mut args = vec!["a".to_string(), "--".to_string(), "b".to_string()];
        strip_separator(&mut args);
        assert_eq!(args, vec!["a", "--", "b"]);
    }

    #[test]
    fn unknown_tool_maps_to_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        let code = execute_run(parse(&["nope"]), &paths).unwrap();
        assert_eq!(code, 1);
    }
}
