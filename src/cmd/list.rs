/*!
`list` subcommand: print each known tool's name and description.

Always exits 0. Discovery failures are stderr diagnostics, never fatal:
one broken plugin must not hide the healthy ones.

JSON output shape (--json):
{
  "status": "ok",
  "count": 2,
  "tools": [ { "name": "...", "description": "...", "package": "..." } ],
  "diagnostics": [ "..." ]
}
*/

use anyhow::Result;
use clap::Args;

use crate::cmd::format::{Role, StyleOptions, box_header, color, two_column};
use crate::config::Paths;
use crate::log_error;
use crate::{dispatch, registry};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(args: ListArgs, paths: &Paths) -> Result<i32> {
    let snapshot = registry::discover(paths, registry::BUILTIN);

    if args.json {
        let tools: Vec<serde_json::Value> = dispatch::list(&snapshot)
            .into_iter()
            .map(|(name, description)| {
                serde_json::json!({
                    "name": name,
                    "description": description,
                    "package": snapshot.package_of(name),
                })
            })
            .collect();
        let diagnostics: Vec<String> = snapshot
            .diagnostics()
            .iter()
            .map(|d| d.to_string())
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "status": "ok",
                "count": tools.len(),
                "tools": tools,
                "diagnostics": diagnostics,
            })
        );
        return Ok(0);
    }

    for diag in snapshot.diagnostics() {
        log_error!("tool load error: {diag}");
    }

    if snapshot.is_empty() {
        println!("No tools installed.");
        return Ok(0);
    }

    let style = StyleOptions::detect();
    println!(
        "{}",
        box_header(format!("Tools ({})", snapshot.len()), None, &style)
    );

    let rows: Vec<(String, String)> = dispatch::list(&snapshot)
        .into_iter()
        .map(|(name, description)| (name.to_string(), description.to_string()))
        .collect();
    println!("{}", two_column(&rows, &style));

    println!(
        "\n{}",
        color(
            Role::Dim,
            "Use `firm-ai run <name> -- [args...]` to invoke a tool",
            &style
        )
    );

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    // Ad-hoc parser just for testing ListArgs in isolation.
    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        List(ListArgs),
    }

    #[test]
    fn clap_parses_list() {
        let cli = TestCli::try_parse_from(["t", "list"]).unwrap();
        let TestSub::List(a) = cli.cmd;
        assert!(!a.json);
    }

    #[test]
    fn clap_parses_list_json() {
        let cli = TestCli::try_parse_from(["t", "list", "--json"]).unwrap();
        let TestSub::List(a) = cli.cmd;
        assert!(a.json);
    }

    #[test]
    fn empty_home_lists_nothing_and_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        let code = execute_list(ListArgs { json: false }, &paths).unwrap();
        assert_eq!(code, 0);
    }
}
