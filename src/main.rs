use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod dispatch;
mod plugin;
mod pm;
mod registry;
mod utils;

use cmd::{InstallArgs, ListArgs, RunArgs, UninstallArgs, UpgradeArgs};

/// Firm AI - wrapper CLI for tool plugins.
///
/// A single stable entry command that lists installed tools, dispatches
/// argument vectors to a named tool, and manages plugin packages through an
/// external installer. Tools are discovered fresh on every invocation from
/// manifests under the wrapper home; the wrapper knows nothing about any
/// tool's internals.
///
/// Examples:
///   firm-ai list
///   firm-ai run hello -- --name "Ada"
///   firm-ai install git+https://github.com/org/firm-ai-hello@v0.0.1
///   firm-ai uninstall firm-ai-hello
///   firm-ai upgrade git+https://github.com/org/firm-ai-hello@v0.0.2
///   firm-ai upgrade-self
#[derive(Parser, Debug)]
#[command(
    name = "firm-ai",
    version,
    about = "Firm AI - wrapper CLI for tool plugins",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Wrapper home directory (default: FIRM_AI_HOME env or ~/.firm-ai)
    #[arg(long, global = true, value_name = "PATH")]
    home: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List installed tools
    List(ListArgs),

    /// Run a tool, passing trailing arguments through
    Run(RunArgs),

    /// Install a tool package into the wrapper environment
    Install(InstallArgs),

    /// Uninstall a tool package from the wrapper environment
    Uninstall(UninstallArgs),

    /// Upgrade an installed tool package
    Upgrade(UpgradeArgs),

    /// Upgrade the firm-ai wrapper package itself
    UpgradeSelf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let paths = match config::Paths::resolve(cli.home.as_deref()) {
        Ok(paths) => paths,
        Err(err) => {
            crate::log_error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command {
        Commands::List(args) => cmd::execute_list(args, &paths),
        Commands::Run(args) => cmd::execute_run(args, &paths),
        Commands::Install(args) => cmd::execute_install(args, &paths),
        Commands::Uninstall(args) => cmd::execute_uninstall(args, &paths),
        Commands::Upgrade(args) => cmd::execute_upgrade(args, &paths),
        Commands::UpgradeSelf => cmd::execute_upgrade_self(&paths),
    };

    match outcome {
        Ok(code) => ExitCode::from(clamp_code(code)),
        Err(err) => {
            crate::log_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn clamp_code(code: i32) -> u8 {
    code.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_every_subcommand() {
        for argv in [
            vec!["firm-ai", "list"],
            vec!["firm-ai", "list", "--json"],
            vec!["firm-ai", "run", "hello", "--", "--name", "Ada"],
            vec!["firm-ai", "install", "git+https://example.com/repo@v1"],
            vec!["firm-ai", "uninstall", "firm-ai-hello"],
            vec!["firm-ai", "upgrade", "firm-ai-hello"],
            vec!["firm-ai", "upgrade-self"],
        ] {
            Cli::try_parse_from(argv.clone())
                .unwrap_or_else(|e| panic!("failed to parse {argv:?}: {e}"));
        }
    }

    #[test]
    fn global_home_flag_is_accepted_anywhere() {
        let cli = Cli::try_parse_from(["firm-ai", "list", "--home", "/tmp/x"]).unwrap();
        assert_eq!(cli.home.as_deref(), Some("/tmp/x"));
    }

    #[test]
    fn exit_code_clamps_to_u8_range() {
        assert_eq!(clamp_code(0), 0);
        assert_eq!(clamp_code(7), 7);
        assert_eq!(clamp_code(-1), 0);
        assert_eq!(clamp_code(4096), 255);
    }
}
