/*!
Command modules for the firm-ai CLI.

Conventions:
  - each subcommand module exposes one `execute_*` function returning
    `anyhow::Result<i32>`; the returned integer becomes the process exit code
  - argument structs derive `clap::Args` and stay minimal
  - human output goes through `format`; JSON paths print serde_json directly
    and stay free of styling
*/

pub mod format;
pub mod lifecycle;
pub mod list;
pub mod run;

pub use lifecycle::{
    InstallArgs, UninstallArgs, UpgradeArgs, execute_install, execute_uninstall, execute_upgrade,
    execute_upgrade_self,
};
pub use list::{ListArgs, execute_list};
pub use run::{RunArgs, execute_run};
