/*!
Lifecycle subcommands: install / uninstall / upgrade / upgrade-self.

Thin shims over the external installer (see `pm`). Each command computes a
package reference, runs the installer, and surfaces its exit code verbatim.
The wrapper's own package is guarded: it can only be upgraded through
`upgrade-self`, never uninstalled or upgraded as if it were a plugin.
*/

use anyhow::Result;
use clap::Args;

use crate::config::Paths;
use crate::pm::{self, CargoInstaller, PackageManager, WRAPPER_PACKAGE};
use crate::registry;
use crate::{log_error, log_info};

/// Exit code for refused operations (wrapper self-targeting).
const REFUSED: i32 = 2;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Package source: git+URL[@TAG], local path, or registry name[@VERSION]
    #[arg(value_name = "SOURCE")]
    pub source: String,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Tool name or package name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Tool name, package name, or repo URL
    #[arg(value_name = "SOURCE")]
    pub source: String,
}

pub fn execute_install(args: InstallArgs, paths: &Paths) -> Result<i32> {
    CargoInstaller::new(paths).install(&args.source)
}

pub fn execute_uninstall(args: UninstallArgs, paths: &Paths) -> Result<i32> {
    let snapshot = registry::discover(paths, registry::BUILTIN);
    for diag in snapshot.diagnostics() {
        log_error!("tool load error: {diag}");
    }

    let resolved = snapshot.package_of(&args.name).map(str::to_string);
    let package = resolved.clone().unwrap_or_else(|| args.name.clone());

    if pm::normalize_name(&package) == pm::normalize_name(WRAPPER_PACKAGE) {
        log_error!(
            "refusing to uninstall the wrapper package; \
             provide a tool package name (e.g. firm-ai-hello)"
        );
        return Ok(REFUSED);
    }
    if resolved.is_none() {
        log_info!(
            "could not resolve tool '{}' to a package name; trying the provided name",
            args.name
        );
    }

    let code = CargoInstaller::new(paths).remove(&package)?;
    if code != 0 {
        return Ok(code);
    }
    registry::remove_manifests(paths, &package);
    Ok(0)
}

pub fn execute_upgrade(args: UpgradeArgs, paths: &Paths) -> Result<i32> {
    let mut source = args.source.clone();

    if !pm::is_vcs_or_url(&source) {
        let snapshot = registry::discover(paths, registry::BUILTIN);
        for diag in snapshot.diagnostics() {
            log_error!("tool load error: {diag}");
        }
        if let Some(package) = snapshot.package_of(&source) {
            source = package.to_string();
        }
    }

    if pm::normalize_name(&source) == pm::normalize_name(WRAPPER_PACKAGE) {
        log_error!("refusing to upgrade the wrapper via tool upgrade; use 'firm-ai upgrade-self'");
        return Ok(REFUSED);
    }

    CargoInstaller::new(paths).upgrade(&source)
}

pub fn execute_upgrade_self(paths: &Paths) -> Result<i32> {
    CargoInstaller::new(paths).upgrade_self()
}
