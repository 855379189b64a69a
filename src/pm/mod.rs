/*!
External package manager boundary.

Lifecycle commands are thin shims over an installer subprocess (`cargo` by
default, overridable via `FIRM_AI_INSTALLER`). The wrapper computes installer
arguments from a user-supplied package reference and passes the child's exit
status through verbatim: no retries, no output reinterpretation.

Supported reference forms:
  git+URL[@TAG]     -> install --git URL [--tag TAG]
  http(s)://URL     -> install --git URL
  existing path     -> install --path PATH
  NAME[@VERSION]    -> install NAME [--version VERSION]
*/

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::Paths;
use crate::log_debug;

/// The wrapper's own package identity. Lifecycle commands refuse to touch it
/// except through `upgrade-self`.
pub const WRAPPER_PACKAGE: &str = "firm-ai";

/// Environment override for the installer program.
pub const INSTALLER_ENV: &str = "FIRM_AI_INSTALLER";

const DEFAULT_INSTALLER: &str = "cargo";

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("installer '{0}' is not available; install cargo or set {INSTALLER_ENV}")]
    Missing(String),
}

/// Collaborator interface for the external installer. Every method returns
/// the child's exit code unchanged.
pub trait PackageManager {
    fn install(&self, source: &str) -> Result<i32>;
    fn remove(&self, package: &str) -> Result<i32>;
    fn upgrade(&self, source: &str) -> Result<i32>;
    fn upgrade_self(&self) -> Result<i32>;
}

/// Shells out to `cargo install` / `cargo uninstall`, rooted at the wrapper
/// home so plugin binaries land in `<home>/bin`.
pub struct CargoInstaller {
    program: String,
    root: PathBuf,
}

impl CargoInstaller {
    pub fn new(paths: &Paths) -> Self {
        let program = std::env::var(INSTALLER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INSTALLER.to_string());
        CargoInstaller {
            program,
            root: paths.home.clone(),
        }
    }

    fn run(&self, args: &[String]) -> Result<i32> {
        log_debug!("installer: {} {}", self.program, args.join(" "));
        match Command::new(&self.program).args(args).status() {
            Ok(status) => Ok(status.code().unwrap_or(1)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(InstallerError::Missing(self.program.clone()).into())
            }
            Err(err) => Err(err).with_context(|| {
                format!("failed to run installer '{}'", self.program)
            }),
        }
    }

    fn root_args(&self) -> [String; 2] {
        ["--root".to_string(), self.root.display().to_string()]
    }
}

impl PackageManager for CargoInstaller {
    fn install(&self, source: &str) -> Result<i32> {
        let mut args = vec!["install".to_string()];
        args.extend(self.root_args());
        args.extend(reference_args(source));
        self.run(&args)
    }

    fn remove(&self, package: &str) -> Result<i32> {
        let mut args = vec!["uninstall".to_string()];
        args.extend(self.root_args());
        args.push(package.to_string());
        self.run(&args)
    }

    fn upgrade(&self, source: &str) -> Result<i32> {
        let mut args = vec!["install".to_string(), "--force".to_string()];
        args.extend(self.root_args());
        args.extend(reference_args(source));
        self.run(&args)
    }

    fn upgrade_self(&self) -> Result<i32> {
        // The wrapper lives wherever the user installed it, not under our
        // root, so no --root here.
        self.run(&[
            "install".to_string(),
            "--force".to_string(),
            WRAPPER_PACKAGE.to_string(),
        ])
    }
}

/// Compute the source-specific installer arguments for a package reference.
pub fn reference_args(source: &str) -> Vec<String> {
    if let Some(rest) = source.strip_prefix("git+") {
        let (url, tag) = split_version(rest);
        let mut args = vec!["--git".to_string(), url.to_string()];
        if let Some(tag) = tag {
            args.push("--tag".to_string());
            args.push(tag.to_string());
        }
        return args;
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return vec!["--git".to_string(), source.to_string()];
    }
    if looks_like_path(source) {
        return vec!["--path".to_string(), source.to_string()];
    }
    let (name, version) = split_version(source);
    let mut args = vec![name.to_string()];
    if let Some(version) = version {
        args.push("--version".to_string());
        args.push(version.to_string());
    }
    args
}

/// Is this reference a VCS URL rather than a name the registry can resolve?
pub fn is_vcs_or_url(source: &str) -> bool {
    source.starts_with("git+") || source.starts_with("http://") || source.starts_with("https://")
}

/// Package names compare case-insensitively with `_` and `-` interchangeable.
pub fn normalize_name(name: &str) -> String {
    name.replace('_', "-").to_ascii_lowercase()
}

/// Split a trailing `@version` off a reference. An `@` followed by a `/`
/// (as in `ssh://git@host/...`) is part of the locator, not a version.
fn split_version(reference: &str) -> (&str, Option<&str>) {
    match reference.rsplit_once('@') {
        Some((base, version)) if !version.is_empty() && !version.contains('/') => {
            (base, Some(version))
        }
        _ => (reference, None),
    }
}

fn looks_like_path(source: &str) -> bool {
    source.starts_with("./")
        || source.starts_with("../")
        || source.starts_with('/')
        || Path::new(source).exists()
}
