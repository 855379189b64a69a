//! Wrapper home-directory resolution.
//!
//! Precedence: `--home` flag > `FIRM_AI_HOME` env > `~/.firm-ai`.
//!
//! Layout under the home directory:
//!   tools.d/   one TOML manifest per installed plugin package
//!   bin/       binaries placed by the external installer (`--root <home>`)

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment fallback for the home directory when `--home` is not given.
pub const HOME_ENV: &str = "FIRM_AI_HOME";

const DEFAULT_DIR: &str = ".firm-ai";
const TOOLS_DIR: &str = "tools.d";
const BIN_DIR: &str = "bin";

/// Resolved filesystem locations for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    /// Directory scanned for tool manifests.
    pub tools_dir: PathBuf,
    /// Directory the installer drops plugin binaries into.
    pub bin_dir: PathBuf,
}

impl Paths {
    pub fn at(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Paths {
            tools_dir: home.join(TOOLS_DIR),
            bin_dir: home.join(BIN_DIR),
            home,
        }
    }

    /// Resolve the effective home directory for this process.
    pub fn resolve(flag: Option<&str>) -> Result<Self> {
        if let Some(p) = flag
            && !p.trim().is_empty()
        {
            return Ok(Paths::at(p.trim()));
        }
        if let Ok(env_home) = std::env::var(HOME_ENV)
            && !env_home.trim().is_empty()
        {
            return Ok(Paths::at(env_home.trim()));
        }
        let base = dirs::home_dir().context("could not determine the user home directory")?;
        Ok(Paths::at(base.join(DEFAULT_DIR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_home() {
        let paths = Paths::at("/tmp/firm-home");
        assert_eq!(paths.home, PathBuf::from("/tmp/firm-home"));
        assert_eq!(paths.tools_dir, PathBuf::from("/tmp/firm-home/tools.d"));
        assert_eq!(paths.bin_dir, PathBuf::from("/tmp/firm-home/bin"));
    }

    #[test]
    fn flag_takes_precedence() {
        let paths = Paths::resolve(Some("/tmp/explicit")).unwrap();
        assert_eq!(paths.home, PathBuf::from("/tmp/explicit"));
    }

    #[test]
    fn blank_flag_is_ignored() {
        // A blank flag falls through to env/default resolution rather than
        // producing an empty home path.
        let paths = Paths::resolve(Some("   ")).unwrap();
        assert_ne!(paths.home, PathBuf::from(""));
    }
}
