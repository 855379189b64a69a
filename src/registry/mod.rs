/*!
Plugin registry: discovery of installed tools.

Two deterministic discovery sources feed one snapshot per CLI invocation:

  1. A startup-time registration list (`Registration`): package name plus a
     loader function producing a `Tool`. The shipped binary compiles in an
     empty list (`BUILTIN`); tests and embedders extend discovery through the
     `registrations` argument.
  2. TOML manifests under `<home>/tools.d/`, one per installed plugin
     package. A manifest advertises membership via the `group` key; files
     declaring a different group are not members and are skipped.

Failure isolation: a loader error, unreadable file, malformed TOML, or
invalid `[[tool]]` entry becomes a `Diagnostic` and discovery continues. A
name claimed by more than one entry is a conflict; all contenders for that
name are excluded and the conflict is reported. Discovery never mutates
installed state.

Manifest shape:

```toml
group = "firm-ai.tools"
package = "firm-ai-hello"

[[tool]]
name = "hello"
description = "Say hello"
entry = "firm-ai-hello --greeting"
```
*/

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::config::Paths;
use crate::log_debug;
use crate::plugin::{Tool, ToolEntry};
use crate::pm::normalize_name;

/// Extension group key manifests must declare to be discovered.
pub const EXTENSION_GROUP: &str = "firm-ai.tools";

/// A startup-time registration: one package contributing one tool through an
/// in-process loader.
pub struct Registration {
    pub package: &'static str,
    pub load: fn() -> Result<Tool>,
}

/// Registrations compiled into the wrapper binary. Empty by design: shipped
/// tools arrive as plugin packages with manifests.
pub const BUILTIN: &[Registration] = &[];

/// Why a plugin entry was left out of the snapshot. Diagnostics are data,
/// never fatal; the CLI prints them to stderr.
#[derive(Debug)]
pub enum Diagnostic {
    LoadFailed { package: String, reason: String },
    NameConflict { name: String, packages: Vec<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LoadFailed { package, reason } => {
                write!(f, "{package}: {reason}")
            }
            Diagnostic::NameConflict { name, packages } => {
                write!(
                    f,
                    "tool name '{name}' claimed by {}; all contenders excluded",
                    packages.join(", ")
                )
            }
        }
    }
}

/// Result of one discovery pass, valid for the lifetime of one invocation.
/// Tool names map to descriptors in sorted order; `packages` remembers each
/// tool's backing package for diagnostics and `uninstall` resolution.
pub struct Snapshot {
    tools: BTreeMap<String, Tool>,
    packages: BTreeMap<String, String>,
    diagnostics: Vec<Diagnostic>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Sorted iteration over descriptors.
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Sorted tool names, for `run` guidance and stable `list` output.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Backing package of a tool, if the name resolved cleanly.
    pub fn package_of(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Enumerate all discoverable tools and build a fresh snapshot.
pub fn discover(paths: &Paths, registrations: &[Registration]) -> Snapshot {
    let mut loaded: Vec<(String, Tool)> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for reg in registrations {
        match (reg.load)() {
            Ok(tool) => loaded.push((reg.package.to_string(), tool)),
            Err(err) => diagnostics.push(Diagnostic::LoadFailed {
                package: reg.package.to_string(),
                reason: format!("{err:#}"),
            }),
        }
    }

    for path in manifest_files(&paths.tools_dir) {
        scan_manifest(&path, paths, &mut loaded, &mut diagnostics);
    }

    // Conflict pass: a name claimed more than once excludes every contender.
    let mut by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, (_, tool)) in loaded.iter().enumerate() {
        by_name.entry(tool.name().to_string()).or_default().push(idx);
    }

    let mut tools = BTreeMap::new();
    let mut packages = BTreeMap::new();
    for (name, indices) in by_name {
        if indices.len() > 1 {
            diagnostics.push(Diagnostic::NameConflict {
                name,
                packages: indices.iter().map(|&i| loaded[i].0.clone()).collect(),
            });
            continue;
        }
        let (package, tool) = loaded[indices[0]].clone();
        packages.insert(name.clone(), package);
        tools.insert(name, tool);
    }

    Snapshot {
        tools,
        packages,
        diagnostics,
    }
}

/// Remove the manifest(s) advertising `package`, so a just-uninstalled
/// package's tools stop appearing. Returns the number of files removed.
pub fn remove_manifests(paths: &Paths, package: &str) -> usize {
    let normalized = normalize_name(package);
    let mut removed = 0;
    for path in manifest_files(&paths.tools_dir) {
        let Ok(raw) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(manifest) = toml::from_str::<Manifest>(&raw) else {
            continue;
        };
        if normalize_name(&manifest.package) == normalized && fs::remove_file(&path).is_ok() {
            log_debug!("removed manifest {}", path.display());
            removed += 1;
        }
    }
    removed
}

#[derive(Debug, Deserialize)]
struct Manifest {
    group: String,
    package: String,
    #[serde(default, rename = "tool")]
    tools: Vec<ManifestTool>,
}

#[derive(Debug, Deserialize)]
struct ManifestTool {
    name: String,
    #[serde(default)]
    description: String,
    entry: String,
}

/// Manifest files in file-name order so discovery is deterministic.
fn manifest_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        // A fresh home has no tools.d yet; nothing installed, nothing to load.
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();
    files
}

fn scan_manifest(
    path: &Path,
    paths: &Paths,
    loaded: &mut Vec<(String, Tool)>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let file_label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            diagnostics.push(Diagnostic::LoadFailed {
                package: file_label,
                reason: format!("manifest unreadable: {err}"),
            });
            return;
        }
    };

    let manifest: Manifest = match toml::from_str(&raw) {
        Ok(manifest) => manifest,
        Err(err) => {
            diagnostics.push(Diagnostic::LoadFailed {
                package: file_label,
                reason: format!("manifest parse error: {err}"),
            });
            return;
        }
    };

    if manifest.group != EXTENSION_GROUP {
        // Not a member of our extension group.
        log_debug!(
            "skipping {}: group '{}' is not '{EXTENSION_GROUP}'",
            path.display(),
            manifest.group
        );
        return;
    }

    for spec in manifest.tools {
        match load_manifest_tool(spec, paths) {
            Ok(tool) => loaded.push((manifest.package.clone(), tool)),
            Err(err) => diagnostics.push(Diagnostic::LoadFailed {
                package: manifest.package.clone(),
                reason: format!("{err:#}"),
            }),
        }
    }
}

fn load_manifest_tool(spec: ManifestTool, paths: &Paths) -> Result<Tool> {
    let words = shell_words::split(&spec.entry)
        .with_context(|| format!("tool '{}': entry is not a valid command line", spec.name))?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| anyhow!("tool '{}': entry command must be non-empty", spec.name))?;
    let entry = ToolEntry::Command {
        program: resolve_program(program, &paths.bin_dir),
        args: args.to_vec(),
    };
    Ok(Tool::new(spec.name, spec.description, entry)?)
}

/// Bare program names installed by the package manager live under
/// `<home>/bin`; prefer that copy when present, else rely on PATH.
fn resolve_program(program: &str, bin_dir: &Path) -> String {
    if !program.contains(std::path::MAIN_SEPARATOR) {
        let candidate = bin_dir.join(program);
        if candidate.is_file() {
            return candidate.to_string_lossy().into_owned();
        }
    }
    program.to_string()
}
