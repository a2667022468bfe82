// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Project configuration parsing.
//!
//! Parses the optional `z80asm.toml` that sits next to the sources being
//! checked. Every field has a default, so a missing file is the same as an
//! empty one.

use camino::Utf8Path;
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs;

use super::check::OutputFormat;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "z80asm.toml";

/// File extensions checked when no configuration says otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["z80asm", "asm"];

/// The top-level structure parsed from `z80asm.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The `[check]` section.
    #[serde(default)]
    pub check: CheckConfig,
}

/// Settings for `z80asm check`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CheckConfig {
    /// Extensions (without the dot) of files collected from directories.
    pub extensions: Vec<String>,
    /// Output format used when `--format` is not given.
    pub format: Option<OutputFormat>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|&ext| ext.to_string()).collect(),
            format: None,
        }
    }
}

impl CheckConfig {
    /// Returns `true` if `path` has one of the configured extensions.
    ///
    /// Extensions compare case-insensitively (`MAIN.ASM` is a source file).
    pub fn matches(&self, path: &Utf8Path) -> bool {
        path.extension().is_some_and(|ext| {
            self.extensions
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
    }
}

/// Parse a `z80asm.toml` file.
///
/// Returns an error if the file cannot be read, is not valid TOML, or
/// contains unknown keys.
pub fn parse_config(path: &Utf8Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read config '{path}'"))?;

    toml::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse config '{path}'"))
}

/// Look for `z80asm.toml` in the given directory and parse it if found.
///
/// Returns `None` if no config file exists.
pub fn find_config(project_root: &Utf8Path) -> Result<Option<Config>> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path
        .try_exists()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to stat config '{config_path}'"))?
    {
        parse_config(&config_path).map(Some)
    } else {
        Ok(None)
    }
}
