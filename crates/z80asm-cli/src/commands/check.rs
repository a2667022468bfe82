// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Check Z80 assembly sources for syntax errors.

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use tracing::{debug, info, instrument};
use z80asm_core::source_analysis::{Diagnostic, parse};

use super::config::{self, CheckConfig};
use crate::diagnostic::SourceDiagnostic;

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered miette reports with source context.
    #[default]
    Text,
    /// One JSON object per diagnostic, one per line.
    Json,
}

/// A diagnostic as written by `--format json`.
#[derive(Debug, Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a str,
    code: &'static str,
    message: &'a str,
    line: u32,
    start_column: u32,
    end_column: u32,
    span_start: u32,
    span_end: u32,
}

impl<'a> JsonDiagnostic<'a> {
    fn new(file: &'a Utf8Path, diagnostic: &'a Diagnostic) -> Self {
        let location = diagnostic.location;
        Self {
            file: file.as_str(),
            code: diagnostic.code.as_str(),
            message: diagnostic.message.as_str(),
            line: location.line(),
            start_column: location.start_column(),
            end_column: location.end_column(),
            span_start: location.start_pos(),
            span_end: location.end_pos(),
        }
    }
}

/// Totals for one `check` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of files parsed.
    pub files: usize,
    /// Number of files with at least one error.
    pub files_with_errors: usize,
    /// Total number of diagnostics.
    pub errors: usize,
}

/// Check assembly source files.
///
/// Diagnostics go to stdout as JSON lines or to stderr as rendered reports.
/// Fails when any file has errors.
#[instrument(skip_all, fields(path = %path))]
pub fn check(path: &str, format: Option<OutputFormat>) -> Result<()> {
    info!("Starting check");
    let source_path = Utf8PathBuf::from(path);

    // For directory input the config lives in the directory, for file input in its parent
    let project_root = if source_path.is_dir() {
        source_path.clone()
    } else {
        source_path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf)
    };

    let config = config::find_config(&project_root)?.unwrap_or_default();
    let format = format.or(config.check.format).unwrap_or_default();
    debug!(?format, extensions = ?config.check.extensions, "Resolved check settings");

    let source_files = find_source_files(&source_path, &config.check)?;
    if source_files.is_empty() {
        miette::bail!("No assembly source files found in '{path}'");
    }
    info!(count = source_files.len(), "Found source files");

    let summary = match format {
        OutputFormat::Json => check_files(&source_files, format, &mut std::io::stdout().lock())?,
        OutputFormat::Text => check_files(&source_files, format, &mut std::io::stderr().lock())?,
    };

    if summary.errors > 0 {
        miette::bail!(
            "{} error(s) found in {} file(s)",
            summary.errors,
            summary.files_with_errors
        );
    }

    info!(files = summary.files, "Check passed");
    Ok(())
}

/// Parse every file and write its diagnostics to `out`.
pub fn check_files(
    files: &[Utf8PathBuf],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<CheckSummary> {
    let mut summary = CheckSummary::default();

    for file in files {
        let source = fs::read_to_string(file)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read file '{file}'"))?;

        let result = parse(&source);
        debug!(
            file = %file,
            lines = result.assembly_lines.len(),
            errors = result.errors.len(),
            "Parsed file"
        );

        summary.files += 1;
        if result.has_errors() {
            summary.files_with_errors += 1;
            summary.errors += result.errors.len();
        }

        for diagnostic in &result.errors {
            match format {
                OutputFormat::Json => {
                    let line = serde_json::to_string(&JsonDiagnostic::new(file, diagnostic))
                        .into_diagnostic()?;
                    writeln!(out, "{line}").into_diagnostic()?;
                }
                OutputFormat::Text => {
                    let report = miette::Report::new(SourceDiagnostic::from_core_diagnostic(
                        diagnostic,
                        file.as_str(),
                        &source,
                    ));
                    writeln!(out, "{report:?}").into_diagnostic()?;
                }
            }
        }
    }

    Ok(summary)
}

/// Resolve the files to check.
///
/// An explicit file is always checked; directories are searched for files
/// with a configured extension.
fn find_source_files(path: &Utf8Path, config: &CheckConfig) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        collect_source_files_recursive(path, config, &mut files)?;
    } else {
        miette::bail!("Path '{}' does not exist", path);
    }

    // Stable output regardless of directory iteration order
    files.sort();
    Ok(files)
}

/// Recursively collect source files from a directory tree.
///
/// Symlinks are skipped to avoid potential infinite recursion from circular links.
fn collect_source_files_recursive(
    dir: &Utf8Path,
    config: &CheckConfig,
    files: &mut Vec<Utf8PathBuf>,
) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_source_files_recursive(&entry_path, config, files)?;
        } else if file_type.is_file() && config.matches(&entry_path) {
            files.push(entry_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    fn run_check(files: &[Utf8PathBuf], format: OutputFormat) -> (CheckSummary, String) {
        let mut out = Vec::new();
        let summary = check_files(files, format, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_find_source_files_recurses_by_extension() {
        let (_temp, root) = temp_root();
        fs::create_dir_all(root.join("lib/sprites")).unwrap();
        fs::write(root.join("main.asm"), "nop\n").unwrap();
        fs::write(root.join("lib/sprites/draw.z80asm"), "halt\n").unwrap();
        fs::write(root.join("lib/readme.txt"), "not assembly").unwrap();

        let files = find_source_files(&root, &CheckConfig::default()).unwrap();
        assert_eq!(
            files,
            vec![root.join("lib/sprites/draw.z80asm"), root.join("main.asm")]
        );
    }

    #[test]
    fn test_find_source_files_uses_configured_extensions() {
        let (_temp, root) = temp_root();
        fs::write(root.join("main.asm"), "nop\n").unwrap();
        fs::write(root.join("boot.z80"), "nop\n").unwrap();

        let config = CheckConfig {
            extensions: vec!["z80".to_string()],
            format: None,
        };
        let files = find_source_files(&root, &config).unwrap();
        assert_eq!(files, vec![root.join("boot.z80")]);
    }

    #[test]
    fn test_explicit_file_is_checked_regardless_of_extension() {
        let (_temp, root) = temp_root();
        let file = root.join("boot.inc");
        fs::write(&file, "nop\n").unwrap();

        let files = find_source_files(&file, &CheckConfig::default()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let (_temp, root) = temp_root();
        let err = find_source_files(&root.join("missing"), &CheckConfig::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let (_temp, root) = temp_root();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.asm"), "nop\n").unwrap();
        std::os::unix::fs::symlink(root.join("src"), root.join("src/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("src/main.asm"), root.join("alias.asm")).unwrap();

        let files = find_source_files(&root, &CheckConfig::default()).unwrap();
        assert_eq!(files, vec![root.join("src/main.asm")]);
    }

    #[test]
    fn test_clean_files_report_nothing() {
        let (_temp, root) = temp_root();
        let file = root.join("main.asm");
        fs::write(&file, "start: ld a,(ix+2)\n  djnz start\n").unwrap();

        let (summary, output) = run_check(&[file], OutputFormat::Text);
        assert_eq!(
            summary,
            CheckSummary {
                files: 1,
                files_with_errors: 0,
                errors: 0
            }
        );
        assert!(output.is_empty());
    }

    #[test]
    fn test_json_output_one_object_per_diagnostic() {
        let (_temp, root) = temp_root();
        let bad = root.join("bad.asm");
        let good = root.join("good.asm");
        fs::write(&bad, "nop\nld a,\nhalt\nld a,\n").unwrap();
        fs::write(&good, "nop\n").unwrap();

        let (summary, output) = run_check(&[bad.clone(), good], OutputFormat::Json);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.files_with_errors, 1);
        assert_eq!(summary.errors, 2);

        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["file"], bad.as_str());
        assert_eq!(lines[0]["code"], "Z1012");
        assert_eq!(lines[0]["line"], 2);
        assert_eq!(lines[1]["line"], 4);
        for line in &lines {
            assert!(line["message"].as_str().is_some_and(|m| !m.is_empty()));
            assert!(line["span_start"].as_u64() <= line["span_end"].as_u64());
            assert!(line.get("start_column").is_some());
            assert!(line.get("end_column").is_some());
        }
    }

    #[test]
    fn test_text_output_names_file_and_code() {
        let (_temp, root) = temp_root();
        let file = root.join("bad.asm");
        fs::write(&file, "ld a,\n").unwrap();

        let (summary, output) = run_check(&[file], OutputFormat::Text);
        assert_eq!(summary.errors, 1);
        assert!(output.contains("Z1012"), "output was {output}");
        assert!(output.contains("bad.asm"), "output was {output}");
    }

    #[test]
    fn test_check_fails_with_summary() {
        let (_temp, root) = temp_root();
        fs::write(root.join("bad.asm"), "ld a,\nld b,\n").unwrap();
        fs::write(root.join("z80asm.toml"), "[check]\nformat = \"json\"\n").unwrap();

        let err = check(root.as_str(), None).unwrap_err();
        assert_eq!(err.to_string(), "2 error(s) found in 1 file(s)");
    }

    #[test]
    fn test_check_passes_clean_directory() {
        let (_temp, root) = temp_root();
        fs::write(root.join("main.asm"), "org #8000\nstart: halt\n").unwrap();

        assert!(check(root.as_str(), Some(OutputFormat::Json)).is_ok());
    }

    #[test]
    fn test_check_empty_directory_fails() {
        let (_temp, root) = temp_root();
        let err = check(root.as_str(), None).unwrap_err();
        assert!(err.to_string().contains("No assembly source files"));
    }

    #[test]
    fn test_check_rejects_malformed_config() {
        let (_temp, root) = temp_root();
        fs::write(root.join("main.asm"), "nop\n").unwrap();
        fs::write(root.join("z80asm.toml"), "[check]\ncolour = true\n").unwrap();

        assert!(check(root.as_str(), None).is_err());
    }
}
