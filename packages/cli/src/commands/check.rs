use super::read_form;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_designer::{validate_form, ComponentRegistry, Diagnostic, DiagnosticLevel};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Form file or directory of forms (defaults to the forms directory)
    pub input: Option<PathBuf>,

    /// Print diagnostics as JSON
    #[arg(long)]
    pub json: bool,
}

/// Totals across every checked form
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Diagnostics reported for one form file
#[derive(Debug)]
pub struct FormReport {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn check(
    args: CheckArgs,
    cwd: &Path,
    config: &Config,
    registry: &ComponentRegistry,
) -> Result<()> {
    let input = match &args.input {
        Some(input) => cwd.join(input),
        None => config.forms_dir(cwd),
    };

    let reports = check_path(&input, registry)?;
    let summary = summarize(&reports);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_document(&reports)?)?);
    } else {
        for report in &reports {
            print_report(report);
        }
        print_summary(&summary);
    }

    if summary.errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Check one form file, or every `.json` form under a directory
pub fn check_path(input: &Path, registry: &ComponentRegistry) -> Result<Vec<FormReport>> {
    let files = if input.is_file() {
        vec![input.to_path_buf()]
    } else if input.is_dir() {
        find_form_files(input)
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display());
    };

    Ok(files
        .into_iter()
        .map(|file| {
            let diagnostics = match read_form(&file) {
                Ok(form) => validate_form(&form, registry),
                Err(err) => vec![Diagnostic::error("invalid-form", format!("{:#}", err), "")],
            };
            FormReport { file, diagnostics }
        })
        .collect())
}

pub fn summarize(reports: &[FormReport]) -> CheckSummary {
    let mut summary = CheckSummary {
        files: reports.len(),
        ..CheckSummary::default()
    };
    for diagnostic in reports.iter().flat_map(|r| &r.diagnostics) {
        match diagnostic.level {
            DiagnosticLevel::Error => summary.errors += 1,
            DiagnosticLevel::Warning => summary.warnings += 1,
        }
    }
    summary
}

/// A single `{file: diagnostics}` document for machine consumers
pub fn json_document(reports: &[FormReport]) -> Result<serde_json::Value> {
    let mut files = serde_json::Map::new();
    for report in reports {
        files.insert(
            report.file.display().to_string(),
            serde_json::to_value(&report.diagnostics)?,
        );
    }
    Ok(serde_json::Value::Object(files))
}

fn print_report(report: &FormReport) {
    if report.diagnostics.is_empty() {
        println!("{} {}", "✓".green(), report.file.display());
        return;
    }

    println!("{}", report.file.display());
    for diagnostic in &report.diagnostics {
        let level = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
        };
        println!("  {} [{}] {}", level, diagnostic.rule, diagnostic.message);
        if !diagnostic.location.is_empty() {
            println!("    {} {}", "at".dimmed(), diagnostic.location.dimmed());
        }
    }
    println!();
}

fn print_summary(summary: &CheckSummary) {
    println!();
    println!(
        "✨ {} Checking complete!",
        if summary.errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Forms checked: {}", summary.files);
    if summary.errors > 0 {
        println!("   {} {}", "Errors:".red(), summary.errors);
    }
    if summary.warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), summary.warnings);
    }
    if summary.errors == 0 && summary.warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }
}

fn find_form_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().map_or(false, |e| e == "json"))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_check_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("good.json"),
            r#"{"components": [{"id": "a", "typeKey": "text", "field": "name"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"{"components": [{"id": "a", "typeKey": "text", "field": "name", "hidden": "model.x >"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = ComponentRegistry::with_builtin_components();
        let summary = summarize(&check_path(dir.path(), &registry).unwrap());

        assert_eq!(
            summary,
            CheckSummary {
                files: 2,
                errors: 1,
                warnings: 0
            }
        );
    }

    #[test]
    fn test_unreadable_form_counts_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let registry = ComponentRegistry::with_builtin_components();
        let summary = summarize(&check_path(&path, &registry).unwrap());
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_missing_input() {
        let registry = ComponentRegistry::with_builtin_components();
        assert!(check_path(Path::new("/definitely/not/here"), &registry).is_err());
    }

    #[test]
    fn test_json_document_keys_diagnostics_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        fs::write(
            &good,
            r#"{"components": [{"id": "a", "typeKey": "text", "field": "name"}]}"#,
        )
        .unwrap();
        fs::write(
            &bad,
            r#"{"components": [{"id": "a", "typeKey": "text", "field": "name", "hidden": "model.x >"}]}"#,
        )
        .unwrap();

        let registry = ComponentRegistry::with_builtin_components();
        let document = json_document(&check_path(dir.path(), &registry).unwrap()).unwrap();

        let rendered = serde_json::to_string_pretty(&document).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, document);

        let files = document.as_object().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[&good.display().to_string()], serde_json::json!([]));
        let diagnostics = files[&bad.display().to_string()].as_array().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0]["rule"], "expression-syntax");
    }
}
