use super::{read_form, read_model};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_designer::{FormRuntime, ResolvedForm};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Form configuration file (looked up in the forms directory if not found)
    pub form: PathBuf,

    /// JSON file holding the data model
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Print the resolved form as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn eval(args: EvalArgs, cwd: &Path, config: &Config) -> Result<()> {
    let form_path = config.resolve_form(cwd, &args.form);
    let form = read_form(&form_path)?;
    let model = read_model(args.model.as_deref())?;

    let resolved = FormRuntime::resolve(&form, &model);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved.to_json())?);
    } else {
        print_resolved(&form.form_name, &resolved);
    }

    Ok(())
}

fn print_resolved(form_name: &str, resolved: &ResolvedForm) {
    println!("{} {}", "Form".bright_blue().bold(), form_name.bright_white());
    println!();

    println!("{}", "Fields".bold());
    for field in &resolved.fields {
        let Some(name) = &field.field else {
            continue;
        };
        let value = resolved
            .model
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "undefined".to_string());

        let mut flags = Vec::new();
        if field.required {
            flags.push("required".yellow().to_string());
        }
        if field.disabled {
            flags.push("disabled".dimmed().to_string());
        }

        if field.visible {
            println!("  {} {:<16} = {} {}", "●".green(), name, value, flags.join(" "));
        } else {
            println!(
                "  {} {:<16} = {} {}",
                "○".dimmed(),
                name.dimmed(),
                value.dimmed(),
                "hidden".dimmed()
            );
        }
    }

    if !resolved.computed.is_empty() {
        println!();
        println!("{}", "Computed".bold());
        for (name, value) in &resolved.computed {
            println!("  {:<18} = {}", name, value);
        }
    }
}
