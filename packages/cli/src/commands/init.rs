use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_designer::{
    AssignmentExpression, ComponentRegistry, ComputedVariable, DesignerOptions, DesignerResult,
    DesignerSession, Flag, FormConfiguration,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const SAMPLE_FORM_NAME: &str = "leave_request.json";

const INCLUSIVE_DAYS: &str = "model.startDate && model.endDate ? Math.ceil((new Date(model.endDate) - new Date(model.startDate)) / (1000 * 60 * 60 * 24)) + 1 : 1";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for form configurations
    #[arg(short, long, default_value = "forms")]
    pub forms_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(
    args: InitArgs,
    cwd: &Path,
    current: &Config,
    registry: Arc<ComponentRegistry>,
) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Formwork project...".bright_blue().bold()
    );

    // Designer settings survive a forced re-init
    let config = Config {
        forms_dir: args.forms_dir.clone(),
        ..current.clone()
    };

    let forms_dir = config.forms_dir(cwd);
    if !forms_dir.exists() {
        fs::create_dir_all(&forms_dir)?;
        println!("  {} Created {}/", "✓".green(), args.forms_dir);
    }

    let sample_path = forms_dir.join(SAMPLE_FORM_NAME);
    if !sample_path.exists() {
        let form = sample_form(registry, config.designer_options())?;
        fs::write(&sample_path, form.to_json()?)?;
        println!("  {} Created {}", "✓".green(), SAMPLE_FORM_NAME);
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/{}", args.forms_dir, SAMPLE_FORM_NAME);
    println!("  2. Run: formwork check");
    println!("  3. Run: formwork eval {}", SAMPLE_FORM_NAME);

    Ok(())
}

/// A leave request form assembled the way a designer user would build it
pub fn sample_form(
    registry: Arc<ComponentRegistry>,
    options: DesignerOptions,
) -> DesignerResult<FormConfiguration> {
    let mut session = DesignerSession::new(
        registry,
        FormConfiguration::new("leave_request", "Leave Request"),
        options,
    );

    let name = session.drop_component("text")?;
    session.update_component(&name, |c| {
        c.field = "employeeName".to_string();
        c.label = "Employee".to_string();
        c.required = Flag::Static(true);
    })?;

    let leave_type = session.drop_component("select")?;
    session.update_component(&leave_type, |c| {
        c.field = "leaveType".to_string();
        c.label = "Leave Type".to_string();
        c.default_value = Some(json!("annual"));
        c.props.insert(
            "options".to_string(),
            json!([
                {"label": "Annual", "value": "annual"},
                {"label": "Sick", "value": "sick"},
                {"label": "Personal", "value": "personal"}
            ]),
        );
    })?;

    let row = session.drop_component("row")?;
    session.update_component(&row, |c| c.label = "Dates".to_string())?;
    for (field, label) in [("startDate", "Start Date"), ("endDate", "End Date")] {
        let id = session.drop_into(&row, None, "date")?;
        session.update_component(&id, |c| {
            c.field = field.to_string();
            c.label = label.to_string();
            c.span = 12;
            c.required = Flag::Static(true);
        })?;
    }

    let days = session.drop_component("number")?;
    session.update_component(&days, |c| {
        c.field = "days".to_string();
        c.label = "Days".to_string();
        c.disabled = Flag::Static(true);
        c.default_value = Some(json!(1));
    })?;

    let reason = session.drop_component("textarea")?;
    session.update_component(&reason, |c| {
        c.field = "reason".to_string();
        c.label = "Reason".to_string();
        c.hidden = Flag::from("!needsReason");
        c.required = Flag::from("needsReason");
    })?;

    session.set_computed_variables(vec![
        ComputedVariable::new("calculatedDays", INCLUSIVE_DAYS),
        ComputedVariable::new("needsReason", "model.leaveType !== 'annual'"),
    ]);
    session.set_expressions(vec![AssignmentExpression::new(
        "days",
        "computed.calculatedDays",
    )]);

    Ok(session.into_form())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_designer::{validate_form, FormRuntime};

    fn registry() -> Arc<ComponentRegistry> {
        Arc::new(ComponentRegistry::with_builtin_components())
    }

    #[test]
    fn test_sample_form_is_valid() {
        let registry = registry();
        let form = sample_form(Arc::clone(&registry), DesignerOptions::default()).unwrap();

        assert!(validate_form(&form, &registry).is_empty());
        assert_eq!(
            form.field_names(),
            vec!["employeeName", "leaveType", "startDate", "endDate", "days", "reason"]
        );
    }

    #[test]
    fn test_sample_form_resolves_days() {
        let form = sample_form(registry(), DesignerOptions::default()).unwrap();
        let model = json!({"startDate": "2024-01-01", "endDate": "2024-01-05"})
            .as_object()
            .cloned()
            .unwrap();

        let resolved = FormRuntime::resolve(&form, &model);
        assert_eq!(resolved.model["days"], json!(5));
        assert!(!resolved.field("reason").unwrap().visible);
    }

    #[test]
    fn test_init_writes_config_and_sample() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            forms_dir: "forms".to_string(),
            force: false,
        };
        init(args, dir.path(), &Config::default(), registry()).unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());

        let sample = fs::read_to_string(dir.path().join("forms").join(SAMPLE_FORM_NAME)).unwrap();
        let form = FormConfiguration::from_json(&sample).unwrap();
        assert_eq!(form.form_key, "leave_request");
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"formsDir": "custom"}"#).unwrap();

        let args = InitArgs {
            forms_dir: "forms".to_string(),
            force: false,
        };
        let current = Config::load(dir.path()).unwrap();
        init(args, dir.path(), &current, registry()).unwrap();

        assert_eq!(Config::load(dir.path()).unwrap().forms_dir, "custom");
        assert!(!dir.path().join("forms").exists());
    }

    #[test]
    fn test_forced_init_keeps_designer_settings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{"historyCapacity": 5, "defaultSpan": 12}"#,
        )
        .unwrap();

        let current = Config::load(dir.path()).unwrap();
        let args = InitArgs {
            forms_dir: "forms".to_string(),
            force: true,
        };
        init(args, dir.path(), &current, registry()).unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.default_span, 12);

        let sample = fs::read_to_string(dir.path().join("forms").join(SAMPLE_FORM_NAME)).unwrap();
        let form = FormConfiguration::from_json(&sample).unwrap();
        assert_eq!(form.find_by_field("employeeName").unwrap().span, 12);
    }
}
