use formwork_designer::{DesignerOptions, DEFAULT_HISTORY_CAPACITY, DEFAULT_SPAN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "formwork.config.json";

/// Formwork configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory containing form configuration documents
    #[serde(default = "default_forms_dir")]
    pub forms_dir: String,

    /// Undo snapshots kept per designer session.
    ///
    /// Only `formwork init` opens a designer session, so this and
    /// `default_span` shape the scaffolded sample form; `eval` and `check`
    /// read finished forms and ignore both.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Grid span given to components the designer creates
    #[serde(default = "default_span")]
    pub default_span: u8,
}

fn default_forms_dir() -> String {
    "forms".to_string()
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_span() -> u8 {
    DEFAULT_SPAN
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute path to the forms directory
    pub fn forms_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.forms_dir)
    }

    /// Resolve a form argument: as given, else relative to the forms directory
    pub fn resolve_form(&self, cwd: &Path, form: &Path) -> PathBuf {
        let direct = cwd.join(form);
        if direct.exists() {
            return direct;
        }

        let in_forms_dir = self.forms_dir(cwd).join(form);
        if in_forms_dir.exists() {
            in_forms_dir
        } else {
            direct
        }
    }

    pub fn designer_options(&self) -> DesignerOptions {
        DesignerOptions {
            history_capacity: self.history_capacity,
            default_span: self.default_span,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forms_dir: default_forms_dir(),
            history_capacity: default_history_capacity(),
            default_span: default_span(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "formsDir": "definitions",
            "historyCapacity": 20,
            "defaultSpan": 12
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.forms_dir, "definitions");
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.default_span, 12);
        assert_eq!(config.designer_options().history_capacity, 20);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.forms_dir, "forms");
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.default_span, 24);
    }

    #[test]
    fn test_load_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_resolve_form_falls_back_to_forms_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("forms")).unwrap();
        std::fs::write(dir.path().join("forms/leave.json"), "{}").unwrap();

        let config = Config::default();
        assert_eq!(
            config.resolve_form(dir.path(), Path::new("leave.json")),
            dir.path().join("forms/leave.json")
        );
    }
}
