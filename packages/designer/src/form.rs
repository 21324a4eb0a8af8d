//! # Form Configuration
//!
//! The persisted shape of a designed form: an ordered tree of
//! [`ComponentInstance`]s plus form-level computed variables and assignment
//! rules. This is the document that round-trips through JSON and the unit the
//! designer snapshots into history.
//!
//! ```json
//! {
//!   "formKey": "leave_request",
//!   "formName": "Leave Request",
//!   "components": [
//!     {"id": "comp_1", "typeKey": "date", "field": "startDate", "label": "Start", "span": 12}
//!   ],
//!   "computedVariables": [{"name": "days", "expression": "..."}],
//!   "expressions": [{"target": "days", "value": "computed.days"}]
//! }
//! ```
//!
//! Containers hold their children inline: rows under `children`, tabs under
//! `tabs[n].children`.

use crate::errors::{DesignerError, DesignerResult};
use formwork_expression::{AssignmentExpression, ComputedVariable, Model};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A boolean component property that is either fixed or an expression
///
/// `"allowEdit"`, `"!allowEdit"` and `"model.amount > 1000"` are all valid
/// expression flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Static(bool),
    Expression(String),
}

impl Flag {
    pub fn is_static_false(&self) -> bool {
        matches!(self, Flag::Static(false))
    }

    pub fn expression(&self) -> Option<&str> {
        match self {
            Flag::Expression(source) => Some(source),
            Flag::Static(_) => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Flag::Static(value) => JsonValue::Bool(*value),
            Flag::Expression(source) => JsonValue::String(source.clone()),
        }
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Static(false)
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::Static(value)
    }
}

impl From<&str> for Flag {
    fn from(source: &str) -> Self {
        Flag::Expression(source.to_string())
    }
}

/// One pane of a tabs container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabPane {
    pub label: String,
    #[serde(default)]
    pub children: Vec<ComponentInstance>,
}

impl TabPane {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

fn default_span() -> u8 {
    24
}

/// A placed occurrence of a component within one form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    pub id: String,
    pub type_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    /// Model key this component reads and writes; empty for pure layout
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_span")]
    pub span: u8,
    #[serde(default)]
    pub offset: u8,
    #[serde(default)]
    pub required: Flag,
    #[serde(default)]
    pub disabled: Flag,
    #[serde(default, skip_serializing_if = "Flag::is_static_false")]
    pub hidden: Flag,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
    /// Row container children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ComponentInstance>>,
    /// Tabs container panes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<TabPane>>,
    /// Component-specific props (`clearable`, `options`, `rows`, ...)
    #[serde(flatten)]
    pub props: Map<String, JsonValue>,
}

impl ComponentInstance {
    pub fn is_container(&self) -> bool {
        self.children.is_some() || self.tabs.is_some()
    }

    /// Whether this component binds a model field
    pub fn has_field(&self) -> bool {
        !self.is_container() && !self.field.is_empty()
    }

    pub fn prop(&self, key: &str) -> Option<&JsonValue> {
        self.props.get(key)
    }

    /// Child lists in order: row children, then each tab pane
    pub fn child_lists(&self) -> impl Iterator<Item = &Vec<ComponentInstance>> + '_ {
        self.children.iter().chain(
            self.tabs
                .iter()
                .flat_map(|panes| panes.iter().map(|pane| &pane.children)),
        )
    }

    pub fn child_lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<ComponentInstance>> + '_ {
        self.children.iter_mut().chain(
            self.tabs
                .iter_mut()
                .flat_map(|panes| panes.iter_mut().map(|pane| &mut pane.children)),
        )
    }
}

fn default_label_position() -> String {
    "left".to_string()
}

fn default_label_width() -> u32 {
    120
}

fn default_size() -> String {
    "default".to_string()
}

/// A designed form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfiguration {
    #[serde(default)]
    pub form_key: String,
    #[serde(default)]
    pub form_name: String,
    #[serde(default)]
    pub components: Vec<ComponentInstance>,
    #[serde(default = "default_label_position")]
    pub label_position: String,
    #[serde(default = "default_label_width")]
    pub label_width: u32,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default)]
    pub computed_variables: Vec<ComputedVariable>,
    #[serde(default)]
    pub expressions: Vec<AssignmentExpression>,
}

impl FormConfiguration {
    pub fn new(form_key: impl Into<String>, form_name: impl Into<String>) -> Self {
        Self {
            form_key: form_key.into(),
            form_name: form_name.into(),
            ..Self::default()
        }
    }

    pub fn from_json(source: &str) -> DesignerResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json(&self) -> DesignerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every instance in the tree, depth-first in document order
    pub fn instances(&self) -> Vec<&ComponentInstance> {
        fn collect<'a>(list: &'a [ComponentInstance], out: &mut Vec<&'a ComponentInstance>) {
            for instance in list {
                out.push(instance);
                for children in instance.child_lists() {
                    collect(children, out);
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.components, &mut out);
        out
    }

    pub fn find(&self, id: &str) -> Option<&ComponentInstance> {
        self.instances().into_iter().find(|c| c.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ComponentInstance> {
        find_in_mut(&mut self.components, id)
    }

    pub fn find_by_field(&self, field: &str) -> Option<&ComponentInstance> {
        self.instances()
            .into_iter()
            .find(|c| c.has_field() && c.field == field)
    }

    /// Detach an instance (and its subtree) from wherever it sits
    pub fn remove(&mut self, id: &str) -> Option<ComponentInstance> {
        remove_from(&mut self.components, id)
    }

    /// Append an instance to a container
    ///
    /// Rows ignore `pane`; tabs default to the first pane.
    pub fn insert_into(
        &mut self,
        container_id: &str,
        pane: Option<usize>,
        instance: ComponentInstance,
    ) -> DesignerResult<()> {
        let container = self
            .find_mut(container_id)
            .ok_or_else(|| DesignerError::InstanceNotFound {
                id: container_id.to_string(),
            })?;

        if let Some(children) = container.children.as_mut() {
            children.push(instance);
            return Ok(());
        }

        let pane = pane.unwrap_or(0);
        match container.tabs.as_mut() {
            Some(panes) => match panes.get_mut(pane) {
                Some(target) => {
                    target.children.push(instance);
                    Ok(())
                }
                None => Err(DesignerError::PaneOutOfRange {
                    id: container_id.to_string(),
                    pane,
                }),
            },
            None => Err(DesignerError::NotAContainer {
                id: container_id.to_string(),
            }),
        }
    }

    /// Model keys bound by the form's components
    pub fn field_names(&self) -> Vec<&str> {
        self.instances()
            .into_iter()
            .filter(|c| c.has_field())
            .map(|c| c.field.as_str())
            .collect()
    }

    /// A model with every bound field set to its default value (or null)
    pub fn initial_model(&self) -> Model {
        let mut model = Model::new();
        for instance in self.instances().into_iter().filter(|c| c.has_field()) {
            model
                .entry(instance.field.clone())
                .or_insert_with(|| instance.default_value.clone().unwrap_or(JsonValue::Null));
        }
        model
    }
}

impl Default for FormConfiguration {
    fn default() -> Self {
        Self {
            form_key: String::new(),
            form_name: String::new(),
            components: Vec::new(),
            label_position: default_label_position(),
            label_width: default_label_width(),
            size: default_size(),
            computed_variables: Vec::new(),
            expressions: Vec::new(),
        }
    }
}

fn find_in_mut<'a>(
    list: &'a mut [ComponentInstance],
    id: &str,
) -> Option<&'a mut ComponentInstance> {
    for instance in list {
        if instance.id == id {
            return Some(instance);
        }
        for children in instance.child_lists_mut() {
            if let Some(found) = find_in_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_from(list: &mut Vec<ComponentInstance>, id: &str) -> Option<ComponentInstance> {
    if let Some(index) = list.iter().position(|c| c.id == id) {
        return Some(list.remove(index));
    }
    list.iter_mut()
        .find_map(|instance| instance.child_lists_mut().find_map(|children| remove_from(children, id)))
}
