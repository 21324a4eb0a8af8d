//! Component descriptors: the registered templates a form is built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Palette category of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Basic,
    Advanced,
    Layout,
}

impl Category {
    /// All categories in palette order
    pub const ALL: [Category; 3] = [Category::Basic, Category::Advanced, Category::Layout];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Basic => "basic",
            Category::Advanced => "advanced",
            Category::Layout => "layout",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Basic => "Basic Components",
            Category::Advanced => "Advanced Components",
            Category::Layout => "Layout Components",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Editor widget used for a property in the designer's property panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Input,
    Number,
    Switch,
    Select,
    Options,
    Tabs,
    Textarea,
    Color,
}

/// One `{label, value}` choice for select/radio/checkbox components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: JsonValue,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Constraints attached to an editable property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
}

/// An editable property of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub editor: EditorKind,
    #[serde(flatten)]
    pub constraints: PropertyConstraints,
}

impl PropertySchema {
    pub fn new(key: impl Into<String>, label: impl Into<String>, editor: EditorKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            editor,
            constraints: PropertyConstraints::default(),
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.constraints.max = Some(max);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.constraints.placeholder = Some(placeholder.into());
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.constraints.options = options;
        self
    }

    pub fn default_value(mut self, value: impl Into<JsonValue>) -> Self {
        self.constraints.default_value = Some(value.into());
        self
    }
}

/// Name of the renderer that draws a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererRef(pub String);

impl RendererRef {
    /// Generic renderer that picks the input widget from the component type
    pub const GENERIC: &'static str = "FormComponent";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn generic() -> Self {
        Self(Self::GENERIC.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Registered template describing a component type's defaults and editable
/// properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub type_key: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "field", skip_serializing_if = "Option::is_none")]
    pub default_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default)]
    pub default_props: Map<String, JsonValue>,
    #[serde(default)]
    pub properties: Vec<PropertySchema>,
}

impl ComponentDescriptor {
    pub fn new(
        type_key: impl Into<String>,
        display_name: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            type_key: type_key.into(),
            display_name: display_name.into(),
            description: String::new(),
            icon: String::new(),
            category,
            label: None,
            default_field: None,
            placeholder: None,
            span: None,
            component_name: None,
            default_props: Map::new(),
            properties: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.default_field = Some(field.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn span(mut self, span: u8) -> Self {
        self.span = Some(span);
        self
    }

    pub fn component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = Some(name.into());
        self
    }

    pub fn default_prop(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.default_props.insert(key.into(), value.into());
        self
    }

    pub fn property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    /// Palette entry for this descriptor
    pub fn summary(&self) -> ComponentSummary {
        ComponentSummary {
            type_key: self.type_key.clone(),
            name: self.display_name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            category: self.category,
        }
    }
}

/// Palette entry listed under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub type_key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: Category,
}
