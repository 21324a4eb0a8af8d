//! # Component Factory
//!
//! Turns a registered [`ComponentDescriptor`] into a fresh
//! [`ComponentInstance`]. Layering, later entries winning:
//!
//! 1. instance basics (id, field, label, span, flags, placeholder)
//! 2. the descriptor's `default_props`
//! 3. seeded choices for `options` properties that are still empty
//! 4. caller overrides
//!
//! The descriptor itself is only read.

use crate::component::{ComponentDescriptor, EditorKind};
use crate::errors::{DesignerError, DesignerResult};
use crate::form::{ComponentInstance, FormConfiguration};
use crate::ids::IdGenerator;
use crate::registry::ComponentRegistry;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;
use tracing::debug;

/// Span of a component that neither its descriptor nor the caller sizes
pub const DEFAULT_SPAN: u8 = 24;

pub struct ComponentFactory {
    registry: Arc<ComponentRegistry>,
    ids: IdGenerator,
    default_span: u8,
}

impl ComponentFactory {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self::with_ids(registry, IdGenerator::new())
    }

    pub fn with_ids(registry: Arc<ComponentRegistry>, ids: IdGenerator) -> Self {
        Self {
            registry,
            ids,
            default_span: DEFAULT_SPAN,
        }
    }

    pub fn with_default_span(mut self, span: u8) -> Self {
        self.default_span = span.clamp(1, 24);
        self
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Create an instance of a registered component type
    pub fn create(&mut self, type_key: &str) -> DesignerResult<ComponentInstance> {
        self.create_with(type_key, Map::new())
    }

    /// Create an instance, merging `overrides` over the defaults
    pub fn create_with(
        &mut self,
        type_key: &str,
        overrides: Map<String, JsonValue>,
    ) -> DesignerResult<ComponentInstance> {
        let registry = Arc::clone(&self.registry);
        let descriptor = registry
            .get(type_key)
            .ok_or_else(|| DesignerError::ComponentNotFound {
                type_key: type_key.to_string(),
            })?;

        let mut fields = self.base_fields(descriptor);

        for (key, value) in &descriptor.default_props {
            fields.insert(key.clone(), value.clone());
        }

        for property in &descriptor.properties {
            if property.editor != EditorKind::Options {
                continue;
            }
            if fields.get(&property.key).map_or(true, is_blank) {
                let seeded = property
                    .constraints
                    .default_value
                    .clone()
                    .unwrap_or_else(placeholder_options);
                fields.insert(property.key.clone(), seeded);
            }
        }

        fields.extend(overrides);

        let instance: ComponentInstance = serde_json::from_value(JsonValue::Object(fields))?;
        self.ids.reserve_field(instance.field.clone());

        debug!(type_key, id = %instance.id, field = %instance.field, "Created component instance");
        Ok(instance)
    }

    /// Mark every field already used by `form` as taken
    pub fn reserve_fields(&mut self, form: &FormConfiguration) {
        for field in form.field_names() {
            self.ids.reserve_field(field);
        }
    }

    fn base_fields(&mut self, descriptor: &ComponentDescriptor) -> Map<String, JsonValue> {
        let field = self.ids.field_name(descriptor.default_field.as_deref());
        let label = descriptor
            .label
            .clone()
            .unwrap_or_else(|| descriptor.display_name.clone());

        let mut fields = Map::new();
        fields.insert("id".into(), self.ids.new_id().into());
        fields.insert("typeKey".into(), descriptor.type_key.clone().into());
        if let Some(component_name) = &descriptor.component_name {
            fields.insert("componentName".into(), component_name.clone().into());
        }
        fields.insert("label".into(), label.into());
        fields.insert("field".into(), field.into());
        fields.insert(
            "span".into(),
            descriptor.span.unwrap_or(self.default_span).into(),
        );
        fields.insert("offset".into(), 0.into());
        fields.insert("required".into(), false.into());
        fields.insert("disabled".into(), false.into());
        fields.insert(
            "placeholder".into(),
            descriptor.placeholder.clone().unwrap_or_default().into(),
        );
        fields
    }
}

fn placeholder_options() -> JsonValue {
    json!([
        {"label": "Option 1", "value": "option1"},
        {"label": "Option 2", "value": "option2"}
    ])
}

/// Values that count as "not supplied" when seeding options
fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::Array(_) | JsonValue::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Category, PropertySchema, SelectOption};
    use crate::form::Flag;

    fn factory() -> ComponentFactory {
        ComponentFactory::with_ids(
            Arc::new(ComponentRegistry::with_builtin_components()),
            IdGenerator::from_seed(1000),
        )
    }

    #[test]
    fn test_unknown_type_is_not_found() {
        let err = factory().create("hologram").unwrap_err();
        assert!(matches!(err, DesignerError::ComponentNotFound { type_key } if type_key == "hologram"));
    }

    #[test]
    fn test_text_defaults() {
        let text = factory().create("text").unwrap();

        assert_eq!(text.type_key, "text");
        assert_eq!(text.field, "input");
        assert_eq!(text.label, "Text Input");
        assert_eq!(text.span, 24);
        assert_eq!(text.offset, 0);
        assert_eq!(text.required, Flag::Static(false));
        assert_eq!(text.disabled, Flag::Static(false));
        assert_eq!(text.placeholder, "Please enter");
        assert_eq!(text.component_name.as_deref(), Some("el-input"));
        assert_eq!(text.prop("clearable"), Some(&JsonValue::Bool(true)));
        assert!(!text.is_container());
    }

    #[test]
    fn test_field_names_differ_across_calls() {
        let mut factory = factory();
        let first = factory.create("text").unwrap();
        let second = factory.create("text").unwrap();

        assert_ne!(first.field, second.field);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_options_property_is_seeded() {
        let mut registry = ComponentRegistry::new();
        registry.register(
            "tags",
            ComponentDescriptor::new("tags", "Tags", Category::Advanced)
                .property(PropertySchema::new("choices", "Choices", EditorKind::Options)),
            None,
        );
        registry.register(
            "levels",
            ComponentDescriptor::new("levels", "Levels", Category::Advanced).property(
                PropertySchema::new("choices", "Choices", EditorKind::Options)
                    .default_value(serde_json::to_value(vec![SelectOption::new("Low", "low")]).unwrap()),
            ),
            None,
        );
        let mut factory = ComponentFactory::new(Arc::new(registry));

        let tags = factory.create("tags").unwrap();
        let choices = tags.prop("choices").unwrap().as_array().unwrap();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0]["label"], "Option 1");
        assert_eq!(choices[1]["value"], "option2");
        assert!(tags.field.starts_with("field_"));

        let levels = factory.create("levels").unwrap();
        assert_eq!(levels.prop("choices").unwrap()[0]["value"], "low");
    }

    #[test]
    fn test_existing_options_are_kept() {
        let select = factory().create("select").unwrap();
        assert_eq!(select.prop("options").unwrap().as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_descriptor_is_not_mutated() {
        let registry = Arc::new(ComponentRegistry::with_builtin_components());
        let before = registry.get("radio").cloned();

        let mut factory = ComponentFactory::new(Arc::clone(&registry));
        let mut radio = factory.create("radio").unwrap();
        radio.props.insert("options".into(), JsonValue::Null);

        assert_eq!(registry.get("radio").cloned(), before);
    }

    #[test]
    fn test_containers() {
        let mut factory = factory();

        let row = factory.create("row").unwrap();
        assert_eq!(row.children, Some(Vec::new()));
        assert_eq!(row.prop("gutter"), Some(&JsonValue::from(16)));

        let tabs = factory.create("tabs").unwrap();
        let panes = tabs.tabs.unwrap();
        assert_eq!(panes.len(), 3);
        assert_eq!(panes[0].label, "Tab 1");
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = Map::new();
        overrides.insert("field".into(), "startDate".into());
        overrides.insert("span".into(), 12.into());
        overrides.insert("required".into(), true.into());

        let mut factory = factory();
        let date = factory.create_with("date", overrides).unwrap();
        assert_eq!(date.field, "startDate");
        assert_eq!(date.span, 12);
        assert_eq!(date.required, Flag::Static(true));
    }

    #[test]
    fn test_default_span_applies_when_descriptor_has_none() {
        let mut registry = ComponentRegistry::new();
        registry.register("plain", ComponentDescriptor::new("plain", "Plain", Category::Basic), None);
        let mut factory = ComponentFactory::new(Arc::new(registry)).with_default_span(8);

        assert_eq!(factory.create("plain").unwrap().span, 8);
    }
}
