//! # Form Runtime
//!
//! Resolves a designed form against a data model, the way the runtime
//! renderer sees it:
//!
//! 1. seed bound fields missing from the model with their default value
//! 2. evaluate computed variables
//! 3. apply assignment rules
//! 4. re-evaluate computed variables against the updated model
//! 5. evaluate each component's `hidden`, `disabled` and `required` flags
//!
//! Children of a hidden container are hidden too. Failing expressions are
//! logged and treated as `undefined`, which is falsy.

use crate::form::{ComponentInstance, Flag, FormConfiguration};
use formwork_expression::{ComputedValues, ExpressionEvaluator, Model};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, instrument};

/// Render-time state of one component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    pub instance_id: String,
    pub type_key: String,
    /// Bound model key; `None` for containers
    pub field: Option<String>,
    pub visible: bool,
    pub disabled: bool,
    pub required: bool,
}

/// A form resolved against a model
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedForm {
    pub model: Model,
    pub computed: ComputedValues,
    pub fields: Vec<ResolvedField>,
}

impl ResolvedForm {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields
            .iter()
            .find(|f| f.field.as_deref() == Some(name))
    }

    pub fn instance(&self, id: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.instance_id == id)
    }

    /// Fields a renderer would show
    pub fn visible_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(|f| f.visible)
    }

    /// JSON view; `undefined` computed values are omitted
    pub fn to_json(&self) -> JsonValue {
        let computed: Map<String, JsonValue> = self
            .computed
            .iter()
            .filter_map(|(name, value)| value.to_json().map(|json| (name.clone(), json)))
            .collect();

        serde_json::json!({
            "model": self.model,
            "computed": computed,
            "fields": self.fields,
        })
    }
}

pub struct FormRuntime;

impl FormRuntime {
    #[instrument(skip_all, fields(form_key = %form.form_key))]
    pub fn resolve(form: &FormConfiguration, model: &Model) -> ResolvedForm {
        let mut seeded = model.clone();
        for (field, value) in form.initial_model() {
            seeded.entry(field).or_insert(value);
        }

        let computed =
            ExpressionEvaluator::evaluate_computed_variables(&seeded, &form.computed_variables);
        let model = ExpressionEvaluator::evaluate_assignments(&seeded, &computed, &form.expressions);
        let computed =
            ExpressionEvaluator::evaluate_computed_variables(&model, &form.computed_variables);

        let mut fields = Vec::new();
        resolve_list(&form.components, &model, &computed, false, &mut fields);

        debug!(fields = fields.len(), computed = computed.len(), "Resolved form");
        ResolvedForm {
            model,
            computed,
            fields,
        }
    }
}

fn resolve_list(
    list: &[ComponentInstance],
    model: &Model,
    computed: &ComputedValues,
    parent_hidden: bool,
    out: &mut Vec<ResolvedField>,
) {
    for instance in list {
        let hidden = parent_hidden || flag(&instance.hidden, model, computed);

        out.push(ResolvedField {
            instance_id: instance.id.clone(),
            type_key: instance.type_key.clone(),
            field: instance.has_field().then(|| instance.field.clone()),
            visible: !hidden,
            disabled: flag(&instance.disabled, model, computed),
            required: flag(&instance.required, model, computed),
        });

        for children in instance.child_lists() {
            resolve_list(children, model, computed, hidden, out);
        }
    }
}

fn flag(flag: &Flag, model: &Model, computed: &ComputedValues) -> bool {
    match flag {
        Flag::Static(value) => *value,
        Flag::Expression(_) => {
            ExpressionEvaluator::evaluate_property(&flag.to_json(), model, computed).is_truthy()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(value: JsonValue) -> FormConfiguration {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_static_flags() {
        let form = form(json!({
            "components": [
                {"id": "a", "typeKey": "text", "field": "name", "required": true, "disabled": false}
            ]
        }));
        let resolved = FormRuntime::resolve(&form, &Model::new());
        let name = resolved.field("name").unwrap();

        assert!(name.visible);
        assert!(name.required);
        assert!(!name.disabled);
        assert_eq!(resolved.model.get("name"), Some(&JsonValue::Null));
    }

    #[test]
    fn test_expression_flags_use_computed_names() {
        let form = form(json!({
            "components": [
                {"id": "a", "typeKey": "text", "field": "note", "disabled": "!allowEdit"},
                {"id": "b", "typeKey": "number", "field": "amount", "hidden": "model.amount < 100"}
            ],
            "computedVariables": [{"name": "allowEdit", "expression": "model.amount > 10"}]
        }));
        let model = json!({"amount": 50}).as_object().cloned().unwrap();
        let resolved = FormRuntime::resolve(&form, &model);

        assert!(!resolved.field("note").unwrap().disabled);
        assert!(!resolved.field("amount").unwrap().visible);
    }

    #[test]
    fn test_hidden_container_hides_children() {
        let form = form(json!({
            "components": [
                {"id": "row", "typeKey": "row", "hidden": true, "children": [
                    {"id": "inner", "typeKey": "text", "field": "inner"}
                ]}
            ]
        }));
        let resolved = FormRuntime::resolve(&form, &Model::new());

        assert!(!resolved.instance("row").unwrap().visible);
        assert!(!resolved.field("inner").unwrap().visible);
        assert_eq!(resolved.instance("row").unwrap().field, None);
        assert_eq!(resolved.visible_fields().count(), 0);
    }

    #[test]
    fn test_failing_flag_is_falsy() {
        let form = form(json!({
            "components": [{"id": "a", "typeKey": "text", "field": "x", "required": "model.x.y.z"}]
        }));
        let resolved = FormRuntime::resolve(&form, &Model::new());
        assert!(!resolved.field("x").unwrap().required);
    }

    #[test]
    fn test_to_json_omits_undefined_computed() {
        let form = form(json!({
            "computedVariables": [
                {"name": "good", "expression": "1 + 1"},
                {"name": "bad", "expression": "nope"}
            ]
        }));
        let json = FormRuntime::resolve(&form, &Model::new()).to_json();

        assert_eq!(json["computed"], json!({"good": 2}));
        assert_eq!(json["fields"], json!([]));
    }
}
