//! # Designer Session
//!
//! One form being edited. The session owns the current
//! [`FormConfiguration`], a [`ComponentFactory`] bound to the shared registry,
//! and the [`DesignerStore`]. Every structural edit snapshots the form into
//! history, so `undo`/`redo` always restore a complete form.
//!
//! ```text
//! palette ──begin_drag──▶ store.dragged ──drop_dragged──▶ factory.create
//!                                                              │
//!                           history ◀──snapshot── form.components.push
//! ```

use crate::errors::{DesignerError, DesignerResult};
use crate::factory::{ComponentFactory, DEFAULT_SPAN};
use crate::form::{ComponentInstance, FormConfiguration};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::registry::ComponentRegistry;
use crate::store::DesignerStore;
use formwork_expression::{AssignmentExpression, ComputedVariable};
use std::sync::Arc;
use tracing::debug;

/// Tunables for a designer session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignerOptions {
    pub history_capacity: usize,
    pub default_span: u8,
}

impl Default for DesignerOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            default_span: DEFAULT_SPAN,
        }
    }
}

pub struct DesignerSession {
    factory: ComponentFactory,
    store: DesignerStore,
    form: FormConfiguration,
}

impl DesignerSession {
    /// Start editing `form`; the initial form is the first history entry
    pub fn new(
        registry: Arc<ComponentRegistry>,
        form: FormConfiguration,
        options: DesignerOptions,
    ) -> Self {
        let factory = ComponentFactory::new(registry).with_default_span(options.default_span);
        let mut session = Self {
            factory,
            store: DesignerStore::new(options.history_capacity),
            form: FormConfiguration::default(),
        };
        session.load(form);
        session
    }

    pub fn form(&self) -> &FormConfiguration {
        &self.form
    }

    pub fn store(&self) -> &DesignerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DesignerStore {
        &mut self.store
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        self.factory.registry()
    }

    /// Replace the form being edited and restart history from it
    pub fn load(&mut self, form: FormConfiguration) {
        self.factory.reserve_fields(&form);
        self.form = form;
        self.store.select(None);
        self.store.clear_dragged();

        let history = self.store.history_mut();
        history.clear();
        history.add(self.form.clone());
        debug!(form_key = %self.form.form_key, "Loaded form into designer");
    }

    /// Start dragging a palette entry
    pub fn begin_drag(&mut self, type_key: &str) -> DesignerResult<()> {
        if !self.registry().is_registered(type_key) {
            return Err(DesignerError::ComponentNotFound {
                type_key: type_key.to_string(),
            });
        }
        self.store.set_dragged(type_key);
        Ok(())
    }

    /// Drop the dragged component at the end of the form
    pub fn drop_dragged(&mut self) -> DesignerResult<String> {
        let type_key = self
            .store
            .take_dragged()
            .ok_or(DesignerError::NothingDragged)?;
        self.drop_component(&type_key)
    }

    /// Create a component and append it to the top level of the form
    ///
    /// Returns the new instance id, which also becomes the selection.
    pub fn drop_component(&mut self, type_key: &str) -> DesignerResult<String> {
        let instance = self.factory.create(type_key)?;
        let id = instance.id.clone();

        self.form.components.push(instance);
        self.store.select(Some(id.clone()));
        self.snapshot();
        Ok(id)
    }

    /// Create a component inside a row, or a tab pane (`pane` defaults to 0)
    pub fn drop_into(
        &mut self,
        container_id: &str,
        pane: Option<usize>,
        type_key: &str,
    ) -> DesignerResult<String> {
        let instance = self.factory.create(type_key)?;
        let id = instance.id.clone();

        self.form.insert_into(container_id, pane, instance)?;
        self.store.select(Some(id.clone()));
        self.snapshot();
        Ok(id)
    }

    /// Edit one instance in place
    pub fn update_component<F>(&mut self, id: &str, edit: F) -> DesignerResult<()>
    where
        F: FnOnce(&mut ComponentInstance),
    {
        let instance = self
            .form
            .find_mut(id)
            .ok_or_else(|| DesignerError::InstanceNotFound { id: id.to_string() })?;
        edit(instance);
        self.snapshot();
        Ok(())
    }

    /// Remove an instance and its subtree
    pub fn remove_component(&mut self, id: &str) -> DesignerResult<ComponentInstance> {
        let removed = self
            .form
            .remove(id)
            .ok_or_else(|| DesignerError::InstanceNotFound { id: id.to_string() })?;

        if self.store.selected() == Some(id) {
            self.store.select(None);
        }
        self.snapshot();
        Ok(removed)
    }

    pub fn set_computed_variables(&mut self, variables: Vec<ComputedVariable>) {
        self.form.computed_variables = variables;
        self.snapshot();
    }

    pub fn set_expressions(&mut self, expressions: Vec<AssignmentExpression>) {
        self.form.expressions = expressions;
        self.snapshot();
    }

    /// Restore the previous snapshot; false at the oldest one
    pub fn undo(&mut self) -> bool {
        match self.store.history_mut().undo() {
            Some(form) => {
                self.restore(form);
                true
            }
            None => false,
        }
    }

    /// Restore the next snapshot; false at the newest one
    pub fn redo(&mut self) -> bool {
        match self.store.history_mut().redo() {
            Some(form) => {
                self.restore(form);
                true
            }
            None => false,
        }
    }

    pub fn into_form(self) -> FormConfiguration {
        self.form
    }

    fn snapshot(&mut self) {
        self.store.history_mut().add(self.form.clone());
    }

    fn restore(&mut self, form: FormConfiguration) {
        self.form = form;

        let selection_gone = self
            .store
            .selected()
            .map_or(false, |id| self.form.find(id).is_none());
        if selection_gone {
            self.store.select(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Flag;

    fn session() -> DesignerSession {
        DesignerSession::new(
            Arc::new(ComponentRegistry::with_builtin_components()),
            FormConfiguration::new("test", "Test"),
            DesignerOptions::default(),
        )
    }

    #[test]
    fn test_drag_and_drop() {
        let mut session = session();
        session.begin_drag("text").unwrap();
        let id = session.drop_dragged().unwrap();

        assert_eq!(session.form().components.len(), 1);
        assert_eq!(session.store().selected(), Some(id.as_str()));
        assert!(session.store().dragged().is_none());
        assert_eq!(session.store().history().len(), 2);
    }

    #[test]
    fn test_drop_without_drag() {
        let mut session = session();
        assert!(matches!(
            session.drop_dragged(),
            Err(DesignerError::NothingDragged)
        ));
        assert!(matches!(
            session.begin_drag("nope"),
            Err(DesignerError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_undo_redo_restores_form() {
        let mut session = session();
        session.drop_component("text").unwrap();
        session.drop_component("number").unwrap();

        assert!(session.undo());
        assert_eq!(session.form().components.len(), 1);
        assert!(session.undo());
        assert!(session.form().components.is_empty());
        assert!(!session.undo());

        assert!(session.redo());
        assert_eq!(session.form().components.len(), 1);
    }

    #[test]
    fn test_undo_clears_dangling_selection() {
        let mut session = session();
        session.drop_component("text").unwrap();
        assert!(session.store().selected().is_some());

        session.undo();
        assert!(session.store().selected().is_none());
    }

    #[test]
    fn test_drop_into_row_and_update() {
        let mut session = session();
        let row = session.drop_component("row").unwrap();
        let child = session.drop_into(&row, None, "date").unwrap();

        session
            .update_component(&child, |c| c.required = Flag::Static(true))
            .unwrap();
        assert_eq!(session.form().find(&child).unwrap().required, Flag::Static(true));

        session.remove_component(&child).unwrap();
        assert!(session.form().find(&child).is_none());
        assert!(session.store().selected().is_none());
    }

    #[test]
    fn test_loaded_fields_are_not_reused() {
        let mut form = FormConfiguration::new("f", "F");
        form.components.push(
            serde_json::from_value(serde_json::json!({"id": "x", "typeKey": "text", "field": "input"}))
                .unwrap(),
        );

        let mut session = DesignerSession::new(
            Arc::new(ComponentRegistry::with_builtin_components()),
            form,
            DesignerOptions::default(),
        );
        let id = session.drop_component("text").unwrap();
        assert_eq!(session.form().find(&id).unwrap().field, "input_2");
    }
}
