//! # Formwork Designer
//!
//! The engine behind the drag-and-drop form designer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: type key → descriptor + renderer  │
//! │  - palette grouped by category              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: one form being edited              │
//! │  - factory creates instances                │
//! │  - store tracks drag, selection, history    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ runtime: form + model → resolved fields     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use formwork_designer::{ComponentRegistry, DesignerOptions, DesignerSession, FormConfiguration};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ComponentRegistry::with_builtin_components());
//! let mut session = DesignerSession::new(
//!     registry,
//!     FormConfiguration::new("leave", "Leave Request"),
//!     DesignerOptions::default(),
//! );
//!
//! session.drop_component("date").unwrap();
//! assert_eq!(session.form().components.len(), 1);
//!
//! session.undo();
//! assert!(session.form().components.is_empty());
//! ```

mod builtin;
mod component;
mod errors;
mod factory;
mod form;
mod history;
mod ids;
mod registry;
mod runtime;
mod session;
mod store;
mod validate;

pub use builtin::{builtin_components, register_builtin_components, ROW_RENDERER, TABS_RENDERER};
pub use component::{
    Category, ComponentDescriptor, ComponentSummary, EditorKind, PropertyConstraints,
    PropertySchema, RendererRef, SelectOption,
};
pub use errors::{DesignerError, DesignerResult};
pub use factory::{ComponentFactory, DEFAULT_SPAN};
pub use form::{ComponentInstance, Flag, FormConfiguration, TabPane};
pub use history::{History, HistoryState, DEFAULT_HISTORY_CAPACITY};
pub use ids::IdGenerator;
pub use registry::{CategoryGroup, ComponentRegistry, SearchHit};
pub use runtime::{FormRuntime, ResolvedField, ResolvedForm};
pub use session::{DesignerOptions, DesignerSession};
pub use store::{Device, DesignerMode, DesignerStore};
pub use validate::{is_valid_field_name, validate_form, Diagnostic, DiagnosticLevel};

// Re-export expression types that appear in this crate's API
pub use formwork_expression::{
    AssignmentExpression, ComputedValues, ComputedVariable, Model, Value,
};
