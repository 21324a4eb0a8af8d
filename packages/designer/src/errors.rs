//! Error types for the designer

use thiserror::Error;

pub type DesignerResult<T> = Result<T, DesignerError>;

#[derive(Error, Debug)]
pub enum DesignerError {
    #[error("Component type '{type_key}' is not registered")]
    ComponentNotFound { type_key: String },

    #[error("Component instance '{id}' not found")]
    InstanceNotFound { id: String },

    #[error("Component instance '{id}' is not a container")]
    NotAContainer { id: String },

    #[error("Container '{id}' has no pane {pane}")]
    PaneOutOfRange { id: String, pane: usize },

    #[error("No component is being dragged")]
    NothingDragged,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
