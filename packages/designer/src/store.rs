//! Designer UI state: drag source, selection, view mode and history.

use crate::form::FormConfiguration;
use crate::history::History;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignerMode {
    #[default]
    Edit,
    Preview,
}

/// Canvas width preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

#[derive(Debug, Clone)]
pub struct DesignerStore {
    dragged: Option<String>,
    selected: Option<String>,
    mode: DesignerMode,
    device: Device,
    history: History<FormConfiguration>,
}

impl DesignerStore {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            dragged: None,
            selected: None,
            mode: DesignerMode::default(),
            device: Device::default(),
            history: History::with_capacity(history_capacity),
        }
    }

    /// Component type currently being dragged from the palette
    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    pub fn set_dragged(&mut self, type_key: impl Into<String>) {
        let type_key = type_key.into();
        debug!(type_key = %type_key, "Drag started");
        self.dragged = Some(type_key);
    }

    pub fn take_dragged(&mut self) -> Option<String> {
        self.dragged.take()
    }

    pub fn clear_dragged(&mut self) {
        self.dragged = None;
    }

    /// Id of the selected component instance
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub fn mode(&self) -> DesignerMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DesignerMode) {
        self.mode = mode;
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn history(&self) -> &History<FormConfiguration> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History<FormConfiguration> {
        &mut self.history
    }
}

impl Default for DesignerStore {
    fn default() -> Self {
        Self::new(crate::history::DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let store = DesignerStore::default();
        assert_eq!(store.mode(), DesignerMode::Edit);
        assert_eq!(store.device(), Device::Desktop);
        assert_eq!(store.history().capacity(), 50);
        assert!(store.dragged().is_none());
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut store = DesignerStore::default();
        store.set_dragged("text");
        assert_eq!(store.dragged(), Some("text"));

        assert_eq!(store.take_dragged(), Some("text".to_string()));
        assert!(store.dragged().is_none());
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DesignerMode::Preview).unwrap(),
            "\"preview\""
        );
        assert_eq!(
            serde_json::from_str::<Device>("\"mobile\"").unwrap(),
            Device::Mobile
        );
    }
}
