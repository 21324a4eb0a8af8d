//! # Component Registry
//!
//! Maps a component type key to its [`ComponentDescriptor`] and renderer, and
//! keeps the palette grouped by [`Category`].
//!
//! ## Lifecycle
//!
//! The registry is an explicit value, populated during startup (see
//! [`ComponentRegistry::with_builtin_components`]) and then shared read-only,
//! usually as `Arc<ComponentRegistry>`, with factories and designer sessions.
//! Registration needs `&mut self`, so it cannot interleave with readers.

use crate::builtin;
use crate::component::{Category, ComponentDescriptor, ComponentSummary, RendererRef};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Components listed under one palette category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: Category,
    pub title: &'static str,
    pub expanded: bool,
    pub components: Vec<ComponentSummary>,
}

impl CategoryGroup {
    fn new(category: Category) -> Self {
        Self {
            category,
            title: category.title(),
            // Only the basic palette starts expanded
            expanded: category == Category::Basic,
            components: Vec::new(),
        }
    }
}

/// Search result: a palette entry annotated with its category title
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub component: ComponentSummary,
    pub category_title: &'static str,
}

/// Registry of component descriptors and renderers
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    descriptors: HashMap<String, ComponentDescriptor>,
    renderers: HashMap<String, RendererRef>,
    categories: Vec<CategoryGroup>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
            renderers: HashMap::new(),
            categories: Category::ALL.into_iter().map(CategoryGroup::new).collect(),
        }
    }

    /// Create a registry holding the standard component catalogue
    pub fn with_builtin_components() -> Self {
        let mut registry = Self::new();
        builtin::register_builtin_components(&mut registry);
        registry
    }

    /// Register (or overwrite) a component type
    ///
    /// The descriptor is stored under `type_key` and replaces any previous
    /// descriptor wholesale. Components without a renderer use the generic one.
    pub fn register(
        &mut self,
        type_key: impl Into<String>,
        mut descriptor: ComponentDescriptor,
        renderer: Option<RendererRef>,
    ) {
        let type_key = type_key.into();
        descriptor.type_key = type_key.clone();
        let summary = descriptor.summary();

        // A re-registration may move the component to another category
        for group in &mut self.categories {
            if group.category != descriptor.category {
                group.components.retain(|c| c.type_key != type_key);
            }
        }

        if let Some(group) = self
            .categories
            .iter_mut()
            .find(|g| g.category == descriptor.category)
        {
            match group
                .components
                .iter_mut()
                .find(|c| c.type_key == type_key)
            {
                Some(existing) => *existing = summary,
                None => group.components.push(summary),
            }
        }

        let renderer = renderer.unwrap_or_else(RendererRef::generic);
        debug!(type_key = %type_key, category = %descriptor.category, renderer = renderer.name(), "Registering component");

        self.renderers.insert(type_key.clone(), renderer);
        self.descriptors.insert(type_key, descriptor);
    }

    /// Register several components at once
    pub fn register_all<I>(&mut self, components: I)
    where
        I: IntoIterator<Item = (ComponentDescriptor, Option<RendererRef>)>,
    {
        for (descriptor, renderer) in components {
            let type_key = descriptor.type_key.clone();
            self.register(type_key, descriptor, renderer);
        }
    }

    /// Remove a component type, its renderer and its palette entry
    pub fn unregister(&mut self, type_key: &str) -> Option<ComponentDescriptor> {
        self.renderers.remove(type_key);
        for group in &mut self.categories {
            group.components.retain(|c| c.type_key != type_key);
        }

        let removed = self.descriptors.remove(type_key);
        if removed.is_some() {
            debug!(type_key, "Unregistered component");
        }
        removed
    }

    pub fn get(&self, type_key: &str) -> Option<&ComponentDescriptor> {
        self.descriptors.get(type_key)
    }

    pub fn renderer(&self, type_key: &str) -> Option<&RendererRef> {
        self.renderers.get(type_key)
    }

    pub fn is_registered(&self, type_key: &str) -> bool {
        self.descriptors.contains_key(type_key)
    }

    /// Registered type keys, sorted
    pub fn registered_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn categories(&self) -> &[CategoryGroup] {
        &self.categories
    }

    /// Palette entries of one category, in registration order
    pub fn category_components(&self, category: Category) -> &[ComponentSummary] {
        self.categories
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.components.as_slice())
            .unwrap_or(&[])
    }

    /// Case-insensitive substring search over names and descriptions
    pub fn search(&self, keyword: &str) -> Vec<SearchHit> {
        let keyword = keyword.to_lowercase();

        self.categories
            .iter()
            .flat_map(|group| {
                group.components.iter().filter_map(|component| {
                    let matches = component.name.to_lowercase().contains(&keyword)
                        || component.description.to_lowercase().contains(&keyword);
                    matches.then(|| SearchHit {
                        component: component.clone(),
                        category_title: group.title,
                    })
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
