//! Item templates and the catalog the conversion registry is built from.
//!
//! The catalog is read-only to the core. Hosts either implement [`ItemCatalog`]
//! over their own item database or load a [`MemoryCatalog`].
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Identity of an item template (prefab name, e.g. `Fish1`).
pub type TemplateId = String;

/// Coarse item classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Fish,
    Bait,
    Consumable,
    Material,
    Trophy,
    #[default]
    Misc,
}

/// Static description of an item type.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    /// Template identity; the biome lookup table is keyed by this.
    pub id: TemplateId,
    /// Shared item name; rules and inventory stacks match on this.
    pub name: String,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub max_quality: u32,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub max_stack: u32,
    /// Names of the bait items this fish is caught with.
    #[cfg_attr(feature = "serde", serde(default))]
    pub baits: Vec<String>,
    /// Template ids of bonus items that may come with this fish.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_drops: Vec<TemplateId>,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

impl ItemTemplate {
    pub fn new(id: impl Into<TemplateId>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            max_quality: 1,
            max_stack: 1,
            baits: Vec::new(),
            extra_drops: Vec::new(),
        }
    }

    /// Shorthand for a fish template.
    pub fn fish(id: impl Into<TemplateId>, name: impl Into<String>) -> Self {
        Self::new(id, name, ItemKind::Fish)
    }

    pub fn with_max_quality(mut self, max_quality: u32) -> Self {
        self.max_quality = max_quality.max(1);
        self
    }

    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack.max(1);
        self
    }

    pub fn with_bait(mut self, bait: impl Into<String>) -> Self {
        self.baits.push(bait.into());
        self
    }

    pub fn with_extra_drop(mut self, template: impl Into<TemplateId>) -> Self {
        self.extra_drops.push(template.into());
        self
    }

    pub fn is_fish(&self) -> bool {
        self.kind == ItemKind::Fish
    }
}

/// Query interface over the host's item database.
pub trait ItemCatalog {
    /// Every template, in catalog order.
    fn templates(&self) -> Vec<Arc<ItemTemplate>>;

    /// Looks up a template by its identity.
    fn template(&self, id: &str) -> Option<Arc<ItemTemplate>>;

    /// Templates classified as fish, in catalog order.
    fn fish_templates(&self) -> Vec<Arc<ItemTemplate>> {
        self.templates().into_iter().filter(|t| t.is_fish()).collect()
    }
}

/// In-memory catalog keeping insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    order: Vec<Arc<ItemTemplate>>,
    by_id: HashMap<TemplateId, Arc<ItemTemplate>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: impl IntoIterator<Item = ItemTemplate>) -> Self {
        let mut catalog = Self::new();
        for t in templates {
            catalog.insert(t);
        }
        catalog
    }

    /// Parses a RON list of [`ItemTemplate`]s.
    #[cfg(feature = "ron")]
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let templates: Vec<ItemTemplate> = ron::from_str(text)?;
        Ok(Self::from_templates(templates))
    }

    /// Inserts a template, replacing any previous one with the same id in place.
    pub fn insert(&mut self, template: ItemTemplate) -> Arc<ItemTemplate> {
        let template = Arc::new(template);
        if let Some(pos) = self.order.iter().position(|t| t.id == template.id) {
            self.order[pos] = template.clone();
        } else {
            self.order.push(template.clone());
        }
        self.by_id.insert(template.id.clone(), template.clone());
        template
    }

    /// Looks up a template by id, failing with [`Error::UnknownTemplate`].
    pub fn require(&self, id: &str) -> Result<Arc<ItemTemplate>> {
        self.by_id.get(id).cloned().ok_or_else(|| Error::UnknownTemplate {
            id: id.to_owned(),
        })
    }

    /// Finds a template by its shared item name.
    pub fn by_name(&self, name: &str) -> Option<Arc<ItemTemplate>> {
        self.order.iter().find(|t| t.name == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ItemCatalog for MemoryCatalog {
    fn templates(&self) -> Vec<Arc<ItemTemplate>> {
        self.order.clone()
    }

    fn template(&self, id: &str) -> Option<Arc<ItemTemplate>> {
        self.by_id.get(id).cloned()
    }
}
